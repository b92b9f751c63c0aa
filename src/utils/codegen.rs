use rand::{Rng, distr::Alphanumeric};

/// Length of generated short codes.
///
/// 62^6 codes is large enough that the collision check against the store
/// stays the actual safety net rather than a formality; generation itself
/// makes no uniqueness guarantee.
pub const CODE_LEN: usize = 6;

/// Generates a random alphanumeric short code.
pub fn generate_code() -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(CODE_LEN)
        .map(char::from)
        .collect()
}
