pub mod quota_service;
pub mod shorten_service;

pub use quota_service::{QuotaDecision, QuotaService, QuotaState};
pub use shorten_service::{ShortLink, ShortenService};
