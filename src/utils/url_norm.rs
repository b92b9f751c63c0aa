use url::Url;

/// Parses a submitted URL for validation, tolerating a missing scheme.
///
/// `example.com/path` is read as `https://example.com/path`; explicit
/// `http`/`https` URLs pass through. Anything without a host, with another
/// scheme, or otherwise malformed is rejected. The returned [`Url`] is used
/// for host checks only; persistence uses [`enforce_https`] on the raw
/// input instead, so the stored string stays byte-for-byte what the caller
/// sent apart from the scheme.
pub fn parse_submitted(input: &str) -> Result<Url, String> {
    if input.is_empty() {
        return Err("URL is empty".to_string());
    }

    let url = match Url::parse(input) {
        Ok(url) => url,
        // No scheme at all: assume https and try again.
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            Url::parse(&format!("https://{input}")).map_err(|e| format!("Invalid URL: {e}"))?
        }
        Err(e) => return Err(format!("Invalid URL: {e}")),
    };

    match url.scheme() {
        "http" | "https" => {}
        other => return Err(format!("Only http/https URLs are allowed, got '{other}'")),
    }

    if url.host_str().is_none() {
        return Err("URL has no host".to_string());
    }

    Ok(url)
}

/// Rewrites a URL string to https.
///
/// A pure string transform, not a reachability check: any `http://` or
/// `https://` prefix is stripped and `https://` is prepended. The rest of
/// the string is left untouched. Schemes are case-insensitive, so the
/// prefix match is too.
pub fn enforce_https(input: &str) -> String {
    let lower = input.to_ascii_lowercase();
    let rest = if lower.starts_with("http://") {
        &input["http://".len()..]
    } else if lower.starts_with("https://") {
        &input["https://".len()..]
    } else {
        input
    };

    format!("https://{rest}")
}
