//! URL canonicalization for request identity and classification.

use url::Url;

/// Error type for URL canonicalization failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UrlError {
    #[error("empty URL")]
    Empty,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("relative URL without a base: {0}")]
    RelativeWithoutBase(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Canonicalize a URL string so equal requests produce equal store keys.
///
/// Normalization steps:
/// 1. Trim leading/trailing whitespace
/// 2. Resolve `/path` and `./path` against `base` (the application origin)
/// 3. Default scheme to https:// if missing
/// 4. Accept only http/https schemes
/// 5. Lowercase host, remove fragment (#...)
/// 6. Keep query string intact (do not reorder)
pub fn canonicalize(input: &str, base: Option<&Url>) -> Result<Url, UrlError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let mut parsed = if trimmed.starts_with('/') || trimmed.starts_with("./") {
        let base = base.ok_or_else(|| UrlError::RelativeWithoutBase(trimmed.to_string()))?;
        base.join(trimmed).map_err(|e| UrlError::InvalidUrl(e.to_string()))?
    } else {
        let url_str = if trimmed.contains("://") { trimmed.to_string() } else { format!("https://{trimmed}") };
        Url::parse(&url_str).map_err(|e| UrlError::InvalidUrl(e.to_string()))?
    };

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlError::UnsupportedScheme(scheme.to_string())),
    }

    if let Some(host) = parsed.host_str() {
        let host = host.to_lowercase();
        parsed
            .set_host(Some(&host))
            .map_err(|e| UrlError::InvalidUrl(e.to_string()))?;
    }

    parsed.set_fragment(None);

    Ok(parsed)
}
