//! Intercepted outbound requests.
//!
//! An [`InterceptedRequest`] is produced per call, inspected by the
//! classifier and the strategy executor, and never persisted.

pub mod url;

pub use self::url::{UrlError, canonicalize};

use crate::Error;
use crate::store::hash::compute_request_key;
use ::url::{Origin, Url};

/// Methods a request may carry.
const METHODS: &[&str] = &["GET", "HEAD", "POST", "PUT", "DELETE", "PATCH", "OPTIONS"];

/// One outbound call seen by the interception layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterceptedRequest {
    method: String,
    url: Url,
}

impl InterceptedRequest {
    /// Build a request from a method and a URL string.
    ///
    /// Relative URLs (`/path`, `./path`) resolve against `base`.
    pub fn parse(method: &str, input: &str, base: Option<&Url>) -> Result<Self, Error> {
        let url = canonicalize(input, base).map_err(|e| Error::InvalidUrl(e.to_string()))?;
        Self::new(method, url)
    }

    /// Build a request from an already-parsed URL.
    pub fn new(method: &str, mut url: Url) -> Result<Self, Error> {
        let method = method.trim().to_ascii_uppercase();
        if !METHODS.contains(&method.as_str()) {
            return Err(Error::InvalidInput(format!("unsupported method: {method}")));
        }
        url.set_fragment(None);
        Ok(Self { method, url })
    }

    /// Shorthand for a GET request.
    pub fn get(url: Url) -> Self {
        let mut url = url;
        url.set_fragment(None);
        Self { method: "GET".into(), url }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn origin(&self) -> Origin {
        self.url.origin()
    }

    /// Host including a non-default port, matching what a browser reports.
    pub fn host(&self) -> Option<String> {
        let host = self.url.host_str()?;
        Some(match self.url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        })
    }

    pub fn path(&self) -> &str {
        self.url.path()
    }

    /// Store key for this request (method + canonical URL).
    pub fn store_key(&self) -> String {
        compute_request_key(&self.method, self.url.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_absolute() {
        let req =
            InterceptedRequest::parse("get", "https://www.thecocktaildb.com/api/json/v1/1/search.php?s=margarita", None)
                .unwrap();
        assert_eq!(req.method(), "GET");
        assert_eq!(req.host().as_deref(), Some("www.thecocktaildb.com"));
        assert_eq!(req.path(), "/api/json/v1/1/search.php");
    }

    #[test]
    fn test_host_keeps_explicit_port() {
        let req = InterceptedRequest::get(Url::parse("http://localhost:8080/index.html").unwrap());
        assert_eq!(req.host().as_deref(), Some("localhost:8080"));
    }

    #[test]
    fn test_parse_relative() {
        let base = Url::parse("http://localhost:8080").unwrap();
        let req = InterceptedRequest::parse("GET", "/index.html", Some(&base)).unwrap();
        assert_eq!(req.url().as_str(), "http://localhost:8080/index.html");
        assert_eq!(req.origin(), base.origin());
    }

    #[test]
    fn test_unsupported_method() {
        let url = Url::parse("http://localhost:8080/").unwrap();
        let result = InterceptedRequest::new("BREW", url);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_invalid_url() {
        let result = InterceptedRequest::parse("GET", "ftp://example.com/file", None);
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn test_store_key_ignores_fragment() {
        let a = InterceptedRequest::get(Url::parse("http://localhost:8080/index.html").unwrap());
        let b = InterceptedRequest::get(Url::parse("http://localhost:8080/index.html#menu").unwrap());
        assert_eq!(a.store_key(), b.store_key());
    }
}
