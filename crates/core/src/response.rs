//! Response values delivered back to the intercepted caller.

use bytes::Bytes;

/// A fulfilled response: status, ordered headers and body bytes.
///
/// Headers keep their original order and casing; lookups are
/// case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl Response {
    pub fn new(status: u16, headers: Vec<(String, String)>, body: impl Into<Bytes>) -> Self {
        Self { status, headers, body: body.into() }
    }

    /// A plain-text response.
    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self::new(
            status,
            vec![("content-type".into(), "text/plain; charset=utf-8".into())],
            Bytes::from(body.into()),
        )
    }

    /// A JSON response from already-serialized bytes.
    pub fn json(status: u16, body: impl Into<Bytes>) -> Self {
        Self::new(status, vec![("content-type".into(), "application/json".into())], body)
    }

    /// First header value with the given name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// True for 2xx statuses.
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body decoded as UTF-8, replacing invalid sequences.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_response() {
        let resp = Response::text(500, "App Shell Asset Missing");
        assert_eq!(resp.status, 500);
        assert_eq!(resp.content_type(), Some("text/plain; charset=utf-8"));
        assert_eq!(resp.body_text(), "App Shell Asset Missing");
        assert!(!resp.is_ok());
    }

    #[test]
    fn test_header_lookup_case_insensitive() {
        let resp = Response::new(200, vec![("Content-Type".into(), "text/html".into())], "<html></html>");
        assert_eq!(resp.header("content-type"), Some("text/html"));
        assert_eq!(resp.header("CONTENT-TYPE"), Some("text/html"));
        assert_eq!(resp.header("etag"), None);
        assert!(resp.is_ok());
    }
}
