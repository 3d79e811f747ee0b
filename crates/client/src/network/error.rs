//! Network-layer failure types.

use std::sync::Arc;

/// A request that never produced a response.
///
/// An error *status* is not a `NetworkError`; those come back as a
/// normal [`shellcache_core::Response`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum NetworkError {
    /// Request timed out.
    #[error("request timeout")]
    Timeout,

    /// Connection could not be established (DNS, refused, TLS).
    #[error("connection failed: {0}")]
    Connect(String),

    /// Any other transport failure.
    #[error("transport error: {0}")]
    Transport(Arc<reqwest::Error>),

    /// HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Build(String),
}

impl From<reqwest::Error> for NetworkError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            NetworkError::Timeout
        } else if err.is_connect() {
            NetworkError::Connect(err.to_string())
        } else {
            NetworkError::Transport(Arc::new(err))
        }
    }
}

impl From<NetworkError> for shellcache_core::Error {
    fn from(err: NetworkError) -> Self {
        shellcache_core::Error::Network(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(NetworkError::Timeout.to_string(), "request timeout");

        let err = NetworkError::Connect("dns error".into());
        assert_eq!(err.to_string(), "connection failed: dns error");
    }

    #[test]
    fn test_into_core_error() {
        let err: shellcache_core::Error = NetworkError::Connect("dns failure".into()).into();
        assert!(matches!(err, shellcache_core::Error::Network(msg) if msg.contains("dns failure")));
    }
}
