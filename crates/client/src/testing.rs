//! Network doubles shared by the client tests.

use crate::network::{Network, NetworkError};
use shellcache_core::{InterceptedRequest, Response};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Answers from a URL → response table; unknown URLs fail like an
/// unreachable host. Every call is counted.
#[derive(Default)]
pub struct ScriptedNetwork {
    routes: Mutex<HashMap<String, Response>>,
    offline: AtomicBool,
    calls: AtomicUsize,
}

impl ScriptedNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` with status 200 for `url`.
    pub fn serve(self, url: &str, body: &str) -> Self {
        self.route(url, Response::new(200, vec![("content-type".into(), "text/plain".into())], body.to_string()))
    }

    pub fn route(self, url: &str, response: Response) -> Self {
        self.routes.lock().unwrap().insert(url.to_string(), response);
        self
    }

    /// Serve every default shell asset under `origin`.
    pub fn with_shell(mut self, origin: &str) -> Self {
        let base = url::Url::parse(origin).unwrap();
        for entry in shellcache_core::assets::DEFAULT_ASSETS {
            let url = base.join(entry).unwrap();
            self = self.serve(url.as_str(), &format!("asset {entry}"));
        }
        self
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Network for ScriptedNetwork {
    async fn fetch(&self, request: &InterceptedRequest) -> Result<Response, NetworkError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            return Err(NetworkError::Connect("network unreachable".into()));
        }
        self.routes
            .lock()
            .unwrap()
            .get(request.url().as_str())
            .cloned()
            .ok_or_else(|| NetworkError::Connect(format!("no route to {}", request.url())))
    }
}

/// Loopback HTTP/1.1 server. Paths containing `/search.php` answer with a
/// JSON body of `search_len` bytes; every other path answers `asset {path}`.
pub async fn serve_http(search_len: usize) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }

                let head = String::from_utf8_lossy(&request);
                let path = head.split_whitespace().nth(1).unwrap_or("/").to_string();
                let (content_type, body) = if path.contains("/search.php") {
                    let empty = r#"{"drinks":[{"idDrink":""}]}"#;
                    let pad = "1".repeat(search_len.saturating_sub(empty.len()));
                    ("application/json", format!(r#"{{"drinks":[{{"idDrink":"{pad}"}}]}}"#))
                } else {
                    ("text/plain", format!("asset {path}"))
                };

                let response = format!(
                    "HTTP/1.1 200 OK\r\ncontent-type: {content_type}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}
