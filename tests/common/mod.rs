//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use iframe_proxy::config::ProxyConfig;
use iframe_proxy::{HttpServer, Shutdown};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Canned response from the mock upstream.
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub content_type: Option<&'static str>,
    pub cache_control: Option<&'static str>,
    pub body: Vec<u8>,
    pub delay: Duration,
}

impl MockResponse {
    pub fn html(body: &str) -> Self {
        Self {
            status: 200,
            content_type: Some("text/html; charset=utf-8"),
            cache_control: None,
            body: body.as_bytes().to_vec(),
            delay: Duration::ZERO,
        }
    }
}

/// What the mock upstream saw for one request.
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub method: String,
    pub path: String,
    pub user_agent: Option<String>,
}

pub type Seen = Arc<Mutex<Vec<SeenRequest>>>;

/// Start a mock upstream on an ephemeral port.
///
/// `respond` maps the request path to the response. Every request is
/// recorded in the returned log.
pub async fn start_mock_upstream<F>(respond: F) -> (SocketAddr, Seen)
where
    F: Fn(&str) -> MockResponse + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let seen: Seen = Arc::new(Mutex::new(Vec::new()));
    let respond = Arc::new(respond);

    let log = seen.clone();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let respond = respond.clone();
            let log = log.clone();
            tokio::spawn(async move {
                let Some(head) = read_head(&mut socket).await else {
                    return;
                };
                let request = parse_head(&head);
                let response = respond(&request.path);
                log.lock().unwrap().push(request);

                tokio::time::sleep(response.delay).await;

                let mut out = format!(
                    "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n",
                    response.status,
                    reason(response.status),
                    response.body.len()
                );
                if let Some(ct) = response.content_type {
                    out.push_str(&format!("Content-Type: {}\r\n", ct));
                }
                if let Some(cc) = response.cache_control {
                    out.push_str(&format!("Cache-Control: {}\r\n", cc));
                }
                out.push_str("\r\n");

                let _ = socket.write_all(out.as_bytes()).await;
                let _ = socket.write_all(&response.body).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    (addr, seen)
}

async fn read_head(socket: &mut tokio::net::TcpStream) -> Option<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if buf.windows(4).any(|w| w == b"\r\n\r\n") {
            return Some(String::from_utf8_lossy(&buf).into_owned());
        }
    }
}

fn parse_head(head: &str) -> SeenRequest {
    let mut lines = head.lines();
    let mut request_line = lines.next().unwrap_or("").split_whitespace();
    let method = request_line.next().unwrap_or("").to_string();
    let path = request_line.next().unwrap_or("").to_string();
    let user_agent = lines.find_map(|line| {
        let (name, value) = line.split_once(':')?;
        name.trim()
            .eq_ignore_ascii_case("user-agent")
            .then(|| value.trim().to_string())
    });
    SeenRequest {
        method,
        path,
        user_agent,
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        203 => "Non-Authoritative Information",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

/// Proxy configuration pointed at `target`, isolated from the environment.
pub fn test_config(target: &str) -> ProxyConfig {
    let mut config = ProxyConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.upstream.target_url = target.to_string();
    config.upstream.use_env_proxy = false;
    config.observability.metrics_enabled = false;
    config
}

/// Start the proxy on an ephemeral port.
///
/// The server stops when the returned [`Shutdown`] is triggered or dropped,
/// so bind it for the length of the test.
pub async fn start_proxy(config: ProxyConfig) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(config).unwrap();

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        server.run(listener, rx).await.unwrap();
    });

    (addr, shutdown)
}

/// Client that talks to the proxy directly, sending no user agent.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

/// A port with nothing listening on it.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Encode a URL the way the rewriter does.
pub fn proxied(absolute: &str) -> String {
    format!("/api/proxy?url={}", urlencoding::encode(absolute))
}
