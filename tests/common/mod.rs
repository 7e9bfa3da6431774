//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use failover_proxy::config::ProxyConfig;
use failover_proxy::lifecycle::{bootstrap, Shutdown};
use failover_proxy::HttpServer;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// A raw-TCP target with a switchable `/health/` endpoint.
///
/// Any other path answers `200` with `"{name} {path} {host}"` as the body.
pub struct MockTarget {
    pub name: &'static str,
    pub addr: SocketAddr,
    healthy: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl MockTarget {
    pub async fn start(name: &'static str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let healthy = Arc::new(AtomicBool::new(true));

        let flag = healthy.clone();
        let task = tokio::spawn(async move {
            loop {
                match listener.accept().await {
                    Ok((socket, _)) => {
                        let flag = flag.clone();
                        tokio::spawn(async move {
                            handle(socket, name, flag).await;
                        });
                    }
                    Err(_) => break,
                }
            }
        });

        Self {
            name,
            addr,
            healthy,
            task,
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    /// Stop accepting connections; new connects are refused.
    pub async fn stop(&self) {
        self.task.abort();
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}

impl Drop for MockTarget {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn handle(mut socket: TcpStream, name: &str, healthy: Arc<AtomicBool>) {
    let mut buf = Vec::with_capacity(1024);
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }

    let head = String::from_utf8_lossy(&buf);
    let mut lines = head.lines();
    let path = lines
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();
    let host = lines
        .filter_map(|line| line.split_once(':'))
        .find(|(key, _)| key.eq_ignore_ascii_case("host"))
        .map(|(_, value)| value.trim().to_string())
        .unwrap_or_default();

    let (status, body) = if path.starts_with("/health") {
        if healthy.load(Ordering::SeqCst) {
            ("200 OK", "ok".to_string())
        } else {
            ("503 Service Unavailable", "down".to_string())
        }
    } else {
        ("200 OK", format!("{} {} {}", name, path, host))
    };

    let response = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\nX-Served-By: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        name,
        body
    );
    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.shutdown().await;
}

/// Config pointing at `targets` with fast probes.
pub fn config_for(targets: &[&MockTarget], interval: u64) -> ProxyConfig {
    let mut config = ProxyConfig::new(targets.iter().map(|t| t.url()).collect(), interval);
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.health_check.timeout_secs = 1;
    config.health_check.backoff_base_ms = 20;
    config
}

/// A running proxy bound to an ephemeral port.
pub struct RunningProxy {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub server: JoinHandle<()>,
}

impl RunningProxy {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn ws_url(&self, path: &str) -> String {
        format!("ws://{}{}", self.addr, path)
    }
}

impl Drop for RunningProxy {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

pub async fn start_proxy(config: &ProxyConfig) -> RunningProxy {
    let shutdown = Shutdown::new();
    let server: HttpServer = bootstrap(config, &shutdown).await.unwrap();
    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let rx = shutdown.subscribe();
    let server = tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    RunningProxy {
        addr,
        shutdown,
        server,
    }
}

/// Poll `f` until it returns true or `timeout` elapses.
pub async fn eventually<F, Fut>(timeout: Duration, mut f: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if f().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    false
}
