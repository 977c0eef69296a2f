//! In-process TCP connect sweep, the primary probing mechanism.
//!
//! Uses the operating system's socket API through tokio with a short
//! per-port timeout and bounded concurrency (the fast-timing profile).
//! No special privileges required.

use crate::error::{ScanError, ScanResult};
use crate::types::Port;
use futures::stream::{self, StreamExt};
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;
use tokio::net::{TcpSocket, TcpStream};
use tokio::time::timeout;

/// Outcome of a single port attempt.
enum Attempt {
    Open(u16),
    NotOpen,
    /// The connect call itself failed in a way that says nothing about the
    /// port (no route, interface down, fd exhaustion).
    Failed(String),
}

/// Bounded-concurrency TCP connect engine.
pub struct ConnectEngine {
    connect_timeout: Duration,
    concurrency: usize,
}

impl ConnectEngine {
    pub fn new(connect_timeout: Duration, concurrency: usize) -> Self {
        Self {
            connect_timeout,
            concurrency: concurrency.max(1),
        }
    }

    /// Probe whether this mechanism is usable at all: can the process
    /// create a TCP socket? Returns the OS diagnostic when it cannot.
    pub fn capability(&self) -> Result<(), String> {
        TcpSocket::new_v4().map(drop).map_err(|e| e.to_string())
    }

    /// Sweep the given ports and return the open ones, sorted ascending.
    ///
    /// Ports that refuse or time out simply count as not open. If every
    /// single attempt fails at the socket layer instead, the sweep as a
    /// whole fails so the caller can fall back to another mechanism.
    pub async fn sweep(&self, target: Ipv4Addr, ports: &[Port]) -> ScanResult<Vec<u16>> {
        let total = ports.len();
        let connect_timeout = self.connect_timeout;

        let attempts: Vec<Attempt> = stream::iter(ports.to_vec())
            .map(|port| async move {
                let addr = SocketAddr::new(target.into(), port.as_u16());
                match timeout(connect_timeout, TcpStream::connect(addr)).await {
                    Ok(Ok(stream)) => {
                        drop(stream);
                        Attempt::Open(port.as_u16())
                    }
                    Ok(Err(e)) => {
                        let msg = e.to_string().to_lowercase();
                        if msg.contains("refused") {
                            Attempt::NotOpen
                        } else {
                            Attempt::Failed(e.to_string())
                        }
                    }
                    // No answer within the fast profile: treat as not open.
                    Err(_) => Attempt::NotOpen,
                }
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let mut open = Vec::new();
        let mut failures = 0usize;
        let mut first_failure = None;

        for attempt in attempts {
            match attempt {
                Attempt::Open(port) => open.push(port),
                Attempt::NotOpen => {}
                Attempt::Failed(reason) => {
                    failures += 1;
                    first_failure.get_or_insert(reason);
                }
            }
        }

        if failures == total && total > 0 {
            return Err(ScanError::ProbeFailed(
                first_failure.unwrap_or_else(|| "all connect attempts failed".to_string()),
            ));
        }

        open.sort_unstable();
        Ok(open)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;

    fn engine() -> ConnectEngine {
        ConnectEngine::new(Duration::from_millis(300), 64)
    }

    #[tokio::test]
    async fn test_capability_is_available() {
        assert!(engine().capability().is_ok());
    }

    #[tokio::test]
    async fn test_sweep_finds_listening_port() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let ports = vec![Port::new(port).unwrap()];
        let open = engine().sweep(Ipv4Addr::LOCALHOST, &ports).await.unwrap();
        assert_eq!(open, vec![port]);
    }

    #[tokio::test]
    async fn test_sweep_reports_closed_port_as_none_open() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let ports = vec![Port::new(port).unwrap()];
        let open = engine().sweep(Ipv4Addr::LOCALHOST, &ports).await.unwrap();
        assert!(open.is_empty());
    }

    #[tokio::test]
    async fn test_sweep_result_is_sorted() {
        let a = TcpListener::bind("127.0.0.1:0").unwrap();
        let b = TcpListener::bind("127.0.0.1:0").unwrap();
        let mut expected = vec![a.local_addr().unwrap().port(), b.local_addr().unwrap().port()];
        expected.sort_unstable();

        let ports: Vec<Port> = expected.iter().rev().map(|&p| Port::new(p).unwrap()).collect();
        let open = engine().sweep(Ipv4Addr::LOCALHOST, &ports).await.unwrap();
        assert_eq!(open, expected);
    }
}
