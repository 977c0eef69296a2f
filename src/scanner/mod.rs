//! Scan mechanisms: ARP discovery and the two-stage port probe.
//!
//! Probing tries the in-process connect sweep first and falls back to the
//! external tool. The choice is made once per probe call from an explicit
//! tagged outcome rather than being buried in error handling.

pub mod arp;
pub mod connect;
pub mod nmap;
pub mod traits;

pub use arp::ArpDiscoverer;
pub use connect::ConnectEngine;
pub use nmap::NmapRunner;
pub use traits::{Discoverer, Prober};

use crate::error::{ScanError, ScanResult};
use crate::types::PortSpec;
use async_trait::async_trait;
use std::net::Ipv4Addr;
use tracing::warn;

/// Outcome of attempting the primary probing mechanism. Drives the
/// fallback branch explicitly.
enum PrimaryAttempt {
    Unavailable(String),
    Error(ScanError),
    Succeeded(Vec<u16>),
}

/// Production [`Prober`]: connect sweep with subprocess fallback.
pub struct FallbackProber {
    connect: ConnectEngine,
    nmap: NmapRunner,
}

impl FallbackProber {
    pub fn new(connect: ConnectEngine, nmap: NmapRunner) -> Self {
        Self { connect, nmap }
    }

    async fn try_primary(&self, target: Ipv4Addr, ports: &PortSpec) -> PrimaryAttempt {
        if let Err(reason) = self.connect.capability() {
            return PrimaryAttempt::Unavailable(reason);
        }

        match self.connect.sweep(target, &ports.to_ports()).await {
            Ok(open) => PrimaryAttempt::Succeeded(open),
            Err(e) => PrimaryAttempt::Error(e),
        }
    }
}

#[async_trait]
impl Prober for FallbackProber {
    async fn probe(&self, target: Ipv4Addr, ports: &PortSpec) -> ScanResult<Vec<u16>> {
        match self.try_primary(target, ports).await {
            PrimaryAttempt::Succeeded(open) => Ok(open),
            PrimaryAttempt::Unavailable(reason) => {
                warn!(%target, %reason, "connect sweep unavailable, falling back to subprocess");
                self.nmap.run(target, ports).await
            }
            PrimaryAttempt::Error(e) => {
                warn!(%target, error = %e, "connect sweep failed, falling back to subprocess");
                self.nmap.run(target, ports).await
            }
        }
    }
}
