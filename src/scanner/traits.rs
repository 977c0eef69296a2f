//! Scan mechanism abstractions.
//!
//! The session drives discovery and probing through these traits so the
//! mechanisms stay swappable and the orchestration is testable without
//! touching the network.

use crate::error::ScanResult;
use crate::types::{HostRecord, PortSpec, ScanRange};
use async_trait::async_trait;
use std::net::Ipv4Addr;

/// A host discovery mechanism.
///
/// Returns one record per responding host, address and MAC only, in reply
/// order. Callers must treat the result as a set. Either the complete host
/// list comes back or the call fails; a truncated list is never returned
/// silently.
#[async_trait]
pub trait Discoverer: Send + Sync {
    async fn discover(&self, range: ScanRange) -> ScanResult<Vec<HostRecord>>;
}

/// A port probing mechanism.
///
/// Returns the open ports found on the target. An empty vector means
/// "scanned, none open"; failures mean the target's result is absent,
/// which callers must not conflate with zero open ports.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, target: Ipv4Addr, ports: &PortSpec) -> ScanResult<Vec<u16>>;
}
