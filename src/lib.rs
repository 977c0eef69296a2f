//! # Netwatch - Local Network Host Discovery and Port Probing
//!
//! Netwatch sweeps a local network segment over ARP, enriches the
//! discovered hosts with reverse-DNS names and hardware vendor labels,
//! probes open TCP ports, and exports results to CSV.
//!
//! ## Features
//!
//! - **ARP Discovery**: raw-socket sweep of a CIDR range (requires root)
//! - **Identity Enrichment**: best-effort reverse DNS and OUI vendor lookup
//! - **Two-Stage Port Probe**: in-process TCP connect sweep with an
//!   automatic fallback to an external `nmap` subprocess
//! - **Session Orchestration**: a state machine coordinating worker tasks
//!   over a message channel, safe for interactive front ends
//! - **CSV Export**: one row per host, stable header
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use netwatch::scanner::{ConnectEngine, FallbackProber, NmapRunner, Prober};
//! use netwatch::types::PortSpec;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     let prober = FallbackProber::new(
//!         ConnectEngine::new(Duration::from_millis(800), 256),
//!         NmapRunner::new("nmap", Duration::from_secs(180)),
//!     );
//!
//!     let open = prober
//!         .probe("192.168.1.10".parse().unwrap(), &PortSpec::default_range())
//!         .await
//!         .unwrap();
//!     println!("open ports: {:?}", open);
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`types`] - Host records, MAC addresses, port and range specifications
//! - [`scanner`] - Discovery and probe mechanisms behind swappable traits
//! - [`session`] - The scan session state machine and worker dispatch
//! - [`enrich`] / [`vendors`] - Identity enrichment
//! - [`export`] - CSV export
//! - [`config`] - Settings and paths
//! - [`error`] - Error types per concern

pub mod cli;
pub mod config;
pub mod enrich;
pub mod error;
pub mod export;
pub mod output;
pub mod privilege;
pub mod scanner;
pub mod session;
pub mod types;
pub mod vendors;

// Re-export commonly used types
pub use error::{CliError, ExportError, ScanError};
pub use session::{ScanSession, SessionEvent, SessionState};
pub use types::{HostRecord, MacAddress, Port, PortSpec, ScanRange};
