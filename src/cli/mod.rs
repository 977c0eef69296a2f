//! CLI subcommand definitions and handlers.
//!
//! Git-like subcommand architecture:
//! - `netwatch discover [--cidr RANGE]` - ARP host discovery
//! - `netwatch probe <TARGET>` - port probe of one host
//! - `netwatch watch` - interactive scan session

mod discover;
mod probe;
mod watch;

pub use discover::DiscoverCommand;
pub use probe::ProbeCommand;
pub use watch::WatchCommand;

use crate::config::AppSettings;
use crate::scanner::{ArpDiscoverer, ConnectEngine, FallbackProber, NmapRunner};
use clap::{Parser, Subcommand};

/// Netwatch - local network host discovery and port probing.
///
/// Discovers live hosts on the local segment via ARP, enriches them with
/// reverse-DNS names and hardware vendor labels, probes open TCP ports,
/// and exports results to CSV.
#[derive(Parser, Debug)]
#[command(name = "netwatch")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Local network host discovery and port probing", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Discover hosts on a network range via ARP (requires root)
    #[command(alias = "d")]
    Discover(DiscoverCommand),

    /// Probe a host for open TCP ports
    #[command(alias = "p")]
    Probe(ProbeCommand),

    /// Run an interactive scan session
    #[command(alias = "w")]
    Watch(WatchCommand),
}

/// Output format for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON structured output
    Json,
    /// Human-readable table
    Plain,
}

/// Build the production discovery mechanism from settings.
fn build_discoverer(settings: &AppSettings) -> ArpDiscoverer {
    ArpDiscoverer::new(settings.arp_wait())
}

/// Build the production probe (connect sweep with subprocess fallback)
/// from settings.
fn build_prober(settings: &AppSettings) -> FallbackProber {
    FallbackProber::new(
        ConnectEngine::new(settings.connect_timeout(), settings.connect_concurrency),
        NmapRunner::new(settings.nmap_binary.clone(), settings.nmap_timeout()),
    )
}
