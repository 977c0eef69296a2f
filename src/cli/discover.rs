//! Discover subcommand implementation.

use crate::cli::OutputFormat;
use crate::config::AppSettings;
use crate::error::{CliError, CliResult};
use crate::export;
use crate::output;
use crate::session::{ScanSession, SessionEvent};
use crate::types::ScanRange;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

/// Discover hosts on a network range via ARP.
#[derive(Parser, Debug)]
pub struct DiscoverCommand {
    /// Network range in CIDR notation (e.g. 192.168.1.0/24);
    /// autodetected from the local interface when omitted
    #[arg(long, value_name = "RANGE")]
    pub cidr: Option<String>,

    /// Output format for results
    #[arg(short, long, value_enum, default_value = "json")]
    pub output: OutputFormat,

    /// Also export the results to a CSV file
    #[arg(long, value_name = "FILE")]
    pub export: Option<PathBuf>,
}

impl DiscoverCommand {
    /// Execute the discover command.
    pub async fn execute(&self, quiet: bool) -> CliResult<()> {
        let settings = AppSettings::load()?;

        let range = match &self.cidr {
            Some(s) => ScanRange::parse(s)?,
            None => ScanRange::detect_local().ok_or_else(|| {
                CliError::Other(
                    "could not detect the local network range; pass --cidr".to_string(),
                )
            })?,
        };

        if !quiet {
            output::print_info(&format!("ARP sweep of {}", range));
        }

        let mut session = ScanSession::new(
            Arc::new(super::build_discoverer(&settings)),
            Arc::new(super::build_prober(&settings)),
        )
        .with_dns_timeout(settings.dns_timeout());

        session.start_discovery(range)?;

        let hosts = match session.next_event().await {
            Some(SessionEvent::DiscoveryFinished(Ok(hosts))) => hosts,
            Some(SessionEvent::DiscoveryFinished(Err(e))) => return Err(e.into()),
            _ => return Err(CliError::Other("discovery worker vanished".to_string())),
        };

        if !quiet {
            output::print_info(&format!("{} host(s) found", hosts.len()));
        }

        match self.output {
            OutputFormat::Json => output::print_hosts_json(&hosts)?,
            OutputFormat::Plain => output::print_host_table(&hosts)?,
        }

        if let Some(path) = &self.export {
            export::export_csv(&hosts, path)?;
            if !quiet {
                output::print_success(&format!("exported to {}", path.display()));
            }
        }

        Ok(())
    }
}
