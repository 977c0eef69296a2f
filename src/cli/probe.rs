//! Probe subcommand implementation.

use crate::config::AppSettings;
use crate::error::{CliError, CliResult};
use crate::output::{self, ProbeReport};
use crate::scanner::Prober;
use crate::types::PortSpec;
use clap::Parser;
use std::net::Ipv4Addr;

/// Probe a host for open TCP ports.
#[derive(Parser, Debug)]
pub struct ProbeCommand {
    /// Target IPv4 address
    #[arg(value_name = "TARGET")]
    pub target: String,

    /// Ports to probe (e.g. "22,80,443" or "1-1024"); defaults to the
    /// configured range
    #[arg(short, long, value_name = "SPEC")]
    pub ports: Option<String>,
}

impl ProbeCommand {
    /// Execute the probe command.
    pub async fn execute(&self, quiet: bool) -> CliResult<()> {
        let settings = AppSettings::load()?;

        let target: Ipv4Addr = self
            .target
            .parse()
            .map_err(|_| CliError::Other(format!("invalid target address: {}", self.target)))?;

        let spec: PortSpec = self
            .ports
            .as_deref()
            .unwrap_or(&settings.default_ports)
            .parse()?;

        if !quiet {
            output::print_info(&format!("probing {} over ports {}", target, spec));
        }

        let prober = super::build_prober(&settings);
        let open_ports = prober.probe(target, &spec).await?;

        output::print_probe_json(&ProbeReport { ip: target, open_ports })?;
        Ok(())
    }
}
