//! Subprocess fallback probe: `nmap -oG -`.
//!
//! Invoked when the in-process connect sweep is unavailable or errors.
//! The subprocess is bounded by a hard wall-clock timeout because there is
//! no cancellation channel once it starts; `kill_on_drop` reaps it when the
//! timeout fires.

use crate::error::{ScanError, ScanResult};
use crate::types::PortSpec;
use std::net::Ipv4Addr;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// Default wall-clock bound for one subprocess invocation.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(180);

/// Runner for the external probing tool.
pub struct NmapRunner {
    binary: String,
    timeout: Duration,
}

impl NmapRunner {
    pub fn new(binary: impl Into<String>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            timeout,
        }
    }

    /// Scan `target` over `ports`, requesting grepable output and parsing
    /// the open entries out of it.
    pub async fn run(&self, target: Ipv4Addr, ports: &PortSpec) -> ScanResult<Vec<u16>> {
        let mut command = Command::new(&self.binary);
        command
            .arg("-p")
            .arg(ports.to_string())
            .arg("-T4")
            .arg(target.to_string())
            .arg("-oG")
            .arg("-")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!(binary = %self.binary, %target, ports = %ports, "spawning fallback probe");

        let output = match tokio::time::timeout(self.timeout, command.output()).await {
            Err(_) => return Err(ScanError::ProbeTimeout),
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ScanError::ToolNotFound(self.binary.clone()))
            }
            Ok(Err(e)) => return Err(ScanError::ProbeFailed(e.to_string())),
            Ok(Ok(output)) => output,
        };

        if !output.status.success() {
            let diagnostic = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(ScanError::ProbeFailed(diagnostic));
        }

        Ok(parse_grepable(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// Parse grepable (`-oG`) output into the open port numbers, in the order
/// the tool listed them.
///
/// Port entries look like `22/open/tcp//ssh///` and are comma-separated
/// after a `Ports:` marker. Each entry's own state field decides whether it
/// counts; only all-digit port tokens are accepted, anything malformed is
/// skipped. A line with no open entries contributes nothing, which is how
/// "scanned, none open" stays distinct from a failed probe.
pub fn parse_grepable(output: &str) -> Vec<u16> {
    let mut open_ports = Vec::new();

    for line in output.lines() {
        let Some((_, rest)) = line.split_once("Ports:") else {
            continue;
        };
        // The port list ends at the tab before the next section.
        let list = rest.split('\t').next().unwrap_or("");

        for entry in list.split(',') {
            let mut fields = entry.trim().split('/');
            let port_token = fields.next().unwrap_or("");
            let state = fields.next().unwrap_or("");

            if state != "open" {
                continue;
            }
            if port_token.is_empty() || !port_token.bytes().all(|b| b.is_ascii_digit()) {
                continue;
            }
            if let Ok(port) = port_token.parse::<u16>() {
                open_ports.push(port);
            }
        }
    }

    open_ports
}
