//! Output formatting utilities.
//!
//! Console-styled status lines, the plain host table, and the structured
//! JSON shapes the CLI prints.

use crate::types::HostRecord;
use console::style;
use serde::Serialize;
use std::io::{self, Write};
use std::net::Ipv4Addr;

/// Structured result of a probe, as printed by `netwatch probe`.
#[derive(Debug, Serialize)]
pub struct ProbeReport {
    pub ip: Ipv4Addr,
    pub open_ports: Vec<u16>,
}

pub fn print_info(msg: &str) {
    eprintln!("{} {}", style("[+]").green().bold(), msg);
}

pub fn print_success(msg: &str) {
    eprintln!("{} {}", style("[✓]").green().bold(), msg);
}

pub fn print_warning(msg: &str) {
    eprintln!("{} {}", style("[*]").yellow().bold(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("[-]").red().bold(), msg);
}

/// Print the host list as pretty JSON, preserving record field order.
pub fn print_hosts_json(hosts: &[HostRecord]) -> io::Result<()> {
    let json = serde_json::to_string_pretty(hosts)?;
    println!("{}", json);
    Ok(())
}

/// Print a probe report as pretty JSON.
pub fn print_probe_json(report: &ProbeReport) -> io::Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    println!("{}", json);
    Ok(())
}

/// Print the host list as a numbered plain-text table.
pub fn print_host_table(hosts: &[HostRecord]) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if hosts.is_empty() {
        writeln!(out, "  {}", style("No hosts discovered.").dim())?;
        return Ok(());
    }

    writeln!(
        out,
        "  {:>3}  {:<15}  {:<17}  {:<24}  {:<24}  {}",
        style("#").bold(),
        style("IP").bold(),
        style("MAC").bold(),
        style("HOSTNAME").bold(),
        style("VENDOR").bold(),
        style("OPEN PORTS").bold()
    )?;
    writeln!(
        out,
        "  {}",
        style("─".repeat(100)).dim()
    )?;

    for (i, host) in hosts.iter().enumerate() {
        writeln!(
            out,
            "  {:>3}  {:<15}  {:<17}  {:<24}  {:<24}  {}",
            i,
            host.ip,
            host.mac,
            truncate(&host.hostname, 24),
            truncate(&host.vendor, 24),
            host.ports_display()
        )?;
    }

    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_leaves_short_strings() {
        assert_eq!(truncate("router.local", 24), "router.local");
    }

    #[test]
    fn test_truncate_shortens_long_strings() {
        let long = "a".repeat(40);
        let truncated = truncate(&long, 24);
        assert_eq!(truncated.chars().count(), 24);
        assert!(truncated.ends_with('…'));
    }

    #[test]
    fn test_probe_report_key_order() {
        let report = ProbeReport {
            ip: "10.0.0.9".parse().unwrap(),
            open_ports: vec![22],
        };
        let json = serde_json::to_string(&report).unwrap();
        assert_eq!(json, r#"{"ip":"10.0.0.9","open_ports":[22]}"#);
    }
}
