//! Interactive scan session.
//!
//! A line-driven surface over [`ScanSession`]: detect the local range,
//! sweep it, select a host by its row number, probe it, export the table.
//! A spinner runs while a worker is in flight; errors are printed and the
//! previously held results stay on screen.

use crate::config::AppSettings;
use crate::error::CliResult;
use crate::export;
use crate::output;
use crate::session::{ScanSession, SessionEvent, SessionState};
use crate::types::{PortSpec, ScanRange};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "commands: detect | scan [CIDR] | list | probe <#> [PORTS] | export <FILE> | help | quit";

/// Run an interactive scan session.
#[derive(Parser, Debug)]
pub struct WatchCommand {}

impl WatchCommand {
    /// Execute the interactive session loop.
    pub async fn execute(&self, _quiet: bool) -> CliResult<()> {
        let settings = AppSettings::load()?;

        let mut session = ScanSession::new(
            Arc::new(super::build_discoverer(&settings)),
            Arc::new(super::build_prober(&settings)),
        )
        .with_dns_timeout(settings.dns_timeout());

        output::print_info(HELP);

        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            eprint!("netwatch> ");

            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                // EOF or a broken terminal ends the session.
                _ => break,
            };

            let mut words = line.split_whitespace();
            let Some(command) = words.next() else {
                continue;
            };
            let args: Vec<&str> = words.collect();

            match command {
                "detect" => match ScanRange::detect_local() {
                    Some(range) => output::print_info(&format!("local range: {}", range)),
                    None => output::print_warning("could not detect the local range"),
                },
                "scan" => self.run_scan(&mut session, &args).await,
                "probe" => self.run_probe(&mut session, &settings, &args).await,
                "list" => {
                    let _ = output::print_host_table(session.hosts());
                }
                "export" => match args.first() {
                    Some(file) => match export::export_csv(session.hosts(), Path::new(file)) {
                        Ok(()) => output::print_success(&format!("exported to {}", file)),
                        Err(e) => output::print_error(&e.to_string()),
                    },
                    None => output::print_warning("usage: export <FILE>"),
                },
                "help" => output::print_info(HELP),
                "quit" | "exit" => break,
                _ => output::print_warning(HELP),
            }
        }

        Ok(())
    }

    async fn run_scan(&self, session: &mut ScanSession, args: &[&str]) {
        let range = match args.first() {
            Some(s) => match ScanRange::parse(s) {
                Ok(range) => range,
                Err(e) => {
                    output::print_error(&e.to_string());
                    return;
                }
            },
            None => match ScanRange::detect_local() {
                Some(range) => range,
                None => {
                    output::print_warning("could not detect the local range; use: scan <CIDR>");
                    return;
                }
            },
        };

        if let Err(e) = session.start_discovery(range) {
            output::print_error(&e.to_string());
            return;
        }

        let spinner = spinner(&format!("sweeping {}", range));
        let event = session.next_event().await;
        spinner.finish_and_clear();

        match event {
            Some(SessionEvent::DiscoveryFinished(Ok(hosts))) => {
                output::print_success(&format!("{} host(s) found", hosts.len()));
                let _ = output::print_host_table(session.hosts());
            }
            Some(SessionEvent::DiscoveryFinished(Err(e))) => output::print_error(&e.to_string()),
            _ => output::print_error("discovery worker vanished"),
        }
    }

    async fn run_probe(&self, session: &mut ScanSession, settings: &AppSettings, args: &[&str]) {
        if session.state() != SessionState::Discovered {
            output::print_warning("nothing discovered yet; run scan first");
            return;
        }

        let index: usize = match args.first().and_then(|s| s.parse().ok()) {
            Some(i) => i,
            None => {
                output::print_warning("usage: probe <#> [PORTS]");
                return;
            }
        };

        let Some(host) = session.hosts().get(index) else {
            output::print_warning(&format!("no host at row {}", index));
            return;
        };
        let target = host.ip;

        let spec: PortSpec = match args.get(1).copied().unwrap_or(&settings.default_ports).parse() {
            Ok(spec) => spec,
            Err(e) => {
                output::print_error(&e.to_string());
                return;
            }
        };

        if let Err(e) = session.start_probe(target, spec) {
            output::print_error(&e.to_string());
            return;
        }

        let spinner = spinner(&format!("probing {}", target));
        let event = session.next_event().await;
        spinner.finish_and_clear();

        match event {
            Some(SessionEvent::ProbeFinished {
                target,
                outcome: Ok(ports),
            }) => {
                output::print_success(&format!("{}: {} open port(s)", target, ports.len()));
                let _ = output::print_host_table(session.hosts());
            }
            Some(SessionEvent::ProbeFinished {
                outcome: Err(e), ..
            }) => output::print_error(&e.to_string()),
            _ => output::print_error("probe worker vanished"),
        }
    }
}

fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}
