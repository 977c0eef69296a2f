//! Scan session orchestration.
//!
//! A `ScanSession` owns the host-record list and sequences discovery,
//! enrichment, and probing. Each in-flight operation is one worker task
//! that delivers a single terminal event back over a channel; the session
//! applies events on its own execution context, so it is the only writer
//! of the shared list and no locking is needed.
//!
//! State machine: `Idle → Discovering → Discovered → (Idle | Probing →
//! Discovered)`. Discovery is gated on the privilege predicate; probing is
//! gated on a selection of exactly one previously discovered host.

use crate::enrich;
use crate::error::{ScanError, ScanResult};
use crate::privilege;
use crate::scanner::{Discoverer, Prober};
use crate::types::{merge_probe_result, HostRecord, PortSpec, ScanRange};
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info};

const DEFAULT_DNS_TIMEOUT: Duration = Duration::from_secs(2);

/// Where a session currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No results held, nothing in flight.
    Idle,
    /// A discovery worker is running.
    Discovering,
    /// A host list is held; probing and re-discovery are allowed.
    Discovered,
    /// A probe worker is running against one selected host.
    Probing,
}

/// Terminal message a worker delivers back to the session.
#[derive(Debug)]
pub enum SessionEvent {
    DiscoveryFinished(ScanResult<Vec<HostRecord>>),
    ProbeFinished {
        target: Ipv4Addr,
        outcome: ScanResult<Vec<u16>>,
    },
}

/// Orchestrates discovery and probing over injected mechanisms.
pub struct ScanSession {
    state: SessionState,
    hosts: Vec<HostRecord>,
    discoverer: Arc<dyn Discoverer>,
    prober: Arc<dyn Prober>,
    privileged: Box<dyn Fn() -> bool + Send + Sync>,
    dns_timeout: Duration,
    events_tx: mpsc::UnboundedSender<SessionEvent>,
    events_rx: mpsc::UnboundedReceiver<SessionEvent>,
}

impl ScanSession {
    /// Create a session over the given mechanisms, using the process-level
    /// privilege check.
    pub fn new(discoverer: Arc<dyn Discoverer>, prober: Arc<dyn Prober>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            state: SessionState::Idle,
            hosts: Vec::new(),
            discoverer,
            prober,
            privileged: Box::new(privilege::is_elevated),
            dns_timeout: DEFAULT_DNS_TIMEOUT,
            events_tx,
            events_rx,
        }
    }

    /// Substitute the privilege predicate.
    pub fn with_privilege_check(
        mut self,
        check: impl Fn() -> bool + Send + Sync + 'static,
    ) -> Self {
        self.privileged = Box::new(check);
        self
    }

    /// Override the reverse-DNS timeout used during enrichment.
    pub fn with_dns_timeout(mut self, timeout: Duration) -> Self {
        self.dns_timeout = timeout;
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The currently held host list.
    pub fn hosts(&self) -> &[HostRecord] {
        &self.hosts
    }

    /// Drop all results and return to idle. Only legal when nothing is in
    /// flight.
    pub fn reset(&mut self) -> ScanResult<()> {
        match self.state {
            SessionState::Discovering | SessionState::Probing => Err(ScanError::SessionBusy),
            _ => {
                self.hosts.clear();
                self.state = SessionState::Idle;
                Ok(())
            }
        }
    }

    /// Kick off a discovery worker for `range`.
    ///
    /// Fails with `InsufficientPrivilege` before the discovery mechanism is
    /// touched when the privilege predicate says no, and with `SessionBusy`
    /// while another operation is in flight. Prior results stay visible
    /// until the new run succeeds.
    pub fn start_discovery(&mut self, range: ScanRange) -> ScanResult<()> {
        match self.state {
            SessionState::Discovering | SessionState::Probing => return Err(ScanError::SessionBusy),
            SessionState::Idle | SessionState::Discovered => {}
        }

        if !(self.privileged)() {
            return Err(ScanError::InsufficientPrivilege);
        }

        info!(%range, "starting discovery");
        self.state = SessionState::Discovering;

        let discoverer = Arc::clone(&self.discoverer);
        let dns_timeout = self.dns_timeout;
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = match discoverer.discover(range).await {
                Ok(mut hosts) => {
                    enrich::enrich_hosts(&mut hosts, dns_timeout).await;
                    Ok(hosts)
                }
                Err(e) => Err(e),
            };
            let _ = tx.send(SessionEvent::DiscoveryFinished(result));
        });

        Ok(())
    }

    /// Kick off a probe worker against one previously discovered host.
    ///
    /// A target that is not in the held list (including any target while
    /// the list is empty) reports `NoTargetSelected`.
    pub fn start_probe(&mut self, target: Ipv4Addr, ports: PortSpec) -> ScanResult<()> {
        match self.state {
            SessionState::Discovering | SessionState::Probing => return Err(ScanError::SessionBusy),
            SessionState::Idle | SessionState::Discovered => {}
        }

        if !self.hosts.iter().any(|h| h.ip == target) {
            return Err(ScanError::NoTargetSelected);
        }

        info!(%target, %ports, "starting probe");
        self.state = SessionState::Probing;

        let prober = Arc::clone(&self.prober);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let outcome = prober.probe(target, &ports).await;
            let _ = tx.send(SessionEvent::ProbeFinished { target, outcome });
        });

        Ok(())
    }

    /// Wait for the next worker event and apply it to the session state.
    ///
    /// Returns None only if the session's own sender has been dropped,
    /// which cannot happen while `self` is alive; callers may treat None as
    /// shutdown.
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        let event = self.events_rx.recv().await?;
        self.apply(&event);
        Some(event)
    }

    /// Apply a terminal event: replace or merge results, restore the state
    /// machine. Failures leave prior results untouched.
    fn apply(&mut self, event: &SessionEvent) {
        match event {
            SessionEvent::DiscoveryFinished(Ok(hosts)) => {
                debug!(count = hosts.len(), "discovery finished");
                self.hosts = hosts.clone();
                self.state = SessionState::Discovered;
            }
            SessionEvent::DiscoveryFinished(Err(e)) => {
                debug!(error = %e, "discovery failed");
                self.state = if self.hosts.is_empty() {
                    SessionState::Idle
                } else {
                    SessionState::Discovered
                };
            }
            SessionEvent::ProbeFinished {
                target,
                outcome: Ok(ports),
            } => {
                debug!(%target, open = ports.len(), "probe finished");
                merge_probe_result(&mut self.hosts, *target, ports);
                self.state = SessionState::Discovered;
            }
            SessionEvent::ProbeFinished {
                target,
                outcome: Err(e),
            } => {
                // The target's result is absent, not "zero open ports".
                debug!(%target, error = %e, "probe failed");
                self.state = SessionState::Discovered;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MacAddress;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MockDiscoverer {
        hosts: Vec<HostRecord>,
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    #[async_trait]
    impl Discoverer for MockDiscoverer {
        async fn discover(&self, _range: ScanRange) -> ScanResult<Vec<HostRecord>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(ScanError::DiscoveryFailed("interface down".to_string()))
            } else {
                Ok(self.hosts.clone())
            }
        }
    }

    struct MockProber {
        open_ports: Vec<u16>,
    }

    #[async_trait]
    impl Prober for MockProber {
        async fn probe(&self, _target: Ipv4Addr, _ports: &PortSpec) -> ScanResult<Vec<u16>> {
            Ok(self.open_ports.clone())
        }
    }

    fn record(ip: &str, mac: &str) -> HostRecord {
        HostRecord::new(ip.parse().unwrap(), mac.parse::<MacAddress>().unwrap())
    }

    fn two_host_session(calls: Arc<AtomicUsize>, privileged: bool) -> ScanSession {
        let discoverer = Arc::new(MockDiscoverer {
            hosts: vec![
                record("10.0.0.5", "AA:BB:CC:00:11:22"),
                record("10.0.0.9", "00:0C:29:11:22:33"),
            ],
            calls,
            fail: false,
        });
        let prober = Arc::new(MockProber {
            open_ports: vec![22],
        });
        ScanSession::new(discoverer, prober)
            .with_privilege_check(move || privileged)
            .with_dns_timeout(Duration::from_millis(5))
    }

    #[tokio::test]
    async fn test_privilege_failure_suppresses_discovery() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut session = two_host_session(Arc::clone(&calls), false);

        let result = session.start_discovery(ScanRange::parse("10.0.0.0/24").unwrap());
        assert!(matches!(result, Err(ScanError::InsufficientPrivilege)));
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_discover_enrich_probe_merge_end_to_end() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut session = two_host_session(calls, true);

        session
            .start_discovery(ScanRange::parse("10.0.0.0/24").unwrap())
            .unwrap();
        assert_eq!(session.state(), SessionState::Discovering);

        let event = session.next_event().await.unwrap();
        assert!(matches!(event, SessionEvent::DiscoveryFinished(Ok(_))));
        assert_eq!(session.state(), SessionState::Discovered);

        let hosts = session.hosts();
        assert_eq!(hosts.len(), 2);
        assert_eq!(hosts[0].vendor, "unknown");
        assert_eq!(hosts[1].vendor, "VMware, Inc.");

        session
            .start_probe("10.0.0.9".parse().unwrap(), "22,80".parse().unwrap())
            .unwrap();
        assert_eq!(session.state(), SessionState::Probing);

        let event = session.next_event().await.unwrap();
        assert!(matches!(
            event,
            SessionEvent::ProbeFinished { outcome: Ok(_), .. }
        ));

        let hosts = session.hosts();
        assert_eq!(hosts[1].open_ports, vec![22]);
        assert!(hosts[0].open_ports.is_empty());
        assert_eq!(session.state(), SessionState::Discovered);
    }

    #[tokio::test]
    async fn test_probe_without_discovered_target_reports_no_selection() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut session = two_host_session(Arc::clone(&calls), true);

        // Nothing discovered yet.
        let result = session.start_probe("10.0.0.9".parse().unwrap(), PortSpec::default_range());
        assert!(matches!(result, Err(ScanError::NoTargetSelected)));

        // Discovered, but the target is not in the list.
        session
            .start_discovery(ScanRange::parse("10.0.0.0/24").unwrap())
            .unwrap();
        session.next_event().await.unwrap();

        let result = session.start_probe("192.168.1.1".parse().unwrap(), PortSpec::default_range());
        assert!(matches!(result, Err(ScanError::NoTargetSelected)));
    }

    #[tokio::test]
    async fn test_second_discovery_while_in_flight_is_refused() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut session = two_host_session(calls, true);
        let range = ScanRange::parse("10.0.0.0/24").unwrap();

        session.start_discovery(range).unwrap();
        let result = session.start_discovery(range);
        assert!(matches!(result, Err(ScanError::SessionBusy)));

        // Drain so the worker result does not leak into other assertions.
        session.next_event().await.unwrap();
    }

    #[tokio::test]
    async fn test_discovery_failure_returns_to_idle_without_results() {
        let discoverer = Arc::new(MockDiscoverer {
            hosts: Vec::new(),
            calls: Arc::new(AtomicUsize::new(0)),
            fail: true,
        });
        let prober = Arc::new(MockProber { open_ports: vec![] });
        let mut session = ScanSession::new(discoverer, prober)
            .with_privilege_check(|| true)
            .with_dns_timeout(Duration::from_millis(5));

        session
            .start_discovery(ScanRange::parse("10.0.0.0/24").unwrap())
            .unwrap();
        let event = session.next_event().await.unwrap();
        assert!(matches!(event, SessionEvent::DiscoveryFinished(Err(_))));
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.hosts().is_empty());
    }

    #[tokio::test]
    async fn test_reset_clears_results() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut session = two_host_session(calls, true);

        session
            .start_discovery(ScanRange::parse("10.0.0.0/24").unwrap())
            .unwrap();
        session.next_event().await.unwrap();
        assert!(!session.hosts().is_empty());

        session.reset().unwrap();
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.hosts().is_empty());
    }
}
