//! Identity enrichment: reverse DNS and vendor labels.
//!
//! Both lookups are best-effort enhancements over already-discovered
//! records. Failures are absorbed here and never reach the caller; a field
//! that cannot be determined keeps its sentinel value.

use crate::types::HostRecord;
use crate::vendors;
use std::net::IpAddr;
use std::time::Duration;
use tracing::debug;
use trust_dns_resolver::config::{ResolverConfig, ResolverOpts};
use trust_dns_resolver::TokioAsyncResolver;

/// Attempt a reverse-DNS lookup for an address, bounded by `timeout`.
///
/// Returns None on any failure: no resolver, no PTR record, or the timeout
/// elapsing. The failure itself is only logged.
pub async fn reverse_lookup(ip: IpAddr, timeout: Duration) -> Option<String> {
    let mut opts = ResolverOpts::default();
    opts.timeout = timeout;
    opts.attempts = 1;

    let resolver = TokioAsyncResolver::tokio(ResolverConfig::default(), opts);

    let lookup = match tokio::time::timeout(timeout, resolver.reverse_lookup(ip)).await {
        Ok(Ok(lookup)) => lookup,
        Ok(Err(e)) => {
            debug!(%ip, error = %e, "reverse lookup failed");
            return None;
        }
        Err(_) => {
            debug!(%ip, "reverse lookup timed out");
            return None;
        }
    };

    lookup
        .iter()
        .next()
        .map(|name| name.to_string().trim_end_matches('.').to_string())
}

/// Fill hostname and vendor fields for every record in place.
///
/// Vendor lookups are synchronous table hits; reverse-DNS lookups run
/// concurrently, one per host, each with its own timeout. Records keep
/// their sentinels wherever a lookup comes back empty.
pub async fn enrich_hosts(hosts: &mut [HostRecord], dns_timeout: Duration) {
    for host in hosts.iter_mut() {
        host.vendor = vendors::vendor_for_mac(&host.mac).to_string();
    }

    let lookups = hosts
        .iter()
        .map(|h| reverse_lookup(IpAddr::V4(h.ip), dns_timeout));
    let names = futures::future::join_all(lookups).await;

    for (host, name) in hosts.iter_mut().zip(names) {
        if let Some(name) = name {
            host.hostname = name;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MacAddress, UNRESOLVED};

    fn record(ip: &str, mac: &str) -> HostRecord {
        HostRecord::new(ip.parse().unwrap(), mac.parse::<MacAddress>().unwrap())
    }

    #[tokio::test]
    async fn test_enrich_fills_vendor_and_keeps_hostname_sentinel_on_failure() {
        // TEST-NET-1 addresses have no PTR records; with a tiny timeout the
        // lookup cannot succeed, which is exactly the degraded path.
        let mut hosts = vec![record("192.0.2.1", "00:0C:29:11:22:33")];
        enrich_hosts(&mut hosts, Duration::from_millis(10)).await;

        assert_eq!(hosts[0].vendor, "VMware, Inc.");
        assert_eq!(hosts[0].hostname, UNRESOLVED);
    }

    #[tokio::test]
    async fn test_reverse_lookup_absorbs_timeout() {
        let result = reverse_lookup("192.0.2.2".parse().unwrap(), Duration::from_millis(5)).await;
        assert!(result.is_none());
    }
}
