//! Scan range specification with CIDR parsing and local autodetection.
//!
//! A `ScanRange` is the IPv4 network block an ARP sweep covers. It can be
//! parsed from CIDR notation or inferred from the local interface address
//! assuming a /24 prefix.

use ipnetwork::Ipv4Network;
use std::fmt;
use std::net::{Ipv4Addr, UdpSocket};
use std::str::FromStr;

/// Error type for scan range parsing.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RangeError {
    #[error("invalid CIDR notation: {0}")]
    InvalidCidr(String),
    #[error("range too large: {0} addresses (max: {1})")]
    TooLarge(u64, u64),
}

/// An IPv4 CIDR block to sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanRange(Ipv4Network);

impl ScanRange {
    /// Maximum number of addresses a sweep may cover (a /16).
    pub const MAX_HOSTS: u64 = 65536;

    /// Parse a range from CIDR notation, e.g. "192.168.1.0/24".
    pub fn parse(s: &str) -> Result<Self, RangeError> {
        let network: Ipv4Network = s
            .trim()
            .parse()
            .map_err(|_| RangeError::InvalidCidr(s.to_string()))?;

        let size = network.size() as u64;
        if size > Self::MAX_HOSTS {
            return Err(RangeError::TooLarge(size, Self::MAX_HOSTS));
        }

        Ok(Self(network))
    }

    /// Detect the local segment by routing a UDP socket towards a public
    /// address (no traffic is sent) and assuming a /24 prefix, the common
    /// case on home and office networks. Returns None when the local
    /// address cannot be determined.
    pub fn detect_local() -> Option<Self> {
        let socket = UdpSocket::bind(("0.0.0.0", 0)).ok()?;
        socket.connect(("8.8.8.8", 80)).ok()?;
        let local = match socket.local_addr().ok()? {
            std::net::SocketAddr::V4(addr) => *addr.ip(),
            std::net::SocketAddr::V6(_) => return None,
        };

        let base = Ipv4Addr::new(local.octets()[0], local.octets()[1], local.octets()[2], 0);
        Ipv4Network::new(base, 24).ok().map(Self)
    }

    /// Whether an address falls inside this range.
    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        self.0.contains(addr)
    }

    /// Iterate the sweepable host addresses, skipping the network and
    /// broadcast addresses for prefixes shorter than /31.
    pub fn hosts(&self) -> impl Iterator<Item = Ipv4Addr> + '_ {
        let network = self.0;
        network.iter().filter(move |addr| {
            if network.prefix() < 31 {
                *addr != network.network() && *addr != network.broadcast()
            } else {
                true
            }
        })
    }

    /// Number of sweepable host addresses.
    pub fn host_count(&self) -> u64 {
        let size = self.0.size() as u64;
        if self.0.prefix() < 31 {
            size.saturating_sub(2)
        } else {
            size
        }
    }
}

impl FromStr for ScanRange {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ScanRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cidr() {
        let range = ScanRange::parse("192.168.1.0/24").unwrap();
        assert_eq!(range.to_string(), "192.168.1.0/24");
        assert_eq!(range.host_count(), 254);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(ScanRange::parse("not-a-range").is_err());
        assert!(ScanRange::parse("192.168.1.0/33").is_err());
    }

    #[test]
    fn test_too_large() {
        let result = ScanRange::parse("10.0.0.0/8");
        assert!(matches!(result, Err(RangeError::TooLarge(_, _))));
    }

    #[test]
    fn test_hosts_skip_network_and_broadcast() {
        let range = ScanRange::parse("10.0.0.0/30").unwrap();
        let hosts: Vec<Ipv4Addr> = range.hosts().collect();
        assert_eq!(
            hosts,
            vec!["10.0.0.1".parse::<Ipv4Addr>().unwrap(), "10.0.0.2".parse().unwrap()]
        );
    }

    #[test]
    fn test_contains() {
        let range = ScanRange::parse("192.168.1.0/24").unwrap();
        assert!(range.contains("192.168.1.42".parse().unwrap()));
        assert!(!range.contains("192.168.2.1".parse().unwrap()));
    }
}
