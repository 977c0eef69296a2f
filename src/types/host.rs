//! The per-host record shape shared by discovery, enrichment, and probing.
//!
//! A record is created by discovery with its two immutable identifiers
//! (IPv4 address and MAC address); hostname, vendor, and open ports are
//! filled in later by independent operations keyed on the address.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

/// Sentinel for a hostname that could not be resolved.
pub const UNRESOLVED: &str = "unresolved";

/// Sentinel for a MAC prefix with no vendor table entry.
pub const UNKNOWN_VENDOR: &str = "unknown";

/// Error type for MAC address parsing.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid MAC address: {0}")]
pub struct MacParseError(pub String);

/// A link-layer (MAC) address.
///
/// Parses colon- or dash-separated hex case-insensitively; always displays
/// as canonical uppercase colon-hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    pub const fn new(octets: [u8; 6]) -> Self {
        Self(octets)
    }

    pub const fn octets(&self) -> [u8; 6] {
        self.0
    }

    /// The first three octets in canonical form, e.g. "00:0C:29". This is
    /// the organizationally unique identifier the vendor table is keyed by.
    pub fn oui_prefix(&self) -> String {
        format!("{:02X}:{:02X}:{:02X}", self.0[0], self.0[1], self.0[2])
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            self.0[0], self.0[1], self.0[2], self.0[3], self.0[4], self.0[5]
        )
    }
}

impl FromStr for MacAddress {
    type Err = MacParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace('-', ":");
        let parts: Vec<&str> = normalized.split(':').collect();
        if parts.len() != 6 {
            return Err(MacParseError(s.to_string()));
        }

        let mut octets = [0u8; 6];
        for (i, part) in parts.iter().enumerate() {
            octets[i] =
                u8::from_str_radix(part, 16).map_err(|_| MacParseError(s.to_string()))?;
        }
        Ok(Self(octets))
    }
}

impl From<pnet::util::MacAddr> for MacAddress {
    fn from(mac: pnet::util::MacAddr) -> Self {
        Self([mac.0, mac.1, mac.2, mac.3, mac.4, mac.5])
    }
}

impl Serialize for MacAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MacAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// One discovered network participant.
///
/// Serde field order is the CLI's key-ordered output contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostRecord {
    /// IPv4 address the host answered from.
    pub ip: Ipv4Addr,
    /// Link-layer address from the ARP reply.
    pub mac: MacAddress,
    /// Reverse-DNS name, or [`UNRESOLVED`].
    pub hostname: String,
    /// Hardware vendor label, or [`UNKNOWN_VENDOR`].
    pub vendor: String,
    /// Open TCP ports found by the most recent probe; empty until probed.
    pub open_ports: Vec<u16>,
}

impl HostRecord {
    /// Create a record fresh from discovery: identifiers only, enrichment
    /// fields at their sentinels, no ports.
    pub fn new(ip: Ipv4Addr, mac: MacAddress) -> Self {
        Self {
            ip,
            mac,
            hostname: UNRESOLVED.to_string(),
            vendor: UNKNOWN_VENDOR.to_string(),
            open_ports: Vec::new(),
        }
    }

    /// Open ports joined for table display and CSV export, e.g. "22, 80".
    pub fn ports_display(&self) -> String {
        self.open_ports
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Collapse duplicate addresses from a discovery run: the record arriving
/// last for an address wins, replacing the earlier one in place.
pub fn dedupe_last_wins(records: Vec<HostRecord>) -> Vec<HostRecord> {
    let mut out: Vec<HostRecord> = Vec::with_capacity(records.len());
    let mut index: std::collections::HashMap<Ipv4Addr, usize> = std::collections::HashMap::new();

    for record in records {
        match index.get(&record.ip) {
            Some(&i) => out[i] = record,
            None => {
                index.insert(record.ip, out.len());
                out.push(record);
            }
        }
    }
    out
}

/// Merge a probe result into a previously discovered list, keyed by
/// address. Overwrites the matching record's open-ports field; a result for
/// an address not in the list is dropped (probes only ever run against
/// discovered hosts). Returns whether a record was updated.
pub fn merge_probe_result(hosts: &mut [HostRecord], target: Ipv4Addr, ports: &[u16]) -> bool {
    match hosts.iter_mut().find(|h| h.ip == target) {
        Some(host) => {
            host.open_ports = ports.to_vec();
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mac(s: &str) -> MacAddress {
        s.parse().unwrap()
    }

    #[test]
    fn test_mac_parse_and_display() {
        let parsed = mac("aa:bb:cc:00:11:22");
        assert_eq!(parsed.to_string(), "AA:BB:CC:00:11:22");

        let dashed = mac("AA-BB-CC-00-11-22");
        assert_eq!(parsed, dashed);
    }

    #[test]
    fn test_mac_rejects_garbage() {
        assert!("".parse::<MacAddress>().is_err());
        assert!("aa:bb:cc".parse::<MacAddress>().is_err());
        assert!("zz:bb:cc:00:11:22".parse::<MacAddress>().is_err());
    }

    #[test]
    fn test_oui_prefix() {
        assert_eq!(mac("00:0c:29:11:22:33").oui_prefix(), "00:0C:29");
    }

    #[test]
    fn test_new_record_has_sentinels() {
        let record = HostRecord::new("10.0.0.5".parse().unwrap(), mac("AA:BB:CC:00:11:22"));
        assert_eq!(record.hostname, UNRESOLVED);
        assert_eq!(record.vendor, UNKNOWN_VENDOR);
        assert!(record.open_ports.is_empty());
    }

    #[test]
    fn test_merge_overwrites_matching_record() {
        let mut hosts = vec![
            HostRecord::new("10.0.0.5".parse().unwrap(), mac("AA:BB:CC:00:11:22")),
            HostRecord::new("10.0.0.9".parse().unwrap(), mac("00:0C:29:11:22:33")),
        ];

        let merged = merge_probe_result(&mut hosts, "10.0.0.9".parse().unwrap(), &[22]);
        assert!(merged);
        assert_eq!(hosts[1].open_ports, vec![22]);
        assert!(hosts[0].open_ports.is_empty());
    }

    #[test]
    fn test_merge_is_idempotent() {
        let mut hosts = vec![HostRecord::new(
            "10.0.0.9".parse().unwrap(),
            mac("00:0C:29:11:22:33"),
        )];

        merge_probe_result(&mut hosts, "10.0.0.9".parse().unwrap(), &[22, 80]);
        let once = hosts[0].open_ports.clone();
        merge_probe_result(&mut hosts, "10.0.0.9".parse().unwrap(), &[22, 80]);
        assert_eq!(hosts[0].open_ports, once);
    }

    #[test]
    fn test_merge_unknown_address_is_noop() {
        let mut hosts = vec![HostRecord::new(
            "10.0.0.5".parse().unwrap(),
            mac("AA:BB:CC:00:11:22"),
        )];

        let merged = merge_probe_result(&mut hosts, "192.168.1.1".parse().unwrap(), &[80]);
        assert!(!merged);
        assert!(hosts[0].open_ports.is_empty());
    }

    #[test]
    fn test_dedupe_last_wins() {
        let first = HostRecord::new("10.0.0.5".parse().unwrap(), mac("AA:BB:CC:00:11:22"));
        let second = HostRecord::new("10.0.0.5".parse().unwrap(), mac("00:0C:29:11:22:33"));
        let other = HostRecord::new("10.0.0.9".parse().unwrap(), mac("B8:27:EB:01:02:03"));

        let deduped = dedupe_last_wins(vec![first, other, second]);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].mac.to_string(), "00:0C:29:11:22:33");
    }

    #[test]
    fn test_ports_display() {
        let mut record = HostRecord::new("10.0.0.9".parse().unwrap(), mac("00:0C:29:11:22:33"));
        record.open_ports = vec![22, 80];
        assert_eq!(record.ports_display(), "22, 80");
        record.open_ports.clear();
        assert_eq!(record.ports_display(), "");
    }
}
