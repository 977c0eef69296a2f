//! Static OUI vendor table.
//!
//! Maps the first three octets of a MAC address to a manufacturer name.
//! Lookups are total: any input that is not a well-formed MAC prefix, and
//! any prefix without a table entry, yields the "unknown" sentinel.

use crate::types::{MacAddress, UNKNOWN_VENDOR};
use std::collections::HashMap;
use std::sync::OnceLock;

// A real OUI database has tens of thousands of entries; this covers the
// vendors common on lab and home segments.
const OUI_TABLE: &[(&str, &str)] = &[
    ("00:0C:29", "VMware, Inc."),
    ("00:1C:42", "Cisco Systems, Inc"),
    ("00:50:56", "VMware, Inc."),
    ("08:00:27", "Oracle Corporation"),
    ("3C:D9:2B", "Hewlett Packard"),
    ("B8:27:EB", "Raspberry Pi Foundation"),
    ("DC:A6:32", "ASUSTek COMPUTER INC."),
];

static OUI_DB: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();

fn oui_db() -> &'static HashMap<&'static str, &'static str> {
    OUI_DB.get_or_init(|| OUI_TABLE.iter().copied().collect())
}

/// Look up the vendor for a raw MAC string.
///
/// Accepts colon- or dash-separated hex in any case; malformed input and
/// table misses both return [`UNKNOWN_VENDOR`]. Never fails.
pub fn vendor_for(mac: &str) -> &'static str {
    let normalized = mac.trim().to_uppercase().replace('-', ":");

    let prefix = match normalized.get(..8) {
        Some(p) => p,
        None => return UNKNOWN_VENDOR,
    };

    let well_formed = prefix.as_bytes().chunks(3).enumerate().all(|(i, chunk)| {
        if i < 2 {
            chunk.len() == 3
                && chunk[0].is_ascii_hexdigit()
                && chunk[1].is_ascii_hexdigit()
                && chunk[2] == b':'
        } else {
            chunk.len() == 2 && chunk[0].is_ascii_hexdigit() && chunk[1].is_ascii_hexdigit()
        }
    });
    if !well_formed {
        return UNKNOWN_VENDOR;
    }

    oui_db().get(prefix).copied().unwrap_or(UNKNOWN_VENDOR)
}

/// Look up the vendor for a parsed MAC address.
pub fn vendor_for_mac(mac: &MacAddress) -> &'static str {
    oui_db()
        .get(mac.oui_prefix().as_str())
        .copied()
        .unwrap_or(UNKNOWN_VENDOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_prefix() {
        assert_eq!(vendor_for("00:0C:29:11:22:33"), "VMware, Inc.");
        assert_eq!(vendor_for("B8:27:EB:AA:BB:CC"), "Raspberry Pi Foundation");
    }

    #[test]
    fn test_lookup_is_case_and_separator_insensitive() {
        let expected = vendor_for("00:0C:29:11:22:33");
        assert_eq!(vendor_for("00:0c:29:11:22:33"), expected);
        assert_eq!(vendor_for("00-0c-29-11-22-33"), expected);
        assert_eq!(vendor_for("00-0C-29-44-55-66"), expected);
    }

    #[test]
    fn test_lookup_miss_yields_unknown() {
        assert_eq!(vendor_for("AA:BB:CC:00:11:22"), UNKNOWN_VENDOR);
    }

    #[test]
    fn test_lookup_never_fails_on_malformed_input() {
        for garbage in ["", "xx", "not a mac", "00:0C", "zz:zz:zz:00:11:22", "😀😀😀"] {
            assert_eq!(vendor_for(garbage), UNKNOWN_VENDOR);
        }
    }

    #[test]
    fn test_lookup_from_parsed_mac() {
        let mac: MacAddress = "00:0c:29:de:ad:00".parse().unwrap();
        assert_eq!(vendor_for_mac(&mac), "VMware, Inc.");
    }
}
