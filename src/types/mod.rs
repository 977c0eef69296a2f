//! Core type definitions.
//!
//! Newtype patterns keep raw strings and integers out of the scan engine:
//! validated ports, CIDR scan ranges, and the per-host record shape.

mod host;
mod port;
mod range;

pub use host::{
    dedupe_last_wins, merge_probe_result, HostRecord, MacAddress, MacParseError, UNKNOWN_VENDOR,
    UNRESOLVED,
};
pub use port::{Port, PortError, PortSpec};
pub use range::{RangeError, ScanRange};
