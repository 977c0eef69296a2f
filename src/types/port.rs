//! Port types with validation and parsing.
//!
//! The `Port` newtype ensures values are always valid port numbers (1-65535).
//! `PortSpec` parses the user-facing specification format: a comma-separated
//! list of ports, dash ranges, or a mix of both.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A validated network port number (1-65535).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Port(u16);

impl Port {
    /// Create a new Port from a u16, returning None for port 0.
    #[inline]
    pub const fn new(port: u16) -> Option<Self> {
        if port >= 1 {
            Some(Self(port))
        } else {
            None
        }
    }

    /// Get the raw port number.
    #[inline]
    pub const fn as_u16(self) -> u16 {
        self.0
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u16> for Port {
    type Error = PortError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(PortError::OutOfRange(value))
    }
}

impl From<Port> for u16 {
    fn from(port: Port) -> Self {
        port.0
    }
}

/// Error type for port parsing and validation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PortError {
    #[error("port {0} is out of valid range (1-65535)")]
    OutOfRange(u16),
    #[error("invalid port number: {0}")]
    InvalidFormat(String),
    #[error("invalid port range: start ({0}) > end ({1})")]
    InvalidRange(u16, u16),
    #[error("empty port specification")]
    Empty,
}

/// A port specification: single ports, dash ranges, or a comma-separated mix.
///
/// Supported formats:
/// - Single port: "80"
/// - Comma-separated: "22,80,443"
/// - Range: "1-1024"
/// - Mixed: "22,80,8000-9000"
///
/// Must be validated (parsed) before any probing mechanism is invoked; the
/// canonical `Display` form is what the subprocess fallback hands to the
/// external tool's `-p` flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortSpec {
    ranges: Vec<(Port, Port)>,
}

impl PortSpec {
    /// The default probe specification: privileged ports 1-1024.
    pub fn default_range() -> Self {
        Self {
            ranges: vec![(Port(1), Port(1024))],
        }
    }

    /// Expand to all ports, sorted ascending and deduplicated.
    pub fn to_ports(&self) -> Vec<Port> {
        let mut ports: Vec<Port> = self
            .ranges
            .iter()
            .flat_map(|&(start, end)| (start.0..=end.0).map(Port))
            .collect();
        ports.sort_unstable();
        ports.dedup();
        ports
    }

    /// Total number of unique ports covered.
    pub fn count(&self) -> usize {
        self.to_ports().len()
    }
}

impl Default for PortSpec {
    fn default() -> Self {
        Self::default_range()
    }
}

impl FromStr for PortSpec {
    type Err = PortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PortError::Empty);
        }

        let mut ranges = Vec::new();

        for part in s.split(',') {
            let part = part.trim();
            if let Some((low, high)) = part.split_once('-') {
                let start: u16 = low
                    .trim()
                    .parse()
                    .map_err(|_| PortError::InvalidFormat(low.to_string()))?;
                let end: u16 = high
                    .trim()
                    .parse()
                    .map_err(|_| PortError::InvalidFormat(high.to_string()))?;

                let start = Port::new(start).ok_or(PortError::OutOfRange(start))?;
                let end = Port::new(end).ok_or(PortError::OutOfRange(end))?;
                if start.0 > end.0 {
                    return Err(PortError::InvalidRange(start.0, end.0));
                }
                ranges.push((start, end));
            } else {
                let port: u16 = part
                    .parse()
                    .map_err(|_| PortError::InvalidFormat(part.to_string()))?;
                let port = Port::new(port).ok_or(PortError::OutOfRange(port))?;
                ranges.push((port, port));
            }
        }

        if ranges.is_empty() {
            return Err(PortError::Empty);
        }

        Ok(Self { ranges })
    }
}

impl fmt::Display for PortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .ranges
            .iter()
            .map(|&(start, end)| {
                if start == end {
                    start.to_string()
                } else {
                    format!("{}-{}", start, end)
                }
            })
            .collect();
        write!(f, "{}", parts.join(","))
    }
}
