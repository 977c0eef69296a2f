//! CSV export of host records.
//!
//! Writes a header row followed by one row per record. The header field
//! set is fixed and shared by every record, with open ports flattened to a
//! comma-joined string.

use crate::error::{ExportError, ExportResult};
use crate::types::HostRecord;
use std::path::Path;

/// Column headers, in output order.
pub const CSV_HEADERS: [&str; 5] = ["ip", "mac", "hostname", "vendor", "open_ports"];

/// Export records to a CSV file at `path`.
///
/// Fails with `EmptyInput` before touching the filesystem when there is
/// nothing to write.
pub fn export_csv(hosts: &[HostRecord], path: &Path) -> ExportResult<()> {
    if hosts.is_empty() {
        return Err(ExportError::EmptyInput);
    }

    let mut writer =
        csv::Writer::from_path(path).map_err(|e| ExportError::WriteFailed(e.to_string()))?;

    writer
        .write_record(CSV_HEADERS)
        .map_err(|e| ExportError::WriteFailed(e.to_string()))?;

    for host in hosts {
        writer
            .write_record([
                host.ip.to_string(),
                host.mac.to_string(),
                host.hostname.clone(),
                host.vendor.clone(),
                host.ports_display(),
            ])
            .map_err(|e| ExportError::WriteFailed(e.to_string()))?;
    }

    writer
        .flush()
        .map_err(|e| ExportError::WriteFailed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MacAddress;

    fn record(ip: &str, mac: &str) -> HostRecord {
        HostRecord::new(ip.parse().unwrap(), mac.parse::<MacAddress>().unwrap())
    }

    #[test]
    fn test_empty_input_fails_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hosts.csv");

        let result = export_csv(&[], &path);
        assert!(matches!(result, Err(ExportError::EmptyInput)));
        assert!(!path.exists());
    }

    #[test]
    fn test_header_and_row_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hosts.csv");

        let mut second = record("10.0.0.9", "00:0C:29:11:22:33");
        second.open_ports = vec![22, 80];
        let hosts = vec![record("10.0.0.5", "AA:BB:CC:00:11:22"), second];

        export_csv(&hosts, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), hosts.len() + 1);
        assert_eq!(lines[0], "ip,mac,hostname,vendor,open_ports");
        assert!(lines[2].starts_with("10.0.0.9,00:0C:29:11:22:33,"));
        assert!(lines[2].contains("\"22, 80\""));
    }

    #[test]
    fn test_unwritable_path_reports_write_failure() {
        let hosts = vec![record("10.0.0.5", "AA:BB:CC:00:11:22")];
        let result = export_csv(&hosts, Path::new("/nonexistent-dir/hosts.csv"));
        assert!(matches!(result, Err(ExportError::WriteFailed(_))));
    }
}
