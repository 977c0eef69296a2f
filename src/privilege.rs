//! Elevated-privilege detection.

/// Check if the process runs with elevated rights.
///
/// The ARP sweep needs raw-socket access, which on Unix means an effective
/// UID of 0. Platforms without that notion report false and the sweep's own
/// channel-open error surfaces the problem.
pub fn is_elevated() -> bool {
    #[cfg(unix)]
    {
        unsafe { libc::geteuid() == 0 }
    }
    #[cfg(not(unix))]
    {
        false
    }
}
