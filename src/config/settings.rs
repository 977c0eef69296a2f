//! Application settings and paths.
//!
//! Manages XDG-compliant paths and the JSON settings file holding scan
//! defaults. CLI flags override anything loaded from here.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Duration;

static PATHS: OnceLock<Option<Paths>> = OnceLock::new();

/// Application directory paths following the XDG Base Directory spec.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Configuration directory (~/.config/netwatch)
    pub config_dir: PathBuf,
}

impl Paths {
    /// Get the global paths instance, if a home directory exists.
    pub fn get() -> ConfigResult<&'static Paths> {
        PATHS
            .get_or_init(|| Self::new().ok())
            .as_ref()
            .ok_or(ConfigError::DirectoryNotFound)
    }

    fn new() -> ConfigResult<Self> {
        let project =
            ProjectDirs::from("io", "netwatch", "netwatch").ok_or(ConfigError::DirectoryNotFound)?;

        let paths = Self {
            config_dir: project.config_dir().to_path_buf(),
        };
        fs::create_dir_all(&paths.config_dir)?;
        Ok(paths)
    }

    /// Path to the settings file.
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }
}

/// Scan defaults, persisted as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Default port specification for probes.
    pub default_ports: String,
    /// Per-port timeout of the connect sweep, in milliseconds.
    pub connect_timeout_ms: u64,
    /// Concurrent connections of the connect sweep.
    pub connect_concurrency: usize,
    /// Name or path of the fallback probing binary.
    pub nmap_binary: String,
    /// Wall-clock bound for one fallback invocation, in seconds.
    pub nmap_timeout_secs: u64,
    /// Reverse-DNS lookup timeout, in milliseconds.
    pub dns_timeout_ms: u64,
    /// How long the ARP sweep listens for replies, in milliseconds.
    pub arp_wait_ms: u64,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            default_ports: "1-1024".to_string(),
            connect_timeout_ms: 800,
            connect_concurrency: 256,
            nmap_binary: "nmap".to_string(),
            nmap_timeout_secs: 180,
            dns_timeout_ms: 2000,
            arp_wait_ms: 2500,
        }
    }
}

impl AppSettings {
    /// Load settings from the default location; missing file means
    /// defaults, an unusable config directory also falls back to defaults.
    pub fn load() -> ConfigResult<Self> {
        let paths = match Paths::get() {
            Ok(paths) => paths,
            Err(_) => return Ok(Self::default()),
        };
        let file = paths.settings_file();
        if !file.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&file)
    }

    /// Load settings from a specific file.
    pub fn load_from(path: &PathBuf) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        serde_json::from_str(&content).map_err(|e| ConfigError::InvalidFormat(e.to_string()))
    }

    /// Save settings to the default location.
    pub fn save(&self) -> ConfigResult<()> {
        let paths = Paths::get()?;
        let file = paths.settings_file();

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;
        fs::write(&file, content).map_err(|e| ConfigError::WriteFailed {
            path: file.display().to_string(),
            reason: e.to_string(),
        })
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn nmap_timeout(&self) -> Duration {
        Duration::from_secs(self.nmap_timeout_secs)
    }

    pub fn dns_timeout(&self) -> Duration {
        Duration::from_millis(self.dns_timeout_ms)
    }

    pub fn arp_wait(&self) -> Duration {
        Duration::from_millis(self.arp_wait_ms)
    }
}
