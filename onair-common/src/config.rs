//! Configuration loading
//!
//! Priority order:
//! 1. Command-line arguments (applied by the binary)
//! 2. Environment variables (`ONAIR_BACKEND_URL`, `ONAIR_BACKEND_KEY`, `ONAIR_TIMEZONE`)
//! 3. TOML config file
//! 4. Built-in defaults
//!
//! A missing config file is not an error: defaults apply and a warning is logged.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use crate::clock::BroadcastClock;
use crate::{Error, Result};

/// Station timezone used when nothing else is configured
pub const DEFAULT_TIMEZONE: &str = "Asia/Colombo";

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "ONAIR_CONFIG";

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    /// HTTP server port
    pub port: u16,

    /// IANA name of the broadcast timezone
    pub timezone: String,

    /// Clock refresh interval for live views
    pub tick_interval_ms: u64,

    pub backend: BackendConfig,

    pub logging: LoggingConfig,
}

/// Remote data service settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL; when unset only the bundled default week is served
    pub url: Option<String>,

    /// Anonymous read key sent as `apikey` and bearer token
    pub api_key: Option<String>,

    /// Schedule table name
    pub table: String,

    /// Request timeout; bounds how long a load can stay in flight
    pub timeout_ms: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default log level (trace, debug, info, warn, error) when RUST_LOG is unset
    pub level: String,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            port: 5780,
            timezone: DEFAULT_TIMEZONE.to_string(),
            tick_interval_ms: 30_000,
            backend: BackendConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            table: "program_schedule".to_string(),
            timeout_ms: 10_000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl TomlConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("invalid TOML: {}", e)))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load from the resolved config file, or defaults when there is none.
    ///
    /// An unreadable or malformed file is still an error.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        match config_file_path(explicit) {
            Some(path) => {
                info!("Loading configuration from {}", path.display());
                Self::load(&path)
            }
            None => {
                warn!("No config file found, using built-in defaults");
                Ok(Self::default())
            }
        }
    }

    /// Overlay environment variables
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("ONAIR_BACKEND_URL") {
            self.backend.url = Some(url);
        }
        if let Ok(key) = std::env::var("ONAIR_BACKEND_KEY") {
            self.backend.api_key = Some(key);
        }
        if let Ok(tz) = std::env::var("ONAIR_TIMEZONE") {
            self.timezone = tz;
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.broadcast_clock()?;
        if self.tick_interval_ms == 0 {
            return Err(Error::Config("tick_interval_ms must be greater than zero".to_string()));
        }
        if self.backend.timeout_ms == 0 {
            return Err(Error::Config("backend.timeout_ms must be greater than zero".to_string()));
        }
        if self.backend.table.trim().is_empty() {
            return Err(Error::Config("backend.table must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn broadcast_clock(&self) -> Result<BroadcastClock> {
        BroadcastClock::from_name(&self.timezone)
    }
}

/// Resolve the config file path.
///
/// Explicit path, then `ONAIR_CONFIG`, then the per-user config directory,
/// then `/etc/onair/config.toml` on Linux. An explicit path is returned even
/// if it does not exist so that loading reports the problem.
pub fn config_file_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        return Some(PathBuf::from(path));
    }

    let user_config = dirs::config_dir().map(|d| d.join("onair").join("config.toml"));
    if let Some(path) = user_config.filter(|p| p.exists()) {
        return Some(path);
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/onair/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TomlConfig::default();
        assert_eq!(config.port, 5780);
        assert_eq!(config.timezone, "Asia/Colombo");
        assert_eq!(config.tick_interval(), Duration::from_secs(30));
        assert_eq!(config.backend.table, "program_schedule");
        assert!(config.backend.url.is_none());
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = TomlConfig::from_toml_str(
            r#"
            port = 8080

            [backend]
            url = "https://data.example.org"
            "#,
        )
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.backend.url.as_deref(), Some("https://data.example.org"));
        assert_eq!(config.backend.timeout_ms, 10_000);
        assert_eq!(config.timezone, DEFAULT_TIMEZONE);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = TomlConfig::default();
        config.timezone = "Nowhere/Special".to_string();
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let mut config = TomlConfig::default();
        config.tick_interval_ms = 0;
        assert!(config.validate().is_err());

        let mut config = TomlConfig::default();
        config.backend.table = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = TomlConfig::from_toml_str("port = \"not a number\"").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
