use crate::error::{HealthError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_PYPI_URL: &str = "https://pypi.org/pypi";
pub const DEFAULT_OSV_URL: &str = "https://api.osv.dev/v1/query";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub registry: RegistryConfig,
}

/// Settings for the package index and vulnerability feed clients. One value
/// is built per command invocation and handed to the clients explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub pypi_url: String,
    pub osv_url: String,
    /// Per-request deadline, humantime syntax (`"15s"`, `"1m 30s"`).
    pub timeout: String,
    pub user_agent: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            pypi_url: DEFAULT_PYPI_URL.to_string(),
            osv_url: DEFAULT_OSV_URL.to_string(),
            timeout: "15s".to_string(),
            user_agent: format!("repohealth/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl RegistryConfig {
    pub fn timeout(&self) -> Result<Duration> {
        humantime::parse_duration(&self.timeout)
            .map_err(|e| HealthError::Config(format!("invalid timeout '{}': {e}", self.timeout)))
    }
}

impl Config {
    /// Defaults when no path is given, otherwise the TOML file at `path`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&text)
            .map_err(|e| HealthError::Config(format!("{}: {e}", path.display())))?;
        config.registry.timeout()?;
        Ok(config)
    }
}
