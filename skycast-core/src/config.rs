use anyhow::{Context, Result, anyhow, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf, time::Duration};

/// Environment variable that takes precedence over the stored API key.
pub const API_KEY_ENV: &str = "SKYCAST_API_KEY";

pub const DEFAULT_TIMEOUT_MS: u64 = 8000;

/// Base URLs of the provider endpoints. Tests point these at a mock server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    /// Name-keyed weather/forecast and air pollution, e.g. `.../data/2.5`.
    pub data_url: String,
    /// Geocoding, e.g. `.../geo/1.0`.
    pub geo_url: String,
    /// One-call (UV index), e.g. `.../data/3.0`.
    pub onecall_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            data_url: "https://api.openweathermap.org/data/2.5".to_string(),
            geo_url: "https://api.openweathermap.org/geo/1.0".to_string(),
            onecall_url: "https://api.openweathermap.org/data/3.0".to_string(),
        }
    }
}

impl Endpoints {
    /// All three endpoint families rooted under one host, laid out like OpenWeather's.
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            data_url: format!("{base}/data/2.5"),
            geo_url: format!("{base}/geo/1.0"),
            onecall_url: format!("{base}/data/3.0"),
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// timeout_ms = 8000
///
/// [endpoints]
/// data_url = "https://api.openweathermap.org/data/2.5"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub api_key: Option<String>,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default)]
    pub endpoints: Endpoints,
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            endpoints: Endpoints::default(),
        }
    }
}

impl Config {
    /// Load config from the platform config dir, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    /// Like [`Config::read_from`], but also rejects invalid settings.
    pub fn load_from(path: &Path) -> Result<Self> {
        let cfg = Self::read_from(path)?;

        cfg.validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Read the platform config file without validating it, so it can be repaired.
    pub fn read() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::read_from(&path)
    }

    pub fn read_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "skycast", "skycast")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Apply `SKYCAST_API_KEY` on top of whatever was loaded from disk.
    pub fn with_env_overrides(self) -> Self {
        self.with_api_key_override(std::env::var(API_KEY_ENV).ok())
    }

    fn with_api_key_override(mut self, key: Option<String>) -> Self {
        if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
            self.api_key = Some(key);
        }
        self
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    /// Returns the API key, if present and non-blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }

    /// Reject settings under which every request would fail.
    pub fn validate(&self) -> Result<()> {
        if self.timeout_ms == 0 {
            bail!(
                "timeout_ms must be greater than zero.\n\
                 Hint: run `skycast configure --timeout-ms {DEFAULT_TIMEOUT_MS}` to reset it."
            );
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_production_endpoints_and_eight_second_budget() {
        let cfg = Config::default();
        assert_eq!(cfg.timeout(), Duration::from_millis(8000));
        assert!(cfg.endpoints.data_url.ends_with("/data/2.5"));
        assert!(cfg.endpoints.geo_url.ends_with("/geo/1.0"));
        assert!(cfg.endpoints.onecall_url.ends_with("/data/3.0"));
        assert_eq!(cfg.api_key(), None);
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let mut cfg = Config::default();
        cfg.set_api_key("   ".into());
        assert_eq!(cfg.api_key(), None);

        cfg.set_api_key("KEY".into());
        assert_eq!(cfg.api_key(), Some("KEY"));
    }

    #[test]
    fn env_override_replaces_stored_key() {
        let mut cfg = Config::default();
        cfg.set_api_key("FILE_KEY".into());

        let cfg = cfg.with_api_key_override(Some("ENV_KEY".into()));
        assert_eq!(cfg.api_key(), Some("ENV_KEY"));

        let cfg = cfg.with_api_key_override(Some(String::new()));
        assert_eq!(cfg.api_key(), Some("ENV_KEY"));

        let cfg = cfg.with_api_key_override(None);
        assert_eq!(cfg.api_key(), Some("ENV_KEY"));
    }

    #[test]
    fn with_base_strips_trailing_slash() {
        let endpoints = Endpoints::with_base("http://127.0.0.1:9000/");
        assert_eq!(endpoints.data_url, "http://127.0.0.1:9000/data/2.5");
        assert_eq!(endpoints.geo_url, "http://127.0.0.1:9000/geo/1.0");
        assert_eq!(endpoints.onecall_url, "http://127.0.0.1:9000/data/3.0");
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn save_then_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.set_api_key("KEY".into());
        cfg.timeout_ms = 1500;
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_key = \"KEY\"\n").unwrap();

        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.api_key(), Some("KEY"));
        assert_eq!(cfg.timeout_ms, DEFAULT_TIMEOUT_MS);
        assert_eq!(cfg.endpoints, Endpoints::default());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let mut cfg = Config::default();
        cfg.timeout_ms = 0;

        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("timeout_ms must be greater than zero"));

        cfg.timeout_ms = 1;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn zero_timeout_in_file_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_key = \"KEY\"\ntimeout_ms = 0\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("Invalid config file"));
        assert!(msg.contains("timeout_ms must be greater than zero"));

        // Still readable so `configure` can overwrite the bad value.
        let cfg = Config::read_from(&path).unwrap();
        assert_eq!(cfg.timeout_ms, 0);
        assert_eq!(cfg.api_key(), Some("KEY"));
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "timeout_ms = \"soon\"").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
