/// CLI configuration
use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use ymusic_client::{ClientConfig, DEFAULT_BASE_URL};
use ymusic_ynison::{DeviceIdentity, YnisonConfig, DEFAULT_REDIRECTOR_URL};

const DEFAULT_CONFIG_FILE: &str = "ymusic.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CliConfig {
    #[serde(default = "default_api")]
    pub api: ApiSettings,

    #[serde(default = "default_device")]
    pub device: DeviceSettings,

    #[serde(default = "default_ynison")]
    pub ynison: YnisonSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiSettings {
    #[serde(default = "default_api_url")]
    pub url: String,

    #[serde(default)]
    pub token: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeviceSettings {
    /// Stable id; a fresh one is generated per run when unset
    #[serde(default)]
    pub device_id: Option<String>,

    #[serde(default = "default_app_name")]
    pub app_name: String,

    #[serde(default = "default_app_version")]
    pub app_version: String,

    #[serde(default = "default_app_name")]
    pub title: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct YnisonSettings {
    #[serde(default = "default_redirector_url")]
    pub redirector_url: String,

    #[serde(default = "default_handshake_timeout_secs")]
    pub handshake_timeout_secs: u64,

    #[serde(default = "default_close_timeout_secs")]
    pub close_timeout_secs: u64,

    /// How long `now-playing` waits for the first snapshot
    #[serde(default = "default_snapshot_wait_secs")]
    pub snapshot_wait_secs: u64,
}

impl CliConfig {
    /// Load configuration from file and environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_from(path, None)
    }

    fn load_from(path: Option<&Path>, env: Option<HashMap<String, String>>) -> Result<Self> {
        let mut settings = config::Config::builder();

        // An explicit path must exist, the default file is optional
        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables (YMUSIC__API__TOKEN, ...)
        settings = settings.add_source(
            config::Environment::with_prefix("YMUSIC")
                .separator("__")
                .try_parsing(true)
                .source(env),
        );

        Ok(settings.build()?.try_deserialize()?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        for (name, url, schemes) in [
            ("api.url", &self.api.url, &["http", "https"][..]),
            ("ynison.redirector_url", &self.ynison.redirector_url, &["ws", "wss"][..]),
        ] {
            let scheme = url.split_once("://").map(|(scheme, _)| scheme);
            if !scheme.is_some_and(|s| schemes.contains(&s)) {
                return Err(CliError::Config(format!(
                    "{name} must use one of {schemes:?}, got {url:?}"
                )));
            }
        }

        if self.api.timeout_secs == 0 || self.ynison.handshake_timeout_secs == 0 {
            return Err(CliError::Config("timeouts must be positive".to_string()));
        }

        if self.device.app_name.trim().is_empty() {
            return Err(CliError::Config("device.app_name must not be empty".to_string()));
        }

        Ok(())
    }

    /// OAuth token, required by everything but anonymous catalog reads
    pub fn token(&self) -> Result<&str> {
        self.api
            .token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                CliError::Config(
                    "OAuth token is required (set YMUSIC__API__TOKEN or pass --token)".to_string(),
                )
            })
    }

    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new(&self.api.url)
            .timeout(Duration::from_secs(self.api.timeout_secs));
        config.token.clone_from(&self.api.token);
        if let Some(device_id) = &self.device.device_id {
            config = config.device_id(device_id);
        }
        config
    }

    pub fn ynison_config(&self) -> YnisonConfig {
        YnisonConfig::new(&self.ynison.redirector_url)
            .handshake_timeout(Duration::from_secs(self.ynison.handshake_timeout_secs))
            .close_timeout(Duration::from_secs(self.ynison.close_timeout_secs))
    }

    pub fn identity(&self) -> DeviceIdentity {
        let identity = match &self.device.device_id {
            Some(id) => DeviceIdentity::new(id, &self.device.app_name),
            None => DeviceIdentity::generate(&self.device.app_name),
        };
        identity
            .app_version(&self.device.app_version)
            .title(&self.device.title)
    }
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            api: default_api(),
            device: default_device(),
            ynison: default_ynison(),
        }
    }
}

// Default values
fn default_api() -> ApiSettings {
    ApiSettings {
        url: default_api_url(),
        token: None,
        timeout_secs: default_timeout_secs(),
    }
}

fn default_api_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_device() -> DeviceSettings {
    DeviceSettings {
        device_id: None,
        app_name: default_app_name(),
        app_version: default_app_version(),
        title: default_app_name(),
    }
}

fn default_app_name() -> String {
    "ymusic-cli".to_string()
}

fn default_app_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_ynison() -> YnisonSettings {
    YnisonSettings {
        redirector_url: default_redirector_url(),
        handshake_timeout_secs: default_handshake_timeout_secs(),
        close_timeout_secs: default_close_timeout_secs(),
        snapshot_wait_secs: default_snapshot_wait_secs(),
    }
}

fn default_redirector_url() -> String {
    DEFAULT_REDIRECTOR_URL.to_string()
}

fn default_handshake_timeout_secs() -> u64 {
    10
}

fn default_close_timeout_secs() -> u64 {
    5
}

fn default_snapshot_wait_secs() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> Option<HashMap<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        )
    }

    #[test]
    fn defaults_without_sources() {
        let config = CliConfig::load_from(None, env(&[])).unwrap();
        assert_eq!(config.api.url, DEFAULT_BASE_URL);
        assert_eq!(config.ynison.redirector_url, DEFAULT_REDIRECTOR_URL);
        assert!(config.api.token.is_none());
        assert!(config.validate().is_ok());
        assert!(config.token().is_err());
    }

    #[test]
    fn file_then_environment() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[api]\ntoken = \"from-file\"\ntimeout_secs = 30\n\n[device]\ndevice_id = \"desk\"\n"
        )
        .unwrap();

        let config = CliConfig::load_from(
            Some(file.path()),
            env(&[("YMUSIC__API__TOKEN", "from-env")]),
        )
        .unwrap();

        assert_eq!(config.token().unwrap(), "from-env");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.identity().device_id, "desk");
        assert_eq!(config.client_config().device_id.as_deref(), Some("desk"));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let result = CliConfig::load_from(Some(Path::new("/nonexistent/ymusic.toml")), env(&[]));
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn rejects_wrong_schemes() {
        let mut config = CliConfig::default();
        config.ynison.redirector_url = "https://ynison.example".to_string();
        assert!(config.validate().is_err());

        let mut config = CliConfig::default();
        config.api.url = "ftp://api.example".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn blank_token_counts_as_missing() {
        let mut config = CliConfig::default();
        config.api.token = Some("  ".to_string());
        assert!(config.token().is_err());
    }
}
