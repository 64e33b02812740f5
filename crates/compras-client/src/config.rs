//! # Client Configuration
//!
//! Where the backend lives and how to talk to it.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     COMPRAS_API_URL=https://api.example.com/v1                         │
//! │     COMPRAS_API_TOKEN=...                                              │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/compras/compras.toml (Linux)                             │
//! │     ~/Library/Application Support/com.compras.intake/compras.toml      │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     http://localhost:3000/api, 15 s timeout                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [api]
//! base_url = "https://erp.example.com/api"
//! timeout_secs = 15
//! token = "..."
//!
//! [purchase]
//! idproveedor = 8
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{ClientError, ClientResult};

pub const ENV_API_URL: &str = "COMPRAS_API_URL";
pub const ENV_API_TOKEN: &str = "COMPRAS_API_TOKEN";
pub const ENV_API_TIMEOUT: &str = "COMPRAS_API_TIMEOUT_SECS";
pub const ENV_PROVEEDOR_ID: &str = "COMPRAS_PROVEEDOR_ID";

// =============================================================================
// API Settings
// =============================================================================

/// Connection settings for the backend REST API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL every endpoint path is joined onto.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Bearer token, when the backend requires one.
    #[serde(default)]
    pub token: Option<String>,
}

fn default_base_url() -> String {
    "http://localhost:3000/api".to_string()
}

fn default_timeout() -> u64 {
    15
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            token: None,
        }
    }
}

impl ApiSettings {
    /// Parses the base URL, guaranteeing a trailing slash so `join` appends.
    pub fn base(&self) -> ClientResult<Url> {
        let mut raw = self.base_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        Ok(Url::parse(&raw)?)
    }
}

// =============================================================================
// Purchase Settings
// =============================================================================

/// Defaults applied to every new purchase draft.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PurchaseSettings {
    /// Supplier preselected in the purchase header.
    #[serde(default)]
    pub idproveedor: Option<i64>,
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete client configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub purchase: PurchaseSettings,
}

impl ClientConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (compras.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ClientResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading client config from file");
                config = Self::from_file(&path)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load client config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Reads a TOML file without applying overrides.
    pub fn from_file(path: &Path) -> ClientResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ClientResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ClientError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ClientError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| ClientError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Client config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ClientResult<()> {
        let base = self.api.base()?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(ClientError::InvalidUrl(format!(
                "API URL must start with http:// or https://, got: {}",
                self.api.base_url
            )));
        }

        if self.api.timeout_secs == 0 {
            return Err(ClientError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup (the environment in production).
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL) {
            debug!(url = %url, "Overriding API URL from environment");
            self.api.base_url = url;
        }

        if let Some(token) = lookup(ENV_API_TOKEN) {
            self.api.token = Some(token).filter(|t| !t.is_empty());
        }

        if let Some(timeout) = lookup(ENV_API_TIMEOUT) {
            match timeout.parse::<u64>() {
                Ok(secs) => self.api.timeout_secs = secs,
                Err(_) => warn!(value = %timeout, "Ignoring non-numeric API timeout"),
            }
        }

        if let Some(id) = lookup(ENV_PROVEEDOR_ID) {
            match id.parse::<i64>() {
                Ok(id) => self.purchase.idproveedor = Some(id),
                Err(_) => warn!(value = %id, "Ignoring non-numeric supplier id"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "compras", "intake")
            .map(|dirs| dirs.config_dir().join("compras.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = ClientConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.api.timeout_secs, 15);
        assert_eq!(config.purchase.idproveedor, None);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: ClientConfig = toml::from_str(
            r#"
            [api]
            base_url = "https://erp.example.com/api"
            "#,
        )
        .unwrap();

        assert_eq!(config.api.base_url, "https://erp.example.com/api");
        assert_eq!(config.api.timeout_secs, 15);
        assert!(config.api.token.is_none());
    }

    #[test]
    fn test_overrides_win_over_file_values() {
        let mut config = ClientConfig::default();
        config.apply_overrides(lookup(&[
            (ENV_API_URL, "https://api.test/v2"),
            (ENV_API_TOKEN, "secret"),
            (ENV_API_TIMEOUT, "30"),
            (ENV_PROVEEDOR_ID, "8"),
        ]));

        assert_eq!(config.api.base_url, "https://api.test/v2");
        assert_eq!(config.api.token.as_deref(), Some("secret"));
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.purchase.idproveedor, Some(8));
    }

    #[test]
    fn test_bad_override_values_are_ignored() {
        let mut config = ClientConfig::default();
        config.apply_overrides(lookup(&[(ENV_API_TIMEOUT, "soon"), (ENV_PROVEEDOR_ID, "x")]));
        assert_eq!(config.api.timeout_secs, 15);
        assert_eq!(config.purchase.idproveedor, None);
    }

    #[test]
    fn test_validate_rejects_bad_url_and_timeout() {
        let mut config = ClientConfig::default();
        config.api.base_url = "ftp://files.example.com".into();
        assert!(matches!(config.validate(), Err(ClientError::InvalidUrl(_))));

        config.api.base_url = "not a url".into();
        assert!(matches!(config.validate(), Err(ClientError::InvalidUrl(_))));

        let mut config = ClientConfig::default();
        config.api.timeout_secs = 0;
        assert!(matches!(config.validate(), Err(ClientError::InvalidConfig(_))));
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let settings = ApiSettings {
            base_url: "https://erp.example.com/api".into(),
            ..ApiSettings::default()
        };
        let joined = settings.base().unwrap().join("compras").unwrap();
        assert_eq!(joined.as_str(), "https://erp.example.com/api/compras");
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = std::env::temp_dir().join(format!("compras-config-{}", std::process::id()));
        let path = dir.join("compras.toml");

        let mut config = ClientConfig::default();
        config.api.base_url = "https://erp.example.com/api".into();
        config.purchase.idproveedor = Some(3);
        config.save(Some(path.clone())).unwrap();

        let loaded = ClientConfig::from_file(&path).unwrap();
        assert_eq!(loaded.api.base_url, "https://erp.example.com/api");
        assert_eq!(loaded.purchase.idproveedor, Some(3));

        std::fs::remove_dir_all(dir).ok();
    }
}
