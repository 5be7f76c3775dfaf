//! Configuration loading.
//!
//! Values are layered with figment: built-in defaults, then the TOML file,
//! then `RENTAL_SCOUT_` environment variables (`__` separates sections, so
//! `RENTAL_SCOUT_BACKEND__API_TOKEN` sets `backend.api_token`).

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::Collection;

const APP_DIR_NAME: &str = "rental-scout";
const CONFIG_FILE_NAME: &str = "config.toml";
const ENV_PREFIX: &str = "RENTAL_SCOUT_";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend: BackendConfig,
    pub storage: StorageConfig,
}

/// Where the hosted record API lives and how to talk to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub base_url: String,
    /// Identifier of the base (workspace) holding both tables
    pub base_id: String,
    pub api_token: String,
    pub locations_table: String,
    pub characteristics_table: String,
    /// Named view that fixes the listing order
    pub view: String,
    /// Serve a built-in sample catalog instead of calling the API
    pub offline: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory for on-device state. Defaults to the platform data dir.
    pub data_dir: Option<PathBuf>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.airtable.com/v0".to_string(),
            base_id: String::new(),
            api_token: String::new(),
            locations_table: "locacoes".to_string(),
            characteristics_table: "caracteristicas".to_string(),
            view: "Grid view".to_string(),
            offline: false,
        }
    }
}

impl BackendConfig {
    pub fn table(&self, collection: Collection) -> &str {
        match collection {
            Collection::Locations => &self.locations_table,
            Collection::Characteristics => &self.characteristics_table,
        }
    }
}

impl Config {
    /// Load from `config_path`, or the default path when `None`. A missing file is not an error.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config = Self::extract_from(config_path)?;
        config.validate()?;
        Ok(config)
    }

    /// Merge all sources without validating, so callers can apply overrides first
    pub fn extract_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);
        Ok(Self::figment(&config_file).extract()?)
    }

    fn figment(config_file: &Path) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(APP_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(APP_DIR_NAME)
    }

    pub fn data_dir(&self) -> PathBuf {
        self.storage
            .data_dir
            .clone()
            .unwrap_or_else(Self::default_data_dir)
    }

    pub fn validate(&self) -> Result<()> {
        let backend = &self.backend;

        if !backend.base_url.starts_with("http://") && !backend.base_url.starts_with("https://") {
            return Err(Error::ConfigValidation {
                message: format!("base_url must be an http(s) URL, got {:?}", backend.base_url),
            });
        }

        if backend.locations_table.is_empty() || backend.characteristics_table.is_empty() {
            return Err(Error::ConfigValidation {
                message: "table names cannot be empty".to_string(),
            });
        }

        if backend.offline {
            return Ok(());
        }

        if backend.base_id.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "backend.base_id is required unless offline mode is on".to_string(),
            });
        }

        if backend.api_token.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "backend.api_token is required unless offline mode is on".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn online_config() -> Config {
        let mut config = Config::default();
        config.backend.base_id = "appTest".into();
        config.backend.api_token = "patTest".into();
        config
    }

    #[test]
    fn test_defaults() {
        let backend = BackendConfig::default();
        assert_eq!(backend.base_url, "https://api.airtable.com/v0");
        assert_eq!(backend.table(Collection::Locations), "locacoes");
        assert_eq!(backend.table(Collection::Characteristics), "caracteristicas");
        assert_eq!(backend.view, "Grid view");
        assert!(!backend.offline);
    }

    #[test]
    fn test_default_config_requires_credentials() {
        let err = Config::default().validate().unwrap_err().to_string();
        assert!(err.contains("base_id"));

        let mut config = online_config();
        config.backend.api_token = " ".into();
        assert!(config.validate().unwrap_err().to_string().contains("api_token"));
    }

    #[test]
    fn test_offline_skips_credentials() {
        let mut config = Config::default();
        config.backend.offline = true;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_non_http_base_url() {
        let mut config = online_config();
        config.backend.base_url = "ftp://example.com".into();
        assert!(config.validate().unwrap_err().to_string().contains("base_url"));
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[backend]
base_id = "appFromFile"
api_token = "patFromFile"
locations_table = "rentals"

[storage]
data_dir = "/tmp/rental-scout-test"
"#,
        )
        .unwrap();

        let config = Config::load_from(Some(path)).unwrap();
        assert_eq!(config.backend.base_id, "appFromFile");
        assert_eq!(config.backend.table(Collection::Locations), "rentals");
        assert_eq!(config.backend.table(Collection::Characteristics), "caracteristicas");
        assert_eq!(config.data_dir(), PathBuf::from("/tmp/rental-scout-test"));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let result = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml")));
        // Defaults alone carry no credentials
        assert!(matches!(result, Err(Error::ConfigValidation { .. })));
    }
}
