//! Configuration file handling for niaga.
//!
//! The configuration file is stored at `$NIAGA_HOME/config.json`. It names an optional seed file
//! that replaces the built-in sample records, and whether deletes ask for confirmation. A missing
//! configuration file is not an error: every setting has a default.

use crate::error::{ErrorType, IntoResult, Res};
use crate::model::Dataset;
use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

const APP_NAME: &str = "niaga";
const CONFIG_VERSION: u8 = 1;
const CONFIG_JSON: &str = "config.json";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$NIAGA_HOME` and from there it loads `$NIAGA_HOME/config.json`, if it exists.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
}

impl Config {
    /// Creates the home directory and an initial `config.json` with default settings.
    ///
    /// # Errors
    /// - Returns an error if `config.json` already exists or any file operation fails.
    pub async fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        Self::create_inner(dir.into())
            .await
            .pub_result(ErrorType::Config)
    }

    async fn create_inner(maybe_relative: PathBuf) -> Res<Self> {
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the niaga home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;
        let config_path = root.join(CONFIG_JSON);
        if config_path.exists() {
            bail!("The config file already exists '{}'", config_path.display())
        }
        let config_file = ConfigFile::default();
        config_file.save(&config_path).await?;
        Ok(Self {
            root,
            config_path,
            config_file,
        })
    }

    /// Loads `$NIAGA_HOME/config.json`, or uses default settings when it does not exist.
    pub async fn load(niaga_home: impl Into<PathBuf>) -> Result<Self> {
        let root = niaga_home.into();
        let config_path = root.join(CONFIG_JSON);
        let config_file = if config_path.is_file() {
            ConfigFile::load(&config_path)
                .await
                .pub_result(ErrorType::Config)?
        } else {
            debug!(
                "No config file at '{}', using defaults",
                config_path.display()
            );
            ConfigFile::default()
        };
        Ok(Self {
            root,
            config_path,
            config_file,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn confirm_delete(&self) -> bool {
        self.config_file.confirm_delete
    }

    /// The configured seed file. A relative path is resolved against the home directory.
    pub fn seed_path(&self) -> Option<PathBuf> {
        let p = self.config_file.seed_path.as_ref()?;
        if p.is_absolute() {
            Some(p.clone())
        } else {
            Some(self.root.join(p))
        }
    }

    /// The records a session starts from: the seed file if one is configured, otherwise the
    /// built-in sample records.
    pub async fn dataset(&self) -> Result<Dataset> {
        match self.seed_path() {
            None => Dataset::builtin(),
            Some(path) => {
                debug!("Loading seed data from '{}'", path.display());
                utils::deserialize(&path)
                    .await
                    .context("Unable to load seed data")
                    .pub_result(ErrorType::Config)
            }
        }
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "niaga",
///   "config_version": 1,
///   "seed_path": "seed.json",
///   "confirm_delete": true
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "niaga"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// A JSON dataset to seed sessions with (relative to the home directory or absolute)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    seed_path: Option<PathBuf>,

    /// Whether `delete` asks before removing a record
    #[serde(default = "default_confirm_delete")]
    confirm_delete: bool,
}

fn default_confirm_delete() -> bool {
    true
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            seed_path: None,
            confirm_delete: default_confirm_delete(),
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or names another app.
    async fn load(path: impl AsRef<Path>) -> Res<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path)
            .await
            .with_context(|| format!("Failed to load config file at {}", path.display()))?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    async fn save(&self, path: impl AsRef<Path>) -> Res<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Record;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_create_then_load() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("niaga");
        let created = Config::create(&home).await.unwrap();
        assert!(created.config_path().is_file());
        assert!(created.confirm_delete());

        let loaded = Config::load(created.root()).await.unwrap();
        assert_eq!(loaded.config_file, created.config_file);
        assert_eq!(loaded.seed_path(), None);
    }

    #[tokio::test]
    async fn test_create_twice_fails() {
        let dir = TempDir::new().unwrap();
        Config::create(dir.path()).await.unwrap();
        let err = Config::create(dir.path()).await.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Config);
        assert!(err.to_string().contains("already exists"));
    }

    #[tokio::test]
    async fn test_missing_config_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(dir.path().join("nothing-here")).await.unwrap();
        assert!(config.confirm_delete());
        let data = config.dataset().await.unwrap();
        assert_eq!(data.expenses().len(), 3);
    }

    #[tokio::test]
    async fn test_wrong_app_name() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_JSON),
            r#"{"app_name": "kasir", "config_version": 1}"#,
        )
        .unwrap();
        let err = Config::load(dir.path()).await.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Config);
        assert!(format!("{err}").contains("Invalid app_name"));
    }

    #[tokio::test]
    async fn test_seed_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_JSON),
            r#"{
                "app_name": "niaga",
                "config_version": 1,
                "seed_path": "seed.json",
                "confirm_delete": false
            }"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("seed.json"),
            r#"{"expenses": [
                {"id": 9, "description": "Sewa", "amount": 100, "date": "2024-05-01"}
            ]}"#,
        )
        .unwrap();
        let config = Config::load(dir.path()).await.unwrap();
        assert!(!config.confirm_delete());
        assert_eq!(config.seed_path(), Some(dir.path().join("seed.json")));
        let data = config.dataset().await.unwrap();
        assert_eq!(data.expenses().len(), 1);
        assert_eq!(data.expenses()[0].id(), 9);
        assert!(data.pre_orders().is_empty());
    }

    #[tokio::test]
    async fn test_bad_seed_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_JSON),
            r#"{"app_name": "niaga", "config_version": 1, "seed_path": "missing.json"}"#,
        )
        .unwrap();
        let config = Config::load(dir.path()).await.unwrap();
        let err = config.dataset().await.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Config);
        assert!(err.to_string().starts_with("Unable to load seed data"));
    }
}
