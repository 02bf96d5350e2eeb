//! Configuration loading and management
//!
//! Handles parsing of `taskdeck.toml` configuration files.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file name searched for in the working directory
pub const CONFIG_FILE: &str = "taskdeck.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Store configuration
    #[serde(default)]
    pub store: StoreConfig,
}

/// Document store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store root directory. Defaults to the platform data dir when unset.
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Lock acquisition timeout in milliseconds
    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,
}

fn default_lock_timeout_ms() -> u64 {
    crate::lock::DEFAULT_LOCK_TIMEOUT_MS
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: None,
            lock_timeout_ms: default_lock_timeout_ms(),
        }
    }
}

impl StoreConfig {
    /// Resolve the store root: explicit path, or the platform data dir.
    pub fn resolved_path(&self) -> crate::error::Result<PathBuf> {
        if let Some(path) = &self.path {
            return Ok(path.clone());
        }
        directories::ProjectDirs::from("io", "taskdeck", "taskdeck")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or_else(|| {
                crate::error::Error::InvalidConfig(
                    "cannot determine a data directory; set store.path".to_string(),
                )
            })
    }
}

impl Config {
    /// Load configuration from a `taskdeck.toml` file
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a directory, or return defaults
    pub fn load_from_dir(dir: &Path) -> Self {
        let config_path = dir.join(CONFIG_FILE);
        if config_path.exists() {
            Self::load(&config_path).unwrap_or_default()
        } else {
            Self::default()
        }
    }

    fn validate(&self) -> crate::error::Result<()> {
        if self.store.lock_timeout_ms == 0 {
            return Err(crate::error::Error::InvalidConfig(
                "store.lock_timeout_ms must be > 0".to_string(),
            ));
        }
        if let Some(path) = &self.store.path {
            if path.as_os_str().is_empty() {
                return Err(crate::error::Error::InvalidConfig(
                    "store.path cannot be empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn defaults_are_expected() {
        let cfg = Config::default();
        assert!(cfg.store.path.is_none());
        assert_eq!(
            cfg.store.lock_timeout_ms,
            crate::lock::DEFAULT_LOCK_TIMEOUT_MS
        );
    }

    #[test]
    fn load_parses_overrides() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        let content = r#"
[store]
path = "/var/lib/taskdeck"
lock_timeout_ms = 250
"#;
        fs::write(&path, content.trim()).expect("write config");

        let cfg = Config::load(&path).expect("load config");
        assert_eq!(cfg.store.path, Some(PathBuf::from("/var/lib/taskdeck")));
        assert_eq!(cfg.store.lock_timeout_ms, 250);
    }

    #[test]
    fn zero_lock_timeout_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[store]\nlock_timeout_ms = 0").expect("write config");

        let err = Config::load(&path).expect_err("invalid config");
        match err {
            crate::error::Error::InvalidConfig(_) => {}
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn load_from_dir_defaults_when_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = Config::load_from_dir(dir.path());
        assert!(cfg.store.path.is_none());
    }

    #[test]
    fn explicit_path_wins_over_data_dir() {
        let cfg = StoreConfig {
            path: Some(PathBuf::from("/tmp/deck")),
            lock_timeout_ms: 100,
        };
        assert_eq!(cfg.resolved_path().unwrap(), PathBuf::from("/tmp/deck"));
    }
}
