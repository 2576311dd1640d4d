//! Configuration file discovery and loading.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Result, TallyError};

use super::schema::Config;

/// The tally home directory: `$TALLY_HOME` if set, else `~/.config/tally`.
///
/// Everything tally persists (config, keys, history) lives under this one
/// directory, so tests point `TALLY_HOME` at a tempdir and the real
/// filesystem is never touched.
pub fn tally_home() -> PathBuf {
    if let Ok(home) = std::env::var("TALLY_HOME") {
        if !home.is_empty() {
            return PathBuf::from(home);
        }
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("tally")
}

/// Default config file path under the given home.
pub fn config_path(home: &Path) -> PathBuf {
    home.join("config.yml")
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit `--config` path must exist; the default path is allowed
    /// to be missing (defaults apply). A file that exists but fails to
    /// parse is always an error.
    pub fn load(explicit: Option<&Path>, home: &Path) -> Result<Self> {
        let (path, must_exist) = match explicit {
            Some(path) => (path.to_path_buf(), true),
            None => (config_path(home), false),
        };

        if !path.is_file() {
            if must_exist {
                return Err(TallyError::ConfigNotFound { path });
            }
            debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config = serde_yaml::from_str(&content).map_err(|e| TallyError::ConfigParseError {
            path: path.clone(),
            message: e.to_string(),
        })?;
        debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Write the resolved configuration to the default path, creating
    /// parent directories as needed.
    pub fn save(&self, home: &Path) -> Result<()> {
        let path = config_path(home);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(self).map_err(|e| TallyError::ConfigParseError {
            path: path.clone(),
            message: e.to_string(),
        })?;
        fs::write(&path, yaml)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_default_config_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let config = Config::load(None, temp.path()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope.yml");

        let err = Config::load(Some(&missing), temp.path()).unwrap_err();
        assert!(matches!(err, TallyError::ConfigNotFound { .. }));
    }

    #[test]
    fn loads_default_path_when_present() {
        let temp = TempDir::new().unwrap();
        fs::write(
            config_path(temp.path()),
            "rpc_url: http://node:9000\nnetwork: testnet\n",
        )
        .unwrap();

        let config = Config::load(None, temp.path()).unwrap();
        assert_eq!(config.rpc_url, "http://node:9000");
        assert_eq!(config.network, "testnet");
    }

    #[test]
    fn loads_explicit_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("custom.yml");
        fs::write(&path, "timeout_seconds: 5\n").unwrap();

        let config = Config::load(Some(&path), temp.path()).unwrap();
        assert_eq!(config.timeout_seconds, 5);
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        let temp = TempDir::new().unwrap();
        fs::write(config_path(temp.path()), "rpc_url: [unclosed").unwrap();

        let err = Config::load(None, temp.path()).unwrap_err();
        assert!(matches!(err, TallyError::ConfigParseError { .. }));
    }

    #[test]
    fn save_then_load_round_trips() {
        let temp = TempDir::new().unwrap();
        let home = temp.path().join("nested").join("tally");

        let config = Config {
            default_account: Some("alice".to_string()),
            ..Config::default()
        };
        config.save(&home).unwrap();

        let loaded = Config::load(None, &home).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn config_path_is_under_home() {
        let path = config_path(Path::new("/tmp/tally-home"));
        assert_eq!(path, Path::new("/tmp/tally-home/config.yml"));
    }
}
