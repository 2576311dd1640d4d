//! On-disk keypair storage.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Result, TallyError};

use super::keypair::Keypair;

/// Stores keypairs as JSON files under `<home>/keys/`.
///
/// One keypair per file; `default.json` is the account the CLI uses when no
/// account is named explicitly.
#[derive(Debug, Clone)]
pub struct Keystore {
    dir: PathBuf,
}

impl Keystore {
    const DEFAULT_NAME: &'static str = "default";

    /// Keystore rooted at the given tally home directory.
    pub fn new(home: &Path) -> Self {
        Self {
            dir: home.join("keys"),
        }
    }

    /// Directory the key files live in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the default keypair file.
    pub fn default_path(&self) -> PathBuf {
        self.dir.join(format!("{}.json", Self::DEFAULT_NAME))
    }

    /// Whether a default keypair is on disk.
    pub fn exists(&self) -> bool {
        self.default_path().is_file()
    }

    /// Write the default keypair.
    ///
    /// Refuses to clobber an existing file unless `force` is set. On unix
    /// the file is restricted to the owner, like an SSH private key.
    pub fn save(&self, keypair: &Keypair, force: bool) -> Result<()> {
        let path = self.default_path();
        if path.exists() && !force {
            return Err(TallyError::KeypairExists { path });
        }

        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(keypair).map_err(|e| TallyError::KeypairParse {
            path: path.clone(),
            message: e.to_string(),
        })?;
        fs::write(&path, json)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o600))?;
        }

        debug!("saved keypair to {}", path.display());
        Ok(())
    }

    /// Load the default keypair.
    pub fn load(&self) -> Result<Keypair> {
        let path = self.default_path();
        if !path.is_file() {
            return Err(TallyError::KeypairNotFound { path });
        }

        let content = fs::read_to_string(&path)?;
        serde_json::from_str(&content).map_err(|e| TallyError::KeypairParse {
            path,
            message: e.to_string(),
        })
    }
}
