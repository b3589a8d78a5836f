//! Repository configuration stored in `.gwt.json`.
//!
//! The file only exists while the configuration differs from the defaults.
//! A missing file is not an error; it means "use defaults". Saving a default
//! configuration deletes the file, so a load followed by a save never creates
//! one.
//!
//! ```json
//! {
//!   "main_branch": "develop",
//!   "copy_files": [
//!     ".env",
//!     ".env.local"
//!   ]
//! }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::GwtError;

pub const CONFIG_FILE: &str = ".gwt.json";

const DEFAULT_MAIN_BRANCH: &str = "main";

/// Per-repository settings for `gwt add`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GwtConfig {
    /// Branch whose worktree files are copied from
    pub main_branch: String,
    /// Paths, relative to a worktree root, copied into each new worktree
    pub copy_files: Vec<String>,
}

impl Default for GwtConfig {
    fn default() -> Self {
        Self {
            main_branch: DEFAULT_MAIN_BRANCH.to_string(),
            copy_files: Vec::new(),
        }
    }
}

impl GwtConfig {
    #[must_use]
    pub fn path(repo_dir: &Path) -> PathBuf {
        repo_dir.join(CONFIG_FILE)
    }

    #[must_use]
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Loads the configuration of the repository rooted at `repo_dir`.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read, or
    /// [`GwtError::ConfigParse`] if it is not valid JSON. A corrupt file is
    /// reported instead of being treated as defaults.
    pub fn load(repo_dir: &Path) -> Result<Self> {
        let path = Self::path(repo_dir);

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => {
                return Err(GwtError::Io(err))
                    .with_context(|| format!("Failed to read {}", path.display()));
            }
        };

        let config = serde_json::from_str(&content)
            .map_err(|source| GwtError::ConfigParse { path, source })?;
        Ok(config)
    }

    /// Saves the configuration, or removes the file when it equals the defaults.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written or removed
    pub fn save(&self, repo_dir: &Path) -> Result<()> {
        let path = Self::path(repo_dir);

        if self.is_default() {
            return match fs::remove_file(&path) {
                Ok(()) => {
                    log::debug!("removed {} (configuration is default)", path.display());
                    Ok(())
                }
                Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
                Err(err) => Err(GwtError::Io(err))
                    .with_context(|| format!("Failed to remove {}", path.display())),
            };
        }

        let mut data =
            serde_json::to_string_pretty(self).context("Failed to serialize configuration")?;
        data.push('\n');

        fs::write(&path, data)
            .map_err(GwtError::Io)
            .with_context(|| format!("Failed to write {}", path.display()))
    }
}
