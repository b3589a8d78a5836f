use anyhow::Result;
use std::path::{Path, PathBuf};

/// Trait for running `git` to enable faking it in tests
///
/// Errors returned by implementations carry a [`crate::error::GitError`] at the
/// bottom of their chain so callers can recover the child's exit code.
pub trait CommandRunner {
    /// Runs `git <args>` and returns its trimmed stdout. Stderr is captured for
    /// diagnostics and never shown to the user.
    ///
    /// # Errors
    /// Returns an error if git cannot be started or exits unsuccessfully
    fn capture(&self, dir: Option<&Path>, args: &[&str]) -> Result<String>;

    /// Runs `git <args>` with stdin, stdout and stderr inherited from this process.
    ///
    /// # Errors
    /// Returns an error if git cannot be started or exits unsuccessfully
    fn stream(&self, dir: Option<&Path>, args: &[String]) -> Result<()>;
}

/// Trait for the ambient process state: working directory and environment variables
pub trait Environment {
    /// # Errors
    /// Returns an error if the working directory cannot be determined
    fn current_dir(&self) -> Result<PathBuf>;

    fn var(&self, name: &str) -> Option<String>;
}
