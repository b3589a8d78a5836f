use std::path::PathBuf;
use thiserror::Error;

/// Failures the worktree commands report to the user.
///
/// Command code works with `anyhow::Result`; these variants sit at the bottom
/// of the error chain so callers and tests can `downcast_ref` to a specific
/// condition.
#[derive(Debug, Error)]
pub enum GwtError {
    #[error("not in a git repository: {0}")]
    NotARepository(String),

    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("hook already exists at {}; use --force to overwrite", .0.display())]
    AlreadyExists(PathBuf),

    #[error("failed to configure remote.origin.fetch: {0}")]
    FetchConfig(String),

    #[error("failed to parse {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("path {name:?} escapes {kind} directory")]
    PathTraversal { name: String, kind: &'static str },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Failures from running the `git` binary.
#[derive(Debug, Error)]
pub enum GitError {
    /// git ran and exited unsuccessfully.
    #[error("git {command} exited with status {code}{}", stderr_suffix(.stderr))]
    Exited {
        command: String,
        code: i32,
        stderr: String,
    },

    /// git could not be started at all.
    #[error("failed to run git {command}: {source}")]
    Launch {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {trimmed}")
    }
}

impl GitError {
    /// Diagnostic text suitable for wrapping into a higher-level error.
    #[must_use]
    pub fn diagnostic(&self) -> String {
        match self {
            GitError::Exited { stderr, .. } if !stderr.trim().is_empty() => {
                stderr.trim().to_string()
            }
            other => other.to_string(),
        }
    }
}
