//! Process execution and ambient environment.
//!
//! [`SystemGit`] is the production [`CommandRunner`]: it shells out to the
//! `git` binary on `PATH`. [`ProcessEnvironment`] reads the real working
//! directory and environment. [`exit_code`] maps the outcome of a command to
//! the status this process should exit with.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use crate::error::GitError;
use crate::traits::{CommandRunner, Environment};

/// Runs the real `git` binary.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemGit;

impl SystemGit {
    fn command(dir: Option<&Path>) -> Command {
        let mut cmd = Command::new("git");
        if let Some(dir) = dir {
            cmd.current_dir(dir);
        }
        cmd
    }
}

impl CommandRunner for SystemGit {
    fn capture(&self, dir: Option<&Path>, args: &[&str]) -> Result<String> {
        let command = args.join(" ");
        log::debug!("git {command} (capture, dir: {:?})", dir);

        let output = Self::command(dir)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| GitError::Launch {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(GitError::Exited {
                command,
                code: status_code(output.status),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            }
            .into());
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn stream(&self, dir: Option<&Path>, args: &[String]) -> Result<()> {
        let command = args.join(" ");
        log::debug!("git {command} (stream, dir: {:?})", dir);

        let status = Self::command(dir)
            .args(args)
            .status()
            .map_err(|source| GitError::Launch {
                command: command.clone(),
                source,
            })?;

        if !status.success() {
            return Err(GitError::Exited {
                command,
                code: status_code(status),
                stderr: String::new(),
            }
            .into());
        }

        Ok(())
    }
}

#[cfg(unix)]
fn status_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;

    status
        .code()
        .or_else(|| status.signal().map(|sig| 128 + sig))
        .unwrap_or(1)
}

#[cfg(not(unix))]
fn status_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}

/// Reads the real process state.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn current_dir(&self) -> Result<PathBuf> {
        std::env::current_dir().context("Failed to get current directory")
    }

    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// Maps the outcome of a command to a process exit code.
///
/// No error is 0. An error caused by git exiting unsuccessfully yields git's
/// own exit code, so scripts see exactly what `git worktree` reported. Any
/// other error (including git failing to start) is 1.
#[must_use]
pub fn exit_code(err: Option<&anyhow::Error>) -> i32 {
    let Some(err) = err else {
        return 0;
    };

    err.chain()
        .find_map(|cause| match cause.downcast_ref::<GitError>() {
            Some(GitError::Exited { code, .. }) => Some(*code),
            _ => None,
        })
        .unwrap_or(1)
}
