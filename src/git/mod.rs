pub mod args;
pub mod context;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub use args::{AddSpec, branch_to_dir, build_add_args};
pub use context::RepoContext;

use crate::error::{GitError, GwtError};
use crate::path::absolutize;
use crate::traits::CommandRunner;

/// Refspec that makes `git fetch` in a bare clone update every remote branch.
pub const ORIGIN_FETCH_REFSPEC: &str = "+refs/heads/*:refs/remotes/origin/*";

/// Name of the bare store inside a cloned layout.
pub const BARE_DIR: &str = ".bare";

/// A resolved repository plus the runner used to talk to git about it.
///
/// Every git invocation runs with the repository root as working directory,
/// and with `--git-dir` when the context names a bare store.
pub struct GitRepo<'a> {
    runner: &'a dyn CommandRunner,
    context: RepoContext,
}

impl<'a> GitRepo<'a> {
    #[must_use]
    pub fn new(runner: &'a dyn CommandRunner, context: RepoContext) -> Self {
        Self { runner, context }
    }

    #[must_use]
    pub fn context(&self) -> &RepoContext {
        &self.context
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.context.dir
    }

    fn capture(&self, args: &[&str]) -> Result<String> {
        match &self.context.git_dir {
            Some(git_dir) => {
                let git_dir = git_dir.to_string_lossy();
                let mut full = vec!["--git-dir", &*git_dir];
                full.extend_from_slice(args);
                self.runner.capture(Some(&self.context.dir), &full)
            }
            None => self.runner.capture(Some(&self.context.dir), args),
        }
    }

    fn stream(&self, args: Vec<String>) -> Result<()> {
        let args = match &self.context.git_dir {
            Some(git_dir) => {
                let mut full = vec![
                    "--git-dir".to_string(),
                    git_dir.to_string_lossy().into_owned(),
                ];
                full.extend(args);
                full
            }
            None => args,
        };
        self.runner.stream(Some(&self.context.dir), &args)
    }

    /// Forwards `git worktree <args>` with inherited stdio.
    ///
    /// # Errors
    /// Returns git's failure; [`crate::exec::exit_code`] recovers its exit code
    pub fn passthrough(&self, args: &[String]) -> Result<()> {
        let mut full = vec!["worktree".to_string()];
        full.extend(args.iter().cloned());
        self.stream(full)
    }

    /// Runs `git worktree add` with already rewritten arguments.
    ///
    /// # Errors
    /// Returns an error if git fails to create the worktree
    pub fn add(&self, spec: &AddSpec) -> Result<()> {
        let mut full = vec!["worktree".to_string(), "add".to_string()];
        full.extend(spec.args.iter().cloned());
        self.stream(full)
    }

    /// Ensures `remote.origin.fetch` fetches every branch.
    ///
    /// Returns whether the value had to be written. An unreadable value counts
    /// as unset.
    ///
    /// # Errors
    /// Returns [`GwtError::FetchConfig`] if the value cannot be written
    pub fn configure_fetch(&self) -> Result<bool> {
        if let Ok(current) = self.capture(&["config", "remote.origin.fetch"]) {
            if current == ORIGIN_FETCH_REFSPEC {
                log::debug!("remote.origin.fetch already set");
                return Ok(false);
            }
        }

        self.capture(&["config", "remote.origin.fetch", ORIGIN_FETCH_REFSPEC])
            .map_err(|err| {
                let diagnostic = err
                    .downcast_ref::<GitError>()
                    .map_or_else(|| format!("{err:#}"), GitError::diagnostic);
                GwtError::FetchConfig(diagnostic)
            })?;
        Ok(true)
    }

    /// Finds the worktree that has `branch` checked out.
    ///
    /// # Errors
    /// Returns an error if listing fails or no worktree has the branch
    pub fn worktree_path_for_branch(&self, branch: &str) -> Result<PathBuf> {
        let porcelain = self
            .capture(&["worktree", "list", "--porcelain"])
            .context("Failed to list worktrees")?;

        find_branch_worktree(&porcelain, branch)
            .with_context(|| format!("No worktree found for branch '{branch}'"))
    }

    /// Absolute path of the hooks directory shared by every worktree.
    ///
    /// # Errors
    /// Returns an error if the common directory cannot be determined
    pub fn hooks_dir(&self) -> Result<PathBuf> {
        let common = self
            .capture(&["rev-parse", "--git-common-dir"])
            .context("Failed to locate the git common directory")?;
        Ok(absolutize(&self.context.dir, Path::new(&common)).join("hooks"))
    }

    /// Branch `HEAD` points at in the shared store.
    ///
    /// # Errors
    /// Returns an error if `HEAD` is detached or unreadable
    pub fn default_branch(&self) -> Result<String> {
        self.capture(&["symbolic-ref", "--short", "HEAD"])
            .context("Failed to determine the default branch")
    }

    /// Fetches every branch from `origin`, streaming progress.
    ///
    /// # Errors
    /// Returns an error if the fetch fails
    pub fn fetch_origin(&self) -> Result<()> {
        self.stream(vec!["fetch".to_string(), "origin".to_string()])
            .context("Failed to fetch from origin")
    }
}

/// Clones `url` as a bare store into `<dir>/.bare` and links `<dir>/.git` to it.
///
/// Afterwards `dir` behaves as the root of a bare-container layout: git
/// commands run there see a bare repository, and worktrees are created as
/// siblings of `.bare`.
///
/// # Errors
/// Returns an error if the clone fails or the `.git` link cannot be written
pub fn clone_bare(runner: &dyn CommandRunner, url: &str, dir: &Path) -> Result<RepoContext> {
    let store = dir.join(BARE_DIR);
    let store_arg = store.to_string_lossy().into_owned();

    runner
        .stream(
            None,
            &[
                "clone".to_string(),
                "--bare".to_string(),
                url.to_string(),
                store_arg,
            ],
        )
        .with_context(|| format!("Failed to clone {url}"))?;

    std::fs::write(dir.join(".git"), format!("gitdir: ./{BARE_DIR}\n"))
        .with_context(|| format!("Failed to write {}", dir.join(".git").display()))?;

    Ok(RepoContext {
        dir: dir.to_path_buf(),
        is_bare: true,
        git_dir: Some(store),
    })
}

/// Repository name from a clone URL: the last path component without `.git`.
#[must_use]
pub fn repo_name(url: &str) -> String {
    let trimmed = url.trim_end_matches('/');
    let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);
    let trimmed = trimmed.trim_end_matches('/');

    trimmed
        .rsplit(['/', ':'])
        .next()
        .unwrap_or(trimmed)
        .to_string()
}

fn find_branch_worktree(porcelain: &str, branch: &str) -> Option<PathBuf> {
    let wanted = format!("refs/heads/{branch}");
    let mut current: Option<&str> = None;

    for line in porcelain.lines() {
        if let Some(path) = line.strip_prefix("worktree ") {
            current = Some(path);
        } else if let Some(head) = line.strip_prefix("branch ") {
            if head == wanted {
                return current.map(PathBuf::from);
            }
        } else if line.is_empty() {
            current = None;
        }
    }

    None
}
