use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::error::{GitError, GwtError};
use crate::path::absolutize;
use crate::traits::{CommandRunner, Environment};

/// The repository every worktree path and hook is based on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoContext {
    /// Absolute root: the working tree top level, or the directory holding
    /// the bare store when worktrees live next to it.
    pub dir: PathBuf,
    pub is_bare: bool,
    /// Bare store git must be pointed at explicitly. The root of a bare layout
    /// is not always inside a repository itself, as with a plain `proj.git`.
    pub git_dir: Option<PathBuf>,
}

impl RepoContext {
    /// Resolves the repository root from the current working directory.
    ///
    /// Works from the root of a bare store, from inside a regular checkout, and
    /// from inside any worktree of a "bare store + sibling worktrees" layout.
    /// In that layout the shared common directory is bare, so the root is its
    /// parent rather than the worktree the command was run from.
    ///
    /// # Errors
    /// Returns [`GwtError::NotARepository`] with git's diagnostic if any query fails
    pub fn resolve(runner: &dyn CommandRunner, env: &dyn Environment) -> Result<Self> {
        let cwd = env.current_dir()?;

        let is_bare = query(runner, &["rev-parse", "--is-bare-repository"])? == "true";
        let candidate = if is_bare {
            query(runner, &["rev-parse", "--git-dir"])?
        } else {
            query(runner, &["rev-parse", "--show-toplevel"])?
        };
        let mut context = Self {
            dir: absolutize(&cwd, Path::new(&candidate)),
            is_bare,
            git_dir: None,
        };

        let common_dir = absolutize(
            &cwd,
            Path::new(&query(runner, &["rev-parse", "--git-common-dir"])?),
        );
        let common_arg = common_dir.to_string_lossy().into_owned();
        let common_is_bare = query(
            runner,
            &["--git-dir", common_arg.as_str(), "rev-parse", "--is-bare-repository"],
        )? == "true";

        if common_is_bare {
            if let Some(parent) = common_dir.parent() {
                context.dir = parent.to_path_buf();
            }
            context.is_bare = true;
            context.git_dir = Some(common_dir);
        }

        log::debug!(
            "resolved repository root {} (bare: {})",
            context.dir.display(),
            context.is_bare
        );
        Ok(context)
    }
}

fn query(runner: &dyn CommandRunner, args: &[&str]) -> Result<String> {
    runner.capture(None, args).map_err(|err| {
        let diagnostic = err
            .downcast_ref::<GitError>()
            .map_or_else(|| format!("{err:#}"), GitError::diagnostic);
        GwtError::NotARepository(diagnostic).into()
    })
}
