use anyhow::Result;

use crate::exec::{ProcessEnvironment, SystemGit};
use crate::git::{GitRepo, RepoContext};
use crate::traits::{CommandRunner, Environment};

/// Forwards any subcommand gwt does not handle itself to `git worktree`.
pub fn forward(args: &[String]) -> Result<()> {
    forward_with(&SystemGit, &ProcessEnvironment, args)
}

/// # Errors
/// Returns an error if the repository cannot be resolved or git exits
/// unsuccessfully; the latter carries git's exit code
pub fn forward_with(
    runner: &dyn CommandRunner,
    env: &dyn Environment,
    args: &[String],
) -> Result<()> {
    let context = RepoContext::resolve(runner, env)?;
    GitRepo::new(runner, context).passthrough(args)
}
