use anyhow::Result;
use std::path::PathBuf;

use crate::config::GwtConfig;
use crate::copy::copy_files;
use crate::exec::{ProcessEnvironment, SystemGit};
use crate::git::{AddSpec, GitRepo, RepoContext, build_add_args};
use crate::hook;
use crate::shell::write_cd_file;
use crate::traits::{CommandRunner, Environment};

pub fn add_worktree(args: &[String]) -> Result<()> {
    add_worktree_with(&SystemGit, &ProcessEnvironment, args).map(|_| ())
}

/// Creates a worktree at the path derived from its branch name and returns that path.
///
/// Arguments are validated before git runs, so rejected input never creates
/// anything.
///
/// # Errors
/// Returns an error if the repository cannot be resolved, the arguments are
/// invalid, or `git worktree add` fails
pub fn add_worktree_with(
    runner: &dyn CommandRunner,
    env: &dyn Environment,
    args: &[String],
) -> Result<PathBuf> {
    let context = RepoContext::resolve(runner, env)?;
    let repo = GitRepo::new(runner, context);
    let config = GwtConfig::load(repo.dir())?;
    let spec = build_add_args(args, repo.dir())?;

    println!(
        "Creating worktree for branch '{}' at: {}",
        spec.branch,
        spec.path.display()
    );
    repo.add(&spec)?;

    copy_from_main_worktree(&repo, &config, &spec)?;
    write_cd_file(env, &spec.path)?;

    println!("✓ Worktree created successfully!");
    println!("  Branch: {}", spec.branch);
    println!("  Path: {}", spec.path.display());

    Ok(spec.path)
}

fn copy_from_main_worktree(repo: &GitRepo<'_>, config: &GwtConfig, spec: &AddSpec) -> Result<()> {
    if config.copy_files.is_empty() || spec.branch == config.main_branch {
        return Ok(());
    }
    if matches!(repo.hooks_dir(), Ok(dir) if hook::is_generated(&dir)) {
        log::debug!("post-checkout hook copies the configured files");
        return Ok(());
    }

    let source = match repo.worktree_path_for_branch(&config.main_branch) {
        Ok(path) => path,
        Err(err) => {
            eprintln!("Warning: not copying files: {err:#}");
            return Ok(());
        }
    };

    println!("Copying files from {}...", source.display());
    copy_files(&source, &spec.path, &config.copy_files)?;
    Ok(())
}
