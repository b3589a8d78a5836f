#![allow(clippy::unwrap_used)] // Tests use unwrap for simplicity

use anyhow::{Context, Result};
use assert_fs::TempDir;
use assert_fs::fixture::ChildPath;
use assert_fs::prelude::*;
use std::path::Path;
use std::process::Command;

/// Real git repositories in a temporary directory, plus helpers to run `gwt` against them
pub struct CliTestEnvironment {
    /// Repository root: the checkout, or the directory holding `.bare`
    pub root: ChildPath,
    /// Worktree that has `main` checked out
    pub main_worktree: ChildPath,
    temp_dir: TempDir,
}

impl CliTestEnvironment {
    /// Creates a regular repository with one commit on `main`
    ///
    /// # Errors
    /// Returns an error if:
    /// - Failed to create temporary directory
    /// - Failed to initialize git repository
    /// - Failed to create initial commit
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new().context("Failed to create temporary directory")?;
        let root = temp_dir.child("test_repo");
        Self::init_repo(&root)?;

        Ok(Self {
            main_worktree: temp_dir.child("test_repo"),
            root,
            temp_dir,
        })
    }

    /// Creates the layout `gwt clone` produces: `project/.bare` holding a bare
    /// clone of an `origin` repository, `project/.git` pointing at it, and a
    /// `project/main` worktree.
    ///
    /// # Errors
    /// Returns an error if any git step fails
    pub fn new_bare_layout() -> Result<Self> {
        let temp_dir = TempDir::new().context("Failed to create temporary directory")?;
        let origin = temp_dir.child("origin");
        Self::init_repo(&origin)?;
        Self::run_git_command(origin.path(), &["branch", "feature/login"])?;

        let root = temp_dir.child("project");
        root.create_dir_all()?;
        Self::run_git_command(
            root.path(),
            &["clone", "--bare", &origin.path().to_string_lossy(), ".bare"],
        )?;
        root.child(".git").write_str("gitdir: ./.bare\n")?;
        Self::run_git_command(root.path(), &["worktree", "add", "main", "main"])?;

        Ok(Self {
            main_worktree: root.child("main"),
            root,
            temp_dir,
        })
    }

    /// Creates a plain bare clone, `work/project.git`, whose worktrees live
    /// next to it in `work`, with a `work/main` worktree.
    ///
    /// # Errors
    /// Returns an error if any git step fails
    pub fn new_bare_store() -> Result<Self> {
        let temp_dir = TempDir::new().context("Failed to create temporary directory")?;
        let origin = temp_dir.child("origin");
        Self::init_repo(&origin)?;

        let root = temp_dir.child("work");
        root.create_dir_all()?;
        Self::run_git_command(
            root.path(),
            &["clone", "--bare", &origin.path().to_string_lossy(), "project.git"],
        )?;
        Self::run_git_command(
            root.child("project.git").path(),
            &["worktree", "add", "../main", "main"],
        )?;

        Ok(Self {
            main_worktree: root.child("main"),
            root,
            temp_dir,
        })
    }

    fn init_repo(dir: &ChildPath) -> Result<()> {
        dir.create_dir_all()?;
        Self::run_git_command(dir.path(), &["init"])?;
        Self::run_git_command(dir.path(), &["config", "user.name", "Test User"])?;
        Self::run_git_command(dir.path(), &["config", "user.email", "test@example.com"])?;

        dir.child("README.md").write_str("# Test Repo")?;
        Self::run_git_command(dir.path(), &["add", "."])?;
        Self::run_git_command(dir.path(), &["commit", "-m", "Initial commit"])?;

        // Some git versions default to 'master'
        Self::run_git_command(dir.path(), &["branch", "-M", "main"])?;
        Ok(())
    }

    fn run_git_command(dir: &Path, args: &[&str]) -> Result<String> {
        let output = Command::new("git")
            .args(args)
            .current_dir(dir)
            .output()
            .context("Failed to execute git command")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("git {} failed: {}", args.join(" "), stderr);
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Run git in the repository root and return its trimmed stdout
    ///
    /// # Errors
    /// Returns an error if git fails
    pub fn git(&self, args: &[&str]) -> Result<String> {
        Self::run_git_command(self.root.path(), args)
    }

    /// A scratch directory inside the environment that is not a repository
    pub fn scratch_dir(&self) -> ChildPath {
        let dir = self.temp_dir.child("scratch");
        dir.create_dir_all().unwrap();
        dir
    }

    /// Execute `gwt` in the repository root
    ///
    /// # Errors
    /// Returns an error if the binary cannot be found
    pub fn run_command(&self, args: &[&str]) -> Result<assert_cmd::Command> {
        self.run_command_in(self.root.path(), args)
    }

    /// Execute `gwt` in `dir`, isolated from the caller's shell integration
    ///
    /// # Errors
    /// Returns an error if the binary cannot be found
    pub fn run_command_in(&self, dir: &Path, args: &[&str]) -> Result<assert_cmd::Command> {
        let mut cmd =
            assert_cmd::Command::cargo_bin("gwt").context("Failed to find gwt binary")?;

        cmd.current_dir(dir)
            .env_remove("GWT_CD_FILE")
            .env_remove("GWT_LOG")
            .env("GIT_CEILING_DIRECTORIES", self.temp_dir.path());

        cmd.args(args);
        Ok(cmd)
    }

    /// Path `gwt add <branch>` creates
    pub fn worktree_path(&self, branch_name: &str) -> ChildPath {
        self.root.child(branch_name.replace('/', "-"))
    }

    /// Root of the temporary directory
    pub fn temp_path(&self) -> &Path {
        self.temp_dir.path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use predicates::prelude::*;

    #[test]
    fn test_cli_test_environment_creation() -> Result<()> {
        let env = CliTestEnvironment::new()?;

        env.root.assert(predicate::path::is_dir());
        env.root.child(".git").assert(predicate::path::exists());
        env.root
            .child("README.md")
            .assert(predicate::str::contains("# Test Repo"));
        assert_eq!(env.git(&["symbolic-ref", "--short", "HEAD"])?, "main");

        Ok(())
    }

    #[test]
    fn test_bare_layout_creation() -> Result<()> {
        let env = CliTestEnvironment::new_bare_layout()?;

        env.root
            .child(".git")
            .assert(predicate::str::diff("gitdir: ./.bare\n"));
        env.root.child(".bare").assert(predicate::path::is_dir());
        env.main_worktree
            .child("README.md")
            .assert(predicate::path::exists());
        assert_eq!(env.git(&["rev-parse", "--is-bare-repository"])?, "true");

        Ok(())
    }

    #[test]
    fn test_worktree_path_uses_slug() -> Result<()> {
        let env = CliTestEnvironment::new()?;

        let path = env.worktree_path("feature/test-branch");
        assert!(path.path().ends_with("test_repo/feature-test-branch"));

        Ok(())
    }
}
