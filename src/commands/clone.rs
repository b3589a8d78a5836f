use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::exec::{ProcessEnvironment, SystemGit};
use crate::git::{GitRepo, build_add_args, clone_bare, repo_name};
use crate::path::absolutize;
use crate::shell::write_cd_file;
use crate::traits::{CommandRunner, Environment};

pub fn clone_repository(url: &str, dir: Option<&str>) -> Result<()> {
    clone_repository_with(&SystemGit, &ProcessEnvironment, url, dir).map(|_| ())
}

/// Clones `url` into a bare-container layout and checks out its default branch.
///
/// Returns the path of the worktree created for the default branch.
///
/// # Errors
/// Returns an error if the destination is not empty, or any git step fails
pub fn clone_repository_with(
    runner: &dyn CommandRunner,
    env: &dyn Environment,
    url: &str,
    dir: Option<&str>,
) -> Result<PathBuf> {
    let name = dir.map_or_else(|| repo_name(url), str::to_string);
    let target = absolutize(&env.current_dir()?, Path::new(&name));

    ensure_empty(&target)?;
    std::fs::create_dir_all(&target)
        .with_context(|| format!("Failed to create directory {}", target.display()))?;

    println!("Cloning {url} into {}", target.display());
    let context = clone_bare(runner, url, &target)?;
    let repo = GitRepo::new(runner, context);

    repo.configure_fetch()?;
    repo.fetch_origin()?;

    let branch = repo.default_branch()?;
    let spec = build_add_args(&[branch.as_str()], repo.dir())?;
    println!(
        "Creating worktree for branch '{}' at: {}",
        spec.branch,
        spec.path.display()
    );
    repo.add(&spec)?;

    write_cd_file(env, &spec.path)?;
    println!("✓ Repository cloned successfully!");
    Ok(spec.path)
}

fn ensure_empty(target: &Path) -> Result<()> {
    if !target.exists() {
        return Ok(());
    }

    let mut entries = std::fs::read_dir(target)
        .with_context(|| format!("Failed to read {}", target.display()))?;
    if entries.next().is_some() {
        anyhow::bail!(
            "Destination path already exists and is not empty: {}",
            target.display()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::exec::fake::{FakeEnv, FakeGit};
    use crate::git::ORIGIN_FETCH_REFSPEC;
    use std::fs;
    use tempfile::TempDir;

    /// A git call as issued against the store cloned into `root`.
    fn in_store(root: &Path, call: &str) -> String {
        format!("--git-dir {} {call}", root.join(".bare").display())
    }

    fn scripted_clone(root: &Path) -> FakeGit {
        FakeGit::new()
            .ok(
                &in_store(root, &format!("config remote.origin.fetch {ORIGIN_FETCH_REFSPEC}")),
                "",
            )
            .ok(&in_store(root, "symbolic-ref --short HEAD"), "main")
    }

    #[test]
    fn test_clone_builds_bare_layout() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("project");
        let git = scripted_clone(&root);
        let env = FakeEnv::at(&tmp.path().to_string_lossy());

        let path = clone_repository_with(
            &git,
            &env,
            "https://github.com/user/project.git",
            None,
        )
        .unwrap();

        assert_eq!(path, root.join("main"));
        assert_eq!(
            fs::read_to_string(root.join(".git")).unwrap(),
            "gitdir: ./.bare\n"
        );

        let calls: Vec<String> = git.calls.borrow().iter().map(|(_, c)| c.clone()).collect();
        assert_eq!(
            calls[0],
            format!(
                "clone --bare https://github.com/user/project.git {}",
                root.join(".bare").display()
            )
        );
        assert_eq!(git.called(&in_store(&root, "fetch origin")), 1);
        assert_eq!(git.called(&in_store(&root, "worktree add main main")), 1);
    }

    #[test]
    fn test_clone_into_explicit_directory_writes_cd_file() {
        let tmp = TempDir::new().unwrap();
        let cd_file = tmp.path().join("cd-target");
        let git = scripted_clone(&tmp.path().join("work"));
        let env = FakeEnv::at(&tmp.path().to_string_lossy())
            .with_var("GWT_CD_FILE", &cd_file.to_string_lossy());

        let path = clone_repository_with(&git, &env, "git@host:user/repo.git", Some("work"))
            .unwrap();
        assert_eq!(path, tmp.path().join("work/main"));
        assert_eq!(fs::read_to_string(&cd_file).unwrap(), path.to_string_lossy());
    }

    #[test]
    fn test_clone_refuses_non_empty_destination() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("repo")).unwrap();
        fs::write(tmp.path().join("repo/file"), "x").unwrap();
        let git = scripted_clone(&tmp.path().join("repo"));
        let env = FakeEnv::at(&tmp.path().to_string_lossy());

        let err = clone_repository_with(&git, &env, "/src/repo.git", None).unwrap_err();
        assert!(err.to_string().contains("not empty"));
        assert!(git.calls.borrow().is_empty());
    }

    #[test]
    fn test_clone_failure_stops_early() {
        let tmp = TempDir::new().unwrap();
        let store = tmp.path().join("repo/.bare");
        let git = scripted_clone(&tmp.path().join("repo")).stream_exit(
            &format!("clone --bare /src/repo.git {}", store.display()),
            128,
        );
        let env = FakeEnv::at(&tmp.path().to_string_lossy());

        let err = clone_repository_with(&git, &env, "/src/repo.git", None).unwrap_err();
        assert_eq!(crate::exec::exit_code(Some(&err)), 128);
        assert!(git.calls.borrow().iter().all(|(_, call)| !call.ends_with("fetch origin")));
    }
}
