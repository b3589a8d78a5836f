#![allow(clippy::unwrap_used)] // Tests use unwrap for simplicity

use anyhow::Result;
use assert_fs::fixture::ChildPath;
use assert_fs::prelude::*;
use predicates::prelude::*;

/// Write a `.gwt.json` into the repository root
pub fn create_gwt_config(root: &ChildPath, main_branch: &str, copy_files: &[&str]) -> Result<()> {
    let config_content = format!(
        "{{\"main_branch\": {main_branch:?}, \"copy_files\": {copy_files:?}}}\n"
    );

    root.child(".gwt.json").write_str(&config_content)?;

    Ok(())
}

/// Create untracked files a project typically keeps out of git
pub fn create_sample_env_files(worktree: &ChildPath) -> Result<()> {
    worktree.child(".env").write_str("TEST_VAR=test_value")?;
    worktree
        .child(".env.local")
        .write_str("LOCAL_VAR=local_value")?;

    Ok(())
}

/// Assert that the files from [`create_sample_env_files`] were copied to a worktree
pub fn assert_env_files_copied(worktree: &ChildPath) -> Result<()> {
    worktree
        .child(".env")
        .assert(predicate::str::contains("TEST_VAR=test_value"));
    worktree
        .child(".env.local")
        .assert(predicate::str::contains("LOCAL_VAR=local_value"));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_file_helpers() -> Result<()> {
        let temp_dir = assert_fs::TempDir::new()?;
        let worktree = temp_dir.child("main");
        worktree.create_dir_all()?;

        create_sample_env_files(&worktree)?;
        assert_env_files_copied(&worktree)?;

        Ok(())
    }

    #[test]
    fn test_config_helper_writes_json() -> Result<()> {
        let temp_dir = assert_fs::TempDir::new()?;
        let root = temp_dir.child("repo");
        root.create_dir_all()?;

        create_gwt_config(&root, "develop", &[".env", ".env.local"])?;
        root.child(".gwt.json").assert(predicate::str::contains(
            r#""copy_files": [".env", ".env.local"]"#,
        ));

        Ok(())
    }
}
