//! Rewriting of `git worktree add` arguments.
//!
//! Users type `gwt add` with the same arguments they would give
//! `git worktree add`, minus the `<path>`. The path is derived from the branch
//! name and spliced into the argument list where git's grammar expects it:
//!
//! ```text
//! git worktree add [<options>] [-b <new-branch>] <path> [<commit-ish>]
//! ```
//!
//! Two branches that differ only by `/` versus `-` (`a/b` and `a-b`) map to
//! the same directory. That collision is accepted; git refuses the second add
//! because the path already exists.

use std::path::{Path, PathBuf};

use crate::error::GwtError;

/// Flags that consume the following token as their value.
const VALUE_FLAGS: &[&str] = &["-b", "-B", "--orphan", "--reason"];

/// Value flags whose value is the branch the worktree will have checked out.
const BRANCH_FLAGS: &[&str] = &["-b", "-B", "--orphan"];

/// Result of rewriting `worktree add` arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddSpec {
    /// Arguments to pass after `git worktree add`.
    pub args: Vec<String>,
    /// Absolute directory the worktree will be created in.
    pub path: PathBuf,
    pub branch: String,
}

/// Directory name for a branch: every `/` becomes `-`.
#[must_use]
pub fn branch_to_dir(branch: &str) -> String {
    branch.replace('/', "-")
}

/// Rewrites `worktree add` arguments to include the derived worktree path.
///
/// `--orphan` directly followed by another flag is git's boolean form
/// (`--orphan -b <branch>`) and takes no value.
///
/// # Errors
/// Returns [`GwtError::InvalidArguments`] if the arguments are empty, a value
/// flag is missing its value, a branch flag is followed by another flag, or the number of positional arguments does not
/// fit the form used
pub fn build_add_args<S: AsRef<str>>(raw: &[S], repo_root: &Path) -> Result<AddSpec, GwtError> {
    if raw.is_empty() {
        return Err(invalid("requires a branch name"));
    }

    let mut flags: Vec<String> = Vec::new();
    let mut positional: Vec<String> = Vec::new();
    let mut new_branch: Option<String> = None;
    let mut positional_only = false;

    let mut tokens = raw.iter().map(AsRef::as_ref).peekable();
    while let Some(token) = tokens.next() {
        if positional_only {
            positional.push(token.to_string());
            continue;
        }

        if token == "--" {
            positional_only = true;
            flags.push(token.to_string());
            continue;
        }

        if VALUE_FLAGS.contains(&token) {
            let next_is_flag = tokens.peek().is_some_and(|next| next.starts_with('-'));
            if token == "--orphan" && next_is_flag {
                flags.push(token.to_string());
                continue;
            }

            let Some(value) = tokens.next() else {
                return Err(invalid(&format!("flag `{token}` requires a value")));
            };
            if BRANCH_FLAGS.contains(&token) {
                if next_is_flag {
                    return Err(invalid(&format!("flag `{token}` requires a value")));
                }
                new_branch = Some(value.to_string());
            }
            flags.push(token.to_string());
            flags.push(value.to_string());
            continue;
        }

        if let Some((flag, value)) = token.split_once('=') {
            if flag.starts_with("--") && BRANCH_FLAGS.contains(&flag) {
                new_branch = Some(value.to_string());
            }
        }

        if token.starts_with('-') {
            flags.push(token.to_string());
        } else {
            positional.push(token.to_string());
        }
    }

    let (branch, trailing) = match new_branch {
        Some(branch) => {
            if positional.len() > 1 {
                return Err(invalid("too many positional arguments"));
            }
            (branch, positional.pop())
        }
        None => {
            if positional.len() > 1 {
                return Err(invalid("too many positional arguments"));
            }
            let Some(branch) = positional.pop() else {
                return Err(invalid("requires a branch name"));
            };
            (branch.clone(), Some(branch))
        }
    };

    if branch.is_empty() {
        return Err(invalid("branch name must not be empty"));
    }

    let slug = branch_to_dir(&branch);
    if slug == "." || slug == ".." {
        return Err(invalid(&format!("`{branch}` is not a usable worktree directory")));
    }
    let path = repo_root.join(&slug);

    let mut args = flags;
    args.push(slug);
    args.extend(trailing);

    Ok(AddSpec { args, path, branch })
}

fn invalid(reason: &str) -> GwtError {
    GwtError::InvalidArguments(reason.to_string())
}
