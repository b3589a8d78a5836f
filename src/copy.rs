use anyhow::{Context, Result};
use std::fs;
use std::path::{Component, Path};

use crate::error::GwtError;
use crate::path::{absolutize, is_within, normalize};

/// Checks that a configured copy name stays inside any worktree it is copied into.
///
/// Absolute names, names with a `..` component, and names that refer to the
/// worktree itself are rejected. The hook applies the same rule when it runs.
///
/// # Errors
/// Returns [`GwtError::PathTraversal`] for a name that would escape
pub fn validate_copy_name(name: &str) -> Result<(), GwtError> {
    let path = Path::new(name);
    let escapes = path
        .components()
        .any(|c| matches!(c, Component::RootDir | Component::Prefix(_) | Component::ParentDir));

    if name.is_empty() || escapes || normalize(path).as_os_str().is_empty() {
        return Err(GwtError::PathTraversal {
            name: name.to_string(),
            kind: "worktree",
        });
    }
    Ok(())
}

/// Copies `name` from `src_dir` to the same relative path in `dst_dir`.
///
/// Names that resolve outside either directory are rejected with
/// [`GwtError::PathTraversal`]. Parent directories are created as needed and
/// the source file's permissions are preserved.
///
/// # Errors
/// Returns an error if the name escapes a directory, the source cannot be
/// read, or the destination cannot be written
pub fn copy_file_to_worktree(src_dir: &Path, dst_dir: &Path, name: &str) -> Result<()> {
    let src_dir = normalize(src_dir);
    let dst_dir = normalize(dst_dir);

    let src = absolutize(&src_dir, Path::new(name));
    if !is_within(&src_dir, &src) || src == src_dir {
        return Err(GwtError::PathTraversal {
            name: name.to_string(),
            kind: "source",
        }
        .into());
    }

    let dst = absolutize(&dst_dir, Path::new(name));
    if !is_within(&dst_dir, &dst) || dst == dst_dir {
        return Err(GwtError::PathTraversal {
            name: name.to_string(),
            kind: "destination",
        }
        .into());
    }

    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    // fs::copy carries the permission bits over
    fs::copy(&src, &dst).with_context(|| format!("Failed to copy {name}"))?;
    Ok(())
}

/// Copies every name from `src_dir` into `dst_dir`, returning how many were copied.
///
/// A missing or unreadable file is reported as a warning on stderr and the
/// remaining names are still copied.
///
/// # Errors
/// Returns [`GwtError::PathTraversal`] as soon as a name escapes either directory
pub fn copy_files<S: AsRef<str>>(src_dir: &Path, dst_dir: &Path, names: &[S]) -> Result<usize> {
    let mut copied = 0;

    for name in names.iter().map(AsRef::as_ref) {
        match copy_file_to_worktree(src_dir, dst_dir, name) {
            Ok(()) => {
                println!("  Copied: {name}");
                copied += 1;
            }
            Err(err)
                if matches!(
                    err.downcast_ref::<GwtError>(),
                    Some(GwtError::PathTraversal { .. })
                ) =>
            {
                return Err(err);
            }
            Err(err) => {
                log::warn!("copy of {name} failed: {err:?}");
                eprintln!("Warning: skipping {name}: {err:#}");
            }
        }
    }

    Ok(copied)
}
