use std::path::{Component, Path, PathBuf};

/// Makes `path` absolute relative to `base` and removes `.` and `..`
/// components without touching the filesystem.
///
/// `..` at the root stays at the root, matching how the kernel resolves it.
#[must_use]
pub fn absolutize(base: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };
    normalize(&joined)
}

/// Lexically removes `.` and `..` components.
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let at_root = matches!(
                    out.components().next_back(),
                    None | Some(Component::RootDir | Component::Prefix(_))
                );
                if at_root {
                    if out.as_os_str().is_empty() {
                        out.push(component);
                    }
                } else if matches!(out.components().next_back(), Some(Component::ParentDir)) {
                    out.push(component);
                } else {
                    out.pop();
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Whether `path` is `dir` itself or lies beneath it, comparing whole components.
#[must_use]
pub fn is_within(dir: &Path, path: &Path) -> bool {
    path.starts_with(dir)
}
