//! Post-checkout hook generation and installation.
//!
//! The hook prepares a freshly created worktree: it copies untracked files
//! (such as `.env`) from a base worktree and runs the project's install and
//! build commands. It only acts on the first checkout of a new worktree, which
//! git reports with an all-zero previous `HEAD` and the branch-checkout flag.

use anyhow::{Context, Result};
use clap::ValueEnum;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::GwtError;

pub const HOOK_NAME: &str = "post-checkout";

const NULL_SHA: &str = "0000000000000000000000000000000000000000";

const GENERATED_MARKER: &str = "# post-checkout hook generated by gwt";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum VersionManager {
    #[default]
    None,
    Asdf,
    Mise,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum PackageManager {
    #[default]
    None,
    Npm,
    Pnpm,
    Yarn,
}

impl VersionManager {
    pub const ALL: [VersionManager; 3] = [Self::None, Self::Asdf, Self::Mise];
}

impl PackageManager {
    pub const ALL: [PackageManager; 4] = [Self::None, Self::Npm, Self::Pnpm, Self::Yarn];

    /// Executable name, empty for [`PackageManager::None`].
    #[must_use]
    pub fn command(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Npm => "npm",
            Self::Pnpm => "pnpm",
            Self::Yarn => "yarn",
        }
    }
}

impl fmt::Display for VersionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Asdf => write!(f, "asdf"),
            Self::Mise => write!(f, "mise"),
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            other => write!(f, "{}", other.command()),
        }
    }
}

/// Everything the rendered hook depends on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HookConfig {
    /// Worktree the copy files are taken from
    pub base_path: String,
    pub copy_files: Vec<String>,
    pub version_manager: VersionManager,
    pub package_manager: PackageManager,
}

impl HookConfig {
    /// Command that builds the project, empty when no package manager is set.
    #[must_use]
    pub fn build_command(&self) -> String {
        match self.package_manager {
            PackageManager::None => String::new(),
            PackageManager::Yarn => "yarn build".to_string(),
            other => format!("{} run build", other.command()),
        }
    }
}

/// Escapes `s` for use inside a single-quoted shell string.
///
/// Each `'` closes the quote, emits an escaped quote, and reopens it.
#[must_use]
pub fn shell_escape(s: &str) -> String {
    s.replace('\'', r"'\''")
}

/// Renders the hook script.
#[must_use]
pub fn render(config: &HookConfig) -> String {
    let mut body = String::new();

    if !config.copy_files.is_empty() {
        let files = config
            .copy_files
            .iter()
            .map(|file| format!("'{}'", shell_escape(file)))
            .collect::<Vec<_>>()
            .join(" ");

        body.push_str(&format!(
            r#"    base_path='{base}'
    for file in {files}; do
        case "/$file/" in
            //*|*/../*|/./)
                echo "gwt: $file is outside the worktree, skipping" >&2
                continue
                ;;
        esac
        if [ -e "$base_path/$file" ]; then
            mkdir -p "$(dirname "$file")"
            cp -R "$base_path/$file" "$file"
        else
            echo "gwt: $base_path/$file not found, skipping" >&2
        fi
    done
"#,
            base = shell_escape(&config.base_path),
        ));
    }

    let exec_prefix = match config.version_manager {
        VersionManager::None => "",
        VersionManager::Asdf => {
            body.push_str(
                r#"    . "${ASDF_DIR:-$HOME/.asdf}/asdf.sh"
    asdf install
"#,
            );
            ""
        }
        VersionManager::Mise => {
            body.push_str("    mise install\n");
            "mise exec -- "
        }
    };

    if config.package_manager != PackageManager::None {
        body.push_str(&format!(
            "    {exec_prefix}{pm} install\n    {exec_prefix}{build}\n",
            pm = config.package_manager.command(),
            build = config.build_command(),
        ));
    }

    if body.is_empty() {
        body.push_str("    :\n");
    }

    format!(
        r#"#!/bin/bash
{GENERATED_MARKER}

# $1 is the previous HEAD, $3 is 1 for a branch checkout.
if [[ "$1" == "{NULL_SHA}" && "$3" == "1" ]]; then
{body}fi
"#
    )
}

/// Whether `hooks_dir` holds a post-checkout hook written by gwt.
#[must_use]
pub fn is_generated(hooks_dir: &Path) -> bool {
    fs::read_to_string(hooks_dir.join(HOOK_NAME))
        .is_ok_and(|script| script.lines().any(|line| line == GENERATED_MARKER))
}

/// Installs the rendered hook as `<hooks_dir>/post-checkout` and returns its path.
///
/// The script is written to a temporary file in `hooks_dir` and renamed over
/// the target, so readers see either the old or the new complete script.
///
/// # Errors
/// Returns [`GwtError::AlreadyExists`] if a hook is present and `force` is false,
/// or an error if the directory or file cannot be written
pub fn install(hooks_dir: &Path, config: &HookConfig, force: bool) -> Result<PathBuf> {
    let hook_path = hooks_dir.join(HOOK_NAME);

    if !force && hook_path.exists() {
        return Err(GwtError::AlreadyExists(hook_path).into());
    }

    let content = render(config);

    fs::create_dir_all(hooks_dir)
        .with_context(|| format!("Failed to create hooks directory {}", hooks_dir.display()))?;

    let mut file = tempfile::NamedTempFile::new_in(hooks_dir)
        .context("Failed to create temporary hook file")?;
    file.write_all(content.as_bytes())
        .context("Failed to write hook")?;
    set_executable(file.path())?;
    file.persist(&hook_path)
        .with_context(|| format!("Failed to write hook {}", hook_path.display()))?;

    log::debug!("installed {}", hook_path.display());
    Ok(hook_path)
}

#[cfg(unix)]
fn set_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
        .context("Failed to make hook executable")
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> Result<()> {
    Ok(())
}
