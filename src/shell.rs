//! Shell integration: changing the caller's directory after a command.
//!
//! A process cannot change its parent shell's working directory. Instead, the
//! wrapper function printed by `gwt shell-init` points `GWT_CD_FILE` at a
//! temporary file, runs the binary, and `cd`s into whatever path was written
//! there.

use anyhow::{Context, Result};
use clap::{Command, ValueEnum};
use clap_complete::{Shell as CompleteShell, generate};
use std::io;
use std::path::Path;

use crate::traits::Environment;

pub const CD_FILE_ENV: &str = "GWT_CD_FILE";

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
}

/// Writes `path` (without a trailing newline) to the file named by `GWT_CD_FILE`.
///
/// Does nothing when the variable is unset or empty, or when `path` is empty.
///
/// # Errors
/// Returns an error if the file cannot be written
pub fn write_cd_file(env: &dyn Environment, path: &Path) -> Result<()> {
    let Some(cd_file) = env.var(CD_FILE_ENV).filter(|value| !value.is_empty()) else {
        return Ok(());
    };
    if path.as_os_str().is_empty() {
        return Ok(());
    }

    std::fs::write(&cd_file, path.to_string_lossy().as_bytes())
        .with_context(|| format!("Failed to write {CD_FILE_ENV} file {cd_file}"))
}

/// Shell function wrapping the `gwt` binary for the given shell.
#[must_use]
pub fn integration_script(shell: Shell) -> &'static str {
    match shell {
        Shell::Bash | Shell::Zsh => POSIX_INTEGRATION,
        Shell::Fish => FISH_INTEGRATION,
    }
}

/// Generate native shell completions using clap
pub fn generate_completions(shell: Shell, cmd: &mut Command) {
    let clap_shell = match shell {
        Shell::Bash => CompleteShell::Bash,
        Shell::Zsh => CompleteShell::Zsh,
        Shell::Fish => CompleteShell::Fish,
    };

    generate(
        clap_shell,
        cmd,
        cmd.get_name().to_string(),
        &mut io::stdout(),
    );
}

const POSIX_INTEGRATION: &str = r#"# gwt shell integration for Bash and Zsh
# Wraps gwt so `gwt add` and `gwt clone` leave you inside the new worktree.

gwt() {
    local cd_file exit_code
    cd_file="$(mktemp)" || return 1
    GWT_CD_FILE="$cd_file" command gwt "$@"
    exit_code=$?
    if [ -s "$cd_file" ]; then
        cd "$(cat "$cd_file")" || exit_code=1
    fi
    rm -f "$cd_file"
    return $exit_code
}
"#;

const FISH_INTEGRATION: &str = r#"# gwt shell integration for Fish
# Wraps gwt so `gwt add` and `gwt clone` leave you inside the new worktree.

function gwt
    set -l cd_file (mktemp); or return 1
    GWT_CD_FILE=$cd_file command gwt $argv
    set -l cmd_status $status
    if test -s $cd_file
        cd (cat $cd_file); or set cmd_status 1
    end
    rm -f $cd_file
    return $cmd_status
end
"#;
