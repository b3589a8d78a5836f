use anyhow::Result;
use std::path::PathBuf;

use crate::config::GwtConfig;
use crate::copy::validate_copy_name;
use crate::error::GwtError;
use crate::exec::{ProcessEnvironment, SystemGit};
use crate::git::{GitRepo, RepoContext};
use crate::hook::{self, HOOK_NAME, HookConfig, PackageManager, VersionManager};
use crate::selection::{RealSelectionProvider, SelectionProvider, prompt_hook_options};
use crate::traits::{CommandRunner, Environment};

/// Flags accepted by `gwt init`.
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    pub main_branch: Option<String>,
    /// Added to the configured copy files, skipping ones already present
    pub copy_files: Vec<String>,
    /// Start from the default configuration instead of the saved one
    pub reset: bool,
    pub hook: bool,
    pub version_manager: Option<VersionManager>,
    pub package_manager: Option<PackageManager>,
    /// Overwrite an existing post-checkout hook
    pub force: bool,
    pub interactive: bool,
}

impl InitOptions {
    fn wants_hook(&self) -> bool {
        self.hook
            || self.interactive
            || self.version_manager.is_some()
            || self.package_manager.is_some()
    }
}

pub fn init_repository(options: &InitOptions) -> Result<()> {
    init_repository_with(
        &SystemGit,
        &ProcessEnvironment,
        &RealSelectionProvider,
        options,
    )
    .map(|_| ())
}

/// Prepares the current repository for gwt and returns the installed hook, if any.
///
/// Copy names and an existing hook are checked before anything is written, so
/// a refused run leaves the repository as it was.
///
/// # Errors
/// Returns an error if the repository cannot be resolved, a copy name escapes
/// the worktree, the fetch refspec or configuration cannot be written, or a
/// hook exists and `force` is not set
pub fn init_repository_with(
    runner: &dyn CommandRunner,
    env: &dyn Environment,
    provider: &dyn SelectionProvider,
    options: &InitOptions,
) -> Result<Option<PathBuf>> {
    let context = RepoContext::resolve(runner, env)?;
    let repo = GitRepo::new(runner, context);

    for file in &options.copy_files {
        validate_copy_name(file)?;
    }

    let hooks_dir = if options.wants_hook() {
        let hooks_dir = repo.hooks_dir()?;
        let hook_path = hooks_dir.join(HOOK_NAME);
        if !options.force && hook_path.exists() {
            return Err(GwtError::AlreadyExists(hook_path).into());
        }
        Some(hooks_dir)
    } else {
        None
    };

    if repo.context().is_bare && repo.configure_fetch()? {
        println!("Configured remote.origin.fetch to fetch all branches");
    }

    let mut config = if options.reset {
        GwtConfig::default()
    } else {
        GwtConfig::load(repo.dir())?
    };
    if let Some(branch) = &options.main_branch {
        config.main_branch.clone_from(branch);
    }
    for file in &options.copy_files {
        if !config.copy_files.contains(file) {
            config.copy_files.push(file.clone());
        }
    }

    let mut version_manager = options.version_manager.unwrap_or_default();
    let mut package_manager = options.package_manager.unwrap_or_default();
    if options.interactive {
        let answers = prompt_hook_options(provider, &config.copy_files)?;
        for file in &answers.copy_files {
            validate_copy_name(file)?;
        }
        config.copy_files = answers.copy_files;
        version_manager = answers.version_manager;
        package_manager = answers.package_manager;
    }

    config.save(repo.dir())?;
    if config.is_default() {
        println!("Using default configuration");
    } else {
        println!("Saved configuration to {}", GwtConfig::path(repo.dir()).display());
    }

    let Some(hooks_dir) = hooks_dir else {
        return Ok(None);
    };

    let base_path = match repo.worktree_path_for_branch(&config.main_branch) {
        Ok(path) => path,
        Err(err) => {
            log::debug!("falling back to repository root as hook base: {err:#}");
            repo.dir().to_path_buf()
        }
    };
    let hook_config = HookConfig {
        base_path: base_path.to_string_lossy().into_owned(),
        copy_files: config.copy_files.clone(),
        version_manager,
        package_manager,
    };

    let hook_path = hook::install(&hooks_dir, &hook_config, options.force)?;
    println!("✓ Installed {}", hook_path.display());
    Ok(Some(hook_path))
}
