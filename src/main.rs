use clap::{CommandFactory, Parser, Subcommand, ValueHint};
use gwt::Result;
use gwt::commands::init::InitOptions;
use gwt::commands::{add, clone, init, passthrough};
use gwt::error::GitError;
use gwt::exec::exit_code;
use gwt::hook::{PackageManager, VersionManager};
use gwt::shell::{self, Shell};

const LOG_ENV: &str = "GWT_LOG";

#[derive(Parser)]
#[command(name = "gwt")]
#[command(about = "A git worktree wrapper that names worktrees after their branches")]
#[command(version)]
pub struct Cli {
    /// Print debug logging to stderr (overridden by GWT_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a worktree at a path derived from the branch name
    ///
    /// Accepts the same arguments as `git worktree add`, without the path.
    Add {
        #[arg(
            trailing_var_arg = true,
            allow_hyphen_values = true,
            value_hint = ValueHint::Other
        )]
        args: Vec<String>,
    },
    /// Clone a repository into a bare layout with a worktree for its default branch
    Clone {
        /// Repository URL
        #[arg(value_hint = ValueHint::Url)]
        url: String,
        /// Destination directory (defaults to the repository name)
        #[arg(value_hint = ValueHint::DirPath)]
        dir: Option<String>,
    },
    /// Configure the current repository and optionally install the post-checkout hook
    Init {
        /// Branch whose worktree files are copied from
        #[arg(long, value_hint = ValueHint::Other)]
        main_branch: Option<String>,
        /// File to copy into new worktrees (repeatable)
        #[arg(long = "copy", value_name = "FILE")]
        copy_files: Vec<String>,
        /// Start from the default configuration
        #[arg(long)]
        reset: bool,
        /// Install the post-checkout hook
        #[arg(long)]
        hook: bool,
        /// Version manager the hook runs
        #[arg(long, value_enum)]
        version_manager: Option<VersionManager>,
        /// Package manager the hook runs
        #[arg(long, value_enum)]
        package_manager: Option<PackageManager>,
        /// Overwrite an existing post-checkout hook
        #[arg(long)]
        force: bool,
        /// Choose files and tools interactively
        #[arg(long)]
        interactive: bool,
    },
    /// Print the shell function that lets gwt change directory
    ShellInit {
        /// Shell to generate integration for
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Any other subcommand is passed to `git worktree`
    #[command(external_subcommand)]
    External(Vec<String>),
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::new().filter_or(LOG_ENV, default))
        .format_timestamp(None)
        .init();
}

/// Puts back a `--` given directly after `add`, which clap consumes as its own
/// end-of-options marker before the trailing arguments are collected.
fn restore_separator<I>(argv: I, mut args: Vec<String>) -> Vec<String>
where
    I: IntoIterator<Item = std::ffi::OsString>,
{
    let mut after_add = argv.into_iter().skip(1).skip_while(|arg| arg != "add");
    after_add.next();
    let separated = after_add.next().is_some_and(|arg| arg == "--");
    if separated && args.first().is_none_or(|first| first != "--") {
        args.insert(0, "--".to_string());
    }
    args
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Add { args } => {
            add::add_worktree(&restore_separator(std::env::args_os(), args))?;
        }
        Commands::Clone { url, dir } => {
            clone::clone_repository(&url, dir.as_deref())?;
        }
        Commands::Init {
            main_branch,
            copy_files,
            reset,
            hook,
            version_manager,
            package_manager,
            force,
            interactive,
        } => {
            init::init_repository(&InitOptions {
                main_branch,
                copy_files,
                reset,
                hook,
                version_manager,
                package_manager,
                force,
                interactive,
            })?;
        }
        Commands::ShellInit { shell } => {
            print!("{}", shell::integration_script(shell));
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            shell::generate_completions(shell, &mut cmd);
        }
        Commands::External(args) => {
            passthrough::forward(&args)?;
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = run(cli.command);
    if let Err(err) = &result {
        // a bare streamed git failure was already reported on the inherited stderr
        let reported_by_git = err.chain().count() == 1
            && matches!(
                err.downcast_ref::<GitError>(),
                Some(GitError::Exited { stderr, .. }) if stderr.is_empty()
            );
        if !reported_by_git {
            eprintln!("Error: {err:#}");
        }
    }
    std::process::exit(exit_code(result.as_ref().err()));
}
