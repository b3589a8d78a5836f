//! # gwt
//!
//! A thin front end for `git worktree` that derives worktree directories from
//! branch names, understands bare-repository layouts, and prepares new
//! worktrees through a generated post-checkout hook.
//!
//! ## Features
//!
//! - **Derived Paths** - `gwt add feature/login` creates `<root>/feature-login`
//! - **Bare Layouts** - `gwt clone` sets up `<dir>/.bare` with worktrees next to it
//! - **File Copying** - Copies untracked files such as `.env` into new worktrees
//! - **Post-checkout Hook** - Runs version and package manager setup on first checkout
//! - **Passthrough** - Any other subcommand is handed to `git worktree` unchanged
//!
//! ## Quick Start
//!
//! ```bash
//! # Clone into a bare layout with a worktree for the default branch
//! gwt clone https://github.com/user/project.git
//!
//! # Copy .env into every new worktree and install the hook
//! gwt init --copy .env --hook --package-manager pnpm
//!
//! # Create a worktree for a new branch at <root>/feat-x
//! gwt add -b feat/x origin/main
//!
//! # Everything else goes to git worktree
//! gwt list
//! ```
//!
//! ## Module Structure
//!
//! - [`commands`] - Command implementations (add, clone, init, passthrough)
//! - [`git`] - Repository resolution, argument rewriting and git invocations
//! - [`config`] - The `.gwt.json` repository configuration
//! - [`hook`] - Post-checkout hook rendering and installation
//! - [`copy`] - Copying files between worktrees
//! - [`shell`] - Shell integration and completions
//! - [`selection`] - Abstracts interactive prompts for testability
//! - [`traits`] - `CommandRunner` and `Environment` seams for testability
//! - [`exec`] - Production implementations of those seams

pub mod commands;
pub mod config;
pub mod copy;
pub mod error;
pub mod exec;
pub mod git;
pub mod hook;
pub mod path;
pub mod selection;
pub mod shell;
pub mod traits;

pub use anyhow::Result;
