//! CLI definitions using clap derive API
//!
//! This module is organized into submodules for each command's argument
//! types:
//! - install: Install and ci-install arguments
//! - verify: Verify arguments
//! - update: Update arguments
//! - add: Add arguments
//! - remove: Remove arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod add;
pub mod install;
pub mod remove;
pub mod update;
pub mod verify;

pub use add::AddArgs;
pub use install::{CiInstallArgs, InstallArgs};
pub use remove::RemoveArgs;
pub use update::UpdateArgs;
pub use verify::VerifyArgs;

/// Prompt-Sync - prompt pack manager
///
/// Install versioned prompt packs from git repositories into
/// agent-specific directories, reproducibly.
#[derive(Parser, Debug)]
#[command(
    name = "prompt-sync",
    author,
    version,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Package manager for AI prompt packs",
    long_about = "Prompt-Sync installs versioned prompt packs from git repositories, \
                  renders them into agent-specific formats (Cursor rules, Claude slash \
                  commands), and records content hashes in a lock file so installs are \
                  reproducible and drift is detectable in CI."
)]
pub struct Cli {
    /// Workspace directory (defaults to current directory)
    #[arg(long, short = 'w', global = true, env = "PROMPT_SYNC_WORKSPACE")]
    pub workspace: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a starter Promptsfile
    Init,

    /// Add a prompt source to Promptsfile and install it
    Add(AddArgs),

    /// Remove a prompt source and its rendered files
    Remove(RemoveArgs),

    /// Update sources to their latest versions
    Update(UpdateArgs),

    /// Install prompt packs from Promptsfile
    Install(InstallArgs),

    /// Verify rendered files against the lock file
    Verify(VerifyArgs),

    /// List configured sources and their lock state
    List,

    /// Install in CI mode (non-interactive, strict)
    #[command(name = "ci-install")]
    CiInstall(CiInstallArgs),
}
