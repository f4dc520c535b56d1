//! Install and ci-install command arguments

use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct InstallArgs {
    /// Treat warnings as errors
    #[arg(long)]
    pub strict: bool,

    /// Use only cached repositories, never touch the network
    #[arg(long)]
    pub offline: bool,

    /// Override the repository cache directory
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Allow sources outside the trusted list
    #[arg(long)]
    pub allow_unknown: bool,

    /// Assume yes to all prompts (implies --strict)
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(Args, Debug)]
pub struct CiInstallArgs {
    /// Use only cached repositories, never touch the network
    #[arg(long)]
    pub offline: bool,

    /// Override the repository cache directory
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,
}
