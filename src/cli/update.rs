//! Update command arguments

use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Sources to update (all unpinned sources when omitted)
    pub sources: Vec<String>,

    /// Show what would be updated without making changes
    #[arg(long)]
    pub dry_run: bool,

    /// Update even pinned sources
    #[arg(long)]
    pub force: bool,

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
}
