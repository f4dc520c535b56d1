//! Verify command arguments

use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Override the repository cache directory
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Allow sources outside the trusted list
    #[arg(long)]
    pub allow_unknown: bool,
}
