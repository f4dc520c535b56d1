//! Remove command arguments

use clap::Args;

#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Source to remove, matched by repository URL
    pub source: String,

    /// Keep rendered files on disk
    #[arg(long)]
    pub keep_files: bool,

    /// Don't run install after removing the source
    #[arg(long)]
    pub no_install: bool,
}
