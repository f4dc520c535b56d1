//! Add command arguments

use clap::Args;

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Source to add: `<url>` or `<url>#<ref>`
    pub source: String,

    /// Don't run install after adding the source
    #[arg(long)]
    pub no_install: bool,

    /// Allow sources outside the trusted list
    #[arg(long)]
    pub allow_unknown: bool,
}
