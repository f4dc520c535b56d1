//! Prompt-Sync - prompt pack manager
//!
//! Installs versioned prompt packs from git repositories, renders them
//! into agent-specific formats, and records content hashes in a lock
//! file so installs are reproducible and drift is detectable in CI.

use clap::Parser;

mod adapter;
mod cli;
mod commands;
mod config;
mod conflict;
mod error;
mod git;
mod gitignore;
mod hash;
mod lock;
mod security;
mod source;
mod workflow;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => commands::init::run(cli.workspace),
        Commands::Add(args) => commands::add::run(cli.workspace, args),
        Commands::Remove(args) => commands::remove::run(cli.workspace, args),
        Commands::Update(args) => commands::update::run(cli.workspace, args),
        Commands::Install(args) => commands::install::run(cli.workspace, args),
        Commands::Verify(args) => commands::verify::run(cli.workspace, args),
        Commands::List => commands::list::run(cli.workspace),
        Commands::CiInstall(args) => commands::install::run_ci(cli.workspace, args),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
