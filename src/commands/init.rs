//! `init` command handler

use std::path::PathBuf;

use console::style;

use crate::config::PROMPTSFILE;
use crate::error::{Result, config as config_err, fs as fs_err};

const TEMPLATE: &str = "\
# Prompt-Sync manifest
#
# Declare the prompt packs this project installs. A source is a git
# repository path, optionally pinned to a tag, branch, or commit:
#
# sources:
#   - github.com/org/prompts
#   - github.com/org/prompts#v1.0.0
#
# overlays:
#   - scope: personal
#     source: github.com/me/extras
#
# adapters:
#   cursor:
#     enabled: true
#   claude:
#     enabled: true
#     prefix: team

version: 1
sources: []
";

pub fn run(workspace: Option<PathBuf>) -> Result<()> {
    let workspace_dir = super::workspace_dir(workspace)?;
    let path = workspace_dir.join(PROMPTSFILE);

    if path.exists() {
        return Err(config_err::invalid(format!(
            "{} already exists",
            path.display()
        )));
    }

    std::fs::write(&path, TEMPLATE)
        .map_err(|e| fs_err::write_failed(path.display().to_string(), e.to_string()))?;
    println!("{} Created {}", style("✓").green().bold(), path.display());
    Ok(())
}
