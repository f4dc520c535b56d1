//! Managed ignore block
//!
//! Prompt-Sync owns exactly one marker-delimited region of the project's
//! `.gitignore`. Updates replace the region body and nothing else; bytes
//! outside the markers are never modified. Running the same update twice
//! produces a byte-identical file.

use std::path::{Path, PathBuf};

use crate::error::{Result, fs as fs_err};

/// First line of the managed region
pub const BEGIN_MARKER: &str = "# >>> prompt-sync managed block >>>";
/// Last line of the managed region
pub const END_MARKER: &str = "# <<< prompt-sync managed block <<<";

const IGNORE_FILE: &str = ".gitignore";

/// State of the managed block inside the ignore file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockState {
    /// Block present with both markers in order
    Ok,
    /// No begin marker found (file may be absent too)
    Missing,
    /// Begin marker without a matching end marker
    Corrupt,
}

/// Maintains the managed block in a workspace's ignore file
pub struct IgnoreBlockManager {
    path: PathBuf,
}

impl IgnoreBlockManager {
    pub fn new(workspace_dir: &Path) -> Self {
        Self {
            path: workspace_dir.join(IGNORE_FILE),
        }
    }

    /// Path of the managed ignore file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the block body with `patterns`, one per line, creating the
    /// file and the block when missing. Idempotent.
    pub fn update(&self, patterns: &[String]) -> Result<()> {
        let existing = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => {
                return Err(fs_err::read_failed(
                    self.path.display().to_string(),
                    e.to_string(),
                ));
            }
        };

        let block = render_block(patterns);
        let updated = match locate_block(&existing) {
            BlockLocation::Present { start, end } => {
                let mut out = String::with_capacity(existing.len() + block.len());
                out.push_str(&existing[..start]);
                out.push_str(&block);
                out.push_str(&existing[end..]);
                out
            }
            BlockLocation::Corrupt => {
                return Err(crate::error::PromptSyncError::IgnoreBlockCorrupt {
                    path: self.path.display().to_string(),
                });
            }
            BlockLocation::Absent => {
                let mut out = existing.clone();
                if !out.is_empty() && !out.ends_with('\n') {
                    out.push('\n');
                }
                if !out.is_empty() {
                    out.push('\n');
                }
                out.push_str(&block);
                out
            }
        };

        std::fs::write(&self.path, updated)
            .map_err(|e| fs_err::write_failed(self.path.display().to_string(), e.to_string()))
    }

    /// Report whether the block is present and well-formed
    pub fn verify(&self) -> BlockState {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(_) => return BlockState::Missing,
        };
        match locate_block(&content) {
            BlockLocation::Present { .. } => BlockState::Ok,
            BlockLocation::Absent => BlockState::Missing,
            BlockLocation::Corrupt => BlockState::Corrupt,
        }
    }
}

enum BlockLocation {
    /// Byte range covering the whole block including both marker lines
    /// and the trailing newline of the end marker
    Present { start: usize, end: usize },
    Absent,
    Corrupt,
}

fn render_block(patterns: &[String]) -> String {
    let mut block = String::new();
    block.push_str(BEGIN_MARKER);
    block.push('\n');
    for pattern in patterns {
        block.push_str(pattern);
        block.push('\n');
    }
    block.push_str(END_MARKER);
    block.push('\n');
    block
}

fn locate_block(content: &str) -> BlockLocation {
    let mut begin: Option<usize> = None;
    let mut offset = 0;
    for line in content.split_inclusive('\n') {
        let trimmed = line.trim_end_matches(['\n', '\r']);
        if trimmed == BEGIN_MARKER && begin.is_none() {
            begin = Some(offset);
        } else if trimmed == END_MARKER {
            if let Some(start) = begin {
                return BlockLocation::Present {
                    start,
                    end: offset + line.len(),
                };
            }
            return BlockLocation::Corrupt;
        }
        offset += line.len();
    }
    match begin {
        Some(_) => BlockLocation::Corrupt,
        None => BlockLocation::Absent,
    }
}
