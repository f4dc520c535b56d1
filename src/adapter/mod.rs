//! Adapters render a fetched prompt pack into agent-specific files
//!
//! An adapter discovers markdown-family files inside a fixed set of
//! source subdirectories, transforms bytes, and computes flattened
//! output paths under its base directory. Rendering must be
//! deterministic and referentially transparent in
//! `(relative_path, bytes, config)`: no clock, no environment, no
//! filesystem beyond the inputs, so hashes reproduce on any host.

pub mod claude;
pub mod cursor;

use std::path::Path;

use walkdir::WalkDir;

use crate::error::{Result, adapter as adapter_err};

/// Markdown-family extensions adapters consume
const MARKDOWN_EXTENSIONS: [&str; 3] = ["md", "markdown", "mdc"];

/// Per-adapter settings resolved by the pipeline
#[derive(Debug, Clone, Default)]
pub struct AdapterConfig {
    pub enabled: bool,
    pub prefix: Option<String>,
}

/// A transformer from a fetched source tree to rendered output files
pub trait Adapter {
    /// Stable adapter name used in configuration and messages
    fn name(&self) -> &'static str;

    /// Source subdirectories searched for prompt files, first hit wins
    fn search_dirs(&self) -> &'static [&'static str];

    /// Find prompt files under the source root.
    ///
    /// Returns source-relative paths (forward slashes), sorted. A source
    /// without any search directory yields an empty list, not an error.
    fn discover_files(&self, source_root: &Path) -> Result<Vec<String>> {
        discover_markdown(source_root, self.search_dirs(), self.name())
    }

    /// Transform one file's bytes into the bytes to write
    fn render_file(
        &self,
        relative_path: &str,
        content: &[u8],
        config: &AdapterConfig,
    ) -> Result<Vec<u8>>;

    /// Project-relative output path for a discovered file
    fn output_path(&self, relative_path: &str, config: &AdapterConfig) -> String;

    /// Patterns for the managed ignore block
    fn ignore_patterns(&self, config: &AdapterConfig) -> Vec<String>;

    /// Root directory all of this adapter's outputs live under
    fn base_output_dir(&self, config: &AdapterConfig) -> &'static str;
}

/// The fixed adapter set, in stable iteration order
pub fn all_adapters() -> Vec<Box<dyn Adapter>> {
    vec![
        Box::new(cursor::CursorAdapter),
        Box::new(claude::ClaudeAdapter),
    ]
}

/// Whether a path names a markdown-family file
pub fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy().to_lowercase();
            MARKDOWN_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Final path segment of a source-relative path
pub fn basename(relative_path: &str) -> &str {
    relative_path.rsplit('/').next().unwrap_or(relative_path)
}

fn discover_markdown(
    source_root: &Path,
    search_dirs: &[&str],
    adapter: &str,
) -> Result<Vec<String>> {
    let Some(dir) = search_dirs
        .iter()
        .map(|d| source_root.join(d))
        .find(|p| p.is_dir())
    else {
        return Ok(Vec::new());
    };

    let mut files = Vec::new();
    for entry in WalkDir::new(&dir).sort_by_file_name() {
        let entry = entry.map_err(|e| adapter_err::discovery_failed(adapter, e.to_string()))?;
        if !entry.file_type().is_file() || !is_markdown_file(entry.path()) {
            continue;
        }
        let rel = entry.path().strip_prefix(source_root).unwrap_or(entry.path());
        let rel = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        files.push(rel);
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_is_markdown_file() {
        assert!(is_markdown_file(Path::new("a/b.md")));
        assert!(is_markdown_file(Path::new("a/b.MD")));
        assert!(is_markdown_file(Path::new("a/b.markdown")));
        assert!(is_markdown_file(Path::new("a/b.mdc")));
        assert!(!is_markdown_file(Path::new("a/b.txt")));
        assert!(!is_markdown_file(Path::new("a/b")));
    }

    #[test]
    fn test_basename() {
        assert_eq!(basename("prompts/deep/coding.md"), "coding.md");
        assert_eq!(basename("coding.md"), "coding.md");
    }

    #[test]
    fn test_discover_first_dir_wins() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("prompts")).unwrap();
        std::fs::create_dir_all(temp.path().join("rules")).unwrap();
        std::fs::write(temp.path().join("prompts/a.md"), "a").unwrap();
        std::fs::write(temp.path().join("rules/b.md"), "b").unwrap();

        let files = discover_markdown(temp.path(), &["prompts", "rules"], "test").unwrap();
        assert_eq!(files, vec!["prompts/a.md"]);
    }

    #[test]
    fn test_discover_alternate_dir() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("rules/nested")).unwrap();
        std::fs::write(temp.path().join("rules/z.md"), "z").unwrap();
        std::fs::write(temp.path().join("rules/nested/a.mdc"), "a").unwrap();
        std::fs::write(temp.path().join("rules/skip.txt"), "no").unwrap();

        let files = discover_markdown(temp.path(), &["prompts", "rules"], "test").unwrap();
        assert_eq!(files, vec!["rules/nested/a.mdc", "rules/z.md"]);
    }

    #[test]
    fn test_discover_empty_when_no_dir() {
        let temp = TempDir::new().unwrap();
        let files = discover_markdown(temp.path(), &["prompts", "rules"], "test").unwrap();
        assert!(files.is_empty());
    }
}
