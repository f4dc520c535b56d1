//! Claude slash-command adapter
//!
//! Renders prompt files into `.claude/commands`, flattening by basename
//! with a per-source prefix so commands from different packs stay
//! distinguishable (`/my-company-review`, `/mc-review`, ...).

use super::{Adapter, AdapterConfig, basename};
use crate::error::Result;

const BASE_OUTPUT_DIR: &str = ".claude/commands";
const SEARCH_DIRS: [&str; 2] = ["prompts", "commands"];

pub struct ClaudeAdapter;

impl Adapter for ClaudeAdapter {
    fn name(&self) -> &'static str {
        "claude"
    }

    fn search_dirs(&self) -> &'static [&'static str] {
        &SEARCH_DIRS
    }

    fn render_file(
        &self,
        _relative_path: &str,
        content: &[u8],
        _config: &AdapterConfig,
    ) -> Result<Vec<u8>> {
        Ok(content.to_vec())
    }

    fn output_path(&self, relative_path: &str, config: &AdapterConfig) -> String {
        let file_name = basename(relative_path).replace([' ', '_'], "-");
        match &config.prefix {
            Some(prefix) => format!("{BASE_OUTPUT_DIR}/{prefix}-{file_name}"),
            None => format!("{BASE_OUTPUT_DIR}/{file_name}"),
        }
    }

    fn ignore_patterns(&self, config: &AdapterConfig) -> Vec<String> {
        match &config.prefix {
            Some(prefix) => vec![format!("{BASE_OUTPUT_DIR}/{prefix}-*")],
            None => vec![format!("{BASE_OUTPUT_DIR}/*")],
        }
    }

    fn base_output_dir(&self, _config: &AdapterConfig) -> &'static str {
        BASE_OUTPUT_DIR
    }
}

/// Resolve the command prefix for one source.
///
/// Precedence, highest first: explicit per-source prefix, the prefix
/// declared for the source in the named layer, the adapter-wide prefix,
/// then the kebab-cased source name.
pub fn resolve_prefix(
    source_prefix: Option<&str>,
    named_prefix: Option<&str>,
    adapter_prefix: Option<&str>,
    source_name: &str,
) -> String {
    if let Some(p) = source_prefix.filter(|p| !p.is_empty()) {
        return p.to_string();
    }
    if let Some(p) = named_prefix.filter(|p| !p.is_empty()) {
        return p.to_string();
    }
    if let Some(p) = adapter_prefix.filter(|p| !p.is_empty()) {
        return p.to_string();
    }
    kebab_case(source_name)
}

/// Convert a source name to kebab-case.
///
/// Lowercases, hyphenates lowercase→uppercase boundaries and the end of
/// acronym runs, collapses non-alphanumerics to single hyphens, and
/// trims hyphens.
pub fn kebab_case(s: &str) -> String {
    let mut cleaned = String::with_capacity(s.len());
    for ch in s.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            cleaned.push(ch);
        } else if !cleaned.ends_with('-') {
            cleaned.push('-');
        }
    }

    let chars: Vec<char> = cleaned.chars().collect();
    let mut out = String::with_capacity(chars.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
            let boundary = prev.is_ascii_lowercase() || (prev.is_ascii_uppercase() && next_lower);
            if boundary && !out.ends_with('-') {
                out.push('-');
            }
        }
        out.push(c.to_ascii_lowercase());
    }

    let mut collapsed = String::with_capacity(out.len());
    for ch in out.chars() {
        if ch == '-' && collapsed.ends_with('-') {
            continue;
        }
        collapsed.push(ch);
    }
    collapsed.trim_matches('-').to_string()
}
