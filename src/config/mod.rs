//! Configuration model and loading
//!
//! Three YAML documents feed the effective configuration, lowest
//! precedence first:
//!
//! 1. User-level config (`~/.prompt-sync/config.yaml` or
//!    `$PROMPT_SYNC_USER_CONFIG`) — named trust entries.
//! 2. Project `Promptsfile` — install sources, overlays, adapters.
//! 3. `Promptsfile.local` — per-developer overrides, never committed.

pub mod loader;

use serde::{Deserialize, Serialize};

use crate::source::{Scope, SourceSpec};

pub use loader::{find_promptsfile, load, load_manifest_doc, save_manifest_doc};

/// Project manifest filename
pub const PROMPTSFILE: &str = "Promptsfile";

/// Local override filename (never committed)
pub const PROMPTSFILE_LOCAL: &str = "Promptsfile.local";

/// A named trust entry: `{ name, repo, claude_prefix? }`
///
/// The `repo` field may end in `*` to allow every repository under a
/// namespace; wildcard entries are never installed themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedSource {
    pub name: String,
    pub repo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claude_prefix: Option<String>,
}

/// One source entry in a Promptsfile: plain `url[#ref]` string or mapping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SourceEntry {
    Plain(String),
    Named(NamedSource),
}

impl SourceEntry {
    /// The repository reference this entry declares
    pub fn repo(&self) -> &str {
        match self {
            SourceEntry::Plain(s) => s,
            SourceEntry::Named(n) => &n.repo,
        }
    }
}

/// Overlay entry: a source tagged with a precedence scope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayEntry {
    pub scope: Scope,
    pub source: String,
}

/// Per-adapter toggle
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CursorConfig {
    #[serde(default)]
    pub enabled: bool,
}

/// Claude adapter settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClaudeConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
}

/// Adapter block of the Promptsfile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdaptersConfig {
    #[serde(default)]
    pub cursor: CursorConfig,
    #[serde(default)]
    pub claude: ClaudeConfig,
}

impl AdaptersConfig {
    /// Apply the default rule: when nothing is explicitly enabled, the
    /// cursor adapter is.
    pub fn with_defaults(mut self) -> Self {
        if !self.cursor.enabled && !self.claude.enabled {
            self.cursor.enabled = true;
        }
        self
    }
}

/// Raw Promptsfile document, round-trippable for `add` / `remove`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManifestDoc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<SourceEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub overlays: Vec<OverlayEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adapters: Option<AdaptersConfig>,
}

/// A resolved install source from the manifest
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestSource {
    pub spec: SourceSpec,
    pub name: Option<String>,
    pub claude_prefix: Option<String>,
}

/// A resolved overlay
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub scope: Scope,
    pub spec: SourceSpec,
}

/// Effective configuration for one invocation
#[derive(Debug, Clone)]
pub struct Config {
    /// Install sources in declaration order
    pub sources: Vec<ManifestSource>,
    /// Overlays in declaration order
    pub overlays: Vec<Overlay>,
    /// Adapter settings with defaults applied
    pub adapters: AdaptersConfig,
    /// Merged named trust layer, sorted by name
    pub trusted: Vec<NamedSource>,
    /// Path of the Promptsfile that was loaded
    pub manifest_path: std::path::PathBuf,
}

impl Config {
    /// The claude prefix declared for a repository in the named layer
    pub fn named_claude_prefix(&self, spec: &SourceSpec) -> Option<String> {
        let canon = spec.url.canonical();
        self.trusted
            .iter()
            .find(|n| crate::source::RepoUrl::new(n.repo.clone()).canonical() == canon)
            .and_then(|n| n.claude_prefix.clone())
    }

    /// The name declared for a repository in the named layer
    pub fn named_source_name(&self, spec: &SourceSpec) -> Option<String> {
        let canon = spec.url.canonical();
        self.trusted
            .iter()
            .find(|n| crate::source::RepoUrl::new(n.repo.clone()).canonical() == canon)
            .map(|n| n.name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adapters_default_enables_cursor() {
        let adapters = AdaptersConfig::default().with_defaults();
        assert!(adapters.cursor.enabled);
        assert!(!adapters.claude.enabled);
    }

    #[test]
    fn test_adapters_explicit_claude_leaves_cursor_off() {
        let adapters = AdaptersConfig {
            claude: ClaudeConfig {
                enabled: true,
                prefix: None,
            },
            ..Default::default()
        }
        .with_defaults();
        assert!(!adapters.cursor.enabled);
        assert!(adapters.claude.enabled);
    }

    #[test]
    fn test_source_entry_forms_deserialize() {
        let yaml = r#"
sources:
  - github.com/org/repo#v1.0.0
  - name: Acme
    repo: github.com/acme/prompts
    claude_prefix: acme
"#;
        let doc: ManifestDoc = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(doc.sources.len(), 2);
        assert_eq!(doc.sources[0].repo(), "github.com/org/repo#v1.0.0");
        match &doc.sources[1] {
            SourceEntry::Named(n) => {
                assert_eq!(n.name, "Acme");
                assert_eq!(n.claude_prefix.as_deref(), Some("acme"));
            }
            SourceEntry::Plain(_) => panic!("expected mapping form"),
        }
    }

    #[test]
    fn test_manifest_doc_round_trip() {
        let yaml = "version: 1\nsources:\n- github.com/org/repo\n";
        let doc: ManifestDoc = serde_yaml::from_str(yaml).unwrap();
        let out = serde_yaml::to_string(&doc).unwrap();
        let doc2: ManifestDoc = serde_yaml::from_str(&out).unwrap();
        assert_eq!(doc.version, doc2.version);
        assert_eq!(doc.sources, doc2.sources);
    }

    #[test]
    fn test_named_claude_prefix_lookup() {
        let cfg = Config {
            sources: Vec::new(),
            overlays: Vec::new(),
            adapters: AdaptersConfig::default().with_defaults(),
            trusted: vec![NamedSource {
                name: "Acme".to_string(),
                repo: "https://github.com/acme/prompts.git".to_string(),
                claude_prefix: Some("acme".to_string()),
            }],
            manifest_path: std::path::PathBuf::from("Promptsfile"),
        };
        let spec = SourceSpec::parse("github.com:acme/prompts").unwrap();
        assert_eq!(cfg.named_claude_prefix(&spec).as_deref(), Some("acme"));
        assert_eq!(cfg.named_source_name(&spec).as_deref(), Some("Acme"));

        let other = SourceSpec::parse("github.com:other/prompts").unwrap();
        assert_eq!(cfg.named_claude_prefix(&other), None);
    }
}
