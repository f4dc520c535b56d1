//! Locating and merging the configuration documents

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Result, config};
use crate::source::{RepoUrl, SourceSpec};

use super::{
    Config, ManifestDoc, ManifestSource, NamedSource, Overlay, PROMPTSFILE, PROMPTSFILE_LOCAL,
    SourceEntry,
};

/// User-level config document: named trust entries only
#[derive(Debug, Default, Deserialize)]
struct UserConfigDoc {
    #[serde(default)]
    sources: Vec<NamedSource>,
}

/// Locate the Promptsfile for a workspace.
///
/// Search order: `$PROMPT_SYNC_DIR` (must contain a Promptsfile when
/// set), the workspace root, then the `.ai` subdirectory.
pub fn find_promptsfile(workspace_dir: &Path) -> Result<PathBuf> {
    if let Ok(custom) = std::env::var("PROMPT_SYNC_DIR") {
        if !custom.is_empty() {
            let candidate = Path::new(&custom).join(PROMPTSFILE);
            if candidate.is_file() {
                return Ok(candidate);
            }
            return Err(config::not_found(candidate.display().to_string()));
        }
    }

    let root_candidate = workspace_dir.join(PROMPTSFILE);
    if root_candidate.is_file() {
        return Ok(root_candidate);
    }

    let ai_candidate = workspace_dir.join(".ai").join(PROMPTSFILE);
    if ai_candidate.is_file() {
        return Ok(ai_candidate);
    }

    Err(config::not_found(format!(
        "{}, {}",
        root_candidate.display(),
        ai_candidate.display()
    )))
}

/// Resolve the user-level config path (`$PROMPT_SYNC_USER_CONFIG` override)
fn user_config_path() -> Option<PathBuf> {
    if let Ok(p) = std::env::var("PROMPT_SYNC_USER_CONFIG") {
        if !p.is_empty() {
            return Some(PathBuf::from(p));
        }
    }
    dirs::home_dir().map(|home| home.join(".prompt-sync").join("config.yaml"))
}

/// Read and parse a manifest document; missing file yields the default
pub fn load_manifest_doc(path: &Path) -> Result<ManifestDoc> {
    if !path.is_file() {
        return Ok(ManifestDoc::default());
    }
    let content = std::fs::read_to_string(path)
        .map_err(|e| config::read_failed(path.display().to_string(), e.to_string()))?;
    serde_yaml::from_str(&content)
        .map_err(|e| config::parse_failed(path.display().to_string(), e.to_string()))
}

/// Serialize a manifest document back to its file
pub fn save_manifest_doc(path: &Path, doc: &ManifestDoc) -> Result<()> {
    let content = serde_yaml::to_string(doc)
        .map_err(|e| config::parse_failed(path.display().to_string(), e.to_string()))?;
    std::fs::write(path, content).map_err(|e| {
        crate::error::fs::write_failed(path.display().to_string(), e.to_string())
    })
}

fn load_user_config() -> Result<Vec<NamedSource>> {
    let Some(path) = user_config_path() else {
        return Ok(Vec::new());
    };
    if !path.is_file() {
        return Ok(Vec::new());
    }
    let content = std::fs::read_to_string(&path)
        .map_err(|e| config::read_failed(path.display().to_string(), e.to_string()))?;
    let doc: UserConfigDoc = serde_yaml::from_str(&content)
        .map_err(|e| config::parse_failed(path.display().to_string(), e.to_string()))?;
    Ok(doc.sources)
}

/// Merge named entries by name; later layers replace earlier ones
fn merge_named(layers: &[&[NamedSource]]) -> Vec<NamedSource> {
    let mut merged: Vec<NamedSource> = Vec::new();
    for layer in layers {
        for entry in *layer {
            match merged.iter_mut().find(|e| e.name == entry.name) {
                Some(existing) => *existing = entry.clone(),
                None => merged.push(entry.clone()),
            }
        }
    }
    merged.sort_by(|a, b| a.name.cmp(&b.name));
    merged
}

fn entry_to_source(entry: &SourceEntry) -> Result<Option<ManifestSource>> {
    // Wildcard entries grant trust but name nothing installable
    if entry.repo().contains('*') {
        return Ok(None);
    }
    let source = match entry {
        SourceEntry::Plain(s) => ManifestSource {
            spec: SourceSpec::parse(s)?,
            name: None,
            claude_prefix: None,
        },
        SourceEntry::Named(n) => ManifestSource {
            spec: SourceSpec::parse(&n.repo)?,
            name: Some(n.name.clone()),
            claude_prefix: n.claude_prefix.clone(),
        },
    };
    Ok(Some(source))
}

/// Merge install sources by canonical URL: local entries replace project
/// entries in place, new ones are appended in declaration order.
fn merge_sources(project: &[SourceEntry], local: &[SourceEntry]) -> Result<Vec<ManifestSource>> {
    let mut merged: Vec<ManifestSource> = Vec::new();
    for entry in project.iter().chain(local.iter()) {
        let Some(source) = entry_to_source(entry)? else {
            continue;
        };
        match merged.iter_mut().find(|s| s.spec.same_repo(&source.spec)) {
            Some(existing) => *existing = source,
            None => merged.push(source),
        }
    }
    Ok(merged)
}

fn named_entries(entries: &[SourceEntry]) -> Vec<NamedSource> {
    entries
        .iter()
        .filter_map(|e| match e {
            SourceEntry::Named(n) => Some(n.clone()),
            SourceEntry::Plain(_) => None,
        })
        .collect()
}

/// Load the effective configuration for a workspace
pub fn load(workspace_dir: &Path) -> Result<Config> {
    let manifest_path = find_promptsfile(workspace_dir)?;
    let project_doc = load_manifest_doc(&manifest_path)?;

    let local_path = manifest_path
        .parent()
        .map(|dir| dir.join(PROMPTSFILE_LOCAL))
        .unwrap_or_else(|| PathBuf::from(PROMPTSFILE_LOCAL));
    let local_doc = load_manifest_doc(&local_path)?;

    let sources = merge_sources(&project_doc.sources, &local_doc.sources)?;

    let mut overlays: Vec<Overlay> = Vec::new();
    for entry in project_doc.overlays.iter().chain(local_doc.overlays.iter()) {
        let spec = SourceSpec::parse(&entry.source)?;
        match overlays.iter_mut().find(|o| o.spec.same_repo(&spec)) {
            Some(existing) => {
                existing.scope = entry.scope;
                existing.spec = spec;
            }
            None => overlays.push(Overlay {
                scope: entry.scope,
                spec,
            }),
        }
    }

    let adapters = local_doc
        .adapters
        .or(project_doc.adapters)
        .unwrap_or_default()
        .with_defaults();

    let user_layer = load_user_config()?;
    let project_named = named_entries(&project_doc.sources);
    let local_named = named_entries(&local_doc.sources);
    let trusted = merge_named(&[&user_layer, &project_named, &local_named]);

    Ok(Config {
        sources,
        overlays,
        adapters,
        trusted,
        manifest_path,
    })
}

/// Check whether a repository is already declared in a manifest document
pub fn doc_contains_source(doc: &ManifestDoc, url: &RepoUrl) -> bool {
    doc.sources.iter().any(|entry| {
        SourceSpec::parse(entry.repo())
            .map(|spec| spec.url.canonical() == url.canonical())
            .unwrap_or(false)
    })
}
