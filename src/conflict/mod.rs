//! Conflict and drift detection for rendered outputs
//!
//! Two scans: duplicate basenames (two sources flattening onto the same
//! output name) and drift (on-disk bytes no longer matching the hashes
//! recorded in the lock). Reports are order-independent so shuffled
//! source declarations produce identical issues.

use std::collections::BTreeMap;
use std::path::Path;

use walkdir::WalkDir;

use crate::error::{PromptSyncError, Result, fs as fs_err};
use crate::hash;

/// What kind of problem an issue describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    Duplicate,
    Drift,
    Missing,
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            IssueKind::Duplicate => "duplicate",
            IssueKind::Drift => "drift",
            IssueKind::Missing => "missing",
        };
        f.write_str(name)
    }
}

/// One detected conflict or drift
#[derive(Debug, Clone)]
pub struct ConflictIssue {
    pub kind: IssueKind,
    pub path: String,
    pub details: String,
    pub critical: bool,
}

/// Scans rendering plans and output directories
pub struct ConflictDetector {
    strict: bool,
}

impl ConflictDetector {
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }

    /// Report a duplicate issue for every basename claimed more than once.
    ///
    /// Input order does not matter: paths are grouped and sorted before
    /// reporting, so shuffled sources yield the same issues.
    pub fn scan_paths<'a, I>(&self, paths: I) -> Vec<ConflictIssue>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut by_basename: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for path in paths {
            let base = path.rsplit('/').next().unwrap_or(path).to_string();
            by_basename.entry(base).or_default().push(path.to_string());
        }

        let mut issues = Vec::new();
        for (basename, mut paths) in by_basename {
            if paths.len() < 2 {
                continue;
            }
            paths.sort();
            issues.push(ConflictIssue {
                kind: IssueKind::Duplicate,
                path: basename,
                details: format!("duplicate basename found in: {}", paths.join(", ")),
                critical: true,
            });
        }
        issues
    }

    /// Scan an on-disk output directory for duplicate basenames
    pub fn scan_directory(&self, dir: &Path) -> Result<Vec<ConflictIssue>> {
        let mut rel_paths = Vec::new();
        for entry in WalkDir::new(dir) {
            let entry = entry.map_err(|e| fs_err::io_error(e.to_string()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let rel = entry.path().strip_prefix(dir).unwrap_or(entry.path());
            rel_paths.push(
                rel.components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/"),
            );
        }
        Ok(self.scan_paths(rel_paths.iter().map(String::as_str)))
    }

    /// Recompute hashes for `path → expected_hash` and report drift.
    ///
    /// Paths are workspace-relative; a missing file becomes a `missing`
    /// issue, a hash mismatch a `drift` issue. Both are critical.
    pub fn check_drift(
        &self,
        expected: &BTreeMap<String, String>,
        workspace_dir: &Path,
    ) -> Result<Vec<ConflictIssue>> {
        let mut issues = Vec::new();
        for (path, expected_hash) in expected {
            let full_path = workspace_dir.join(path);
            match hash::hash_file(&full_path) {
                Ok(actual) if &actual == expected_hash => {}
                Ok(actual) => issues.push(ConflictIssue {
                    kind: IssueKind::Drift,
                    path: path.clone(),
                    details: format!("hash mismatch: expected {expected_hash}, got {actual}"),
                    critical: true,
                }),
                Err(err) if hash::is_missing(&err) => issues.push(ConflictIssue {
                    kind: IssueKind::Missing,
                    path: path.clone(),
                    details: "file missing".to_string(),
                    critical: true,
                }),
                Err(err) => return Err(err),
            }
        }
        Ok(issues)
    }

    /// In strict mode, keep only critical issues; otherwise return all
    pub fn filter_critical(&self, issues: Vec<ConflictIssue>) -> Vec<ConflictIssue> {
        if !self.strict {
            return issues;
        }
        issues.into_iter().filter(|i| i.critical).collect()
    }

    /// Collapse drift issues into one error naming every diverged path
    pub fn drift_error(issues: &[ConflictIssue]) -> Option<PromptSyncError> {
        if issues.is_empty() {
            return None;
        }
        let details = issues
            .iter()
            .map(|i| format!("{} ({})", i.path, i.kind))
            .collect::<Vec<_>>()
            .join(", ");
        Some(crate::error::conflict::drift(details))
    }
}
