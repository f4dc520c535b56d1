//! The install/verify pipeline
//!
//! Orchestrates configuration loading, trust enforcement, fetching,
//! adapter rendering, overlay precedence, conflict detection, orphan
//! cleanup, the managed ignore block, and the lock document. Sources are
//! processed in declaration order and adapters in a stable order so the
//! on-disk outcome and the lock are byte-identical across runs.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use console::style;

use crate::adapter::{self, Adapter, AdapterConfig, claude};
use crate::config::{self, Config};
use crate::conflict::ConflictDetector;
use crate::error::{PromptSyncError, Result, conflict as conflict_err, fs as fs_err};
use crate::git::{self, FetchOptions, FetchedSource, Fetcher};
use crate::gitignore::{BlockState, IgnoreBlockManager};
use crate::hash;
use crate::lock::{LockStore, LockedFile, LockedSource};
use crate::security;
use crate::source::{Scope, SourceSpec};

/// Sentinel hash recorded when a verify-mode plan entry has no file
const MISSING_HASH: &str = "missing";

/// Options for one pipeline run
#[derive(Debug, Clone)]
pub struct InstallOptions {
    pub workspace_dir: PathBuf,
    pub strict: bool,
    pub verify_only: bool,
    pub offline: bool,
    pub cache_dir: Option<PathBuf>,
    pub allow_unknown: bool,
}

/// Outcome summary of a successful run
#[derive(Debug, Default)]
pub struct InstallReport {
    pub sources: usize,
    pub files_written: usize,
    pub warnings: Vec<String>,
}

/// A source scheduled for this run, with its precedence scope
struct PlannedSource {
    spec: SourceSpec,
    scope: Scope,
    name: Option<String>,
    claude_prefix: Option<String>,
}

/// One rendered file, owned by the pipeline until written and locked
struct PlanEntry {
    source_index: usize,
    source_path: String,
    content: Option<Vec<u8>>,
    hash: String,
}

/// Orchestrates `install` and `verify`
pub struct Installer {
    opts: InstallOptions,
    fetcher: Box<dyn Fetcher>,
    detector: ConflictDetector,
    adapters: Vec<Box<dyn Adapter>>,
    store: LockStore,
}

impl Installer {
    pub fn new(opts: InstallOptions) -> Self {
        let fetcher = git::new_fetcher(FetchOptions::new(opts.cache_dir.clone(), opts.offline));
        let detector = ConflictDetector::new(opts.strict);
        let store = LockStore::new(&opts.workspace_dir);
        Self {
            opts,
            fetcher,
            detector,
            adapters: adapter::all_adapters(),
            store,
        }
    }

    /// Run the pipeline
    pub fn execute(&self) -> Result<InstallReport> {
        let workspace = &self.opts.workspace_dir;
        let mut report = InstallReport::default();

        let cfg = config::load(workspace)?;

        if self.opts.verify_only && !self.store.exists() {
            return Err(PromptSyncError::LockMissing);
        }
        let old_lock = self.store.read()?.unwrap_or_default();

        let planned = plan_sources(&cfg);
        report.sources = planned.len();

        // Trust gate: no fetch happens for any source until every source
        // passed the policy.
        for source in &planned {
            security::ensure_trusted(&source.spec.url, &cfg, self.opts.allow_unknown)?;
        }

        let mut fetched: Vec<FetchedSource> = Vec::new();
        for source in &planned {
            let result = git::fetch_source(self.fetcher.as_ref(), &source.spec)?;
            fetched.push(result);
        }

        let winners = self.build_plan(&cfg, &planned, &fetched)?;

        if !self.opts.verify_only {
            self.write_outputs(&winners, &mut report)?;
            self.remove_orphans(&old_lock, &planned, &winners, &mut report)?;
        }

        self.scan_output_dirs(&cfg, &mut report)?;

        if self.opts.verify_only {
            let issues = self
                .detector
                .check_drift(&old_lock.expected_hashes(), workspace)?;
            let issues = self.detector.filter_critical(issues);
            if let Some(err) = ConflictDetector::drift_error(&issues) {
                return Err(err);
            }
            return Ok(report);
        }

        self.update_ignore_block(&cfg, &planned, &mut report)?;

        let lock_sources = build_lock_sources(&fetched, &winners);
        self.store.write(lock_sources)?;

        Ok(report)
    }

    /// Per-source adapter configuration (claude gets its resolved prefix)
    fn adapter_config(&self, cfg: &Config, adapter_name: &str, source: &PlannedSource) -> AdapterConfig {
        match adapter_name {
            "cursor" => AdapterConfig {
                enabled: cfg.adapters.cursor.enabled,
                prefix: None,
            },
            "claude" => {
                let name = source
                    .name
                    .clone()
                    .or_else(|| cfg.named_source_name(&source.spec))
                    .unwrap_or_else(|| source.spec.url.repo_name());
                let prefix = claude::resolve_prefix(
                    source.claude_prefix.as_deref(),
                    cfg.named_claude_prefix(&source.spec).as_deref(),
                    cfg.adapters.claude.prefix.as_deref(),
                    &name,
                );
                AdapterConfig {
                    enabled: cfg.adapters.claude.enabled,
                    prefix: Some(prefix),
                }
            }
            _ => AdapterConfig::default(),
        }
    }

    /// Build the rendering plan, resolving overlay precedence as entries
    /// land: the highest scope wins an output path, equal scopes collide.
    fn build_plan(
        &self,
        cfg: &Config,
        planned: &[PlannedSource],
        fetched: &[FetchedSource],
    ) -> Result<BTreeMap<String, PlanEntry>> {
        let mut winners: BTreeMap<String, PlanEntry> = BTreeMap::new();

        for (index, source) in planned.iter().enumerate() {
            let checkout = &fetched[index];
            for adapter in &self.adapters {
                let adapter_cfg = self.adapter_config(cfg, adapter.name(), source);
                if !adapter_cfg.enabled {
                    continue;
                }

                for rel_path in adapter.discover_files(&checkout.local_path)? {
                    let output_path = adapter.output_path(&rel_path, &adapter_cfg);

                    if let Some(existing) = winners.get(&output_path) {
                        let existing_rank = planned[existing.source_index].scope.rank();
                        let new_rank = source.scope.rank();
                        if new_rank < existing_rank {
                            continue;
                        }
                        if new_rank == existing_rank {
                            if self.opts.verify_only {
                                continue;
                            }
                            return Err(conflict_err::duplicate(
                                output_path.clone(),
                                format!(
                                    "would be rendered by both {} and {}",
                                    planned[existing.source_index].spec.url, source.spec.url
                                ),
                            ));
                        }
                        // Higher scope takes the path; the loser leaves no trace
                    }

                    let entry =
                        self.render_entry(adapter.as_ref(), &adapter_cfg, checkout, index, rel_path)?;
                    winners.insert(output_path, entry);
                }
            }
        }

        Ok(winners)
    }

    fn render_entry(
        &self,
        adapter: &dyn Adapter,
        adapter_cfg: &AdapterConfig,
        checkout: &FetchedSource,
        source_index: usize,
        rel_path: String,
    ) -> Result<PlanEntry> {
        if self.opts.verify_only {
            let output_path = adapter.output_path(&rel_path, adapter_cfg);
            let on_disk = self.opts.workspace_dir.join(&output_path);
            let file_hash = match self.store.file_hash(&on_disk) {
                Ok(h) => h,
                Err(err) if hash::is_missing(&err) => MISSING_HASH.to_string(),
                Err(err) => return Err(err),
            };
            return Ok(PlanEntry {
                source_index,
                source_path: rel_path,
                content: None,
                hash: file_hash,
            });
        }

        let source_file = checkout.local_path.join(&rel_path);
        let bytes = std::fs::read(&source_file)
            .map_err(|e| fs_err::read_failed(source_file.display().to_string(), e.to_string()))?;
        let rendered = adapter
            .render_file(&rel_path, &bytes, adapter_cfg)
            .map_err(|e| {
                crate::error::adapter::render_failed(adapter.name(), &rel_path, e.to_string())
            })?;
        let content_hash = hash::hash_bytes(&rendered);

        Ok(PlanEntry {
            source_index,
            source_path: rel_path,
            content: Some(rendered),
            hash: content_hash,
        })
    }

    fn write_outputs(
        &self,
        winners: &BTreeMap<String, PlanEntry>,
        report: &mut InstallReport,
    ) -> Result<()> {
        for (output_path, entry) in winners {
            let Some(content) = &entry.content else {
                continue;
            };
            let full_path = self.opts.workspace_dir.join(output_path);
            if let Some(parent) = full_path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    fs_err::write_failed(parent.display().to_string(), e.to_string())
                })?;
            }
            std::fs::write(&full_path, content)
                .map_err(|e| fs_err::write_failed(full_path.display().to_string(), e.to_string()))?;
            report.files_written += 1;
        }
        Ok(())
    }

    /// Delete files a source used to own but no longer renders.
    ///
    /// Only sources present in both the old lock and the current plan are
    /// cleaned; paths claimed by any current source are never deleted.
    fn remove_orphans(
        &self,
        old_lock: &crate::lock::Lockfile,
        planned: &[PlannedSource],
        winners: &BTreeMap<String, PlanEntry>,
        report: &mut InstallReport,
    ) -> Result<()> {
        let current_paths: BTreeSet<&str> = winners.keys().map(String::as_str).collect();

        for source in planned {
            let Some(old_files) = old_lock.files_by_source(&source.spec.url) else {
                continue;
            };
            for old_file in old_files {
                if current_paths.contains(old_file.path.as_str()) {
                    continue;
                }
                let full_path = self.opts.workspace_dir.join(&old_file.path);
                match std::fs::remove_file(&full_path) {
                    Ok(()) => {}
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                    Err(e) => {
                        self.warn(
                            report,
                            format!("could not remove orphaned file {}: {e}", old_file.path),
                            fs_err::write_failed(old_file.path.clone(), e.to_string()),
                        )?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Post-write duplicate scan over every enabled adapter's output dir
    fn scan_output_dirs(&self, cfg: &Config, report: &mut InstallReport) -> Result<()> {
        for adapter in &self.adapters {
            let enabled = match adapter.name() {
                "cursor" => cfg.adapters.cursor.enabled,
                "claude" => cfg.adapters.claude.enabled,
                _ => false,
            };
            if !enabled {
                continue;
            }
            let base = adapter.base_output_dir(&AdapterConfig::default());
            let dir = self.opts.workspace_dir.join(base);
            if !dir.is_dir() {
                continue;
            }
            for issue in self.detector.scan_directory(&dir)? {
                self.warn(
                    report,
                    format!("{base}: {}", issue.details),
                    conflict_err::duplicate(issue.path.clone(), issue.details.clone()),
                )?;
            }
        }
        Ok(())
    }

    /// Refresh the managed ignore block with the union of every enabled
    /// adapter's patterns, in stable adapter order then source order.
    fn update_ignore_block(
        &self,
        cfg: &Config,
        planned: &[PlannedSource],
        report: &mut InstallReport,
    ) -> Result<()> {
        let manager = IgnoreBlockManager::new(&self.opts.workspace_dir);

        if manager.verify() == BlockState::Corrupt {
            let path = manager.path().display().to_string();
            self.warn(
                report,
                format!("managed ignore block is malformed in {path}, leaving it untouched"),
                PromptSyncError::IgnoreBlockCorrupt { path },
            )?;
            return Ok(());
        }

        let mut patterns: Vec<String> = Vec::new();
        for adapter in &self.adapters {
            match adapter.name() {
                "cursor" if cfg.adapters.cursor.enabled => {
                    patterns.extend(adapter.ignore_patterns(&AdapterConfig::default()));
                }
                "claude" if cfg.adapters.claude.enabled => {
                    for source in planned {
                        let adapter_cfg = self.adapter_config(cfg, "claude", source);
                        patterns.extend(adapter.ignore_patterns(&adapter_cfg));
                    }
                }
                _ => {}
            }
        }
        let mut seen = BTreeSet::new();
        patterns.retain(|p| seen.insert(p.clone()));

        manager.update(&patterns)
    }

    fn warn(
        &self,
        report: &mut InstallReport,
        message: String,
        escalated: PromptSyncError,
    ) -> Result<()> {
        if self.opts.strict {
            return Err(escalated);
        }
        eprintln!("{} {message}", style("warning:").yellow().bold());
        report.warnings.push(message);
        Ok(())
    }
}

/// Combine flat sources and overlays into an ordered, deduplicated list
fn plan_sources(cfg: &Config) -> Vec<PlannedSource> {
    let mut planned: Vec<PlannedSource> = Vec::new();

    for source in &cfg.sources {
        if planned.iter().any(|p| p.spec.same_repo(&source.spec)) {
            continue;
        }
        planned.push(PlannedSource {
            spec: source.spec.clone(),
            scope: Scope::Project,
            name: source.name.clone(),
            claude_prefix: source.claude_prefix.clone(),
        });
    }

    for overlay in &cfg.overlays {
        if planned.iter().any(|p| p.spec.same_repo(&overlay.spec)) {
            continue;
        }
        planned.push(PlannedSource {
            spec: overlay.spec.clone(),
            scope: overlay.scope,
            name: None,
            claude_prefix: None,
        });
    }

    planned
}

fn build_lock_sources(
    fetched: &[FetchedSource],
    winners: &BTreeMap<String, PlanEntry>,
) -> Vec<LockedSource> {
    let mut lock_sources = Vec::with_capacity(fetched.len());
    for (index, checkout) in fetched.iter().enumerate() {
        let files = winners
            .iter()
            .filter(|(_, entry)| entry.source_index == index)
            .map(|(path, entry)| LockedFile {
                path: path.clone(),
                hash: entry.hash.clone(),
                source_path: Some(entry.source_path.clone()),
            })
            .collect();
        lock_sources.push(LockedSource {
            url: checkout.spec.url.raw().to_string(),
            git_ref: checkout.spec.git_ref.clone(),
            commit: checkout.commit.clone(),
            files,
        });
    }
    lock_sources
}
