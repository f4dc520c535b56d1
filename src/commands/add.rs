//! `add` command handler

use std::path::PathBuf;

use console::style;

use crate::cli::AddArgs;
use crate::config::{self, SourceEntry};
use crate::error::{Result, source as source_err};
use crate::security;
use crate::source::SourceSpec;
use crate::workflow::{InstallOptions, Installer};

pub fn run(workspace: Option<PathBuf>, args: AddArgs) -> Result<()> {
    super::forbid_allow_unknown_in_ci(args.allow_unknown)?;
    let workspace_dir = super::workspace_dir(workspace)?;

    validate_source_format(&args.source)?;
    let spec = SourceSpec::parse(&args.source)?;

    let manifest_path = config::find_promptsfile(&workspace_dir)?;
    let mut doc = config::load_manifest_doc(&manifest_path)?;

    if !args.allow_unknown {
        let cfg = config::load(&workspace_dir)?;
        security::ensure_trusted(&spec.url, &cfg, false)?;
    }

    if config::loader::doc_contains_source(&doc, &spec.url) {
        return Err(source_err::duplicate(spec.url.raw()));
    }

    doc.sources.push(SourceEntry::Plain(args.source.clone()));
    config::save_manifest_doc(&manifest_path, &doc)?;
    println!("{} Added source: {}", style("✓").green().bold(), args.source);

    if args.no_install {
        return Ok(());
    }

    println!("Running installation...");
    let report = Installer::new(InstallOptions {
        workspace_dir,
        strict: super::ci_mode(),
        verify_only: false,
        offline: false,
        cache_dir: None,
        allow_unknown: args.allow_unknown,
    })
    .execute()?;
    println!(
        "{} Installation complete ({} file(s) from {} source(s))",
        style("✓").green().bold(),
        report.files_written,
        report.sources
    );
    Ok(())
}

/// Validate the textual source form before touching the manifest.
///
/// Repository-path form is required (`github.com/org/repo`), matching
/// how sources are compared and cached; full http(s) URLs are rejected
/// with a pointer to the expected shape.
fn validate_source_format(source: &str) -> Result<()> {
    let url = source.split('#').next().unwrap_or(source);

    if url.is_empty() {
        return Err(source_err::parse_failed(source, "source cannot be empty"));
    }
    if url.starts_with("http://") || url.starts_with("https://") {
        return Err(source_err::parse_failed(
            source,
            "use repository path format (e.g. github.com/org/repo) instead of a full URL",
        ));
    }
    if !url.contains('/') {
        return Err(source_err::parse_failed(source, "invalid repository format"));
    }
    if url.ends_with('/') {
        return Err(source_err::parse_failed(source, "URL should not end with /"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_path_forms() {
        assert!(validate_source_format("github.com/org/repo").is_ok());
        assert!(validate_source_format("github.com/org/repo#v1.0.0").is_ok());
        assert!(validate_source_format("/tmp/local/repo").is_ok());
    }

    #[test]
    fn test_validate_rejects_scheme_urls() {
        assert!(validate_source_format("https://github.com/org/repo").is_err());
        assert!(validate_source_format("http://github.com/org/repo").is_err());
    }

    #[test]
    fn test_validate_rejects_malformed() {
        assert!(validate_source_format("").is_err());
        assert!(validate_source_format("no-slash").is_err());
        assert!(validate_source_format("github.com/org/repo/").is_err());
    }
}
