//! Trust gate enforcement at the install boundary

mod common;

use common::TestWorkspace;
use predicates::prelude::*;

#[test]
fn untrusted_source_aborts_before_any_fetch() {
    let ws = TestWorkspace::new();
    let repo = ws.create_repo("pack", &[("prompts/a.md", "a\n")]);
    ws.promptsfile(&[&repo.to_string_lossy()]);

    ws.cmd()
        .args(["install"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("untrusted source"));

    // No fetch was issued: the cache stayed empty
    assert!(!ws.cache.exists() || std::fs::read_dir(&ws.cache).unwrap().next().is_none());
    assert!(!ws.file_exists("Promptsfile.lock"));
}

#[test]
fn user_config_exact_entry_grants_trust() {
    let ws = TestWorkspace::new();
    let repo = ws.create_repo("pack", &[("prompts/a.md", "a\n")]);
    ws.promptsfile(&[&repo.to_string_lossy()]);

    ws.user_config(&format!(
        "sources:\n  - name: local-pack\n    repo: \"{}\"\n",
        repo.to_string_lossy()
    ));

    ws.cmd().args(["install"]).assert().success();
    assert!(ws.file_exists(".cursor/rules/_active/a.md"));
}

#[test]
fn user_config_wildcard_grants_namespace_trust() {
    let ws = TestWorkspace::new();
    let repo = ws.create_repo("pack", &[("prompts/a.md", "a\n")]);
    ws.promptsfile(&[&repo.to_string_lossy()]);

    // The repo lives under <temp>/repos/; trust the whole namespace
    let namespace = repo.parent().unwrap().to_string_lossy().to_string();
    ws.user_config(&format!(
        "sources:\n  - name: local-packs\n    repo: \"{namespace}/*\"\n"
    ));

    ws.cmd().args(["install"]).assert().success();
}

#[test]
fn allow_unknown_is_forbidden_in_ci_mode() {
    let ws = TestWorkspace::new();
    let repo = ws.create_repo("pack", &[("prompts/a.md", "a\n")]);
    ws.promptsfile(&[&repo.to_string_lossy()]);

    ws.cmd()
        .env("CI", "true")
        .args(["install", "--allow-unknown"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not permitted in CI mode"));
}

#[test]
fn ci_install_rejects_untrusted_sources() {
    let ws = TestWorkspace::new();
    let repo = ws.create_repo("pack", &[("prompts/a.md", "a\n")]);
    ws.promptsfile(&[&repo.to_string_lossy()]);

    ws.cmd()
        .env("CI", "true")
        .args(["ci-install"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("untrusted source"));
}

#[test]
fn untrusted_overlay_aborts_whole_install() {
    let ws = TestWorkspace::new();
    let trusted = ws.create_repo("trusted", &[("prompts/a.md", "a\n")]);
    let untrusted = ws.create_repo("untrusted", &[("prompts/b.md", "b\n")]);

    let manifest = format!(
        "version: 1\nsources:\n  - \"{}\"\noverlays:\n  - scope: personal\n    source: \"{}\"\n",
        trusted.to_string_lossy(),
        untrusted.to_string_lossy()
    );
    ws.write_file("Promptsfile", &manifest);
    ws.user_config(&format!(
        "sources:\n  - name: trusted\n    repo: \"{}\"\n",
        trusted.to_string_lossy()
    ));

    ws.cmd()
        .args(["install"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("untrusted source"));

    // The trusted source was not partially installed
    assert!(!ws.file_exists(".cursor/rules/_active/a.md"));
    assert!(!ws.file_exists("Promptsfile.lock"));
}
