//! Duplicate basename conflicts and overlay precedence

mod common;

use common::TestWorkspace;
use predicates::prelude::*;

#[test]
fn duplicate_basename_across_sources_aborts() {
    let ws = TestWorkspace::new();
    let repo_a = ws.create_repo("pack-a", &[("rules/coding.md", "from a\n")]);
    let repo_b = ws.create_repo("pack-b", &[("rules/coding.md", "from b\n")]);
    ws.promptsfile(&[&repo_a.to_string_lossy(), &repo_b.to_string_lossy()]);

    ws.cmd()
        .args(["install", "--allow-unknown"])
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("coding.md")
                .and(predicate::str::contains(repo_a.to_string_lossy().as_ref()))
                .and(predicate::str::contains(repo_b.to_string_lossy().as_ref())),
        );

    // Nothing was written and no lock was created
    assert!(!ws.file_exists(".cursor"));
    assert!(!ws.file_exists("Promptsfile.lock"));
}

#[test]
fn duplicate_conflict_leaves_prior_lock_unchanged() {
    let ws = TestWorkspace::new();
    let repo_a = ws.create_repo("pack-a", &[("prompts/unique.md", "a\n")]);
    ws.promptsfile(&[&repo_a.to_string_lossy()]);
    ws.cmd().args(["install", "--allow-unknown"]).assert().success();
    let lock_before = ws.read_file("Promptsfile.lock");

    // Introduce a second source that collides with the first
    common::commit_repo_state(&repo_a, &[("prompts/shared.md", "a\n")], "rename");
    let repo_b = ws.create_repo("pack-b", &[("prompts/shared.md", "b\n")]);
    ws.promptsfile(&[&repo_a.to_string_lossy(), &repo_b.to_string_lossy()]);

    ws.cmd()
        .args(["install", "--allow-unknown"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("shared.md"));

    assert_eq!(ws.read_file("Promptsfile.lock"), lock_before);
}

#[test]
fn overlay_higher_scope_wins_output_path() {
    let ws = TestWorkspace::new();
    let base = ws.create_repo("base", &[("prompts/coding.md", "org version\n")]);
    let personal = ws.create_repo("personal", &[("prompts/coding.md", "personal version\n")]);

    let manifest = format!(
        "version: 1\nsources:\n  - \"{}\"\noverlays:\n  - scope: personal\n    source: \"{}\"\n",
        base.to_string_lossy(),
        personal.to_string_lossy()
    );
    ws.write_file("Promptsfile", &manifest);

    ws.cmd().args(["install", "--allow-unknown"]).assert().success();

    // The personal overlay claimed the path; the lower scope left no trace
    assert_eq!(
        ws.read_file(".cursor/rules/_active/coding.md"),
        "personal version\n"
    );
    let lock = ws.read_file("Promptsfile.lock");
    let coding_entries = lock.matches("coding.md").count();
    // One file entry (path plus source_path mention belong to one record)
    assert_eq!(coding_entries, 2);
}

#[test]
fn same_scope_overlay_collision_is_hard_conflict() {
    let ws = TestWorkspace::new();
    let a = ws.create_repo("ov-a", &[("prompts/dup.md", "a\n")]);
    let b = ws.create_repo("ov-b", &[("prompts/dup.md", "b\n")]);

    let manifest = format!(
        "version: 1\nsources: []\noverlays:\n  - scope: org\n    source: \"{}\"\n  - scope: org\n    source: \"{}\"\n",
        a.to_string_lossy(),
        b.to_string_lossy()
    );
    ws.write_file("Promptsfile", &manifest);

    ws.cmd()
        .args(["install", "--allow-unknown"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("dup.md"));
}

#[test]
fn shuffled_source_order_reports_same_conflict() {
    let ws = TestWorkspace::new();
    let a = ws.create_repo("pack-a", &[("prompts/x.md", "a\n")]);
    let b = ws.create_repo("pack-b", &[("prompts/x.md", "b\n")]);

    ws.promptsfile(&[&a.to_string_lossy(), &b.to_string_lossy()]);
    let first = ws
        .cmd()
        .args(["install", "--allow-unknown"])
        .assert()
        .failure();
    let first_err = String::from_utf8_lossy(&first.get_output().stderr).to_string();

    ws.promptsfile(&[&b.to_string_lossy(), &a.to_string_lossy()]);
    let second = ws
        .cmd()
        .args(["install", "--allow-unknown"])
        .assert()
        .failure();
    let second_err = String::from_utf8_lossy(&second.get_output().stderr).to_string();

    // Same duplicate path reported regardless of declaration order
    assert!(first_err.contains("x.md"));
    assert!(second_err.contains("x.md"));
    assert!(first_err.contains("duplicate"));
    assert!(second_err.contains("duplicate"));
}
