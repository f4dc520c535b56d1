//! Common test utilities for Prompt-Sync integration tests

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// A throwaway workspace with its own repository cache
pub struct TestWorkspace {
    #[allow(dead_code)]
    pub temp: TempDir,
    pub path: PathBuf,
    pub cache: PathBuf,
}

#[allow(dead_code)]
impl TestWorkspace {
    /// Create a new test workspace
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().join("workspace");
        std::fs::create_dir_all(&path).expect("Failed to create workspace directory");
        let cache = temp.path().join("cache");
        Self { temp, path, cache }
    }

    /// Command for the prompt-sync binary, isolated from the host env
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("prompt-sync").expect("binary exists");
        cmd.current_dir(&self.path)
            .env_remove("CI")
            .env_remove("PROMPT_SYNC_DIR")
            .env_remove("PROMPT_SYNC_WORKSPACE")
            .env_remove("PROMPT_SYNC_GIT_BACKEND")
            .env("PROMPT_SYNC_CACHE_DIR", &self.cache)
            .env(
                "PROMPT_SYNC_USER_CONFIG",
                self.temp.path().join("user-config.yaml"),
            );
        cmd
    }

    /// Write a file in the workspace
    pub fn write_file(&self, rel_path: &str, content: &str) {
        let file_path = self.path.join(rel_path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    /// Read a file from the workspace
    pub fn read_file(&self, rel_path: &str) -> String {
        std::fs::read_to_string(self.path.join(rel_path)).expect("Failed to read file")
    }

    /// Check if a file exists in the workspace
    pub fn file_exists(&self, rel_path: &str) -> bool {
        self.path.join(rel_path).exists()
    }

    /// Write a Promptsfile declaring the given sources
    pub fn promptsfile<S: AsRef<str>>(&self, sources: &[S]) {
        self.write_file("Promptsfile", &sources_yaml(sources));
    }

    /// Write a Promptsfile with no sources
    pub fn empty_promptsfile(&self) {
        self.write_file("Promptsfile", "version: 1\nsources: []\n");
    }

    /// Write the user-level trust config
    pub fn user_config(&self, content: &str) {
        std::fs::write(self.temp.path().join("user-config.yaml"), content)
            .expect("Failed to write user config");
    }

    /// Create a git repository under the temp dir with an initial commit
    pub fn create_repo(&self, name: &str, files: &[(&str, &str)]) -> PathBuf {
        let repo_path = self.temp.path().join("repos").join(name);
        init_repo(&repo_path);
        commit_repo_state(&repo_path, files, "initial");
        repo_path
    }
}

/// Render a Promptsfile body for plain string sources
#[allow(dead_code)]
pub fn sources_yaml<S: AsRef<str>>(sources: &[S]) -> String {
    if sources.is_empty() {
        return String::from("version: 1\nsources: []\n");
    }
    let mut out = String::from("version: 1\nsources:\n");
    for source in sources {
        out.push_str(&format!("  - \"{}\"\n", source.as_ref()));
    }
    out
}

/// A repository path as the string form used in manifests
#[allow(dead_code)]
pub fn path_str(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

/// Initialize a git repository with `main` as its default branch
pub fn init_repo(path: &Path) {
    std::fs::create_dir_all(path).expect("Failed to create repo directory");
    let repo = git2::Repository::init(path).expect("Failed to init repository");
    repo.set_head("refs/heads/main").expect("Failed to set HEAD");
    let mut config = repo.config().expect("Failed to open repo config");
    config.set_str("user.name", "Test").unwrap();
    config.set_str("user.email", "test@example.com").unwrap();
}

/// Replace the repository's working tree with `files` and commit.
///
/// Files absent from `files` are removed, so successive calls model
/// version switches. Returns the new commit id.
pub fn commit_repo_state(repo_path: &Path, files: &[(&str, &str)], message: &str) -> String {
    // Clear everything except .git
    for entry in std::fs::read_dir(repo_path).expect("Failed to read repo dir") {
        let entry = entry.unwrap();
        if entry.file_name() == ".git" {
            continue;
        }
        let path = entry.path();
        if path.is_dir() {
            std::fs::remove_dir_all(&path).unwrap();
        } else {
            std::fs::remove_file(&path).unwrap();
        }
    }

    for (rel_path, content) in files {
        let file_path = repo_path.join(rel_path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&file_path, content).unwrap();
    }

    let repo = git2::Repository::open(repo_path).expect("Failed to open repository");
    let mut index = repo.index().expect("Failed to open index");
    index.clear().unwrap();
    index
        .add_all(["*"], git2::IndexAddOption::DEFAULT, None)
        .unwrap();
    index.write().unwrap();
    let tree_id = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();
    let sig = git2::Signature::now("Test", "test@example.com").unwrap();
    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.iter().collect();
    let oid = repo
        .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .expect("Failed to commit");
    oid.to_string()
}

/// Create a lightweight tag at the repository's HEAD
#[allow(dead_code)]
pub fn tag_head(repo_path: &Path, tag_name: &str) {
    let repo = git2::Repository::open(repo_path).expect("Failed to open repository");
    let head = repo.head().unwrap().peel_to_commit().unwrap();
    repo.tag_lightweight(tag_name, head.as_object(), true)
        .expect("Failed to tag");
}
