//! Lock document (`Promptsfile.lock`)
//!
//! The lock records, per source, the resolved commit and every rendered
//! output path with its content hash. Serialization is deterministic:
//! sources sorted by url, files sorted by path, stable key order. The
//! document is written via temp-file-and-rename so a partially written
//! lock is never observed.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, lock as lock_err};
use crate::hash;
use crate::source::RepoUrl;

/// Lock filename next to the Promptsfile
pub const LOCK_FILE: &str = "Promptsfile.lock";

/// Current lock document version
pub const LOCK_VERSION: &str = "1";

/// One rendered output recorded in the lock
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockedFile {
    pub path: String,
    pub hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_path: Option<String>,
}

/// One installed source with its resolved commit and outputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockedSource {
    pub url: String,
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub git_ref: Option<String>,
    pub commit: String,
    #[serde(default)]
    pub files: Vec<LockedFile>,
}

/// The whole lock document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lockfile {
    pub version: String,
    #[serde(default)]
    pub sources: Vec<LockedSource>,
}

impl Default for Lockfile {
    fn default() -> Self {
        Self {
            version: LOCK_VERSION.to_string(),
            sources: Vec::new(),
        }
    }
}

impl Lockfile {
    /// Files recorded for a source, looked up by canonical URL
    pub fn files_by_source(&self, url: &RepoUrl) -> Option<&[LockedFile]> {
        let canon = url.canonical();
        self.sources
            .iter()
            .find(|s| RepoUrl::new(s.url.clone()).canonical() == canon)
            .map(|s| s.files.as_slice())
    }

    /// The commit recorded for a source, looked up by canonical URL
    pub fn commit_for(&self, url: &RepoUrl) -> Option<&str> {
        let canon = url.canonical();
        self.sources
            .iter()
            .find(|s| RepoUrl::new(s.url.clone()).canonical() == canon)
            .map(|s| s.commit.as_str())
    }

    /// Flat `path → hash` map consumed by the drift scan
    pub fn expected_hashes(&self) -> BTreeMap<String, String> {
        self.sources
            .iter()
            .flat_map(|s| s.files.iter())
            .map(|f| (f.path.clone(), f.hash.clone()))
            .collect()
    }
}

/// Owns the on-disk lock document for one workspace
pub struct LockStore {
    workspace_dir: PathBuf,
}

impl LockStore {
    pub fn new(workspace_dir: &Path) -> Self {
        Self {
            workspace_dir: workspace_dir.to_path_buf(),
        }
    }

    /// Path of the lock file
    pub fn path(&self) -> PathBuf {
        self.workspace_dir.join(LOCK_FILE)
    }

    /// Whether a lock document exists
    pub fn exists(&self) -> bool {
        self.path().is_file()
    }

    /// Read the lock document; `None` when absent
    pub fn read(&self) -> Result<Option<Lockfile>> {
        let path = self.path();
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(lock_err::parse_failed(e.to_string())),
        };
        let lockfile: Lockfile =
            serde_yaml::from_str(&content).map_err(|e| lock_err::parse_failed(e.to_string()))?;
        Ok(Some(lockfile))
    }

    /// Serialize and atomically write the lock document.
    ///
    /// Sources are sorted by url and files by path before writing so the
    /// output is byte-identical across runs. The content lands in a temp
    /// file first and is renamed into place; on any failure the prior
    /// lock stays untouched.
    pub fn write(&self, sources: Vec<LockedSource>) -> Result<()> {
        let mut sources = sources;
        for source in &mut sources {
            source.files.sort_by(|a, b| a.path.cmp(&b.path));
        }
        sources.sort_by(|a, b| a.url.cmp(&b.url));

        let lockfile = Lockfile {
            version: LOCK_VERSION.to_string(),
            sources,
        };
        let content =
            serde_yaml::to_string(&lockfile).map_err(|e| lock_err::write_failed(e.to_string()))?;

        let path = self.path();
        let tmp_path = self.workspace_dir.join(format!("{LOCK_FILE}.tmp"));
        std::fs::write(&tmp_path, &content).map_err(|e| lock_err::write_failed(e.to_string()))?;
        if let Err(e) = std::fs::rename(&tmp_path, &path) {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(lock_err::write_failed(e.to_string()));
        }
        Ok(())
    }

    /// Content hash of a file, used to populate [`LockedFile::hash`]
    pub fn file_hash(&self, path: &Path) -> Result<String> {
        hash::hash_file(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_sources() -> Vec<LockedSource> {
        vec![
            LockedSource {
                url: "github.com/z/last".to_string(),
                git_ref: None,
                commit: "b".repeat(40),
                files: vec![
                    LockedFile {
                        path: ".cursor/rules/_active/zz.md".to_string(),
                        hash: hash::hash_bytes(b"zz"),
                        source_path: Some("prompts/zz.md".to_string()),
                    },
                    LockedFile {
                        path: ".cursor/rules/_active/aa.md".to_string(),
                        hash: hash::hash_bytes(b"aa"),
                        source_path: Some("prompts/aa.md".to_string()),
                    },
                ],
            },
            LockedSource {
                url: "github.com/a/first".to_string(),
                git_ref: Some("v1.0.0".to_string()),
                commit: "a".repeat(40),
                files: Vec::new(),
            },
        ]
    }

    #[test]
    fn test_read_absent_is_none() {
        let temp = TempDir::new().unwrap();
        let store = LockStore::new(temp.path());
        assert!(store.read().unwrap().is_none());
        assert!(!store.exists());
    }

    #[test]
    fn test_write_read_round_trip() {
        let temp = TempDir::new().unwrap();
        let store = LockStore::new(temp.path());
        store.write(sample_sources()).unwrap();

        let lockfile = store.read().unwrap().unwrap();
        assert_eq!(lockfile.version, "1");
        assert_eq!(lockfile.sources.len(), 2);
        // Sorted by url
        assert_eq!(lockfile.sources[0].url, "github.com/a/first");
        assert_eq!(lockfile.sources[1].url, "github.com/z/last");
        // Files sorted by path
        assert_eq!(
            lockfile.sources[1].files[0].path,
            ".cursor/rules/_active/aa.md"
        );
    }

    #[test]
    fn test_write_is_deterministic() {
        let temp = TempDir::new().unwrap();
        let store = LockStore::new(temp.path());

        store.write(sample_sources()).unwrap();
        let first = std::fs::read(store.path()).unwrap();

        // Same content in shuffled order serializes identically
        let mut shuffled = sample_sources();
        shuffled.reverse();
        store.write(shuffled).unwrap();
        let second = std::fs::read(store.path()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_round_trip_preserves_document() {
        let temp = TempDir::new().unwrap();
        let store = LockStore::new(temp.path());
        store.write(sample_sources()).unwrap();
        let read_once = store.read().unwrap().unwrap();
        store.write(read_once.sources.clone()).unwrap();
        let read_twice = store.read().unwrap().unwrap();
        assert_eq!(read_once, read_twice);
    }

    #[test]
    fn test_malformed_lock_is_error() {
        let temp = TempDir::new().unwrap();
        let store = LockStore::new(temp.path());
        std::fs::write(store.path(), "version: [not\n").unwrap();
        let err = store.read().unwrap_err();
        assert!(matches!(err, crate::error::PromptSyncError::LockParse { .. }));
    }

    #[test]
    fn test_files_by_source_uses_canonical_url() {
        let temp = TempDir::new().unwrap();
        let store = LockStore::new(temp.path());
        let mut sources = sample_sources();
        sources[0].url = "https://github.com/org/repo.git".to_string();
        store.write(sources).unwrap();

        let lockfile = store.read().unwrap().unwrap();
        let files = lockfile
            .files_by_source(&RepoUrl::new("github.com:org/repo"))
            .unwrap();
        assert_eq!(files.len(), 2);
        assert!(
            lockfile
                .files_by_source(&RepoUrl::new("github.com:org/missing"))
                .is_none()
        );
    }

    #[test]
    fn test_expected_hashes_flattens_all_sources() {
        let temp = TempDir::new().unwrap();
        let store = LockStore::new(temp.path());
        store.write(sample_sources()).unwrap();
        let lockfile = store.read().unwrap().unwrap();

        let hashes = lockfile.expected_hashes();
        assert_eq!(hashes.len(), 2);
        assert_eq!(
            hashes.get(".cursor/rules/_active/aa.md"),
            Some(&hash::hash_bytes(b"aa"))
        );
    }

    #[test]
    fn test_ref_omitted_when_absent() {
        let temp = TempDir::new().unwrap();
        let store = LockStore::new(temp.path());
        store.write(vec![LockedSource {
            url: "github.com/a/b".to_string(),
            git_ref: None,
            commit: "c".repeat(40),
            files: Vec::new(),
        }])
        .unwrap();
        let content = std::fs::read_to_string(store.path()).unwrap();
        assert!(!content.contains("ref:"));

        store.write(vec![LockedSource {
            url: "github.com/a/b".to_string(),
            git_ref: Some("v1".to_string()),
            commit: "c".repeat(40),
            files: Vec::new(),
        }])
        .unwrap();
        let content = std::fs::read_to_string(store.path()).unwrap();
        assert!(content.contains("ref: v1"));
    }
}
