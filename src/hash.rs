//! SHA-256 content hashing for rendered outputs
//!
//! Hashes are computed over raw bytes exactly as written to disk, so two
//! renders of the same source produce the same hash on any platform.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::{PromptSyncError, Result, fs};

/// Hash prefix for SHA-256 hashes
pub const HASH_PREFIX: &str = "sha256:";

/// Calculate the SHA-256 hash of a byte buffer
pub fn hash_bytes(data: &[u8]) -> String {
    let digest = Sha256::digest(data);
    format!("{HASH_PREFIX}{:x}", digest)
}

/// Calculate the SHA-256 hash of a file's contents
///
/// Streams the file in chunks so large files do not need to fit in memory.
/// Returns a [`PromptSyncError::FileNotFound`] when the file is absent so
/// callers can distinguish a missing output from an unreadable one.
pub fn hash_file(path: &Path) -> Result<String> {
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            fs::not_found(path.display().to_string())
        } else {
            fs::read_failed(path.display().to_string(), e.to_string())
        }
    })?;

    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = reader
            .read(&mut buffer)
            .map_err(|e| fs::read_failed(path.display().to_string(), e.to_string()))?;

        if bytes_read == 0 {
            break;
        }

        hasher.update(&buffer[..bytes_read]);
    }

    Ok(format!("{HASH_PREFIX}{:x}", hasher.finalize()))
}

/// Returns true when the error signals a file that simply is not there
pub fn is_missing(err: &PromptSyncError) -> bool {
    matches!(err, PromptSyncError::FileNotFound { .. })
}
