// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Content-based video identity.
//!
//! Videos are keyed by the MD5 digest of their bytes (uppercase hex), so
//! labels follow a file across renames and moves. Any change to the bytes
//! yields a new identity and therefore a fresh timeline.

use crate::error::{Error, Result};
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Uppercase hex content digest of a video file.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoIdentity(String);

impl VideoIdentity {
    /// Wrap an already computed identity string.
    pub fn new(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    /// Identity of an in-memory byte buffer.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(format!("{:X}", Md5::digest(bytes)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hash the full contents of the file at `path`.
pub fn identity_of(path: &Path) -> Result<VideoIdentity> {
    let mut file = File::open(path).map_err(|e| Error::io(path, e))?;
    let mut hasher = Md5::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = file.read(&mut buffer).map_err(|e| Error::io(path, e))?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(VideoIdentity(format!("{:X}", hasher.finalize())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_known_digest() {
        assert_eq!(
            VideoIdentity::from_bytes(b"").as_str(),
            "D41D8CD98F00B204E9800998ECF8427E"
        );
        assert_eq!(
            VideoIdentity::from_bytes(b"hello world").as_str(),
            "5EB63BBBE01EEED093CB22BB8F5ACDC3"
        );
    }

    #[test]
    fn test_same_bytes_same_identity() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.mp4");
        let b = dir.path().join("renamed.avi");
        let bytes: Vec<u8> = (0..20_000u32).map(|i| (i % 251) as u8).collect();
        std::fs::write(&a, &bytes).unwrap();
        std::fs::write(&b, &bytes).unwrap();

        let id_a = identity_of(&a).unwrap();
        assert_eq!(id_a, identity_of(&a).unwrap());
        assert_eq!(id_a, identity_of(&b).unwrap());
        assert_eq!(id_a, VideoIdentity::from_bytes(&bytes));
    }

    #[test]
    fn test_single_byte_change_new_identity() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("clip.mp4");
        let mut bytes = vec![7u8; 10_000];
        std::fs::write(&path, &bytes).unwrap();
        let before = identity_of(&path).unwrap();

        bytes[9_999] = 8;
        std::fs::write(&path, &bytes).unwrap();
        assert_ne!(before, identity_of(&path).unwrap());
    }

    #[test]
    fn test_missing_file_is_io_unavailable() {
        let dir = TempDir::new().unwrap();
        let err = identity_of(&dir.path().join("nope.mp4")).unwrap_err();
        assert!(matches!(err, Error::IoUnavailable { .. }));
    }
}
