// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Error types for the annotation core.

use std::path::PathBuf;
use thiserror::Error;

/// Failures surfaced by timeline, store and identity operations.
///
/// None of these are fatal on their own; the caller decides whether to
/// retry, skip to another video or abort the session.
#[derive(Error, Debug)]
pub enum Error {
    /// A video or store file could not be opened, read or written.
    #[error("I/O unavailable for {}: {source}", .path.display())]
    IoUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Frame index outside the valid domain (negative).
    #[error("Invalid frame index: {0}")]
    InvalidFrame(i64),

    /// Label is not part of the vocabulary.
    #[error("Unknown label: {0:?}")]
    UnknownLabel(String),

    /// Store file exists but does not have the expected shape.
    #[error("Malformed store {}: {reason}", .path.display())]
    MalformedStore { path: PathBuf, reason: String },

    /// Export target has an extension other than yaml/yml/json.
    #[error("Unsupported export format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::IoUnavailable {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Error::MalformedStore {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
