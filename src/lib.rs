// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Frame annotation timeline.
//!
//! Stores which labels from a fixed vocabulary apply to which frames of a
//! video. Videos are identified by a digest of their content, and each video
//! keeps a sparse timeline where unlabeled frames inherit the nearest earlier
//! decision. The whole store persists to a single JSON file.

pub mod app;
pub mod error;
pub mod io;
pub mod models;

pub use app::Session;
pub use error::{Error, Result};
pub use io::identity::{identity_of, VideoIdentity};
pub use models::store::{Store, TimelineHandle};
pub use models::timeline::{EffectiveLabels, FrameIndex, Timeline, MAX_FRAME};
pub use models::vocabulary::{Label, LabelSet, Vocabulary, DEFAULT_LABELS};
