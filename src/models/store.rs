// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation store.
//!
//! The store owns the vocabulary and one timeline per video identity, and
//! manages the backing file. Mutations are in memory only until [`Store::save`]
//! is called.

use super::timeline::{EffectiveLabels, FrameIndex, Timeline};
use super::vocabulary::{LabelSet, Vocabulary};
use crate::error::{Error, Result};
use crate::io::identity::VideoIdentity;
use crate::io::serialization;
use std::collections::BTreeMap;
use std::path::Path;

/// Vocabulary plus every video's timeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Store {
    pub(crate) vocabulary: Vocabulary,
    pub(crate) timelines: BTreeMap<VideoIdentity, Timeline>,
}

impl Store {
    /// Empty store with the given vocabulary.
    pub fn new(vocabulary: Vocabulary) -> Self {
        Self {
            vocabulary,
            timelines: BTreeMap::new(),
        }
    }

    /// Load the store at `path`.
    ///
    /// A missing file is replaced by a default store which is written out
    /// immediately. An existing file that does not parse is an error; it is
    /// never silently replaced.
    pub fn load(path: &Path) -> Result<Self> {
        let exists = path.try_exists().map_err(|e| Error::io(path, e))?;
        if !exists {
            log::info!("Creating datafile: {}", path.display());
            let store = Self::default();
            store.save(path)?;
            return Ok(store);
        }

        let store = serialization::read_store(path)?;
        log::info!(
            "Loaded {} labels and {} videos from {}",
            store.vocabulary.len(),
            store.timelines.len(),
            path.display()
        );
        Ok(store)
    }

    /// Write the full store to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        serialization::write_store(path, self)?;
        log::info!("Written to: {}", path.display());
        Ok(())
    }

    /// Export the store as YAML or JSON, chosen by the file extension.
    pub fn export(&self, path: &Path) -> Result<()> {
        serialization::export(path, self)?;
        log::info!("Exported annotations to {}", path.display());
        Ok(())
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Timeline for `identity`, created with an empty baseline if first seen.
    pub fn timeline_for(&mut self, identity: &VideoIdentity) -> TimelineHandle<'_> {
        let timeline = self.timelines.entry(identity.clone()).or_insert_with(|| {
            log::info!("New video {}", identity);
            Timeline::new()
        });
        TimelineHandle {
            vocabulary: &self.vocabulary,
            timeline,
        }
    }

    /// Timeline for `identity` if one exists. Never creates one.
    pub fn timeline(&self, identity: &VideoIdentity) -> Option<&Timeline> {
        self.timelines.get(identity)
    }

    /// Known video identities in sorted order.
    pub fn identities(&self) -> impl Iterator<Item = &VideoIdentity> {
        self.timelines.keys()
    }
}

/// Mutable access to one video's timeline, checked against the store's
/// vocabulary.
#[derive(Debug)]
pub struct TimelineHandle<'a> {
    vocabulary: &'a Vocabulary,
    timeline: &'a mut Timeline,
}

impl TimelineHandle<'_> {
    pub fn effective_labels(&self, frame: FrameIndex) -> EffectiveLabels<'_> {
        self.timeline.effective_labels(frame)
    }

    pub fn set_snapshot(&mut self, frame: i64, labels: LabelSet) -> Result<()> {
        self.timeline.set_snapshot(frame, labels)
    }

    pub fn toggle_label(&mut self, frame: i64, label: &str) -> Result<&LabelSet> {
        self.timeline.toggle_label(frame, label, self.vocabulary)
    }

    pub fn clear(&mut self) {
        self.timeline.clear();
    }

    pub fn timeline(&self) -> &Timeline {
        self.timeline
    }
}
