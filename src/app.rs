// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Labeling session state.
//!
//! A [`Session`] is the single owned aggregate a playback driver works
//! against: it holds the store, remembers where the store lives and which
//! video is currently loaded. Changes are only persisted by [`Session::commit`]
//! or [`Session::close`]; anything not committed is lost with the session.

use crate::error::Result;
use crate::io::identity::{identity_of, VideoIdentity};
use crate::models::store::{Store, TimelineHandle};
use crate::models::timeline::{EffectiveLabels, FrameIndex};
use crate::models::vocabulary::{LabelSet, Vocabulary};
use std::path::{Path, PathBuf};

/// Main labeling session.
#[derive(Debug)]
pub struct Session {
    /// Backing store file
    store_path: PathBuf,

    store: Store,

    /// Identity of the video currently being labeled
    current: Option<VideoIdentity>,
}

impl Session {
    /// Load (or create) the store at `store_path` and write it straight back
    /// in normalized form.
    pub fn open(store_path: impl Into<PathBuf>) -> Result<Self> {
        let store_path = store_path.into();
        let store = Store::load(&store_path)?;
        store.save(&store_path)?;
        Ok(Self {
            store_path,
            store,
            current: None,
        })
    }

    /// Make the video at `video_path` the current one.
    ///
    /// On failure the previously loaded video stays current.
    pub fn open_video(&mut self, video_path: &Path) -> Result<&VideoIdentity> {
        let identity = identity_of(video_path)?;
        log::info!("Loaded {} as {}", video_path.display(), identity);
        self.store.timeline_for(&identity);
        Ok(self.current.insert(identity))
    }

    pub fn current_video(&self) -> Option<&VideoIdentity> {
        self.current.as_ref()
    }

    /// Timeline of the current video, if one is loaded.
    pub fn current(&mut self) -> Option<TimelineHandle<'_>> {
        let identity = self.current.as_ref()?;
        Some(self.store.timeline_for(identity))
    }

    /// Labels to render at `frame` of the current video.
    pub fn effective_labels(&self, frame: FrameIndex) -> Option<EffectiveLabels<'_>> {
        let identity = self.current.as_ref()?;
        self.store
            .timeline(identity)
            .map(|timeline| timeline.effective_labels(frame))
    }

    /// Toggle `label` at `frame` of the current video.
    ///
    /// Returns `Ok(None)` when no video is loaded.
    pub fn toggle_label(&mut self, frame: i64, label: &str) -> Result<Option<LabelSet>> {
        match self.current() {
            Some(mut handle) => Ok(Some(handle.toggle_label(frame, label)?.clone())),
            None => Ok(None),
        }
    }

    /// Clear every snapshot of the current video only.
    pub fn clear(&mut self) {
        if let Some(mut handle) = self.current() {
            handle.clear();
            log::info!("Cleared labels");
        }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        self.store.vocabulary()
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    /// Persist everything to the backing file.
    pub fn commit(&self) -> Result<()> {
        self.store.save(&self.store_path)
    }

    /// Persist and end the session.
    pub fn close(self) -> Result<()> {
        self.commit()
    }
}
