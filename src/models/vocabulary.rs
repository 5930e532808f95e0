// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Label vocabulary and label sets.
//!
//! The vocabulary is the fixed, ordered list of label names shared by every
//! video in a store. A [`LabelSet`] is the set of labels active at one frame.

use crate::error::Result;
use std::path::Path;

/// A label name. Compared by plain string equality.
pub type Label = String;

/// Labels a brand-new store starts with.
pub const DEFAULT_LABELS: [&str; 3] = ["test1", "test2", "test3"];

/// Ordered list of unique label names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    labels: Vec<Label>,
}

impl Vocabulary {
    /// Build a vocabulary from an ordered list of names.
    ///
    /// Fails with the first name that appears more than once.
    pub fn new(labels: Vec<Label>) -> std::result::Result<Self, Label> {
        for (i, label) in labels.iter().enumerate() {
            if labels[..i].contains(label) {
                return Err(label.clone());
            }
        }
        Ok(Self { labels })
    }

    /// Vocabulary persisted at `path`, or the default one if no store exists yet.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        let exists = path
            .try_exists()
            .map_err(|e| crate::error::Error::io(path, e))?;
        if exists {
            let store = crate::io::serialization::read_store(path)?;
            Ok(store.vocabulary().clone())
        } else {
            Ok(Self::default())
        }
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Label> {
        self.labels.iter()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn as_slice(&self) -> &[Label] {
        &self.labels
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            labels: DEFAULT_LABELS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Labels active at a frame.
///
/// Behaves as a set (no duplicates, equality ignores order) but keeps
/// insertion order so that re-saving a store writes labels back in the
/// order they were toggled on.
#[derive(Debug, Clone, Default)]
pub struct LabelSet {
    labels: Vec<Label>,
}

impl LabelSet {
    pub const fn new() -> Self {
        Self { labels: Vec::new() }
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    /// Add a label. Returns false if it was already present.
    pub fn insert(&mut self, label: impl Into<Label>) -> bool {
        let label = label.into();
        if self.contains(&label) {
            return false;
        }
        self.labels.push(label);
        true
    }

    /// Remove a label. Returns false if it was not present.
    pub fn remove(&mut self, label: &str) -> bool {
        match self.labels.iter().position(|l| l == label) {
            Some(pos) => {
                self.labels.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Flip membership of `label`. Returns whether it is present afterwards.
    pub fn toggle(&mut self, label: &str) -> bool {
        if self.remove(label) {
            false
        } else {
            self.labels.push(label.to_string());
            true
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Label> {
        self.labels.iter()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn as_slice(&self) -> &[Label] {
        &self.labels
    }
}

impl PartialEq for LabelSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|l| other.contains(l))
    }
}

impl Eq for LabelSet {}

impl<S: Into<Label>> FromIterator<S> for LabelSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = LabelSet::new();
        for label in iter {
            set.insert(label);
        }
        set
    }
}

impl From<Vec<Label>> for LabelSet {
    fn from(labels: Vec<Label>) -> Self {
        labels.into_iter().collect()
    }
}
