// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Per-video annotation timeline.
//!
//! A timeline only stores the frames where a labeling decision was made.
//! Every other frame inherits the snapshot of the nearest earlier explicit
//! frame, so a long video with a handful of label changes stays a handful
//! of entries. Frame 0 always holds a snapshot (the baseline).

use super::vocabulary::{LabelSet, Vocabulary};
use crate::error::{Error, Result};
use std::collections::BTreeMap;

/// Zero-based frame position within a video.
///
/// Snapshots can be recorded at `0..=MAX_FRAME`. Mutations take a signed
/// frame so a driver's signed arithmetic (e.g. skipping back past the start)
/// is rejected with [`Error::InvalidFrame`] instead of wrapping. Queries take
/// the unsigned index; any frame past `MAX_FRAME` resolves to the last
/// snapshot.
pub type FrameIndex = u64;

/// Highest frame that can carry an explicit snapshot.
pub const MAX_FRAME: FrameIndex = i64::MAX as FrameIndex;

/// Result of resolving the labels shown at a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectiveLabels<'a> {
    pub labels: &'a LabelSet,
    /// True when the labels come from an earlier, non-baseline frame.
    pub inherited: bool,
}

/// Sparse frame index -> label snapshot mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeline {
    snapshots: BTreeMap<FrameIndex, LabelSet>,
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Timeline {
    /// Timeline holding only an empty baseline.
    pub fn new() -> Self {
        let mut snapshots = BTreeMap::new();
        snapshots.insert(0, LabelSet::new());
        Self { snapshots }
    }

    /// Build a timeline from explicit snapshots.
    ///
    /// Returns the timeline and whether an empty baseline had to be added.
    pub fn from_snapshots(mut snapshots: BTreeMap<FrameIndex, LabelSet>) -> (Self, bool) {
        let mut restored = false;
        if !snapshots.contains_key(&0) {
            snapshots.insert(0, LabelSet::new());
            restored = true;
        }
        (Self { snapshots }, restored)
    }

    /// Labels in effect at `frame`.
    ///
    /// An explicit snapshot at `frame` wins and is never reported as
    /// inherited, even at frame 0. Otherwise the greatest explicit frame
    /// below `frame` supplies the labels, flagged inherited unless that
    /// frame is the baseline.
    pub fn effective_labels(&self, frame: FrameIndex) -> EffectiveLabels<'_> {
        static EMPTY: LabelSet = LabelSet::new();

        if let Some(labels) = self.snapshots.get(&frame) {
            return EffectiveLabels {
                labels,
                inherited: false,
            };
        }

        match self.snapshots.range(..=frame).next_back() {
            Some((&key, labels)) => EffectiveLabels {
                labels,
                inherited: key != 0,
            },
            // unreachable while the baseline exists
            None => EffectiveLabels {
                labels: &EMPTY,
                inherited: false,
            },
        }
    }

    /// Insert or overwrite the explicit snapshot at exactly `frame`.
    pub fn set_snapshot(&mut self, frame: i64, labels: LabelSet) -> Result<()> {
        let frame = frame_index(frame)?;
        log::debug!("Set frame {} to {:?}", frame, labels.as_slice());
        self.snapshots.insert(frame, labels);
        Ok(())
    }

    /// Flip `label` in the labels effective at `frame` and record the result
    /// as an explicit snapshot at `frame`.
    ///
    /// Nothing is modified when the frame or label is rejected.
    pub fn toggle_label(
        &mut self,
        frame: i64,
        label: &str,
        vocabulary: &Vocabulary,
    ) -> Result<&LabelSet> {
        let index = frame_index(frame)?;
        if !vocabulary.contains(label) {
            return Err(Error::UnknownLabel(label.to_string()));
        }

        let mut labels = self.effective_labels(index).labels.clone();
        let added = labels.toggle(label);
        log::debug!(
            "{} label {:?} at frame {}",
            if added { "Adding" } else { "Removing" },
            label,
            index
        );

        let entry = self.snapshots.entry(index).or_default();
        *entry = labels;
        Ok(entry)
    }

    /// Drop every snapshot and reset to an empty baseline.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Explicit snapshots in frame order.
    pub fn entries(&self) -> impl Iterator<Item = (FrameIndex, &LabelSet)> {
        self.snapshots.iter().map(|(&frame, labels)| (frame, labels))
    }

    /// Frames that carry an explicit snapshot, in order.
    pub fn explicit_frames(&self) -> impl Iterator<Item = FrameIndex> + '_ {
        self.snapshots.keys().copied()
    }

    /// Number of explicit snapshots, baseline included.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Always false: the baseline is never removed.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

fn frame_index(frame: i64) -> Result<FrameIndex> {
    FrameIndex::try_from(frame).map_err(|_| Error::InvalidFrame(frame))
}
