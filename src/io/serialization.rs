// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Store file serialization and deserialization.
//!
//! On disk a store is a JSON object with the ordered vocabulary under
//! `labels` and, under `label_maps`, one object per video hash mapping
//! decimal frame keys to label arrays. Frame keys are parsed back into
//! integers here; anything that is not a non-negative integer is rejected.

use crate::error::{Error, Result};
use crate::io::identity::VideoIdentity;
use crate::models::store::Store;
use crate::models::timeline::{FrameIndex, Timeline};
use crate::models::vocabulary::{Label, LabelSet, Vocabulary};
use serde::de::{Error as _, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::Write;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// Shape of a store file as read from disk.
#[derive(Debug, Deserialize)]
struct StoreFile {
    labels: Vec<Label>,
    #[serde(deserialize_with = "unique_videos")]
    label_maps: BTreeMap<VideoIdentity, Timeline>,
}

/// Borrowed view of a store for writing.
#[derive(Debug, Serialize)]
struct StoreFileRef<'a> {
    labels: &'a [Label],
    label_maps: &'a BTreeMap<VideoIdentity, Timeline>,
}

impl<'a> From<&'a Store> for StoreFileRef<'a> {
    fn from(store: &'a Store) -> Self {
        Self {
            labels: store.vocabulary.as_slice(),
            label_maps: &store.timelines,
        }
    }
}

impl Serialize for Timeline {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(
            self.entries()
                .map(|(frame, labels)| (frame.to_string(), labels.as_slice())),
        )
    }
}

impl<'de> Deserialize<'de> for Timeline {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw: BTreeMap<String, Vec<Label>> =
            deserializer.deserialize_map(UniqueKeys::new("frame"))?;

        let mut snapshots = BTreeMap::new();
        for (key, labels) in raw {
            let frame: FrameIndex = key
                .parse()
                .map_err(|_| D::Error::custom(format!("invalid frame key {key:?}")))?;
            if snapshots.insert(frame, LabelSet::from(labels)).is_some() {
                return Err(D::Error::custom(format!("duplicate frame key {key:?}")));
            }
        }

        let (timeline, restored) = Timeline::from_snapshots(snapshots);
        if restored {
            log::warn!("Timeline had no frame 0 snapshot, restored empty baseline");
        }
        Ok(timeline)
    }
}

/// Map visitor that rejects a key appearing twice in the same object.
///
/// serde_json otherwise keeps the last value and drops the earlier ones.
struct UniqueKeys<K, V> {
    what: &'static str,
    marker: PhantomData<fn() -> BTreeMap<K, V>>,
}

impl<K, V> UniqueKeys<K, V> {
    fn new(what: &'static str) -> Self {
        Self {
            what,
            marker: PhantomData,
        }
    }
}

impl<'de, K, V> Visitor<'de> for UniqueKeys<K, V>
where
    K: Deserialize<'de> + Ord + fmt::Debug,
    V: Deserialize<'de>,
{
    type Value = BTreeMap<K, V>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a map keyed by {}", self.what)
    }

    fn visit_map<A: MapAccess<'de>>(
        self,
        mut access: A,
    ) -> std::result::Result<Self::Value, A::Error> {
        let mut map = BTreeMap::new();
        while let Some(key) = access.next_key::<K>()? {
            if map.contains_key(&key) {
                let what = self.what;
                return Err(A::Error::custom(format!("duplicate {what} key {key:?}")));
            }
            let value = access.next_value()?;
            map.insert(key, value);
        }
        Ok(map)
    }
}

fn unique_videos<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<BTreeMap<VideoIdentity, Timeline>, D::Error> {
    deserializer.deserialize_map(UniqueKeys::new("video"))
}

/// Read and validate the store file at `path`.
pub fn read_store(path: &Path) -> Result<Store> {
    let json = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::InvalidData => Error::malformed(path, "file is not valid UTF-8"),
        _ => Error::io(path, e),
    })?;
    parse_store(path, &json)
}

fn parse_store(path: &Path, json: &str) -> Result<Store> {
    let file: StoreFile =
        serde_json::from_str(json).map_err(|e| Error::malformed(path, e.to_string()))?;
    let vocabulary = Vocabulary::new(file.labels)
        .map_err(|dup| Error::malformed(path, format!("duplicate label {dup:?} in `labels`")))?;

    Ok(Store {
        vocabulary,
        timelines: file.label_maps,
    })
}

/// Write `store` to `path`, replacing any previous file atomically.
pub fn write_store(path: &Path, store: &Store) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(&StoreFileRef::from(store))
        .map_err(|e| Error::io(path, e.into()))?;
    atomic_write_bytes(path, &bytes)
}

/// Export `store` to YAML or JSON depending on the extension of `path`.
pub fn export(path: &Path, store: &Store) -> Result<()> {
    let data = StoreFileRef::from(store);
    let extension = path.extension().and_then(|s| s.to_str());
    let text = match extension {
        Some("yaml") | Some("yml") => serde_yaml::to_string(&data)
            .map_err(|e| Error::io(path, std::io::Error::other(e)))?,
        Some("json") => {
            serde_json::to_string_pretty(&data).map_err(|e| Error::io(path, e.into()))?
        }
        _ => return Err(Error::UnsupportedFormat(path.to_path_buf())),
    };
    std::fs::write(path, text).map_err(|e| Error::io(path, e))
}

fn atomic_write_bytes(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp_path = tmp_path_for(path);

    let written = (|| -> std::io::Result<()> {
        let mut file = File::create(&tmp_path)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        std::fs::rename(&tmp_path, path)
    })();

    if let Err(e) = written {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(Error::io(path, e));
    }
    Ok(())
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "store".to_string());
    tmp.set_file_name(format!("{file_name}.tmp"));
    tmp
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"{
        "labels": ["cat", "dog"],
        "label_maps": {
            "ABC123": {"0": [], "137": ["dog", "cat"], "10": ["cat"]}
        }
    }"#;

    fn parse(json: &str) -> Result<Store> {
        parse_store(Path::new("data.json"), json)
    }

    fn reason(err: Error) -> String {
        match err {
            Error::MalformedStore { reason, .. } => reason,
            other => panic!("expected MalformedStore, got {other:?}"),
        }
    }

    #[test]
    fn test_text_keys_become_frames() {
        let store = parse(SAMPLE).unwrap();
        let timeline = store.timeline(&VideoIdentity::new("ABC123")).unwrap();

        assert_eq!(
            timeline.explicit_frames().collect::<Vec<_>>(),
            vec![0, 10, 137]
        );
        let resolved = timeline.effective_labels(200);
        assert_eq!(resolved.labels.as_slice(), ["dog", "cat"]);
        assert!(resolved.inherited);
    }

    #[test]
    fn test_written_keys_are_text_in_frame_order() {
        let store = parse(SAMPLE).unwrap();
        let json = serde_json::to_value(StoreFileRef::from(&store)).unwrap();

        assert_eq!(json["labels"], serde_json::json!(["cat", "dog"]));
        let map = json["label_maps"]["ABC123"].as_object().unwrap();
        assert_eq!(map["137"], serde_json::json!(["dog", "cat"]));

        let text = serde_json::to_string(&StoreFileRef::from(&store)).unwrap();
        let at_10 = text.find("\"10\"").unwrap();
        let at_137 = text.find("\"137\"").unwrap();
        assert!(at_10 < at_137);
    }

    #[test]
    fn test_non_integer_frame_key_rejected() {
        let err = parse(r#"{"labels": [], "label_maps": {"X": {"0": [], "ten": []}}}"#)
            .unwrap_err();
        assert!(reason(err).contains("invalid frame key \"ten\""));

        let err = parse(r#"{"labels": [], "label_maps": {"X": {"-4": []}}}"#).unwrap_err();
        assert!(reason(err).contains("invalid frame key \"-4\""));
    }

    #[test]
    fn test_equal_frame_keys_rejected() {
        let err = parse(r#"{"labels": [], "label_maps": {"X": {"7": [], "07": []}}}"#)
            .unwrap_err();
        assert!(reason(err).contains("duplicate frame key"));
    }

    #[test]
    fn test_repeated_frame_key_rejected() {
        let err = parse(
            r#"{"labels": ["a"], "label_maps": {"X": {"0": [], "7": ["a"], "7": []}}}"#,
        )
        .unwrap_err();
        assert!(reason(err).contains("duplicate frame key \"7\""));
    }

    #[test]
    fn test_repeated_video_key_rejected() {
        let err = parse(
            r#"{"labels": ["a"], "label_maps": {
                "X": {"0": ["a"], "50": ["a"]},
                "X": {"0": []}
            }}"#,
        )
        .unwrap_err();
        assert!(reason(err).contains("duplicate video key \"X\""));
    }

    #[test]
    fn test_non_list_labels_rejected() {
        let err = parse(r#"{"labels": ["a"], "label_maps": {"X": {"0": "a"}}}"#).unwrap_err();
        assert!(matches!(err, Error::MalformedStore { .. }));
    }

    #[test]
    fn test_missing_sections_rejected() {
        let err = parse(r#"{"labels": ["a"]}"#).unwrap_err();
        assert!(reason(err).contains("label_maps"));

        let err = parse(r#"{"label_maps": {}}"#).unwrap_err();
        assert!(reason(err).contains("labels"));
    }

    #[test]
    fn test_duplicate_vocabulary_rejected() {
        let err = parse(r#"{"labels": ["a", "b", "a"], "label_maps": {}}"#).unwrap_err();
        assert!(reason(err).contains("duplicate label \"a\""));
    }

    #[test]
    fn test_duplicate_snapshot_labels_collapse() {
        let store = parse(r#"{"labels": ["a"], "label_maps": {"X": {"0": ["a", "a"]}}}"#)
            .unwrap();
        let timeline = store.timeline(&VideoIdentity::new("X")).unwrap();
        assert_eq!(timeline.effective_labels(0).labels.as_slice(), ["a"]);
    }

    #[test]
    fn test_missing_baseline_restored() {
        let store = parse(r#"{"labels": ["a"], "label_maps": {"X": {"5": ["a"]}}}"#).unwrap();
        let timeline = store.timeline(&VideoIdentity::new("X")).unwrap();
        assert_eq!(timeline.explicit_frames().collect::<Vec<_>>(), vec![0, 5]);
        assert!(timeline.effective_labels(2).labels.is_empty());
    }

    #[test]
    fn test_write_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.json");
        let store = parse(SAMPLE).unwrap();

        write_store(&path, &store).unwrap();
        write_store(&path, &store).unwrap();

        assert!(!dir.path().join("data.json.tmp").exists());
        assert_eq!(read_store(&path).unwrap(), store);
    }

    #[test]
    fn test_write_to_missing_directory_is_io_unavailable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("data.json");
        let err = write_store(&path, &Store::default()).unwrap_err();
        assert!(matches!(err, Error::IoUnavailable { .. }));
    }

    #[test]
    fn test_export_by_extension() {
        let dir = TempDir::new().unwrap();
        let store = parse(SAMPLE).unwrap();

        let yaml_path = dir.path().join("labels.yaml");
        export(&yaml_path, &store).unwrap();
        let yaml = std::fs::read_to_string(&yaml_path).unwrap();
        assert!(yaml.contains("label_maps:"));
        assert!(yaml.contains("ABC123:"));

        let json_path = dir.path().join("labels.json");
        export(&json_path, &store).unwrap();
        assert_eq!(read_store(&json_path).unwrap(), store);

        let err = export(&dir.path().join("labels.csv"), &store).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }
}
