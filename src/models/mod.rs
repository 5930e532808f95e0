// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation data model: vocabulary, per-video timelines and the store.

pub mod store;
pub mod timeline;
pub mod vocabulary;
