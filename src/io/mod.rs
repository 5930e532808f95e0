// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations for video identity and store files.

pub mod identity;
pub mod serialization;
