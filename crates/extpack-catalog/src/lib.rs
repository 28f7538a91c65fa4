// SPDX-FileCopyrightText: 2026 Extpack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Catalog side of the extpack pipeline: recover metadata from compiled
//! artifacts and assemble the `index.json` manifest consumed by host apps.

pub mod assemble;
pub mod introspect;
pub mod prefs;

pub use assemble::{assemble_catalog, render_manifest, scan_artifacts, sort_entries, Catalog, MANIFEST_FILE};
pub use introspect::{artifact_url, Introspector, JsonMetadataSource, NodeLoader};
pub use prefs::PreferenceStore;
