// SPDX-FileCopyrightText: 2026 Extpack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! On-disk preference persistence.
//!
//! Each source's preferences live in `<dir>/<lowercased source name>.json` as
//! pretty-printed JSON.
//!
//! None of the `extpack` commands touch this store. It is library surface for
//! host applications that load cataloged extensions and need to persist user
//! settings across sessions: call [`PreferenceStore::save`] when the user
//! changes a setting and [`PreferenceStore::reapply`] with the extension's
//! declared schema when it is loaded again.

use std::path::{Path, PathBuf};

use extpack_core::{merge_preferences, ExtpackError, PreferenceField};
use tracing::{debug, warn};

/// Directory-backed store of saved preference lists.
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    dir: PathBuf,
}

impl PreferenceStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding the preferences of `source_name`.
    pub fn path_for(&self, source_name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", source_name.to_lowercase()))
    }

    pub async fn save(
        &self,
        source_name: &str,
        preferences: &[PreferenceField],
    ) -> Result<PathBuf, ExtpackError> {
        let path = self.path_for(source_name);
        let json = serde_json::to_string_pretty(preferences)
            .map_err(|e| ExtpackError::Internal(format!("failed to serialize preferences: {e}")))?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| ExtpackError::io(format!("failed to create {}", self.dir.display()), e))?;
        tokio::fs::write(&path, json)
            .await
            .map_err(|e| ExtpackError::io(format!("failed to write {}", path.display()), e))?;

        debug!(source = source_name, path = %path.display(), "preferences saved");
        Ok(path)
    }

    /// Saved preferences of `source_name`; `None` if nothing was saved.
    pub async fn load(
        &self,
        source_name: &str,
    ) -> Result<Option<Vec<PreferenceField>>, ExtpackError> {
        let path = self.path_for(source_name);
        let text = match tokio::fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(ExtpackError::io(format!("failed to read {}", path.display()), e));
            }
        };
        serde_json::from_str(&text).map(Some).map_err(|e| {
            ExtpackError::Internal(format!("{} is not a preference list: {e}", path.display()))
        })
    }

    /// Merge saved state into `schema`. An unreadable save counts as none.
    pub async fn reapply(
        &self,
        source_name: &str,
        schema: &[PreferenceField],
    ) -> Vec<PreferenceField> {
        match self.load(source_name).await {
            Ok(Some(saved)) => merge_preferences(schema, &saved),
            Ok(None) => schema.to_vec(),
            Err(e) => {
                warn!(source = source_name, error = %e, "ignoring saved preferences");
                schema.to_vec()
            }
        }
    }
}
