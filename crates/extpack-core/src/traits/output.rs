// SPDX-FileCopyrightText: 2026 Extpack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Destination filesystem for compiled artifacts.

use std::path::Path;

use async_trait::async_trait;

use crate::error::ExtpackError;

/// Where compiled artifacts end up: real disk for `build`, memory for `test`.
#[async_trait]
pub trait OutputFs: Send + Sync {
    /// Write `contents` to `path`, replacing any previous file.
    async fn write(&self, path: &Path, contents: Vec<u8>) -> Result<(), ExtpackError>;

    /// Read the full contents of `path`.
    async fn read(&self, path: &Path) -> Result<Vec<u8>, ExtpackError>;

    /// True when nothing written here reaches the disk. Compilers must then
    /// produce the artifact without any on-disk intermediate.
    fn is_ephemeral(&self) -> bool {
        false
    }

    /// Read `path` as UTF-8 text.
    async fn read_to_string(&self, path: &Path) -> Result<String, ExtpackError> {
        let bytes = self.read(path).await?;
        String::from_utf8(bytes).map_err(|e| {
            ExtpackError::Internal(format!("{} is not valid UTF-8: {e}", path.display()))
        })
    }
}
