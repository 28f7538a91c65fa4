// SPDX-FileCopyrightText: 2026 Extpack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Output filesystems: real disk for builds, memory for conformance bundles.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use extpack_core::{ExtpackError, OutputFs};
use tokio::sync::RwLock;

/// Writes artifacts to the local filesystem, creating parent directories.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskFs;

#[async_trait]
impl OutputFs for DiskFs {
    async fn write(&self, path: &Path, contents: Vec<u8>) -> Result<(), ExtpackError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                ExtpackError::io(format!("failed to create {}", parent.display()), e)
            })?;
        }
        tokio::fs::write(path, contents)
            .await
            .map_err(|e| ExtpackError::io(format!("failed to write {}", path.display()), e))
    }

    async fn read(&self, path: &Path) -> Result<Vec<u8>, ExtpackError> {
        tokio::fs::read(path)
            .await
            .map_err(|e| ExtpackError::io(format!("failed to read {}", path.display()), e))
    }
}

/// In-memory filesystem. Clones share the same contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryFs {
    files: Arc<RwLock<HashMap<PathBuf, Vec<u8>>>>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths currently stored, sorted.
    pub async fn paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self.files.read().await.keys().cloned().collect();
        paths.sort();
        paths
    }

    pub async fn len(&self) -> usize {
        self.files.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.files.read().await.is_empty()
    }

    /// Drop every stored file, returning how many there were.
    pub async fn clear(&self) -> usize {
        let mut files = self.files.write().await;
        let count = files.len();
        files.clear();
        count
    }
}

#[async_trait]
impl OutputFs for MemoryFs {
    fn is_ephemeral(&self) -> bool {
        true
    }

    async fn write(&self, path: &Path, contents: Vec<u8>) -> Result<(), ExtpackError> {
        self.files.write().await.insert(path.to_path_buf(), contents);
        Ok(())
    }

    async fn read(&self, path: &Path) -> Result<Vec<u8>, ExtpackError> {
        self.files
            .read()
            .await
            .get(path)
            .cloned()
            .ok_or_else(|| {
                ExtpackError::io(
                    format!("failed to read {}", path.display()),
                    std::io::Error::new(std::io::ErrorKind::NotFound, "no such file in memory"),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disk_fs_creates_parents() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("dist").join("a.mjs");
        DiskFs.write(&path, b"export default 1".to_vec()).await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"export default 1");
        assert_eq!(DiskFs.read_to_string(&path).await.unwrap(), "export default 1");
    }

    #[tokio::test]
    async fn disk_fs_overwrites() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("a.mjs");
        DiskFs.write(&path, b"old".to_vec()).await.unwrap();
        DiskFs.write(&path, b"new".to_vec()).await.unwrap();
        assert_eq!(DiskFs.read(&path).await.unwrap(), b"new");
    }

    #[tokio::test]
    async fn memory_fs_never_touches_disk() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("bundle.mjs");
        let fs = MemoryFs::new();
        fs.write(&path, b"bundle".to_vec()).await.unwrap();

        assert!(!path.exists());
        assert_eq!(fs.read_to_string(&path).await.unwrap(), "bundle");
        assert_eq!(fs.paths().await, vec![path]);
    }

    #[tokio::test]
    async fn memory_fs_clones_share_state() {
        let fs = MemoryFs::new();
        let other = fs.clone();
        other.write(Path::new("/dist/x.mjs"), vec![1, 2]).await.unwrap();
        assert_eq!(fs.len().await, 1);
        assert!(!fs.is_empty().await);
    }

    #[tokio::test]
    async fn memory_fs_missing_file_is_io_error() {
        let err = MemoryFs::new().read(Path::new("/nope.mjs")).await.unwrap_err();
        assert!(matches!(err, ExtpackError::Io { .. }));
    }

    #[tokio::test]
    async fn clear_releases_every_file() {
        let fs = MemoryFs::new();
        fs.write(Path::new("/dist/a.mjs"), b"a".to_vec()).await.unwrap();
        fs.write(Path::new("/dist/b.mjs"), b"b".to_vec()).await.unwrap();
        assert_eq!(fs.clear().await, 2);
        assert!(fs.is_empty().await);
        assert!(fs.read(Path::new("/dist/a.mjs")).await.is_err());
    }

    #[test]
    fn only_memory_is_ephemeral() {
        assert!(MemoryFs::new().is_ephemeral());
        assert!(!DiskFs.is_ephemeral());
    }
}
