// SPDX-FileCopyrightText: 2026 Extpack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Build target discovery.
//!
//! An extensions repository keeps one extension per subdirectory of the
//! source root, each with its own entry file, and optionally a single
//! extension at the root itself. Only one level is scanned. Results come
//! back in directory-listing order; catalog determinism is handled later by
//! the assembler's sort.

use std::ffi::OsStr;
use std::path::Path;

use extpack_core::{BuildTarget, ExtpackError};
use tokio::fs::{self, DirEntry};
use tracing::debug;

/// Discover extension build targets under `source_root`.
///
/// Every immediate subdirectory containing `entry_file` yields a target named
/// after the directory. If `source_root/entry_file` itself exists, one more
/// target named `project_name` is produced.
pub async fn discover_targets(
    source_root: &Path,
    entry_file: &str,
    project_name: &str,
) -> Result<Vec<BuildTarget>, ExtpackError> {
    let mut targets = Vec::new();

    for entry in list_dir(source_root).await? {
        let path = entry.path();
        let Ok(meta) = fs::metadata(&path).await else {
            continue;
        };

        if meta.is_dir() {
            let entry_path = path.join(entry_file);
            if is_file(&entry_path).await {
                let name = entry.file_name().to_string_lossy().into_owned();
                debug!(target_name = %name, entry = %entry_path.display(), "discovered extension");
                targets.push(BuildTarget::new(entry_path, name));
            }
        } else if meta.is_file() && entry.file_name() == OsStr::new(entry_file) {
            debug!(target_name = %project_name, entry = %path.display(), "discovered root extension");
            targets.push(BuildTarget::new(path, project_name));
        }
    }

    Ok(targets)
}

/// Discover conformance test entries: files in `test_root` ending with `suffix`.
///
/// The logical name of each test is its file name without the suffix.
pub async fn discover_test_entries(
    test_root: &Path,
    suffix: &str,
) -> Result<Vec<BuildTarget>, ExtpackError> {
    let mut tests = Vec::new();

    for entry in list_dir(test_root).await? {
        let file_name = entry.file_name().to_string_lossy().into_owned();
        let Some(name) = file_name.strip_suffix(suffix).filter(|n| !n.is_empty()) else {
            continue;
        };
        let path = entry.path();
        if !is_file(&path).await {
            continue;
        }
        debug!(test = %file_name, "discovered test entry");
        tests.push(BuildTarget::new(path, name));
    }

    Ok(tests)
}

/// Root extension name when the project directory has no name of its own.
pub const FALLBACK_ROOT_NAME: &str = "index";

/// Name of the project directory, used for a root-level extension.
///
/// Resolves `dir` when possible; a path with no final component (such as
/// `/`) yields [`FALLBACK_ROOT_NAME`].
pub fn project_name(dir: &Path) -> String {
    let resolved = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
    resolved
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| FALLBACK_ROOT_NAME.to_string())
}

async fn list_dir(dir: &Path) -> Result<Vec<DirEntry>, ExtpackError> {
    let mut read_dir = fs::read_dir(dir).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ExtpackError::DirectoryNotFound {
                path: dir.to_path_buf(),
            }
        } else {
            ExtpackError::Discovery {
                path: dir.to_path_buf(),
                source: e,
            }
        }
    })?;

    let mut entries = Vec::new();
    while let Some(entry) = read_dir
        .next_entry()
        .await
        .map_err(|e| ExtpackError::Discovery {
            path: dir.to_path_buf(),
            source: e,
        })?
    {
        entries.push(entry);
    }
    Ok(entries)
}

async fn is_file(path: &Path) -> bool {
    fs::metadata(path).await.map(|m| m.is_file()).unwrap_or(false)
}
