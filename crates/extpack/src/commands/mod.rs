// SPDX-FileCopyrightText: 2026 Extpack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Workflows behind the `build`, `json` and `test` subcommands.
//!
//! Each workflow takes its external collaborators as parameters so the
//! binary can wire in esbuild, Node.js and the validator CLI while tests use
//! the mocks from `extpack-test-utils`.

pub mod build;
pub mod json;

use std::path::{Path, PathBuf};

pub use build::{run_build, BuildReport};
pub use json::run_json;
pub use test::run_test;

/// Resolve a configured path against the project directory.
pub fn resolve(project_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        project_dir.join(path)
    }
}
