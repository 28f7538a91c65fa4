// SPDX-FileCopyrightText: 2026 Extpack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the discovery, compile, and conformance stages.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// File extension given to every compiled artifact.
pub const ARTIFACT_EXTENSION: &str = "mjs";

/// Module format emitted by the bundler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
pub enum OutputFormat {
    Esm,
    Cjs,
}

/// Runtime the compiled module is expected to execute in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
pub enum ExecutionContext {
    Node,
    Browser,
}

/// One intended compilation unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildTarget {
    /// Path of the entry file handed to the bundler.
    pub entry: PathBuf,
    /// Logical module name; the artifact is written as `<name>.mjs`.
    pub name: String,
}

impl BuildTarget {
    pub fn new(entry: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            entry: entry.into(),
            name: name.into(),
        }
    }

    /// File name of the artifact produced for this target.
    pub fn artifact_file_name(&self) -> String {
        format!("{}.{ARTIFACT_EXTENSION}", self.name)
    }
}

/// Fixed bundler configuration for one compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    pub cache_dir: PathBuf,
    pub dist_dir: PathBuf,
    /// Output file name inside `dist_dir`.
    pub dist_entry: String,
    pub output_format: OutputFormat,
    pub is_library: bool,
    pub scope_hoist: bool,
    pub source_maps: bool,
    pub context: ExecutionContext,
    pub include_node_modules: bool,
}

impl CompileOptions {
    /// Options every extension is built with: a single self-contained,
    /// tree-shaken ES module library for Node with no source maps.
    pub fn library(target: &BuildTarget, dist_dir: &Path, cache_dir: &Path) -> Self {
        Self {
            cache_dir: cache_dir.to_path_buf(),
            dist_dir: dist_dir.to_path_buf(),
            dist_entry: target.artifact_file_name(),
            output_format: OutputFormat::Esm,
            is_library: true,
            scope_hoist: true,
            source_maps: false,
            context: ExecutionContext::Node,
            include_node_modules: true,
        }
    }

    /// Use `extension` instead of the default artifact extension.
    pub fn with_extension(mut self, extension: &str) -> Self {
        let stem = self
            .dist_entry
            .strip_suffix(&format!(".{ARTIFACT_EXTENSION}"))
            .unwrap_or(&self.dist_entry)
            .to_string();
        self.dist_entry = format!("{stem}.{extension}");
        self
    }

    /// Path the artifact will have once moved into the destination filesystem.
    pub fn output_path(&self) -> PathBuf {
        self.dist_dir.join(&self.dist_entry)
    }
}

/// A single artifact produced by a successful compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactDescriptor {
    /// Artifact file name (e.g. `mangadex.mjs`).
    pub name: String,
    /// Location of the artifact inside the destination filesystem.
    pub path: PathBuf,
}

/// Result of compiling one build target.
#[derive(Debug, Clone)]
pub struct BuildOutput {
    pub artifacts: Vec<ArtifactDescriptor>,
    pub build_time: Duration,
}
