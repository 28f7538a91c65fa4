// SPDX-FileCopyrightText: 2026 Extpack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the extpack pipeline.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level extpack configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ExtpackConfig {
    /// General pipeline settings.
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Source, test, output and cache directories.
    #[serde(default)]
    pub paths: PathsConfig,

    /// Entry and artifact naming conventions.
    #[serde(default)]
    pub discovery: DiscoveryConfig,

    /// External bundler invocation.
    #[serde(default)]
    pub bundler: BundlerConfig,

    /// Module runtime used to instantiate compiled artifacts.
    #[serde(default)]
    pub runtime: RuntimeConfig,

    /// Conformance validator invocation.
    #[serde(default)]
    pub validator: ValidatorConfig,
}

/// General pipeline settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Directory layout of an extensions repository.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PathsConfig {
    /// Directory scanned for extension entry points.
    #[serde(default = "default_source_dir")]
    pub source_dir: PathBuf,

    /// Directory scanned for conformance test entries.
    #[serde(default = "default_test_dir")]
    pub test_dir: PathBuf,

    /// Directory compiled artifacts and `index.json` are written to.
    #[serde(default = "default_dist_dir")]
    pub dist_dir: PathBuf,

    /// Bundler scratch space.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            source_dir: default_source_dir(),
            test_dir: default_test_dir(),
            dist_dir: default_dist_dir(),
            cache_dir: default_cache_dir(),
        }
    }
}

fn default_source_dir() -> PathBuf {
    PathBuf::from("./src")
}

fn default_test_dir() -> PathBuf {
    PathBuf::from("./tests")
}

fn default_dist_dir() -> PathBuf {
    PathBuf::from("./dist")
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("./.extpack-cache")
}

/// Naming conventions used by discovery and catalog scanning.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DiscoveryConfig {
    /// Entry file name looked up in each extension directory.
    #[serde(default = "default_entry_file")]
    pub entry_file: String,

    /// File name suffix marking a conformance test entry.
    #[serde(default = "default_test_suffix")]
    pub test_suffix: String,

    /// Extension (without dot) of compiled artifacts picked up by `json`.
    #[serde(default = "default_artifact_extension")]
    pub artifact_extension: String,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            entry_file: default_entry_file(),
            test_suffix: default_test_suffix(),
            artifact_extension: default_artifact_extension(),
        }
    }
}

fn default_entry_file() -> String {
    "index.ts".to_string()
}

fn default_test_suffix() -> String {
    ".test.ts".to_string()
}

fn default_artifact_extension() -> String {
    "mjs".to_string()
}

/// External bundler settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BundlerConfig {
    /// Bundler executable (looked up on `PATH`).
    #[serde(default = "default_bundler_program")]
    pub program: String,

    /// Extra arguments appended after the fixed library-mode flags.
    #[serde(default)]
    pub extra_args: Vec<String>,
}

impl Default for BundlerConfig {
    fn default() -> Self {
        Self {
            program: default_bundler_program(),
            extra_args: Vec::new(),
        }
    }
}

fn default_bundler_program() -> String {
    "esbuild".to_string()
}

/// Module runtime settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Runtime executable able to import ES modules from `file://` URLs.
    #[serde(default = "default_runtime_program")]
    pub program: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            program: default_runtime_program(),
        }
    }
}

fn default_runtime_program() -> String {
    "node".to_string()
}

/// Conformance validator settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ValidatorConfig {
    /// Validator executable; receives the compiled bundle on stdin.
    #[serde(default = "default_validator_program")]
    pub program: String,

    /// Arguments passed to the validator.
    #[serde(default = "default_validator_args")]
    pub args: Vec<String>,

    /// Size of the compile worker pool used during `test`.
    #[serde(default = "default_workers")]
    pub workers: usize,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            program: default_validator_program(),
            args: default_validator_args(),
            workers: default_workers(),
        }
    }
}

fn default_validator_program() -> String {
    "tanoshi-cli".to_string()
}

fn default_validator_args() -> Vec<String> {
    vec!["test".to_string()]
}

fn default_workers() -> usize {
    4
}
