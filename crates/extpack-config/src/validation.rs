// SPDX-FileCopyrightText: 2026 Extpack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::ExtpackConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every problem instead of failing fast.
pub fn validate_config(config: &ExtpackConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    if !LOG_LEVELS.contains(&config.pipeline.log_level.to_lowercase().as_str()) {
        fail(format!(
            "pipeline.log_level `{}` must be one of {}",
            config.pipeline.log_level,
            LOG_LEVELS.join(", ")
        ));
    }

    for (key, path) in [
        ("paths.source_dir", &config.paths.source_dir),
        ("paths.test_dir", &config.paths.test_dir),
        ("paths.dist_dir", &config.paths.dist_dir),
        ("paths.cache_dir", &config.paths.cache_dir),
    ] {
        if path.as_os_str().is_empty() {
            fail(format!("{key} must not be empty"));
        }
    }

    for (key, value) in [
        ("discovery.entry_file", &config.discovery.entry_file),
        ("discovery.test_suffix", &config.discovery.test_suffix),
        ("discovery.artifact_extension", &config.discovery.artifact_extension),
        ("bundler.program", &config.bundler.program),
        ("runtime.program", &config.runtime.program),
        ("validator.program", &config.validator.program),
    ] {
        if value.trim().is_empty() {
            fail(format!("{key} must not be empty"));
        }
    }

    if config.discovery.entry_file.contains(['/', '\\']) {
        fail(format!(
            "discovery.entry_file `{}` must be a bare file name",
            config.discovery.entry_file
        ));
    }

    if config.discovery.artifact_extension.starts_with('.') {
        fail(format!(
            "discovery.artifact_extension `{}` must not start with a dot",
            config.discovery.artifact_extension
        ));
    }

    if config.validator.workers < 1 {
        fail("validator.workers must be at least 1, got 0".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
