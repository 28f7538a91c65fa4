// SPDX-FileCopyrightText: 2026 Extpack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the extpack pipeline.
//!
//! Provides TOML configuration parsing with strict validation (`deny_unknown_fields`),
//! XDG file hierarchy lookup, `EXTPACK_*` environment overrides, and miette
//! diagnostics with typo suggestions.
//!
//! # Usage
//!
//! ```no_run
//! use extpack_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("bundler: {}", config.bundler.program);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::Path;

pub use diagnostic::{render_errors, ConfigError};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::ExtpackConfig;

/// Load configuration from the XDG hierarchy and validate it.
pub fn load_and_validate() -> Result<ExtpackConfig, Vec<ConfigError>> {
    finish(loader::load_config(), collect_toml_sources)
}

/// Load configuration from an explicit file (plus env overrides) and validate it.
pub fn load_and_validate_path(path: &Path) -> Result<ExtpackConfig, Vec<ConfigError>> {
    if !path.is_file() {
        return Err(vec![ConfigError::Other(format!(
            "config file {} does not exist",
            path.display()
        ))]);
    }
    finish(loader::load_config_from_path(path), || {
        let key = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        std::fs::read_to_string(path)
            .map(|content| vec![(key.display().to_string(), content)])
            .unwrap_or_default()
    })
}

/// Load configuration from a TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<ExtpackConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_str(toml_content), || {
        vec![("<inline>".to_string(), toml_content.to_string())]
    })
}

fn finish(
    loaded: Result<ExtpackConfig, figment::Error>,
    sources: impl FnOnce() -> Vec<(String, String)>,
) -> Result<ExtpackConfig, Vec<ConfigError>> {
    match loaded {
        Ok(config) => {
            validation::validate_config(&config)?;
            tracing::debug!(
                source_dir = %config.paths.source_dir.display(),
                dist_dir = %config.paths.dist_dir.display(),
                "configuration loaded"
            );
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err, &sources())),
    }
}

/// Read every config file in the hierarchy for error span resolution.
fn collect_toml_sources() -> Vec<(String, String)> {
    let mut sources = Vec::new();

    if let Ok(content) = std::fs::read_to_string(loader::LOCAL_CONFIG_FILE) {
        let path = std::env::current_dir()
            .map(|d| d.join(loader::LOCAL_CONFIG_FILE).display().to_string())
            .unwrap_or_else(|_| loader::LOCAL_CONFIG_FILE.to_string());
        sources.push((path, content));
    }

    if let Some(path) = loader::user_config_path()
        && let Ok(content) = std::fs::read_to_string(&path)
    {
        sources.push((path.display().to_string(), content));
    }

    if let Ok(content) = std::fs::read_to_string(loader::SYSTEM_CONFIG_FILE) {
        sources.push((loader::SYSTEM_CONFIG_FILE.to_string(), content));
    }

    sources
}
