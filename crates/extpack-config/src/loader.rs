// SPDX-FileCopyrightText: 2026 Extpack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./extpack.toml` > `~/.config/extpack/extpack.toml` > `/etc/extpack/extpack.toml`
//! with environment variable overrides via `EXTPACK_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::ExtpackConfig;

/// Local config file name, looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "extpack.toml";

/// System-wide config file.
pub const SYSTEM_CONFIG_FILE: &str = "/etc/extpack/extpack.toml";

/// Sections that may be overridden through `EXTPACK_<SECTION>_<KEY>`.
const ENV_SECTIONS: &[&str] = &[
    "pipeline",
    "paths",
    "discovery",
    "bundler",
    "runtime",
    "validator",
];

/// User config file under the XDG config directory, if one can be determined.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("extpack").join(LOCAL_CONFIG_FILE))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/extpack/extpack.toml` (system-wide)
/// 3. `~/.config/extpack/extpack.toml` (user XDG config)
/// 4. `./extpack.toml` (local directory)
/// 5. `EXTPACK_*` environment variables
pub fn load_config() -> Result<ExtpackConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<ExtpackConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ExtpackConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<ExtpackConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ExtpackConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(ExtpackConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_FILE))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// Create the environment variable provider.
///
/// Only the first underscore after a known section name becomes a dot, so
/// `EXTPACK_BUNDLER_EXTRA_ARGS` maps to `bundler.extra_args`.
fn env_provider() -> Env {
    Env::prefixed("EXTPACK_").map(|key| {
        let key_str = key.as_str();
        ENV_SECTIONS
            .iter()
            .find_map(|section| {
                key_str
                    .strip_prefix(section)
                    .and_then(|rest| rest.strip_prefix('_'))
                    .map(|rest| format!("{section}.{rest}"))
            })
            .unwrap_or_else(|| key_str.to_string())
            .into()
    })
}
