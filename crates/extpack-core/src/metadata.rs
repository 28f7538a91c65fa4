// SPDX-FileCopyrightText: 2026 Extpack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Catalog metadata declared by every extension.
//!
//! [`ExtensionMetadata`] is both the wire contract read from a constructed
//! extension and the record written to the catalog manifest, so its serde
//! shape is exactly `id`, `name`, `url`, `version`, `icon`, `languages`, `nsfw`.

use serde::{Deserialize, Serialize};

/// Sentinel used on the wire for "every language".
pub const ALL_LANGUAGES: &str = "all";

/// Locales supported by an extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawLanguages", into = "RawLanguages")]
pub enum Languages {
    /// The `"all"` sentinel.
    All,
    /// A single locale code such as `"en"`.
    Single(String),
    /// An ordered list of locale codes.
    Multi(Vec<String>),
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawLanguages {
    One(String),
    Many(Vec<String>),
}

impl From<RawLanguages> for Languages {
    fn from(raw: RawLanguages) -> Self {
        match raw {
            RawLanguages::One(code) if code == ALL_LANGUAGES => Languages::All,
            RawLanguages::One(code) => Languages::Single(code),
            RawLanguages::Many(codes) => Languages::Multi(codes),
        }
    }
}

impl From<Languages> for RawLanguages {
    fn from(languages: Languages) -> Self {
        match languages {
            Languages::All => RawLanguages::One(ALL_LANGUAGES.to_string()),
            Languages::Single(code) => RawLanguages::One(code),
            Languages::Multi(codes) => RawLanguages::Many(codes),
        }
    }
}

/// One catalog record describing a compiled extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionMetadata {
    pub id: i64,
    pub name: String,
    /// Base URL of the content source.
    pub url: String,
    pub version: String,
    /// Absolute URL of the source icon.
    pub icon: String,
    pub languages: Languages,
    pub nsfw: bool,
}

impl ExtensionMetadata {
    /// Parse the declared version as semver.
    pub fn parsed_version(&self) -> Result<semver::Version, semver::Error> {
        semver::Version::parse(&self.version)
    }
}
