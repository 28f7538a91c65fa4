// SPDX-FileCopyrightText: 2026 Extpack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User-configurable extension settings and the schema/saved-state merge.
//!
//! Preferences travel as JSON objects tagged by `type`, matching what an
//! extension returns from its preference schema. Two fields are the same
//! setting when both the variant tag and the name match.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// A scalar option value offered by `Select` and `Sort` fields or held by a `Group`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputValue {
    String(String),
    Number(f64),
    Boolean(bool),
}

impl From<&str> for InputValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for InputValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<f64> for InputValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<bool> for InputValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

/// Selected criterion of a `Sort` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSelection {
    pub index: usize,
    pub ascending: bool,
}

/// Variant tag of a [`PreferenceField`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum PreferenceKind {
    Text,
    Checkbox,
    Select,
    Group,
    Sort,
}

/// A single extension setting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PreferenceField {
    Text {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        state: Option<String>,
    },
    Checkbox {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        state: Option<bool>,
    },
    Select {
        name: String,
        values: Vec<InputValue>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        state: Option<usize>,
    },
    Group {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        state: Option<Vec<InputValue>>,
    },
    Sort {
        name: String,
        values: Vec<InputValue>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        state: Option<SortSelection>,
    },
}

impl PreferenceField {
    pub fn kind(&self) -> PreferenceKind {
        match self {
            Self::Text { .. } => PreferenceKind::Text,
            Self::Checkbox { .. } => PreferenceKind::Checkbox,
            Self::Select { .. } => PreferenceKind::Select,
            Self::Group { .. } => PreferenceKind::Group,
            Self::Sort { .. } => PreferenceKind::Sort,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Text { name, .. }
            | Self::Checkbox { name, .. }
            | Self::Select { name, .. }
            | Self::Group { name, .. }
            | Self::Sort { name, .. } => name,
        }
    }

    /// Identity key of this setting.
    pub fn key(&self) -> (PreferenceKind, &str) {
        (self.kind(), self.name())
    }

    /// True when `other` describes the same setting (same tag and name).
    pub fn same_setting(&self, other: &PreferenceField) -> bool {
        self.key() == other.key()
    }

    /// Copy of `self` carrying the state of `saved`.
    ///
    /// Structure (`values`) always comes from `self`. A saved index that no
    /// longer fits the current value list is ignored.
    fn with_state_of(&self, saved: &PreferenceField) -> PreferenceField {
        let mut merged = self.clone();
        match (&mut merged, saved) {
            (Self::Text { state, .. }, Self::Text { state: saved, .. }) => {
                *state = saved.clone();
            }
            (Self::Checkbox { state, .. }, Self::Checkbox { state: saved, .. }) => {
                *state = *saved;
            }
            (Self::Select { values, state, .. }, Self::Select { state: saved, .. }) => {
                if saved.is_none_or(|index| index < values.len()) {
                    *state = *saved;
                }
            }
            (Self::Group { state, .. }, Self::Group { state: saved, .. }) => {
                *state = saved.clone();
            }
            (Self::Sort { values, state, .. }, Self::Sort { state: saved, .. }) => {
                if saved.is_none_or(|sel| sel.index < values.len()) {
                    *state = *saved;
                }
            }
            _ => {}
        }
        merged
    }
}

/// Merge previously saved preferences into the current schema.
///
/// The result contains exactly the schema's fields in schema order. Fields
/// whose key matches a saved field take its state; saved fields absent from
/// the schema are dropped.
pub fn merge_preferences(
    schema: &[PreferenceField],
    saved: &[PreferenceField],
) -> Vec<PreferenceField> {
    schema
        .iter()
        .map(|field| match saved.iter().find(|s| s.same_setting(field)) {
            Some(saved) => field.with_state_of(saved),
            None => field.clone(),
        })
        .collect()
}
