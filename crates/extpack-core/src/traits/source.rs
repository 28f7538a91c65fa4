// SPDX-FileCopyrightText: 2026 Extpack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The content-source contract as seen by the pipeline.
//!
//! Only `metadata` is required. Filters, preferences and request headers are
//! optional capabilities with empty defaults, so a minimal source only has to
//! declare who it is.

use std::collections::BTreeMap;

use crate::error::ExtpackError;
use crate::metadata::ExtensionMetadata;
use crate::preference::PreferenceField;
use crate::traits::loader::MetadataSource;

/// Extra HTTP headers a source wants attached to its requests.
pub type HeaderMap = BTreeMap<String, String>;

/// Capabilities of a content-source extension relevant outside serve time.
pub trait SourceContract: Send + Sync {
    /// Declared catalog metadata.
    fn metadata(&self) -> ExtensionMetadata;

    /// Search filters offered by the source.
    fn filter_list(&self) -> Vec<PreferenceField> {
        Vec::new()
    }

    /// Preference schema of the source.
    fn preferences(&self) -> Vec<PreferenceField> {
        Vec::new()
    }

    fn headers(&self) -> HeaderMap {
        HeaderMap::new()
    }
}

impl<T: SourceContract> MetadataSource for T {
    fn describe(&self) -> Result<ExtensionMetadata, ExtpackError> {
        Ok(self.metadata())
    }
}
