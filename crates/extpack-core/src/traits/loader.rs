// SPDX-FileCopyrightText: 2026 Extpack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dynamic artifact loading for metadata introspection.

use std::path::Path;

use async_trait::async_trait;

use crate::error::ExtpackError;
use crate::metadata::ExtensionMetadata;

/// A constructed extension instance able to report its catalog metadata.
pub trait MetadataSource: Send + Sync {
    /// Read the source-contract fields of this instance.
    fn describe(&self) -> Result<ExtensionMetadata, ExtpackError>;
}

/// Loads a compiled artifact and constructs its default export.
#[async_trait]
pub trait ArtifactLoader: Send + Sync {
    async fn load(&self, artifact: &Path) -> Result<Box<dyn MetadataSource>, ExtpackError>;
}
