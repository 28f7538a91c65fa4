// SPDX-FileCopyrightText: 2026 Extpack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Artifact loader backed by a fixed table of metadata.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use async_trait::async_trait;

use extpack_core::{ArtifactLoader, ExtensionMetadata, ExtpackError, MetadataSource, SourceContract};

/// Resolves artifacts by file name to pre-registered metadata.
///
/// Unknown or explicitly failing artifacts produce an introspection error.
#[derive(Debug, Clone, Default)]
pub struct StaticLoader {
    entries: HashMap<String, ExtensionMetadata>,
    failing: HashSet<String>,
}

impl StaticLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the metadata returned for `file_name` (e.g. `a.mjs`).
    pub fn with(mut self, file_name: &str, metadata: ExtensionMetadata) -> Self {
        self.entries.insert(file_name.to_string(), metadata);
        self
    }

    /// Make loading `file_name` fail as if its default export did not construct.
    pub fn failing(mut self, file_name: &str) -> Self {
        self.failing.insert(file_name.to_string());
        self
    }
}

struct StaticSource(ExtensionMetadata);

impl SourceContract for StaticSource {
    fn metadata(&self) -> ExtensionMetadata {
        self.0.clone()
    }
}

#[async_trait]
impl ArtifactLoader for StaticLoader {
    async fn load(&self, artifact: &Path) -> Result<Box<dyn MetadataSource>, ExtpackError> {
        let file_name = artifact
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        if self.failing.contains(&file_name) {
            return Err(ExtpackError::Introspection {
                artifact: file_name,
                reason: "mock: default export is not a constructor".to_string(),
            });
        }

        match self.entries.get(&file_name) {
            Some(metadata) => Ok(Box::new(StaticSource(metadata.clone()))),
            None => Err(ExtpackError::Introspection {
                artifact: file_name,
                reason: "mock: no metadata registered".to_string(),
            }),
        }
    }
}
