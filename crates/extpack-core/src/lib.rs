// SPDX-FileCopyrightText: 2026 Extpack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the extpack extension pipeline.
//!
//! This crate provides the error taxonomy, the data model (build targets,
//! catalog metadata, preference fields), and the capability traits that the
//! bundler, catalog and conformance crates implement or consume.

pub mod error;
pub mod metadata;
pub mod preference;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::ExtpackError;
pub use metadata::{ExtensionMetadata, Languages};
pub use preference::{merge_preferences, InputValue, PreferenceField, PreferenceKind, SortSelection};
pub use types::{
    ArtifactDescriptor, BuildOutput, BuildTarget, CompileOptions, ExecutionContext, OutputFormat,
    ARTIFACT_EXTENSION,
};

pub use traits::{
    ArtifactLoader, CompileRequest, Compiler, HeaderMap, MetadataSource, OutputFs,
    SourceContract, ValidationReport, Validator,
};
