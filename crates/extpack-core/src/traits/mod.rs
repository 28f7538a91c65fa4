// SPDX-FileCopyrightText: 2026 Extpack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability traits at the seams between the pipeline and its external
//! collaborators (bundler, module runtime, validator, output filesystem).
//!
//! Async traits use `#[async_trait]` so implementations can be held as
//! trait objects.

pub mod compiler;
pub mod loader;
pub mod output;
pub mod source;
pub mod validator;

pub use compiler::{CompileRequest, Compiler};
pub use loader::{ArtifactLoader, MetadataSource};
pub use output::OutputFs;
pub use source::{HeaderMap, SourceContract};
pub use validator::{ValidationReport, Validator};
