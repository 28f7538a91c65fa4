// SPDX-FileCopyrightText: 2026 Extpack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bundler capability.

use std::path::Path;

use async_trait::async_trait;

use crate::error::ExtpackError;
use crate::traits::output::OutputFs;
use crate::types::{BuildOutput, BuildTarget, CompileOptions};

/// Everything a compiler needs for one build target.
pub struct CompileRequest<'a> {
    pub target: &'a BuildTarget,
    pub options: &'a CompileOptions,
    /// Filesystem the finished artifacts are moved into.
    pub output: &'a dyn OutputFs,
    /// Scratch directory the bundler may write into.
    pub staging: &'a Path,
}

/// Turns a build target into one or more self-contained module artifacts.
///
/// Failures are reported as [`ExtpackError::Compile`] carrying the bundler's
/// diagnostics so callers can decide whether to skip the target or abort.
#[async_trait]
pub trait Compiler: Send + Sync {
    async fn compile(&self, request: CompileRequest<'_>) -> Result<BuildOutput, ExtpackError>;
}
