// SPDX-FileCopyrightText: 2026 Extpack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conformance validator capability.

use async_trait::async_trait;

use crate::error::ExtpackError;

/// Captured outcome of validating one bundle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Exit status; zero means the bundle passed.
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ValidationReport {
    pub fn passed(&self) -> bool {
        self.status == 0
    }
}

/// Checks a compiled test bundle against the conformance harness.
///
/// Returns `Err` only when the validator itself could not be run; a failing
/// bundle is a report with a non-zero status.
#[async_trait]
pub trait Validator: Send + Sync {
    async fn validate(&self, bundle: &str) -> Result<ValidationReport, ExtpackError>;
}
