// SPDX-FileCopyrightText: 2026 Extpack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conformance validator with scripted outcomes.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use extpack_core::{ExtpackError, ValidationReport, Validator};

/// Returns a configured status for bundles containing a marker string and
/// passes everything else. Every bundle received is recorded.
#[derive(Clone, Default)]
pub struct ScriptedValidator {
    rules: Vec<(String, i32)>,
    stdout: String,
    stderr: String,
    unavailable: bool,
    received: Arc<Mutex<Vec<String>>>,
}

impl ScriptedValidator {
    /// A validator that passes every bundle.
    pub fn passing() -> Self {
        Self::default()
    }

    /// Report `status` for bundles containing `marker`.
    pub fn with_status(mut self, marker: &str, status: i32) -> Self {
        self.rules.push((marker.to_string(), status));
        self
    }

    /// Output captured on every run.
    pub fn with_output(mut self, stdout: &str, stderr: &str) -> Self {
        self.stdout = stdout.to_string();
        self.stderr = stderr.to_string();
        self
    }

    /// Fail as if the validator program could not be spawned.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// Bundles validated so far, in call order.
    pub async fn received(&self) -> Vec<String> {
        self.received.lock().await.clone()
    }
}

#[async_trait]
impl Validator for ScriptedValidator {
    async fn validate(&self, bundle: &str) -> Result<ValidationReport, ExtpackError> {
        if self.unavailable {
            return Err(ExtpackError::io(
                "failed to run validator",
                std::io::Error::new(std::io::ErrorKind::NotFound, "mock validator missing"),
            ));
        }
        self.received.lock().await.push(bundle.to_string());

        let status = self
            .rules
            .iter()
            .find(|(marker, _)| bundle.contains(marker.as_str()))
            .map_or(0, |(_, status)| *status);

        Ok(ValidationReport {
            status,
            stdout: self.stdout.clone(),
            stderr: self.stderr.clone(),
        })
    }
}
