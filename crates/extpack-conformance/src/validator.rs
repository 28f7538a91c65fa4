// SPDX-FileCopyrightText: 2026 Extpack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Subprocess validator: pipes a bundle to the conformance CLI on stdin.

use std::process::Stdio;

use async_trait::async_trait;
use extpack_core::{ExtpackError, ValidationReport, Validator};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// Runs `<program> <args...>` with the bundle on stdin and captures its output.
#[derive(Debug, Clone)]
pub struct ProcessValidator {
    program: String,
    args: Vec<String>,
}

impl ProcessValidator {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl Default for ProcessValidator {
    fn default() -> Self {
        Self::new("tanoshi-cli", vec!["test".to_string()])
    }
}

#[async_trait]
impl Validator for ProcessValidator {
    async fn validate(&self, bundle: &str) -> Result<ValidationReport, ExtpackError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ExtpackError::io(format!("failed to run {}", self.program), e))?;

        let stdin = child.stdin.take();
        let bytes = bundle.as_bytes().to_vec();
        let feed = async move {
            if let Some(mut stdin) = stdin {
                // The validator may exit before reading everything.
                if let Err(e) = stdin.write_all(&bytes).await {
                    debug!(error = %e, "validator closed stdin early");
                }
            }
        };

        let ((), output) = tokio::join!(feed, child.wait_with_output());
        let output = output
            .map_err(|e| ExtpackError::io(format!("failed to wait for {}", self.program), e))?;

        Ok(ValidationReport {
            status: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
