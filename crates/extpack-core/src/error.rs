// SPDX-FileCopyrightText: 2026 Extpack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the extpack pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// The primary error type used across all pipeline stages and capability traits.
#[derive(Debug, Error)]
pub enum ExtpackError {
    /// A source or output directory that the pipeline must scan does not exist.
    #[error("directory not found: {}", path.display())]
    DirectoryNotFound { path: PathBuf },

    /// A directory exists but could not be listed.
    #[error("failed to read directory {}: {source}", path.display())]
    Discovery {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The bundler reported diagnostics for one build target.
    #[error("failed to compile {target}: {}", diagnostics.join("; "))]
    Compile {
        target: String,
        diagnostics: Vec<String>,
    },

    /// A compiled artifact could not be loaded or did not declare the source contract.
    #[error("failed to introspect {artifact}: {reason}")]
    Introspection { artifact: String, reason: String },

    /// The conformance validator rejected a test bundle.
    #[error("validation of {test} failed with exit status {status}")]
    Validation { test: String, status: i32 },

    /// The catalog manifest could not be written.
    #[error("failed to write manifest {}: {source}", path.display())]
    ManifestWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Configuration errors (invalid values, missing programs).
    #[error("configuration error: {0}")]
    Config(String),

    /// Filesystem or process errors outside the categories above.
    #[error("{context}: {source}")]
    Io {
        context: String,
        source: std::io::Error,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ExtpackError {
    /// Wrap an I/O error with a short description of what was being attempted.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Process exit status to report for this error.
    ///
    /// A validator failure propagates the validator's own status so CI sees
    /// the same code; everything else exits with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Validation { status, .. } if *status != 0 => *status,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_error_lists_diagnostics() {
        let err = ExtpackError::Compile {
            target: "mangadex".into(),
            diagnostics: vec!["Could not resolve \"x\"".into(), "Unexpected }".into()],
        };
        assert_eq!(
            err.to_string(),
            "failed to compile mangadex: Could not resolve \"x\"; Unexpected }"
        );
    }

    #[test]
    fn validation_exit_code_is_propagated() {
        let err = ExtpackError::Validation {
            test: "source.test.ts".into(),
            status: 3,
        };
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn other_errors_exit_with_one() {
        let err = ExtpackError::DirectoryNotFound {
            path: PathBuf::from("./src"),
        };
        assert_eq!(err.exit_code(), 1);
        assert_eq!(ExtpackError::Internal("x".into()).exit_code(), 1);
    }

    #[test]
    fn io_helper_keeps_context() {
        let err = ExtpackError::io("failed to spawn node", std::io::Error::other("boom"));
        assert_eq!(err.to_string(), "failed to spawn node: boom");
    }
}
