// SPDX-FileCopyrightText: 2026 Extpack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock bundler for deterministic pipeline tests.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use extpack_core::{ArtifactDescriptor, BuildOutput, CompileRequest, Compiler, ExtpackError};

/// A compiler that writes a stub module per target instead of bundling.
///
/// The stub body is `// extpack-test:<name>` followed by an empty default
/// export class, so validators and loaders can tell bundles apart.
#[derive(Clone, Default)]
pub struct MockCompiler {
    failing: HashSet<String>,
    compiled: Arc<Mutex<Vec<String>>>,
}

impl MockCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make compiling `target_name` fail with a diagnostic.
    pub fn failing_on(mut self, target_name: &str) -> Self {
        self.failing.insert(target_name.to_string());
        self
    }

    /// Names of every target compile was called for, in call order.
    pub async fn compiled(&self) -> Vec<String> {
        self.compiled.lock().await.clone()
    }

    /// Stub module text written for `target_name`.
    pub fn stub_body(target_name: &str) -> String {
        format!("// extpack-test:{target_name}\nexport default class {{}}\n")
    }
}

#[async_trait]
impl Compiler for MockCompiler {
    async fn compile(&self, request: CompileRequest<'_>) -> Result<BuildOutput, ExtpackError> {
        let name = request.target.name.clone();
        self.compiled.lock().await.push(name.clone());

        if self.failing.contains(&name) {
            return Err(ExtpackError::Compile {
                target: name,
                diagnostics: vec!["mock: forced failure".to_string()],
            });
        }

        let path = request.options.output_path();
        request
            .output
            .write(&path, Self::stub_body(&name).into_bytes())
            .await?;

        Ok(BuildOutput {
            artifacts: vec![ArtifactDescriptor {
                name: request.options.dist_entry.clone(),
                path,
            }],
            build_time: Duration::from_millis(1),
        })
    }
}
