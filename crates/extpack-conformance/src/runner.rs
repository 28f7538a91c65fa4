// SPDX-FileCopyrightText: 2026 Extpack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conformance test loop.
//!
//! Each test entry is bundled into memory and its text piped to the
//! validator. The first compile failure or non-zero validator status ends the
//! run; later tests are neither compiled nor validated. One worker pool and
//! one in-memory filesystem serve the whole run. Both are torn down once,
//! whichever way the run finishes.

use std::path::PathBuf;
use std::time::Instant;

use colored::Colorize;
use extpack_bundler::{MemoryFs, WorkerPool};
use extpack_core::{
    BuildTarget, CompileOptions, CompileRequest, Compiler, ExtpackError, OutputFs,
    ValidationReport, Validator,
};
use strum::Display;
use tracing::{debug, info};

/// Lifecycle of one conformance test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum TestState {
    Discovered,
    Compiling,
    CompileFailed,
    Compiled,
    Validating,
    Passed,
    Failed,
}

impl TestState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::CompileFailed | Self::Passed | Self::Failed)
    }
}

/// Final state of one test in a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestRecord {
    pub name: String,
    pub state: TestState,
}

/// Per-test states at the end of a run, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub tests: Vec<TestRecord>,
}

impl RunSummary {
    fn new(tests: &[BuildTarget]) -> Self {
        Self {
            tests: tests
                .iter()
                .map(|t| TestRecord {
                    name: t.name.clone(),
                    state: TestState::Discovered,
                })
                .collect(),
        }
    }

    fn set(&mut self, index: usize, state: TestState) {
        if let Some(record) = self.tests.get_mut(index) {
            debug!(test = %record.name, from = %record.state, to = %state, "test state");
            record.state = state;
        }
    }

    pub fn state_of(&self, name: &str) -> Option<TestState> {
        self.tests.iter().find(|t| t.name == name).map(|t| t.state)
    }

    pub fn passed(&self) -> usize {
        self.tests
            .iter()
            .filter(|t| t.state == TestState::Passed)
            .count()
    }
}

/// Runner settings.
#[derive(Debug, Clone)]
pub struct RunnerOptions {
    /// Print validator stdout as well as stderr.
    pub nocapture: bool,
    /// Virtual directory bundles are placed under in memory.
    pub dist_dir: PathBuf,
    /// Parent of the pool's scratch directory.
    pub cache_dir: PathBuf,
    pub workers: usize,
}

/// Validator output to show the user: stderr always, stdout on request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfacedOutput<'a> {
    pub stderr: &'a str,
    pub stdout: Option<&'a str>,
}

pub fn surfaced_output(report: &ValidationReport, nocapture: bool) -> SurfacedOutput<'_> {
    SurfacedOutput {
        stderr: &report.stderr,
        stdout: nocapture.then_some(report.stdout.as_str()),
    }
}

pub struct ConformanceRunner<C, V> {
    compiler: C,
    validator: V,
    options: RunnerOptions,
}

impl<C: Compiler, V: Validator> ConformanceRunner<C, V> {
    pub fn new(compiler: C, validator: V, options: RunnerOptions) -> Self {
        Self {
            compiler,
            validator,
            options,
        }
    }

    /// Run every test, stopping at the first failure.
    pub async fn run(&self, tests: &[BuildTarget]) -> Result<RunSummary, ExtpackError> {
        let (summary, outcome) = self.run_collect(tests).await;
        outcome.map(|()| summary)
    }

    /// Like [`run`](Self::run) but keeps the summary when the run fails.
    pub async fn run_collect(
        &self,
        tests: &[BuildTarget],
    ) -> (RunSummary, Result<(), ExtpackError>) {
        let mut summary = RunSummary::new(tests);

        let pool = match WorkerPool::new(self.options.workers, &self.options.cache_dir) {
            Ok(pool) => pool,
            Err(e) => return (summary, Err(e)),
        };
        let output = MemoryFs::new();

        let outcome = self.execute(tests, &pool, &output, &mut summary).await;
        pool.end();
        let released = output.clear().await;
        debug!(released, "released in-memory bundles");

        info!(
            total = tests.len(),
            passed = summary.passed(),
            ok = outcome.is_ok(),
            "conformance run finished"
        );
        (summary, outcome)
    }

    async fn execute(
        &self,
        tests: &[BuildTarget],
        pool: &WorkerPool,
        output: &MemoryFs,
        summary: &mut RunSummary,
    ) -> Result<(), ExtpackError> {
        for (index, test) in tests.iter().enumerate() {
            let started = Instant::now();
            summary.set(index, TestState::Compiling);

            let options =
                CompileOptions::library(test, &self.options.dist_dir, &self.options.cache_dir);
            let built = {
                let lease = pool.acquire().await?;
                self.compiler
                    .compile(CompileRequest {
                        target: test,
                        options: &options,
                        output,
                        staging: lease.staging(),
                    })
                    .await
            };
            let built = match built {
                Ok(built) => built,
                Err(e) => {
                    summary.set(index, TestState::CompileFailed);
                    eprintln!("{} {}", "✗".red(), test.name);
                    return Err(e);
                }
            };
            summary.set(index, TestState::Compiled);

            for artifact in &built.artifacts {
                summary.set(index, TestState::Validating);
                let bundle = output.read_to_string(&artifact.path).await?;
                let report = self.validator.validate(&bundle).await.inspect_err(|_| {
                    summary.set(index, TestState::Failed);
                })?;

                let shown = surfaced_output(&report, self.options.nocapture);
                if let Some(stdout) = shown.stdout {
                    print!("{stdout}");
                }
                eprint!("{}", shown.stderr);

                if !report.passed() {
                    summary.set(index, TestState::Failed);
                    eprintln!("{} {}", "✗".red(), test.name);
                    return Err(ExtpackError::Validation {
                        test: test.name.clone(),
                        status: report.status,
                    });
                }
            }

            summary.set(index, TestState::Passed);
            println!("{} {}", "✓".green(), test.name);
            info!(
                test = %test.name,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "test passed"
            );
        }
        Ok(())
    }
}
