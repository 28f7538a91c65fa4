// SPDX-FileCopyrightText: 2026 Extpack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conformance testing for extensions: compile each test entry in memory and
//! hand the bundle to an external validator.

pub mod runner;
pub mod validator;

pub use runner::{
    surfaced_output, ConformanceRunner, RunSummary, RunnerOptions, SurfacedOutput, TestRecord,
    TestState,
};
pub use validator::ProcessValidator;
