// SPDX-FileCopyrightText: 2026 Extpack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for extpack integration tests.
//!
//! Stand-ins for the external collaborators (bundler, module runtime,
//! conformance validator) so pipeline tests run without Node.js or esbuild.
//!
//! # Components
//!
//! - [`MockCompiler`] - writes stub artifacts, fails configured targets
//! - [`StaticLoader`] - returns pre-registered metadata per artifact file name
//! - [`ScriptedValidator`] - returns scripted exit statuses and records bundles
//! - [`fixtures`] - on-disk source trees and metadata builders

pub mod fixtures;
pub mod mock_compiler;
pub mod scripted_validator;
pub mod static_loader;

pub use mock_compiler::MockCompiler;
pub use scripted_validator::ScriptedValidator;
pub use static_loader::StaticLoader;
