// SPDX-FileCopyrightText: 2026 Extpack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Build side of the extpack pipeline.
//!
//! Finds extension entry points, turns each into a self-contained ES module
//! through esbuild, and places the result on disk or in memory.

pub mod compile;
pub mod discover;
pub mod outfs;
pub mod pool;

pub use compile::{esbuild_args, parse_diagnostics, EsbuildCompiler};
pub use discover::{discover_targets, discover_test_entries, project_name, FALLBACK_ROOT_NAME};
pub use outfs::{DiskFs, MemoryFs};
pub use pool::{PoolLease, WorkerPool};
