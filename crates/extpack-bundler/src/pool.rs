// SPDX-FileCopyrightText: 2026 Extpack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded pool of compile workers.
//!
//! Each lease gets its own staging directory inside a scratch directory the
//! pool owns under the cache dir. [`WorkerPool::end`] must be called once the
//! pool is no longer needed; it closes the pool to new leases and removes the
//! scratch directory.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use extpack_core::ExtpackError;
use tempfile::TempDir;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::debug;

/// A pool of at most `workers` concurrent compile slots.
#[derive(Debug)]
pub struct WorkerPool {
    permits: Arc<Semaphore>,
    scratch: Mutex<Option<TempDir>>,
    scratch_path: PathBuf,
    ended: AtomicBool,
    workers: usize,
}

/// A held worker slot with a private staging directory.
///
/// Dropping the lease frees the slot and deletes its staging directory.
#[derive(Debug)]
pub struct PoolLease {
    staging: TempDir,
    _permit: OwnedSemaphorePermit,
}

impl PoolLease {
    pub fn staging(&self) -> &Path {
        self.staging.path()
    }
}

impl WorkerPool {
    /// Create a pool with `workers` slots, scratch space under `cache_dir`.
    pub fn new(workers: usize, cache_dir: &Path) -> Result<Self, ExtpackError> {
        let workers = workers.max(1);
        std::fs::create_dir_all(cache_dir).map_err(|e| {
            ExtpackError::io(format!("failed to create cache dir {}", cache_dir.display()), e)
        })?;
        let scratch = tempfile::Builder::new()
            .prefix("pool-")
            .tempdir_in(cache_dir)
            .map_err(|e| ExtpackError::io("failed to create worker scratch dir", e))?;
        let scratch_path = scratch.path().to_path_buf();

        debug!(workers, scratch = %scratch_path.display(), "worker pool started");

        Ok(Self {
            permits: Arc::new(Semaphore::new(workers)),
            scratch: Mutex::new(Some(scratch)),
            scratch_path,
            ended: AtomicBool::new(false),
            workers,
        })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn is_ended(&self) -> bool {
        self.ended.load(Ordering::SeqCst)
    }

    /// Wait for a free slot.
    pub async fn acquire(&self) -> Result<PoolLease, ExtpackError> {
        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|_| ExtpackError::Internal("worker pool has ended".to_string()))?;

        if self.is_ended() {
            return Err(ExtpackError::Internal("worker pool has ended".to_string()));
        }

        let staging = tempfile::Builder::new()
            .prefix("job-")
            .tempdir_in(&self.scratch_path)
            .map_err(|e| ExtpackError::io("failed to create staging dir", e))?;

        Ok(PoolLease {
            staging,
            _permit: permit,
        })
    }

    /// Shut the pool down. Safe to call more than once.
    pub fn end(&self) {
        if self.ended.swap(true, Ordering::SeqCst) {
            return;
        }
        self.permits.close();

        let scratch = match self.scratch.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(dir) = scratch
            && let Err(e) = dir.close()
        {
            debug!(error = %e, "failed to remove worker scratch dir");
        }
        debug!("worker pool ended");
    }
}
