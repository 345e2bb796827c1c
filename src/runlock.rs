//! Run lock
//!
//! Transfer resource names are unique per timestamp and pid, but two
//! portside invocations against the same project on one host would still
//! contend for remote state. An advisory file lock keeps runs for one
//! project sequential; the lock releases when the guard drops, including
//! on panics and early exits.

use std::fs::{File, OpenOptions};
use std::path::PathBuf;

use fs2::FileExt;

use crate::error::{PortsideError, PortsideResult};

/// Held for the duration of one invocation.
#[derive(Debug)]
pub struct RunLock {
    _file: File,
    path: PathBuf,
}

impl RunLock {
    /// Acquire the per-project lock, failing fast if another run holds it.
    pub fn acquire(project: &str) -> PortsideResult<Self> {
        let path = std::env::temp_dir().join(format!("portside-{project}.lock"));
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&path)?;

        file.try_lock_exclusive()
            .map_err(|_| PortsideError::AlreadyRunning { path: path.clone() })?;

        Ok(Self { _file: file, path })
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}
