//! Store Handle
//!
//! One open database, held for one transaction and released on drop.

use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Instant;

use redb::{Builder, Database, DatabaseError, ReadTransaction, StorageError, WriteTransaction};
use tracing::{debug, trace, warn};

use crate::config::{Config, SyncMode};
use crate::error::Result;
use crate::RepoError;

/// What the caller intends to do with the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    /// Reads only; never creates the store file
    ReadOnly,

    /// Reads and writes; creates the store file if absent
    ReadWrite,
}

/// Scoped handle to the store file
///
/// ## Locking:
/// - The engine holds an exclusive file lock for the lifetime of the handle
///   (readers included; there is no shared lock mode)
/// - A second handle on the same file, from this or another process, waits
///   in `acquire` until the first is dropped
/// - Dropping the handle closes the database and releases the lock
pub struct StoreHandle {
    db: Database,
    path: PathBuf,
    mode: AccessMode,
    sync_mode: SyncMode,
}

impl StoreHandle {
    /// Open the store for writing, creating the file (and its directory) if needed
    pub fn open_or_create(config: &Config) -> Result<Self> {
        if let Some(parent) = config.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        Self::acquire(config, AccessMode::ReadWrite)?
            .map(|db| Self::wrap(db, config, AccessMode::ReadWrite))
            .ok_or_else(|| {
                RepoError::Io(io::Error::new(
                    ErrorKind::NotFound,
                    format!("store file {} vanished while opening", config.path.display()),
                ))
            })
    }

    /// Open an existing store for reading
    ///
    /// Returns:
    /// - `Ok(Some(handle))` — store opened
    /// - `Ok(None)` — store file does not exist (nothing was created)
    pub fn open_existing(config: &Config) -> Result<Option<Self>> {
        Ok(Self::acquire(config, AccessMode::ReadOnly)?
            .map(|db| Self::wrap(db, config, AccessMode::ReadOnly)))
    }

    /// Run one read transaction
    pub fn view<R>(&self, f: impl FnOnce(&ReadTransaction) -> Result<R>) -> Result<R> {
        let txn = self.db.begin_read()?;
        f(&txn)
    }

    /// Run one write transaction
    ///
    /// Commits when `f` succeeds; aborts and returns the error otherwise.
    pub fn update<R>(&self, f: impl FnOnce(&WriteTransaction) -> Result<R>) -> Result<R> {
        let mut txn = self.db.begin_write()?;
        txn.set_durability(self.sync_mode.durability());

        match f(&txn) {
            Ok(value) => {
                txn.commit()?;
                Ok(value)
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "aborting write transaction");
                if let Err(abort_err) = txn.abort() {
                    warn!(path = %self.path.display(), error = %abort_err, "abort failed");
                }
                Err(e)
            }
        }
    }

    /// Path of the open store file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Mode the handle was opened with
    pub fn mode(&self) -> AccessMode {
        self.mode
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn wrap(db: Database, config: &Config, mode: AccessMode) -> Self {
        Self {
            db,
            path: config.path.clone(),
            mode,
            sync_mode: config.sync_mode,
        }
    }

    /// Open the database, waiting out other lock holders
    fn acquire(config: &Config, mode: AccessMode) -> Result<Option<Database>> {
        let path = config.path.as_path();

        if mode == AccessMode::ReadOnly && !path.exists() {
            debug!(path = %path.display(), "store file absent");
            return Ok(None);
        }

        // A writer creates the file before it takes the lock; until then the
        // file is empty and holds no buckets.
        if mode == AccessMode::ReadOnly && is_empty_file(path) {
            debug!(path = %path.display(), "store file empty");
            return Ok(None);
        }

        let mut builder = Builder::new();
        if let Some(bytes) = config.cache_size {
            builder.set_cache_size(bytes);
        }

        let started = Instant::now();
        let mut attempts: u32 = 0;

        loop {
            attempts += 1;

            let opened = match mode {
                AccessMode::ReadWrite => builder.create(path),
                AccessMode::ReadOnly => builder.open(path),
            };

            match opened {
                Ok(db) => {
                    debug!(
                        path = %path.display(),
                        ?mode,
                        attempts,
                        waited_ms = started.elapsed().as_millis() as u64,
                        "store opened"
                    );
                    return Ok(Some(db));
                }
                Err(DatabaseError::DatabaseAlreadyOpen) => {
                    let waited = started.elapsed();
                    if let Some(timeout) = config.open_timeout {
                        if waited >= timeout {
                            return Err(RepoError::LockTimeout {
                                path: path.to_path_buf(),
                                waited,
                            });
                        }
                    }
                    let pause = config
                        .open_timeout
                        .map_or(config.lock_retry_interval, |timeout| {
                            config.lock_retry_interval.min(timeout.saturating_sub(waited))
                        });
                    trace!(path = %path.display(), attempts, "store locked, retrying");
                    thread::sleep(pause);
                }
                // File removed between the existence check and the open
                Err(DatabaseError::Storage(StorageError::Io(e)))
                    if mode == AccessMode::ReadOnly && e.kind() == ErrorKind::NotFound =>
                {
                    debug!(path = %path.display(), "store file absent");
                    return Ok(None);
                }
                // Lock won on a file whose creator has not initialized it yet
                Err(DatabaseError::Storage(StorageError::Io(e)))
                    if mode == AccessMode::ReadOnly
                        && matches!(e.kind(), ErrorKind::InvalidData | ErrorKind::UnexpectedEof)
                        && is_empty_file(path) =>
                {
                    debug!(path = %path.display(), "store file empty");
                    return Ok(None);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

fn is_empty_file(path: &Path) -> bool {
    fs::metadata(path).map(|meta| meta.len() == 0).unwrap_or(false)
}

impl Drop for StoreHandle {
    fn drop(&mut self) {
        trace!(path = %self.path.display(), mode = ?self.mode, "closing store");
    }
}
