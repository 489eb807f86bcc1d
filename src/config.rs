//! Configuration for bucketrepo
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;
use std::time::Duration;

/// Main configuration for a Repository
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Path of the single store file (created on first write)
    pub path: PathBuf,

    /// Durability of committed write transactions
    pub sync_mode: SyncMode,

    /// Page cache size in bytes; `None` keeps the engine default
    pub cache_size: Option<usize>,

    // -------------------------------------------------------------------------
    // Locking Configuration
    // -------------------------------------------------------------------------
    /// How long to wait for the store's file lock; `None` waits forever
    pub open_timeout: Option<Duration>,

    /// Delay between attempts to acquire the file lock
    pub lock_retry_interval: Duration,
}

/// Commit durability
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    /// fsync before commit returns (safest, slowest)
    Immediate,

    /// Commit is persisted by a later durable commit (faster, may be lost on crash)
    Eventual,
}

impl SyncMode {
    pub(crate) fn durability(self) -> redb::Durability {
        match self {
            SyncMode::Immediate => redb::Durability::Immediate,
            SyncMode::Eventual => redb::Durability::Eventual,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./bucketrepo.redb"),
            sync_mode: SyncMode::Immediate,
            cache_size: None,
            open_timeout: None,
            lock_retry_interval: Duration::from_millis(50),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the store file path
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.path = path.into();
        self
    }

    /// Set the commit durability
    pub fn sync_mode(mut self, mode: SyncMode) -> Self {
        self.config.sync_mode = mode;
        self
    }

    /// Set the page cache size (in bytes)
    pub fn cache_size(mut self, bytes: usize) -> Self {
        self.config.cache_size = Some(bytes);
        self
    }

    /// Give up waiting for the file lock after `timeout`
    pub fn open_timeout(mut self, timeout: Duration) -> Self {
        self.config.open_timeout = Some(timeout);
        self
    }

    /// Set the delay between lock attempts
    pub fn lock_retry_interval(mut self, interval: Duration) -> Self {
        self.config.lock_retry_interval = interval;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
