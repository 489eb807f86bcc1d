//! Repository Module
//!
//! The JSON persistence façade over the bucketed store.
//!
//! ## Responsibilities
//! - Validate bucket names and keys
//! - Encode values before writing, decode them after reading
//! - Run every operation as one transaction on a freshly opened store
//! - Surface missing buckets, codec failures and visitor failures as errors

use std::path::Path;

use redb::{ReadableTable, TableHandle};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::codec::{self, Decoder, JsonDecoder};
use crate::config::Config;
use crate::error::{RepoError, Result};
use crate::storage::{self, BucketTable, StoreHandle};

/// JSON repository over a single store file
///
/// ## Handle Lifecycle: open → one transaction → close
///
/// - No database handle outlives a call; each operation opens the file,
///   runs exactly one transaction and drops the handle on every exit path
/// - Write paths (`save`, `delete`, `drop_bucket`) create the file and the
///   bucket lazily
/// - Read paths (`read`, `read_into`, `has_item`, `for_each`, `buckets`)
///   never create anything
///
/// The decoder `D` is fixed at construction and used by `read` and
/// `for_each`; `read_into` always decodes JSON straight into its target.
#[derive(Debug, Clone)]
pub struct Repository<D = JsonDecoder> {
    config: Config,
    decoder: D,
}

impl Repository<JsonDecoder> {
    /// Repository over `path` with default settings
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self::from_config(Config::builder().path(path.as_ref()).build())
    }

    /// Repository with an explicit configuration
    pub fn from_config(config: Config) -> Self {
        Self {
            config,
            decoder: JsonDecoder,
        }
    }

    /// Encode a value as JSON bytes
    pub fn serialize<V: Serialize + ?Sized>(value: &V) -> Result<Vec<u8>> {
        codec::serialize(value)
    }

    /// Decode JSON bytes into a new value
    pub fn deserialize<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
        codec::deserialize(bytes)
    }

    /// Decode JSON bytes over an existing target
    pub fn deserialize_into<T: DeserializeOwned>(bytes: &[u8], target: &mut T) -> Result<()> {
        codec::deserialize_into(bytes, target)
    }
}

impl<D> Repository<D> {
    /// Replace the decoder used by `read` and `for_each`
    pub fn with_decoder<D2>(self, decoder: D2) -> Repository<D2> {
        Repository {
            config: self.config,
            decoder,
        }
    }

    // =========================================================================
    // Write Paths
    // =========================================================================

    /// Insert or overwrite `key` in `bucket`
    ///
    /// The value is encoded before the store is opened, so an unencodable
    /// value leaves the store untouched.
    pub fn save<V: Serialize + ?Sized>(&self, bucket: &str, key: &str, value: &V) -> Result<()> {
        validate(bucket, key)?;
        let bytes = codec::serialize(value)?;

        let handle = StoreHandle::open_or_create(&self.config)?;
        handle.update(|txn| {
            let mut table = txn.open_table(storage::definition(bucket))?;
            table.insert(key, bytes.as_slice())?;
            Ok(())
        })?;

        debug!(bucket, key, bytes = bytes.len(), "saved entry");
        Ok(())
    }

    /// Remove `key` from `bucket`
    ///
    /// Creates the bucket if it does not exist. Returns `true` when an entry
    /// was removed; a missing key is not an error.
    pub fn delete(&self, bucket: &str, key: &str) -> Result<bool> {
        validate(bucket, key)?;

        let handle = StoreHandle::open_or_create(&self.config)?;
        let removed = handle.update(|txn| {
            let mut table = txn.open_table(storage::definition(bucket))?;
            let removed = table.remove(key)?.is_some();
            Ok(removed)
        })?;

        debug!(bucket, key, removed, "deleted entry");
        Ok(removed)
    }

    /// Remove a bucket and every entry in it
    ///
    /// Returns `true` when the bucket existed.
    pub fn drop_bucket(&self, bucket: &str) -> Result<bool> {
        storage::validate_name("bucket name", bucket)?;

        let handle = StoreHandle::open_or_create(&self.config)?;
        let dropped = handle.update(|txn| Ok(txn.delete_table(storage::definition(bucket))?))?;

        debug!(bucket, dropped, "dropped bucket");
        Ok(dropped)
    }

    // =========================================================================
    // Read Paths
    // =========================================================================

    /// Decode `key` from `bucket` straight into `target`
    ///
    /// Returns:
    /// - `Ok(true)` — key found, `target` overwritten
    /// - `Ok(false)` — key absent, `target` left unchanged
    /// - `Err(BucketNotFound)` — bucket (or store file) does not exist
    pub fn read_into<T: DeserializeOwned>(
        &self,
        bucket: &str,
        key: &str,
        target: &mut T,
    ) -> Result<bool> {
        validate(bucket, key)?;

        self.view_bucket(bucket, |table| match table.get(key)? {
            Some(value) => {
                codec::deserialize_into(value.value(), target)?;
                Ok(true)
            }
            None => Ok(false),
        })
    }

    /// Whether `bucket` holds a value for `key`
    ///
    /// A missing bucket or store file answers `false`; nothing is created.
    pub fn has_item(&self, bucket: &str, key: &str) -> Result<bool> {
        validate(bucket, key)?;

        let Some(handle) = StoreHandle::open_existing(&self.config)? else {
            return Ok(false);
        };

        handle.view(|txn| match storage::open_readonly(txn, bucket)? {
            Some(table) => Ok(table.get(key)?.is_some()),
            None => Ok(false),
        })
    }

    /// Names of every bucket in the store, sorted
    pub fn buckets(&self) -> Result<Vec<String>> {
        let Some(handle) = StoreHandle::open_existing(&self.config)? else {
            return Ok(Vec::new());
        };

        let mut names = handle.view(|txn| {
            Ok(txn
                .list_tables()?
                .map(|table| table.name().to_string())
                .collect::<Vec<_>>())
        })?;
        names.sort();
        Ok(names)
    }

    /// Fetch `key` from `bucket` through the configured decoder
    ///
    /// Returns:
    /// - `Ok(Some(value))` — key found and decoded
    /// - `Ok(None)` — key absent
    /// - `Err(BucketNotFound)` — bucket (or store file) does not exist
    pub fn read<T>(&self, bucket: &str, key: &str) -> Result<Option<T>>
    where
        D: Decoder<T>,
    {
        validate(bucket, key)?;

        self.view_bucket(bucket, |table| match table.get(key)? {
            Some(value) => self.decoder.decode(value.value()).map(Some),
            None => Ok(None),
        })
    }

    /// Visit every entry of `bucket` in key order
    ///
    /// Each value goes through the configured decoder before `action` sees
    /// it. Iteration stops at the first decode error or the first error
    /// returned by `action`; that error is returned and later entries are
    /// not visited.
    ///
    /// The store stays locked until iteration ends. Calling this repository
    /// (or any other one on the same file) from inside `action` waits for
    /// that lock: it fails with `LockTimeout` when `open_timeout` is set and
    /// never returns under the default `open_timeout: None`.
    pub fn for_each<T, F, E>(&self, bucket: &str, mut action: F) -> Result<()>
    where
        D: Decoder<T>,
        F: FnMut(&str, T) -> std::result::Result<(), E>,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        storage::validate_name("bucket name", bucket)?;

        let visited = self.view_bucket(bucket, |table| {
            let mut visited = 0usize;
            for entry in table.iter()? {
                let (key, value) = entry?;
                let key = key.value();
                let decoded = self.decoder.decode(value.value())?;

                action(key, decoded).map_err(|e| RepoError::Visitor {
                    key: key.to_string(),
                    source: e.into(),
                })?;
                visited += 1;
            }
            Ok(visited)
        })?;

        debug!(bucket, visited, "iterated bucket");
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the store file path
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the decoder
    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Open the store read-only and run `f` on an existing bucket
    fn view_bucket<R>(
        &self,
        bucket: &str,
        f: impl FnOnce(&BucketTable) -> Result<R>,
    ) -> Result<R> {
        let not_found = || RepoError::BucketNotFound(bucket.to_string());

        let handle = StoreHandle::open_existing(&self.config)?.ok_or_else(not_found)?;
        handle.view(|txn| {
            let table = storage::open_readonly(txn, bucket)?.ok_or_else(not_found)?;
            f(&table)
        })
    }
}

fn validate(bucket: &str, key: &str) -> Result<()> {
    storage::validate_name("bucket name", bucket)?;
    storage::validate_name("key", key)
}
