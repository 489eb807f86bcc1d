//! Bucket naming
//!
//! A bucket is an engine table keyed by `&str` with raw byte values.

use redb::{ReadOnlyTable, ReadTransaction, TableDefinition, TableError};

use crate::error::{RepoError, Result};

/// Table definition shared by every bucket
pub(crate) type BucketDef<'a> = TableDefinition<'a, &'static str, &'static [u8]>;

/// A bucket opened for reading
pub(crate) type BucketTable = ReadOnlyTable<&'static str, &'static [u8]>;

pub(crate) fn definition(name: &str) -> BucketDef<'_> {
    TableDefinition::new(name)
}

/// Reject empty bucket names and keys before touching the store
///
/// `kind` names the rejected argument in the error message.
pub fn validate_name(kind: &str, name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(RepoError::InvalidName(format!("{} must not be empty", kind)));
    }
    Ok(())
}

/// Open a bucket inside a read transaction
///
/// Returns:
/// - `Ok(Some(table))` — bucket exists
/// - `Ok(None)` — bucket was never created
pub(crate) fn open_readonly(
    txn: &ReadTransaction,
    name: &str,
) -> Result<Option<BucketTable>> {
    match txn.open_table(definition(name)) {
        Ok(table) => Ok(Some(table)),
        Err(TableError::TableDoesNotExist(_)) => Ok(None),
        Err(e) => Err(e.into()),
    }
}
