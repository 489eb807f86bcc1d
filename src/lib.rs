//! # bucketrepo
//!
//! A JSON repository over an embedded, single-file key-value store with:
//! - Named buckets holding sorted string keys
//! - One transaction per call; no handle kept open between calls
//! - Pluggable decoding of stored values
//! - Blocking wait on the store's file lock, optionally bounded
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Repository                            │
//! │   save / delete / drop_bucket   read / read_into / has_item  │
//! │                                 for_each / buckets           │
//! └──────────────┬───────────────────────────────┬──────────────┘
//!                │                               │
//!                ▼                               ▼
//!         ┌─────────────┐                 ┌─────────────┐
//!         │    Codec    │                 │   Decoder   │
//!         │   (JSON)    │                 │ (injected)  │
//!         └──────┬──────┘                 └──────┬──────┘
//!                │                               │
//!                └───────────────┬───────────────┘
//!                                ▼
//!                        ┌─────────────┐
//!                        │ StoreHandle │
//!                        │ open → txn  │
//!                        │   → close   │
//!                        └──────┬──────┘
//!                               ▼
//!                        ┌─────────────┐
//!                        │ store file  │
//!                        │   (redb)    │
//!                        └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use bucketrepo::Repository;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize, Default)]
//! struct Sample {
//!     text: String,
//!     number: i64,
//! }
//!
//! # fn main() -> bucketrepo::Result<()> {
//! let repo = Repository::new("samples.redb");
//! repo.save("Bucket1", "Item1", &Sample { text: "Hello".into(), number: 42 })?;
//!
//! let mut sample = Sample::default();
//! let found = repo.read_into("Bucket1", "Item1", &mut sample)?;
//! assert!(found);
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod codec;
pub mod storage;
pub mod repository;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{RepoError, Result};
pub use config::{Config, SyncMode};
pub use codec::{Decoder, JsonDecoder};
pub use repository::Repository;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of bucketrepo
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
