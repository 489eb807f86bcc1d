//! Storage Module
//!
//! Scoped access to the single-file embedded store.
//!
//! ## Responsibilities
//! - Open the store file for exactly one transaction, then close it
//! - Wait for the engine's exclusive file lock (optionally bounded)
//! - Commit write transactions on success, abort them on error
//! - Map bucket names onto engine tables
//!
//! ## File Layout
//! ```text
//! ┌────────────────────────────────────────┐
//! │ store.redb (one file, one lock)        │
//! │ ┌────────────────────────────────────┐ │
//! │ │ table "Bucket1"                    │ │
//! │ │   "Item1" → {"text":"Hello",...}   │ │
//! │ │   "Item2" → {"text":"Goodbye",...} │ │
//! │ └────────────────────────────────────┘ │
//! │ ┌────────────────────────────────────┐ │
//! │ │ table "Bucket2"                    │ │
//! │ │   ...                              │ │
//! │ └────────────────────────────────────┘ │
//! └────────────────────────────────────────┘
//! ```
//! Keys are UTF-8 strings kept in byte order; values are JSON text.

mod bucket;
mod handle;

pub use bucket::validate_name;
pub(crate) use bucket::{definition, open_readonly, BucketTable};
pub use handle::{AccessMode, StoreHandle};
