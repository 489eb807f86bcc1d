//! Codec Module
//!
//! JSON encoding of stored values and the decoding capability used by
//! `Repository::read` and `Repository::for_each`.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{RepoError, Result};

/// Encode a value as JSON bytes
pub fn serialize<V: Serialize + ?Sized>(value: &V) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(RepoError::Serialization)
}

/// Decode JSON bytes into a new value
pub fn deserialize<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(RepoError::Deserialization)
}

/// Decode JSON bytes over an existing target
///
/// The target is only replaced when decoding succeeds.
pub fn deserialize_into<T: DeserializeOwned>(bytes: &[u8], target: &mut T) -> Result<()> {
    *target = deserialize(bytes)?;
    Ok(())
}

/// Turns stored bytes into a caller-defined type
///
/// Any `Fn(&[u8]) -> Result<T>` closure is a decoder, so ad-hoc projections
/// do not need a named type.
pub trait Decoder<T> {
    fn decode(&self, bytes: &[u8]) -> Result<T>;
}

impl<T, F> Decoder<T> for F
where
    F: Fn(&[u8]) -> Result<T>,
{
    fn decode(&self, bytes: &[u8]) -> Result<T> {
        self(bytes)
    }
}

/// Default decoder: JSON into any deserializable type
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDecoder;

impl<T: DeserializeOwned> Decoder<T> for JsonDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<T> {
        deserialize(bytes)
    }
}
