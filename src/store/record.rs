//! The record schema contract

use serde::de::DeserializeOwned;
use serde::Serialize;

/// A durable unit of state stored in a [`RecordStore`](super::RecordStore)
///
/// Serde provides the map conversion, so a type that does not serialize
/// cannot be stored. Equality lets the store skip writes that change
/// nothing. On-disk key names are chosen per type with
/// `#[serde(rename = ...)]` and should stay short.
pub trait Record: Serialize + DeserializeOwned + Clone + PartialEq {
    /// Caller-defined identity; at most one record per key
    type Key: PartialEq;

    /// Identity of this record
    fn key(&self) -> Self::Key;
}
