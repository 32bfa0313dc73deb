//! Bounded cache for derived artifacts
//!
//! Artifacts (synthesized audio, rendered images) are named by a SHA256
//! hash of the inputs that produced them, so the same request always maps
//! to the same file and is generated at most once.
//!
//! # Eviction Model
//!
//! | Event | Effect |
//! |-------|--------|
//! | `exists` | No effect on access time |
//! | `get_or_create` hit | Access time refreshed |
//! | `add` of a cached name | Staged copy dropped, access time refreshed |
//! | `add` over the ceiling | Oldest-accessed entries evicted until it fits |
//! | `add` larger than the ceiling | Rejected, staged copy deleted |

pub mod bounded;
pub mod entry;

pub use bounded::BoundedFileCache;
pub use entry::{format_bytes, mb_to_bytes, CacheEntry, CacheSizeStatus, CacheUsage, Ceiling};
