//! Durable record schemas used by bot features
//!
//! Each schema is a [`Record`](crate::store::Record) plus a "book" that
//! wraps its [`RecordStore`](crate::store::RecordStore) with get-or-create
//! and upsert operations in the feature's own vocabulary.

pub mod permissions;
pub mod preferences;

pub use permissions::{GuildPermissions, PermissionBook, UserLists};
pub use preferences::{PreferenceBook, VoicePreference};
