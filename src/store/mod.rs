//! Record files kept in sync with an in-memory list
//!
//! A [`RecordStore`] owns one JSON file holding an ordered array of records.
//! Every query re-checks the file's modification time first and reloads if
//! someone else wrote it, and every mutation rewrites the whole file through
//! a temporary sibling and a rename.
//!
//! # Consistency Model
//!
//! - Staleness is detected by comparing mtime to the last sync, not by locking
//! - A single `write()` is atomic; a read-modify-write sequence is not
//! - Two uncoordinated writers resolve as last-writer-wins

pub mod file;
pub mod record;

pub use file::{RecordStore, DEFAULT_MAX_FILE_BYTES};
pub use record::Record;
