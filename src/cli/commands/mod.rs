//! CLI command implementations

pub mod cache;
pub mod config;
pub mod perms;
pub mod voice;

pub use cache::execute as cache;
pub use config::execute as config;
pub use perms::execute as perms;
pub use voice::execute as voice;

use crate::error::{HoardError, HoardResult};

/// Run a blocking storage operation off the async executor
pub(crate) async fn blocking<T, F>(operation: F) -> HoardResult<T>
where
    F: FnOnce() -> HoardResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(operation)
        .await
        .map_err(|e| HoardError::Internal(format!("storage task failed: {}", e)))?
}
