//! Port definition for remote content loading.

use crate::domain::entities::{DownloadHandle, DownloadedContent};
use crate::domain::errors::LoadError;

/// Outcome delivered to a completion callback.
pub type DownloadResult = Result<DownloadedContent, LoadError>;

/// Receives `(bytes_written, bytes_expected)` on the foreground context.
pub type ProgressCallback = Box<dyn FnMut(u64, Option<u64>) + Send>;

/// Receives the outcome exactly once on a background context.
pub type CompletionCallback = Box<dyn FnOnce(DownloadResult) + Send>;

/// Fetches remote content into temporary files.
///
/// Each call produces an independent task. After a handle's `cancel()`
/// returns true, neither callback of that task runs again.
#[cfg_attr(test, mockall::automock)]
pub trait ContentLoaderPort: Send + Sync {
    /// Starts fetching `url`.
    fn download(
        &self,
        url: &str,
        on_progress: ProgressCallback,
        on_complete: CompletionCallback,
    ) -> DownloadHandle;
}
