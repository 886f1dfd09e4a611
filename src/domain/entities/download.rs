//! Download task bookkeeping shared between a loader and its callers.

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;
use uuid::Uuid;

/// Unique identifier of a download task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Creates a fresh random id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Completion state of a download task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskState {
    /// Still transferring.
    #[default]
    Pending,
    /// Completed with content.
    Succeeded,
    /// Completed with an error.
    Failed,
    /// Cancelled before completion.
    Cancelled,
}

/// Hook run once when a pending task is cancelled.
pub type CancelHook = Box<dyn FnOnce() + Send>;

struct TaskInner {
    state: TaskState,
    bytes_written: u64,
    bytes_expected: Option<u64>,
    destination: Option<PathBuf>,
    cancel_hook: Option<CancelHook>,
}

/// One in-flight fetch.
///
/// State changes are serialized by an internal lock, so exactly one of
/// "completed" and "cancelled" wins.
pub struct DownloadTask {
    id: TaskId,
    url: String,
    inner: Mutex<TaskInner>,
}

impl DownloadTask {
    /// Creates a pending task for `url`.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            id: TaskId::new(),
            url: url.into(),
            inner: Mutex::new(TaskInner {
                state: TaskState::Pending,
                bytes_written: 0,
                bytes_expected: None,
                destination: None,
                cancel_hook: None,
            }),
        })
    }

    /// Task id.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Source URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> TaskState {
        self.inner.lock().state
    }

    /// Bytes written so far and bytes expected, if announced.
    #[must_use]
    pub fn progress(&self) -> (u64, Option<u64>) {
        let inner = self.inner.lock();
        (inner.bytes_written, inner.bytes_expected)
    }

    /// Temporary file the content is written to, once created.
    #[must_use]
    pub fn destination(&self) -> Option<PathBuf> {
        self.inner.lock().destination.clone()
    }

    /// Records the temporary destination.
    pub fn set_destination(&self, path: PathBuf) {
        self.inner.lock().destination = Some(path);
    }

    /// Records transfer progress. Written bytes never decrease.
    ///
    /// Returns false when the task is no longer pending.
    pub fn record_progress(&self, written: u64, expected: Option<u64>) -> bool {
        let mut inner = self.inner.lock();
        if inner.state != TaskState::Pending {
            return false;
        }
        inner.bytes_written = inner.bytes_written.max(written);
        if expected.is_some() {
            inner.bytes_expected = expected;
        }
        true
    }

    /// Installs the hook run on acknowledged cancellation. Ignored once the
    /// task is terminal.
    pub fn set_cancel_hook(&self, hook: CancelHook) {
        let mut inner = self.inner.lock();
        if inner.state == TaskState::Pending {
            inner.cancel_hook = Some(hook);
        }
    }

    /// Moves a pending task to its completion state.
    ///
    /// Returns true when the caller now owns delivery of the completion
    /// callback; false when the task was cancelled first.
    pub fn try_finish(&self, succeeded: bool) -> bool {
        let mut inner = self.inner.lock();
        if inner.state != TaskState::Pending {
            return false;
        }
        inner.state = if succeeded {
            TaskState::Succeeded
        } else {
            TaskState::Failed
        };
        inner.cancel_hook = None;
        true
    }

    /// Cancels a pending task.
    ///
    /// Returns true when the cancellation is acknowledged: from then on no
    /// progress or completion callback of this task runs. Returns false when
    /// the task had already completed.
    pub fn cancel(&self) -> bool {
        let hook = {
            let mut inner = self.inner.lock();
            if inner.state != TaskState::Pending {
                return false;
            }
            inner.state = TaskState::Cancelled;
            inner.cancel_hook.take()
        };
        if let Some(hook) = hook {
            hook();
        }
        true
    }
}

impl std::fmt::Debug for DownloadTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("DownloadTask")
            .field("id", &self.id)
            .field("url", &self.url)
            .field("state", &inner.state)
            .field("bytes_written", &inner.bytes_written)
            .field("bytes_expected", &inner.bytes_expected)
            .finish_non_exhaustive()
    }
}

/// Cancellable handle returned by a loader.
#[derive(Debug, Clone)]
pub struct DownloadHandle {
    task: Arc<DownloadTask>,
}

impl DownloadHandle {
    /// Wraps a task.
    #[must_use]
    pub const fn new(task: Arc<DownloadTask>) -> Self {
        Self { task }
    }

    /// Task id.
    #[must_use]
    pub fn id(&self) -> TaskId {
        self.task.id()
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> TaskState {
        self.task.state()
    }

    /// Bytes written and expected.
    #[must_use]
    pub fn progress(&self) -> (u64, Option<u64>) {
        self.task.progress()
    }

    /// See [`DownloadTask::cancel`].
    pub fn cancel(&self) -> bool {
        self.task.cancel()
    }

    /// The underlying task.
    #[must_use]
    pub const fn task(&self) -> &Arc<DownloadTask> {
        &self.task
    }
}

/// Response metadata of a finished download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseInfo {
    /// Final URL.
    pub url: String,
    /// HTTP status code.
    pub status: u16,
    /// MIME type without parameters, lowercased.
    pub mime_type: Option<String>,
    /// Announced length.
    pub content_length: Option<u64>,
}

/// A finished download: the content on disk and its response.
///
/// The file is removed when the location is dropped.
#[derive(Debug)]
pub struct DownloadedContent {
    /// Temporary file holding the body.
    pub location: tempfile::TempPath,
    /// Response metadata.
    pub response: ResponseInfo,
}
