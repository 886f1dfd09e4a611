//! HTTP implementation of the content loader port.
//!
//! Each download runs as its own tokio task that streams the body into a
//! temporary file. Progress is posted to the foreground scheduler; the
//! completion callback runs on the blocking pool so it may decode.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use parking_lot::Mutex;
use sha2::{Digest, Sha256};
use tokio::io::AsyncWriteExt;
use tokio::runtime::Handle;
use tokio::task::AbortHandle;
use tracing::{debug, trace, warn};

use crate::domain::entities::{
    DownloadHandle, DownloadTask, DownloadedContent, ResponseInfo, TaskId, TaskState,
};
use crate::domain::errors::LoadError;
use crate::domain::ports::{
    CompletionCallback, ContentLoaderPort, DownloadResult, ForegroundScheduler, ProgressCallback,
};

const TEMP_PREFIX_LEN: usize = 16;

/// Configuration for the content loader.
#[derive(Debug, Clone)]
pub struct ContentLoaderConfig {
    /// Whole-request timeout.
    pub timeout: Duration,
    /// Connect timeout.
    pub connect_timeout: Duration,
    /// `User-Agent` header.
    pub user_agent: String,
    /// Directory downloads are written to.
    pub temp_dir: PathBuf,
}

impl Default for ContentLoaderConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: format!("oxigallery/{}", crate::VERSION),
            temp_dir: std::env::temp_dir().join("oxigallery"),
        }
    }
}

type Registry = Arc<Mutex<HashMap<TaskId, AbortHandle>>>;

/// Fetches media over HTTP(S).
pub struct ContentLoader {
    http_client: reqwest::Client,
    config: ContentLoaderConfig,
    scheduler: Arc<dyn ForegroundScheduler>,
    runtime: Handle,
    tasks: Registry,
}

impl ContentLoader {
    /// Creates a loader bound to the current tokio runtime.
    ///
    /// # Errors
    /// Returns error if called outside a runtime or the HTTP client cannot
    /// be built.
    pub fn new(
        config: ContentLoaderConfig,
        scheduler: Arc<dyn ForegroundScheduler>,
    ) -> Result<Self, LoadError> {
        let runtime = Handle::try_current()
            .map_err(|e| LoadError::io(format!("No async runtime for loader: {e}")))?;

        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| LoadError::network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            config,
            scheduler,
            runtime,
            tasks: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &ContentLoaderConfig {
        &self.config
    }

    /// Number of downloads still transferring.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.tasks.lock().len()
    }

    /// Aborts every running download without delivering callbacks.
    pub fn cancel_all(&self) {
        let drained: Vec<_> = self.tasks.lock().drain().collect();
        if !drained.is_empty() {
            debug!(count = drained.len(), "Cancelled all downloads");
        }
        for (_, abort) in drained {
            abort.abort();
        }
    }
}

impl ContentLoaderPort for ContentLoader {
    fn download(
        &self,
        url: &str,
        on_progress: ProgressCallback,
        on_complete: CompletionCallback,
    ) -> DownloadHandle {
        let task = DownloadTask::new(url);
        let fetch = Fetch {
            http_client: self.http_client.clone(),
            temp_dir: self.config.temp_dir.clone(),
            scheduler: Arc::clone(&self.scheduler),
            tasks: Arc::clone(&self.tasks),
            task: Arc::clone(&task),
            on_progress: Arc::new(Mutex::new(on_progress)),
        };

        {
            // Held across spawn so the task's own removal lands after insert.
            let mut tasks = self.tasks.lock();
            let join = self.runtime.spawn(fetch.run(on_complete));
            tasks.insert(task.id(), join.abort_handle());
        }

        let registry = Arc::clone(&self.tasks);
        let id = task.id();
        task.set_cancel_hook(Box::new(move || {
            if let Some(abort) = registry.lock().remove(&id) {
                abort.abort();
            }
            debug!(task = %id, "Download cancelled");
        }));

        trace!(task = %id, url = %url, "Download started");
        DownloadHandle::new(task)
    }
}

impl std::fmt::Debug for ContentLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentLoader")
            .field("config", &self.config)
            .field("in_flight", &self.in_flight())
            .finish_non_exhaustive()
    }
}

/// State one download task works with.
struct Fetch {
    http_client: reqwest::Client,
    temp_dir: PathBuf,
    scheduler: Arc<dyn ForegroundScheduler>,
    tasks: Registry,
    task: Arc<DownloadTask>,
    on_progress: Arc<Mutex<ProgressCallback>>,
}

impl Fetch {
    async fn run(self, on_complete: CompletionCallback) {
        let result = self.transfer().await;
        self.tasks.lock().remove(&self.task.id());

        if !self.task.try_finish(result.is_ok()) {
            trace!(task = %self.task.id(), "Completion dropped after cancel");
            return;
        }

        match &result {
            Ok(content) => debug!(
                task = %self.task.id(),
                mime = ?content.response.mime_type,
                "Download finished"
            ),
            Err(e) => warn!(task = %self.task.id(), url = %self.task.url(), error = %e, "Download failed"),
        }

        tokio::task::spawn_blocking(move || on_complete(result));
    }

    async fn transfer(&self) -> DownloadResult {
        let url = self.task.url();
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| LoadError::network(format!("Request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::http(
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown"),
            ));
        }

        let mime_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(essence);
        let expected = response.content_length();
        let final_url = response.url().to_string();

        tokio::fs::create_dir_all(&self.temp_dir)
            .await
            .map_err(|e| LoadError::io(format!("Failed to create download dir: {e}")))?;
        let (file, location) = tempfile::Builder::new()
            .prefix(&temp_prefix(url))
            .tempfile_in(&self.temp_dir)
            .map_err(|e| LoadError::io(format!("Failed to create download file: {e}")))?
            .into_parts();
        self.task.set_destination(location.to_path_buf());

        let mut file = tokio::fs::File::from_std(file);
        let mut body = response.bytes_stream();
        let mut written = 0u64;
        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(|e| LoadError::network(format!("Failed to read body: {e}")))?;
            file.write_all(&chunk)
                .await
                .map_err(|e| LoadError::io(format!("Failed to write download: {e}")))?;
            written += chunk.len() as u64;
            self.report_progress(written, expected);
        }
        file.flush()
            .await
            .map_err(|e| LoadError::io(format!("Failed to write download: {e}")))?;

        Ok(DownloadedContent {
            location,
            response: ResponseInfo {
                url: final_url,
                status: status.as_u16(),
                mime_type,
                content_length: expected,
            },
        })
    }

    fn report_progress(&self, written: u64, expected: Option<u64>) {
        if !self.task.record_progress(written, expected) {
            return;
        }
        let task = Arc::clone(&self.task);
        let callback = Arc::clone(&self.on_progress);
        self.scheduler.post(Box::new(move || {
            if task.state() != TaskState::Cancelled {
                (callback.lock())(written, expected);
            }
        }));
    }
}

/// MIME type without parameters, lowercased.
fn essence(header: &str) -> Option<String> {
    let essence = header.split(';').next()?.trim();
    (!essence.is_empty()).then(|| essence.to_ascii_lowercase())
}

fn temp_prefix(url: &str) -> String {
    let digest = hex::encode(Sha256::digest(url.as_bytes()));
    format!("{}-", &digest[..TEMP_PREFIX_LEN])
}
