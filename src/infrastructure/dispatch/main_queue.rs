//! FIFO of jobs drained on the UI thread.

use tokio::sync::mpsc;
use tracing::{trace, warn};

use crate::domain::ports::{ForegroundScheduler, Job};

/// Posting side of a [`MainQueue`]. Cheap to clone and `Send`.
#[derive(Clone)]
pub struct MainQueueHandle {
    tx: mpsc::UnboundedSender<Job>,
}

impl ForegroundScheduler for MainQueueHandle {
    fn post(&self, job: Job) {
        if self.tx.send(job).is_err() {
            warn!("Main queue closed, dropping job");
        }
    }
}

impl std::fmt::Debug for MainQueueHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MainQueueHandle")
            .field("closed", &self.tx.is_closed())
            .finish()
    }
}

/// The foreground context. Owned by the host's event loop, which calls
/// [`MainQueue::run_pending`] every iteration.
pub struct MainQueue {
    tx: mpsc::UnboundedSender<Job>,
    rx: mpsc::UnboundedReceiver<Job>,
}

impl MainQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }

    /// A handle for background producers.
    #[must_use]
    pub fn handle(&self) -> MainQueueHandle {
        MainQueueHandle {
            tx: self.tx.clone(),
        }
    }

    /// Runs every queued job in posting order and returns how many ran.
    pub fn run_pending(&mut self) -> usize {
        let mut count = 0;
        while let Ok(job) = self.rx.try_recv() {
            job();
            count += 1;
        }
        if count > 0 {
            trace!(count, "Ran foreground jobs");
        }
        count
    }

    /// Waits for the next job and runs it, along with anything queued
    /// behind it.
    pub async fn run_next(&mut self) -> usize {
        match self.rx.recv().await {
            Some(job) => {
                job();
                1 + self.run_pending()
            }
            None => 0,
        }
    }

    /// Returns true when nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

impl Default for MainQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MainQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MainQueue")
            .field("queued", &self.rx.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn test_jobs_run_in_posting_order() {
        let mut queue = MainQueue::new();
        let handle = queue.handle();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for n in 0..3 {
            let seen = Arc::clone(&seen);
            handle.post(Box::new(move || seen.lock().push(n)));
        }

        assert!(!queue.is_empty());
        assert_eq!(queue.run_pending(), 3);
        assert_eq!(*seen.lock(), vec![0, 1, 2]);
        assert_eq!(queue.run_pending(), 0);
    }

    #[tokio::test]
    async fn test_run_next_waits_for_background_post() {
        let mut queue = MainQueue::new();
        let handle = queue.handle();
        let seen = Arc::new(Mutex::new(false));
        let flag = Arc::clone(&seen);

        tokio::spawn(async move {
            handle.post(Box::new(move || *flag.lock() = true));
        });

        assert_eq!(queue.run_next().await, 1);
        assert!(*seen.lock());
    }
}
