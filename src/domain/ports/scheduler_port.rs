//! Foreground scheduling port.

/// A unit of work handed to the foreground context.
pub type Job = Box<dyn FnOnce() + Send>;

/// The single UI-affine context that coordinates gallery state.
///
/// Jobs run in posting order.
pub trait ForegroundScheduler: Send + Sync {
    /// Queues a job for the foreground context.
    fn post(&self, job: Job);
}

