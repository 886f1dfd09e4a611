//! Transition state errors.

use thiserror::Error;

/// Misuse of the transition animator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[allow(missing_docs)]
pub enum TransitionError {
    #[error("a transition is already running")]
    AlreadyActive,

    #[error("no transition is running")]
    NotActive,

    #[error("the running transition is not gesture driven")]
    NotInteractive,
}
