//! Domain error types.

mod load_error;
mod transition_error;

pub use load_error::LoadError;
pub use transition_error::TransitionError;
