//! Foreground dispatch.

pub mod main_queue;

pub use main_queue::{MainQueue, MainQueueHandle};
