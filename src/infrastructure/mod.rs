//! Infrastructure layer with adapters for the gallery ports.

/// Application configuration.
pub mod config;
/// Foreground job queue.
pub mod dispatch;
/// HTTP content loader.
pub mod loader;

pub use config::{AppConfig, CliArgs, ConfigError, ContentTypeArg, LogLevel, StorageManager};
pub use dispatch::{MainQueue, MainQueueHandle};
pub use loader::{ContentLoader, ContentLoaderConfig};
