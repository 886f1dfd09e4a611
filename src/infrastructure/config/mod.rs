//! Application configuration.

pub mod app_config;
/// Command line arguments.
pub mod args;
/// Config file storage.
pub mod storage;

pub use app_config::{AppConfig, GalleryConfig, LoaderConfig, LogLevel, TransitionConfig, UiConfig};
pub use args::{CliArgs, ContentTypeArg};
pub use storage::{ConfigError, StorageManager};
