//! Remote content loading.

pub mod http_loader;

pub use http_loader::{ContentLoader, ContentLoaderConfig};
