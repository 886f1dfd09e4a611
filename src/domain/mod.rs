//! Domain layer with gallery entities, errors and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;

pub use entities::{ContentType, GalleryItem, ItemRef, MediaItem};
pub use errors::{LoadError, TransitionError};
pub use ports::{ContentLoaderPort, GalleryDataSource, GalleryDelegate};
