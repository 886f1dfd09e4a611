//! UI screens.

mod app;
mod gallery_screen;
mod host;

pub use app::App;
pub use gallery_screen::{GalleryScreen, content_container, to_cells};
pub use host::{AppDelegate, RowView, UrlListSource};
