//! Domain entities.

mod content;
mod content_type;
mod content_view;
mod download;
mod geometry;
mod item;

pub use content::{AnimatedImage, AnimationFrame, ContentData, MovieClip, MovieSource};
pub use content_type::ContentType;
pub use content_view::{ContentView, Displayed, ZoomState};
pub use download::{
    CancelHook, DownloadHandle, DownloadTask, DownloadedContent, ResponseInfo, TaskId, TaskState,
};
pub use geometry::{Point, Rect, Size, destination_frame_for_source_frame, lerp};
pub use item::{
    AttributedText, GalleryItem, ItemRef, MediaItem, TextLink, WeakItemRef, same_item, weak_is,
};
