//! Origin views for presentation transitions.

use crate::domain::entities::{Rect, Size};

/// The view the gallery content appears to come from and return to.
pub trait SourceView {
    /// Frame in gallery container coordinates.
    fn frame(&self) -> Rect;

    /// Size of the image the view shows, used as an aspect hint.
    fn image_size(&self) -> Option<Size> {
        None
    }
}
