//! State model of an item's content view.
//!
//! The concrete renderer (image view, animation view, movie view) reads this
//! model; nothing here draws.

use std::sync::Arc;

use super::content::ContentData;
use super::content_type::ContentType;
use super::geometry::Size;

/// Smallest zoom scale difference still treated as "zoomed out".
const ZOOM_EPSILON: f64 = 0.01;

/// What the view currently shows.
#[derive(Debug, Clone, Default)]
pub enum Displayed {
    /// Empty surface.
    #[default]
    Nothing,
    /// The item's placeholder image.
    Placeholder(Arc<image::DynamicImage>),
    /// The full content.
    Content(ContentData),
}

/// Zoom state of a zoom/pan content view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomState {
    scale: f64,
    min_scale: f64,
    max_scale: f64,
}

impl Default for ZoomState {
    fn default() -> Self {
        Self {
            scale: 1.0,
            min_scale: 1.0,
            max_scale: 3.0,
        }
    }
}

impl ZoomState {
    /// Current scale.
    #[must_use]
    pub const fn scale(&self) -> f64 {
        self.scale
    }

    /// Sets the scale, clamped to the allowed range.
    pub fn set_scale(&mut self, scale: f64) {
        self.scale = scale.clamp(self.min_scale, self.max_scale);
    }

    /// Back to the resting scale.
    pub fn reset(&mut self) {
        self.scale = self.min_scale;
    }

    /// Returns true at the resting scale.
    #[must_use]
    pub fn is_zoomed_out(&self) -> bool {
        (self.scale - self.min_scale).abs() < ZOOM_EPSILON
    }
}

/// The content view of one item.
#[derive(Debug, Clone, Default)]
pub struct ContentView {
    displayed: Displayed,
    activity: bool,
    progress: Option<f32>,
    failed: bool,
    playing: bool,
    zoom: ZoomState,
}

impl ContentView {
    /// Creates an empty view.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// What is shown.
    #[must_use]
    pub const fn displayed(&self) -> &Displayed {
        &self.displayed
    }

    /// Returns true while the placeholder is shown.
    #[must_use]
    pub const fn shows_placeholder(&self) -> bool {
        matches!(self.displayed, Displayed::Placeholder(_))
    }

    /// Returns true once full content is shown.
    #[must_use]
    pub const fn shows_content(&self) -> bool {
        matches!(self.displayed, Displayed::Content(_))
    }

    /// Shown content, if any.
    #[must_use]
    pub const fn content(&self) -> Option<&ContentData> {
        match &self.displayed {
            Displayed::Content(data) => Some(data),
            _ => None,
        }
    }

    /// Returns true when an activity indicator replaces a missing placeholder.
    #[must_use]
    pub const fn shows_activity(&self) -> bool {
        self.activity
    }

    /// Download progress in [0, 1] while loading with a known length.
    #[must_use]
    pub const fn progress(&self) -> Option<f32> {
        self.progress
    }

    /// Returns true after a failed load.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        self.failed
    }

    /// Returns true while autoplaying content plays.
    #[must_use]
    pub const fn is_playing(&self) -> bool {
        self.playing
    }

    /// Zoom state.
    #[must_use]
    pub const fn zoom(&self) -> &ZoomState {
        &self.zoom
    }

    /// Sets the zoom scale. Ignored for content that does not zoom.
    pub fn set_zoom_scale(&mut self, scale: f64) {
        if self.should_zoom_and_pan() {
            self.zoom.set_scale(scale);
        }
    }

    /// Returns true at the resting zoom scale.
    #[must_use]
    pub fn is_zoomed_out(&self) -> bool {
        self.zoom.is_zoomed_out()
    }

    /// Movies handle their own gestures.
    #[must_use]
    pub fn should_zoom_and_pan(&self) -> bool {
        !self
            .content()
            .is_some_and(|data| data.content_type().is_movie())
    }

    /// Movies with controls hide the caption footer.
    #[must_use]
    pub fn prefers_footer_hidden(&self) -> bool {
        self.content()
            .is_some_and(|data| data.content_type() == ContentType::Movie)
    }

    /// Size of what is shown, if it has an intrinsic one.
    #[must_use]
    pub fn intrinsic_size(&self) -> Option<Size> {
        match &self.displayed {
            Displayed::Nothing => None,
            Displayed::Placeholder(image) => Some((image.width(), image.height()).into()),
            Displayed::Content(data) => data.pixel_size(),
        }
    }

    /// Enters the loading look: the placeholder if there is one, otherwise
    /// an activity indicator.
    pub fn show_loading(&mut self, placeholder: Option<Arc<image::DynamicImage>>) {
        self.failed = false;
        self.progress = None;
        self.zoom.reset();
        match placeholder {
            Some(image) => {
                self.displayed = Displayed::Placeholder(image);
                self.activity = false;
            }
            None => {
                self.displayed = Displayed::Nothing;
                self.activity = true;
            }
        }
    }

    /// Updates download progress.
    #[allow(clippy::cast_precision_loss)]
    pub fn set_progress(&mut self, written: u64, expected: Option<u64>) {
        self.progress = match expected {
            Some(total) if total > 0 => Some((written as f32 / total as f32).clamp(0.0, 1.0)),
            _ => None,
        };
    }

    /// Shows full content.
    pub fn show_content(&mut self, data: ContentData, visible: bool) {
        self.displayed = Displayed::Content(data);
        self.activity = false;
        self.progress = None;
        self.failed = false;
        self.update_playback(visible);
    }

    /// Marks the load as failed, keeping any placeholder on screen.
    pub fn show_failure(&mut self) {
        self.activity = false;
        self.progress = None;
        self.failed = true;
    }

    /// Clears the surface.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Starts or stops autoplaying content.
    pub fn update_playback(&mut self, visible: bool) {
        self.playing = visible
            && self
                .content()
                .is_some_and(|data| data.content_type().autoplays());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{AnimatedImage, AnimationFrame, MovieClip, MovieSource};
    use std::time::Duration;

    fn animation() -> ContentData {
        let frame = AnimationFrame {
            image: Arc::new(image::RgbaImage::new(2, 2)),
            delay: Duration::from_millis(40),
        };
        ContentData::AnimatedImage(Arc::new(AnimatedImage::new(vec![frame]).unwrap()))
    }

    #[test]
    fn test_loading_without_placeholder_shows_activity() {
        let mut view = ContentView::new();
        view.show_loading(None);
        assert!(view.shows_activity());
        assert!(!view.shows_placeholder());
    }

    #[test]
    fn test_failure_keeps_placeholder() {
        let mut view = ContentView::new();
        view.show_loading(Some(Arc::new(image::DynamicImage::new_rgb8(2, 2))));
        view.set_progress(10, Some(100));
        view.show_failure();

        assert!(view.shows_placeholder());
        assert!(view.is_failed());
        assert!(view.progress().is_none());
    }

    #[test]
    fn test_playback_follows_visibility() {
        let mut view = ContentView::new();
        view.show_content(animation(), false);
        assert!(!view.is_playing());
        view.update_playback(true);
        assert!(view.is_playing());
    }

    #[test]
    fn test_movies_do_not_zoom() {
        let mut view = ContentView::new();
        let clip = MovieClip {
            source: MovieSource::Remote("https://example.com/a.mov".to_string()),
            repeating: false,
        };
        view.show_content(ContentData::Movie(Arc::new(clip)), true);
        view.set_zoom_scale(2.0);

        assert!(view.is_zoomed_out());
        assert!(view.prefers_footer_hidden());
        assert!(!view.is_playing());
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut view = ContentView::new();
        view.set_zoom_scale(10.0);
        assert!((view.zoom().scale() - 3.0).abs() < f64::EPSILON);
        assert!(!view.is_zoomed_out());
        view.set_zoom_scale(0.1);
        assert!(view.is_zoomed_out());
    }
}
