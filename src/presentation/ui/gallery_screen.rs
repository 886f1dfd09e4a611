//! Full-screen gallery overlay.

use std::time::Duration;

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Clear},
};

use crate::application::Gallery;
use crate::application::services::progress_indicator::ProgressIndicator;
use crate::domain::entities::Rect as ContentRect;
use crate::presentation::widgets::{
    CaptionBar, MediaView, NavigationBar, ProgressRing, shows_pixels,
};

const NAVIGATION_HEIGHT: u16 = 1;
const CAPTION_HEIGHT: u16 = 2;
const PROGRESS_WIDTH: u16 = 24;

/// Area left for content once the bars are laid out.
#[must_use]
pub fn content_container(area: Rect) -> ContentRect {
    let height = area
        .height
        .saturating_sub(NAVIGATION_HEIGHT + CAPTION_HEIGHT + 1);
    ContentRect::new(
        f64::from(area.x),
        f64::from(area.y + NAVIGATION_HEIGHT),
        f64::from(area.width),
        f64::from(height),
    )
}

/// Snaps a content frame to whole cells inside `bounds`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn to_cells(frame: &ContentRect, bounds: Rect) -> Rect {
    let cell = |value: f64| value.round().clamp(0.0, f64::from(u16::MAX)) as u16;
    let x = cell(frame.x());
    let y = cell(frame.y());
    let right = cell(frame.x() + frame.width());
    let bottom = cell(frame.y() + frame.height());
    Rect::new(x, y, right.saturating_sub(x), bottom.saturating_sub(y)).intersection(bounds)
}

/// Draws the presented gallery and keeps per-page animation state.
pub struct GalleryScreen {
    media: MediaView,
    progress: ProgressIndicator,
    shown_progress: Option<f32>,
    page: Option<usize>,
}

impl GalleryScreen {
    /// Creates a screen around a media renderer.
    #[must_use]
    pub fn new(media: MediaView) -> Self {
        Self {
            media,
            progress: ProgressIndicator::new(),
            shown_progress: None,
            page: None,
        }
    }

    /// Advances per-frame state.
    pub fn tick(&mut self, dt: Duration, gallery: &Gallery) {
        let page = gallery.paging().current_index();
        if page != self.page {
            self.page = page;
            self.media.rewind();
            self.progress = ProgressIndicator::new();
            self.shown_progress = None;
        }

        let progress = gallery
            .paging()
            .current_provider()
            .and_then(|provider| provider.content_view().progress());
        if progress != self.shown_progress {
            if let Some(value) = progress {
                self.progress.set_progress(f64::from(value));
            }
            self.shown_progress = progress;
        }

        self.media.tick(dt);
        self.progress.tick(dt);
    }

    /// Draws the gallery into `area`.
    pub fn render(&mut self, frame: &mut Frame, area: Rect, gallery: &Gallery) {
        let layout = gallery.layout();

        if shows_pixels(layout.background_alpha) {
            frame.render_widget(Clear, area);
            frame.render_widget(Block::default().style(Style::default().bg(Color::Black)), area);
        }

        let content = to_cells(&layout.content_frame, area);
        if let Some(provider) = gallery.paging().current_provider() {
            let view = provider.content_view();
            self.media.render(frame, content, view, layout.content_alpha);

            if view.progress().is_some() && content.height > 0 {
                let width = PROGRESS_WIDTH.min(content.width);
                let bar = Rect::new(
                    content.x + (content.width - width) / 2,
                    content.bottom().saturating_sub(1),
                    width,
                    1,
                );
                frame.render_widget(ProgressRing::new(&self.progress), bar);
            }
        }

        let navigation = Rect::new(area.x, area.y, area.width, NAVIGATION_HEIGHT.min(area.height));
        let title = gallery.navigation_title();
        frame.render_widget(
            NavigationBar::new(title.as_deref(), layout.navigation_alpha),
            navigation,
        );

        let caption_height = CAPTION_HEIGHT.min(area.height);
        let caption = Rect::new(
            area.x,
            area.bottom().saturating_sub(caption_height),
            area.width,
            caption_height,
        );
        let (title, subtitle) = gallery.caption();
        frame.render_widget(
            CaptionBar::new(title.as_ref(), subtitle.as_ref(), layout.footer_alpha),
            caption,
        );
    }
}

impl std::fmt::Debug for GalleryScreen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GalleryScreen")
            .field("media", &self.media)
            .field("page", &self.page)
            .finish_non_exhaustive()
    }
}
