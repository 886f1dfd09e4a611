//! Terminal renderer for an item's content view.

use std::sync::Arc;
use std::time::Duration;

use image::DynamicImage;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use ratatui_image::StatefulImage;
use ratatui_image::picker::{Picker, ProtocolType};
use ratatui_image::protocol::StatefulProtocol;
use tracing::debug;

use super::fade::{faded, shows_pixels};
use crate::domain::entities::{ContentData, ContentView, Displayed, MovieClip, MovieSource};

/// Identifies the pixels a protocol was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Encoded {
    pixels: usize,
    zoom_permille: u32,
}

/// Draws images and animation frames with the best protocol the terminal
/// supports, re-encoding only when the pixels change.
pub struct MediaView {
    picker: Picker,
    encoded: Option<(Encoded, StatefulProtocol)>,
    playback: Duration,
}

impl MediaView {
    /// Queries the terminal for its graphics protocol.
    #[must_use]
    pub fn new() -> Self {
        let mut picker = Picker::from_query_stdio().unwrap_or_else(|_| Picker::halfblocks());

        let caps = picker.capabilities();
        let has_sixel = caps
            .iter()
            .any(|c| matches!(c, ratatui_image::picker::Capability::Sixel));
        let has_kitty = caps
            .iter()
            .any(|c| matches!(c, ratatui_image::picker::Capability::Kitty));

        if has_sixel && !has_kitty && picker.protocol_type() == ProtocolType::Halfblocks {
            picker.set_protocol_type(ProtocolType::Sixel);
        }
        debug!(protocol = ?picker.protocol_type(), "Image protocol selected");

        Self::with_picker(picker)
    }

    /// Uses a fixed picker.
    #[must_use]
    pub const fn with_picker(picker: Picker) -> Self {
        Self {
            picker,
            encoded: None,
            playback: Duration::ZERO,
        }
    }

    /// Advances animated content.
    pub fn tick(&mut self, dt: Duration) {
        self.playback = self.playback.saturating_add(dt);
    }

    /// Restarts playback, for a new page.
    pub fn rewind(&mut self) {
        self.playback = Duration::ZERO;
    }

    /// Draws `view` into `area`.
    pub fn render(&mut self, frame: &mut Frame, area: Rect, view: &ContentView, alpha: f64) {
        if area.is_empty() {
            return;
        }
        match view.displayed() {
            Displayed::Nothing => {
                if view.is_failed() {
                    render_notice(frame, area, "Could not load this item. Press r to retry.", alpha);
                } else if view.shows_activity() {
                    render_notice(frame, area, "Loading…", alpha);
                }
            }
            Displayed::Placeholder(image) => {
                self.render_pixels(frame, area, image, 1.0, alpha);
                if view.is_failed() {
                    render_notice(frame, bottom_line(area), "Load failed. Press r to retry.", alpha);
                }
            }
            Displayed::Content(ContentData::Image(image)) => {
                self.render_pixels(frame, area, image, view.zoom().scale(), alpha);
            }
            Displayed::Content(ContentData::AnimatedImage(animation)) => {
                let current = if view.is_playing() {
                    animation.frame_at(self.playback)
                } else {
                    &animation.frames()[0]
                };
                let key = Arc::as_ptr(&current.image) as usize;
                let pixels = || DynamicImage::ImageRgba8((*current.image).clone());
                self.render_encoded(frame, area, key, pixels, view.zoom().scale(), alpha);
            }
            Displayed::Content(ContentData::Movie(clip)) => render_movie(frame, area, clip, alpha),
        }
    }

    fn render_pixels(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        image: &Arc<DynamicImage>,
        zoom: f64,
        alpha: f64,
    ) {
        let key = Arc::as_ptr(image) as usize;
        self.render_encoded(frame, area, key, || (**image).clone(), zoom, alpha);
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn render_encoded(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        pixels: usize,
        image: impl FnOnce() -> DynamicImage,
        zoom: f64,
        alpha: f64,
    ) {
        if !shows_pixels(alpha) {
            return;
        }
        let wanted = Encoded {
            pixels,
            zoom_permille: (zoom * 1000.0).round() as u32,
        };
        let stale = self.encoded.as_ref().is_none_or(|(encoded, _)| *encoded != wanted);
        if stale {
            let protocol = self.picker.new_resize_protocol(zoomed(image(), zoom));
            self.encoded = Some((wanted, protocol));
        }
        if let Some((_, protocol)) = self.encoded.as_mut() {
            frame.render_stateful_widget(StatefulImage::default(), area, protocol);
        }
    }
}

impl Default for MediaView {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MediaView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaView")
            .field("protocol", &self.picker.protocol_type())
            .field("encoded", &self.encoded.as_ref().map(|(key, _)| key))
            .field("playback", &self.playback)
            .finish_non_exhaustive()
    }
}

/// The centre of `image` magnified by `zoom`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn zoomed(image: DynamicImage, zoom: f64) -> DynamicImage {
    if zoom <= 1.0 {
        return image;
    }
    let width = ((f64::from(image.width()) / zoom).round() as u32).max(1);
    let height = ((f64::from(image.height()) / zoom).round() as u32).max(1);
    let x = (image.width() - width) / 2;
    let y = (image.height() - height) / 2;
    image.crop_imm(x, y, width, height)
}

fn bottom_line(area: Rect) -> Rect {
    Rect::new(area.x, area.bottom().saturating_sub(1), area.width, 1)
}

fn render_notice(frame: &mut Frame, area: Rect, text: &str, alpha: f64) {
    let Some(style) = faded(Style::default().fg(Color::Gray), alpha) else {
        return;
    };
    let y = area.y + area.height / 2;
    let line = Rect::new(area.x, y.min(area.bottom().saturating_sub(1)), area.width, 1);
    frame.render_widget(
        Paragraph::new(Span::styled(text.to_string(), style)).alignment(Alignment::Center),
        line,
    );
}

fn render_movie(frame: &mut Frame, area: Rect, clip: &MovieClip, alpha: f64) {
    let Some(style) = faded(Style::default().fg(Color::White), alpha) else {
        return;
    };
    let source = match &clip.source {
        MovieSource::Remote(url) => url.clone(),
        MovieSource::Downloaded(path) => path.display().to_string(),
        MovieSource::File(path) => path.display().to_string(),
    };
    let kind = if clip.repeating { "looping movie" } else { "movie" };
    let lines = vec![
        Line::from(Span::styled(format!("▶ {kind}"), style.add_modifier(Modifier::BOLD))),
        Line::from(Span::styled(source, style.fg(Color::DarkGray))),
        Line::from(Span::styled("Press p to play", style)),
    ];
    let y = area.y + area.height.saturating_sub(3) / 2;
    let block = Rect::new(area.x, y, area.width, area.height.min(3));
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), block);
}
