use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::{Gauge, Widget},
};

use crate::application::services::progress_indicator::ProgressIndicator;

/// Download progress drawn from the indicator's current keyframe.
pub struct ProgressRing<'a> {
    indicator: &'a ProgressIndicator,
    style: Style,
}

impl<'a> ProgressRing<'a> {
    /// Gauge for `indicator`.
    #[must_use]
    pub fn new(indicator: &'a ProgressIndicator) -> Self {
        Self {
            indicator,
            style: Style::default().fg(Color::Cyan).bg(Color::Black),
        }
    }

    /// Sets the gauge style.
    #[must_use]
    pub const fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

impl Widget for ProgressRing<'_> {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn render(self, area: Rect, buf: &mut Buffer) {
        let fraction = self.indicator.displayed_fraction();
        let percent = (fraction * 100.0).round() as u16;
        Gauge::default()
            .gauge_style(self.style)
            .ratio(fraction)
            .label(format!("{percent}%"))
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_follows_animation() {
        let mut indicator = ProgressIndicator::new();
        indicator.set_progress(0.5);
        indicator.tick(crate::application::services::progress_indicator::ANIMATION_DURATION);

        let area = Rect::new(0, 0, 20, 1);
        let mut buf = Buffer::empty(area);
        ProgressRing::new(&indicator).render(area, &mut buf);

        let line: String = (0..area.width)
            .map(|x| buf[(x, 0)].symbol().to_string())
            .collect();
        assert!(line.contains("50%"));
    }
}
