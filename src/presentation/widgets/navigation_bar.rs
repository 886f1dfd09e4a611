use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use super::fade::faded;

/// Top bar of the gallery: close hint and "N of M".
pub struct NavigationBar<'a> {
    title: Option<&'a str>,
    alpha: f64,
}

impl<'a> NavigationBar<'a> {
    /// Bar with an optional title faded to `alpha`.
    #[must_use]
    pub const fn new(title: Option<&'a str>, alpha: f64) -> Self {
        Self { title, alpha }
    }
}

impl Widget for NavigationBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(style) = faded(Style::default().fg(Color::White), self.alpha) else {
            return;
        };

        Paragraph::new(Line::from(vec![
            Span::styled(" ✕ ", style.add_modifier(Modifier::BOLD)),
            Span::styled("Close (Esc)", style.fg(Color::DarkGray)),
        ]))
        .render(area, buf);

        if let Some(title) = self.title {
            Paragraph::new(Span::styled(title, style.add_modifier(Modifier::BOLD)))
                .alignment(Alignment::Center)
                .render(area, buf);
        }
    }
}
