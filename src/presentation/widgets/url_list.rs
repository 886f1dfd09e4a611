use std::rc::Rc;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::domain::entities::{ContentType, ItemRef};
use crate::presentation::ui::RowView;

/// The origin list. Records where each visible row lands so the gallery
/// can animate from it.
pub struct UrlList<'a> {
    items: &'a [ItemRef],
    rows: &'a [Rc<RowView>],
    selected: usize,
    dimmed: bool,
}

impl<'a> UrlList<'a> {
    /// List of `items` with `selected` highlighted; row frames go to `rows`.
    #[must_use]
    pub const fn new(items: &'a [ItemRef], rows: &'a [Rc<RowView>], selected: usize) -> Self {
        Self {
            items,
            rows,
            selected,
            dimmed: false,
        }
    }

    /// Dims the list behind a presented gallery.
    #[must_use]
    pub const fn dimmed(mut self, dimmed: bool) -> Self {
        self.dimmed = dimmed;
        self
    }

    /// First row shown so the selection stays visible.
    #[must_use]
    pub fn scroll_offset(selected: usize, visible_rows: usize) -> usize {
        if visible_rows == 0 {
            return 0;
        }
        selected.saturating_sub(visible_rows - 1)
    }
}

impl Widget for UrlList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut base = Style::default();
        if self.dimmed {
            base = base.add_modifier(Modifier::DIM);
        }
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" Media ({}) ", self.items.len()))
            .border_style(base.fg(Color::DarkGray));
        let inner = block.inner(area);
        block.render(area, buf);

        let visible = usize::from(inner.height);
        let offset = Self::scroll_offset(self.selected, visible);
        for row in self.rows {
            row.set_frame(crate::domain::entities::Rect::ZERO);
        }

        for (line, (index, item)) in self.items.iter().enumerate().skip(offset).take(visible).enumerate() {
            let Ok(line) = u16::try_from(line) else {
                break;
            };
            let row_area = Rect::new(inner.x, inner.y + line, inner.width, 1);
            if let Some(row) = self.rows.get(index) {
                row.set_frame(crate::domain::entities::Rect::new(
                    f64::from(row_area.x),
                    f64::from(row_area.y),
                    f64::from(row_area.width),
                    f64::from(row_area.height),
                ));
            }

            let style = if index == self.selected {
                base.fg(Color::Black).bg(Color::Cyan)
            } else {
                base
            };
            let kind = match item.content_type() {
                ContentType::Unknown => "?",
                ContentType::Image => "img",
                ContentType::AnimatedImage => "gif",
                ContentType::Movie | ContentType::RepeatingMovie => "mov",
            };
            let url = item.content_url().unwrap_or_default();
            Paragraph::new(Line::from(vec![
                Span::styled(format!(" {kind:>3} "), style.add_modifier(Modifier::BOLD)),
                Span::styled(url, style),
            ]))
            .style(style)
            .render(row_area, buf);
        }
    }
}
