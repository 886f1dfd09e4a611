use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use super::fade::faded;
use crate::domain::entities::AttributedText;

/// Caption footer: a bold title line and a subtitle line, links underlined.
pub struct CaptionBar<'a> {
    title: Option<&'a AttributedText>,
    subtitle: Option<&'a AttributedText>,
    alpha: f64,
}

impl<'a> CaptionBar<'a> {
    /// Caption with optional title and subtitle faded to `alpha`.
    #[must_use]
    pub const fn new(
        title: Option<&'a AttributedText>,
        subtitle: Option<&'a AttributedText>,
        alpha: f64,
    ) -> Self {
        Self {
            title,
            subtitle,
            alpha,
        }
    }
}

impl Widget for CaptionBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(base) = faded(Style::default().fg(Color::Gray), self.alpha) else {
            return;
        };
        let width = usize::from(area.width);
        let lines: Vec<Line> = [
            self.title.map(|t| (t, base.add_modifier(Modifier::BOLD))),
            self.subtitle.map(|t| (t, base)),
        ]
        .into_iter()
        .flatten()
        .filter(|(text, _)| !text.is_empty())
        .map(|(text, style)| attributed_line(text, style, width))
        .collect();

        Paragraph::new(lines).render(area, buf);
    }
}

/// Splits `text` into plain and link spans, cut to `width` columns.
fn attributed_line(text: &AttributedText, style: Style, width: usize) -> Line<'static> {
    let link_style = style.fg(Color::Blue).add_modifier(Modifier::UNDERLINED);
    let mut spans = Vec::new();
    let mut cursor = 0;
    for link in &text.links {
        if link.range.start > cursor {
            spans.push(Span::styled(text.text[cursor..link.range.start].to_string(), style));
        }
        spans.push(Span::styled(text.text[link.range.clone()].to_string(), link_style));
        cursor = link.range.end;
    }
    if cursor < text.text.len() {
        spans.push(Span::styled(text.text[cursor..].to_string(), style));
    }
    Line::from(truncate_spans(spans, width))
}

fn truncate_spans(spans: Vec<Span<'static>>, width: usize) -> Vec<Span<'static>> {
    let mut remaining = width;
    let mut out = Vec::with_capacity(spans.len());
    for span in spans {
        let span_width = span.content.width();
        if span_width <= remaining {
            remaining -= span_width;
            out.push(span);
            continue;
        }
        let mut cut = String::new();
        let mut used = 0;
        for ch in span.content.chars() {
            let ch_width = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
            if used + ch_width + 1 > remaining {
                break;
            }
            used += ch_width;
            cut.push(ch);
        }
        cut.push('…');
        out.push(Span::styled(cut, span.style));
        break;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::LinkExtractor;

    #[test]
    fn test_links_become_styled_spans() {
        let text = LinkExtractor::attributed("see [docs](https://example.com) now");
        let line = attributed_line(&text, Style::default(), 80);

        let contents: Vec<&str> = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(contents, vec!["see ", "docs", " now"]);
        assert!(line.spans[1].style.add_modifier.contains(Modifier::UNDERLINED));
    }

    #[test]
    fn test_long_caption_is_truncated() {
        let text = AttributedText::plain("a very long caption indeed");
        let line = attributed_line(&text, Style::default(), 8);

        assert_eq!(line.width(), 8);
        assert!(line.spans[0].content.ends_with('…'));
    }
}
