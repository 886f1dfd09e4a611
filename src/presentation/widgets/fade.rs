//! Alpha for a cell grid.

use ratatui::style::{Modifier, Style};

/// Below this nothing is drawn.
const HIDDEN_ALPHA: f64 = 0.05;
/// Below this text is dimmed.
const DIM_ALPHA: f64 = 0.6;

/// `style` at `alpha`, or `None` when it should not be drawn.
#[must_use]
pub fn faded(style: Style, alpha: f64) -> Option<Style> {
    if alpha < HIDDEN_ALPHA {
        None
    } else if alpha < DIM_ALPHA {
        Some(style.add_modifier(Modifier::DIM))
    } else {
        Some(style)
    }
}

/// Whether pixel content is drawn at `alpha`. Images cannot be dimmed.
#[must_use]
pub fn shows_pixels(alpha: f64) -> bool {
    alpha >= DIM_ALPHA
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0.0, None ; "transparent")]
    #[test_case(0.3, Some(true) ; "dimmed")]
    #[test_case(1.0, Some(false) ; "opaque")]
    fn test_faded(alpha: f64, dimmed: Option<bool>) {
        let style = faded(Style::default(), alpha);
        assert_eq!(
            style.map(|s| s.add_modifier.contains(Modifier::DIM)),
            dimmed
        );
    }
}
