//! Event handling.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Result of event handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventResult {
    /// Continue processing.
    Continue,
    /// Exit application.
    Exit,
    /// Event was consumed.
    Consumed,
}

/// What a key press asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Leave the application.
    Quit,
    /// Move the list selection.
    Select(isize),
    /// Open the gallery at the selection.
    Present,
    /// Page through the gallery.
    Page(isize),
    /// Show or hide the navigation bar and caption.
    ToggleSecondaryViews,
    /// Zoom the current page in.
    ZoomIn,
    /// Zoom the current page out.
    ZoomOut,
    /// Drag the content down one step of an interactive dismissal.
    DragDown,
    /// Drag the content back up one step.
    DragUp,
    /// Let go of the drag.
    Release,
    /// Close the gallery.
    Dismiss,
    /// Reload the current page.
    Retry,
    /// Follow the first caption link.
    OpenLink,
    /// Hand a movie to the system player.
    Play,
}

/// Which screen receives keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyContext {
    /// The URL list.
    List,
    /// The presented gallery.
    Gallery,
    /// A swipe is in progress.
    Dragging,
}

/// Terminal key mapping.
pub struct EventHandler;

impl EventHandler {
    /// Maps a key press to a command in `context`.
    #[must_use]
    pub fn command_for(key: &KeyEvent, context: KeyContext) -> Option<Command> {
        if key.kind == KeyEventKind::Release {
            return None;
        }
        if Self::is_quit_event(key) {
            return Some(Command::Quit);
        }

        match context {
            KeyContext::List => match key.code {
                KeyCode::Up | KeyCode::Char('k') => Some(Command::Select(-1)),
                KeyCode::Down | KeyCode::Char('j') => Some(Command::Select(1)),
                KeyCode::Esc | KeyCode::Char('q') => Some(Command::Quit),
                _ if Self::is_submit_event(key) => Some(Command::Present),
                _ => None,
            },
            KeyContext::Gallery => match key.code {
                KeyCode::Left | KeyCode::Char('h') => Some(Command::Page(-1)),
                KeyCode::Right | KeyCode::Char('l') => Some(Command::Page(1)),
                KeyCode::Char(' ') => Some(Command::ToggleSecondaryViews),
                KeyCode::Char('+' | '=') => Some(Command::ZoomIn),
                KeyCode::Char('-') => Some(Command::ZoomOut),
                KeyCode::Char('j') | KeyCode::Down => Some(Command::DragDown),
                KeyCode::Esc | KeyCode::Char('q') => Some(Command::Dismiss),
                KeyCode::Char('r') => Some(Command::Retry),
                KeyCode::Char('o') => Some(Command::OpenLink),
                KeyCode::Char('p') => Some(Command::Play),
                _ => None,
            },
            KeyContext::Dragging => match key.code {
                KeyCode::Char('j') | KeyCode::Down => Some(Command::DragDown),
                KeyCode::Char('k') | KeyCode::Up => Some(Command::DragUp),
                _ => Some(Command::Release),
            },
        }
    }

    /// Checks if key quits regardless of screen.
    #[must_use]
    pub fn is_quit_event(key: &KeyEvent) -> bool {
        matches!(
            key,
            KeyEvent {
                code: KeyCode::Char('c'),
                modifiers: KeyModifiers::CONTROL,
                ..
            }
        )
    }

    /// Checks if key is a submit event.
    #[must_use]
    pub fn is_submit_event(key: &KeyEvent) -> bool {
        matches!(
            key,
            KeyEvent {
                code: KeyCode::Enter,
                ..
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn make_key_event(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new_with_kind(code, modifiers, KeyEventKind::Press)
    }

    #[test]
    fn test_ctrl_c_quits_everywhere() {
        let key = make_key_event(KeyCode::Char('c'), KeyModifiers::CONTROL);
        for context in [KeyContext::List, KeyContext::Gallery, KeyContext::Dragging] {
            assert_eq!(EventHandler::command_for(&key, context), Some(Command::Quit));
        }
    }

    #[test_case(KeyCode::Enter, KeyContext::List, Some(Command::Present) ; "enter_presents")]
    #[test_case(KeyCode::Esc, KeyContext::List, Some(Command::Quit) ; "esc_quits_list")]
    #[test_case(KeyCode::Esc, KeyContext::Gallery, Some(Command::Dismiss) ; "esc_dismisses_gallery")]
    #[test_case(KeyCode::Right, KeyContext::Gallery, Some(Command::Page(1)) ; "right_pages")]
    #[test_case(KeyCode::Char('j'), KeyContext::List, Some(Command::Select(1)) ; "j_selects_in_list")]
    #[test_case(KeyCode::Char('j'), KeyContext::Gallery, Some(Command::DragDown) ; "j_drags_in_gallery")]
    #[test_case(KeyCode::Char('x'), KeyContext::Dragging, Some(Command::Release) ; "other_key_releases")]
    #[test_case(KeyCode::Char('x'), KeyContext::Gallery, None ; "unmapped")]
    fn test_command_mapping(code: KeyCode, context: KeyContext, expected: Option<Command>) {
        let key = make_key_event(code, KeyModifiers::NONE);
        assert_eq!(EventHandler::command_for(&key, context), expected);
    }

    #[test]
    fn test_key_release_is_ignored() {
        let key = KeyEvent::new_with_kind(KeyCode::Enter, KeyModifiers::NONE, KeyEventKind::Release);
        assert_eq!(EventHandler::command_for(&key, KeyContext::List), None);
    }
}
