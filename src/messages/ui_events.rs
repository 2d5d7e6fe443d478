//! UI events - messages from UI layer to App layer.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Which of the four screens is active, without its data. Used for
/// context-aware key mapping in the UI layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ScreenKind {
    #[default]
    EndpointList,
    OperationDetail,
    RequestBuilder,
    ResponseView,
}

/// Events generated from user input in the UI layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    // Endpoint list
    MoveDown,
    MoveUp,
    JumpFirst,
    JumpLast,
    Select,

    // Scrollable viewports (detail and response)
    ScrollDown,
    ScrollUp,
    HalfPageDown,
    HalfPageUp,
    Execute,

    // Request builder
    NextField,
    PrevField,
    FieldChar(char),
    FieldBackspace,
    Send,

    // Overlay and navigation
    ToggleHelp,
    CloseHelp,
    Back,
    Resize(u16, u16),

    // System
    Quit,
}

/// Convert a key event to a [`UiEvent`] based on the active screen.
///
/// The request builder owns almost the whole keyboard: printable
/// characters feed the focused field, so only tab, arrows, escape and
/// ctrl+s act as controls there.
pub fn key_to_ui_event(key: KeyEvent, screen: ScreenKind, show_help: bool) -> Option<UiEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') => return Some(UiEvent::Quit),
            KeyCode::Char('s') if screen == ScreenKind::RequestBuilder => {
                return Some(UiEvent::Send)
            }
            _ => return None,
        }
    }

    // The help overlay swallows everything; any key closes it.
    if show_help {
        return Some(UiEvent::CloseHelp);
    }

    // Help toggle is global, even in the builder.
    if key.code == KeyCode::Char('?') {
        return Some(UiEvent::ToggleHelp);
    }

    match screen {
        ScreenKind::EndpointList => match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Some(UiEvent::Quit),
            KeyCode::Char('j') | KeyCode::Down => Some(UiEvent::MoveDown),
            KeyCode::Char('k') | KeyCode::Up => Some(UiEvent::MoveUp),
            KeyCode::Char('g') => Some(UiEvent::JumpFirst),
            KeyCode::Char('G') => Some(UiEvent::JumpLast),
            KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => Some(UiEvent::Select),
            _ => None,
        },
        ScreenKind::OperationDetail => match key.code {
            KeyCode::Esc | KeyCode::Char('h') | KeyCode::Left => Some(UiEvent::Back),
            KeyCode::Char('j') | KeyCode::Down => Some(UiEvent::ScrollDown),
            KeyCode::Char('k') | KeyCode::Up => Some(UiEvent::ScrollUp),
            KeyCode::Char('d') => Some(UiEvent::HalfPageDown),
            KeyCode::Char('u') => Some(UiEvent::HalfPageUp),
            KeyCode::Char('e') | KeyCode::Enter => Some(UiEvent::Execute),
            _ => None,
        },
        ScreenKind::RequestBuilder => match key.code {
            KeyCode::Esc => Some(UiEvent::Back),
            KeyCode::Tab | KeyCode::Down => Some(UiEvent::NextField),
            KeyCode::BackTab | KeyCode::Up => Some(UiEvent::PrevField),
            KeyCode::Backspace => Some(UiEvent::FieldBackspace),
            KeyCode::Char(c) => Some(UiEvent::FieldChar(c)),
            _ => None,
        },
        ScreenKind::ResponseView => match key.code {
            KeyCode::Esc | KeyCode::Char('h') | KeyCode::Left => Some(UiEvent::Back),
            KeyCode::Char('j') | KeyCode::Down => Some(UiEvent::ScrollDown),
            KeyCode::Char('k') | KeyCode::Up => Some(UiEvent::ScrollUp),
            KeyCode::Char('d') => Some(UiEvent::HalfPageDown),
            KeyCode::Char('u') => Some(UiEvent::HalfPageUp),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn quit_only_from_endpoint_list() {
        assert_eq!(
            key_to_ui_event(press(KeyCode::Char('q')), ScreenKind::EndpointList, false),
            Some(UiEvent::Quit)
        );
        assert_eq!(
            key_to_ui_event(press(KeyCode::Char('q')), ScreenKind::OperationDetail, false),
            None
        );
    }

    #[test]
    fn ctrl_c_quits_from_any_screen() {
        for screen in [
            ScreenKind::EndpointList,
            ScreenKind::OperationDetail,
            ScreenKind::RequestBuilder,
            ScreenKind::ResponseView,
        ] {
            assert_eq!(
                key_to_ui_event(ctrl('c'), screen, false),
                Some(UiEvent::Quit)
            );
        }
    }

    #[test]
    fn builder_characters_feed_focused_field() {
        assert_eq!(
            key_to_ui_event(press(KeyCode::Char('q')), ScreenKind::RequestBuilder, false),
            Some(UiEvent::FieldChar('q'))
        );
        assert_eq!(
            key_to_ui_event(press(KeyCode::Backspace), ScreenKind::RequestBuilder, false),
            Some(UiEvent::FieldBackspace)
        );
    }

    #[test]
    fn ctrl_s_sends_only_in_builder() {
        assert_eq!(
            key_to_ui_event(ctrl('s'), ScreenKind::RequestBuilder, false),
            Some(UiEvent::Send)
        );
        assert_eq!(key_to_ui_event(ctrl('s'), ScreenKind::EndpointList, false), None);
    }

    #[test]
    fn help_overlay_closes_on_any_key() {
        assert_eq!(
            key_to_ui_event(press(KeyCode::Char('x')), ScreenKind::OperationDetail, true),
            Some(UiEvent::CloseHelp)
        );
    }

    #[test]
    fn escape_goes_back_outside_list() {
        assert_eq!(
            key_to_ui_event(press(KeyCode::Esc), ScreenKind::ResponseView, false),
            Some(UiEvent::Back)
        );
        assert_eq!(
            key_to_ui_event(press(KeyCode::Esc), ScreenKind::EndpointList, false),
            Some(UiEvent::Quit)
        );
    }
}
