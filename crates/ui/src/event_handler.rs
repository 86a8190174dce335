use crate::state::AppState;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::io::Result;
use std::time::Duration;

/// Actions the app performs beyond plain composer edits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Submit,
    Quit,
    ToggleTheme,
    ScrollUp,
    ScrollDown,
}

/// Terminal input handling
pub struct EventHandler;

impl EventHandler {
    /// Next pending terminal event, without blocking.
    pub fn read() -> Result<Option<Event>> {
        if crossterm::event::poll(Duration::ZERO)? { Ok(Some(crossterm::event::read()?)) } else { Ok(None) }
    }

    /// Apply a terminal event to `state`, returning the action the app must run.
    pub fn handle_event(event: Event, state: &mut AppState) -> Option<KeyAction> {
        match event {
            Event::Key(key) => Self::handle_key_event(key, state),
            Event::Paste(text) => {
                if state.input_enabled() {
                    state.input.insert_str(&text);
                }
                None
            }
            _ => None,
        }
    }

    pub fn handle_key_event(event: KeyEvent, state: &mut AppState) -> Option<KeyAction> {
        if event.kind != KeyEventKind::Press {
            return None;
        }

        let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
        match event.code {
            KeyCode::Esc => return Some(KeyAction::Quit),
            KeyCode::Char('c') if ctrl => return Some(KeyAction::Quit),
            KeyCode::Char('t') if ctrl => return Some(KeyAction::ToggleTheme),
            KeyCode::PageUp => return Some(KeyAction::ScrollUp),
            KeyCode::PageDown => return Some(KeyAction::ScrollDown),
            _ => {}
        }

        if !state.input_enabled() {
            return None;
        }

        let input = &mut state.input;
        match event.code {
            KeyCode::Enter => return Some(KeyAction::Submit),
            KeyCode::Char(c) if !ctrl => {
                input.insert_char(c);
            }
            KeyCode::Backspace => input.backspace(),
            KeyCode::Delete => input.delete(),
            KeyCode::Left => input.move_left(),
            KeyCode::Right => input.move_right(),
            KeyCode::Home => input.move_home(),
            KeyCode::End => input.move_end(),
            KeyCode::Char('u') if ctrl => input.clear(),
            _ => {}
        }
        None
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
    fn test_typing_and_submit() {
        let mut state = AppState::default();
        for c in "hi".chars() {
            assert_eq!(EventHandler::handle_key_event(press(KeyCode::Char(c)), &mut state), None);
        }
        assert_eq!(state.input.buffer, "hi");
        assert_eq!(EventHandler::handle_key_event(press(KeyCode::Enter), &mut state), Some(KeyAction::Submit));
    }

    #[test]
    fn test_global_keys() {
        let mut state = AppState::default();
        assert_eq!(EventHandler::handle_key_event(press(KeyCode::Esc), &mut state), Some(KeyAction::Quit));
        assert_eq!(EventHandler::handle_key_event(ctrl('c'), &mut state), Some(KeyAction::Quit));
        assert_eq!(EventHandler::handle_key_event(ctrl('t'), &mut state), Some(KeyAction::ToggleTheme));
        assert_eq!(EventHandler::handle_key_event(press(KeyCode::PageUp), &mut state), Some(KeyAction::ScrollUp));
        assert_eq!(EventHandler::handle_key_event(press(KeyCode::PageDown), &mut state), Some(KeyAction::ScrollDown));
        assert!(state.input.is_empty());
    }

    #[test]
    fn test_busy_disables_editing() {
        let mut state = AppState::default();
        state.input.insert_str("draft");
        state.busy = true;

        assert_eq!(EventHandler::handle_key_event(press(KeyCode::Char('x')), &mut state), None);
        assert_eq!(EventHandler::handle_key_event(press(KeyCode::Backspace), &mut state), None);
        assert_eq!(EventHandler::handle_key_event(press(KeyCode::Enter), &mut state), None);
        assert_eq!(state.input.buffer, "draft");

        assert_eq!(EventHandler::handle_key_event(press(KeyCode::Esc), &mut state), Some(KeyAction::Quit));
    }

    #[test]
    fn test_release_events_ignored() {
        let mut state = AppState::default();
        let mut event = press(KeyCode::Char('a'));
        event.kind = KeyEventKind::Release;
        assert_eq!(EventHandler::handle_key_event(event, &mut state), None);
        assert!(state.input.is_empty());
    }

    #[test]
    fn test_paste_respects_limit_and_busy() {
        let mut state = AppState::default();
        state.input.max_chars = 4;
        EventHandler::handle_event(Event::Paste("你好世界！".to_string()), &mut state);
        assert_eq!(state.input.buffer, "你好世界");

        state.input.clear();
        state.busy = true;
        EventHandler::handle_event(Event::Paste("late".to_string()), &mut state);
        assert!(state.input.is_empty());
    }

    #[test]
    fn test_ctrl_u_clears() {
        let mut state = AppState::default();
        state.input.insert_str("abc");
        EventHandler::handle_key_event(ctrl('u'), &mut state);
        assert!(state.input.is_empty());
        assert_eq!(state.input.cursor, 0);
    }
}
