use crate::slash::parse_slash_command;
use crate::state::AppState;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::KeyAction;

const SCROLL_STEP: u16 = 5;

/// Handle keys while the chat view has focus.
///
/// `busy` is true while a reply is in flight: Enter then interrupts instead of
/// sending, and the draft stays in the input line. Slash commands run either way.
pub fn handle_normal_key(event: KeyEvent, state: &mut AppState, busy: bool) -> Option<KeyAction> {
    if event.modifiers.contains(KeyModifiers::CONTROL) {
        return match event.code {
            KeyCode::Char('c') => Some(KeyAction::Quit),
            KeyCode::Char('y') => Some(KeyAction::CopyLast),
            KeyCode::Char('r') => Some(KeyAction::RegenerateLast),
            KeyCode::Char('k') => Some(KeyAction::ToggleKnowledge),
            KeyCode::Char('n') => Some(KeyAction::NewConversation),
            KeyCode::Char('u') => {
                state.input.clear();
                None
            }
            _ => None,
        };
    }

    match event.code {
        KeyCode::Enter => {
            if let Some(cmd) = state.input.text.trim_start().strip_prefix('/') {
                let cmd = cmd.to_string();
                let input = state.input.take();
                return Some(
                    parse_slash_command(cmd).unwrap_or(KeyAction::InvalidCommand { input: input.trim().to_string() }),
                );
            }

            if busy {
                return Some(KeyAction::Primary { message: String::new() });
            }

            if state.input.text.trim().is_empty() {
                return None;
            }

            let message = state.input.take();
            state.input.remember(message.clone());
            Some(KeyAction::Primary { message })
        }
        KeyCode::Esc => Some(KeyAction::Interrupt),
        KeyCode::PageUp => {
            state.scroll_up(SCROLL_STEP);
            Some(KeyAction::ScrollUp)
        }
        KeyCode::PageDown => {
            state.scroll_down(SCROLL_STEP);
            Some(KeyAction::ScrollDown)
        }
        KeyCode::Up => {
            state.input.recall_older();
            Some(KeyAction::NavigateHistory)
        }
        KeyCode::Down => {
            state.input.recall_newer();
            Some(KeyAction::NavigateHistory)
        }
        KeyCode::Backspace => {
            state.input.backspace();
            None
        }
        KeyCode::Delete => {
            state.input.delete();
            None
        }
        KeyCode::Left => {
            state.input.move_left();
            None
        }
        KeyCode::Right => {
            state.input.move_right();
            None
        }
        KeyCode::Home => {
            state.input.move_home();
            None
        }
        KeyCode::End => {
            state.input.move_end();
            None
        }
        KeyCode::Char(c) if !event.modifiers.contains(KeyModifiers::ALT) => {
            state.input.insert_char(c);
            None
        }
        _ => None,
    }
}
