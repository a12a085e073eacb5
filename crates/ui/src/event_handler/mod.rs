mod key_action;
mod normal_mode;

pub use key_action::KeyAction;

use crate::state::AppState;

use crossterm::event::{Event, KeyEvent, KeyEventKind};
use std::time::Duration;

use self::normal_mode::handle_normal_key;

/// Event handler for the TUI application
pub struct EventHandler;

impl EventHandler {
    /// Read a pending terminal event without blocking.
    ///
    /// Terminal errors are logged and treated as "no event"; a dead terminal
    /// surfaces again on the next draw.
    pub fn read() -> Option<Event> {
        match crossterm::event::poll(Duration::ZERO) {
            Ok(true) => match crossterm::event::read() {
                Ok(event) => Some(event),
                Err(e) => {
                    tracing::warn!(error = %e, "terminal read failed");
                    None
                }
            },
            Ok(false) => None,
            Err(e) => {
                tracing::warn!(error = %e, "terminal poll failed");
                None
            }
        }
    }

    /// Handle a keyboard event and return the resulting action, if any
    pub fn handle_key_event(event: KeyEvent, state: &mut AppState, busy: bool) -> Option<KeyAction> {
        if event.kind != KeyEventKind::Press {
            return None;
        }
        handle_normal_key(event, state, busy)
    }

    pub fn handle_event(event: &Event, state: &mut AppState, busy: bool) -> Option<KeyAction> {
        match event {
            Event::Key(key_event) => Self::handle_key_event(*key_event, state, busy),
            _ => None,
        }
    }
}
