mod input;

pub use input::InputState;

use std::time::{Duration, Instant};

/// How long a notice stays in the footer
pub const NOTICE_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// Transient status line shown under the input
#[derive(Debug, Clone)]
pub struct Notice {
    pub text: String,
    pub level: NoticeLevel,
    pub expires_at: Instant,
}

/// Front-end only state. Conversation state lives in the surface.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub input: InputState,
    pub notice: Option<Notice>,
    /// Lines scrolled up from the bottom of the transcript
    pub scroll: u16,
    pub should_exit: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notify(&mut self, level: NoticeLevel, text: impl Into<String>) {
        self.notice = Some(Notice { text: text.into(), level, expires_at: Instant::now() + NOTICE_TTL });
    }

    /// Current notice, if it has not expired
    pub fn active_notice(&self) -> Option<&Notice> {
        self.notice.as_ref().filter(|notice| notice.expires_at > Instant::now())
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_add(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_sub(lines);
    }

    /// Follow the newest output again
    pub fn scroll_to_bottom(&mut self) {
        self.scroll = 0;
    }
}
