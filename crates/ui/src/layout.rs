use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Height of the footer: input card (3) plus the hint/notice row
pub const FOOTER_HEIGHT: u16 = 4;

/// Calculated layout for the TUI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TuiLayout {
    /// Header area (1 line)
    pub header: Rect,
    /// Main transcript area
    pub transcript: Rect,
    /// Input and hints
    pub footer: Rect,
}

impl TuiLayout {
    pub fn calculate(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0), Constraint::Length(FOOTER_HEIGHT)])
            .split(area);

        Self { header: chunks[0], transcript: chunks[1], footer: chunks[2] }
    }
}
