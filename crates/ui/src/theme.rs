use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;

use crate::lifecycle::LifecycleState;

/// Espresso palette for the parlor TUI
#[derive(Debug, Clone, Copy)]
pub struct Theme;

impl Theme {
    pub const BG: Color = Color::Rgb(28, 23, 20);
    pub const FG: Color = Color::Rgb(226, 214, 198);
    /// Header and input card
    pub const PANEL_BG: Color = Color::Rgb(43, 35, 30);
    /// Record labels and timestamps
    pub const COMMENT: Color = Color::Rgb(140, 122, 106);
    pub const BLUE: Color = Color::Rgb(126, 164, 178);
    pub const CYAN: Color = Color::Rgb(132, 186, 170);
    pub const PURPLE: Color = Color::Rgb(176, 142, 180);
    pub const GREEN: Color = Color::Rgb(160, 182, 118);
    pub const YELLOW: Color = Color::Rgb(222, 170, 98);
    pub const RED: Color = Color::Rgb(214, 104, 92);
    pub const MUTED: Color = Color::Rgb(118, 104, 92);
    pub const BORDER: Color = Color::Rgb(74, 60, 50);

    pub fn base() -> Style {
        Style::new().fg(Self::FG).bg(Self::BG)
    }

    pub fn panel() -> Style {
        Style::new().fg(Self::FG).bg(Self::PANEL_BG)
    }

    /// Foreground-only emphasis on top of whatever background is underneath
    pub fn accent(color: Color) -> Style {
        Style::new().fg(color).add_modifier(Modifier::BOLD)
    }

    pub fn state_color(state: LifecycleState) -> Color {
        match state {
            LifecycleState::Idle => Self::GREEN,
            LifecycleState::Pending => Self::YELLOW,
            LifecycleState::Revealing => Self::CYAN,
        }
    }

    pub fn state_span(state: LifecycleState) -> Span<'static> {
        Span::styled(state.as_str(), Self::accent(Self::state_color(state)))
    }

    pub fn knowledge_span(enabled: bool) -> Span<'static> {
        match enabled {
            true => Span::styled("knowledge", Self::accent(Self::PURPLE)),
            false => Span::styled("plain", Style::new().fg(Self::MUTED)),
        }
    }
}
