use crate::{
    state::{AppState, NoticeLevel},
    surface::{Affordances, PrimaryAction},
    theme::Theme,
};

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Paragraph},
};

/// Footer: input card with the primary action, then a row with either the
/// current notice or key hints
pub struct Footer<'a> {
    state: &'a AppState,
    affordances: Affordances,
}

impl<'a> Footer<'a> {
    pub fn new(state: &'a AppState, affordances: Affordances) -> Self {
        Self { state, affordances }
    }

    pub fn render(&self, frame: &mut Frame<'_>, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Length(1)])
            .split(area);

        self.render_input_card(frame, rows[0]);

        let status = match self.state.active_notice() {
            Some(notice) => {
                let color = match notice.level {
                    NoticeLevel::Info => Theme::GREEN,
                    NoticeLevel::Warning => Theme::YELLOW,
                    NoticeLevel::Error => Theme::RED,
                };
                Paragraph::new(Line::from(Span::styled(notice.text.clone(), Style::default().fg(color))))
            }
            None => Paragraph::new(self.hints()).alignment(Alignment::Right),
        };
        frame.render_widget(status.style(Theme::base()), rows[1]);
    }

    fn render_input_card(&self, frame: &mut Frame<'_>, area: Rect) {
        if area.width < 10 || area.height < 1 {
            return;
        }

        frame.render_widget(Block::default().style(Theme::panel()), area);

        let accent_width = 2;
        let accent_color = match self.affordances.primary {
            PrimaryAction::Send => Theme::BLUE,
            PrimaryAction::Interrupt => Theme::YELLOW,
        };
        let accent_area = Rect { x: area.x, y: area.y, width: accent_width, height: area.height };
        frame.render_widget(Block::default().style(Style::default().bg(accent_color)), accent_area);

        let label = format!("[{}]", self.affordances.primary.label());
        let label_width = label.chars().count() as u16;
        let input_area = Rect {
            x: area.x + accent_width + 1,
            y: area.y + 1,
            width: area.width.saturating_sub(accent_width + label_width + 3),
            height: 1,
        };
        let label_area = Rect {
            x: area.x + area.width.saturating_sub(label_width + 1),
            y: area.y + 1,
            width: label_width,
            height: 1,
        };

        frame.render_widget(Paragraph::new(self.input_line()), input_area);
        frame.render_widget(
            Paragraph::new(Span::styled(label, Style::default().fg(accent_color).bg(Theme::PANEL_BG))),
            label_area,
        );
    }

    fn input_line(&self) -> Line<'static> {
        let input = &self.state.input;
        let text_style = Style::default().fg(Theme::FG).bg(Theme::PANEL_BG);
        let cursor = Span::styled("█", Style::default().fg(Theme::FG).bg(Theme::FG));

        if input.is_empty() {
            let placeholder = if self.affordances.input_focused { "Ask me anything..." } else { "Waiting for reply..." };
            return Line::from(vec![
                Span::styled(placeholder, Style::default().fg(Theme::MUTED).bg(Theme::PANEL_BG)),
                cursor,
            ]);
        }

        Line::from(vec![
            Span::styled(input.before_cursor().to_string(), text_style),
            cursor,
            Span::styled(input.after_cursor().to_string(), text_style),
        ])
    }

    fn hints(&self) -> Line<'static> {
        let key = |k: &'static str| Span::styled(k, Style::default().fg(Theme::BLUE));
        let text = |t: &'static str| Span::styled(t, Style::default().fg(Theme::MUTED));

        let mut spans = vec![key("[Enter]"), text(" send  ")];
        if self.affordances.primary == PrimaryAction::Interrupt {
            spans = vec![key("[Esc]"), text(" interrupt  ")];
        }
        if self.affordances.can_copy {
            spans.extend([key("[^Y]"), text(" copy  "), key("[^R]"), text(" regenerate  ")]);
        }
        spans.extend([key("[^K]"), text(" knowledge  "), key("[/help]"), text(" commands  "), key("[^C]"), text(" quit")]);
        Line::from(spans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::LifecycleState;
    use ratatui::{Terminal, backend::TestBackend};

    fn render(state: &AppState, affordances: Affordances) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 4)).unwrap();
        terminal
            .draw(|frame| Footer::new(state, affordances).render(frame, frame.area()))
            .unwrap();
        terminal.backend().buffer().content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_idle_footer_shows_send() {
        let rendered = render(&AppState::new(), Affordances::for_state(LifecycleState::Idle));
        assert!(rendered.contains("[Send]"));
        assert!(rendered.contains("Ask me anything..."));
        assert!(rendered.contains("copy"));
    }

    #[test]
    fn test_busy_footer_shows_interrupt() {
        let rendered = render(&AppState::new(), Affordances::for_state(LifecycleState::Revealing));
        assert!(rendered.contains("[Interrupt]"));
        assert!(rendered.contains("interrupt"));
        assert!(!rendered.contains("regenerate"));
    }

    #[test]
    fn test_notice_replaces_hints() {
        let mut state = AppState::new();
        state.notify(NoticeLevel::Info, "Copied to clipboard");
        let rendered = render(&state, Affordances::for_state(LifecycleState::Idle));
        assert!(rendered.contains("Copied to clipboard"));
        assert!(!rendered.contains("[^K]"));
    }

    #[test]
    fn test_input_line_splits_at_cursor() {
        let mut state = AppState::new();
        for c in "latte".chars() {
            state.input.insert_char(c);
        }
        state.input.move_left();
        let footer = Footer::new(&state, Affordances::for_state(LifecycleState::Idle));
        assert_eq!(footer.input_line().to_string(), "latt█e");
    }
}
