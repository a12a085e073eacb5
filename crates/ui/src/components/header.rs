use crate::{surface::Surface, theme::Theme};

use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

/// One-line header: conversation id, routing mode, selected base and lifecycle state
pub struct Header<'a> {
    surface: &'a Surface,
}

impl<'a> Header<'a> {
    pub fn new(surface: &'a Surface) -> Self {
        Self { surface }
    }

    pub fn line(&self) -> Line<'static> {
        let context = self.surface.controller().context();
        let separator = || Span::styled(" │ ", Style::default().fg(Theme::BORDER));

        let mut spans = vec![
            Span::styled("parlor", Style::default().fg(Theme::BLUE)),
            separator(),
            Span::styled(context.conversation_id().to_string(), Style::default().fg(Theme::COMMENT)),
            separator(),
            Theme::knowledge_span(context.knowledge_mode()),
        ];

        if context.knowledge_mode() {
            let name = self.surface.catalog().name_of(context.knowledge_base());
            spans.push(Span::styled(" @ ", Style::default().fg(Theme::MUTED)));
            spans.push(Span::styled(name, Style::default().fg(Theme::CYAN)));
        }

        spans.push(separator());
        spans.push(Theme::state_span(self.surface.state()));
        Line::from(spans)
    }

    pub fn render(&self, frame: &mut Frame<'_>, area: Rect) {
        frame.render_widget(Paragraph::new(self.line()).style(Theme::panel()), area);
    }
}
