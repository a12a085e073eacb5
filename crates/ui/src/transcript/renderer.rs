use crate::theme::Theme;
use crate::transcript::{MessageRecord, Phase, Role, TranscriptStore};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
};

const WAITING: &str = "Thinking...";
const REVEAL_CURSOR: &str = "▌";

/// Read-only projection of the transcript store into terminal lines.
///
/// Nothing is cached: the view is rebuilt from the store on every draw and
/// never written back.
pub struct TranscriptView<'a> {
    store: &'a TranscriptStore,
}

impl<'a> TranscriptView<'a> {
    pub fn new(store: &'a TranscriptStore) -> Self {
        Self { store }
    }

    /// Render with the last lines visible, shifted up by `scroll` lines
    pub fn render(&self, frame: &mut Frame<'_>, area: Rect, scroll: u16) {
        let content_width = area.width.saturating_sub(4) as usize;
        let lines = self.lines(content_width);

        let visible = area.height.saturating_sub(2) as usize;
        let bottom = lines.len().saturating_sub(visible);
        let offset = bottom.saturating_sub(scroll as usize);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Theme::BORDER))
            .title(Span::styled("Transcript", Style::default().fg(Theme::BLUE)));

        let paragraph = Paragraph::new(Text::from(lines))
            .block(block)
            .style(Theme::base())
            .scroll((offset.min(u16::MAX as usize) as u16, 0));

        frame.render_widget(paragraph, area);
    }

    /// All records as wrapped lines
    pub fn lines(&self, width: usize) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        for record in self.store.records() {
            render_record(record, width, &mut lines);
        }
        lines
    }
}

fn render_record(record: &MessageRecord, width: usize, lines: &mut Vec<Line<'static>>) {
    match record.role {
        Role::System => {
            lines.push(Line::from(vec![
                Span::styled("[", Style::default().fg(Theme::MUTED)),
                Span::styled("System", Style::default().fg(Theme::PURPLE)),
                Span::styled("] ", Style::default().fg(Theme::MUTED)),
            ]));
            wrap_text(&record.content, Theme::COMMENT, width, lines);
        }
        Role::User => {
            lines.push(Line::default());
            lines.push(label("You", Theme::GREEN, None));
            wrap_text(&record.content, Theme::FG, width, lines);
        }
        Role::Assistant => {
            lines.push(Line::default());
            lines.push(label("Assistant", Theme::BLUE, phase_badge(record.phase)));
            match record.phase {
                Phase::Pending => {
                    lines.push(Line::from(Span::styled(WAITING, Style::default().fg(Theme::MUTED))));
                }
                Phase::Revealing => {
                    wrap_text(&record.content, Theme::FG, width, lines);
                    let cursor = Span::styled(REVEAL_CURSOR, Style::default().fg(Theme::CYAN));
                    if record.content.is_empty() {
                        lines.push(Line::from(cursor));
                    } else if let Some(last) = lines.last_mut() {
                        last.spans.push(cursor);
                    }
                }
                Phase::Error => wrap_text(&record.content, Theme::RED, width, lines),
                Phase::Complete | Phase::Cancelled => wrap_text(&record.content, Theme::FG, width, lines),
            }
        }
    }
}

fn label(name: &'static str, color: Color, badge: Option<(&'static str, Color)>) -> Line<'static> {
    let mut spans = vec![
        Span::styled(name, Style::default().fg(color)),
        Span::styled(":", Style::default().fg(Theme::MUTED)),
    ];
    if let Some((text, badge_color)) = badge {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(text, Style::default().fg(badge_color)));
    }
    Line::from(spans)
}

fn phase_badge(phase: Phase) -> Option<(&'static str, Color)> {
    match phase {
        Phase::Cancelled => Some(("(interrupted)", Theme::YELLOW)),
        Phase::Error => Some(("(failed)", Theme::RED)),
        _ => None,
    }
}

/// Word-wrap `text` to `max_width` columns, keeping explicit newlines
fn wrap_text(text: &str, color: Color, max_width: usize, lines: &mut Vec<Line<'static>>) {
    if max_width == 0 {
        return;
    }

    for source_line in text.lines() {
        if source_line.trim().is_empty() {
            lines.push(Line::default());
            continue;
        }
        for wrapped in textwrap::wrap(source_line, max_width) {
            lines.push(Line::from(Span::styled(wrapped.into_owned(), Style::default().fg(color))));
        }
    }
}
