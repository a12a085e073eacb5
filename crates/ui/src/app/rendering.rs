use super::App;
use crate::components::{Footer, Header};
use crate::layout::TuiLayout;
use crate::theme::Theme;
use crate::transcript::TranscriptView;

use ratatui::{Frame, layout::Position, widgets::Block};
use unicode_width::UnicodeWidthStr;

pub fn render(app: &App, frame: &mut Frame<'_>) {
    let size = frame.area();
    frame.render_widget(Block::default().style(Theme::base()), size);

    let layout = TuiLayout::calculate(size);
    Header::new(&app.surface).render(frame, layout.header);
    TranscriptView::new(app.surface.transcript()).render(frame, layout.transcript, app.state.scroll);

    let affordances = app.surface.affordances();
    Footer::new(&app.state, affordances).render(frame, layout.footer);

    if affordances.input_focused && layout.footer.height > 1 {
        let typed = app.state.input.before_cursor().width() as u16;
        frame.set_cursor_position(Position::new(layout.footer.x + 3 + typed, layout.footer.y + 1));
    }
}
