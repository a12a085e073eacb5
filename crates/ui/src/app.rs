mod event_loop;
mod keybinds;
mod rendering;

use crate::state::AppState;
use crate::surface::Surface;
use crate::transcript::TranscriptChange;

use ratatui::{Frame, Terminal, backend::Backend};
use tokio::sync::mpsc;

/// Main TUI application
///
/// Owns the interaction surface and the front-end state (input line, notice,
/// scroll). Everything shown in the transcript pane is read from the surface's
/// store on each draw.
pub struct App {
    surface: Surface,
    state: AppState,
    changes: mpsc::UnboundedReceiver<TranscriptChange>,
}

impl App {
    pub fn new(mut surface: Surface) -> Self {
        let changes = surface.subscribe();
        Self { surface, state: AppState::new(), changes }
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    pub fn should_exit(&self) -> bool {
        self.state.should_exit
    }

    /// Load the knowledge-base catalog, then run the terminal UI until quit
    pub async fn run(&mut self) -> std::io::Result<()> {
        self.surface.refresh_knowledge_bases().await;
        event_loop::run(self).await
    }

    /// Handle a terminal event
    pub async fn handle_event(&mut self, event: crossterm::event::Event) {
        keybinds::handle_event(self, event).await;
    }

    /// Draw one frame
    pub fn render(&self, frame: &mut Frame<'_>) {
        rendering::render(self, frame);
    }

    pub fn draw<B: Backend>(&self, terminal: &mut Terminal<B>) -> std::io::Result<()> {
        terminal
            .draw(|frame| self.render(frame))
            .map_err(|e| std::io::Error::other(e.to_string()))?;
        Ok(())
    }

    /// Drop queued change notifications; the next draw reads the store directly
    fn drain_changes(&mut self) -> usize {
        let mut drained = 0;
        while self.changes.try_recv().is_ok() {
            drained += 1;
        }
        drained
    }
}
