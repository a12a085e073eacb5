use super::App;
use crate::event_handler::EventHandler;

use crossterm::{cursor, execute, terminal};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::{panic, time::Duration};

/// Poll interval for terminal input
const INPUT_POLL: Duration = Duration::from_millis(16);

/// Raw mode and the alternate screen, undone on drop
struct Screen {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl Screen {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(io::stdout(), terminal::EnterAlternateScreen)?;

        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            leave();
            previous(info);
        }));

        let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        terminal.clear()?;
        Ok(Self { terminal })
    }
}

impl Drop for Screen {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        leave();
    }
}

fn leave() {
    let _ = terminal::disable_raw_mode();
    let _ = execute!(io::stdout(), terminal::LeaveAlternateScreen, cursor::Show);
}

/// Drive the TUI: terminal input, lifecycle events from the controller, and
/// transcript changes that call for a redraw
pub async fn run(app: &mut App) -> io::Result<()> {
    let mut screen = Screen::enter()?;
    app.draw(&mut screen.terminal)?;

    while !app.should_exit() {
        let input = async {
            tokio::time::sleep(INPUT_POLL).await;
            EventHandler::read()
        };

        tokio::select! {
            polled = input => match polled {
                Some(event) => {
                    app.handle_event(event).await;
                    app.draw(&mut screen.terminal)?;
                }
                None if app.state.notice.is_some() && app.state.active_notice().is_none() => {
                    app.state.notice = None;
                    app.draw(&mut screen.terminal)?;
                }
                None => {}
            },
            Some(event) = app.surface.next_lifecycle_event() => {
                app.surface.handle_lifecycle_event(event);
            }
            Some(_) = app.changes.recv() => {
                app.drain_changes();
                app.draw(&mut screen.terminal)?;
            }
        }
    }

    app.surface.controller_mut().cancel();
    Ok(())
}
