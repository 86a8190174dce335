use super::App;
use crate::event_handler::EventHandler;
use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste};
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::Result;
use std::{panic, time::Duration};

/// Run the chat view until the user quits.
///
/// History replay runs on its own task so a slow service never freezes the
/// view; the composer stays disabled until it lands.
pub async fn run(app: &mut App) -> Result<()> {
    enable_raw_mode()?;
    crossterm::execute!(std::io::stdout(), EnterAlternateScreen, EnableBracketedPaste)?;

    let backend = CrosstermBackend::new(std::io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let backend = CrosstermBackend::new(std::io::stdout());
        if let Ok(mut terminal) = Terminal::new(backend) {
            let _ = terminal.show_cursor();
        }
        let _ = disable_raw_mode();
        let _ = crossterm::execute!(std::io::stdout(), DisableBracketedPaste, LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let history = app.session().spawn_start();

    terminal.clear()?;
    app.sync();
    terminal.draw(|frame| app.render(frame))?;

    let mut tick = tokio::time::interval(Duration::from_millis(50));

    while !app.state().should_exit {
        tokio::select! {
            _ = tick.tick() => {
                let mut dirty = false;
                while let Some(event) = EventHandler::read()? {
                    app.handle_event(event);
                    dirty = true;
                    if app.state().should_exit {
                        break;
                    }
                }
                if dirty {
                    terminal.draw(|frame| app.render(frame))?;
                }
            }
            changed = app.store_rx.changed() => {
                if changed.is_ok() {
                    app.sync();
                    terminal.draw(|frame| app.render(frame))?;
                }
            }
            changed = app.busy_rx.changed() => {
                if changed.is_ok() {
                    app.sync();
                    terminal.draw(|frame| app.render(frame))?;
                }
            }
            changed = app.history_rx.changed() => {
                if changed.is_ok() {
                    app.sync();
                    terminal.draw(|frame| app.render(frame))?;
                }
            }
        }
    }

    app.shutdown();
    if let Some(history) = history {
        history.abort();
    }

    terminal.show_cursor()?;
    disable_raw_mode()?;
    crossterm::execute!(std::io::stdout(), DisableBracketedPaste, LeaveAlternateScreen)?;

    Ok(())
}
