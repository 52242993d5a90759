mod actions;

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

use super::SigningSession;
use crate::tui::{surface_origin, surface_width, Event, EventHandler, TuiApp};

use actions::{handle_event, Flow};

type Terminal = ratatui::Terminal<ratatui::backend::CrosstermBackend<std::io::Stdout>>;

pub fn restore_terminal(terminal: &mut Terminal) -> Result<()> {
    crossterm::terminal::disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        crossterm::event::DisableBracketedPaste,
        crossterm::terminal::LeaveAlternateScreen,
        crossterm::event::DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

pub async fn run_tui(mut session: SigningSession, out: Option<PathBuf>) -> Result<()> {
    crossterm::terminal::enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    crossterm::execute!(
        stdout,
        crossterm::terminal::EnterAlternateScreen,
        crossterm::event::EnableMouseCapture,
        crossterm::event::EnableBracketedPaste
    )?;

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Best-effort terminal restoration
        let _ = crossterm::terminal::disable_raw_mode();
        let _ = crossterm::execute!(
            std::io::stdout(),
            crossterm::terminal::LeaveAlternateScreen,
            crossterm::event::DisableMouseCapture,
            crossterm::event::DisableBracketedPaste,
            crossterm::cursor::Show
        );
        original_hook(panic_info);
    }));

    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut session, out).await;

    restore_terminal(&mut terminal)?;
    println!("Session log: {}", session.logger.path().display());
    result
}

async fn event_loop(
    terminal: &mut Terminal,
    session: &mut SigningSession,
    out: Option<PathBuf>,
) -> Result<()> {
    let mut event_handler = EventHandler::new(Duration::from_millis(100));
    let mut app = TuiApp::new();

    #[cfg(unix)]
    let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        .context("Failed to create SIGTERM handler")?;

    loop {
        let snapshot = session.snapshots.borrow_and_update().clone();
        terminal.draw(|frame| crate::tui::ui::draw(frame, &mut app, &snapshot))?;
        fit_surface(session, &app, snapshot.surface_size.0);

        #[cfg(unix)]
        let event = tokio::select! {
            event = event_handler.next() => event?,
            _ = sigterm.recv() => break,
        };
        #[cfg(not(unix))]
        let event = event_handler.next().await?;

        if matches!(event, Event::Tick) {
            continue;
        }
        let snapshot = session.snapshots.borrow().clone();
        if handle_event(session, &mut app, event, &snapshot, out.as_deref()) == Flow::Quit {
            break;
        }
    }

    Ok(())
}

/// Keeps the signature surface matched to the canvas drawn in the last frame.
/// A width change refits the surface, which erases the drawing.
fn fit_surface(session: &mut SigningSession, app: &TuiApp, current_width: u32) {
    let Some(area) = app.surface_area else {
        return;
    };
    let Some(mut surface) = session.controller.surface() else {
        return;
    };

    surface.set_origin(surface_origin(area));
    let width = surface_width(area);
    if width != current_width {
        tracing::debug!("Fitting signature surface to {} units", width);
        surface.resize(width);
    }
}
