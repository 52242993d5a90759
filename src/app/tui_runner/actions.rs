use std::path::Path;

use crate::app::{export_dir, round_export_dir, SigningSession};
use crate::receipt;
use crate::state_machine::{SessionSnapshot, WorkflowEvent};
use crate::transmission::ShareOutcome;
use crate::tui::{Action, Event, PointerAction, TuiApp};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub fn handle_event(
    session: &mut SigningSession,
    app: &mut TuiApp,
    event: Event,
    snapshot: &SessionSnapshot,
    out: Option<&Path>,
) -> Flow {
    match event {
        Event::Key(key) => {
            let action = app.handle_key(key, snapshot);
            perform(session, app, action, snapshot, out)
        }
        Event::Paste(text) => {
            let action = app.handle_paste(&text, snapshot);
            perform(session, app, action, snapshot, out)
        }
        Event::Mouse(mouse) => {
            let pointer = app.handle_mouse(mouse, snapshot.state);
            apply_pointer(session, pointer);
            Flow::Continue
        }
        Event::Tick | Event::Resize => Flow::Continue,
    }
}

fn apply_pointer(session: &mut SigningSession, pointer: PointerAction) {
    if pointer == PointerAction::None {
        return;
    }
    let Some(mut surface) = session.controller.surface() else {
        return;
    };
    match pointer {
        PointerAction::Down(sample) => {
            surface.pointer_down(&sample);
        }
        PointerAction::Move(sample) => {
            surface.pointer_move(&sample);
        }
        PointerAction::Up => {
            surface.pointer_up();
        }
        PointerAction::Leave => {
            surface.pointer_leave();
        }
        PointerAction::None => {}
    }
}

fn perform(
    session: &mut SigningSession,
    app: &mut TuiApp,
    action: Action,
    snapshot: &SessionSnapshot,
    out: Option<&Path>,
) -> Flow {
    match action {
        Action::None => {}
        Action::Quit => return Flow::Quit,
        Action::Apply(command) => {
            let events = session.controller.apply(command);
            app.status = status_for(&events);
        }
        Action::ClearSignature => {
            if let Some(mut surface) = session.controller.surface() {
                surface.clear();
                app.status = Some("Signature cleared".to_string());
            }
        }
        Action::Export => {
            app.status = Some(export(session, snapshot, out));
        }
    }
    Flow::Continue
}

fn export(session: &SigningSession, snapshot: &SessionSnapshot, out: Option<&Path>) -> String {
    let result = export_dir(out, &snapshot.session_id)
        .map(|base| round_export_dir(&base, session.logger.run_id()))
        .and_then(|dir| receipt::export(snapshot, &dir).map(|exported| (dir, exported)));
    match result {
        Ok((dir, exported)) => {
            session.logger.log_export(&dir);
            format!("Exported {}", exported.receipt_path.display())
        }
        Err(e) => {
            tracing::warn!("Receipt export failed: {:#}", e);
            format!("Export failed: {}", e)
        }
    }
}

/// Feedback line for the events of one command. `None` clears the line.
pub fn status_for(events: &[WorkflowEvent]) -> Option<String> {
    events.iter().rev().find_map(|event| match event {
        WorkflowEvent::ValidationFailed { missing } => {
            let names: Vec<String> = missing.iter().map(ToString::to_string).collect();
            Some(format!("Please provide: {}", names.join(", ")))
        }
        WorkflowEvent::LinkShared { link, outcome } => Some(match outcome {
            ShareOutcome::Ok => format!("Link sent: {}", link.url),
            ShareOutcome::Failed { reason } => format!("Could not send link: {}", reason),
        }),
        WorkflowEvent::Signed { .. } => Some("Signed. Thank you.".to_string()),
        WorkflowEvent::SessionReset => Some("Ready for a new signing".to_string()),
        _ => None,
    })
}
