//! Workflow controller for a signing session.
//!
//! This module is the ONLY place session transitions happen. The controller
//! owns the session record and the signature surface, validates commands,
//! emits events, and broadcasts snapshots to renderers via a watch channel.

mod active_surface;
mod commands;
mod events;
mod snapshot;

pub use active_surface::ActiveSurface;
pub use commands::WorkflowCommand;
pub use events::WorkflowEvent;
pub use snapshot::SessionSnapshot;

use crate::config::SigningConfig;
use crate::session::{Document, SessionRecord, WorkflowState};
use crate::structured_logger::StructuredLogger;
use crate::surface::SignatureSurface;
use crate::transmission::{self, LinkChannel};
use crate::validation;
use chrono::{DateTime, Local, Utc};
use std::fmt::Write;
use std::sync::Arc;
use tokio::sync::watch;

/// Finite-state machine driving authoring, preview, signing and completion.
///
/// `Editing -> PreviewReady -> Signing -> Completed -> Editing`, with
/// `PreviewReady -> Editing` as the only backward edge. Commands that are not
/// valid in the current state are ignored.
pub struct WorkflowController {
    state: WorkflowState,
    record: SessionRecord,
    surface: SignatureSurface,
    channel: Box<dyn LinkChannel>,
    share_base_url: String,
    snapshot_tx: watch::Sender<SessionSnapshot>,
    logger: Arc<StructuredLogger>,
}

impl WorkflowController {
    /// Creates a controller in `Editing` for the given document.
    ///
    /// The creation time is captured here, once, for display on the receipt.
    /// Returns the controller and a watch receiver for session snapshots.
    pub fn new(
        session_id: &str,
        document: Document,
        config: &SigningConfig,
        channel: Box<dyn LinkChannel>,
        logger: Arc<StructuredLogger>,
    ) -> (Self, watch::Receiver<SessionSnapshot>) {
        let created_display = format_created(Local::now(), &config.receipt.timestamp_format);
        let record = SessionRecord::new(session_id, document, created_display);
        let surface = SignatureSurface::new(&config.surface);
        let state = WorkflowState::Editing;
        let (snapshot_tx, snapshot_rx) =
            watch::channel(SessionSnapshot::capture(state, &record, &surface));

        let controller = Self {
            state,
            record,
            surface,
            channel,
            share_base_url: config.share.base_url.clone(),
            snapshot_tx,
            logger,
        };

        (controller, snapshot_rx)
    }

    /// All session mutations go through this single method.
    /// Returns the events produced; broadcasts a snapshot if anything changed.
    pub fn apply(&mut self, command: WorkflowCommand) -> Vec<WorkflowEvent> {
        self.logger.log_command(self.record.version(), &command);

        let events = self.apply_internal(command);

        let changed = events.iter().any(WorkflowEvent::mutates_session);
        if changed {
            self.record.bump_version();
        }
        for event in &events {
            self.logger.log_event(self.record.version(), event);
        }
        if changed {
            self.publish();
        }

        events
    }

    fn apply_internal(&mut self, command: WorkflowCommand) -> Vec<WorkflowEvent> {
        use WorkflowCommand::*;
        use WorkflowEvent::*;

        match (self.state, command) {
            (WorkflowState::Editing, RequestPreview) => {
                vec![self.transition(WorkflowState::PreviewReady)]
            }

            (WorkflowState::PreviewReady, EditAgain) => {
                vec![self.transition(WorkflowState::Editing)]
            }

            (WorkflowState::PreviewReady, EnterSigning) => {
                self.surface.activate(&mut self.record.signature);
                vec![self.transition(WorkflowState::Signing)]
            }

            (WorkflowState::PreviewReady, ShareLink) => {
                let link = transmission::ShareLink::for_session(
                    &self.share_base_url,
                    &self.record.session_id,
                );
                let outcome = self.channel.share_link(&link);
                vec![LinkShared { link, outcome }]
            }

            (WorkflowState::Signing, Submit) => self.submit(Utc::now()),

            (WorkflowState::Completed, Reset) => {
                // The document is kept on purpose: the same text can be signed again.
                self.record.clear_signing_round();
                self.logger.increment_run_id();
                vec![SessionReset, self.transition(WorkflowState::Editing)]
            }

            (WorkflowState::Editing, SetTitle { title }) => {
                self.record.document.title = title;
                vec![DocumentEdited]
            }

            (WorkflowState::Editing, SetBody { body }) => {
                self.record.document.body = body;
                vec![DocumentEdited]
            }

            (WorkflowState::Signing, SetSignerName { name }) => {
                self.record.signer.name = name;
                vec![SignerEdited]
            }

            (WorkflowState::Signing, SetSignerPhone { phone }) => {
                self.record.signer.phone = phone;
                vec![SignerEdited]
            }

            (WorkflowState::Signing, SetAgreed { agreed }) => {
                self.record.agreed = agreed;
                vec![AgreementChanged { agreed }]
            }

            (WorkflowState::Signing, ToggleAgreed) => {
                self.record.agreed = !self.record.agreed;
                vec![AgreementChanged {
                    agreed: self.record.agreed,
                }]
            }

            (state, command) => {
                tracing::debug!("Ignoring {} in state {:?}", command.name(), state);
                vec![CommandIgnored {
                    command: command.name(),
                    state,
                }]
            }
        }
    }

    fn submit(&mut self, now: DateTime<Utc>) -> Vec<WorkflowEvent> {
        if let Err(failure) = validation::validate(&self.record) {
            tracing::debug!("Submit refused: {}", failure);
            return vec![WorkflowEvent::ValidationFailed {
                missing: failure.missing,
            }];
        }

        let stamped = self.record.mark_signed(now);
        let mut events = vec![self.transition(WorkflowState::Completed)];
        if stamped {
            events.push(WorkflowEvent::Signed { at: now });
        } else {
            tracing::warn!("Signing time already set for this round; keeping it");
        }
        events
    }

    fn transition(&mut self, to: WorkflowState) -> WorkflowEvent {
        let from = self.state;
        if from == WorkflowState::Signing {
            self.surface.deactivate();
        }
        self.state = to;
        WorkflowEvent::StateChanged { from, to }
    }

    /// Pointer access to the signature surface. Only available while
    /// `Signing`; the handle borrows the controller, so it cannot outlive a
    /// transition.
    pub fn surface(&mut self) -> Option<ActiveSurface<'_>> {
        if self.state != WorkflowState::Signing {
            return None;
        }
        Some(ActiveSurface::new(
            &mut self.surface,
            &mut self.record,
            &self.snapshot_tx,
            &self.logger,
        ))
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    #[cfg(test)]
    pub fn record(&self) -> &SessionRecord {
        &self.record
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::capture(self.state, &self.record, &self.surface)
    }

    fn publish(&self) {
        self.snapshot_tx.send_replace(self.snapshot());
    }
}

/// Formats the session creation time, falling back to RFC 3339 when the
/// configured format string is not valid.
fn format_created(now: DateTime<Local>, format: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", now.format(format)).is_err() {
        tracing::warn!("Invalid receipt timestamp format '{}'", format);
        return now.to_rfc3339();
    }
    out
}
