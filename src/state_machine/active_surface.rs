//! Borrowed handle to the signature surface while a session is signing.

use tokio::sync::watch;

use super::{SessionSnapshot, WorkflowEvent};
use crate::session::{SessionRecord, WorkflowState};
use crate::structured_logger::StructuredLogger;
use crate::surface::{PagePoint, PointerSample, SignatureSurface};

/// Handed out by `WorkflowController::surface()` only in `Signing`.
///
/// Holds mutable borrows of the surface and of the session record, so no
/// transition can happen while it is alive. Every change to the signature
/// bumps the record version and broadcasts a snapshot.
pub struct ActiveSurface<'a> {
    surface: &'a mut SignatureSurface,
    record: &'a mut SessionRecord,
    snapshot_tx: &'a watch::Sender<SessionSnapshot>,
    logger: &'a StructuredLogger,
}

impl<'a> ActiveSurface<'a> {
    pub(super) fn new(
        surface: &'a mut SignatureSurface,
        record: &'a mut SessionRecord,
        snapshot_tx: &'a watch::Sender<SessionSnapshot>,
        logger: &'a StructuredLogger,
    ) -> Self {
        Self {
            surface,
            record,
            snapshot_tx,
            logger,
        }
    }

    pub fn pointer_down(&mut self, sample: &PointerSample) -> bool {
        let accepted = self.surface.begin(sample);
        self.logger.log_pointer("down", accepted);
        if accepted {
            self.publish();
        }
        accepted
    }

    pub fn pointer_move(&mut self, sample: &PointerSample) -> bool {
        let accepted = self.surface.extend(sample);
        if accepted {
            self.publish();
        }
        accepted
    }

    pub fn pointer_up(&mut self) -> bool {
        self.close_stroke("up")
    }

    /// The pointer left the surface; an open stroke ends here.
    pub fn pointer_leave(&mut self) -> bool {
        self.close_stroke("leave")
    }

    pub fn clear(&mut self) {
        self.surface.clear(&mut self.record.signature);
        self.commit();
    }

    /// Fits the surface to its container's width. Erases the drawing; see
    /// [`SignatureSurface::resize`].
    pub fn resize(&mut self, width: u32) {
        self.surface.resize(&mut self.record.signature, width);
        self.commit();
    }

    pub fn set_origin(&mut self, origin: PagePoint) {
        self.surface.set_origin(origin);
    }

    fn close_stroke(&mut self, action: &str) -> bool {
        let closed = self.surface.end(&mut self.record.signature);
        self.logger.log_pointer(action, closed);
        if closed {
            self.commit();
        }
        closed
    }

    fn commit(&mut self) {
        self.record.bump_version();
        let event = WorkflowEvent::SurfaceUpdated {
            strokes: self.record.signature.strokes.len(),
            has_artifact: self.record.signature.artifact.is_some(),
        };
        self.logger.log_event(self.record.version(), &event);
        self.publish();
    }

    fn publish(&self) {
        self.snapshot_tx.send_replace(SessionSnapshot::capture(
            WorkflowState::Signing,
            &*self.record,
            &*self.surface,
        ));
    }
}
