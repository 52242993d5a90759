//! Read-only projection of a signing session for rendering.
//!
//! Renderers NEVER mutate this; they receive new snapshots via the watch
//! channel after every change.

use chrono::{DateTime, Utc};

use crate::session::{Document, SessionRecord, SignerInfo, Stroke, WorkflowState};
use crate::surface::{Artifact, SignatureSurface};

#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub state: WorkflowState,
    /// Record version; unchanged snapshots share a version
    pub version: u64,
    pub session_id: String,
    pub created_display: String,
    pub document: Document,
    pub signer: SignerInfo,
    pub agreed: bool,
    /// Closed strokes, in drawing order
    pub strokes: Vec<Stroke>,
    /// Stroke currently under the pointer, if any
    pub pending_stroke: Option<Stroke>,
    pub artifact: Option<Artifact>,
    pub signed_at: Option<DateTime<Utc>>,
    /// Drawable (width, height) of the signature surface
    pub surface_size: (u32, u32),
}

impl SessionSnapshot {
    pub fn capture(
        state: WorkflowState,
        record: &SessionRecord,
        surface: &SignatureSurface,
    ) -> Self {
        let raster = surface.raster();
        Self {
            state,
            version: record.version(),
            session_id: record.session_id.clone(),
            created_display: record.created_display.clone(),
            document: record.document.clone(),
            signer: record.signer.clone(),
            agreed: record.agreed,
            strokes: record.signature.strokes.clone(),
            pending_stroke: surface.current_stroke().cloned(),
            artifact: record.signature.artifact.clone(),
            signed_at: record.signed_at(),
            surface_size: (raster.width(), raster.height()),
        }
    }
}
