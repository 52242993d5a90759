//! Session data owned by the workflow controller.
//!
//! A [`SessionRecord`] is the single mutable resource of a signing session.
//! It is never shared: the controller owns it and hands out read-only
//! snapshots for rendering.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::surface::Artifact;

/// Title used when no document is configured.
pub const DEFAULT_TITLE: &str = "Consent to Personal Data Use and Service Terms";

/// Body used when no document is configured.
pub const DEFAULT_BODY: &str = "In using the company's services, I agree to the following.

1. Review of service usage history
2. Collection and use of personal information
3. Recognition of legal effect through electronic signature

I have fully read and understood the above and agree to it.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    pub body: String,
}

impl Document {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new(DEFAULT_TITLE, DEFAULT_BODY)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerInfo {
    pub name: String,
    pub phone: String,
}

/// A point in surface-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokePoint {
    pub x: f32,
    pub y: f32,
}

impl StrokePoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// One continuous pointer-down-to-pointer-up path.
pub type Stroke = Vec<StrokePoint>;

/// Recorded strokes plus the encoded raster derived from them.
///
/// `artifact` is `None` until a stroke has been closed, and again after
/// `clear` or a resize of the surface.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Signature {
    pub strokes: Vec<Stroke>,
    pub artifact: Option<Artifact>,
}

impl Signature {
    pub fn clear(&mut self) {
        self.strokes.clear();
        self.artifact = None;
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty() && self.artifact.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowState {
    Editing,
    PreviewReady,
    Signing,
    Completed,
}

/// Who the current screen is meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    Operator,
    Signer,
}

impl WorkflowState {
    pub fn label(&self) -> &'static str {
        match self {
            WorkflowState::Editing => "Editing",
            WorkflowState::PreviewReady => "Ready to send",
            WorkflowState::Signing => "Signing",
            WorkflowState::Completed => "Completed",
        }
    }

    pub fn audience(&self) -> Audience {
        match self {
            WorkflowState::Editing => Audience::Operator,
            _ => Audience::Signer,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    pub session_id: String,
    /// Locale-formatted creation time, captured once per controller.
    pub created_display: String,
    pub document: Document,
    pub signer: SignerInfo,
    pub signature: Signature,
    pub agreed: bool,
    signed_at: Option<DateTime<Utc>>,
    version: u64,
}

impl SessionRecord {
    pub fn new(session_id: &str, document: Document, created_display: String) -> Self {
        Self {
            session_id: session_id.to_string(),
            created_display,
            document,
            signer: SignerInfo::default(),
            signature: Signature::default(),
            agreed: false,
            signed_at: None,
            version: 0,
        }
    }

    pub fn signed_at(&self) -> Option<DateTime<Utc>> {
        self.signed_at
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn bump_version(&mut self) {
        self.version += 1;
    }

    /// Stamps the signing time. Returns false if it was already stamped
    /// in this signing round.
    pub fn mark_signed(&mut self, at: DateTime<Utc>) -> bool {
        if self.signed_at.is_some() {
            return false;
        }
        self.signed_at = Some(at);
        true
    }

    /// Clears everything collected from the signer. The document stays so
    /// the same text can be signed again.
    pub fn clear_signing_round(&mut self) {
        self.signer = SignerInfo::default();
        self.signature.clear();
        self.agreed = false;
        self.signed_at = None;
    }
}
