//! Events emitted by the controller after processing commands.
//!
//! Returned to the caller as the diff of each command, and written to the
//! structured log. Renderers read state from `SessionSnapshot`, not from
//! these.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::session::WorkflowState;
use crate::transmission::{ShareLink, ShareOutcome};
use crate::validation::Requirement;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum WorkflowEvent {
    StateChanged {
        from: WorkflowState,
        to: WorkflowState,
    },
    DocumentEdited,
    SignerEdited,
    AgreementChanged {
        agreed: bool,
    },
    /// Submit was refused; state stays `Signing`
    ValidationFailed {
        missing: Vec<Requirement>,
    },
    /// The signing time was stamped on entering `Completed`
    Signed {
        at: DateTime<Utc>,
    },
    LinkShared {
        link: ShareLink,
        outcome: ShareOutcome,
    },
    /// Signer data cleared for a new signing round
    SessionReset,
    /// The signature changed through the surface
    SurfaceUpdated {
        strokes: usize,
        has_artifact: bool,
    },
    /// The command is not valid in the current state and had no effect
    CommandIgnored {
        command: &'static str,
        state: WorkflowState,
    },
}

impl WorkflowEvent {
    /// Whether the event reflects a change to the session record.
    pub fn mutates_session(&self) -> bool {
        match self {
            Self::StateChanged { .. }
            | Self::DocumentEdited
            | Self::SignerEdited
            | Self::AgreementChanged { .. }
            | Self::Signed { .. }
            | Self::SessionReset
            | Self::SurfaceUpdated { .. } => true,
            Self::ValidationFailed { .. } | Self::LinkShared { .. } | Self::CommandIgnored { .. } => {
                false
            }
        }
    }
}
