//! Commands that can mutate a signing session.
//!
//! All session changes MUST go through the controller's `apply()` method,
//! except pointer input, which goes through `ActiveSurface`.

use serde::{Deserialize, Serialize};

/// Commands that can mutate a signing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowCommand {
    // Lifecycle
    /// Editing -> PreviewReady
    RequestPreview,
    /// PreviewReady -> Editing
    EditAgain,
    /// PreviewReady -> Signing; clears the signature and activates the surface
    EnterSigning,
    /// Signing -> Completed when validation passes
    Submit,
    /// Completed -> Editing; keeps the document, clears everything else
    Reset,

    /// Send the signing link to the counterpart (PreviewReady only)
    ShareLink,

    // Document authoring, Editing only
    SetTitle { title: String },
    SetBody { body: String },

    // Signer input, Signing only
    SetSignerName { name: String },
    SetSignerPhone { phone: String },
    SetAgreed { agreed: bool },
    ToggleAgreed,
}

impl WorkflowCommand {
    /// Stable name for logs; never includes user-entered values.
    pub fn name(&self) -> &'static str {
        match self {
            Self::RequestPreview => "request_preview",
            Self::EditAgain => "edit_again",
            Self::EnterSigning => "enter_signing",
            Self::Submit => "submit",
            Self::Reset => "reset",
            Self::ShareLink => "share_link",
            Self::SetTitle { .. } => "set_title",
            Self::SetBody { .. } => "set_body",
            Self::SetSignerName { .. } => "set_signer_name",
            Self::SetSignerPhone { .. } => "set_signer_phone",
            Self::SetAgreed { .. } => "set_agreed",
            Self::ToggleAgreed => "toggle_agreed",
        }
    }
}
