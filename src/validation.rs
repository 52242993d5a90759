//! Submission gate for a signing session.
//!
//! Evaluated on every submit, never cached: the signer may have cleared the
//! surface or edited a field since the submit control was last rendered.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::session::SessionRecord;

/// A condition that must hold before a session can be submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Requirement {
    SignerName,
    SignerPhone,
    Signature,
    Agreement,
}

impl Display for Requirement {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::SignerName => "signer name",
            Self::SignerPhone => "phone number",
            Self::Signature => "signature",
            Self::Agreement => "consent",
        };
        f.write_str(text)
    }
}

/// Submission was refused; lists every unmet requirement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    pub missing: Vec<Requirement>,
}

impl Display for ValidationFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "missing required information: ")?;
        for (i, requirement) in self.missing.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", requirement)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationFailure {}

/// Checks name, phone, signature and consent, in that order.
pub fn validate(session: &SessionRecord) -> Result<(), ValidationFailure> {
    let mut missing = Vec::new();
    if session.signer.name.trim().is_empty() {
        missing.push(Requirement::SignerName);
    }
    if session.signer.phone.trim().is_empty() {
        missing.push(Requirement::SignerPhone);
    }
    if session.signature.artifact.is_none() {
        missing.push(Requirement::Signature);
    }
    if !session.agreed {
        missing.push(Requirement::Agreement);
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationFailure { missing })
    }
}
