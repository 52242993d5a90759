//! Delivery of the signing link to the counterpart.
//!
//! Nothing here touches the network. [`SimulatedChannel`] stands in for the
//! messaging integration so the workflow can be exercised on its own.

use serde::Serialize;

/// Link a counterpart would open to sign the session's document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareLink {
    pub session_id: String,
    pub url: String,
}

impl ShareLink {
    pub fn for_session(base_url: &str, session_id: &str) -> Self {
        Self {
            session_id: session_id.to_string(),
            url: format!("{}{}", base_url, session_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ShareOutcome {
    Ok,
    Failed { reason: String },
}

pub trait LinkChannel: Send {
    fn share_link(&self, link: &ShareLink) -> ShareOutcome;
}

/// Pretends to hand the link to a messaging service.
#[derive(Debug, Clone, Default)]
pub struct SimulatedChannel {
    offline: bool,
}

impl SimulatedChannel {
    /// A channel whose every delivery fails, for rehearsing the failure path.
    pub fn offline() -> Self {
        Self { offline: true }
    }
}

impl LinkChannel for SimulatedChannel {
    fn share_link(&self, link: &ShareLink) -> ShareOutcome {
        if self.offline {
            tracing::warn!("Simulated channel offline; link not shared: {}", link.url);
            return ShareOutcome::Failed {
                reason: "channel offline".to_string(),
            };
        }
        tracing::debug!("Simulated share of {}", link.url);
        ShareOutcome::Ok
    }
}
