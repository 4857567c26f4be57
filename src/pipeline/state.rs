//! Workflow states for the attestation session.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The single active state of an attestation session.
///
/// ```text
/// Idle --fileSelected--> FileLoaded --digestStart--> Digesting
///     --digestDone--> DigestReady --credentialsValid--> AwaitingCredentials
///     --submit--> Submitting --confirmed--> Confirmed
/// ```
///
/// Any state from `Digesting` onward may move to `Failed` on an
/// unrecoverable error. `Confirmed` and `Failed` are terminal for the
/// session; the only exit is an explicit reset back to `Idle`, which
/// discards all in-memory record state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkflowState {
    /// No file selected yet.
    Idle,
    /// A file with an image media type has been accepted.
    FileLoaded,
    /// The content digest is being computed.
    Digesting,
    /// A fingerprint exists for the currently selected file.
    DigestReady,
    /// The recovery phrase has been validated; ready to submit.
    AwaitingCredentials,
    /// A submission is in flight. Acts as the mutual-exclusion gate:
    /// a second submit in this state is rejected, not queued.
    Submitting,
    /// The attestation was durably included by the network. Terminal.
    Confirmed,
    /// The attempt ended with a typed failure reason. Terminal.
    Failed,
}

impl WorkflowState {
    /// Whether this state ends the session (only `reset` leaves it).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Confirmed | Self::Failed)
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "Idle",
            Self::FileLoaded => "FileLoaded",
            Self::Digesting => "Digesting",
            Self::DigestReady => "DigestReady",
            Self::AwaitingCredentials => "AwaitingCredentials",
            Self::Submitting => "Submitting",
            Self::Confirmed => "Confirmed",
            Self::Failed => "Failed",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_confirmed_and_failed_are_terminal() {
        for state in [
            WorkflowState::Idle,
            WorkflowState::FileLoaded,
            WorkflowState::Digesting,
            WorkflowState::DigestReady,
            WorkflowState::AwaitingCredentials,
            WorkflowState::Submitting,
        ] {
            assert!(!state.is_terminal(), "{state} must not be terminal");
        }
        assert!(WorkflowState::Confirmed.is_terminal());
        assert!(WorkflowState::Failed.is_terminal());
    }

    #[test]
    fn display_matches_variant_names() {
        assert_eq!(WorkflowState::DigestReady.to_string(), "DigestReady");
        assert_eq!(WorkflowState::Submitting.to_string(), "Submitting");
    }
}
