//! Core type definitions for the attestation lifecycle.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque, network-defined transaction identifier.
///
/// Produced at submission time and used verbatim for confirmation polling
/// and for the downstream QR/explorer surface. No structure is assumed
/// beyond equality and display.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionId(String);

impl TransactionId {
    /// Wrap a raw identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier exactly as the network reported it.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Why a submission attempt ended in `Failed`.
///
/// Every terminal failure carries one of these; the pipeline never fails
/// without a concrete reason attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureReason {
    /// The network rejected the transaction. Fatal for this attempt; the
    /// identical payload must not be resubmitted automatically.
    Rejected {
        /// The rejection message from the node.
        reason: String,
    },

    /// Confirmation was not observed within the polling bound. Ambiguous:
    /// the transaction may still land, so no automatic resubmission — the
    /// operator can check the outcome by identifier.
    ConfirmationTimeout {
        /// The submitted transaction, for manual lookup.
        tx_id: TransactionId,
        /// How many polling rounds elapsed.
        rounds: u64,
    },

    /// Connectivity was lost while polling for confirmation. Like a
    /// timeout, the outcome is unknown and resubmission is unsafe.
    ConfirmationLost {
        /// The submitted transaction, for manual lookup.
        tx_id: TransactionId,
        /// Transport-level detail.
        detail: String,
    },

    /// A failure originating outside the core (upload surface, preview
    /// rendering, QR generation). Reported through the same channel but
    /// tagged as external.
    External {
        /// Collaborator-supplied description.
        detail: String,
    },
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected { reason } => write!(f, "rejected by the network: {reason}"),
            Self::ConfirmationTimeout { tx_id, rounds } => write!(
                f,
                "confirmation of {tx_id} not observed within {rounds} rounds"
            ),
            Self::ConfirmationLost { tx_id, detail } => {
                write!(f, "lost contact while confirming {tx_id}: {detail}")
            }
            Self::External { detail } => write!(f, "external failure: {detail}"),
        }
    }
}

/// The terminal outcome of one submission attempt.
///
/// Exactly one instance is produced per attempt and it is immutable once
/// produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionResult {
    /// The transaction was durably included by the network.
    Confirmed {
        /// The confirmed transaction's identifier.
        tx_id: TransactionId,
    },
    /// The attempt ended without confirmation.
    Failed {
        /// The typed reason.
        reason: FailureReason,
    },
}

impl SubmissionResult {
    /// Whether this outcome is a confirmation.
    pub fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_id_displays_verbatim() {
        let id = TransactionId::new("TX123ABC");
        assert_eq!(id.to_string(), "TX123ABC");
        assert_eq!(id.as_str(), "TX123ABC");
    }

    #[test]
    fn result_serde_roundtrip() {
        let result = SubmissionResult::Failed {
            reason: FailureReason::ConfirmationTimeout {
                tx_id: TransactionId::new("TX9"),
                rounds: 4,
            },
        };
        let json = serde_json::to_string(&result).unwrap();
        let back: SubmissionResult = serde_json::from_str(&json).unwrap();
        assert_eq!(result, back);
        assert!(!back.is_confirmed());
    }
}
