//! # Ledger Boundary
//!
//! Everything that talks to the remote ledger network lives behind the
//! [`LedgerClient`] trait: parameter fetch, payload submission, and
//! confirmation polling. The rest of the crate — and every test — only
//! sees the trait, so each failure branch can be exercised with a fake
//! client and no network.
//!
//! The failure taxonomy matters more than the wire format:
//!
//! - [`LedgerError::Network`] — connectivity failure. Transient; the whole
//!   submission may be retried from the top.
//! - [`LedgerError::Rejected`] — the network refused the transaction.
//!   Fatal for the attempt; resubmitting the identical payload is wrong.
//! - [`LedgerError::ConfirmationTimeout`] — the bound elapsed without the
//!   transaction being seen. Ambiguous: it may still land, so this is
//!   reported apart from rejection and never triggers a resubmit.
//! - [`LedgerError::Protocol`] — the node answered with something we
//!   cannot parse. A bug on one side of the wire or the other.

pub mod http;
pub mod rpc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::transaction::TransactionId;

pub use http::HttpLedgerClient;

/// Errors from ledger operations. See the module docs for the recovery
/// semantics of each variant.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Transport-level failure: connection refused, DNS, timeout of a
    /// single request.
    #[error("network error: {0}")]
    Network(String),

    /// The network rejected the transaction (bad parameters, insufficient
    /// balance, invalid signature).
    #[error("transaction rejected: {0}")]
    Rejected(String),

    /// Confirmation was not observed within the polling bound.
    #[error("confirmation not observed within {rounds} rounds")]
    ConfirmationTimeout {
        /// The bound that elapsed.
        rounds: u64,
    },

    /// The node's response did not match the expected shape.
    #[error("malformed node response: {0}")]
    Protocol(String),
}

/// Current network parameters needed to build a valid transaction.
///
/// Fetched per submission attempt and discarded with it — a stale round
/// window is one of the ways a transaction gets rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkParameters {
    /// Suggested fee in the network's smallest unit.
    pub fee: u64,
    /// Minimum fee the network will accept.
    pub min_fee: u64,
    /// First round of the transaction validity window.
    pub first_round: u64,
    /// Last round of the transaction validity window.
    pub last_round: u64,
    /// Genesis identifier of the network.
    pub genesis_id: String,
    /// Base64 genesis hash of the network.
    pub genesis_hash: String,
}

/// A transaction the network has durably included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmedTransaction {
    /// The confirmed transaction's identifier.
    pub tx_id: TransactionId,
    /// The round it was included in.
    pub confirmed_round: u64,
}

/// The boundary abstraction over the remote ledger network.
///
/// All three operations are asynchronous and independently fallible.
/// `submit` sends the payload exactly once per call; idempotency is NOT
/// assumed on the network side, so callers own the discipline of not
/// calling it twice for one logical attempt.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Fetch the current fee and round parameters. No side effects.
    async fn fetch_parameters(&self) -> Result<NetworkParameters, LedgerError>;

    /// Submit a signed payload. One wire send per call.
    async fn submit(&self, signed_payload: &[u8]) -> Result<TransactionId, LedgerError>;

    /// Poll until the transaction is included or `max_rounds` polls have
    /// elapsed, whichever comes first. Each poll is a single round-trip
    /// with no internal retry; the retry cadence is the implementation's
    /// poll interval.
    async fn await_confirmation(
        &self,
        id: &TransactionId,
        max_rounds: u64,
    ) -> Result<ConfirmedTransaction, LedgerError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_variants_are_distinguishable() {
        // The pipeline matches on these; a collapsed taxonomy would
        // silently break retry semantics.
        let network = LedgerError::Network("refused".into());
        let rejected = LedgerError::Rejected("overspend".into());
        let timeout = LedgerError::ConfirmationTimeout { rounds: 4 };
        assert_ne!(network, rejected);
        assert_ne!(rejected, timeout);
        assert_ne!(network, timeout);
    }

    #[test]
    fn parameters_serde_roundtrip() {
        let params = NetworkParameters {
            fee: 1000,
            min_fee: 1000,
            first_round: 10,
            last_round: 1010,
            genesis_id: "marknet-v1".into(),
            genesis_hash: "aGFzaA==".into(),
        };
        let json = serde_json::to_string(&params).unwrap();
        assert_eq!(serde_json::from_str::<NetworkParameters>(&json).unwrap(), params);
    }
}
