//! # Transaction Module
//!
//! Construction, validation, and signing of attestation transactions.
//! An attestation is a zero-value payment from the signing identity to
//! itself whose note field carries the memo: the operator's reference
//! text plus, when present, the content fingerprint.
//!
//! ```text
//! types.rs   — TransactionId, SubmissionResult, FailureReason
//! record.rs  — AttestationRecord validation and the memo codec
//! builder.rs — AttestationTransaction + fluent builder, canonical bytes
//! signing.rs — Ed25519 signing over the canonical byte form
//! ```
//!
//! ## Lifecycle
//!
//! 1. **Build the record** — [`AttestationRecord::build`] validates the
//!    reference text and memo size before anything touches the network.
//! 2. **Build the transaction** — [`TransactionBuilder`] stamps the fetched
//!    network parameters onto the record's memo.
//! 3. **Sign** — [`sign_transaction`] with the derived keypair.
//! 4. **Submit & confirm** — handled by [`crate::pipeline`] through
//!    [`crate::ledger::LedgerClient`].
//!
//! ## Design Decisions
//!
//! - Transaction IDs are `hex(double_sha256(signable_bytes))`, computed
//!   before signing and stable across it.
//! - The memo is length-capped, never truncated: an oversize memo is a
//!   validation error the operator can fix, a truncated one is silently
//!   corrupted evidence.

pub mod builder;
pub mod record;
pub mod signing;
pub mod types;

pub use builder::{AttestationTransaction, TransactionBuilder};
pub use record::{AttestationRecord, ValidationError};
pub use signing::sign_transaction;
pub use types::{FailureReason, SubmissionResult, TransactionId};
