//! # Ledgermark — Evidence Attestation Core
//!
//! Ledgermark anchors an evidentiary fingerprint (the SHA-256 digest of an
//! uploaded image) and a free-text reference number in the memo of a
//! zero-value ledger transaction. The operator supplies a 25-word recovery
//! phrase; the signing key is derived locally, the transaction is signed
//! locally, and only the signed payload ever leaves the process.
//!
//! ## Architecture
//!
//! The crate is split into modules that mirror the actual concerns of the
//! attestation flow:
//!
//! - **crypto** — Hashing, Ed25519 keys, and the streaming content digestor.
//! - **identity** — Recovery-phrase decoding and ledger address derivation.
//! - **transaction** — Attestation record validation, memo composition,
//!   transaction construction, and signing.
//! - **ledger** — The boundary to the remote ledger node: parameter fetch,
//!   submission, and confirmation polling.
//! - **pipeline** — The workflow state machine that drives upload → digest →
//!   sign & submit → result, with its single-flight submission gate.
//! - **config** — Protocol constants and limits.
//!
//! ## Design Philosophy
//!
//! 1. Secrets are scoped, not stored. The recovery phrase and derived key
//!    live exactly as long as one `submit` call and are zeroized on drop.
//! 2. Every fallible operation returns a typed error. The pipeline never
//!    fails without a concrete reason attached.
//! 3. Exactly one submission in flight at a time. The network gives us no
//!    idempotency guarantee, so we do not gamble with duplicates.

pub mod config;
pub mod crypto;
pub mod identity;
pub mod ledger;
pub mod pipeline;
pub mod transaction;

pub use crypto::digest::ContentFingerprint;
pub use identity::{Address, RecoveryPhrase, SigningIdentity};
pub use ledger::{LedgerClient, LedgerError, NetworkParameters};
pub use pipeline::{PipelineError, SubmissionPipeline, WorkflowState};
pub use transaction::{AttestationRecord, FailureReason, SubmissionResult, TransactionId};
