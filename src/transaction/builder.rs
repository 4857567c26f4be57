//! Transaction construction via the builder pattern.
//!
//! The [`TransactionBuilder`] assembles an unsigned
//! [`AttestationTransaction`] from a validated record and the network
//! parameters fetched for this attempt. `.build()` stamps a deterministic
//! ID derived from the transaction's contents.
//!
//! The builder does not sign — that happens in [`super::signing`]. The
//! separation keeps construction testable without key material.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config;
use crate::crypto::hash::double_sha256;
use crate::ledger::NetworkParameters;

use super::record::AttestationRecord;

/// A zero-value attestation transaction.
///
/// The attestation shape is a payment from the signing identity to itself
/// with amount zero; the entire point of the transaction is the memo in
/// its note field. Validity on the network is bounded by the
/// `[first_round, last_round]` window copied from the fetched parameters.
///
/// # Canonical Byte Format
///
/// Signing and ID computation use [`AttestationTransaction::signable_bytes`],
/// which deterministically serializes: version, sender, receiver, amount,
/// fee, round window, genesis identifiers, timestamp, note. The signature
/// and embedded public key are excluded, so the ID is stable across
/// signing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttestationTransaction {
    /// Transaction ID: `hex(double_sha256(signable_bytes))`.
    pub id: String,

    /// Transaction format version.
    pub version: u16,

    /// Sender address. For attestations, identical to `receiver`.
    pub sender: String,

    /// Receiver address.
    pub receiver: String,

    /// Transfer amount in the network's smallest unit. Always zero for
    /// attestations; the field exists so the canonical format matches the
    /// network's payment shape.
    pub amount: u64,

    /// Fee in the network's smallest unit, from the fetched parameters.
    pub fee: u64,

    /// First round at which the transaction is valid.
    pub first_round: u64,

    /// Last round at which the transaction is valid.
    pub last_round: u64,

    /// Network genesis identifier, pinning the transaction to one network.
    pub genesis_id: String,

    /// Base64 genesis hash, as reported by the node.
    pub genesis_hash: String,

    /// Unix timestamp in milliseconds at construction time.
    pub timestamp: u64,

    /// The memo bytes: reference text plus optional fingerprint segment.
    pub note: Vec<u8>,

    /// Hex-encoded sender public key, embedded during signing so verifiers
    /// need no separate key lookup.
    pub sender_public_key: Option<String>,

    /// Hex-encoded Ed25519 signature over [`signable_bytes`]. `None` for
    /// unsigned transactions fresh from the builder.
    ///
    /// [`signable_bytes`]: AttestationTransaction::signable_bytes
    pub signature: Option<String>,
}

impl AttestationTransaction {
    /// The canonical byte representation used for signing and ID
    /// computation.
    ///
    /// A deterministic concatenation of fields with null-byte separators
    /// for strings and fixed-width little-endian integers. JSON/serde is
    /// intentionally avoided because field ordering is not guaranteed
    /// across serialization formats.
    pub fn signable_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(256 + self.note.len());

        buf.extend_from_slice(&self.version.to_le_bytes());

        buf.extend_from_slice(self.sender.as_bytes());
        buf.push(0x00);

        buf.extend_from_slice(self.receiver.as_bytes());
        buf.push(0x00);

        buf.extend_from_slice(&self.amount.to_le_bytes());
        buf.extend_from_slice(&self.fee.to_le_bytes());
        buf.extend_from_slice(&self.first_round.to_le_bytes());
        buf.extend_from_slice(&self.last_round.to_le_bytes());

        buf.extend_from_slice(self.genesis_id.as_bytes());
        buf.push(0x00);

        buf.extend_from_slice(self.genesis_hash.as_bytes());
        buf.push(0x00);

        buf.extend_from_slice(&self.timestamp.to_le_bytes());

        buf.extend_from_slice(&(self.note.len() as u32).to_le_bytes());
        buf.extend_from_slice(&self.note);

        buf
    }

    /// Compute the transaction ID from the current field values.
    pub fn compute_id(&self) -> String {
        hex::encode(double_sha256(&self.signable_bytes()))
    }

    /// Whether a signature is attached.
    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }
}

/// Fluent builder for [`AttestationTransaction`].
#[derive(Debug, Clone, Default)]
pub struct TransactionBuilder {
    sender: String,
    receiver: String,
    amount: u64,
    fee: u64,
    first_round: u64,
    last_round: u64,
    genesis_id: String,
    genesis_hash: String,
    note: Vec<u8>,
}

impl TransactionBuilder {
    /// Start an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a builder pre-filled for an attestation record: zero-value
    /// self-payment from the record's address, memo in the note field.
    pub fn for_record(record: &AttestationRecord) -> Self {
        let address = record.address().encode();
        Self {
            sender: address.clone(),
            receiver: address,
            amount: 0,
            note: record.memo_bytes(),
            ..Self::default()
        }
    }

    /// Set the sender address.
    pub fn sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = sender.into();
        self
    }

    /// Set the receiver address.
    pub fn receiver(mut self, receiver: impl Into<String>) -> Self {
        self.receiver = receiver.into();
        self
    }

    /// Set the transfer amount.
    pub fn amount(mut self, amount: u64) -> Self {
        self.amount = amount;
        self
    }

    /// Set the note payload.
    pub fn note(mut self, note: Vec<u8>) -> Self {
        self.note = note;
        self
    }

    /// Copy fee, round window, and genesis identifiers from fetched
    /// network parameters. The fee is floored at the network minimum.
    pub fn parameters(mut self, params: &NetworkParameters) -> Self {
        self.fee = params.fee.max(params.min_fee);
        self.first_round = params.first_round;
        self.last_round = params.last_round;
        self.genesis_id = params.genesis_id.clone();
        self.genesis_hash = params.genesis_hash.clone();
        self
    }

    /// Assemble the unsigned transaction, stamping the current time and
    /// the content-derived ID.
    pub fn build(self) -> AttestationTransaction {
        let mut tx = AttestationTransaction {
            id: String::new(),
            version: config::TX_FORMAT_VERSION,
            sender: self.sender,
            receiver: self.receiver,
            amount: self.amount,
            fee: self.fee,
            first_round: self.first_round,
            last_round: self.last_round,
            genesis_id: self.genesis_id,
            genesis_hash: self.genesis_hash,
            timestamp: Utc::now().timestamp_millis() as u64,
            note: self.note,
            sender_public_key: None,
            signature: None,
        };
        tx.id = tx.compute_id();
        tx
    }
}
