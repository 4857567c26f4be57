//! # Attestation Records
//!
//! An [`AttestationRecord`] binds the operator's reference text, the
//! optional content fingerprint, and the signing identity's address into
//! the unit that becomes a transaction memo. Validation happens here,
//! before any network traffic, in a fixed order: reference text first,
//! memo size second.
//!
//! ## Memo convention
//!
//! ```text
//! <reference text> | sha256:<64 lowercase hex>
//! ```
//!
//! The separator is fixed ([`config::MEMO_FINGERPRINT_SEPARATOR`]) and the
//! fingerprint segment has a fixed width, so decomposition anchors on the
//! memo's suffix: any reader who knows the convention recovers both fields
//! exactly. A memo without the suffix is all reference text.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config;
use crate::crypto::digest::ContentFingerprint;
use crate::identity::{Address, SigningIdentity};

/// Errors from record validation.
///
/// Always recoverable locally: the operator fixes the input and retries.
/// No state is corrupted by a validation failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The reference text is empty after trimming whitespace.
    #[error("reference text must not be empty")]
    EmptyReferenceText,

    /// The composed memo exceeds the ledger's note size limit. The record
    /// is rejected whole — truncating evidence is not an option.
    #[error("memo is {size} bytes, exceeding the {max}-byte limit")]
    MemoTooLarge {
        /// Composed memo size in bytes.
        size: usize,
        /// The ledger's limit.
        max: usize,
    },
}

/// A validated attestation record, ready to become a transaction.
///
/// Holds the identity's public address only; the secret key stays scoped
/// to the submission call that signs the transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttestationRecord {
    reference_text: String,
    fingerprint: Option<ContentFingerprint>,
    address: Address,
}

impl AttestationRecord {
    /// Build and validate a record.
    ///
    /// Validation order: (1) reference text non-empty after trim, (2)
    /// composed memo within [`config::MAX_MEMO_BYTES`]. Identity presence
    /// is enforced by the signature of this function — there is no way to
    /// construct a record without one.
    pub fn build(
        reference_text: &str,
        fingerprint: Option<ContentFingerprint>,
        identity: &SigningIdentity,
    ) -> Result<Self, ValidationError> {
        let trimmed = reference_text.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyReferenceText);
        }

        let record = Self {
            reference_text: trimmed.to_owned(),
            fingerprint,
            address: *identity.address(),
        };

        let memo_len = record.memo().len();
        if memo_len > config::MAX_MEMO_BYTES {
            return Err(ValidationError::MemoTooLarge {
                size: memo_len,
                max: config::MAX_MEMO_BYTES,
            });
        }
        Ok(record)
    }

    /// The trimmed reference text.
    pub fn reference_text(&self) -> &str {
        &self.reference_text
    }

    /// The content fingerprint, if a file was attested.
    pub fn fingerprint(&self) -> Option<&ContentFingerprint> {
        self.fingerprint.as_ref()
    }

    /// The address that will sign and send the attestation.
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Compose the memo string.
    pub fn memo(&self) -> String {
        match &self.fingerprint {
            Some(fp) => format!(
                "{}{}{}",
                self.reference_text,
                config::MEMO_FINGERPRINT_SEPARATOR,
                fp.to_hex()
            ),
            None => self.reference_text.clone(),
        }
    }

    /// The memo as note-field bytes.
    pub fn memo_bytes(&self) -> Vec<u8> {
        self.memo().into_bytes()
    }
}

/// Decompose a memo back into reference text and fingerprint.
///
/// Suffix-anchored: the memo carries a fingerprint exactly when it ends
/// with the fixed separator followed by 64 lowercase hex characters.
/// Everything before that suffix (or the whole memo, absent the suffix)
/// is the reference text.
pub fn decompose_memo(memo: &str) -> (&str, Option<ContentFingerprint>) {
    let sep = config::MEMO_FINGERPRINT_SEPARATOR;
    let suffix_len = sep.len() + config::FINGERPRINT_HEX_LENGTH;
    if memo.len() > suffix_len {
        let split_at = memo.len() - suffix_len;
        if memo.is_char_boundary(split_at) && memo[split_at..].starts_with(sep) {
            let hex_part = &memo[split_at + sep.len()..];
            if let Some(fp) = ContentFingerprint::from_hex(hex_part) {
                return (&memo[..split_at], Some(fp));
            }
        }
    }
    (memo, None)
}
