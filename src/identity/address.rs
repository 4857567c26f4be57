//! # Ledger Addresses
//!
//! A ledger address is the public, human-pasteable identifier of a signing
//! identity. It is derived from the Ed25519 public key as:
//!
//! ```text
//! public_key (32 bytes)
//!     ‖ SHA-512/256(public_key)[28..32]   (4 checksum bytes)
//!     -> base32 (RFC 4648, no padding)    -> 58 characters
//! ```
//!
//! The appended checksum means a truncated or mistyped address fails to
//! parse instead of silently pointing at someone else's identity. Base32
//! keeps the address case-insensitive-ish in practice (it is rendered
//! uppercase) and free of characters that confuse copy-paste.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::config;
use crate::crypto::hash::sha512_256;

const BASE32_ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

/// Errors from address parsing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// The string is not the expected length.
    #[error("invalid address length: expected {expected} characters, got {got}")]
    InvalidLength {
        /// Expected character count.
        expected: usize,
        /// Actual character count.
        got: usize,
    },

    /// The string contains a character outside the base32 alphabet.
    #[error("invalid base32 character in address")]
    InvalidCharacter,

    /// The embedded checksum does not match the decoded public key.
    #[error("address checksum mismatch")]
    ChecksumMismatch,
}

/// A checksummed ledger address.
///
/// Stores the originating public key; the 58-character string form is
/// computed on the fly. Two addresses are equal exactly when their public
/// keys are.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address {
    public_key: [u8; 32],
}

impl Address {
    /// Derive the address of an Ed25519 public key.
    pub fn from_public_key(public_key: &[u8; 32]) -> Self {
        Self {
            public_key: *public_key,
        }
    }

    /// Parse and verify an address string.
    ///
    /// Accepts lowercase input (addresses are rendered uppercase but
    /// operators paste all sorts of things); rejects wrong lengths, foreign
    /// characters, and checksum mismatches.
    pub fn parse(input: &str) -> Result<Self, AddressError> {
        if input.len() != config::ADDRESS_LENGTH {
            return Err(AddressError::InvalidLength {
                expected: config::ADDRESS_LENGTH,
                got: input.len(),
            });
        }

        let payload = base32_decode(&input.to_uppercase())?;
        let key_len = config::PUBLIC_KEY_LENGTH;
        // 58 characters decode to 36 payload bytes plus 2 spill bits.
        debug_assert!(payload.len() >= key_len + config::ADDRESS_CHECKSUM_LENGTH);

        let mut public_key = [0u8; 32];
        public_key.copy_from_slice(&payload[..key_len]);
        let checksum = &payload[key_len..key_len + config::ADDRESS_CHECKSUM_LENGTH];

        if checksum != expected_checksum(&public_key) {
            return Err(AddressError::ChecksumMismatch);
        }
        Ok(Self { public_key })
    }

    /// The public key this address was derived from.
    pub fn public_key(&self) -> &[u8; 32] {
        &self.public_key
    }

    /// The canonical 58-character string form.
    pub fn encode(&self) -> String {
        let mut payload = Vec::with_capacity(
            config::PUBLIC_KEY_LENGTH + config::ADDRESS_CHECKSUM_LENGTH,
        );
        payload.extend_from_slice(&self.public_key);
        payload.extend_from_slice(&expected_checksum(&self.public_key));
        base32_encode(&payload)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.encode())
    }
}

/// The 4-byte address checksum: the trailing bytes of SHA-512/256 over the
/// public key.
fn expected_checksum(public_key: &[u8; 32]) -> [u8; 4] {
    let digest = sha512_256(public_key);
    let mut checksum = [0u8; 4];
    checksum.copy_from_slice(&digest[digest.len() - config::ADDRESS_CHECKSUM_LENGTH..]);
    checksum
}

/// RFC 4648 base32 without padding, big-endian bit order.
fn base32_encode(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len() * 8 / 5 + 1);
    let mut acc: u32 = 0;
    let mut acc_bits: u32 = 0;
    for &byte in data {
        acc = (acc << 8) | u32::from(byte);
        acc_bits += 8;
        while acc_bits >= 5 {
            acc_bits -= 5;
            out.push(BASE32_ALPHABET[((acc >> acc_bits) & 0x1F) as usize] as char);
        }
    }
    if acc_bits > 0 {
        out.push(BASE32_ALPHABET[((acc << (5 - acc_bits)) & 0x1F) as usize] as char);
    }
    out
}

fn base32_decode(input: &str) -> Result<Vec<u8>, AddressError> {
    let mut out = Vec::with_capacity(input.len() * 5 / 8 + 1);
    let mut acc: u32 = 0;
    let mut acc_bits: u32 = 0;
    for ch in input.bytes() {
        let value = BASE32_ALPHABET
            .iter()
            .position(|&c| c == ch)
            .ok_or(AddressError::InvalidCharacter)? as u32;
        acc = (acc << 5) | value;
        acc_bits += 5;
        if acc_bits >= 8 {
            acc_bits -= 8;
            out.push(((acc >> acc_bits) & 0xFF) as u8);
        }
    }
    // Trailing bits short of a byte are encoding slack and are dropped.
    Ok(out)
}
