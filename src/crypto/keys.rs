//! # Key Management
//!
//! Ed25519 keypair handling for signing identities.
//!
//! Every attestation is signed by a keypair derived from the operator's
//! recovery phrase. This module wraps `ed25519-dalek` with the small,
//! deliberate API the rest of the crate needs.
//!
//! ## Security considerations
//!
//! - Private key material is zeroized on drop (ed25519-dalek does this for
//!   the signing key; callers holding raw seeds should use
//!   [`zeroize::Zeroizing`]).
//! - Key bytes are never logged and never appear in `Debug` output.
//! - `generate()` uses the OS CSPRNG and exists for tests and tooling; the
//!   production path always derives from a recovery phrase.

use ed25519_dalek::{
    Signature as DalekSignature, Signer, SigningKey, Verifier, VerifyingKey, SECRET_KEY_LENGTH,
};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config;

/// An Ed25519 keypair used to sign attestation transactions.
///
/// Intentionally does NOT implement `Serialize`/`Deserialize` or `Clone`.
/// A keypair is derived inside a single submission call, signs one
/// transaction, and is dropped. There is no legitimate reason to copy it
/// around or write it anywhere.
pub struct Keypair {
    signing_key: SigningKey,
}

/// The public half of a signing identity, safe to share with the world.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKey {
    bytes: [u8; 32],
}

/// An Ed25519 signature over a message.
///
/// 64 bytes, deterministic for a given (key, message) pair. Stored as
/// `Vec<u8>` for serde compatibility; a signature of any other length
/// simply fails verification — no panics.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    bytes: Vec<u8>,
}

impl Keypair {
    /// Generate a fresh keypair from the OS cryptographic RNG.
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut OsRng);
        Self { signing_key }
    }

    /// Construct a keypair deterministically from a 32-byte seed.
    ///
    /// The seed is used directly as the Ed25519 secret scalar. This is how
    /// recovery-phrase derivation produces the signing identity: same seed,
    /// same keypair, every time.
    pub fn from_seed(seed: &[u8; SECRET_KEY_LENGTH]) -> Self {
        let signing_key = SigningKey::from_bytes(seed);
        Self { signing_key }
    }

    /// The public key associated with this keypair.
    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            bytes: self.signing_key.verifying_key().to_bytes(),
        }
    }

    /// Raw public key bytes. Safe to share, log, or print.
    pub fn public_key_bytes(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }

    /// Sign a message.
    ///
    /// Ed25519 signatures are deterministic — no nonce management, no RNG
    /// at signing time, no k-value disasters.
    pub fn sign(&self, message: &[u8]) -> Signature {
        let sig = self.signing_key.sign(message);
        Signature {
            bytes: sig.to_bytes().to_vec(),
        }
    }

    /// Verify a signature against this keypair's public key.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        self.public_key().verify(message, signature)
    }
}

impl fmt::Debug for Keypair {
    // Secret material stays out of Debug output.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("public_key", &hex::encode(self.public_key_bytes()))
            .finish_non_exhaustive()
    }
}

impl PublicKey {
    /// Reconstruct a public key from raw bytes.
    ///
    /// Returns `None` if the bytes are not a valid Ed25519 point.
    pub fn from_bytes(bytes: &[u8; 32]) -> Option<Self> {
        VerifyingKey::from_bytes(bytes).ok().map(|_| Self { bytes: *bytes })
    }

    /// Raw key bytes.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.bytes
    }

    /// Hex encoding of the key bytes, for embedding in transactions.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// Verify an Ed25519 signature over `message`.
    ///
    /// Returns `false` for malformed keys or signatures rather than
    /// erroring — a bad signature and an unparseable one are the same
    /// thing to a verifier.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        let Ok(verifying_key) = VerifyingKey::from_bytes(&self.bytes) else {
            return false;
        };
        if signature.bytes.len() != config::SIGNATURE_LENGTH {
            return false;
        }
        let mut sig_bytes = [0u8; 64];
        sig_bytes.copy_from_slice(&signature.bytes);
        let sig = DalekSignature::from_bytes(&sig_bytes);
        verifying_key.verify(message, &sig).is_ok()
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", hex::encode(self.bytes))
    }
}

impl Signature {
    /// Hex encoding of the signature bytes.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    /// Parse a signature from hex. Length is not validated here; a
    /// wrong-length signature fails at verification time.
    pub fn from_hex(hex_str: &str) -> Option<Self> {
        hex::decode(hex_str).ok().map(|bytes| Self { bytes })
    }

    /// Raw signature bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_and_verify_roundtrip() {
        let kp = Keypair::generate();
        let msg = b"attest this";
        let sig = kp.sign(msg);
        assert!(kp.verify(msg, &sig));
        assert!(!kp.verify(b"attest that", &sig));
    }

    #[test]
    fn from_seed_is_deterministic() {
        let seed = [7u8; 32];
        let a = Keypair::from_seed(&seed);
        let b = Keypair::from_seed(&seed);
        assert_eq!(a.public_key_bytes(), b.public_key_bytes());
    }

    #[test]
    fn different_seeds_different_keys() {
        let a = Keypair::from_seed(&[1u8; 32]);
        let b = Keypair::from_seed(&[2u8; 32]);
        assert_ne!(a.public_key_bytes(), b.public_key_bytes());
    }

    #[test]
    fn signature_is_64_bytes() {
        let kp = Keypair::generate();
        let sig = kp.sign(b"msg");
        assert_eq!(sig.as_bytes().len(), config::SIGNATURE_LENGTH);
        assert_eq!(sig.to_hex().len(), config::SIGNATURE_LENGTH * 2);
    }

    #[test]
    fn wrong_length_signature_fails_verification() {
        let kp = Keypair::generate();
        let truncated = Signature {
            bytes: vec![0u8; 63],
        };
        assert!(!kp.verify(b"msg", &truncated));
    }

    #[test]
    fn signature_hex_roundtrip() {
        let kp = Keypair::generate();
        let sig = kp.sign(b"msg");
        let parsed = Signature::from_hex(&sig.to_hex()).unwrap();
        assert!(kp.verify(b"msg", &parsed));
    }

    #[test]
    fn debug_output_hides_secret() {
        let kp = Keypair::from_seed(&[9u8; 32]);
        let rendered = format!("{kp:?}");
        assert!(!rendered.contains(&hex::encode([9u8; 32])));
    }
}
