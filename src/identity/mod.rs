//! # Identity Module
//!
//! Signing identities for the attestation flow. An identity is never
//! created directly — it is always *derived* from a 25-word recovery
//! phrase supplied by the operator at submission time.
//!
//! The identity stack is layered:
//!
//! 1. **Recovery phrase** — 25 checksummed words encoding a 32-byte
//!    Ed25519 seed. Parsed and validated by [`mnemonic`].
//! 2. **Keypair** — Raw Ed25519 key material from [`crate::crypto::keys`].
//! 3. **Address** — The public, checksummed base32 identifier derived from
//!    the public key. This is what operators see and what appears as the
//!    sender of every attestation.
//!
//! ## Lifecycle
//!
//! A [`SigningIdentity`] lives inside exactly one submission call: derived,
//! used to sign, dropped. The seed is zeroized as soon as the keypair is
//! constructed, and the keypair's own secret is zeroized on drop. Nothing
//! here is cached, persisted, or logged.

pub mod address;
pub mod mnemonic;

pub use address::{Address, AddressError};
pub use mnemonic::{PhraseError, RecoveryPhrase};

use crate::crypto::keys::Keypair;

/// A verified signing identity: an Ed25519 keypair plus the ledger address
/// derived from its public key.
///
/// Deliberately not `Clone` and not serializable — see the module docs for
/// the lifecycle this type is held to.
pub struct SigningIdentity {
    address: Address,
    keypair: Keypair,
}

impl SigningIdentity {
    /// Derive an identity from a raw recovery-phrase string.
    ///
    /// Deterministic and total: every input either yields the one identity
    /// the phrase encodes or a specific [`PhraseError`]. Same phrase, same
    /// address, every time — the address previewed to the operator is
    /// guaranteed to be the one that signs.
    pub fn from_phrase(phrase: &str) -> Result<Self, PhraseError> {
        let phrase = RecoveryPhrase::parse(phrase)?;
        Ok(Self::from_keypair(phrase.derive_keypair()))
    }

    /// Wrap an existing keypair, deriving its address.
    pub fn from_keypair(keypair: Keypair) -> Self {
        let address = Address::from_public_key(&keypair.public_key_bytes());
        Self { address, keypair }
    }

    /// The public ledger address of this identity.
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// The underlying keypair, for signing.
    pub fn keypair(&self) -> &Keypair {
        &self.keypair
    }
}

impl std::fmt::Debug for SigningIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningIdentity")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_address_matches_keypair_public_key() {
        let keypair = Keypair::from_seed(&[3u8; 32]);
        let public_key = keypair.public_key_bytes();
        let identity = SigningIdentity::from_keypair(keypair);
        assert_eq!(identity.address(), &Address::from_public_key(&public_key));
    }

    #[test]
    fn derivation_from_phrase_is_deterministic() {
        let phrase = mnemonic::phrase_from_seed(&[11u8; 32]);
        let a = SigningIdentity::from_phrase(&phrase).unwrap();
        let b = SigningIdentity::from_phrase(&phrase).unwrap();
        assert_eq!(a.address(), b.address());
    }
}
