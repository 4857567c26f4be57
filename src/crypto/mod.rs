//! # Cryptographic Primitives
//!
//! Everything security-related in Ledgermark flows through this module:
//! content fingerprinting, key material, and signing.
//!
//! We deliberately chose boring, well-audited cryptography:
//!
//! - **Ed25519** for signatures — fast, deterministic, and nobody has broken it.
//! - **SHA-256** for content fingerprints — the digest every verifier on the
//!   planet can recompute.
//! - **SHA-512/256** for key-scheme checksums — fixed by the ledger's
//!   recovery-phrase and address formats, not a choice we get to make.
//!
//! Everything here is a thin, type-safe wrapper around audited
//! implementations. If you're tempted to optimize these functions, go read
//! about timing attacks first and come back when you've lost the urge.

pub mod digest;
pub mod hash;
pub mod keys;

pub use digest::{CancelFlag, ContentFingerprint, DigestError};
pub use hash::{double_sha256, sha256, sha512_256};
pub use keys::{Keypair, PublicKey, Signature};
