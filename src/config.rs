//! # Protocol Configuration & Constants
//!
//! Every magic number in Ledgermark lives here. The values fall into three
//! groups: the recovery-phrase encoding (fixed by the ledger's key scheme),
//! the attestation limits (fixed by the ledger's transaction format), and
//! the client-side timing knobs (ours to tune).

use std::time::Duration;

// ---------------------------------------------------------------------------
// Recovery Phrase Encoding
// ---------------------------------------------------------------------------

/// Total number of words in a recovery phrase: 24 data words plus one
/// checksum word.
pub const PHRASE_WORD_COUNT: usize = 25;

/// Number of words that carry seed material. 24 words × 11 bits = 264 bits,
/// of which the first 256 encode the Ed25519 seed.
pub const PHRASE_DATA_WORD_COUNT: usize = 24;

/// Bits encoded per word. The wordlist has 2048 entries, so each word
/// indexes 11 bits.
pub const PHRASE_WORD_BITS: u32 = 11;

/// Size of the wordlist every phrase word must come from.
pub const WORDLIST_SIZE: usize = 2048;

/// Ed25519 seed length in bytes.
pub const SEED_LENGTH: usize = 32;

// ---------------------------------------------------------------------------
// Addresses & Signatures
// ---------------------------------------------------------------------------

/// Ed25519 public key length in bytes.
pub const PUBLIC_KEY_LENGTH: usize = 32;

/// Ed25519 signature length in bytes.
pub const SIGNATURE_LENGTH: usize = 64;

/// Bytes of the SHA-512/256 public-key digest appended to the address
/// before base32 encoding. Catches typos and truncation on paste.
pub const ADDRESS_CHECKSUM_LENGTH: usize = 4;

/// Length of the rendered address string: base32 of 36 bytes, unpadded.
pub const ADDRESS_LENGTH: usize = 58;

// ---------------------------------------------------------------------------
// Content Digest
// ---------------------------------------------------------------------------

/// Fingerprint length in bytes (SHA-256 output).
pub const FINGERPRINT_LENGTH: usize = 32;

/// Fingerprint length rendered as lowercase hex.
pub const FINGERPRINT_HEX_LENGTH: usize = 64;

/// Chunk size for incremental digesting. Memory use stays bounded by this
/// regardless of file size, and progress/cancellation is checked once per
/// chunk.
pub const DIGEST_CHUNK_SIZE: usize = 64 * 1024;

// ---------------------------------------------------------------------------
// Attestation Memo
// ---------------------------------------------------------------------------

/// Maximum memo size in bytes accepted by the ledger's note field.
/// Records whose composed memo exceeds this are rejected before
/// submission — never truncated.
pub const MAX_MEMO_BYTES: usize = 1024;

/// Separator between the reference text and the fingerprint segment of a
/// memo. Fixed so that any reader who knows the convention can recover
/// both fields from the memo alone.
pub const MEMO_FINGERPRINT_SEPARATOR: &str = " | sha256:";

// ---------------------------------------------------------------------------
// Transaction Format
// ---------------------------------------------------------------------------

/// Transaction format version. Bump on breaking changes to the canonical
/// signable byte layout.
pub const TX_FORMAT_VERSION: u16 = 1;

// ---------------------------------------------------------------------------
// Network Timing
// ---------------------------------------------------------------------------

/// Number of confirmation polling rounds before the outcome is reported
/// as unknown. Matches roughly four block intervals on the target network.
pub const DEFAULT_CONFIRMATION_ROUNDS: u64 = 4;

/// Delay between confirmation polls. Each poll is a single round-trip;
/// the retry cadence lives here, not in the transport.
pub const CONFIRMATION_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Bound on any single HTTP request to the ledger node. A node that does
/// not answer within this window counts as a connectivity failure.
pub const HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phrase_encoding_is_internally_consistent() {
        // 24 data words must cover the full seed.
        assert!(PHRASE_DATA_WORD_COUNT as u32 * PHRASE_WORD_BITS >= SEED_LENGTH as u32 * 8);
        assert_eq!(PHRASE_WORD_COUNT, PHRASE_DATA_WORD_COUNT + 1);
        assert_eq!(1usize << PHRASE_WORD_BITS, WORDLIST_SIZE);
    }

    #[test]
    fn address_length_matches_base32_of_payload() {
        let payload_bits = (PUBLIC_KEY_LENGTH + ADDRESS_CHECKSUM_LENGTH) * 8;
        assert_eq!(payload_bits.div_ceil(5), ADDRESS_LENGTH);
    }

    #[test]
    fn fingerprint_hex_is_twice_the_byte_length() {
        assert_eq!(FINGERPRINT_LENGTH * 2, FINGERPRINT_HEX_LENGTH);
    }
}
