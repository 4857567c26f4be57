//! # Recovery Phrase Encoding
//!
//! A recovery phrase is 25 words from the standard 2048-word English
//! wordlist: 24 data words encoding a 32-byte Ed25519 seed (11 bits per
//! word, packed little-endian), plus a 25th checksum word derived from
//! SHA-512/256 of the seed. The checksum word means a mistyped phrase is
//! rejected outright rather than silently deriving the wrong identity.
//!
//! Encoding layout, seed → words:
//!
//! ```text
//! seed (32 bytes, 256 bits)
//!     -> 11-bit groups, LSB first      -> 24 word indices
//! SHA-512/256(seed)[0..2]
//!     -> first 11-bit group            -> 1 checksum word index
//! ```
//!
//! Decoding reverses the packing, requires the 8 spill bits beyond the
//! seed to be zero, and verifies the checksum word. Validation is total:
//! every input string yields either a seed or a specific [`PhraseError`].
//!
//! The wordlist comes from the `bip39` crate; only the list itself is
//! used — the checksum scheme here is the ledger's, not BIP-39's.

use thiserror::Error;
use zeroize::Zeroizing;

use crate::config;
use crate::crypto::hash::sha512_256;
use crate::crypto::keys::Keypair;

/// Errors from recovery-phrase parsing.
///
/// Deliberately specific: "wrong word count" and "checksum failed" call
/// for different fixes from the operator, so they are reported apart.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PhraseError {
    /// The phrase does not contain exactly 25 words.
    #[error("recovery phrase must contain {expected} words, got {got}", expected = config::PHRASE_WORD_COUNT)]
    WrongWordCount {
        /// Number of whitespace-separated words found.
        got: usize,
    },

    /// A word is not in the wordlist.
    #[error("word {position} is not in the wordlist")]
    UnknownWord {
        /// 1-based position of the offending word. The word itself is not
        /// echoed back: phrase fragments are secret material.
        position: usize,
    },

    /// The word count is right and every word is known, but the embedded
    /// checksum does not match the decoded seed.
    #[error("recovery phrase checksum mismatch")]
    ChecksumMismatch,
}

/// A validated recovery phrase, reduced to the seed it encodes.
///
/// Construction via [`RecoveryPhrase::parse`] performs full validation;
/// a value of this type always holds a checksum-verified seed. The seed
/// is zeroized on drop.
pub struct RecoveryPhrase {
    seed: Zeroizing<[u8; 32]>,
}

impl RecoveryPhrase {
    /// Parse and validate a phrase string.
    ///
    /// Words are matched case-insensitively against the wordlist. Excess
    /// whitespace between words is tolerated; anything else is not.
    pub fn parse(input: &str) -> Result<Self, PhraseError> {
        let words: Vec<&str> = input.split_whitespace().collect();
        if words.len() != config::PHRASE_WORD_COUNT {
            return Err(PhraseError::WrongWordCount { got: words.len() });
        }

        let mut indices = Vec::with_capacity(config::PHRASE_WORD_COUNT);
        for (position, word) in words.iter().enumerate() {
            let lowered = word.to_lowercase();
            let index = wordlist()
                .iter()
                .position(|candidate| *candidate == lowered)
                .ok_or(PhraseError::UnknownWord {
                    position: position + 1,
                })?;
            indices.push(index as u16);
        }

        let data = indices_to_bytes(&indices[..config::PHRASE_DATA_WORD_COUNT]);
        // 24 words decode to 33 bytes; the spill byte past the seed must be
        // zero in any validly encoded phrase.
        debug_assert_eq!(data.len(), config::SEED_LENGTH + 1);
        if data[config::SEED_LENGTH] != 0 {
            return Err(PhraseError::ChecksumMismatch);
        }

        let mut seed = Zeroizing::new([0u8; 32]);
        seed.copy_from_slice(&data[..config::SEED_LENGTH]);

        if checksum_index(&seed[..]) != indices[config::PHRASE_DATA_WORD_COUNT] {
            return Err(PhraseError::ChecksumMismatch);
        }

        Ok(Self { seed })
    }

    /// Derive the Ed25519 keypair this phrase encodes.
    pub fn derive_keypair(&self) -> Keypair {
        Keypair::from_seed(&self.seed)
    }
}

impl std::fmt::Debug for RecoveryPhrase {
    // The seed never appears in logs or panics.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("RecoveryPhrase(..)")
    }
}

/// Encode a 32-byte seed as a 25-word phrase.
///
/// The inverse of [`RecoveryPhrase::parse`]. Used by provisioning tooling
/// and tests; the submission pipeline itself only ever decodes.
pub fn phrase_from_seed(seed: &[u8; 32]) -> String {
    let mut indices = bytes_to_indices(seed);
    debug_assert_eq!(indices.len(), config::PHRASE_DATA_WORD_COUNT);
    indices.push(checksum_index(seed));

    let list = wordlist();
    let words: Vec<&str> = indices.iter().map(|&i| list[i as usize]).collect();
    words.join(" ")
}

/// The checksum word index for a seed: the first 11-bit group of
/// SHA-512/256(seed).
fn checksum_index(seed: &[u8]) -> u16 {
    let digest = sha512_256(seed);
    bytes_to_indices(&digest[..2])[0]
}

fn wordlist() -> &'static [&'static str] {
    bip39::Language::English.word_list()
}

/// Pack 11-bit indices into bytes, least-significant bits first.
fn indices_to_bytes(indices: &[u16]) -> Vec<u8> {
    let mut out = Vec::with_capacity(indices.len() * 11 / 8 + 1);
    let mut acc: u32 = 0;
    let mut acc_bits: u32 = 0;
    for &index in indices {
        acc |= u32::from(index) << acc_bits;
        acc_bits += config::PHRASE_WORD_BITS;
        while acc_bits >= 8 {
            out.push((acc & 0xFF) as u8);
            acc >>= 8;
            acc_bits -= 8;
        }
    }
    if acc_bits > 0 {
        out.push((acc & 0xFF) as u8);
    }
    out
}

/// Unpack bytes into 11-bit indices, least-significant bits first.
fn bytes_to_indices(bytes: &[u8]) -> Vec<u16> {
    let mut out = Vec::with_capacity(bytes.len() * 8 / 11 + 1);
    let mut acc: u32 = 0;
    let mut acc_bits: u32 = 0;
    for &byte in bytes {
        acc |= u32::from(byte) << acc_bits;
        acc_bits += 8;
        if acc_bits >= config::PHRASE_WORD_BITS {
            out.push((acc & 0x7FF) as u16);
            acc >>= config::PHRASE_WORD_BITS;
            acc_bits -= config::PHRASE_WORD_BITS;
        }
    }
    if acc_bits > 0 {
        out.push((acc & 0x7FF) as u16);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_roundtrips_through_phrase() {
        let seed = [0xC4u8; 32];
        let phrase = phrase_from_seed(&seed);
        assert_eq!(phrase.split_whitespace().count(), config::PHRASE_WORD_COUNT);

        let parsed = RecoveryPhrase::parse(&phrase).unwrap();
        assert_eq!(&parsed.seed[..], &seed[..]);
    }

    #[test]
    fn all_zero_and_all_ff_seeds_roundtrip() {
        for seed in [[0u8; 32], [0xFFu8; 32]] {
            let phrase = phrase_from_seed(&seed);
            let parsed = RecoveryPhrase::parse(&phrase).unwrap();
            assert_eq!(&parsed.seed[..], &seed[..]);
        }
    }

    #[test]
    fn parse_is_deterministic() {
        let phrase = phrase_from_seed(&[42u8; 32]);
        let a = RecoveryPhrase::parse(&phrase).unwrap().derive_keypair();
        let b = RecoveryPhrase::parse(&phrase).unwrap().derive_keypair();
        assert_eq!(a.public_key_bytes(), b.public_key_bytes());
    }

    #[test]
    fn wrong_word_count_rejected() {
        let phrase = phrase_from_seed(&[1u8; 32]);
        let truncated: Vec<&str> = phrase.split_whitespace().take(24).collect();
        let result = RecoveryPhrase::parse(&truncated.join(" "));
        assert_eq!(result.err(), Some(PhraseError::WrongWordCount { got: 24 }));

        assert_eq!(
            RecoveryPhrase::parse("").err(),
            Some(PhraseError::WrongWordCount { got: 0 })
        );
    }

    #[test]
    fn unknown_word_rejected_with_position() {
        let phrase = phrase_from_seed(&[1u8; 32]);
        let mut words: Vec<&str> = phrase.split_whitespace().collect();
        words[7] = "zzzzzz";
        let result = RecoveryPhrase::parse(&words.join(" "));
        assert_eq!(result.err(), Some(PhraseError::UnknownWord { position: 8 }));
    }

    #[test]
    fn tampered_checksum_word_rejected() {
        let phrase = phrase_from_seed(&[9u8; 32]);
        let mut words: Vec<&str> = phrase.split_whitespace().collect();
        let last = *words.last().unwrap();
        // Swap the checksum word for a different valid word.
        words[24] = if last == "abandon" { "ability" } else { "abandon" };
        let result = RecoveryPhrase::parse(&words.join(" "));
        assert_eq!(result.err(), Some(PhraseError::ChecksumMismatch));
    }

    #[test]
    fn swapped_data_words_rejected() {
        // Two different seeds give different checksums with overwhelming
        // probability; swapping a pair of distinct data words invalidates
        // the phrase.
        let phrase = phrase_from_seed(&[
            1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23,
            24, 25, 26, 27, 28, 29, 30, 31, 32,
        ]);
        let original = RecoveryPhrase::parse(&phrase).unwrap();
        let mut words: Vec<&str> = phrase.split_whitespace().collect();
        assert_ne!(words[0], words[1]);
        words.swap(0, 1);
        // A swapped phrase is either rejected outright or, in the rare case
        // the checksum still lines up, decodes to a different seed. It can
        // never silently yield the original identity.
        match RecoveryPhrase::parse(&words.join(" ")) {
            Err(err) => assert_eq!(err, PhraseError::ChecksumMismatch),
            Ok(parsed) => assert_ne!(&parsed.seed[..], &original.seed[..]),
        }
    }

    #[test]
    fn case_and_extra_whitespace_tolerated() {
        let phrase = phrase_from_seed(&[5u8; 32]);
        let shouty = phrase.to_uppercase().replace(' ', "   ");
        let parsed = RecoveryPhrase::parse(&shouty).unwrap();
        assert_eq!(&parsed.seed[..], &[5u8; 32][..]);
    }

    #[test]
    fn checksum_index_fits_wordlist() {
        for seed in [[0u8; 32], [0x55u8; 32], [0xFFu8; 32]] {
            assert!((checksum_index(&seed) as usize) < config::WORDLIST_SIZE);
        }
    }

    #[test]
    fn bit_packing_roundtrips() {
        let bytes: Vec<u8> = (0u8..=32).collect();
        let indices = bytes_to_indices(&bytes);
        let unpacked = indices_to_bytes(&indices);
        assert_eq!(&unpacked[..bytes.len()], &bytes[..]);
    }

    #[test]
    fn debug_never_leaks_seed() {
        let phrase = phrase_from_seed(&[0xABu8; 32]);
        let parsed = RecoveryPhrase::parse(&phrase).unwrap();
        assert_eq!(format!("{parsed:?}"), "RecoveryPhrase(..)");
    }
}
