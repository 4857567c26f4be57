//! # Streaming Content Digestor
//!
//! Computes the SHA-256 fingerprint of file content incrementally: the
//! input is fed to the hasher in bounded chunks, progress is published
//! after every chunk, and a shared cancellation flag is checked between
//! chunks so an in-flight computation can be abandoned when the operator
//! replaces the file.
//!
//! Cancellation matters more than it looks: the workflow guarantees that
//! the fingerprint it reports always belongs to the *currently selected*
//! file. A digest that loses that race returns [`DigestError::Cancelled`]
//! and never produces a fingerprint at all, so a stale result cannot
//! overwrite a fresh one.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;

use crate::config;

/// Errors from the content digestor.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DigestError {
    /// The computation was cancelled before completion, typically because
    /// the file it was digesting is no longer the selected one.
    #[error("digest cancelled before completion")]
    Cancelled,
}

/// A 32-byte SHA-256 content fingerprint.
///
/// Rendered as exactly 64 lowercase hex characters. Recomputing the
/// fingerprint of the same bytes always yields the same value — that
/// determinism is what makes it usable as evidence.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentFingerprint {
    bytes: [u8; 32],
}

impl ContentFingerprint {
    /// Fingerprint the full input in one call.
    ///
    /// Total: every byte sequence has a fingerprint, including the empty
    /// one. Use [`compute_streaming`] when progress or cancellation is
    /// needed.
    pub fn compute(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        Self {
            bytes: hasher.finalize().into(),
        }
    }

    /// Raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }

    /// Lowercase hex rendering, always 64 characters.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// Parse a fingerprint from its 64-character lowercase hex form.
    ///
    /// Rejects uppercase input: the rendered form is defined as lowercase
    /// and memo decomposition depends on that.
    pub fn from_hex(hex_str: &str) -> Option<Self> {
        if hex_str.len() != config::FINGERPRINT_HEX_LENGTH {
            return None;
        }
        if !hex_str
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
        {
            return None;
        }
        let decoded = hex::decode(hex_str).ok()?;
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&decoded);
        Some(Self { bytes })
    }
}

impl fmt::Display for ContentFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ContentFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentFingerprint({})", self.to_hex())
    }
}

/// Shared cancellation flag for an in-flight digest.
///
/// Cloned into the digest task; cancelling from any clone stops the
/// computation at the next chunk boundary. One-way: a cancelled flag
/// stays cancelled.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag {
    cancelled: Arc<AtomicBool>,
}

impl CancelFlag {
    /// A fresh, uncancelled flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Compute a fingerprint incrementally with progress reporting.
///
/// The input is processed in [`config::DIGEST_CHUNK_SIZE`] chunks. After
/// each chunk the fraction of bytes processed (0.0 to 1.0) is published on
/// `progress`, the cancellation flag is checked, and the task yields so
/// other work on the runtime — including the cancel call itself — can run.
///
/// Memory use is independent of input size; the hasher state is the only
/// thing carried between chunks.
pub async fn compute_streaming(
    data: &[u8],
    progress: &watch::Sender<f64>,
    cancel: &CancelFlag,
) -> Result<ContentFingerprint, DigestError> {
    let total = data.len();
    let mut hasher = Sha256::new();
    let mut processed = 0usize;

    for chunk in data.chunks(config::DIGEST_CHUNK_SIZE) {
        if cancel.is_cancelled() {
            return Err(DigestError::Cancelled);
        }
        hasher.update(chunk);
        processed += chunk.len();
        progress.send_replace(processed as f64 / total as f64);
        tokio::task::yield_now().await;
    }

    if cancel.is_cancelled() {
        return Err(DigestError::Cancelled);
    }

    // Empty input never enters the loop; it still completes at 100%.
    progress.send_replace(1.0);
    Ok(ContentFingerprint {
        bytes: hasher.finalize().into(),
    })
}
