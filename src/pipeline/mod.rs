//! # Submission Pipeline
//!
//! The orchestrator that drives one attestation session end to end:
//! file intake → streaming digest → credential validation → build, sign,
//! submit → confirmation. It owns the [`WorkflowState`] machine and is the
//! only place that mutates it.
//!
//! ## Concurrency model
//!
//! One logical workflow per pipeline. Session state lives behind a
//! `parking_lot::Mutex`, so the `Submitting` state is a real
//! mutual-exclusion gate even when callers hold the pipeline in an `Arc`
//! across tasks. Digesting runs on a spawned task; replacing the file
//! cancels the in-flight digest and bumps a generation counter, and a
//! digest result is only applied if its generation is still current —
//! last file wins, stale results are dropped, regardless of completion
//! order.
//!
//! ## Secrets
//!
//! The recovery phrase enters exactly two methods,
//! [`SubmissionPipeline::validate_phrase`] and [`SubmissionPipeline::submit`],
//! and the derived identity never outlives the call that created it. Nothing
//! secret is cached, logged, or stored on the pipeline.

pub mod state;

use bytes::Bytes;
use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config;
use crate::crypto::digest::{self, CancelFlag, ContentFingerprint, DigestError};
use crate::identity::{Address, PhraseError, SigningIdentity};
use crate::ledger::{LedgerClient, LedgerError};
use crate::transaction::{
    sign_transaction, AttestationRecord, FailureReason, SubmissionResult, TransactionBuilder,
    ValidationError,
};

pub use state::WorkflowState;

/// Errors surfaced by pipeline operations.
///
/// These are the *recoverable* outcomes — the session continues after
/// each of them. Terminal outcomes (confirmation, rejection, timeout)
/// are values, not errors: see [`SubmissionResult`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// The uploaded content does not declare an image media type.
    #[error("unsupported media type {media_type:?}: expected image/*")]
    UnsupportedMediaType {
        /// The declared media type.
        media_type: String,
    },

    /// The operation is not legal in the current state.
    #[error("cannot {operation} while in state {state}")]
    InvalidState {
        /// What was attempted.
        operation: &'static str,
        /// The state it was attempted in.
        state: WorkflowState,
    },

    /// A submission is already in flight; the second call is rejected,
    /// not queued, and the in-flight attempt is untouched.
    #[error("a submission is already in flight")]
    SubmissionInFlight,

    /// The recovery phrase failed validation. Never partially accepted.
    #[error("invalid recovery phrase: {0}")]
    InvalidPhrase(#[from] PhraseError),

    /// The attestation record failed validation before any network call.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Connectivity failure before the payload was handed to the network.
    /// The session returns to `DigestReady`; fingerprint and inputs are
    /// preserved and the whole submit step may be retried.
    #[error("network error: {0}")]
    Network(String),

    /// The digest worker disappeared without an outcome.
    #[error("digest task failed: {0}")]
    DigestTask(String),

    /// A bug-grade internal failure (e.g. payload serialization).
    #[error("internal error: {0}")]
    Internal(String),
}

/// An in-flight digest computation.
///
/// Returned by [`SubmissionPipeline::start_digest`]; hand it back to
/// [`SubmissionPipeline::finish_digest`] to apply the result. The progress
/// receiver reports the fraction of bytes processed and can be watched
/// from any task.
pub struct DigestTask {
    generation: u64,
    progress: watch::Receiver<f64>,
    handle: JoinHandle<Result<ContentFingerprint, DigestError>>,
}

impl DigestTask {
    /// A receiver for digest progress in `[0.0, 1.0]`.
    pub fn progress(&self) -> watch::Receiver<f64> {
        self.progress.clone()
    }
}

struct LoadedFile {
    bytes: Bytes,
    media_type: String,
}

struct Inner {
    state: WorkflowState,
    file: Option<LoadedFile>,
    fingerprint: Option<ContentFingerprint>,
    /// Generation counter for digest runs. Bumped on every file change;
    /// a digest outcome is applied only if its generation is current.
    digest_generation: u64,
    digest_cancel: Option<CancelFlag>,
    result: Option<SubmissionResult>,
}

impl Inner {
    fn new() -> Self {
        Self {
            state: WorkflowState::Idle,
            file: None,
            fingerprint: None,
            digest_generation: 0,
            digest_cancel: None,
            result: None,
        }
    }

    fn cancel_inflight_digest(&mut self) {
        if let Some(cancel) = self.digest_cancel.take() {
            cancel.cancel();
        }
        self.digest_generation += 1;
    }
}

/// Orchestrates one attestation session over a [`LedgerClient`].
pub struct SubmissionPipeline<L: LedgerClient> {
    ledger: L,
    inner: Mutex<Inner>,
}

impl<L: LedgerClient> SubmissionPipeline<L> {
    /// Create a pipeline in `Idle` over the given ledger client.
    pub fn new(ledger: L) -> Self {
        Self {
            ledger,
            inner: Mutex::new(Inner::new()),
        }
    }

    /// The current workflow state.
    pub fn state(&self) -> WorkflowState {
        self.inner.lock().state
    }

    /// The fingerprint of the currently selected file, once digested.
    pub fn fingerprint(&self) -> Option<ContentFingerprint> {
        self.inner.lock().fingerprint
    }

    /// The terminal result of this session, if one was produced.
    pub fn last_result(&self) -> Option<SubmissionResult> {
        self.inner.lock().result.clone()
    }

    /// Accept an uploaded file.
    ///
    /// Guard: the declared media type must indicate an image; otherwise
    /// the state is left untouched and a rejection is surfaced. Accepting
    /// a file cancels any in-flight digest, discards any previous
    /// fingerprint, and moves the session to `FileLoaded`.
    pub fn select_file(&self, bytes: Bytes, media_type: &str) -> Result<(), PipelineError> {
        let mut inner = self.inner.lock();
        match inner.state {
            WorkflowState::Submitting | WorkflowState::Confirmed | WorkflowState::Failed => {
                return Err(PipelineError::InvalidState {
                    operation: "select a file",
                    state: inner.state,
                });
            }
            _ => {}
        }
        if !media_type.starts_with("image/") {
            return Err(PipelineError::UnsupportedMediaType {
                media_type: media_type.to_owned(),
            });
        }

        inner.cancel_inflight_digest();
        inner.fingerprint = None;
        inner.file = Some(LoadedFile {
            bytes,
            media_type: media_type.to_owned(),
        });
        inner.state = WorkflowState::FileLoaded;
        debug!(media_type, "file accepted");
        Ok(())
    }

    /// Start digesting the currently selected file on a spawned task.
    ///
    /// Moves the session to `Digesting`. The returned [`DigestTask`] must
    /// be passed to [`finish_digest`](Self::finish_digest); if the file is
    /// replaced in the meantime the task is cancelled and its result is
    /// dropped as stale.
    pub fn start_digest(&self) -> Result<DigestTask, PipelineError> {
        let mut inner = self.inner.lock();
        if inner.state != WorkflowState::FileLoaded {
            return Err(PipelineError::InvalidState {
                operation: "start digesting",
                state: inner.state,
            });
        }
        // FileLoaded always holds a file by construction; this guards the
        // invariant without a panic path in library code.
        let Some(file) = inner.file.as_ref() else {
            return Err(PipelineError::Internal(
                "no file present in FileLoaded state".to_owned(),
            ));
        };
        let bytes = file.bytes.clone();

        let cancel = CancelFlag::new();
        inner.digest_cancel = Some(cancel.clone());
        let generation = inner.digest_generation;
        inner.state = WorkflowState::Digesting;
        debug!(size = bytes.len(), generation, "digest started");
        drop(inner);

        let (progress_tx, progress_rx) = watch::channel(0.0);
        let handle = tokio::spawn(async move {
            digest::compute_streaming(bytes.as_ref(), &progress_tx, &cancel).await
        });

        Ok(DigestTask {
            generation,
            progress: progress_rx,
            handle,
        })
    }

    /// Await a digest task and apply its result if still current.
    ///
    /// Returns `Ok(Some(fingerprint))` when the result was applied and the
    /// session moved to `DigestReady`; `Ok(None)` when the result was
    /// stale (the file changed mid-digest) or the computation was
    /// cancelled — in that case the state belongs to the newer file and is
    /// left alone.
    pub async fn finish_digest(
        &self,
        task: DigestTask,
    ) -> Result<Option<ContentFingerprint>, PipelineError> {
        let outcome = task
            .handle
            .await
            .map_err(|e| PipelineError::DigestTask(e.to_string()))?;

        let fingerprint = match outcome {
            Ok(fingerprint) => fingerprint,
            Err(DigestError::Cancelled) => {
                debug!(generation = task.generation, "digest cancelled, result dropped");
                return Ok(None);
            }
        };

        let mut inner = self.inner.lock();
        // A result is applied only to the digest run that produced it, and
        // only while the session is still digesting. Anything else — a
        // newer file, a reset, a terminal failure — owns the state now.
        if task.generation != inner.digest_generation
            || inner.state != WorkflowState::Digesting
        {
            debug!(generation = task.generation, state = %inner.state, "digest result dropped");
            return Ok(None);
        }
        inner.fingerprint = Some(fingerprint);
        inner.digest_cancel = None;
        inner.state = WorkflowState::DigestReady;
        info!(fingerprint = %fingerprint, "digest ready");
        Ok(Some(fingerprint))
    }

    /// Validate the recovery phrase and preview the derived address.
    ///
    /// Guard for the `credentialsValid` transition: on success the session
    /// moves from `DigestReady` to `AwaitingCredentials` and the address
    /// that will sign is returned for display. On failure the session
    /// stays in `DigestReady` and nothing else is mutated. The derived
    /// identity is dropped before this method returns.
    pub fn validate_phrase(&self, phrase: &str) -> Result<Address, PipelineError> {
        let mut inner = self.inner.lock();
        if inner.state != WorkflowState::DigestReady {
            return Err(PipelineError::InvalidState {
                operation: "validate credentials",
                state: inner.state,
            });
        }
        let identity = SigningIdentity::from_phrase(phrase)?;
        let address = *identity.address();
        inner.state = WorkflowState::AwaitingCredentials;
        debug!(address = %address, "credentials validated");
        Ok(address)
    }

    /// Run one submission attempt end to end.
    ///
    /// The steps, in order: derive the identity, fetch network parameters,
    /// build the attestation record, construct and sign the transaction,
    /// submit, await confirmation. Each fallible step aborts the rest of
    /// the chain; partial progress (e.g. a fetched parameter set) is
    /// discarded, never silently retried.
    ///
    /// Terminal outcomes come back as `Ok(SubmissionResult)` with the
    /// session in `Confirmed` or `Failed`. Recoverable problems come back
    /// as `Err(PipelineError)` with the session rolled back: `DigestReady`
    /// for phrase and connectivity errors, `AwaitingCredentials` for
    /// validation errors.
    pub async fn submit(
        &self,
        phrase: &str,
        reference_text: &str,
    ) -> Result<SubmissionResult, PipelineError> {
        let fingerprint = {
            let mut inner = self.inner.lock();
            match inner.state {
                WorkflowState::Submitting => return Err(PipelineError::SubmissionInFlight),
                WorkflowState::AwaitingCredentials => {}
                state => {
                    return Err(PipelineError::InvalidState {
                        operation: "submit",
                        state,
                    });
                }
            }
            inner.state = WorkflowState::Submitting;
            inner.fingerprint
        };
        info!("submission started");

        match self.run_submission(phrase, reference_text, fingerprint).await {
            Ok(result) => {
                let mut inner = self.inner.lock();
                // A reset while the attempt was in flight owns the session
                // now; the outcome still goes back to the caller.
                if inner.state == WorkflowState::Submitting {
                    match &result {
                        SubmissionResult::Confirmed { tx_id } => {
                            inner.state = WorkflowState::Confirmed;
                            info!(tx_id = %tx_id, "attestation confirmed");
                        }
                        SubmissionResult::Failed { reason } => {
                            inner.state = WorkflowState::Failed;
                            warn!(%reason, "attestation failed");
                        }
                    }
                    inner.result = Some(result.clone());
                }
                Ok(result)
            }
            Err(error) => {
                let mut inner = self.inner.lock();
                if inner.state == WorkflowState::Submitting {
                    inner.state = match &error {
                        PipelineError::InvalidPhrase(_) | PipelineError::Network(_) => {
                            WorkflowState::DigestReady
                        }
                        _ => WorkflowState::AwaitingCredentials,
                    };
                }
                warn!(%error, rollback = %inner.state, "submission aborted");
                Err(error)
            }
        }
    }

    async fn run_submission(
        &self,
        phrase: &str,
        reference_text: &str,
        fingerprint: Option<ContentFingerprint>,
    ) -> Result<SubmissionResult, PipelineError> {
        // The identity lives exactly as long as this function; its secret
        // is zeroized on drop whether we return or bail.
        let identity = SigningIdentity::from_phrase(phrase)?;

        // Validate the record before touching the network: a bad reference
        // text must never cost a round-trip.
        let record = AttestationRecord::build(reference_text, fingerprint, &identity)?;

        let params = self
            .ledger
            .fetch_parameters()
            .await
            .map_err(|e| PipelineError::Network(e.to_string()))?;

        let mut tx = TransactionBuilder::for_record(&record)
            .parameters(&params)
            .build();
        sign_transaction(&mut tx, identity.keypair());
        let payload =
            serde_json::to_vec(&tx).map_err(|e| PipelineError::Internal(e.to_string()))?;

        let tx_id = match self.ledger.submit(&payload).await {
            Ok(tx_id) => tx_id,
            Err(LedgerError::Rejected(reason)) => {
                return Ok(SubmissionResult::Failed {
                    reason: FailureReason::Rejected { reason },
                });
            }
            Err(other) => return Err(PipelineError::Network(other.to_string())),
        };

        match self
            .ledger
            .await_confirmation(&tx_id, config::DEFAULT_CONFIRMATION_ROUNDS)
            .await
        {
            Ok(confirmed) => Ok(SubmissionResult::Confirmed {
                tx_id: confirmed.tx_id,
            }),
            Err(LedgerError::ConfirmationTimeout { rounds }) => Ok(SubmissionResult::Failed {
                reason: FailureReason::ConfirmationTimeout { tx_id, rounds },
            }),
            Err(LedgerError::Rejected(reason)) => Ok(SubmissionResult::Failed {
                reason: FailureReason::Rejected { reason },
            }),
            // The payload is on the network; losing the node mid-poll
            // leaves the outcome unknown, same as a timeout. Resubmission
            // would risk a duplicate, so this is terminal too.
            Err(other) => Ok(SubmissionResult::Failed {
                reason: FailureReason::ConfirmationLost {
                    tx_id,
                    detail: other.to_string(),
                },
            }),
        }
    }

    /// Report a failure originating in an external collaborator (upload
    /// surface, preview, QR rendering). Terminal: the session moves to
    /// `Failed` with an `External` reason, and any in-flight digest is
    /// cancelled so its completion cannot resurrect the session.
    ///
    /// Ignored while `Submitting` — the in-flight attempt owns the terminal
    /// outcome — and in terminal states, which only `reset` leaves.
    pub fn fail_external(&self, detail: impl Into<String>) {
        let mut inner = self.inner.lock();
        if inner.state == WorkflowState::Submitting || inner.state.is_terminal() {
            warn!(state = %inner.state, "external failure report ignored");
            return;
        }
        inner.cancel_inflight_digest();
        let reason = FailureReason::External {
            detail: detail.into(),
        };
        warn!(%reason, "external failure reported");
        inner.state = WorkflowState::Failed;
        inner.result = Some(SubmissionResult::Failed { reason });
    }

    /// Reset the session to `Idle`, discarding the file, fingerprint, and
    /// result. The only way out of a terminal state.
    pub fn reset(&self) {
        let mut inner = self.inner.lock();
        inner.cancel_inflight_digest();
        let generation = inner.digest_generation;
        *inner = Inner::new();
        // Keep the generation monotone so a digest racing the reset can
        // never apply its result to the fresh session.
        inner.digest_generation = generation;
        debug!("session reset");
    }

    /// The media type of the currently selected file, if any.
    pub fn selected_media_type(&self) -> Option<String> {
        self.inner.lock().file.as_ref().map(|f| f.media_type.clone())
    }
}
