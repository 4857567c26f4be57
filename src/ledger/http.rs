//! # HTTP Ledger Client
//!
//! [`LedgerClient`] implementation speaking JSON-RPC 2.0 over HTTP to a
//! ledger node. Every request is bounded by
//! [`config::HTTP_REQUEST_TIMEOUT`]; confirmation polling sleeps
//! [`config::CONFIRMATION_POLL_INTERVAL`] between single-shot polls and
//! never retries an individual request.
//!
//! Error mapping is deliberate and per-operation: a transport failure is
//! always [`LedgerError::Network`], an RPC error object on `submit` is a
//! rejection, and an RPC error on a read is a protocol fault — reads have
//! nothing to reject.

use async_trait::async_trait;
use serde_json::json;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

use crate::config;
use crate::transaction::TransactionId;

use super::rpc::{PendingTransactionStatus, RpcError, RpcMethod, RpcRequest, RpcResponse};
use super::{ConfirmedTransaction, LedgerClient, LedgerError, NetworkParameters};

/// What went wrong with one RPC call, before per-operation mapping.
enum CallFailure {
    Transport(String),
    Malformed(String),
    Rpc(RpcError),
}

/// A JSON-RPC client for one ledger node endpoint.
pub struct HttpLedgerClient {
    http: reqwest::Client,
    endpoint: String,
    next_id: AtomicU64,
}

impl HttpLedgerClient {
    /// Create a client for the given node endpoint URL.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, LedgerError> {
        let http = reqwest::Client::builder()
            .timeout(config::HTTP_REQUEST_TIMEOUT)
            .build()
            .map_err(|e| LedgerError::Network(e.to_string()))?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
            next_id: AtomicU64::new(1),
        })
    }

    /// One JSON-RPC round-trip. No retries at this layer.
    async fn call(
        &self,
        method: RpcMethod,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, CallFailure> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = RpcRequest::new(json!(id), method, params);
        debug!(?method, id, "ledger rpc call");

        let response = self
            .http
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| CallFailure::Transport(e.to_string()))?;

        let response: RpcResponse = response
            .json()
            .await
            .map_err(|e| CallFailure::Malformed(e.to_string()))?;

        if let Some(error) = response.error {
            warn!(?method, code = error.code, "ledger rpc error: {}", error.message);
            return Err(CallFailure::Rpc(error));
        }
        response
            .result
            .ok_or_else(|| CallFailure::Malformed("response carried neither result nor error".into()))
    }
}

/// Map a read-path failure: RPC errors on reads are protocol faults.
fn read_failure(failure: CallFailure) -> LedgerError {
    match failure {
        CallFailure::Transport(detail) => LedgerError::Network(detail),
        CallFailure::Malformed(detail) => LedgerError::Protocol(detail),
        CallFailure::Rpc(error) => LedgerError::Protocol(error.message),
    }
}

#[async_trait]
impl LedgerClient for HttpLedgerClient {
    async fn fetch_parameters(&self) -> Result<NetworkParameters, LedgerError> {
        let value = self
            .call(RpcMethod::GetTransactionParams, json!(null))
            .await
            .map_err(read_failure)?;
        serde_json::from_value(value).map_err(|e| LedgerError::Protocol(e.to_string()))
    }

    async fn submit(&self, signed_payload: &[u8]) -> Result<TransactionId, LedgerError> {
        let params = json!({ "payload": hex::encode(signed_payload) });
        let value = self
            .call(RpcMethod::SubmitTransaction, params)
            .await
            .map_err(|failure| match failure {
                CallFailure::Transport(detail) => LedgerError::Network(detail),
                CallFailure::Malformed(detail) => LedgerError::Protocol(detail),
                // An error object on submit is the network refusing the
                // transaction.
                CallFailure::Rpc(error) => LedgerError::Rejected(error.message),
            })?;

        let tx_id = value
            .get("tx_id")
            .and_then(|v| v.as_str())
            .ok_or_else(|| LedgerError::Protocol("submit result missing tx_id".into()))?;
        debug!(tx_id, "transaction accepted by node");
        Ok(TransactionId::new(tx_id))
    }

    async fn await_confirmation(
        &self,
        id: &TransactionId,
        max_rounds: u64,
    ) -> Result<ConfirmedTransaction, LedgerError> {
        for round in 0..max_rounds {
            let value = self
                .call(
                    RpcMethod::GetPendingTransaction,
                    json!({ "tx_id": id.as_str() }),
                )
                .await
                .map_err(read_failure)?;
            let status: PendingTransactionStatus =
                serde_json::from_value(value).map_err(|e| LedgerError::Protocol(e.to_string()))?;

            if !status.pool_error.is_empty() {
                return Err(LedgerError::Rejected(status.pool_error));
            }
            if status.confirmed_round > 0 {
                debug!(tx_id = id.as_str(), round = status.confirmed_round, "confirmed");
                return Ok(ConfirmedTransaction {
                    tx_id: id.clone(),
                    confirmed_round: status.confirmed_round,
                });
            }

            if round + 1 < max_rounds {
                tokio::time::sleep(config::CONFIRMATION_POLL_INTERVAL).await;
            }
        }
        Err(LedgerError::ConfirmationTimeout { rounds: max_rounds })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_builds_for_plain_endpoint() {
        assert!(HttpLedgerClient::new("http://localhost:8645").is_ok());
    }

    #[test]
    fn read_failures_map_to_network_and_protocol() {
        assert_eq!(
            read_failure(CallFailure::Transport("refused".into())),
            LedgerError::Network("refused".into())
        );
        assert_eq!(
            read_failure(CallFailure::Malformed("eof".into())),
            LedgerError::Protocol("eof".into())
        );
        assert_eq!(
            read_failure(CallFailure::Rpc(RpcError {
                code: -32601,
                message: "no such method".into(),
                data: None,
            })),
            LedgerError::Protocol("no such method".into())
        );
    }
}
