//! # JSON-RPC API Definitions
//!
//! Type-safe definitions for the ledger node's JSON-RPC API. This module
//! defines the envelope and method enumeration; the HTTP transport lives
//! in [`super::http`].
//!
//! The API follows the JSON-RPC 2.0 specification with method names
//! prefixed `mark_`, avoiding collisions with other JSON-RPC services a
//! node might co-host.
//!
//! ## Method Index
//!
//! | Method                        | Description                             |
//! |-------------------------------|-----------------------------------------|
//! | `mark_getTransactionParams`   | Current fee and round parameters        |
//! | `mark_submitTransaction`      | Submit a signed transaction payload     |
//! | `mark_getPendingTransaction`  | Confirmation status of a transaction    |

use serde::{Deserialize, Serialize};

/// Supported JSON-RPC methods.
///
/// The wire name is the serde rename (e.g. `"mark_submitTransaction"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RpcMethod {
    /// Fetch current network parameters. Parameters: none.
    #[serde(rename = "mark_getTransactionParams")]
    GetTransactionParams,
    /// Submit a signed transaction payload.
    /// Parameters: `{ "payload": hex string }`.
    #[serde(rename = "mark_submitTransaction")]
    SubmitTransaction,
    /// Query the confirmation status of a transaction.
    /// Parameters: `{ "tx_id": String }`.
    #[serde(rename = "mark_getPendingTransaction")]
    GetPendingTransaction,
}

/// A JSON-RPC 2.0 request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcRequest {
    /// JSON-RPC version. Always "2.0".
    pub jsonrpc: String,
    /// Request identifier, echoed back in the response.
    pub id: serde_json::Value,
    /// The method to invoke.
    pub method: RpcMethod,
    /// Method-specific parameters.
    #[serde(default)]
    pub params: serde_json::Value,
}

impl RpcRequest {
    /// Create a request with the given method and parameters.
    pub fn new(id: serde_json::Value, method: RpcMethod, params: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            method,
            params,
        }
    }
}

/// A JSON-RPC 2.0 response.
///
/// Exactly one of `result` or `error` is set by a conforming node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcResponse {
    /// JSON-RPC version. Always "2.0".
    pub jsonrpc: String,
    /// The request ID this response corresponds to.
    pub id: serde_json::Value,
    /// The successful result, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    /// The error, if the method failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

/// A JSON-RPC 2.0 error object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcError {
    /// Numeric error code.
    pub code: i64,
    /// Human-readable message.
    pub message: String,
    /// Optional structured detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// Result payload of `mark_getPendingTransaction`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingTransactionStatus {
    /// The round the transaction was confirmed in; zero or absent while
    /// still pending.
    #[serde(default)]
    pub confirmed_round: u64,
    /// Non-empty when the transaction was dropped from the pool with an
    /// error — a rejection, not a pending state.
    #[serde(default)]
    pub pool_error: String,
}
