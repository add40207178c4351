//! Request and Response message types.
//!
//! Defines the message format for command requests and responses
//! between the harness and the device's remote Web Inspector.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::{Error, Result, UNKNOWN_REMOTE_FAILURE};

// ============================================================================
// Request
// ============================================================================

/// A command request from the harness to the inspector.
///
/// # Format
///
/// ```json
/// {
///   "id": 7,
///   "method": "Runtime.evaluate",
///   "params": { "expression": "1+1" }
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Request {
    /// Identifier for request/response correlation.
    pub id: u64,

    /// Inspector method in `Domain.method` format.
    pub method: String,

    /// Method parameters.
    pub params: Value,
}

impl Request {
    /// Creates a request for an arbitrary inspector method.
    #[inline]
    #[must_use]
    pub fn new(id: u64, method: impl Into<String>, params: Value) -> Self {
        Self {
            id,
            method: method.into(),
            params,
        }
    }

    /// Creates a `Runtime.enable` request.
    #[inline]
    #[must_use]
    pub fn enable(id: u64) -> Self {
        Self::new(id, "Runtime.enable", json!({}))
    }

    /// Creates a `Runtime.evaluate` request for the given expression.
    #[inline]
    #[must_use]
    pub fn evaluate(id: u64, expression: &str) -> Self {
        Self::new(id, "Runtime.evaluate", json!({ "expression": expression }))
    }
}

// ============================================================================
// Response
// ============================================================================

/// A response from the inspector to the harness.
///
/// # Format
///
/// Success:
/// ```json
/// { "id": 7, "result": { ... } }
/// ```
///
/// Error:
/// ```json
/// { "id": 7, "error": { "code": -32601, "message": "..." } }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Response {
    /// Matches the request `id`.
    pub id: u64,

    /// Result data (if success).
    #[serde(default)]
    pub result: Option<Value>,

    /// Error details (if the inspector rejected the request).
    #[serde(default)]
    pub error: Option<ProtocolError>,
}

impl Response {
    /// Extracts the result value, failing if the inspector rejected.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Protocol`] if the response carried an error.
    pub fn into_result(self) -> Result<Value> {
        match self.error {
            Some(err) => Err(Error::protocol(err.message)),
            None => Ok(self.result.unwrap_or(Value::Null)),
        }
    }
}

// ============================================================================
// ProtocolError
// ============================================================================

/// Error object attached to a failed inspector response.
#[derive(Debug, Clone, Deserialize)]
pub struct ProtocolError {
    /// Numeric error code, when the inspector reports one.
    #[serde(default)]
    pub code: Option<i64>,

    /// Error message.
    pub message: String,
}

// ============================================================================
// EvaluateResult
// ============================================================================

/// Result payload of a `Runtime.evaluate` round trip.
///
/// # Format
///
/// ```json
/// {
///   "result": { "type": "number", "value": 2 },
///   "wasThrown": false
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct EvaluateResult {
    /// The evaluated remote object.
    pub result: RemoteObject,

    /// Whether the remote execution threw.
    #[serde(default, rename = "wasThrown")]
    pub was_thrown: bool,
}

impl EvaluateResult {
    /// Extracts the resolved value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RemoteEvaluation`] if the remote execution threw,
    /// carrying the remote description when one was reported and the
    /// generic unknown-remote-failure message otherwise.
    pub fn into_value(self) -> Result<Value> {
        if self.was_thrown {
            let message = self
                .result
                .description
                .unwrap_or_else(|| UNKNOWN_REMOTE_FAILURE.to_string());
            return Err(Error::remote_evaluation(message));
        }

        Ok(self.result.value.unwrap_or(Value::Null))
    }
}

// ============================================================================
// RemoteObject
// ============================================================================

/// A value mirrored back from the remote runtime.
///
/// Only JSON-serializable scalars and plain records cross the boundary;
/// anything else arrives as a type tag with no `value`.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteObject {
    /// Remote type tag (`"number"`, `"string"`, `"object"`, ...).
    #[serde(default, rename = "type")]
    pub object_type: String,

    /// The mirrored value, when serializable.
    #[serde(default)]
    pub value: Option<Value>,

    /// Human-readable description; set for thrown exceptions.
    #[serde(default)]
    pub description: Option<String>,
}

// ============================================================================
// Tests
// ============================================================================
