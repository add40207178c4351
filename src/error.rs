//! Error types for the remote-control harness.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use ps_remote::{Result, LogicalKey};
//!
//! async fn example(remote: &mut Remote) -> Result<()> {
//!     remote.press(LogicalKey::Cross).await?;
//!     remote.wait_for("window.loaded", "page load", WaitOptions::default()).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Configuration | [`Error::UnknownDriver`], [`Error::DuplicateExtension`], [`Error::InvalidNamespace`], [`Error::InvalidPosition`] |
//! | Connection | [`Error::Connection`], [`Error::ConnectionTimeout`], [`Error::NotConnected`] |
//! | Input | [`Error::UnsupportedKey`] |
//! | Execution | [`Error::RemoteEvaluation`], [`Error::WaitTimeout`] |
//! | Protocol | [`Error::Protocol`] |
//! | Query | [`Error::ComponentNotFound`], [`Error::Mismatch`] |
//! | External | [`Error::Io`], [`Error::Json`], [`Error::WebSocket`], [`Error::Http`] |

// ============================================================================
// Imports
// ============================================================================

use std::io::Error as IoError;
use std::result::Result as StdResult;

use thiserror::Error;
use tokio::sync::oneshot::error::RecvError;
use tokio_tungstenite::tungstenite::Error as WsError;

use crate::keys::LogicalKey;
use crate::transport::TransportKind;

// ============================================================================
// Constants
// ============================================================================

/// Message used when the remote side fails without a description.
pub(crate) const UNKNOWN_REMOTE_FAILURE: &str = "unknown remote failure";

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
///
/// All fallible operations in this crate return this type.
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
///
/// Each variant includes relevant context for debugging.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Connection Errors
    // ========================================================================
    /// Transport failed to reach or identify the remote target.
    ///
    /// Fatal to the run; there is no automatic retry.
    #[error("Connection failed: {message}")]
    Connection {
        /// Description of the connection error.
        message: String,
    },

    /// Connection or readiness poll exceeded its deadline.
    #[error("Connection timeout after {timeout_ms}ms")]
    ConnectionTimeout {
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    /// Operation issued against a transport with no live connection.
    #[error("Not connected to a remote target")]
    NotConnected,

    // ========================================================================
    // Input Errors
    // ========================================================================
    /// Logical key has no mapping for the active transport.
    ///
    /// Indicates a test or configuration bug; always fatal.
    #[error("Key {key} is not supported by the {transport} driver")]
    UnsupportedKey {
        /// The unmapped logical key.
        key: LogicalKey,
        /// The transport that rejected it.
        transport: TransportKind,
    },

    // ========================================================================
    // Execution Errors
    // ========================================================================
    /// Remote script execution threw.
    ///
    /// Carries the remote-reported description when one exists.
    #[error("Remote evaluation failed: {message}")]
    RemoteEvaluation {
        /// Error description from the remote runtime.
        message: String,
    },

    /// A `wait_for` poll exceeded its timeout.
    #[error("Timed out after {timeout_ms}ms waiting for {description} ({expression})")]
    WaitTimeout {
        /// Human-readable description of what was awaited.
        description: String,
        /// The polled expression, for diagnostics.
        expression: String,
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Driver name does not resolve to a registered driver extension.
    #[error("Unknown driver: {name}")]
    UnknownDriver {
        /// The unresolved driver name.
        name: String,
    },

    /// Extension namespace is already registered.
    ///
    /// Fatal startup error; fails before any test runs.
    #[error("Extension namespace already in use: {namespace}")]
    DuplicateExtension {
        /// The contested namespace.
        namespace: String,
    },

    /// Extension namespace fails the validation pattern.
    #[error("Invalid extension namespace: {namespace}")]
    InvalidNamespace {
        /// The rejected namespace.
        namespace: String,
    },

    /// Window position string does not match `LEFTxTOP,WIDTHxHEIGHT`.
    #[error("Invalid window position: {value}")]
    InvalidPosition {
        /// The rejected position string.
        value: String,
    },

    // ========================================================================
    // Protocol Errors
    // ========================================================================
    /// Protocol violation or unexpected response shape.
    #[error("Protocol error: {message}")]
    Protocol {
        /// Description of the protocol violation.
        message: String,
    },

    // ========================================================================
    // Query Errors
    // ========================================================================
    /// Component lookup matched nothing on the remote page.
    #[error("Could not find component {selector}")]
    ComponentNotFound {
        /// Selector used for the lookup.
        selector: String,
    },

    /// Assertion mismatch on a queried component.
    #[error("expected {subject} to be {expected:?}, got {actual:?}")]
    Mismatch {
        /// What was being checked.
        subject: String,
        /// The expected value.
        expected: String,
        /// The observed value.
        actual: String,
    },

    // ========================================================================
    // External Errors
    // ========================================================================
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// WebSocket error.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] WsError),

    /// HTTP client error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Channel receive error.
    #[error("Channel closed")]
    ChannelClosed(#[from] RecvError),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a connection error.
    #[inline]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a connection timeout error.
    #[inline]
    pub fn connection_timeout(timeout_ms: u64) -> Self {
        Self::ConnectionTimeout { timeout_ms }
    }

    /// Creates an unsupported key error.
    #[inline]
    pub fn unsupported_key(key: LogicalKey, transport: TransportKind) -> Self {
        Self::UnsupportedKey { key, transport }
    }

    /// Creates a remote evaluation error.
    #[inline]
    pub fn remote_evaluation(message: impl Into<String>) -> Self {
        Self::RemoteEvaluation {
            message: message.into(),
        }
    }

    /// Creates a remote evaluation error with the generic description.
    ///
    /// Used when the remote side rejects without reporting a reason.
    #[inline]
    pub fn unknown_remote_failure() -> Self {
        Self::remote_evaluation(UNKNOWN_REMOTE_FAILURE)
    }

    /// Creates a wait timeout error.
    #[inline]
    pub fn wait_timeout(
        description: impl Into<String>,
        expression: impl Into<String>,
        timeout_ms: u64,
    ) -> Self {
        Self::WaitTimeout {
            description: description.into(),
            expression: expression.into(),
            timeout_ms,
        }
    }

    /// Creates an unknown driver error.
    #[inline]
    pub fn unknown_driver(name: impl Into<String>) -> Self {
        Self::UnknownDriver { name: name.into() }
    }

    /// Creates a duplicate extension error.
    #[inline]
    pub fn duplicate_extension(namespace: impl Into<String>) -> Self {
        Self::DuplicateExtension {
            namespace: namespace.into(),
        }
    }

    /// Creates an invalid namespace error.
    #[inline]
    pub fn invalid_namespace(namespace: impl Into<String>) -> Self {
        Self::InvalidNamespace {
            namespace: namespace.into(),
        }
    }

    /// Creates an invalid window position error.
    #[inline]
    pub fn invalid_position(value: impl Into<String>) -> Self {
        Self::InvalidPosition {
            value: value.into(),
        }
    }

    /// Creates a protocol error.
    #[inline]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Creates a component not found error.
    #[inline]
    pub fn component_not_found(selector: impl Into<String>) -> Self {
        Self::ComponentNotFound {
            selector: selector.into(),
        }
    }

    /// Creates an assertion mismatch error.
    #[inline]
    pub fn mismatch(
        subject: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::Mismatch {
            subject: subject.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this is a timeout error.
    #[inline]
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::ConnectionTimeout { .. } | Self::WaitTimeout { .. }
        )
    }

    /// Returns `true` if this is a connection error.
    #[inline]
    #[must_use]
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Self::Connection { .. }
                | Self::ConnectionTimeout { .. }
                | Self::NotConnected
                | Self::WebSocket(_)
        )
    }

    /// Returns `true` if this error indicates a test or harness
    /// configuration bug rather than a device-side failure.
    ///
    /// Configuration errors are fatal and fail before or instead of
    /// exercising the device.
    #[inline]
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedKey { .. }
                | Self::UnknownDriver { .. }
                | Self::DuplicateExtension { .. }
                | Self::InvalidNamespace { .. }
                | Self::InvalidPosition { .. }
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
