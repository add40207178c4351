//! Transport back-ends connecting the harness to a device.
//!
//! Three interchangeable clients implement the same capability set:
//!
//! | Transport | Target | Key delivery | Evaluation |
//! |-----------|--------|--------------|------------|
//! | [`InspectorTransport`] | remote Web Inspector (port 860) | synthetic DOM key events | `Runtime.evaluate` |
//! | [`DartTransport`] | DART device-automation server | native controller input | nested inspector |
//! | [`WebDriverTransport`] | WebDriver hub + simulator page | synthetic DOM key events | `/execute` |
//!
//! Each transport moves through `Disconnected → Connecting → Connected
//! → Disconnected`; a failed connect falls back to `Disconnected` and
//! there is no reconnect in place.

// ============================================================================
// Submodules
// ============================================================================

/// Inspector WebSocket connection and event loop.
pub mod connection;

/// DART device-automation transport.
pub mod dart;

/// Remote Web Inspector transport.
pub mod inspector;

/// Transport configuration options.
pub mod options;

/// WebDriver browser-automation transport.
pub mod webdriver;

// ============================================================================
// Re-exports
// ============================================================================

pub use dart::DartTransport;
pub use inspector::InspectorTransport;
pub use options::{ConnectOptions, WindowPosition};
pub use webdriver::WebDriverTransport;

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::keys::LogicalKey;

// ============================================================================
// Transport Trait
// ============================================================================

/// Capability set every transport back-end provides.
///
/// The command facade holds exactly one boxed transport at a time and
/// drives it strictly one command after another, so implementations
/// never see concurrent calls.
#[async_trait]
pub trait Transport: Send {
    /// Which transport variant this is.
    fn kind(&self) -> TransportKind;

    /// Current connection state.
    fn state(&self) -> TransportState;

    /// Opens the transport against the given device address.
    ///
    /// Resolves once the remote target is confirmed live.
    ///
    /// # Errors
    ///
    /// [`Error::Connection`] or [`Error::ConnectionTimeout`] if the
    /// target cannot be reached or identified. The transport is back in
    /// [`TransportState::Disconnected`] afterwards.
    async fn connect(&mut self, address: &str) -> Result<()>;

    /// Delivers one logical button press.
    ///
    /// Returns whether the device acknowledged the press.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedKey`] if the key has no mapping for this
    /// transport; [`Error::NotConnected`] without a live connection.
    async fn press_key(&mut self, key: LogicalKey) -> Result<bool>;

    /// Evaluates a script expression on the remote UI.
    ///
    /// # Errors
    ///
    /// [`Error::RemoteEvaluation`] if the remote execution threw;
    /// [`Error::NotConnected`] without a live connection.
    async fn evaluate(&mut self, expression: &str) -> Result<Value>;

    /// Navigates the remote page.
    ///
    /// Transports without page navigation accept the call silently.
    async fn navigate_to(&mut self, url: &str) -> Result<()> {
        let _ = url;
        Ok(())
    }

    /// Releases the transport connection.
    ///
    /// Safe to call on an already-disconnected transport.
    async fn disconnect(&mut self) -> Result<()>;
}

// ============================================================================
// TransportKind
// ============================================================================

/// The fixed set of transport variants.
///
/// Driver selection resolves a name string to one of these at startup;
/// there is no dynamic loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportKind {
    /// Remote Web Inspector on the device.
    Inspector,
    /// DART device-automation server.
    Dart,
    /// WebDriver-driven desktop simulator.
    WebDriver,
}

impl TransportKind {
    /// All transport kinds.
    pub const ALL: [TransportKind; 3] = [
        TransportKind::Inspector,
        TransportKind::Dart,
        TransportKind::WebDriver,
    ];

    /// Returns the driver name used for selection.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            TransportKind::Inspector => "inspector",
            TransportKind::Dart => "dart",
            TransportKind::WebDriver => "webdriver",
        }
    }

    /// Instantiates a disconnected transport of this kind.
    #[must_use]
    pub fn create(self, options: &ConnectOptions) -> Box<dyn Transport> {
        match self {
            TransportKind::Inspector => Box::new(InspectorTransport::new(options)),
            TransportKind::Dart => Box::new(DartTransport::new(options)),
            TransportKind::WebDriver => Box::new(WebDriverTransport::new(options)),
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TransportKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        TransportKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| Error::unknown_driver(s))
    }
}

// ============================================================================
// TransportState
// ============================================================================

/// Connection lifecycle state of a transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportState {
    /// No connection.
    #[default]
    Disconnected,
    /// Connection attempt in progress.
    Connecting,
    /// Live connection to the remote target.
    Connected,
}

// ============================================================================
// Helpers
// ============================================================================

/// JavaScript truthiness of a mirrored remote value.
///
/// Used to interpret key-dispatch results and `wait_for` polls.
#[must_use]
pub(crate) fn value_is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Splits a device address into host and port, defaulting the port.
pub(crate) fn split_address(address: &str, default_port: u16) -> (String, u16) {
    match address.rsplit_once(':') {
        Some((host, port)) => match port.parse::<u16>() {
            Ok(port) => (host.to_string(), port),
            Err(_) => (address.to_string(), default_port),
        },
        None => (address.to_string(), default_port),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn test_kind_name_round_trip() {
        for kind in TransportKind::ALL {
            assert_eq!(kind.name().parse::<TransportKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_driver_name() {
        let err = "dualshock".parse::<TransportKind>().unwrap_err();
        assert!(matches!(err, Error::UnknownDriver { .. }));
    }

    #[test]
    fn test_create_starts_disconnected() {
        let options = ConnectOptions::default();
        for kind in TransportKind::ALL {
            let transport = kind.create(&options);
            assert_eq!(transport.kind(), kind);
            assert_eq!(transport.state(), TransportState::Disconnected);
        }
    }

    #[test]
    fn test_value_truthiness() {
        assert!(value_is_truthy(&json!(true)));
        assert!(value_is_truthy(&json!(1)));
        assert!(value_is_truthy(&json!("x")));
        assert!(value_is_truthy(&json!({})));
        assert!(!value_is_truthy(&json!(false)));
        assert!(!value_is_truthy(&json!(0)));
        assert!(!value_is_truthy(&json!("")));
        assert!(!value_is_truthy(&Value::Null));
    }

    #[test]
    fn test_split_address() {
        assert_eq!(split_address("10.0.2.1", 860), ("10.0.2.1".to_string(), 860));
        assert_eq!(
            split_address("10.0.2.1:9222", 860),
            ("10.0.2.1".to_string(), 9222)
        );
        assert_eq!(
            split_address("localhost:70000", 860),
            ("localhost:70000".to_string(), 860)
        );
    }
}
