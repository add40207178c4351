//! Live connection state.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use crate::transport::{Transport, TransportKind, TransportState};

// ============================================================================
// Session
// ============================================================================

/// The live connection to one device.
///
/// Exactly one session exists at a time, owned by the command facade:
/// created by `connect`, destroyed by `disconnect`, implicitly replaced
/// by a reconnect.
pub struct Session {
    /// Which transport variant is active.
    kind: TransportKind,
    /// Device address the session was opened against.
    address: String,
    /// The transport holding the underlying connection.
    pub(crate) transport: Box<dyn Transport>,
}

impl Session {
    /// Creates a session wrapping a connected transport.
    pub(crate) fn new(kind: TransportKind, address: &str, transport: Box<dyn Transport>) -> Self {
        Self {
            kind,
            address: address.to_string(),
            transport,
        }
    }

    /// The active transport variant.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> TransportKind {
        self.kind
    }

    /// The device address this session was opened against.
    #[inline]
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Whether the underlying transport still reports a live connection.
    #[inline]
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.transport.state() == TransportState::Connected
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("kind", &self.kind)
            .field("address", &self.address)
            .field("ready", &self.is_ready())
            .finish_non_exhaustive()
    }
}
