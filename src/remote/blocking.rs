//! Bridge-backed blocking facade.
//!
//! Test scripts are straight-line code; this wrapper pairs a
//! [`Remote`] with a [`Bridge`] so every command reads as an ordinary
//! blocking call. The async facade is the only polling and delivery
//! implementation; this type routes each call through the bridge, so
//! the two calling conventions cannot drift apart.
//!
//! # Example
//!
//! ```ignore
//! use ps_remote::{BlockingRemote, ConnectOptions, LogicalKey, WaitOptions};
//!
//! let mut remote = BlockingRemote::with_builtin_extensions()?;
//! remote.connect("10.0.2.1", "inspector", &ConnectOptions::new())?;
//! remote.press(LogicalKey::Down)?;
//! remote.press(LogicalKey::Cross)?;
//! remote.wait_for("window.storeLoaded", "store page", WaitOptions::default())?;
//! remote.disconnect()?;
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use serde_json::Value;

use crate::bridge::Bridge;
use crate::error::Result;
use crate::extensions::Extension;
use crate::keys::LogicalKey;
use crate::transport::ConnectOptions;

use super::core::{Remote, WaitOptions};
use super::session::Session;

// ============================================================================
// BlockingRemote
// ============================================================================

/// Blocking view over the command facade.
///
/// Owns the bridge (and with it the I/O runtime) and the facade; each
/// method suspends the calling thread until the underlying command
/// resolves on the device.
pub struct BlockingRemote {
    /// Suspension mechanism.
    bridge: Bridge,
    /// The async facade every call delegates to.
    remote: Remote,
}

// ============================================================================
// BlockingRemote - Construction
// ============================================================================

impl BlockingRemote {
    /// Creates a blocking facade with an empty extension registry.
    ///
    /// # Errors
    ///
    /// Returns an error if the bridge runtime fails to start.
    pub fn new() -> Result<Self> {
        Ok(Self {
            bridge: Bridge::new()?,
            remote: Remote::new(),
        })
    }

    /// Creates a blocking facade with the bundled extensions registered.
    ///
    /// # Errors
    ///
    /// Returns an error if the bridge runtime fails to start or a
    /// bundled namespace collides.
    pub fn with_builtin_extensions() -> Result<Self> {
        Ok(Self {
            bridge: Bridge::new()?,
            remote: Remote::with_builtin_extensions()?,
        })
    }

    /// Registers an extension under a namespace.
    ///
    /// # Errors
    ///
    /// See [`Remote::use_extension`].
    pub fn use_extension(&mut self, namespace: &str, extension: Extension) -> Result<()> {
        self.remote.use_extension(namespace, extension)
    }

    /// The underlying async facade, for collaborating async code.
    #[inline]
    #[must_use]
    pub fn remote_mut(&mut self) -> &mut Remote {
        &mut self.remote
    }

    /// The bridge, for running auxiliary async work on the same runtime.
    #[inline]
    #[must_use]
    pub fn bridge(&self) -> &Bridge {
        &self.bridge
    }
}

// ============================================================================
// BlockingRemote - Session Accessors
// ============================================================================

impl BlockingRemote {
    /// The live session, when connected.
    #[inline]
    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.remote.session()
    }

    /// Whether a session is open.
    #[inline]
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.remote.is_connected()
    }
}

// ============================================================================
// BlockingRemote - Commands
// ============================================================================

impl BlockingRemote {
    /// Connects to a device, blocking until the target is confirmed live.
    ///
    /// # Errors
    ///
    /// See [`Remote::connect`].
    pub fn connect(
        &mut self,
        address: &str,
        driver_name: &str,
        options: &ConnectOptions,
    ) -> Result<&Session> {
        let Self { bridge, remote } = self;
        bridge.run_blocking(remote.connect(address, driver_name, options))
    }

    /// Presses one controller button.
    ///
    /// # Errors
    ///
    /// See [`Remote::press`].
    pub fn press(&mut self, key: LogicalKey) -> Result<()> {
        let Self { bridge, remote } = self;
        bridge.run_blocking(remote.press(key))
    }

    /// Suspends the calling thread for the given duration.
    pub fn wait(&self, duration: Duration) {
        self.bridge.run_blocking(self.remote.wait(duration));
    }

    /// Polls an expression until it is true or the timeout elapses.
    ///
    /// # Errors
    ///
    /// See [`Remote::wait_for`].
    pub fn wait_for(
        &mut self,
        expression: &str,
        description: &str,
        options: WaitOptions,
    ) -> Result<()> {
        let Self { bridge, remote } = self;
        bridge.run_blocking(remote.wait_for(expression, description, options))
    }

    /// Evaluates a script expression on the remote UI.
    ///
    /// # Errors
    ///
    /// See [`Remote::evaluate`].
    pub fn evaluate(&mut self, expression: &str) -> Result<Value> {
        let Self { bridge, remote } = self;
        bridge.run_blocking(remote.evaluate(expression))
    }

    /// Navigates the remote page, where the transport supports it.
    ///
    /// # Errors
    ///
    /// See [`Remote::navigate_to`].
    pub fn navigate_to(&mut self, url: &str) -> Result<()> {
        let Self { bridge, remote } = self;
        bridge.run_blocking(remote.navigate_to(url))
    }

    /// Tears down the session, blocking until the transport is released.
    ///
    /// # Errors
    ///
    /// See [`Remote::disconnect`].
    pub fn disconnect(&mut self) -> Result<()> {
        let Self { bridge, remote } = self;
        bridge.run_blocking(remote.disconnect())
    }
}

// ============================================================================
// Tests
// ============================================================================
