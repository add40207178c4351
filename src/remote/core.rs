//! The async command facade.

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use serde_json::Value;
use tokio::time::{Instant, sleep};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::extensions::{Extension, ExtensionRegistry, QueryKind};
use crate::keys::LogicalKey;
use crate::transport::{ConnectOptions, TransportKind, value_is_truthy};

use super::session::Session;

// ============================================================================
// WaitOptions
// ============================================================================

/// Timing knobs for [`Remote::wait_for`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Total time to keep polling before giving up.
    pub timeout: Duration,
    /// Pause between polls.
    pub poll_interval: Duration,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(3000),
            poll_interval: Duration::from_millis(25),
        }
    }
}

impl WaitOptions {
    /// Sets the total timeout.
    #[inline]
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the pause between polls.
    #[inline]
    #[must_use]
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

// ============================================================================
// Remote
// ============================================================================

/// The remote control test scripts drive.
///
/// Owns the extension registry and the live [`Session`]; every command
/// delegates to whichever transport the session holds. Commands run
/// strictly one at a time in program order: the facade takes `&mut
/// self` throughout, so two commands cannot be in flight against the
/// same session.
///
/// # Example
///
/// ```ignore
/// use ps_remote::{ConnectOptions, LogicalKey, Remote, WaitOptions};
///
/// let mut remote = Remote::with_builtin_extensions()?;
/// remote.connect("10.0.2.1", "inspector", &ConnectOptions::new()).await?;
/// remote.press(LogicalKey::Cross).await?;
/// remote.wait_for("window.storeLoaded", "store page", WaitOptions::default()).await?;
/// remote.disconnect().await?;
/// ```
#[derive(Default)]
pub struct Remote {
    /// Registered drivers and query adapters.
    registry: ExtensionRegistry,
    /// The live connection, when one exists.
    pub(crate) session: Option<Session>,
}

// ============================================================================
// Remote - Construction
// ============================================================================

impl Remote {
    /// Creates a facade with an empty extension registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a facade with the bundled extensions registered.
    ///
    /// Registers the three drivers under their selection names plus the
    /// shipped query adapters, mirroring harness start-up.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a namespace collides, which for
    /// the bundled set means a packaging bug.
    pub fn with_builtin_extensions() -> Result<Self> {
        let mut remote = Self::new();

        for kind in TransportKind::ALL {
            remote.use_extension(kind.name(), Extension::Driver(kind))?;
        }
        remote.use_extension("tlx", Extension::Query(QueryKind::Component))?;
        remote.use_extension("psStore", Extension::Query(QueryKind::Store))?;
        remote.use_extension("whatsNew", Extension::Query(QueryKind::Feed))?;

        Ok(remote)
    }

    /// Registers an extension under a namespace.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidNamespace`] if the namespace fails validation
    /// - [`Error::DuplicateExtension`] if the namespace is taken
    pub fn use_extension(&mut self, namespace: &str, extension: Extension) -> Result<()> {
        self.registry.register(namespace, extension)
    }

    /// The extension registry.
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &ExtensionRegistry {
        &self.registry
    }
}

// ============================================================================
// Remote - Session Accessors
// ============================================================================

impl Remote {
    /// The live session, when connected.
    #[inline]
    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Whether a session is open.
    #[inline]
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.session.is_some()
    }
}

// ============================================================================
// Remote - Commands
// ============================================================================

impl Remote {
    /// Connects to a device, selecting the transport by driver name.
    ///
    /// A connect while a session is open replaces it: the old session
    /// is disconnected first. A failed connect leaves no session
    /// behind, so a subsequent `disconnect` is a no-op.
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownDriver`] if the name is not a registered driver
    /// - [`Error::Connection`] / [`Error::ConnectionTimeout`] from the
    ///   transport
    pub async fn connect(
        &mut self,
        address: &str,
        driver_name: &str,
        options: &ConnectOptions,
    ) -> Result<&Session> {
        let kind = self.registry.driver(driver_name)?;

        if self.is_connected() {
            warn!("Reconnect replaces the open session");
            self.disconnect().await?;
        }

        info!(address, driver = driver_name, "Connecting to remote");
        let mut transport = kind.create(options);
        transport.connect(address).await?;

        let session = self.session.insert(Session::new(kind, address, transport));
        Ok(&*session)
    }

    /// Presses one controller button.
    ///
    /// Press delivery failures are logged and swallowed so the test can
    /// assert on the resulting screen state instead; an unmapped key is
    /// a test bug and stays fatal.
    ///
    /// # Errors
    ///
    /// - [`Error::NotConnected`] without an open session
    /// - [`Error::UnsupportedKey`] if the active transport cannot
    ///   deliver the key
    pub async fn press(&mut self, key: LogicalKey) -> Result<()> {
        let session = self.session.as_mut().ok_or(Error::NotConnected)?;

        debug!(key = %key, "Press");
        match session.transport.press_key(key).await {
            Ok(true) => {
                debug!(key = %key, "Pressed");
                Ok(())
            }
            Ok(false) => {
                warn!(key = %key, "Press was not acknowledged");
                Ok(())
            }
            Err(e @ Error::UnsupportedKey { .. }) => Err(e),
            Err(e) => {
                warn!(key = %key, error = %e, "Press failed");
                Ok(())
            }
        }
    }

    /// Suspends the calling context for the given duration.
    pub async fn wait(&self, duration: Duration) {
        sleep(duration).await;
    }

    /// Polls an expression until it is true or the timeout elapses.
    ///
    /// The expression is re-evaluated on the active transport every
    /// `poll_interval`; evaluation failures propagate immediately
    /// rather than being retried.
    ///
    /// # Errors
    ///
    /// - [`Error::WaitTimeout`] when the deadline passes first
    /// - [`Error::NotConnected`] / [`Error::RemoteEvaluation`] from the
    ///   underlying polls
    pub async fn wait_for(
        &mut self,
        expression: &str,
        description: &str,
        options: WaitOptions,
    ) -> Result<()> {
        debug!(expression, description, "Waiting");
        let deadline = Instant::now() + options.timeout;

        loop {
            let value = self.evaluate(expression).await?;
            if value_is_truthy(&value) {
                debug!(description, "Condition met");
                return Ok(());
            }

            if Instant::now() >= deadline {
                return Err(Error::wait_timeout(
                    description,
                    expression,
                    options.timeout.as_millis() as u64,
                ));
            }

            sleep(options.poll_interval).await;
        }
    }

    /// Evaluates a script expression on the remote UI.
    ///
    /// This is the primitive the query adapters build on.
    ///
    /// # Errors
    ///
    /// - [`Error::NotConnected`] without an open session
    /// - [`Error::RemoteEvaluation`] if the remote execution threw
    pub async fn evaluate(&mut self, expression: &str) -> Result<Value> {
        let session = self.session.as_mut().ok_or(Error::NotConnected)?;
        session.transport.evaluate(expression).await
    }

    /// Navigates the remote page, where the transport supports it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotConnected`] without an open session.
    pub async fn navigate_to(&mut self, url: &str) -> Result<()> {
        let session = self.session.as_mut().ok_or(Error::NotConnected)?;
        session.transport.navigate_to(url).await
    }

    /// Tears down the session.
    ///
    /// Safe to call with no session open; a second call is a no-op.
    ///
    /// # Errors
    ///
    /// Propagates transport teardown failures.
    pub async fn disconnect(&mut self) -> Result<()> {
        if let Some(mut session) = self.session.take() {
            session.transport.disconnect().await?;
            info!(address = session.address(), "Session closed");
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
