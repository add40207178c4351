//! Synchronous bridge between test code and the async transports.
//!
//! Test scripts read as straight-line code: press a button, wait,
//! assert. Every one of those steps is a network round trip against a
//! slow device, so the underlying operations are async; the bridge is
//! what lets a test step issue one and simply block until it resolves.
//!
//! The suspension is cooperative, not process-wide: the bridge owns a
//! multi-thread tokio runtime, `run_blocking` drives the step's future
//! on the calling thread, and the runtime's worker threads keep
//! servicing the transports' I/O tasks (WebSocket event loops, HTTP
//! connections) the whole time the step is "blocked".
//!
//! The bridge imposes no deadline of its own. An operation that never
//! resolves suspends its caller indefinitely; callers needing a bound
//! use the facade's `wait_for`, which is the one bounded primitive.

// ============================================================================
// Imports
// ============================================================================

use std::future::Future;

use tokio::runtime::{Builder, Handle, Runtime};
use tracing::debug;

use crate::error::Result;

// ============================================================================
// Bridge
// ============================================================================

/// Converts async transport operations into blocking calls.
///
/// One bridge serves one test run; it is created at startup and owns
/// the runtime every transport task lives on.
///
/// # Example
///
/// ```ignore
/// let bridge = Bridge::new()?;
/// let value = bridge.run_blocking(remote.evaluate("1+1"))?;
/// ```
pub struct Bridge {
    /// Runtime hosting the transport I/O tasks.
    runtime: Runtime,
}

impl Bridge {
    /// Creates a bridge with its own I/O runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime fails to start.
    pub fn new() -> Result<Self> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("ps-remote-io")
            .enable_all()
            .build()?;

        debug!("Bridge runtime started");
        Ok(Self { runtime })
    }

    /// Drives one operation to completion, blocking the caller.
    ///
    /// The calling thread suspends until the operation resolves or
    /// rejects; transport I/O keeps flowing on the runtime's workers in
    /// the meantime. Failures surface unchanged as the operation's own
    /// error value.
    pub fn run_blocking<F, T>(&self, operation: F) -> T
    where
        F: Future<Output = T>,
    {
        self.runtime.block_on(operation)
    }

    /// Handle to the bridge's runtime, for spawning auxiliary tasks.
    #[inline]
    #[must_use]
    pub fn handle(&self) -> &Handle {
        self.runtime.handle()
    }
}

// ============================================================================
// Tests
// ============================================================================
