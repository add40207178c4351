//! Command facade: the object test scripts talk to.
//!
//! [`Remote`] is the single point of control for a test run. It owns
//! the extension registry and the live [`Session`], resolves driver
//! names to transports, and exposes the command vocabulary
//! (`connect` / `press` / `wait` / `wait_for` / `evaluate` /
//! `navigate_to` / `disconnect`) test steps are written against.
//!
//! Two calling conventions exist by construction rather than by
//! runtime detection: [`Remote`]'s methods are async for collaborating
//! async code, and [`BlockingRemote`] wraps the same facade behind the
//! [`Bridge`](crate::Bridge) for straight-line test scripts.

// ============================================================================
// Submodules
// ============================================================================

/// Bridge-backed blocking facade.
pub mod blocking;

/// The async command facade.
pub mod core;

/// Live connection state.
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

// ============================================================================
// Re-exports
// ============================================================================

pub use self::blocking::BlockingRemote;
pub use self::core::{Remote, WaitOptions};
pub use self::session::Session;
