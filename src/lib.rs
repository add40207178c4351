//! ps-remote - Remote-control test harness for the PlayStation shell UI.
//!
//! This library lets a test script drive a real device the way a
//! player would: press buttons, wait for screens, assert on what the
//! UI shows. The script reads as straight-line blocking code while the
//! harness performs every step as an asynchronous round trip over a
//! remote debugging link.
//!
//! # Architecture
//!
//! The harness follows a client-device model:
//!
//! - **Local End (Rust)**: the command facade and transports
//! - **Remote End (Device)**: the shell UI, reached over one of three
//!   interchangeable transports
//!
//! Key design principles:
//!
//! - One [`Session`] at a time, owned by the facade; one command in
//!   flight at a time, in strict program order
//! - Transports are a closed set selected by name at startup
//! - The [`Bridge`] suspends only the calling test step; transport I/O
//!   keeps flowing underneath
//! - Failures carry the remote description whenever the device
//!   reported one
//!
//! # Quick Start
//!
//! ```no_run
//! use ps_remote::{BlockingRemote, ConnectOptions, LogicalKey, Result, WaitOptions};
//!
//! fn main() -> Result<()> {
//!     let mut remote = BlockingRemote::with_builtin_extensions()?;
//!     remote.connect("10.0.2.1", "inspector", &ConnectOptions::new())?;
//!
//!     remote.press(LogicalKey::Down)?;
//!     remote.press(LogicalKey::Cross)?;
//!     remote.wait_for("window.storeLoaded", "store page", WaitOptions::default())?;
//!
//!     remote.disconnect()?;
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`remote`] | Command facade: [`Remote`], [`BlockingRemote`], [`Session`] |
//! | [`transport`] | The three transport back-ends |
//! | [`bridge`] | Async-to-blocking suspension mechanism |
//! | [`keys`] | Logical key vocabulary |
//! | [`extensions`] | Driver and query-adapter registry |
//! | [`query`] | Component/assertion adapters over `evaluate` |
//! | [`protocol`] | Inspector wire message types (internal) |
//! | [`error`] | Error types and [`Result`] alias |

// ============================================================================
// Modules
// ============================================================================

/// Async-to-blocking suspension mechanism.
///
/// The [`Bridge`] lets straight-line test code block on async
/// transport round trips without stalling transport I/O.
pub mod bridge;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Driver and query-adapter registry.
///
/// Extensions are registered under validated namespaces at startup.
pub mod extensions;

/// Logical key vocabulary and per-transport key mappings.
pub mod keys;

/// Inspector wire message types.
///
/// Internal module defining request/response structures and debugger
/// target descriptors.
pub mod protocol;

/// Query and assertion adapters built on the `evaluate` primitive.
pub mod query;

/// Command facade.
///
/// Use [`BlockingRemote`] from test scripts and [`Remote`] from async
/// collaborating code.
pub mod remote;

/// Transport back-ends.
///
/// Three interchangeable clients: remote inspector, DART device
/// automation, and WebDriver against the desktop simulator.
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

// Facade types
pub use remote::{BlockingRemote, Remote, Session, WaitOptions};

// Bridge
pub use bridge::Bridge;

// Error types
pub use error::{Error, Result};

// Extension types
pub use extensions::{Extension, ExtensionRegistry, QueryKind};

// Key vocabulary
pub use keys::LogicalKey;

// Query types
pub use query::Component;

// Transport types
pub use transport::{
    ConnectOptions, DartTransport, InspectorTransport, Transport, TransportKind, TransportState,
    WebDriverTransport, WindowPosition,
};
