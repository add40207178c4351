//! Transport configuration options.
//!
//! Provides a type-safe bag of knobs shared by all transport variants:
//! pacing delays for the slow device link, connect deadlines, control
//! plane endpoints, and the simulator window placement.
//!
//! # Example
//!
//! ```ignore
//! use ps_remote::ConnectOptions;
//!
//! let options = ConnectOptions::new()
//!     .with_window_position("1920x0,1664x1028".parse()?)
//!     .with_command_delay(Duration::ZERO);
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::str::FromStr;
use std::time::Duration;

use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Delay before each remote round trip on script-evaluation transports.
///
/// The shell UI services the debugger on its UI thread; pacing commands
/// keeps the device responsive.
pub(crate) const DEFAULT_COMMAND_DELAY: Duration = Duration::from_millis(500);

/// Settle delay before and after a DART virtual-input press.
pub(crate) const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(2);

/// Delay between scheduling a DART run and polling its process id.
pub(crate) const DEFAULT_PROVISION_DELAY: Duration = Duration::from_secs(6);

/// Deadline for connect handshakes and readiness polls.
pub(crate) const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// DART control plane root.
pub(crate) const DEFAULT_DART_BASE_URL: &str = "https://ussfrsdart02.am.sony.com/dart/rest/test/";

/// Simulator harness page served next to the WebDriver hub.
pub(crate) const DEFAULT_HARNESS_PAGE_URL: &str = "http://localhost:8008/shell/RemoteShell.html";

// ============================================================================
// ConnectOptions
// ============================================================================

/// Configuration consumed by [`TransportKind::create`](super::TransportKind::create).
///
/// Every field has a production default; tests against stub devices
/// zero the delays and point the endpoints at the stub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectOptions {
    /// Simulator window placement (webdriver only).
    pub window_position: Option<WindowPosition>,

    /// Delay before each remote round trip.
    pub command_delay: Duration,

    /// Settle delay around DART key presses.
    pub settle_delay: Duration,

    /// Delay before polling a scheduled DART run's process id.
    pub provision_delay: Duration,

    /// Deadline for connect handshakes and readiness polls.
    pub connect_timeout: Duration,

    /// DART control plane root URL.
    pub dart_base_url: String,

    /// Simulator harness page URL (webdriver only).
    pub harness_page_url: String,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Constructors
// ============================================================================

impl ConnectOptions {
    /// Creates options with production defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            window_position: None,
            command_delay: DEFAULT_COMMAND_DELAY,
            settle_delay: DEFAULT_SETTLE_DELAY,
            provision_delay: DEFAULT_PROVISION_DELAY,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            dart_base_url: DEFAULT_DART_BASE_URL.to_string(),
            harness_page_url: DEFAULT_HARNESS_PAGE_URL.to_string(),
        }
    }
}

// ============================================================================
// Builder Methods
// ============================================================================

impl ConnectOptions {
    /// Sets the simulator window placement.
    #[inline]
    #[must_use]
    pub fn with_window_position(mut self, position: WindowPosition) -> Self {
        self.window_position = Some(position);
        self
    }

    /// Sets the delay before each remote round trip.
    #[inline]
    #[must_use]
    pub fn with_command_delay(mut self, delay: Duration) -> Self {
        self.command_delay = delay;
        self
    }

    /// Sets the settle delay around DART key presses.
    #[inline]
    #[must_use]
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Sets the DART run provisioning delay.
    #[inline]
    #[must_use]
    pub fn with_provision_delay(mut self, delay: Duration) -> Self {
        self.provision_delay = delay;
        self
    }

    /// Sets the connect deadline.
    #[inline]
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the DART control plane root URL.
    #[inline]
    #[must_use]
    pub fn with_dart_base_url(mut self, url: impl Into<String>) -> Self {
        self.dart_base_url = url.into();
        self
    }

    /// Sets the simulator harness page URL.
    #[inline]
    #[must_use]
    pub fn with_harness_page_url(mut self, url: impl Into<String>) -> Self {
        self.harness_page_url = url.into();
        self
    }
}

// ============================================================================
// WindowPosition
// ============================================================================

/// Placement of the simulator browser window.
///
/// Parsed from the `LEFTxTOP,WIDTHxHEIGHT` form the harness CLI passes
/// through, e.g. `1920x0,1664x1028` for a secondary monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowPosition {
    /// Left edge in screen coordinates.
    pub left: i32,
    /// Top edge in screen coordinates.
    pub top: i32,
    /// Window width in pixels.
    pub width: u32,
    /// Window height in pixels.
    pub height: u32,
}

impl WindowPosition {
    /// Right edge in screen coordinates.
    #[inline]
    #[must_use]
    pub fn right(&self) -> i32 {
        self.left + self.width as i32
    }

    /// Bottom edge in screen coordinates.
    #[inline]
    #[must_use]
    pub fn bottom(&self) -> i32 {
        self.top + self.height as i32
    }
}

impl FromStr for WindowPosition {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        fn pair(part: &str) -> Option<(&str, &str)> {
            part.split_once('x')
        }

        let parsed = s.split_once(',').and_then(|(origin, size)| {
            let (left, top) = pair(origin)?;
            let (width, height) = pair(size)?;
            Some(WindowPosition {
                left: left.parse().ok()?,
                top: top.parse().ok()?,
                width: width.parse().ok()?,
                height: height.parse().ok()?,
            })
        });

        parsed.ok_or_else(|| Error::invalid_position(s))
    }
}

// ============================================================================
// Tests
// ============================================================================
