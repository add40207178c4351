//! Debugger target descriptors and selection.
//!
//! The device advertises its debuggable pages over HTTP at `/json`.
//! Connecting means picking the page that hosts the shell UI and
//! attaching to its WebSocket debugger endpoint.

// ============================================================================
// Imports
// ============================================================================

use serde::Deserialize;

use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Process display name of the page hosting the shell UI.
pub(crate) const SHELL_PROCESS_NAME: &str = "Live Area / Store / RegCAM";

// ============================================================================
// PageInfo
// ============================================================================

/// One debuggable page advertised by the device.
///
/// # Format
///
/// ```json
/// {
///   "pageID": 3,
///   "title": "shell",
///   "processDisplayName": "Live Area / Store / RegCAM",
///   "webSocketDebuggerUrl": "ws://10.0.2.1:860/devtools/page/3"
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct PageInfo {
    /// Device-side page identifier.
    #[serde(default, rename = "pageID")]
    pub page_id: Option<u64>,

    /// Page title.
    #[serde(default)]
    pub title: Option<String>,

    /// Page URL.
    #[serde(default)]
    pub url: Option<String>,

    /// Display name of the owning process.
    #[serde(default, rename = "processDisplayName")]
    pub process_display_name: Option<String>,

    /// WebSocket debugger endpoint; missing on some device firmware.
    #[serde(default, rename = "webSocketDebuggerUrl")]
    pub web_socket_debugger_url: Option<String>,
}

impl PageInfo {
    /// Returns `true` if this page belongs to the shell UI process.
    #[inline]
    #[must_use]
    pub fn is_shell_page(&self) -> bool {
        self.process_display_name.as_deref() == Some(SHELL_PROCESS_NAME)
    }

    /// Returns the WebSocket debugger URL, repairing it when absent.
    ///
    /// Some firmware revisions omit `webSocketDebuggerUrl` from the page
    /// list; the endpoint still exists at the conventional
    /// `/devtools/page/<pageID>` path, so it is rebuilt from the page id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connection`] if the URL is missing and there is
    /// no page id to rebuild it from.
    pub fn debugger_url(&self, host: &str, port: u16) -> Result<String> {
        if let Some(url) = &self.web_socket_debugger_url {
            return Ok(url.clone());
        }

        match self.page_id {
            Some(page_id) => Ok(format!("ws://{host}:{port}/devtools/page/{page_id}")),
            None => Err(Error::connection(
                "debugger target has neither webSocketDebuggerUrl nor pageID",
            )),
        }
    }
}

// ============================================================================
// Page Selection
// ============================================================================

/// Picks the debugger target to attach to.
///
/// Prefers the shell UI page by process display name; falls back to the
/// first advertised page when no process matches.
///
/// # Errors
///
/// Returns [`Error::Connection`] if the device advertises no pages.
pub(crate) fn choose_page(pages: &[PageInfo]) -> Result<&PageInfo> {
    pages
        .iter()
        .find(|page| page.is_shell_page())
        .or_else(|| pages.first())
        .ok_or_else(|| Error::connection("device advertises no debuggable pages"))
}

// ============================================================================
// Tests
// ============================================================================
