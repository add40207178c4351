//! Logical remote-control key definitions and mappings.
//!
//! Test scripts speak in symbolic button names; each transport maps
//! those to its own key codes. The string vocabulary is the stable
//! public surface that existing test suites are written against, so
//! both directions of the mapping are exact.
//!
//! # Example
//!
//! ```ignore
//! use ps_remote::LogicalKey;
//!
//! remote.press(LogicalKey::Cross).await?;
//! remote.press("TRIANGLE".parse()?).await?;
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

// ============================================================================
// Constants
// ============================================================================

/// Element id of the shell UI's key-event focus sink.
///
/// The shell routes controller input through this element, so synthetic
/// key events must be dispatched against it.
pub(crate) const FOCUS_ELEMENT_ID: &str = "trili";

// ============================================================================
// LogicalKey Enum
// ============================================================================

/// Symbolic controller button names.
///
/// This is the fixed vocabulary test scripts use. Not every transport
/// maps the full set; an unmapped key fails fast with
/// [`Error::UnsupportedKey`](crate::Error::UnsupportedKey) rather than
/// silently doing nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalKey {
    // ========================================================================
    // D-Pad
    // ========================================================================
    /// D-pad up
    Up,
    /// D-pad down
    Down,
    /// D-pad left
    Left,
    /// D-pad right
    Right,

    // ========================================================================
    // Action Buttons
    // ========================================================================
    /// Cross (confirm)
    Cross,
    /// Circle (back)
    Circle,
    /// Triangle
    Triangle,
    /// Square
    Square,

    // ========================================================================
    // Shoulder & Stick Buttons
    // ========================================================================
    /// Left shoulder
    L1,
    /// Right shoulder
    R1,
    /// Left trigger
    L2,
    /// Right trigger
    R2,
    /// Left stick click
    L3,
    /// Right stick click
    R3,

    // ========================================================================
    // System Buttons
    // ========================================================================
    /// Options button
    Options,
    /// PS button (native input transports only)
    Playstation,
}

impl LogicalKey {
    /// All logical keys, in vocabulary order.
    pub const ALL: [LogicalKey; 16] = [
        LogicalKey::Up,
        LogicalKey::Down,
        LogicalKey::Left,
        LogicalKey::Right,
        LogicalKey::Cross,
        LogicalKey::Circle,
        LogicalKey::Triangle,
        LogicalKey::Square,
        LogicalKey::L1,
        LogicalKey::R1,
        LogicalKey::L2,
        LogicalKey::R2,
        LogicalKey::L3,
        LogicalKey::R3,
        LogicalKey::Options,
        LogicalKey::Playstation,
    ];

    /// Returns the canonical button name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LogicalKey::Up => "UP",
            LogicalKey::Down => "DOWN",
            LogicalKey::Left => "LEFT",
            LogicalKey::Right => "RIGHT",
            LogicalKey::Cross => "CROSS",
            LogicalKey::Circle => "CIRCLE",
            LogicalKey::Triangle => "TRIANGLE",
            LogicalKey::Square => "SQUARE",
            LogicalKey::L1 => "L1",
            LogicalKey::R1 => "R1",
            LogicalKey::L2 => "L2",
            LogicalKey::R2 => "R2",
            LogicalKey::L3 => "L3",
            LogicalKey::R3 => "R3",
            LogicalKey::Options => "OPTIONS",
            LogicalKey::Playstation => "PLAYSTATION",
        }
    }

    /// Returns the DOM key code the shell UI listens for.
    ///
    /// Used by the script-evaluation transports (inspector, webdriver)
    /// to synthesize key events. The PS button has no DOM code; only
    /// the native input path can deliver it.
    #[must_use]
    pub fn dom_key_code(self) -> Option<u32> {
        match self {
            LogicalKey::Up => Some(140),
            LogicalKey::Down => Some(141),
            LogicalKey::Left => Some(142),
            LogicalKey::Right => Some(143),
            LogicalKey::Cross => Some(13),
            LogicalKey::Circle => Some(146),
            LogicalKey::Triangle => Some(147),
            LogicalKey::Square => Some(113),
            LogicalKey::Options => Some(114),
            LogicalKey::L1 => Some(116),
            LogicalKey::R1 => Some(117),
            LogicalKey::L2 => Some(118),
            LogicalKey::R2 => Some(119),
            LogicalKey::L3 => Some(120),
            LogicalKey::R3 => Some(121),
            LogicalKey::Playstation => None,
        }
    }

    /// Returns the DART virtual-input key name.
    ///
    /// DART speaks controller-native input, so every button is mapped.
    /// OPTIONS keeps its legacy "start" name on the control plane.
    #[must_use]
    pub fn dart_name(self) -> &'static str {
        match self {
            LogicalKey::Up => "up",
            LogicalKey::Down => "down",
            LogicalKey::Left => "left",
            LogicalKey::Right => "right",
            LogicalKey::Cross => "cross",
            LogicalKey::Circle => "circle",
            LogicalKey::Triangle => "triangle",
            LogicalKey::Square => "square",
            LogicalKey::L1 => "l1",
            LogicalKey::R1 => "r1",
            LogicalKey::L2 => "l2",
            LogicalKey::R2 => "r2",
            LogicalKey::L3 => "l3",
            LogicalKey::R3 => "r3",
            LogicalKey::Options => "start",
            LogicalKey::Playstation => "playstation",
        }
    }
}

impl fmt::Display for LogicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogicalKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LogicalKey::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| Error::protocol(format!("not a logical key: {s}")))
    }
}

// ============================================================================
// Key Event Script
// ============================================================================

/// Builds the script that delivers one synthetic key press.
///
/// The shell UI predates the modern KeyboardEvent constructor, so the
/// script uses the legacy `createEvent("Events")` path and sets
/// `keyCode`/`which`/`charCode` by hand, dispatching a keydown followed
/// by a keyup against the focus sink element.
#[must_use]
pub(crate) fn key_event_script(key_code: u32) -> String {
    let mut script = Vec::with_capacity(12);

    script.push(String::from("var keyDown = document.createEvent(\"Events\");"));
    script.push(format!(
        "keyDown.initEvent(\"keydown\", true, true, window, false, false, false, false, {key_code}, {key_code});"
    ));
    script.push(format!("keyDown.keyCode = {key_code};"));
    script.push(format!("keyDown.which = {key_code};"));
    script.push(format!("keyDown.charCode = {key_code};"));
    script.push(format!(
        "document.getElementById(\"{FOCUS_ELEMENT_ID}\").dispatchEvent(keyDown);"
    ));

    script.push(String::from("var keyUp = document.createEvent(\"Events\");"));
    script.push(format!(
        "keyUp.initEvent(\"keyup\", true, true, window, false, false, false, false, {key_code}, {key_code});"
    ));
    script.push(format!("keyUp.keyCode = {key_code};"));
    script.push(format!("keyUp.which = {key_code};"));
    script.push(format!("keyUp.charCode = {key_code};"));
    script.push(format!(
        "document.getElementById(\"{FOCUS_ELEMENT_ID}\").dispatchEvent(keyUp);"
    ));

    script.join("\n")
}

// ============================================================================
// Tests
// ============================================================================
