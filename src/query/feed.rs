//! Feed-grid tile inspection.
//!
//! The feed grid exposes its selection through a debug hook; this
//! adapter reads the selected tile and formats its story for
//! assertions against what the test just navigated to.

// ============================================================================
// Imports
// ============================================================================

use serde_json::Value;

use crate::error::{Error, Result};
use crate::remote::Remote;

// ============================================================================
// Feed Queries
// ============================================================================

/// Describes the currently selected feed tile.
///
/// Returns a line of the form
/// `Found <storyType> story at <debugId>: "<caption>"`.
///
/// # Errors
///
/// Returns [`Error::RemoteEvaluation`] if no tile is selected or the
/// grid's debug hook is unavailable.
pub async fn tile_info(remote: &mut Remote) -> Result<String> {
    let script = concat!(
        "var tile = window.debugFeedGrid.selected.tileData;\n",
        "\"Found \" + tile.storyType + \" story at \" + tile.debugId + \": \\\"\" + ",
        "tile.caption.replace(tile.debugId, \"\").trim() + \"\\\"\"",
    );

    let value = remote.evaluate(script).await?;
    match value {
        Value::String(info) if !info.is_empty() => Ok(info),
        _ => Err(Error::remote_evaluation(
            "feed grid reported no selected tile",
        )),
    }
}

// ============================================================================
// Tests
// ============================================================================
