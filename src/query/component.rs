//! Component lookup and navigation on the harness page.
//!
//! The harness page exposes a small scripting surface under
//! `window.RemoteShell`; these helpers drive it and lift its results
//! into structured records.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use rustc_hash::FxHashMap;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::remote::{Remote, WaitOptions};
use crate::transport::value_is_truthy;

use super::js_string;

// ============================================================================
// Constants
// ============================================================================

/// Flag the harness page raises once a navigated-to component is up.
const LOADED_EXPRESSION: &str = "window.RemoteShell.loaded";

// ============================================================================
// Component
// ============================================================================

/// A UI component mirrored back from the remote page.
///
/// # Format
///
/// ```json
/// { "id": "title", "tagName": "label", "attributes": {"text": "Store"}, "text": "Store" }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Component {
    /// Element id.
    #[serde(default)]
    pub id: String,

    /// Tag name.
    #[serde(default, rename = "tagName")]
    pub tag_name: String,

    /// Attribute map.
    #[serde(default)]
    pub attributes: FxHashMap<String, String>,

    /// Rendered text content.
    #[serde(default)]
    pub text: String,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.tag_name, self.id)
    }
}

// ============================================================================
// Queries
// ============================================================================

/// Looks up a component by selector on the harness page.
///
/// # Errors
///
/// Returns [`Error::ComponentNotFound`] when the page reports no match.
pub async fn get_component(remote: &mut Remote, selector: &str) -> Result<Component> {
    let script = format!(
        "window.RemoteShell.getComponent({})",
        js_string(selector)
    );
    let value = remote.evaluate(&script).await?;

    // The page answers `false` for a missing component
    if !value_is_truthy(&value) {
        return Err(Error::component_not_found(selector));
    }

    Ok(serde_json::from_value(value)?)
}

/// Loads a component into the harness page with the given attributes.
///
/// # Errors
///
/// Propagates evaluation failures.
pub async fn load_component(remote: &mut Remote, name: &str, attributes: &Value) -> Result<()> {
    let script = format!(
        "window.RemoteShell.load({}, {attributes});",
        js_string(name)
    );
    remote.evaluate(&script).await?;
    Ok(())
}

/// Steers the harness page to a component URL and waits for it to load.
///
/// Parameters are appended as a query string; string and object values
/// are URL-encoded (objects as JSON), scalars pass through as-is.
///
/// # Errors
///
/// Propagates evaluation failures and the load wait timeout.
pub async fn go_to(remote: &mut Remote, url: &str, params: &Value) -> Result<()> {
    let url = url_with_params(url, params);
    debug!(url, "Opening component URL");

    let script = format!("window.RemoteShell.goTo({});", js_string(&url));
    remote.evaluate(&script).await?;

    remote
        .wait_for(LOADED_EXPRESSION, "component URL to load", WaitOptions::default())
        .await
}

/// Appends query parameters to a component URL.
fn url_with_params(url: &str, params: &Value) -> String {
    let Some(params) = params.as_object() else {
        return url.to_string();
    };

    let mut pairs = Vec::with_capacity(params.len());
    for (name, value) in params {
        let encoded = match value {
            Value::String(s) => urlencoding::encode(s).into_owned(),
            Value::Object(_) | Value::Array(_) => {
                urlencoding::encode(&value.to_string()).into_owned()
            }
            other => other.to_string(),
        };
        pairs.push(format!("{name}={encoded}"));
    }

    if pairs.is_empty() {
        url.to_string()
    } else {
        format!("{url}?{}", pairs.join("&"))
    }
}

// ============================================================================
// Tests
// ============================================================================
