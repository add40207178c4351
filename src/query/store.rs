//! Store deep links and focused-element text.
//!
//! The store surface is driven through the shell's app launcher rather
//! than the harness page: deep links open store views, and the
//! focused-element query reads back what the cursor is on, already
//! localized.

// ============================================================================
// Imports
// ============================================================================

use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::remote::Remote;

// ============================================================================
// Constants
// ============================================================================

/// Deep-link scheme the shell's app launcher resolves store views by.
const STORE_DEEP_LINK_PREFIX: &str = "psns:browse?";

// ============================================================================
// Store Queries
// ============================================================================

/// Opens the store, either on a product page or the games top view.
///
/// # Errors
///
/// Propagates evaluation failures from the launch call.
pub async fn open(remote: &mut Remote, product: Option<&str>) -> Result<()> {
    let deep_link = match product {
        Some(product) => format!(
            "{STORE_DEEP_LINK_PREFIX}product={}",
            urlencoding::encode(product)
        ),
        None => format!("{STORE_DEEP_LINK_PREFIX}top=game"),
    };

    debug!(deep_link, "Opening store");
    remote
        .evaluate(&format!("sce.launchApp(\"{deep_link}\")"))
        .await?;
    Ok(())
}

/// Reads the localized text of the focused store element.
///
/// Collects every label flavor the store renders (plain and marquee)
/// under the focused element and joins their translated texts.
///
/// # Errors
///
/// Returns [`Error::RemoteEvaluation`] if the store reports no text.
pub async fn active_element_text(remote: &mut Remote) -> Result<String> {
    let script = concat!(
        "var labels = [].concat(",
        "sf.activeElement.query('marquee_hl'),",
        "sf.activeElement.query('marquee_horizontal'),",
        "sf.activeElement.query('label'));\n",
        "labels.map(function(l){ return sf.translate(l.text); }).join(' ').trim();",
    );

    let value = remote.evaluate(script).await?;
    match value {
        Value::String(text) => Ok(text),
        _ => Err(Error::remote_evaluation(
            "focused store element reported no text",
        )),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    use crate::remote::Session;
    use crate::remote::testing::MockTransport;
    use crate::transport::TransportKind;

    fn connected(mock: MockTransport) -> Remote {
        let mut remote = Remote::new();
        remote.session = Some(Session::new(
            TransportKind::Inspector,
            "10.0.2.1",
            Box::new(mock),
        ));
        remote
    }

    #[tokio::test]
    async fn test_open_defaults_to_games_top() {
        let mock = MockTransport::new();
        let log = mock.log();
        let mut remote = connected(mock);

        open(&mut remote, None).await.expect("launch");

        let evaluations = &log.lock().evaluations;
        assert!(evaluations[0].contains("sce.launchApp(\"psns:browse?top=game\")"));
    }

    #[tokio::test]
    async fn test_open_product_is_encoded() {
        let mock = MockTransport::new();
        let log = mock.log();
        let mut remote = connected(mock);

        open(&mut remote, Some("EP9000-CUSA00411_00"))
            .await
            .expect("launch");

        let evaluations = &log.lock().evaluations;
        assert!(evaluations[0].contains("psns:browse?product=EP9000-CUSA00411_00"));
    }

    #[tokio::test]
    async fn test_active_element_text() {
        let mock = MockTransport::new().with_response(json!("The Last of Us Remastered"));
        let mut remote = connected(mock);

        let text = active_element_text(&mut remote).await.expect("text");
        assert_eq!(text, "The Last of Us Remastered");
    }

    #[tokio::test]
    async fn test_active_element_without_text_is_an_error() {
        let mock = MockTransport::new().with_response(json!(null));
        let mut remote = connected(mock);

        let err = active_element_text(&mut remote).await.unwrap_err();
        assert!(matches!(err, Error::RemoteEvaluation { .. }));
    }
}
