//! Tag, attribute and text assertions on queried components.
//!
//! Mismatches surface as [`Error::Mismatch`] naming the component and
//! carrying both sides, so a failed test reads like a diff.

// ============================================================================
// Imports
// ============================================================================

use crate::error::{Error, Result};
use crate::remote::Remote;

use super::component::{Component, get_component};

// ============================================================================
// Component Checks
// ============================================================================

/// Checks that a component has the expected tag.
///
/// # Errors
///
/// Returns [`Error::Mismatch`] on a different tag.
pub fn check_tag(component: &Component, tag: &str) -> Result<()> {
    if component.tag_name != tag {
        return Err(Error::mismatch(
            format!("{component} tag"),
            format!("<{tag}>"),
            format!("<{}>", component.tag_name),
        ));
    }
    Ok(())
}

/// Checks that a component carries an attribute with the expected value.
///
/// # Errors
///
/// Returns [`Error::Mismatch`] when the attribute is absent or differs.
pub fn check_attr(component: &Component, attr: &str, value: &str) -> Result<()> {
    let Some(actual) = component.attributes.get(attr) else {
        return Err(Error::mismatch(
            format!("{component}.{attr}"),
            value,
            "<no such attribute>",
        ));
    };

    if actual != value {
        return Err(Error::mismatch(format!("{component}.{attr}"), value, actual));
    }
    Ok(())
}

/// Checks a component's rendered text.
///
/// # Errors
///
/// Returns [`Error::Mismatch`] on different text.
pub fn check_text(component: &Component, text: &str) -> Result<()> {
    if component.text != text {
        return Err(Error::mismatch(
            format!("{component} text"),
            text,
            &component.text,
        ));
    }
    Ok(())
}

// ============================================================================
// Page-Level Checks
// ============================================================================

/// Asserts that the component with the given id is a label with the
/// expected text attribute.
///
/// # Errors
///
/// Lookup and mismatch errors from the underlying checks.
pub async fn check_label(remote: &mut Remote, id: &str, text: &str) -> Result<()> {
    let component = get_component(remote, &format!("#{id}")).await?;
    check_tag(&component, "label")?;
    check_attr(&component, "text", text)
}

/// Asserts that the component with the given id is an image with the
/// expected source URL.
///
/// # Errors
///
/// Lookup and mismatch errors from the underlying checks.
pub async fn check_image(remote: &mut Remote, id: &str, url: &str) -> Result<()> {
    let component = get_component(remote, &format!("#{id}")).await?;
    check_tag(&component, "img")?;
    check_attr(&component, "src", url)
}

/// Asserts the rendered text of the component with the given id.
///
/// # Errors
///
/// Lookup and mismatch errors from the underlying checks.
pub async fn check_component_text(remote: &mut Remote, id: &str, text: &str) -> Result<()> {
    let component = get_component(remote, &format!("#{id}")).await?;
    check_text(&component, text)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use rustc_hash::FxHashMap;
    use serde_json::json;

    use crate::remote::Session;
    use crate::remote::testing::MockTransport;
    use crate::transport::TransportKind;

    fn label(text: &str) -> Component {
        let mut attributes = FxHashMap::default();
        attributes.insert("text".to_string(), text.to_string());
        Component {
            id: "title".to_string(),
            tag_name: "label".to_string(),
            attributes,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_check_tag() {
        let component = label("Store");
        check_tag(&component, "label").expect("matches");

        let err = check_tag(&component, "img").unwrap_err();
        assert_eq!(
            err.to_string(),
            "expected label#title tag to be \"<img>\", got \"<label>\""
        );
    }

    #[test]
    fn test_check_attr_value_mismatch() {
        let component = label("Store");
        check_attr(&component, "text", "Store").expect("matches");

        let err = check_attr(&component, "text", "Library").unwrap_err();
        let text = err.to_string();
        assert!(text.contains("label#title.text"));
        assert!(text.contains("Library"));
        assert!(text.contains("Store"));
    }

    #[test]
    fn test_check_attr_missing() {
        let component = label("Store");

        let err = check_attr(&component, "src", "x.png").unwrap_err();
        assert!(err.to_string().contains("no such attribute"));
    }

    #[test]
    fn test_check_text() {
        let component = label("Store");
        check_text(&component, "Store").expect("matches");
        assert!(check_text(&component, "store").is_err());
    }

    #[tokio::test]
    async fn test_check_label_round_trip() {
        let mock = MockTransport::new().with_response(json!({
            "id": "title",
            "tagName": "label",
            "attributes": { "text": "What's New" },
            "text": "What's New"
        }));
        let mut remote = Remote::new();
        remote.session = Some(Session::new(
            TransportKind::Inspector,
            "10.0.2.1",
            Box::new(mock),
        ));

        check_label(&mut remote, "title", "What's New")
            .await
            .expect("label assertion");
    }
}
