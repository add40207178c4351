//! Extension registry.
//!
//! Drivers and query adapters are registered under short namespaces at
//! startup ("inspector", "tlx", ...) and looked up by name when a test
//! run selects its driver. Registration is a one-time configuration
//! step: a namespace that fails validation or collides with an earlier
//! registration aborts the run before any test executes.

// ============================================================================
// Imports
// ============================================================================

use std::sync::LazyLock;

use regex::Regex;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::error::{Error, Result};
use crate::transport::TransportKind;

// ============================================================================
// Constants
// ============================================================================

/// Valid namespaces: alphabetic, at least three characters.
static NAMESPACE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]{3,}$").expect("namespace pattern"));

// ============================================================================
// Extension
// ============================================================================

/// A loadable harness extension.
///
/// The set is closed at compile time; "loading" an extension resolves
/// its name to one of these variants rather than pulling in code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extension {
    /// A transport driver selectable by `connect`.
    Driver(TransportKind),
    /// A query adapter built on `evaluate`.
    Query(QueryKind),
}

/// The bundled query adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    /// Component lookup and tag/attribute/text assertions.
    Component,
    /// Store deep links and focused-element text.
    Store,
    /// Feed-grid tile inspection.
    Feed,
}

// ============================================================================
// ExtensionRegistry
// ============================================================================

/// Mapping from namespace to registered extension.
///
/// Owned by the command facade; populated once at startup.
#[derive(Debug, Default)]
pub struct ExtensionRegistry {
    entries: FxHashMap<String, Extension>,
}

impl ExtensionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an extension under a namespace.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidNamespace`] if the namespace fails validation
    /// - [`Error::DuplicateExtension`] if the namespace is taken
    pub fn register(&mut self, namespace: &str, extension: Extension) -> Result<()> {
        if !NAMESPACE_PATTERN.is_match(namespace) {
            return Err(Error::invalid_namespace(namespace));
        }

        if self.entries.contains_key(namespace) {
            return Err(Error::duplicate_extension(namespace));
        }

        debug!(namespace, ?extension, "Extension registered");
        self.entries.insert(namespace.to_string(), extension);
        Ok(())
    }

    /// Looks up a registered extension.
    #[must_use]
    pub fn get(&self, namespace: &str) -> Option<Extension> {
        self.entries.get(namespace).copied()
    }

    /// Resolves a driver name to its transport kind.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownDriver`] if the name is unregistered or
    /// names a non-driver extension.
    pub fn driver(&self, name: &str) -> Result<TransportKind> {
        match self.get(name) {
            Some(Extension::Driver(kind)) => Ok(kind),
            _ => Err(Error::unknown_driver(name)),
        }
    }

    /// Number of registered extensions.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is registered.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_resolve_driver() {
        let mut registry = ExtensionRegistry::new();
        registry
            .register("inspector", Extension::Driver(TransportKind::Inspector))
            .expect("register");

        assert_eq!(registry.driver("inspector").unwrap(), TransportKind::Inspector);
    }

    #[test]
    fn test_duplicate_namespace_is_fatal() {
        let mut registry = ExtensionRegistry::new();
        registry
            .register("abc", Extension::Query(QueryKind::Component))
            .expect("first");

        let err = registry
            .register("abc", Extension::Query(QueryKind::Store))
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateExtension { .. }));

        // The original registration survives
        assert_eq!(registry.get("abc"), Some(Extension::Query(QueryKind::Component)));
    }

    #[test]
    fn test_short_namespace_is_rejected() {
        let mut registry = ExtensionRegistry::new();

        let err = registry
            .register("ab", Extension::Query(QueryKind::Component))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidNamespace { .. }));
    }

    #[test]
    fn test_nonalphabetic_namespace_is_rejected() {
        let mut registry = ExtensionRegistry::new();

        for bad in ["tlx2", "what's", "feed grid", "", "a-b-c"] {
            let err = registry
                .register(bad, Extension::Query(QueryKind::Feed))
                .unwrap_err();
            assert!(matches!(err, Error::InvalidNamespace { .. }), "{bad}");
        }
    }

    #[test]
    fn test_driver_lookup_rejects_query_namespaces() {
        let mut registry = ExtensionRegistry::new();
        registry
            .register("tlx", Extension::Query(QueryKind::Component))
            .expect("register");

        let err = registry.driver("tlx").unwrap_err();
        assert!(matches!(err, Error::UnknownDriver { .. }));
    }

    #[test]
    fn test_unknown_driver() {
        let registry = ExtensionRegistry::new();
        assert!(registry.driver("inspector").is_err());
        assert!(registry.is_empty());
    }
}
