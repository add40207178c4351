//! Query and assertion adapters.
//!
//! Thin helpers over the facade's `evaluate` primitive: each builds a
//! script-expression string for one UI surface, runs it on the remote
//! page and wraps the structured result.
//!
//! | Module | Surface |
//! |--------|---------|
//! | [`component`] | harness page component lookup and navigation |
//! | [`assertions`] | tag / attribute / text checks on components |
//! | [`store`] | store deep links and focused-element text |
//! | [`feed`] | feed-grid tile inspection |

// ============================================================================
// Submodules
// ============================================================================

/// Tag, attribute and text assertions.
pub mod assertions;

/// Component lookup and navigation on the harness page.
pub mod component;

/// Feed-grid tile inspection.
pub mod feed;

/// Store deep links and focused-element text.
pub mod store;

// ============================================================================
// Re-exports
// ============================================================================

pub use component::Component;

// ============================================================================
// Helper Functions
// ============================================================================

/// Escapes a string for safe embedding in a script expression.
pub(crate) fn js_string(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| format!("\"{s}\""))
}
