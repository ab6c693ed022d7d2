//! Error type for the few operations that can fail outright.
//!
//! Everything that walks a layout is tolerant: unknown card types, missing
//! fields and malformed cards are skipped. Hard failures are limited to
//! input that cannot be read as a layout, pool or substitution list.

use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PortError {
    /// The document root is not a list of rows.
    #[error("layout root must be a list of rows, found {found}")]
    RootNotList {
        /// JSON type name of the value found at the root.
        found: &'static str,
    },

    /// Input text is not valid JSON, or not the expected JSON shape.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A candidate pool entry is not a `domain.name` identifier.
    #[error("invalid pool entry on line {line}: '{entry}'")]
    InvalidPool {
        /// 1-based line number in the pool text.
        line: usize,
        /// The offending entry, trimmed.
        entry: String,
    },
}

/// JSON type name used in error messages.
pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "a list",
        serde_json::Value::Object(_) => "an object",
    }
}
