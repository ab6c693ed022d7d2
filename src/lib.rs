//! Entity reference resolution for nested card layouts.
//!
//! A layout is a list of rows, each row holds columns, each column holds a
//! list of modules (cards), and some cards nest further cards. Cards refer to
//! external entities by identifier (`domain.name`). Moving a layout to another
//! installation means finding every identifier, picking a replacement for the
//! ones that do not exist there, and rewriting the layout consistently.
//!
//! ```text
//! Layout ── scan ──▶ Vec<Reference> ──▶ (caller picks replacements,
//!                                        helped by `suggest`)
//!                                            │
//!                                            ▼
//! Layout ◀── rewrite ◀── Vec<Substitution> ──┴── invert (for re-export)
//! ```
//!
//! # Example
//! ```
//! use cardport::{Layout, Substitution, rewrite, scan, suggest};
//! use serde_json::json;
//!
//! let layout = Layout::from_value(json!([
//!     {"columns": [{"modules": [{"type": "light", "entity": "light.kitchen"}]}]}
//! ]))
//! .unwrap();
//!
//! let refs = scan(&layout);
//! assert_eq!(refs[0].identifier, "light.kitchen");
//!
//! let picks = suggest("light.kitchen", &["light.kitchen_main", "switch.kitchen"]);
//! assert_eq!(picks, vec!["light.kitchen_main".to_string()]);
//!
//! let ported = rewrite(&layout, &[Substitution::new("light.kitchen", "light.kitchen_main")]);
//! assert_eq!(scan(&ported)[0].identifier, "light.kitchen_main");
//! ```

mod api;
mod engine;
mod error;
mod pool;
mod tree;

pub use api::{
    DEFAULT_MAX_SUGGESTIONS, InjectivityConflict, Options, RewriteMode, ScanMetrics, ScanReport, Suggestion,
    check_injective, check_round_trip, invert, missing_references, rewrite, rewrite_with, scan, scan_verbose, scan_with,
    suggest, suggest_scored, suggest_with,
};
pub use engine::FieldRoles;
pub use error::PortError;
pub use pool::{CandidatePool, is_well_formed};
pub use tree::{Layout, NodeKind};

use serde::{Deserialize, Serialize};
use std::fmt;

// --- Shared records ----------------------------------------------------------

/// Where an identifier occurrence lives inside a [`Layout`].
///
/// `modules` is the index chain from the column's module list down to the
/// card holding the field: `[2]` is the third top-level card, `[2, 0]` the
/// first child of that card, and so on. `field` is the dotted field name
/// inside that card and `index` the position inside the field when the field
/// is a list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    pub row: usize,
    pub column: usize,
    pub modules: Vec<usize>,
    pub field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
}

impl Location {
    /// Number of cards on the path from the column down to the field's card.
    pub fn depth(&self) -> usize {
        self.modules.len()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rows[{}].columns[{}].modules", self.row, self.column)?;
        for idx in &self.modules {
            write!(f, "[{idx}]")?;
        }
        write!(f, ":{}", self.field)?;
        if let Some(idx) = self.index {
            write!(f, "[{idx}]")?;
        }
        Ok(())
    }
}

/// One occurrence of an identifier in a layout.
///
/// The same identifier appearing in two places yields two references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub identifier: String,
    pub location: Location,
    /// `type` tag of the card that holds the field.
    pub kind: String,
    /// Human label taken from the list entry holding the identifier, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    pub role: FieldRoles,
}

/// A single `original -> replacement` decision.
///
/// `location` is only consulted in [`RewriteMode::PerLocation`]; the default
/// global mode treats every entry as a rename of the identifier everywhere.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Substitution {
    pub original: String,
    pub replacement: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl Substitution {
    pub fn new(original: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self { original: original.into(), replacement: replacement.into(), location: None }
    }

    /// An entry that only applies at `location` in per-location mode.
    pub fn at(original: impl Into<String>, replacement: impl Into<String>, location: Location) -> Self {
        Self { original: original.into(), replacement: replacement.into(), location: Some(location) }
    }

    /// Swap `original` and `replacement`, keeping the location.
    pub fn inverted(&self) -> Self {
        Self {
            original: self.replacement.clone(),
            replacement: self.original.clone(),
            location: self.location.clone(),
        }
    }
}

/// Split an identifier into `(domain, name)` on the first `.`.
///
/// Identifiers without a separator have an empty domain.
pub(crate) fn split_identifier(identifier: &str) -> (&str, &str) {
    identifier.split_once('.').unwrap_or(("", identifier))
}
