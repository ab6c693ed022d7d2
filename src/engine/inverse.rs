//! Inverse substitutions for re-export.
//!
//! `invert` swaps every entry and keeps order and duplicates. Feeding the
//! result back into a rewrite restores the original identifiers only when
//! the list is injective:
//!
//! ```text
//! [a -> x, b -> y]   invert [x -> a, y -> b]     round trip restores a, b
//! [a -> x, b -> x]   invert [x -> a, x -> b]     both come back as b
//! [a -> x, a -> z]   invert [x -> a, z -> a]     only z existed after rewrite
//! ```
//!
//! Nothing here repairs a non-injective list. [`check_injective`] reports
//! why a list would not round-trip so the caller can decide.

use crate::Substitution;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

pub fn invert_substitutions(substitutions: &[Substitution]) -> Vec<Substitution> {
    substitutions.iter().map(Substitution::inverted).collect()
}

/// Reason a substitution list will not survive a rewrite/invert round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "conflict", rename_all = "snake_case")]
pub enum InjectivityConflict {
    /// The same original appears in two entries.
    RepeatedOriginal { original: String, first: usize, second: usize },
    /// Two different originals map to the same replacement.
    SharedReplacement { replacement: String, first_original: String, second_original: String },
    /// A replacement already occurs in the layout, so inverting would also
    /// rename the identifier that was there before.
    ReplacementAlreadyPresent { replacement: String },
}

impl fmt::Display for InjectivityConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InjectivityConflict::RepeatedOriginal { original, first, second } => {
                write!(f, "'{original}' is substituted twice (entries {first} and {second})")
            }
            InjectivityConflict::SharedReplacement { replacement, first_original, second_original } => {
                write!(f, "'{first_original}' and '{second_original}' both become '{replacement}'")
            }
            InjectivityConflict::ReplacementAlreadyPresent { replacement } => {
                write!(f, "replacement '{replacement}' is already used in the layout")
            }
        }
    }
}

/// Check that no original repeats and no two originals share a replacement.
///
/// Every conflict is reported, in entry order.
pub fn check_injective(substitutions: &[Substitution]) -> Result<(), Vec<InjectivityConflict>> {
    let mut originals: HashMap<&str, usize> = HashMap::new();
    let mut replacements: HashMap<&str, &str> = HashMap::new();
    let mut conflicts = Vec::new();

    for (idx, sub) in substitutions.iter().enumerate() {
        if let Some(&first) = originals.get(sub.original.as_str()) {
            conflicts.push(InjectivityConflict::RepeatedOriginal {
                original: sub.original.clone(),
                first,
                second: idx,
            });
        } else {
            originals.insert(&sub.original, idx);
        }

        match replacements.get(sub.replacement.as_str()) {
            Some(&owner) if owner != sub.original => conflicts.push(InjectivityConflict::SharedReplacement {
                replacement: sub.replacement.clone(),
                first_original: owner.to_string(),
                second_original: sub.original.clone(),
            }),
            Some(_) => {}
            None => {
                replacements.insert(&sub.replacement, &sub.original);
            }
        }
    }

    if conflicts.is_empty() { Ok(()) } else { Err(conflicts) }
}
