//! Substitution.
//!
//! The rewriter runs the same walk as the scanner and asks a
//! [`SubstitutionTable`] for a replacement at every occurrence. Only values
//! on the path to a replaced field are rebuilt; the input layout is never
//! touched.
//!
//! ## Global vs per-location
//!
//! References are per occurrence, but a plain substitution list is keyed by
//! identifier alone. In [`RewriteMode::Global`] (the default) the list is
//! folded into one `original -> replacement` map, later entries overriding
//! earlier ones, and every occurrence of `original` is renamed:
//!
//! ```text
//! [a -> x, a -> z]            every `a` becomes `z`
//! ```
//!
//! [`RewriteMode::PerLocation`] additionally honours entries that carry a
//! location. Such an entry only fires at that exact location, and only when
//! the value found there is its `original`. Entries without a location act
//! as the identifier-wide default:
//!
//! ```text
//! [a -> x, a@loc2 -> y]       `a` at loc2 becomes `y`, every other `a` becomes `x`
//! ```

use super::kinds::FieldRoles;
use super::walk::{Occurrence, Visit, Walker};
use crate::{Layout, Location, Substitution};
use std::collections::HashMap;

/// How a substitution list is turned into a lookup table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RewriteMode {
    /// Rename by identifier everywhere; locations on entries are ignored.
    #[default]
    Global,
    /// Entries with a location apply only there; others are the default.
    PerLocation,
}

#[derive(Debug, Default)]
pub(crate) struct SubstitutionTable<'s> {
    global: HashMap<&'s str, &'s str>,
    located: HashMap<&'s Location, HashMap<&'s str, &'s str>>,
}

impl<'s> SubstitutionTable<'s> {
    /// Entries with a blank original or replacement are dropped: blank
    /// values are not identifiers and would never be matched on the way back.
    pub fn build(substitutions: &'s [Substitution], mode: RewriteMode) -> Self {
        let mut table = Self::default();
        for sub in substitutions {
            if sub.original.trim().is_empty() || sub.replacement.trim().is_empty() {
                tracing::debug!(
                    original = %sub.original,
                    replacement = %sub.replacement,
                    "ignoring blank substitution"
                );
                continue;
            }
            match (mode, &sub.location) {
                (RewriteMode::PerLocation, Some(location)) => {
                    table.located.entry(location).or_default().insert(&sub.original, &sub.replacement);
                }
                _ => {
                    table.global.insert(&sub.original, &sub.replacement);
                }
            }
        }
        table
    }

    pub fn lookup(&self, value: &str, location: &Location) -> Option<&'s str> {
        self.located
            .get(location)
            .and_then(|entries| entries.get(value))
            .or_else(|| self.global.get(value))
            .copied()
    }

    pub fn is_empty(&self) -> bool {
        self.global.is_empty() && self.located.is_empty()
    }
}

struct Substitutor<'t, 's> {
    table: &'t SubstitutionTable<'s>,
    replaced: usize,
}

impl Visit for Substitutor<'_, '_> {
    fn occurrence(&mut self, occurrence: Occurrence<'_>) -> Option<String> {
        let replacement = self.table.lookup(occurrence.value, &occurrence.location)?;
        tracing::trace!(
            location = %occurrence.location,
            from = occurrence.value,
            to = replacement,
            "replacing identifier"
        );
        self.replaced += 1;
        Some(replacement.to_string())
    }
}

/// Apply `substitutions` to a copy of `layout`.
pub fn rewrite_layout(
    layout: &Layout,
    substitutions: &[Substitution],
    mode: RewriteMode,
    roles: FieldRoles,
) -> Layout {
    let table = SubstitutionTable::build(substitutions, mode);
    if table.is_empty() {
        return layout.clone();
    }

    let mut substitutor = Substitutor { table: &table, replaced: 0 };
    let mut walker = Walker::new(&mut substitutor, roles);
    let rebuilt = walker.walk_layout(layout.rows());
    drop(walker);

    tracing::debug!(entries = substitutions.len(), replaced = substitutor.replaced, ?mode, "rewrite finished");

    match rebuilt {
        Some(rows) => Layout::from_rows(rows),
        None => layout.clone(),
    }
}
