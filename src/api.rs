use crate::engine::{self, FieldRoles};
use crate::{Layout, Reference, Substitution};
use std::collections::HashSet;

pub use crate::engine::{InjectivityConflict, RewriteMode, ScanMetrics, Suggestion};

/// Default number of suggestions returned per identifier.
pub const DEFAULT_MAX_SUGGESTIONS: usize = 10;

/// Options that affect scanning, ranking and rewriting.
///
/// The defaults reproduce the plain entry points ([`scan`], [`suggest`],
/// [`rewrite`]) exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Upper bound on [`suggest_with`] / [`suggest_scored`] results.
    pub max_suggestions: usize,
    /// Which identifier field roles are scanned and rewritten.
    pub roles: FieldRoles,
    /// How substitution lists are keyed during a rewrite.
    pub mode: RewriteMode,
}

impl Default for Options {
    fn default() -> Self {
        Self { max_suggestions: DEFAULT_MAX_SUGGESTIONS, roles: FieldRoles::all(), mode: RewriteMode::Global }
    }
}

/// Result from [`scan_verbose`].
#[derive(Debug, Clone)]
pub struct ScanReport {
    pub references: Vec<Reference>,
    pub metrics: ScanMetrics,
}

/// Every identifier occurrence in `layout`, in document order.
///
/// # Example
/// ```
/// use cardport::{Layout, scan};
/// use serde_json::json;
///
/// let layout = Layout::from_value(json!([{"columns": [{"modules": [
///     {"type": "vertical-stack", "cards": [
///         {"type": "sensor", "entity": "sensor.temp"},
///         {"type": "entities", "entities": [{"entity": "light.hall", "name": "Hall"}]}
///     ]}
/// ]}]}]))
/// .unwrap();
///
/// let refs = scan(&layout);
/// assert_eq!(refs.len(), 2);
/// assert_eq!(refs[1].location.to_string(), "rows[0].columns[0].modules[0][1]:entities[0]");
/// assert_eq!(refs[1].context.as_deref(), Some("Hall"));
/// ```
pub fn scan(layout: &Layout) -> Vec<Reference> {
    scan_with(layout, &Options::default())
}

pub fn scan_with(layout: &Layout, options: &Options) -> Vec<Reference> {
    engine::scan_layout(layout, options.roles)
}

/// Scan and also return traversal counters and timing.
pub fn scan_verbose(layout: &Layout, options: &Options) -> ScanReport {
    let (references, metrics) = engine::scan_layout_with_metrics(layout, options.roles);
    ScanReport { references, metrics }
}

/// Up to ten replacement candidates for `identifier`, best first.
///
/// Only candidates from the same domain are considered.
///
/// # Example
/// ```
/// use cardport::suggest;
///
/// let out = suggest("light.kitchen", &["switch.kitchen", "light.kitchen_2"]);
/// assert_eq!(out, vec!["light.kitchen_2"]);
/// ```
pub fn suggest<S: AsRef<str>>(identifier: &str, pool: &[S]) -> Vec<String> {
    suggest_with(identifier, pool, &Options::default())
}

pub fn suggest_with<S: AsRef<str>>(identifier: &str, pool: &[S], options: &Options) -> Vec<String> {
    suggest_scored(identifier, pool, options).into_iter().map(|s| s.identifier).collect()
}

/// Like [`suggest_with`] but keeps the scores.
pub fn suggest_scored<S: AsRef<str>>(identifier: &str, pool: &[S], options: &Options) -> Vec<Suggestion> {
    engine::rank(identifier, pool.iter().map(|s| s.as_ref()), options.max_suggestions)
}

/// Copy of `layout` with every identifier found in `substitutions` replaced.
///
/// Substitutions are keyed by `original`; when an original repeats, the last
/// entry wins and applies everywhere. See [`RewriteMode::PerLocation`] for
/// location-specific entries.
pub fn rewrite(layout: &Layout, substitutions: &[Substitution]) -> Layout {
    rewrite_with(layout, substitutions, &Options::default())
}

pub fn rewrite_with(layout: &Layout, substitutions: &[Substitution], options: &Options) -> Layout {
    engine::rewrite_layout(layout, substitutions, options.mode, options.roles)
}

/// Swap `original` and `replacement` in every entry, keeping order.
///
/// `rewrite(&rewrite(&l, &s), &invert(&s))` restores `l` only when `s` is
/// injective; see [`check_injective`] and [`check_round_trip`].
pub fn invert(substitutions: &[Substitution]) -> Vec<Substitution> {
    engine::invert_substitutions(substitutions)
}

/// References whose identifier is not in `pool`.
pub fn missing_references<'r, S: AsRef<str>>(references: &'r [Reference], pool: &[S]) -> Vec<&'r Reference> {
    let known: HashSet<&str> = pool.iter().map(|s| s.as_ref()).collect();
    references.iter().filter(|r| !known.contains(r.identifier.as_str())).collect()
}

/// Check that `substitutions` is injective.
pub fn check_injective(substitutions: &[Substitution]) -> Result<(), Vec<InjectivityConflict>> {
    engine::check_injective(substitutions)
}

/// [`check_injective`] plus replacements that already occur in `layout`.
///
/// A replacement that is already present would be caught by the inverse
/// rewrite too, turning an unrelated identifier into the original.
pub fn check_round_trip(
    layout: &Layout,
    substitutions: &[Substitution],
    options: &Options,
) -> Result<(), Vec<InjectivityConflict>> {
    let mut conflicts = check_injective(substitutions).err().unwrap_or_default();

    let present: HashSet<String> = scan_with(layout, options).into_iter().map(|r| r.identifier).collect();
    // A replacement that is itself renamed in the same pass does not survive it.
    let renamed: HashSet<&str> =
        substitutions.iter().filter(|s| s.original != s.replacement).map(|s| s.original.as_str()).collect();
    let mut reported: HashSet<&str> = HashSet::new();
    for sub in substitutions {
        let is_rename = sub.original != sub.replacement;
        let collides = present.contains(&sub.replacement) && !renamed.contains(sub.replacement.as_str());
        if is_rename && collides && reported.insert(&sub.replacement) {
            conflicts.push(InjectivityConflict::ReplacementAlreadyPresent { replacement: sub.replacement.clone() });
        }
    }

    if conflicts.is_empty() { Ok(()) } else { Err(conflicts) }
}
