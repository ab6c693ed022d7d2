//! Scanning, ranking and rewriting engine.
//!
//! ## How the parts work together
//!
//! ```text
//! NodeKind ── KIND_RULES ──▶ KindRule            (kinds.rs)
//!                              │  fields in scan order + child slot
//!                              v
//! Layout ── Walker::walk_layout ───────────────  (walk.rs)
//!              rows -> columns -> modules -> cards (depth-first)
//!              every populated identifier field -> Visit::occurrence
//!                 │                         │
//!                 v                         v
//!           Collector                  Substitutor
//!           (scanner.rs)               (rewriter.rs)
//!           Vec<Reference>             copy-on-write Layout
//!
//! identifier + pool ── rank ──▶ Vec<Suggestion>  (resolver.rs)
//! Vec<Substitution> ── invert / check ──────────  (inverse.rs)
//! ```
//!
//! Scanning and rewriting share one traversal so they can never disagree
//! about which fields hold identifiers: a field that `scan` reports is
//! exactly a field that `rewrite` may replace, and vice versa.
//!
//! ## Responsibilities by module
//!
//! - `kinds.rs`: the per-kind field table and the [`FieldRoles`] set.
//! - `walk.rs`: the traversal, location tracking and copy-on-write rebuild.
//! - `scanner.rs`: collects [`crate::Reference`]s.
//! - `rewriter.rs`: the substitution table (global and per-location) and the
//!   rewrite visitor.
//! - `resolver.rs`: domain-gated Levenshtein ranking.
//! - `inverse.rs`: table inversion and injectivity checks.
//! - `metrics.rs`: counters and timing for verbose scans.
//!
//! ## Adding a card kind
//!
//! Add a [`crate::NodeKind`] variant with its tag, then one entry in
//! `KIND_RULES`. Neither the scanner nor the rewriter needs to change.
//!
//! ## Debugging
//!
//! The engine emits `tracing` events at `debug`/`trace` level for skipped
//! entries, fallback cards and applied replacements.

#[path = "engine/inverse.rs"]
mod inverse;
#[path = "engine/kinds.rs"]
mod kinds;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/resolver.rs"]
mod resolver;
#[path = "engine/rewriter.rs"]
mod rewriter;
#[path = "engine/scanner.rs"]
mod scanner;
#[path = "engine/walk.rs"]
mod walk;

#[cfg(test)]
#[path = "engine/tests.rs"]
mod tests;

pub use inverse::{InjectivityConflict, check_injective, invert_substitutions};
pub use kinds::FieldRoles;
pub use metrics::ScanMetrics;
pub use resolver::{Suggestion, rank};
pub use rewriter::{RewriteMode, rewrite_layout};
pub use scanner::{scan_layout, scan_layout_with_metrics};
