//! Reference scanning.
//!
//! A thin visitor over the shared walker: every occurrence becomes a
//! [`Reference`], nothing is ever replaced. Occurrences are not merged, so an
//! identifier used in three cards yields three references with three
//! locations.

use super::kinds::FieldRoles;
use super::metrics::ScanMetrics;
use super::walk::{Occurrence, Visit, Walker};
use crate::{Layout, Reference};
use std::time::Instant;

#[derive(Default)]
struct Collector {
    references: Vec<Reference>,
}

impl Visit for Collector {
    fn occurrence(&mut self, occurrence: Occurrence<'_>) -> Option<String> {
        self.references.push(Reference {
            identifier: occurrence.value.to_string(),
            location: occurrence.location,
            kind: occurrence.kind.as_str().to_string(),
            context: occurrence.context.map(str::to_string),
            role: occurrence.role,
        });
        None
    }
}

pub fn scan_layout(layout: &Layout, roles: FieldRoles) -> Vec<Reference> {
    scan_layout_with_metrics(layout, roles).0
}

pub fn scan_layout_with_metrics(layout: &Layout, roles: FieldRoles) -> (Vec<Reference>, ScanMetrics) {
    let start = Instant::now();
    let mut collector = Collector::default();
    let mut walker = Walker::new(&mut collector, roles);
    // The collector never replaces, so there is nothing to rebuild.
    let _ = walker.walk_layout(layout.rows());
    let mut metrics = walker.into_metrics();
    metrics.elapsed = start.elapsed();

    tracing::debug!(
        references = collector.references.len(),
        nodes = metrics.nodes_visited,
        skipped = metrics.skipped,
        "scan finished"
    );

    (collector.references, metrics)
}
