//! Scan metrics.
//!
//! Counters collected by the walker on every pass, plus the wall time that
//! `scan_verbose` measures around it. They are cheap enough to collect
//! unconditionally; the plain `scan` entry point simply drops them.

use std::time::Duration;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanMetrics {
    /// Card objects visited, nested cards included.
    pub nodes_visited: usize,
    /// Cards whose kind had no table entry and used the fallback rule.
    pub fallback_nodes: usize,
    /// Rows, columns or cards skipped because they were not objects.
    pub skipped: usize,
    /// Populated identifier fields seen.
    pub identifiers: usize,
    /// Wall time of the scan.
    pub elapsed: Duration,
}
