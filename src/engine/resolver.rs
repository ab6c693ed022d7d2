//! Replacement ranking.
//!
//! Given a missing identifier and the identifiers that do exist, rank the
//! plausible replacements:
//!
//! ```text
//! "light.kitchen" ── split ──▶ ("light", "kitchen")
//!
//! candidate           domain gate   score
//! light.kitchen       same          100           exact name
//! light.kitchen_2     same          80 + 20 * (1 - 2/9)      2 edits over 9 chars
//! switch.kitchen      different     excluded
//! ```
//!
//! Scores stay in `80..=100` for every candidate that passes the gate, so the
//! domain match dominates and the name similarity only orders candidates
//! within the domain. Ties keep pool order (the sort is stable).

use crate::split_identifier;
use serde::{Deserialize, Serialize};

pub(crate) const EXACT_SCORE: f64 = 100.0;
pub(crate) const DOMAIN_SCORE: f64 = 80.0;
pub(crate) const SIMILARITY_WEIGHT: f64 = 20.0;

/// A ranked replacement candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub identifier: String,
    /// `100` for an exact name match, otherwise in `80..100`.
    pub score: f64,
}

/// Rank `pool` against `original`, best first, keeping at most `limit`.
pub fn rank<'p, I>(original: &str, pool: I, limit: usize) -> Vec<Suggestion>
where
    I: IntoIterator<Item = &'p str>,
{
    let (domain, name) = split_identifier(original);
    let folded_name = fold_case(name);

    let mut scored: Vec<Suggestion> = pool
        .into_iter()
        .filter_map(|candidate| {
            let score = score(domain, name, &folded_name, candidate);
            (score > 0.0).then(|| Suggestion { identifier: candidate.to_string(), score })
        })
        .collect();

    // `sort_by` is stable: equal scores keep pool order.
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(limit);

    tracing::trace!(original, kept = scored.len(), "ranked replacement candidates");
    scored
}

fn score(domain: &str, name: &str, folded_name: &str, candidate: &str) -> f64 {
    let (candidate_domain, candidate_name) = split_identifier(candidate);
    if candidate_domain != domain {
        return 0.0;
    }
    if candidate_name == name {
        return EXACT_SCORE;
    }
    DOMAIN_SCORE + SIMILARITY_WEIGHT * similarity(folded_name, &fold_case(candidate_name))
}

/// Lowercase one char at a time, keeping the first char of each mapping so
/// the char count never changes (`İ` folds to `i`, not `i` plus a dot).
fn fold_case(s: &str) -> String {
    s.chars().map(|c| c.to_lowercase().next().unwrap_or(c)).collect()
}

/// `1 - levenshtein / longer length` over chars, in `0.0..=1.0`.
///
/// Two empty names are identical. Inputs are compared as given; callers
/// fold case beforehand.
pub(crate) fn similarity(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(suggestions: &[Suggestion]) -> Vec<&str> {
        suggestions.iter().map(|s| s.identifier.as_str()).collect()
    }

    #[test]
    fn similarity_counts_chars_not_bytes() {
        assert!((similarity("küche", "kuche") - 0.8).abs() < 1e-9);
        assert_eq!(similarity("same", "same"), 1.0);
    }

    #[test]
    fn empty_names_are_identical() {
        assert_eq!(similarity("", ""), 1.0);
        assert_eq!(similarity("ab", ""), 0.0);
    }

    #[test]
    fn domain_gate_excludes_other_domains() {
        let out = rank("light.kitchen", ["switch.kitchen", "light.kitchen_2"], 10);
        assert_eq!(ids(&out), vec!["light.kitchen_2"]);
    }

    #[test]
    fn exact_match_scores_100_and_ranks_first() {
        let out = rank("sensor.temp", ["sensor.temp2", "sensor.temp"], 10);
        assert_eq!(ids(&out), vec!["sensor.temp", "sensor.temp2"]);
        assert_eq!(out[0].score, 100.0);
        // 1 edit over 5 chars: 80 + 20 * 0.8
        assert!((out[1].score - 96.0).abs() < 1e-9);
    }

    #[test]
    fn exact_match_is_case_sensitive_but_fuzzy_score_is_not() {
        // A case-only difference misses the exact branch but has zero distance.
        let out = rank("light.Kitchen", ["light.kitchen"], 10);
        assert_eq!(out[0].score, DOMAIN_SCORE + SIMILARITY_WEIGHT);
        let out = rank("light.Kitchen", ["light.kitchen", "light.Kitchen"], 10);
        assert_eq!(ids(&out), vec!["light.kitchen", "light.Kitchen"]);
        assert!(out.iter().all(|s| s.score == 100.0));
    }

    #[test]
    fn case_folding_keeps_char_count() {
        assert_eq!(fold_case("İx"), "ix");
        assert_eq!(fold_case("KÜCHE").chars().count(), 5);

        let out = rank("light.İx", ["light.İx2", "light.ix"], 10);
        assert_eq!(ids(&out), vec!["light.ix", "light.İx2"]);
        assert_eq!(out[0].score, DOMAIN_SCORE + SIMILARITY_WEIGHT);
    }

    #[test]
    fn ties_keep_pool_order() {
        let out = rank("light.ab", ["light.xb", "light.ay", "light.zz"], 10);
        assert_eq!(ids(&out), vec!["light.xb", "light.ay", "light.zz"]);
        assert_eq!(out[0].score, out[1].score);
    }

    #[test]
    fn no_separator_means_empty_domain() {
        let out = rank("kitchen", ["kitchen2", "light.kitchen"], 10);
        assert_eq!(ids(&out), vec!["kitchen2"]);
    }

    #[test]
    fn limit_is_honoured() {
        let pool: Vec<String> = (0..50).map(|i| format!("sensor.temp_{i}")).collect();
        let out = rank("sensor.temp", pool.iter().map(String::as_str), 10);
        assert_eq!(out.len(), 10);
        assert!(out.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn empty_pool_gives_nothing() {
        assert!(rank("light.a", std::iter::empty::<&str>(), 10).is_empty());
    }
}
