//! Candidate pools.
//!
//! The engine itself accepts any `&[impl AsRef<str>]` as a pool. This type
//! is the owned snapshot used by the CLI and by callers that load the list
//! of existing identifiers from a file: one identifier per line, `#`
//! comments and blank lines ignored, or a JSON array of strings.

use crate::error::PortError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_]+\.[A-Za-z0-9_]+$").expect("identifier pattern compiles"));

/// Whether `identifier` looks like `domain.name`.
///
/// Both parts are restricted to ASCII letters, digits and `_`.
pub fn is_well_formed(identifier: &str) -> bool {
    IDENTIFIER.is_match(identifier)
}

/// Read-only list of identifiers that exist in the target installation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidatePool {
    identifiers: Vec<String>,
}

impl CandidatePool {
    pub fn new<I, S>(identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { identifiers: identifiers.into_iter().map(Into::into).collect() }
    }

    /// Parse one identifier per line, dropping malformed entries.
    pub fn parse_lines(text: &str) -> Self {
        let identifiers = entries(text)
            .filter_map(|(line, entry)| {
                if is_well_formed(entry) {
                    Some(entry.to_string())
                } else {
                    tracing::debug!(line, entry, "dropping malformed pool entry");
                    None
                }
            })
            .collect();
        Self { identifiers }
    }

    /// Parse one identifier per line, failing on the first malformed entry.
    pub fn parse_lines_strict(text: &str) -> Result<Self, PortError> {
        let mut identifiers = Vec::new();
        for (line, entry) in entries(text) {
            if !is_well_formed(entry) {
                return Err(PortError::InvalidPool { line, entry: entry.to_string() });
            }
            identifiers.push(entry.to_string());
        }
        Ok(Self { identifiers })
    }

    /// Parse either a JSON array of strings or the line format.
    pub fn parse(text: &str) -> Result<Self, PortError> {
        if text.trim_start().starts_with('[') {
            Ok(serde_json::from_str(text)?)
        } else {
            Ok(Self::parse_lines(text))
        }
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.identifiers.iter().any(|known| known == identifier)
    }

    /// Identifiers in this pool that are absent from `other`.
    pub fn difference<'a>(&'a self, other: &CandidatePool) -> Vec<&'a str> {
        let theirs: HashSet<&str> = other.identifiers.iter().map(String::as_str).collect();
        self.identifiers.iter().map(String::as_str).filter(|id| !theirs.contains(id)).collect()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.identifiers
    }

    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for CandidatePool {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Non-blank, non-comment entries with their 1-based line numbers.
fn entries(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, entry)| !entry.is_empty() && !entry.starts_with('#'))
}
