//! Scan reports: per-level summaries and the full `check` output shape.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::types::{Issue, Level};

/// Issue counts for a scan.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// Total number of issues.
    pub total: usize,
    /// Issues per level. Every level is present, zero when unused.
    pub by_level: BTreeMap<Level, usize>,
}

impl Summary {
    /// Fold a list of issues into counts.
    pub fn from_issues(issues: &[Issue]) -> Self {
        let mut by_level: BTreeMap<Level, usize> = Level::ALL.iter().map(|&l| (l, 0)).collect();
        for issue in issues {
            *by_level.entry(issue.level).or_insert(0) += 1;
        }
        Self {
            total: issues.len(),
            by_level,
        }
    }

    /// Count for a single level.
    pub fn count(&self, level: Level) -> usize {
        self.by_level.get(&level).copied().unwrap_or(0)
    }
}

/// Provenance of a report.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// Version of the dictionary the text was checked against.
    pub version: String,
    /// When the check ran (ISO-8601).
    pub checked_at: String,
}

/// Full result of checking one text.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct LintReport {
    /// Issues, ordered by start position.
    pub results: Vec<Issue>,
    /// Counts over `results`.
    pub summary: Summary,
    /// Dictionary version and timestamp.
    pub metadata: Metadata,
}

impl LintReport {
    /// Wrap scan results with their summary and metadata.
    pub fn new(results: Vec<Issue>, version: impl Into<String>, checked_at: impl Into<String>) -> Self {
        let summary = Summary::from_issues(&results);
        Self {
            results,
            summary,
            metadata: Metadata {
                version: version.into(),
                checked_at: checked_at.into(),
            },
        }
    }

    /// `true` when no issues were reported.
    pub fn is_clean(&self) -> bool {
        self.results.is_empty()
    }
}
