//! Compile annotated term lists into a dictionary.
//!
//! Input is JSON Lines, one annotated term per line:
//!
//! ```json
//! {"term":"視頻","rule_id":"00001","level":"hazard","message":"...","category":"tech","concepts":[],"taiwan_alternatives":["影片"],"reviewed":true}
//! ```
//!
//! Entries not marked `reviewed` are skipped. Several entries may share a
//! `rule_id` (one rule reached by several terms) and several entries may
//! share a `term` (one term mapping to several rules).

use std::collections::btree_map::Entry;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::dictionary::{TermDictionary, TermsDatabase};
use crate::error::{LoadError, LoadResult};
use crate::types::{Category, Concept, Level, Rule, TermMapping};

/// One line of annotated input.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AnnotatedEntry {
    /// Surface term to flag.
    pub term: String,
    /// Rule the term maps to.
    pub rule_id: String,
    /// Severity of the rule.
    pub level: Level,
    /// Rationale.
    pub message: String,
    /// Classification tag.
    pub category: Category,
    /// Cross-lingual glosses.
    pub concepts: Vec<Concept>,
    /// Suggested replacements.
    pub taiwan_alternatives: Vec<String>,
    /// Only reviewed entries are compiled.
    #[serde(default)]
    pub reviewed: bool,
}

/// Counts from a compile run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, JsonSchema)]
pub struct CompileReport {
    /// Non-blank input lines.
    pub total: usize,
    /// Entries compiled into the dictionary.
    pub reviewed: usize,
    /// Entries skipped because they were not reviewed.
    pub skipped: usize,
}

/// Compile annotated JSON Lines into a validated dictionary.
///
/// A rule id may appear on many lines, but every line must describe the
/// same rule. A later line that redefines a rule with different contents is
/// rejected with [`LoadError::InvalidEntry`]; it never silently replaces the
/// earlier definition.
#[tracing::instrument(skip(input), fields(input_len = input.len()))]
pub fn compile_annotated(
    input: &str,
    version: &str,
    last_updated: &str,
) -> LoadResult<(TermDictionary, CompileReport)> {
    let mut db = TermsDatabase {
        version: version.to_string(),
        last_updated: last_updated.to_string(),
        ..Default::default()
    };
    let mut report = CompileReport::default();

    for (idx, raw) in input.lines().enumerate() {
        let line = idx + 1;
        if raw.trim().is_empty() {
            continue;
        }
        report.total += 1;

        let entry: AnnotatedEntry =
            serde_json::from_str(raw).map_err(|e| LoadError::InvalidEntry {
                line,
                reason: e.to_string(),
            })?;

        if !entry.reviewed {
            tracing::debug!(line, term = %entry.term, "skipping unreviewed entry");
            report.skipped += 1;
            continue;
        }
        report.reviewed += 1;

        let rule = Rule {
            level: entry.level,
            message: entry.message,
            category: entry.category,
            concepts: entry.concepts,
        };
        match db.rules.entry(entry.rule_id.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(rule);
            }
            Entry::Occupied(existing) if *existing.get() != rule => {
                return Err(LoadError::InvalidEntry {
                    line,
                    reason: format!("rule {} redefined with different contents", entry.rule_id),
                });
            }
            Entry::Occupied(_) => {}
        }

        db.term_to_rules_map
            .entry(entry.term)
            .or_default()
            .push(TermMapping {
                rule_id: entry.rule_id,
                alternatives: entry.taiwan_alternatives,
            });
    }

    tracing::info!(
        total = report.total,
        reviewed = report.reviewed,
        skipped = report.skipped,
        rules = db.rules.len(),
        "compiled annotated terms"
    );
    Ok((TermDictionary::new(db)?, report))
}
