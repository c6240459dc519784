//! Immutable term dictionary.
//!
//! A [`TermDictionary`] is built once from a [`TermsDatabase`] (the on-disk
//! JSON shape), validated at construction, and then only read. It is
//! `Send + Sync` and can be shared across any number of concurrent scans.

use std::collections::BTreeMap;

use camino::Utf8Path;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{LoadError, LoadResult};
use crate::types::{Category, Level, Rule, RuleId, TermMapping};

/// The dictionary shipped with the crate.
const BUNDLED_DICTIONARY: &str = include_str!("../data/terms-db.json");

/// Serialized dictionary layout (`terms-db.json`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TermsDatabase {
    /// Dictionary version string.
    pub version: String,
    /// When the dictionary was compiled (ISO-8601).
    pub last_updated: String,
    /// Rules keyed by id.
    pub rules: BTreeMap<RuleId, Rule>,
    /// Term → mappings, in the order the mappings were declared.
    pub term_to_rules_map: BTreeMap<String, Vec<TermMapping>>,
}

/// Aggregate counts over a dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// Dictionary version string.
    pub version: String,
    /// When the dictionary was compiled.
    pub last_updated: String,
    /// Number of rules.
    pub total_rules: usize,
    /// Number of distinct terms.
    pub total_terms: usize,
    /// Rules per level (levels with no rules are omitted).
    pub by_level: BTreeMap<Level, usize>,
    /// Rules per category (categories with no rules are omitted).
    pub by_category: BTreeMap<Category, usize>,
}

/// A rule together with its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleRecord<'a> {
    /// Rule id.
    pub rule_id: &'a str,
    /// The rule.
    #[serde(flatten)]
    pub rule: &'a Rule,
}

/// One rule reached from a term lookup, with the term's alternatives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TermEntry<'a> {
    /// Rule id.
    pub rule_id: &'a str,
    /// The rule.
    #[serde(flatten)]
    pub rule: &'a Rule,
    /// Suggested replacements recorded for this (term, rule) pair.
    ///
    /// Serialized as `taiwanAlternatives`, the same name the dictionary file
    /// uses for a mapping.
    #[serde(rename = "taiwanAlternatives")]
    pub alternatives: &'a [String],
}

/// Filter and pagination for [`TermDictionary::list_rules`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuleFilter {
    /// Only rules with exactly this level.
    pub level: Option<Level>,
    /// Only rules in this category.
    pub category: Option<Category>,
    /// Number of matching rules to skip.
    pub offset: usize,
    /// Maximum number of rules to return. `None` returns all.
    pub limit: Option<usize>,
}

/// A page of rules returned by [`TermDictionary::list_rules`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RulePage<'a> {
    /// Number of rules matching the filter, before pagination.
    pub total: usize,
    /// Offset the page starts at.
    pub offset: usize,
    /// Requested page size, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    /// Rules on this page, in rule-id order.
    pub rules: Vec<RuleRecord<'a>>,
}

/// Validated, read-only index of rules and term mappings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermDictionary {
    db: TermsDatabase,
}

impl TermDictionary {
    /// Validate `db` and wrap it.
    ///
    /// Fails if a term is empty, has no mappings, or references a rule id
    /// that is not in `db.rules`.
    #[tracing::instrument(skip(db), fields(version = %db.version))]
    pub fn new(db: TermsDatabase) -> LoadResult<Self> {
        for (term, mappings) in &db.term_to_rules_map {
            if term.is_empty() {
                return Err(LoadError::EmptyTerm);
            }
            if mappings.is_empty() {
                return Err(LoadError::NoMappings(term.clone()));
            }
            if let Some(bad) = mappings
                .iter()
                .find(|m| !db.rules.contains_key(&m.rule_id))
            {
                return Err(LoadError::DanglingRule {
                    term: term.clone(),
                    rule_id: bad.rule_id.clone(),
                });
            }
        }

        tracing::debug!(
            rules = db.rules.len(),
            terms = db.term_to_rules_map.len(),
            "dictionary validated"
        );
        Ok(Self { db })
    }

    /// Parse and validate a dictionary from JSON text.
    pub fn from_json_str(json: &str) -> LoadResult<Self> {
        let db: TermsDatabase = serde_json::from_str(json)?;
        Self::new(db)
    }

    /// Read, parse and validate a dictionary file.
    #[tracing::instrument]
    pub fn load(path: &Utf8Path) -> LoadResult<Self> {
        let json = std::fs::read_to_string(path.as_std_path()).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// The dictionary compiled into this crate.
    pub fn bundled() -> LoadResult<Self> {
        Self::from_json_str(BUNDLED_DICTIONARY)
    }

    /// Load from `path` when given, otherwise fall back to [`Self::bundled`].
    pub fn load_or_bundled(path: Option<&Utf8Path>) -> LoadResult<Self> {
        path.map_or_else(Self::bundled, Self::load)
    }

    /// Dictionary version string.
    pub fn version(&self) -> &str {
        &self.db.version
    }

    /// When the dictionary was compiled.
    pub fn last_updated(&self) -> &str {
        &self.db.last_updated
    }

    /// Look up a rule by id.
    pub fn rule_by_id(&self, id: &str) -> Option<&Rule> {
        self.db.rules.get(id)
    }

    /// Mappings for an exact term. Empty when the term is unknown.
    pub fn mappings_for_term(&self, term: &str) -> &[TermMapping] {
        self.db
            .term_to_rules_map
            .get(term)
            .map_or(&[], Vec::as_slice)
    }

    /// Every distinct term. Order carries no meaning for callers.
    pub fn all_terms(&self) -> impl Iterator<Item = &str> {
        self.db.term_to_rules_map.keys().map(String::as_str)
    }

    /// Every rule, in rule-id order.
    pub fn rules(&self) -> impl Iterator<Item = RuleRecord<'_>> {
        self.db.rules.iter().map(|(id, rule)| RuleRecord {
            rule_id: id.as_str(),
            rule,
        })
    }

    /// Mappings for `term` joined with the rules they reference.
    pub fn entries_for_term(&self, term: &str) -> Vec<TermEntry<'_>> {
        self.mappings_for_term(term)
            .iter()
            .filter_map(|m| {
                let (rule_id, rule) = self.db.rules.get_key_value(&m.rule_id)?;
                Some(TermEntry {
                    rule_id: rule_id.as_str(),
                    rule,
                    alternatives: &m.alternatives,
                })
            })
            .collect()
    }

    /// Filter rules by level and category, then paginate.
    pub fn list_rules(&self, filter: RuleFilter) -> RulePage<'_> {
        let matching: Vec<RuleRecord<'_>> = self
            .rules()
            .filter(|r| filter.level.is_none_or(|l| r.rule.level == l))
            .filter(|r| filter.category.is_none_or(|c| r.rule.category == c))
            .collect();
        let total = matching.len();
        let rules = matching
            .into_iter()
            .skip(filter.offset)
            .take(filter.limit.unwrap_or(usize::MAX))
            .collect();

        RulePage {
            total,
            offset: filter.offset,
            limit: filter.limit,
            rules,
        }
    }

    /// Count rules by level and category.
    pub fn statistics(&self) -> Statistics {
        let mut by_level = BTreeMap::new();
        let mut by_category = BTreeMap::new();
        for rule in self.db.rules.values() {
            *by_level.entry(rule.level).or_insert(0) += 1;
            *by_category.entry(rule.category).or_insert(0) += 1;
        }

        Statistics {
            version: self.db.version.clone(),
            last_updated: self.db.last_updated.clone(),
            total_rules: self.db.rules.len(),
            total_terms: self.db.term_to_rules_map.len(),
            by_level,
            by_category,
        }
    }

    /// The underlying serializable database.
    pub const fn as_database(&self) -> &TermsDatabase {
        &self.db
    }
}
