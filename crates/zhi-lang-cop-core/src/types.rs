//! Shared vocabulary types: severity levels, categories, rules and issues.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Stable identifier for a rule (zero-padded numeric code, e.g. `"00001"`).
pub type RuleId = String;

/// Rule severity, most severe first.
///
/// The derived ordering follows declaration order, so `Hazard < Error`.
/// "At least as severe as `min`" therefore means `level <= min`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum Level {
    /// Term is almost never acceptable in Taiwan usage.
    Hazard,
    /// Term should be replaced.
    Error,
    /// Term is questionable.
    Warning,
    /// Term is informational only.
    Info,
    /// Acceptability depends on context.
    Depends,
}

impl Level {
    /// Every level, most severe first.
    pub const ALL: [Self; 5] = [
        Self::Hazard,
        Self::Error,
        Self::Warning,
        Self::Info,
        Self::Depends,
    ];

    /// Returns the level as a lowercase string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Hazard => "hazard",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Depends => "depends",
        }
    }

    /// Returns `true` if `self` is at least as severe as `min`.
    pub fn meets(self, min: Self) -> bool {
        self <= min
    }

    /// Marker glyph used in text reports.
    pub const fn emoji(&self) -> &'static str {
        match self {
            Self::Hazard => "🔴",
            Self::Error => "🟠",
            Self::Warning => "🟡",
            Self::Info => "🔵",
            Self::Depends => "⚪",
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification tag for a rule.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum Category {
    /// General technology vocabulary.
    Tech,
    /// Everyday vocabulary.
    General,
    /// Software and programming vocabulary.
    Programming,
    /// Hardware vocabulary.
    Hardware,
}

impl Category {
    /// Returns the category as a lowercase string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Tech => "tech",
            Self::General => "general",
            Self::Programming => "programming",
            Self::Hardware => "hardware",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Language of a concept gloss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, JsonSchema)]
pub enum Lang {
    /// English.
    #[serde(rename = "en")]
    En,
    /// Traditional Chinese (Taiwan).
    #[serde(rename = "zh-TW")]
    ZhTw,
    /// Simplified Chinese (mainland China).
    #[serde(rename = "zh-CN")]
    ZhCn,
}

impl Lang {
    /// Returns the BCP-47 tag.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::ZhTw => "zh-TW",
            Self::ZhCn => "zh-CN",
        }
    }
}

/// A cross-lingual gloss of the concept a rule is about.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct Concept {
    /// Language of `value`.
    pub lang: Lang,
    /// The concept expressed in `lang`.
    pub value: String,
}

/// A rule that one or more terms map to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct Rule {
    /// Severity.
    pub level: Level,
    /// Human-readable rationale.
    pub message: String,
    /// Classification tag.
    pub category: Category,
    /// Cross-lingual glosses. Required, though it may be empty.
    pub concepts: Vec<Concept>,
}

/// Association of a term with one rule and its suggested replacements.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TermMapping {
    /// The rule this term violates.
    pub rule_id: RuleId,
    /// Suggested Taiwan-usage replacements, in dictionary order.
    #[serde(rename = "taiwanAlternatives", alias = "alternatives")]
    pub alternatives: Vec<String>,
}

/// A 1-based line/column position. Columns count chars, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize, Serialize, JsonSchema)]
pub struct Position {
    /// 1-based line number.
    pub line: usize,
    /// 1-based column, in chars.
    pub column: usize,
}

/// Start/end span of an issue. `end` points just past the last char.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct Location {
    /// Position of the first char of the term.
    pub start: Position,
    /// Position immediately after the term.
    pub end: Position,
}

/// One reported occurrence of a flagged term.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    /// Violated rule.
    pub rule_id: RuleId,
    /// Severity of the violated rule.
    pub level: Level,
    /// The matched term, as found in the text.
    pub term: String,
    /// Rationale from the rule.
    pub message: String,
    /// Suggested replacements for this term under this rule.
    #[serde(alias = "suggestions")]
    pub alternatives: Vec<String>,
    /// Where the term occurs.
    pub location: Location,
}
