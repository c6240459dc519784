//! Error types for zhi-lang-cop-core.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while loading or building a term dictionary.
///
/// Any of these aborts construction; no partial dictionary is produced.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The dictionary file could not be read.
    #[error("failed to read dictionary {path}: {source}")]
    Io {
        /// Path that was being read.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The dictionary JSON is malformed or missing required fields.
    #[error("invalid dictionary: {0}")]
    Parse(#[from] serde_json::Error),

    /// A term mapping points at a rule id that is not defined.
    #[error("term '{term}' references unknown rule {rule_id}")]
    DanglingRule {
        /// The term carrying the bad mapping.
        term: String,
        /// The missing rule id.
        rule_id: String,
    },

    /// The term index contains the empty string.
    #[error("dictionary contains an empty term")]
    EmptyTerm,

    /// A term is present in the index but maps to no rules.
    #[error("term '{0}' has no rule mappings")]
    NoMappings(String),

    /// A line of annotated input could not be compiled.
    #[error("line {line}: {reason}")]
    InvalidEntry {
        /// 1-based line number in the annotated input.
        line: usize,
        /// What was wrong with it.
        reason: String,
    },
}

/// Result type alias using [`LoadError`].
pub type LoadResult<T> = Result<T, LoadError>;
