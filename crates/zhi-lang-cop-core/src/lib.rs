//! Core library for zhi-lang-cop.
//!
//! Flags mainland-China vocabulary in Traditional Chinese text. A
//! [`TermDictionary`] maps surface terms to rules; a [`Matcher`] scans text
//! against it and reports non-overlapping [`Issue`]s, longest term first.
//!
//! # Modules
//!
//! - [`types`] - Levels, categories, rules and issues
//! - [`dictionary`] - Validated, read-only term dictionary
//! - [`matcher`] - The matching engine
//! - [`report`] - Summaries and the full check report
//! - [`compile`] - Build a dictionary from annotated JSON Lines
//! - [`config`] - Configuration loading and management
//! - [`error`] - Error types and result aliases
//!
//! # Quick Start
//!
//! ```
//! use zhi_lang_cop_core::{Level, Matcher, TermDictionary};
//!
//! let dict = TermDictionary::bundled().expect("bundled dictionary is valid");
//! let issues = Matcher::new(&dict, Some(Level::Error)).find_matches("我需要優化數據庫");
//!
//! assert_eq!(issues[0].term, "優化");
//! assert_eq!(issues[0].alternatives[0], "最佳化");
//! ```
#![deny(unsafe_code)]

pub mod compile;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod matcher;
pub mod report;
pub mod types;

pub use config::{Config, ConfigLoader, ConfigSources, DEFAULT_MAX_INPUT_BYTES, LogLevel};
pub use dictionary::{RuleFilter, Statistics, TermDictionary, TermsDatabase};
pub use error::{ConfigError, ConfigResult, LoadError, LoadResult};
pub use matcher::{Matcher, scan};
pub use report::{LintReport, Summary};
pub use types::{Category, Issue, Level, Location, Position, Rule, RuleId, TermMapping};
