// src/rules/errors.rs

//! Error types for loading rewrite rules.

use ::thiserror::Error;

/// Result type for rule operations.
pub type Result<T> = std::result::Result<T, RuleError>;

/// Errors that can occur while loading or parsing rewrite rules.
///
/// Shape errors carry the full expected-format message followed by the
/// received value.
#[derive(Error, Debug)]
pub enum RuleError {
    /// The rule document is not a mapping, or a top-level key has the wrong
    /// type.
    #[error("{0}")]
    InvalidRulesFormat(String),

    /// Malformed `rewrite_datetime`.
    #[error("{0}")]
    DateTimeRule(String),

    /// Malformed `unchanged_lines`.
    #[error("{0}")]
    UnchangedLines(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] ::serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A pattern generated from `unchanged_lines` text failed to compile.
    #[error("invalid pattern: {0}")]
    Pattern(#[from] ::regex::Error),
}
