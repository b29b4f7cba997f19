//! Error types for chargekit.
//!
//! Each subsystem owns a small `thiserror` enum; the crate-level [`Error`]
//! aggregates them so callers can use one [`Result`] alias across the API.

use thiserror::Error;

/// Errors raised while compiling a substitution-rule string.
#[derive(Debug, Error)]
pub enum CompileError {
    /// A dynamic atom (`~...`) has nothing between the marker and the first
    /// suffix separator.
    #[error("substitution rule '{rule}' has an empty field path")]
    EmptyFieldPath { rule: String },

    /// An `:s/../../` suffix is missing its closing delimiter.
    #[error("substitution rule '{rule}' has an unterminated substitution suffix")]
    UnterminatedSubstitution { rule: String },

    /// A suffix after a dynamic atom is not a recognized directive.
    #[error("substitution rule '{rule}' has an unknown directive '{directive}'")]
    UnknownDirective { rule: String, directive: String },

    /// A substitution pattern does not compile as a regular expression.
    #[error("substitution rule '{rule}' has an invalid pattern: {source}")]
    InvalidRegex {
        rule: String,
        #[source]
        source: regex::Error,
    },
}

/// Errors raised while evaluating a compiled substitution rule.
#[derive(Debug, Error)]
pub enum EvalError {
    /// A dynamic atom referenced a field the evaluation context does not
    /// provide. Literal-only rules never produce this.
    #[error("field '{0}' not found in the evaluation context")]
    FieldNotFound(String),
}

/// Errors raised by [`MigrationConfig::validate`](crate::config::MigrationConfig::validate).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("default tenant cannot be empty")]
    EmptyDefaultTenant,

    #[error("filter field names cannot be empty")]
    EmptyFilterField,

    #[error("duplicate filter field '{0}'")]
    DuplicateFilterField(String),

    /// Canonical names must be fixed points of the field-name map, otherwise
    /// applying the map twice would keep renaming.
    #[error("field map target '{target}' for '{from}' is itself remapped")]
    NonCanonicalMapTarget { from: String, target: String },
}

/// Errors raised while opening a CDR document for splitting.
#[derive(Debug, Error)]
pub enum XmlError {
    /// The input stream could not be read to completion.
    #[error("failed to read CDR input: {0}")]
    Read(#[from] std::io::Error),

    /// The document is malformed beyond what relaxed parsing tolerates.
    #[error("malformed CDR document at byte {position}: {source}")]
    Parse {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },

    /// The document ended while an element was still open.
    #[error("CDR document ended inside an unclosed '{element}' element")]
    Truncated { element: String },

    /// The document carries no root element at all.
    #[error("CDR document has no root element")]
    MissingRoot,

    /// A record fragment is not valid UTF-8.
    #[error("CDR fragment at byte {position} is not valid UTF-8")]
    NonUtf8 { position: u64 },
}

/// Crate-level error wrapping every subsystem error.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Eval(#[from] EvalError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Xml(#[from] XmlError),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;
