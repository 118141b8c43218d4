//! Error types for the convertu conversion core.
//!
//! This module defines a hierarchy of error types:
//!
//! - [`TableError`] - classification table loading/validation errors
//! - [`ConvertError`] - conversion input errors
//! - [`ConvertuError`] - top-level errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries. The core never prints or
//! exits; callers (the `cconv` binary) decide how errors reach the user.

use std::path::PathBuf;

use thiserror::Error;

// =============================================================================
// Table Errors
// =============================================================================

/// Errors while loading, validating, or persisting a classification table.
#[derive(Debug, Error)]
pub enum TableError {
    /// Table file does not exist.
    #[error("Classification table not found: {path}")]
    NotFound { path: PathBuf },

    /// Table file content is not valid JSON.
    #[error("Invalid JSON in {path}: {source}")]
    Malformed {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// Failed to read the table file.
    #[error("Unable to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a table to disk.
    #[error("Unable to write to {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Top-level JSON value is not a sequence of records.
    #[error("Classification table must be a JSON array: {0}")]
    Structural(String),

    /// Table invariant violated (regex/metadata/sources rules).
    #[error("Invalid classification table: {0}")]
    Validation(String),
}

// =============================================================================
// Conversion Errors
// =============================================================================

/// Errors from the matcher/converter.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Input is neither a string, nor a sequence of strings, nor absent.
    #[error("Input text must be a string, a sequence of strings, or null: {0}")]
    BadInputShape(String),
}

// =============================================================================
// Top-level Errors
// =============================================================================

/// Top-level error type returned by [`crate::cconv`].
///
/// Wraps all lower-level errors and exposes a stable machine [`code`] per
/// error kind for structured handling by callers.
///
/// [`code`]: ConvertuError::code
#[derive(Debug, Error)]
pub enum ConvertuError {
    /// Table error.
    #[error("Table error: {0}")]
    Table(#[from] TableError),

    /// Conversion error.
    #[error("Conversion error: {0}")]
    Convert(#[from] ConvertError),
}

impl ConvertuError {
    /// Stable machine code identifying the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            ConvertuError::Table(TableError::NotFound { .. }) => "table-not-found",
            ConvertuError::Table(TableError::Malformed { .. }) => "malformed-table",
            ConvertuError::Table(TableError::Read { .. })
            | ConvertuError::Table(TableError::Write { .. }) => "io-failure",
            ConvertuError::Table(TableError::Structural(_)) => "structural",
            ConvertuError::Table(TableError::Validation(_)) => "validation",
            ConvertuError::Convert(ConvertError::BadInputShape(_)) => "bad-input-shape",
        }
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for table operations.
pub type TableResult<T> = Result<T, TableError>;

/// Result type for conversion operations.
pub type ConvertResult<T> = Result<T, ConvertError>;

/// Result type for the top-level entry point.
pub type ConvertuResult<T> = Result<T, ConvertuError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        // TableError -> ConvertuError
        let table_err = TableError::NotFound {
            path: PathBuf::from("/tmp/missing.json"),
        };
        let top: ConvertuError = table_err.into();
        assert!(top.to_string().contains("/tmp/missing.json"));

        // ConvertError -> ConvertuError
        let convert_err = ConvertError::BadInputShape("got a number".into());
        let top: ConvertuError = convert_err.into();
        assert!(top.to_string().contains("got a number"));
    }

    #[test]
    fn test_machine_codes() {
        let cases: Vec<(ConvertuError, &str)> = vec![
            (
                TableError::NotFound {
                    path: PathBuf::from("x"),
                }
                .into(),
                "table-not-found",
            ),
            (
                TableError::Structural("not an array".into()).into(),
                "structural",
            ),
            (
                TableError::Validation("missing metadata".into()).into(),
                "validation",
            ),
            (
                ConvertError::BadInputShape("boolean".into()).into(),
                "bad-input-shape",
            ),
        ];
        for (err, code) in cases {
            assert_eq!(err.code(), code);
        }
    }

    #[test]
    fn test_malformed_embeds_parse_diagnostic() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let diagnostic = parse_err.to_string();
        let err = TableError::Malformed {
            path: "table.json".into(),
            source: parse_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("table.json"));
        assert!(msg.contains(&diagnostic));
    }
}
