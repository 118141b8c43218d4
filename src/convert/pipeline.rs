//! High-level entry point combining loading, validation, introspection,
//! and conversion.
//!
//! # Example
//!
//! ```rust,ignore
//! use convertu::{cconv, ConvertRequest, Outcome};
//!
//! let request = ConvertRequest {
//!     to: "iso3".into(),
//!     text: "Czech Republic".into(),
//!     ..ConvertRequest::default()
//! };
//! match cconv(request)? {
//!     Outcome::Converted(output) => println!("{:?}", output),
//!     _ => unreachable!(),
//! }
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::matcher::PatternSet;
use crate::error::ConvertuResult;
use crate::models::{TextInput, TextOutput};
use crate::table::{self, Table};
use crate::validation;

/// A complete conversion request.
///
/// Mirrors the CLI surface: either in-memory `data` (optionally persisted to
/// `source`), or a table loaded from `source` / the `CCONV_SOURCE` override /
/// the bundled default, plus an introspection flag or a target field with
/// input text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertRequest {
    /// In-memory table data (a JSON array of records).
    pub data: Option<Value>,
    /// Table path: the persistence destination when `data` is supplied,
    /// otherwise the table to read (bundled ISO 3166-1 when absent).
    pub source: Option<PathBuf>,
    /// Return the metadata/sources records instead of converting.
    pub info: bool,
    /// Return the classification records instead of converting.
    pub dump: bool,
    /// Return the sorted values of the target field instead of converting.
    pub list: bool,
    /// Target classification field, e.g. "iso3".
    pub to: String,
    /// Input text(s) to convert.
    pub text: TextInput,
}

/// The result of a [`cconv`] call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Outcome {
    /// Supplied data was persisted to this path.
    Saved(PathBuf),
    /// Metadata/sources records, verbatim (info mode).
    Info(Vec<Value>),
    /// Classification records, verbatim (dump mode).
    Dump(Vec<Value>),
    /// Sorted values of the target field (list mode).
    Listed(Vec<String>),
    /// Converted text, mirroring the input shape.
    Converted(TextOutput),
}

/// Convert text into a target classification, or return table records.
///
/// Precedence: persisting supplied data first, then info, then dump, then
/// list, then conversion. Introspection modes never require a target field
/// (list excepted) and never surface invariant violations of file-loaded
/// tables; caller-supplied data is always validated upfront so persistence
/// never writes an invalid table.
pub fn cconv(request: ConvertRequest) -> ConvertuResult<Outcome> {
    let (doc, validated) = match request.data {
        Some(data) => {
            let doc = table::document_from_value(data)?;
            validation::validate_invariants(&doc)?;
            if let Some(path) = request.source {
                table::persist(&doc, &path)?;
                return Ok(Outcome::Saved(path));
            }
            (doc, true)
        }
        None => {
            let source = table::resolve_source(request.source.as_deref());
            (table::load_document(source.as_deref())?, false)
        }
    };

    let table = Table::partition(&doc);

    if request.info {
        return Ok(Outcome::Info(table.meta_values()));
    }
    if request.dump {
        return Ok(Outcome::Dump(table.classification_values()));
    }
    if request.list {
        return Ok(Outcome::Listed(list_field(&table, &request.to)));
    }

    // conversion touches classification logic; invariant violations surface here
    if !validated {
        validation::validate_invariants(&doc)?;
    }

    let set = PatternSet::compile(table.classification(), &request.to);
    let output = match request.text {
        TextInput::None => TextOutput::Many(Vec::new()),
        // an empty pattern set skips matching and passes every input through
        TextInput::One(text) => TextOutput::One(if set.is_empty() {
            text
        } else {
            set.convert_one(&text)
        }),
        TextInput::Many(texts) => TextOutput::Many(if set.is_empty() {
            texts
        } else {
            set.convert_many(&texts)
        }),
    };

    Ok(Outcome::Converted(output))
}

/// Sorted values of `field` across the classification records.
///
/// Restores the original distribution's `classification()` listing: records
/// that do not define the field (or define it as `null`) are skipped.
fn list_field(table: &Table, field: &str) -> Vec<String> {
    let mut values: Vec<String> = table
        .classification()
        .iter()
        .filter_map(|record| record.field(field))
        .filter_map(|value| match value {
            Value::String(s) => Some(s),
            Value::Null => None,
            other => Some(other.to_string()),
        })
        .collect();
    values.sort();
    values
}
