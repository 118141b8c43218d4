//! Shape and invariant validation for classification tables.
//!
//! Two layers:
//!
//! 1. **Shape** - the table document must be a JSON array of objects. Checked
//!    against the embedded draft-7 schema in `schemas/classification-table.json`.
//! 2. **Invariants** - cardinality rules over the records:
//!    - at least one record has a non-empty string `regex`;
//!    - exactly one record has a non-empty `metadata` mapping;
//!    - exactly one record has a non-empty `sources` sequence.
//!
//! Shape violations at the top level are [`TableError::Structural`]; anything
//! below that is [`TableError::Validation`].

use serde_json::Value;

use crate::error::{TableError, TableResult};

/// Validate a JSON value against a JSON schema (draft 7).
///
/// # Returns
/// * `Ok(())` if valid
/// * `Err(Vec<String>)` with the schema errors otherwise
pub fn validate(schema: &Value, data: &Value) -> Result<(), Vec<String>> {
    let validator = jsonschema::draft7::new(schema)
        .map_err(|e| vec![format!("Invalid schema: {}", e)])?;

    let errors: Vec<String> = validator
        .iter_errors(data)
        .map(|e| e.to_string())
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Quick check: returns just true/false.
pub fn is_valid(schema: &Value, data: &Value) -> bool {
    jsonschema::draft7::is_valid(schema, data)
}

fn table_schema() -> Value {
    serde_json::from_str(include_str!("../../schemas/classification-table.json"))
        .expect("Invalid embedded schema")
}

/// Check that the table document is an array of JSON objects.
pub fn validate_table_shape(doc: &Value) -> TableResult<()> {
    let records = doc.as_array().ok_or_else(|| {
        TableError::Structural("top-level JSON value must be an array of records".into())
    })?;

    if validate(&table_schema(), doc).is_err() {
        // The schema only constrains element types, so the offender is the
        // first non-object record.
        let index = records.iter().position(|r| !r.is_object()).unwrap_or(0);
        return Err(TableError::Validation(format!(
            "record {index} is not a JSON object"
        )));
    }

    Ok(())
}

/// Check the regex/metadata/sources cardinality invariants.
///
/// Expects a document that already passed [`validate_table_shape`].
pub fn validate_invariants(doc: &[Value]) -> TableResult<()> {
    let has_regex = doc.iter().any(|record| {
        record
            .get("regex")
            .and_then(Value::as_str)
            .is_some_and(|p| !p.trim().is_empty())
    });
    if !has_regex {
        return Err(TableError::Validation(
            "the table must include at least one record with a non-empty 'regex' string".into(),
        ));
    }

    let metadata_count = doc
        .iter()
        .filter(|record| {
            record
                .get("metadata")
                .and_then(Value::as_object)
                .is_some_and(|m| !m.is_empty())
        })
        .count();
    if metadata_count != 1 {
        return Err(TableError::Validation(format!(
            "the table must include exactly one non-empty 'metadata' mapping (found {metadata_count})"
        )));
    }

    let sources_count = doc
        .iter()
        .filter(|record| {
            record
                .get("sources")
                .and_then(Value::as_array)
                .is_some_and(|s| !s.is_empty())
        })
        .count();
    if sources_count != 1 {
        return Err(TableError::Validation(format!(
            "the table must include exactly one non-empty 'sources' sequence (found {sources_count})"
        )));
    }

    Ok(())
}
