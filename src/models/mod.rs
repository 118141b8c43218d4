//! Domain models for classification tables.
//!
//! This module contains the core data structures used throughout the crate:
//!
//! - [`Record`] - tagged union over the three record kinds
//! - [`ClassificationRecord`] - a `regex` pattern plus open classification fields
//! - [`MetadataRecord`] / [`SourcesRecord`] - the table's self-description
//! - [`TextInput`] / [`TextOutput`] - shape-preserving conversion payloads

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ConvertError;

// =============================================================================
// Records
// =============================================================================

/// A single record of a classification table.
///
/// The record kind is decided by key *presence* alone: an object carrying a
/// `metadata` key is a metadata record, an object carrying a `sources` key is
/// a sources record, everything else is a classification record. Value types
/// are a validation concern, not a partition concern.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    /// `{"metadata": {field: description, ...}}`
    Metadata(MetadataRecord),
    /// `{"sources": [citation, ...]}`
    Sources(SourcesRecord),
    /// `{"regex": pattern, field: value, ...}`
    Classification(ClassificationRecord),
}

impl Record {
    /// Classify a JSON object into its record kind.
    pub fn from_object(object: Map<String, Value>) -> Self {
        if object.contains_key("metadata") {
            Record::Metadata(MetadataRecord(object))
        } else if object.contains_key("sources") {
            Record::Sources(SourcesRecord(object))
        } else {
            Record::Classification(ClassificationRecord::from_object(object))
        }
    }

    /// True for metadata and sources records.
    pub fn is_meta(&self) -> bool {
        matches!(self, Record::Metadata(_) | Record::Sources(_))
    }

    /// The record as a JSON value, suitable for verbatim output.
    pub fn to_value(&self) -> Value {
        match self {
            Record::Metadata(r) => Value::Object(r.0.clone()),
            Record::Sources(r) => Value::Object(r.0.clone()),
            Record::Classification(r) => r.to_value(),
        }
    }
}

/// A metadata record: describes what each classification field name means.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataRecord(pub(crate) Map<String, Value>);

impl MetadataRecord {
    /// The `metadata` mapping, if its value actually is a mapping.
    pub fn metadata(&self) -> Option<&Map<String, Value>> {
        self.0.get("metadata").and_then(Value::as_object)
    }
}

/// A sources record: the citations the table was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct SourcesRecord(pub(crate) Map<String, Value>);

impl SourcesRecord {
    /// The `sources` sequence, if its value actually is a sequence.
    pub fn sources(&self) -> Option<&Vec<Value>> {
        self.0.get("sources").and_then(Value::as_array)
    }
}

/// A classification record: a `regex` pattern plus an open mapping of
/// classification fields.
///
/// A `regex` key whose value is not a string is kept among the open fields;
/// such a record never participates in matching.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationRecord {
    regex: Option<String>,
    fields: Map<String, Value>,
}

impl ClassificationRecord {
    /// Split a JSON object into the pattern and the remaining open fields.
    pub fn from_object(object: Map<String, Value>) -> Self {
        let mut regex = None;
        let mut fields = Map::new();
        for (key, value) in object {
            if key == "regex" {
                if let Value::String(pattern) = value {
                    regex = Some(pattern);
                    continue;
                }
            }
            fields.insert(key, value);
        }
        Self { regex, fields }
    }

    /// The raw pattern string, if the record carries one.
    pub fn regex(&self) -> Option<&str> {
        self.regex.as_deref()
    }

    /// Whether the record defines `name` as a key (any value type counts,
    /// including the `regex` key itself).
    pub fn contains_field(&self, name: &str) -> bool {
        if name == "regex" && self.regex.is_some() {
            return true;
        }
        self.fields.contains_key(name)
    }

    /// The value of a classification field, if present.
    pub fn field(&self, name: &str) -> Option<Value> {
        if name == "regex" {
            if let Some(pattern) = &self.regex {
                return Some(Value::String(pattern.clone()));
            }
        }
        self.fields.get(name).cloned()
    }

    /// The record as a JSON value, suitable for verbatim output.
    pub fn to_value(&self) -> Value {
        let mut object = Map::new();
        if let Some(pattern) = &self.regex {
            object.insert("regex".to_string(), Value::String(pattern.clone()));
        }
        for (key, value) in &self.fields {
            object.insert(key.clone(), value.clone());
        }
        Value::Object(object)
    }
}

// =============================================================================
// Conversion Payloads
// =============================================================================

/// Input text for a conversion: absent, a single token, or a sequence of
/// tokens. The conversion result mirrors this shape.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextInput {
    /// No input at all; conversion yields an empty sequence.
    #[default]
    None,
    /// One token; conversion yields one value.
    One(String),
    /// A sequence of tokens; conversion yields a same-length sequence.
    Many(Vec<String>),
}

impl TextInput {
    /// Build from a JSON value: `null`, a string, or an array of strings.
    /// Anything else is a bad input shape.
    pub fn from_value(value: &Value) -> Result<Self, ConvertError> {
        match value {
            Value::Null => Ok(TextInput::None),
            Value::String(s) => Ok(TextInput::One(s.clone())),
            Value::Array(items) => {
                let mut texts = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::String(s) => texts.push(s.clone()),
                        other => {
                            return Err(ConvertError::BadInputShape(format!(
                                "sequence item is not a string: {other}"
                            )))
                        }
                    }
                }
                Ok(TextInput::Many(texts))
            }
            other => Err(ConvertError::BadInputShape(format!(
                "unsupported input: {other}"
            ))),
        }
    }
}

impl From<&str> for TextInput {
    fn from(text: &str) -> Self {
        TextInput::One(text.to_string())
    }
}

impl From<Vec<String>> for TextInput {
    fn from(texts: Vec<String>) -> Self {
        TextInput::Many(texts)
    }
}

/// Conversion output, mirroring the input shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TextOutput {
    /// Result of a single-token input.
    One(String),
    /// Result of a sequence input (or the empty sequence for no input).
    Many(Vec<String>),
}

impl TextOutput {
    /// The single value, if the output is single-shaped.
    pub fn as_one(&self) -> Option<&str> {
        match self {
            TextOutput::One(s) => Some(s),
            TextOutput::Many(_) => None,
        }
    }

    /// The output as a flat list of lines, whatever its shape.
    pub fn lines(&self) -> Vec<&str> {
        match self {
            TextOutput::One(s) => vec![s.as_str()],
            TextOutput::Many(items) => items.iter().map(String::as_str).collect(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_partition_by_key_presence() {
        let metadata = Record::from_object(object(json!({"metadata": {"iso3": "alpha-3"}})));
        assert!(matches!(metadata, Record::Metadata(_)));

        let sources = Record::from_object(object(json!({"sources": ["ISO 3166"]})));
        assert!(matches!(sources, Record::Sources(_)));

        let classification =
            Record::from_object(object(json!({"regex": "^x$", "iso3": "XXX"})));
        assert!(matches!(classification, Record::Classification(_)));
    }

    #[test]
    fn test_key_presence_wins_over_value_type() {
        // A bogus metadata value still makes a metadata record.
        let record = Record::from_object(object(json!({"metadata": "not a mapping"})));
        match &record {
            Record::Metadata(m) => assert!(m.metadata().is_none()),
            other => panic!("expected metadata record, got {other:?}"),
        }
        assert!(record.is_meta());
    }

    #[test]
    fn test_non_string_regex_stays_in_fields() {
        let record = ClassificationRecord::from_object(object(json!({"regex": 42, "iso3": "XXX"})));
        assert!(record.regex().is_none());
        assert!(record.contains_field("regex"));
        assert_eq!(record.field("regex"), Some(json!(42)));
    }

    #[test]
    fn test_regex_is_addressable_as_a_field() {
        let record =
            ClassificationRecord::from_object(object(json!({"regex": "^afg$", "iso3": "AFG"})));
        assert!(record.contains_field("regex"));
        assert_eq!(record.field("regex"), Some(json!("^afg$")));
        assert_eq!(record.field("iso3"), Some(json!("AFG")));
        assert_eq!(record.field("iso2"), None);
    }

    #[test]
    fn test_record_round_trips_to_value() {
        let raw = json!({"regex": "^cze$", "iso3": "CZE", "name_en": "Czechia"});
        let record = Record::from_object(object(raw.clone()));
        assert_eq!(record.to_value(), raw);
    }

    #[test]
    fn test_text_input_from_value() {
        assert_eq!(TextInput::from_value(&json!(null)).unwrap(), TextInput::None);
        assert_eq!(
            TextInput::from_value(&json!("AFG")).unwrap(),
            TextInput::One("AFG".into())
        );
        assert_eq!(
            TextInput::from_value(&json!(["a", "b"])).unwrap(),
            TextInput::Many(vec!["a".into(), "b".into()])
        );
    }

    #[test]
    fn test_text_input_bad_shapes() {
        assert!(TextInput::from_value(&json!(42)).is_err());
        assert!(TextInput::from_value(&json!({"text": "AFG"})).is_err());
        assert!(TextInput::from_value(&json!(["a", 1])).is_err());
    }

    #[test]
    fn test_text_output_lines() {
        let one = TextOutput::One("AFG".into());
        assert_eq!(one.as_one(), Some("AFG"));
        assert_eq!(one.lines(), vec!["AFG"]);

        let many = TextOutput::Many(vec!["AFG".into(), "CZE".into()]);
        assert_eq!(many.as_one(), None);
        assert_eq!(many.lines(), vec!["AFG", "CZE"]);
    }
}
