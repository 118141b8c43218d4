//! Classification table loading, partitioning, and persistence.
//!
//! A table is loaded fresh on every invocation and is immutable after load.
//! Loading always computes the partition into classification records and
//! metadata/sources records; the cardinality invariants are the caller's
//! concern (see [`crate::validation`]) because info/dump modes short-circuit
//! before classification logic runs.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::{TableError, TableResult};
use crate::models::{ClassificationRecord, Record};
use crate::validation;

/// The bundled default table (ISO 3166-1), embedded at compile time.
const BUNDLED_TABLE: &str = include_str!("../../data/classification.json");

/// Label used for the bundled table in diagnostics.
const BUNDLED_LABEL: &str = "<bundled classification.json>";

/// Environment variable overriding the default table path.
pub const SOURCE_ENV: &str = "CCONV_SOURCE";

/// Resolve the table source: an explicit path wins, then [`SOURCE_ENV`],
/// then `None` for the bundled default.
pub fn resolve_source(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    env::var_os(SOURCE_ENV).map(PathBuf::from)
}

/// Load and shape-check a table document from `source`, or the bundled
/// default when `source` is `None`.
pub fn load_document(source: Option<&Path>) -> TableResult<Vec<Value>> {
    match source {
        Some(path) => {
            if !path.is_file() {
                return Err(TableError::NotFound {
                    path: path.to_path_buf(),
                });
            }
            let label = path.display().to_string();
            let content = fs::read_to_string(path).map_err(|e| TableError::Read {
                path: label.clone(),
                source: e,
            })?;
            parse_document(&content, &label)
        }
        None => parse_document(BUNDLED_TABLE, BUNDLED_LABEL),
    }
}

/// Shape-check an in-memory table value and return its records.
pub fn document_from_value(data: Value) -> TableResult<Vec<Value>> {
    validation::validate_table_shape(&data)?;
    match data {
        Value::Array(records) => Ok(records),
        _ => Err(TableError::Structural(
            "top-level JSON value must be an array of records".into(),
        )),
    }
}

fn parse_document(content: &str, label: &str) -> TableResult<Vec<Value>> {
    let doc: Value = serde_json::from_str(content).map_err(|e| TableError::Malformed {
        path: label.to_string(),
        source: e,
    })?;
    document_from_value(doc)
}

/// Persist a table document to `path` as pretty-printed UTF-8 JSON,
/// overwriting any existing file. Non-ASCII characters are preserved.
pub fn persist(doc: &[Value], path: &Path) -> TableResult<()> {
    let label = path.display().to_string();
    let content = serde_json::to_string_pretty(doc).map_err(|e| TableError::Write {
        path: label.clone(),
        source: std::io::Error::other(e),
    })?;
    fs::write(path, content).map_err(|e| TableError::Write {
        path: label,
        source: e,
    })
}

/// A loaded table, partitioned once into classification records and
/// metadata/sources records. Record order is preserved in both partitions;
/// it is the match priority.
#[derive(Debug, Clone, Default)]
pub struct Table {
    classification: Vec<ClassificationRecord>,
    meta: Vec<Record>,
}

impl Table {
    /// Partition a shape-checked document by record kind.
    pub fn partition(doc: &[Value]) -> Self {
        let mut classification = Vec::new();
        let mut meta = Vec::new();
        for object in doc.iter().filter_map(Value::as_object) {
            match Record::from_object(object.clone()) {
                Record::Classification(record) => classification.push(record),
                record => meta.push(record),
            }
        }
        Self {
            classification,
            meta,
        }
    }

    /// The classification records, in table order.
    pub fn classification(&self) -> &[ClassificationRecord] {
        &self.classification
    }

    /// The metadata and sources records, in table order.
    pub fn meta(&self) -> &[Record] {
        &self.meta
    }

    /// Classification records as verbatim JSON values (dump mode).
    pub fn classification_values(&self) -> Vec<Value> {
        self.classification
            .iter()
            .map(ClassificationRecord::to_value)
            .collect()
    }

    /// Metadata/sources records as verbatim JSON values (info mode).
    pub fn meta_values(&self) -> Vec<Value> {
        self.meta.iter().map(Record::to_value).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bundled_table_loads_and_validates() {
        let doc = load_document(None).unwrap();
        validation::validate_invariants(&doc).unwrap();

        let table = Table::partition(&doc);
        assert!(table.classification().len() > 200);
        assert_eq!(table.meta().len(), 2);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let err = load_document(Some(Path::new("/no/such/table.json"))).unwrap_err();
        match err {
            TableError::NotFound { path } => {
                assert_eq!(path, PathBuf::from("/no/such/table.json"))
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "[{\"regex\": ").unwrap();

        let err = load_document(Some(&path)).unwrap_err();
        match err {
            TableError::Malformed { path: label, .. } => {
                assert!(label.contains("broken.json"))
            }
            other => panic!("expected Malformed, got {other:?}"),
        }
    }

    #[test]
    fn test_non_array_top_level_is_structural() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("object.json");
        fs::write(&path, "{\"regex\": \"^x$\"}").unwrap();

        let err = load_document(Some(&path)).unwrap_err();
        assert!(matches!(err, TableError::Structural(_)));
    }

    #[test]
    fn test_partition_preserves_order() {
        let doc = vec![
            json!({"metadata": {"iso3": "alpha-3 code"}}),
            json!({"regex": "^a$", "iso3": "AAA"}),
            json!({"regex": "^b$", "iso3": "BBB"}),
            json!({"sources": ["ISO 3166"]}),
        ];
        let table = Table::partition(&doc);

        let iso3: Vec<Value> = table
            .classification()
            .iter()
            .map(|r| r.field("iso3").unwrap())
            .collect();
        assert_eq!(iso3, vec![json!("AAA"), json!("BBB")]);

        assert!(matches!(table.meta()[0], Record::Metadata(_)));
        assert!(matches!(table.meta()[1], Record::Sources(_)));
    }

    #[test]
    fn test_persist_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.json");
        let doc = vec![
            json!({"regex": "^(côte d'ivoire|civ)$", "iso3": "CIV", "name_fr": "Côte d'Ivoire (la)"}),
            json!({"metadata": {"iso3": "alpha-3 code"}}),
            json!({"sources": ["ISO 3166"]}),
        ];

        persist(&doc, &path).unwrap();
        let reloaded = load_document(Some(&path)).unwrap();
        assert_eq!(reloaded, doc);

        // non-ASCII characters are preserved, not escaped
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("Côte d'Ivoire"));
        assert!(!raw.contains("\\u00e9"));
    }

    #[test]
    fn test_persist_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.json");
        fs::write(&path, "stale content").unwrap();

        let doc = vec![json!({"regex": "^x$", "iso3": "XXX"})];
        persist(&doc, &path).unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("XXX"));
    }

    #[test]
    fn test_persist_write_failure_is_io() {
        let doc = vec![json!({"regex": "^x$"})];
        let err = persist(&doc, Path::new("/no/such/dir/table.json")).unwrap_err();
        match err {
            TableError::Write { path, .. } => assert!(path.contains("table.json")),
            other => panic!("expected Write, got {other:?}"),
        }
    }

    #[test]
    fn test_explicit_source_wins_over_default() {
        assert_eq!(
            resolve_source(Some(Path::new("/tmp/custom.json"))),
            Some(PathBuf::from("/tmp/custom.json"))
        );
    }
}
