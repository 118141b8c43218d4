//! # convertu - text-to-classification conversion
//!
//! Converts free-form text tokens (country names, codes, abbreviations) into
//! a target classification field by matching each token against an ordered
//! table of regular-expression patterns. The bundled table covers ISO 3166-1
//! (`name_en`, `name_fr`, `iso3`, `iso2`, `isoN`).
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐     ┌─────────────┐
//! │ Table JSON  │────▶│    Loader    │────▶│   Matcher    │────▶│  Converted  │
//! │ (bundled or │     │ (partition + │     │ (first match │     │   text(s)   │
//! │  caller's)  │     │  validate)   │     │    wins)     │     │             │
//! └─────────────┘     └──────────────┘     └──────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use convertu::{cconv, ConvertRequest, Outcome};
//!
//! let request = ConvertRequest {
//!     to: "iso3".into(),
//!     text: vec!["Czech Republic".to_string(), "af".to_string()].into(),
//!     ..ConvertRequest::default()
//! };
//! let outcome = cconv(request)?; // Converted(["CZE", "AFG"])
//! ```
//!
//! ## Modules
//!
//! - [`error`] - hierarchical error types
//! - [`models`] - record union and conversion payloads
//! - [`table`] - table loading, partitioning, persistence
//! - [`validation`] - shape and invariant checks
//! - [`convert`] - pattern matching and the [`cconv`] entry point

// Core modules
pub mod error;
pub mod models;

// Table loading
pub mod table;

// Validation
pub mod validation;

// Matching and conversion
pub mod convert;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    ConvertError, ConvertResult, ConvertuError, ConvertuResult, TableError, TableResult,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    ClassificationRecord, MetadataRecord, Record, SourcesRecord, TextInput, TextOutput,
};

// =============================================================================
// Re-exports - Table
// =============================================================================

pub use table::{load_document, persist, resolve_source, Table, SOURCE_ENV};

// =============================================================================
// Re-exports - Validation
// =============================================================================

pub use validation::{is_valid, validate, validate_invariants, validate_table_shape};

// =============================================================================
// Re-exports - Conversion
// =============================================================================

pub use convert::{cconv, ConvertRequest, Outcome, PatternSet, SkippedPattern};
