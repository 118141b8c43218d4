//! Matching and conversion.
//!
//! - [`matcher`] - compiled pattern set, first-match-wins conversion
//! - [`pipeline`] - the [`cconv`] entry point over a loaded table

pub mod matcher;
pub mod pipeline;

pub use matcher::{PatternSet, SkippedPattern};
pub use pipeline::{cconv, ConvertRequest, Outcome};
