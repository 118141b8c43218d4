//! First-match-wins pattern matching over classification records.
//!
//! Patterns are compiled once per conversion call and discarded afterwards;
//! nothing is cached across calls.

use regex::{Regex, RegexBuilder};
use serde_json::Value;

use crate::models::ClassificationRecord;

/// A record whose pattern failed to compile and was therefore skipped.
///
/// Skipping is deliberate graceful degradation: one broken pattern must not
/// abort the whole conversion. The skip is recorded here so callers can
/// surface it as a diagnostic instead of it disappearing silently.
#[derive(Debug, Clone)]
pub struct SkippedPattern {
    /// Index of the record among the classification records.
    pub index: usize,
    /// The pattern that failed to compile.
    pub pattern: String,
    /// The compiler's error message.
    pub reason: String,
}

struct CompiledEntry<'a> {
    pattern: Regex,
    record: &'a ClassificationRecord,
}

/// The patterns applicable to one conversion call, in table order.
pub struct PatternSet<'a> {
    entries: Vec<CompiledEntry<'a>>,
    skipped: Vec<SkippedPattern>,
    to: String,
}

impl<'a> PatternSet<'a> {
    /// Compile every record that defines both a non-empty `regex` string and
    /// the target field as a key (any value type counts). Patterns compile
    /// case-insensitive and multi-line. Records whose pattern fails to
    /// compile are recorded in [`skipped`] and never participate in matching.
    ///
    /// [`skipped`]: PatternSet::skipped
    pub fn compile(records: &'a [ClassificationRecord], to: &str) -> Self {
        let mut entries = Vec::new();
        let mut skipped = Vec::new();

        for (index, record) in records.iter().enumerate() {
            let Some(pattern) = record.regex().filter(|p| !p.is_empty()) else {
                continue;
            };
            if !record.contains_field(to) {
                continue;
            }
            match RegexBuilder::new(pattern)
                .case_insensitive(true)
                .multi_line(true)
                .build()
            {
                Ok(compiled) => entries.push(CompiledEntry {
                    pattern: compiled,
                    record,
                }),
                Err(e) => skipped.push(SkippedPattern {
                    index,
                    pattern: pattern.to_string(),
                    reason: e.to_string(),
                }),
            }
        }

        Self {
            entries,
            skipped,
            to: to.to_string(),
        }
    }

    /// True when no record both defines the target field and compiles.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Records that were skipped because their pattern failed to compile.
    pub fn skipped(&self) -> &[SkippedPattern] {
        &self.skipped
    }

    /// Convert one token.
    ///
    /// The first record (in table order) whose pattern matches any substring
    /// of `text` wins. A target value that is explicitly `null` means "no
    /// conversion" and returns the original token; so does no match at all.
    /// The token is returned untrimmed in both fallback cases.
    pub fn convert_one(&self, text: &str) -> String {
        for entry in &self.entries {
            if entry.pattern.is_match(text) {
                return match entry.record.field(&self.to) {
                    None | Some(Value::Null) => text.to_string(),
                    Some(Value::String(converted)) => converted,
                    Some(other) => other.to_string(),
                };
            }
        }
        text.to_string()
    }

    /// Convert a sequence of tokens, one output per input, in order.
    pub fn convert_many<I, S>(&self, texts: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        texts
            .into_iter()
            .map(|text| self.convert_one(text.as_ref()))
            .collect()
    }
}
