//! Loader-specific types: errors, configuration and statistics.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading a drug dataset.
#[derive(Error, Debug)]
pub enum DrugLoadError {
    /// I/O error reading the dataset.
    #[error("IO error reading drug dataset: {0}")]
    Io(#[from] std::io::Error),

    /// File not found.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found.
        path: String,
    },

    /// No dataset file in a directory.
    #[error("No drug dataset file found in {directory}")]
    DatasetMissing {
        /// The directory that was searched.
        directory: String,
    },

    /// A record could not be parsed.
    #[error("Malformed record on line {line}: {error}")]
    Malformed {
        /// 1-based line number in the source, header included.
        line: usize,
        /// What was wrong with the record.
        error: MalformedRecord,
    },

    /// Two records share an identifier and duplicates are rejected.
    #[error("Duplicate drug identifier {id} on line {line}")]
    DuplicateId {
        /// The repeated identifier.
        id: String,
        /// Line of the second occurrence.
        line: usize,
    },

    /// Invalid configuration value.
    #[error("Invalid value {value:?} for {key}")]
    Config {
        /// Setting name.
        key: String,
        /// Rejected value.
        value: String,
    },
}

/// Structural problems with a single record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedRecord {
    /// The line did not split into the expected number of fields.
    #[error("expected {expected} fields, found {found}")]
    FieldCount {
        /// Expected field count.
        expected: usize,
        /// Found field count.
        found: usize,
    },

    /// A required field is empty.
    #[error("missing value for field '{field}'")]
    MissingField {
        /// Name of the field.
        field: &'static str,
    },

    /// A drug interaction entry did not have exactly three parts.
    #[error("field '{field}': interaction entry {entry:?} has {parts} part(s), expected 3")]
    InteractionEntry {
        /// Name of the field holding the entry.
        field: &'static str,
        /// The raw entry.
        entry: String,
        /// Number of parts found.
        parts: usize,
    },

    /// A drug interaction entry has an empty identifier.
    #[error("field '{field}': interaction entry {entry:?} has no drug identifier")]
    MissingInteractionId {
        /// Name of the field holding the entry.
        field: &'static str,
        /// The raw entry.
        entry: String,
    },

    /// The line is not valid UTF-8.
    #[error("line is not valid UTF-8 (invalid byte at offset {valid_up_to})")]
    InvalidEncoding {
        /// Length of the valid UTF-8 prefix.
        valid_up_to: usize,
    },
}

impl MalformedRecord {
    /// Attaches a line number, producing a load error.
    pub fn at_line(self, line: usize) -> DrugLoadError {
        DrugLoadError::Malformed { line, error: self }
    }
}

/// Result type for loader operations.
pub type DrugResult<T> = Result<T, DrugLoadError>;

/// What to do with a line that cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MalformedPolicy {
    /// Fail the whole load on the first malformed line.
    #[default]
    Abort,
    /// Log the line, count it and continue.
    Skip,
}

/// What to do with a record whose identifier is already loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Keep the first record and drop later ones whole.
    #[default]
    KeepFirst,
    /// Fail the load.
    Reject,
}

/// Configuration for loading a drug dataset.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadConfig {
    /// Handling of malformed lines.
    pub malformed: MalformedPolicy,
    /// Handling of repeated identifiers.
    pub duplicates: DuplicatePolicy,
}

impl LoadConfig {
    /// Fails on malformed lines and on duplicate identifiers.
    pub fn strict() -> Self {
        Self {
            malformed: MalformedPolicy::Abort,
            duplicates: DuplicatePolicy::Reject,
        }
    }

    /// Skips malformed lines and keeps the first of any duplicates.
    pub fn lenient() -> Self {
        Self {
            malformed: MalformedPolicy::Skip,
            duplicates: DuplicatePolicy::KeepFirst,
        }
    }
}

/// Outcome of a resolution pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveStats {
    /// References linked to a loaded drug.
    pub resolved: usize,
    /// References whose target is not in the collection.
    pub dangling: usize,
}

/// Statistics from loading a dataset.
#[derive(Debug, Clone, Default)]
pub struct LoadStats {
    /// Records read, header and blank lines excluded.
    pub total_records: usize,
    /// Records added to the store.
    pub loaded_records: usize,
    /// Records skipped because they could not be parsed.
    pub malformed_records: usize,
    /// Records dropped because their identifier was already loaded.
    pub duplicate_records: usize,
    /// Result of the resolution pass.
    pub resolve: ResolveStats,
    /// Time taken for both phases in milliseconds.
    pub load_time_ms: u64,
}

impl LoadStats {
    /// Returns the percentage of records that were loaded.
    pub fn success_rate(&self) -> f64 {
        if self.total_records == 0 {
            0.0
        } else {
            (self.loaded_records as f64 / self.total_records as f64) * 100.0
        }
    }
}

impl fmt::Display for LoadStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} records loaded ({} malformed, {} duplicate), {} interactions resolved, {} dangling, {} ms",
            self.loaded_records,
            self.total_records,
            self.malformed_records,
            self.duplicate_records,
            self.resolve.resolved,
            self.resolve.dangling,
            self.load_time_ms
        )
    }
}

/// A located dataset file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetFile {
    /// Path to the dataset.
    pub path: PathBuf,
    /// Release date from the file name (YYYYMMDD), if it follows the convention.
    pub release_date: Option<String>,
    /// Drug count declared in the file name, if any.
    pub declared_count: Option<usize>,
    /// File size in bytes.
    pub size_bytes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_config_default() {
        let config = LoadConfig::default();
        assert_eq!(config.malformed, MalformedPolicy::Abort);
        assert_eq!(config.duplicates, DuplicatePolicy::KeepFirst);
    }

    #[test]
    fn test_load_config_presets() {
        let strict = LoadConfig::strict();
        assert_eq!(strict.duplicates, DuplicatePolicy::Reject);

        let lenient = LoadConfig::lenient();
        assert_eq!(lenient.malformed, MalformedPolicy::Skip);
    }

    #[test]
    fn test_load_stats_success_rate() {
        let stats = LoadStats {
            total_records: 8,
            loaded_records: 6,
            ..Default::default()
        };
        assert!((stats.success_rate() - 75.0).abs() < 0.01);
        assert_eq!(LoadStats::default().success_rate(), 0.0);
    }

    #[test]
    fn test_malformed_error_message() {
        let err = MalformedRecord::FieldCount {
            expected: 15,
            found: 3,
        }
        .at_line(4);
        assert_eq!(
            err.to_string(),
            "Malformed record on line 4: expected 15 fields, found 3"
        );
    }

    #[test]
    fn test_interaction_error_names_field() {
        let err = MalformedRecord::MissingInteractionId {
            field: "drug_interactions",
            entry: "@@Lepirudin@@desc".to_string(),
        }
        .at_line(7);
        assert_eq!(
            err.to_string(),
            "Malformed record on line 7: field 'drug_interactions': \
             interaction entry \"@@Lepirudin@@desc\" has no drug identifier"
        );
    }

    #[test]
    fn test_invalid_encoding_message() {
        let err = MalformedRecord::InvalidEncoding { valid_up_to: 12 }.at_line(3);
        assert_eq!(
            err.to_string(),
            "Malformed record on line 3: line is not valid UTF-8 (invalid byte at offset 12)"
        );
    }
}
