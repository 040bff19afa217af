use thiserror::Error;

use super::model::ColumnKind;

/// Why an uploaded file did not produce a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// File name does not end in `.csv`, `.xls` or `.xlsx`.
    #[error("Unsupported file type: {name} (expected .csv, .xls or .xlsx)")]
    UnsupportedFormat { name: String },

    /// The parser could not interpret the bytes.
    #[error("Error loading file: {message}")]
    ParseFailure { message: String },
}

impl LoadError {
    pub(crate) fn parse(err: &anyhow::Error) -> Self {
        LoadError::ParseFailure {
            message: format!("{err:#}"),
        }
    }
}

/// A numeric-only view was requested but the dataset has no numeric columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("No numeric columns available")]
pub struct EmptyNumericSet;

/// Broken table invariants while assembling a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DatasetError {
    #[error("column '{column}' holds a value that is not {kind} at row {row}")]
    KindMismatch {
        column: String,
        kind: ColumnKind,
        row: usize,
    },

    #[error("column '{column}' has {found} rows, expected {expected}")]
    RaggedColumn {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("duplicate column name '{0}'")]
    DuplicateColumn(String),
}
