//! Custom error types for `stationstats` operations.
//!
//! This module provides structured error handling using `thiserror`, replacing
//! generic `anyhow::Error` with domain-specific error types that preserve context
//! and enable better error messages.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for `stationstats` operations.
///
/// This is the root error type that encompasses all domain-specific errors.
/// It uses `#[error(transparent)]` to delegate display formatting to the
/// underlying error variants.
#[derive(Debug, Error)]
pub enum StationStatsError {
    /// Input table schema errors (missing required columns)
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// I/O errors (file read, path issues)
    #[error(transparent)]
    Io(#[from] IoError),

    /// `DataFusion` query execution errors
    #[error("Query execution failed: {0}")]
    Query(#[from] datafusion::error::DataFusionError),

    /// Generic errors from dependencies
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Input table schema errors.
///
/// These errors occur when a supplied station or trip table lacks a column
/// the checkout transform requires.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A required column was not found in an input table
    #[error("Column '{column}' not found in {table} table. Available columns: {available}")]
    MissingColumn {
        /// The table missing the column ("stations" or "trips")
        table: String,
        /// The required column name
        column: String,
        /// Comma-separated list of columns the table does have
        available: String,
    },
}

/// I/O related errors.
///
/// These errors occur while loading input tables from disk.
#[derive(Debug, Error)]
pub enum IoError {
    /// Failed to read from a file
    #[error("Failed to read {format} file '{path}': {source}")]
    Read {
        /// The format being read (e.g., "CSV")
        format: String,
        /// The file path
        path: PathBuf,
        /// The underlying error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// File was not found
    #[error("File not found: '{path}'")]
    FileNotFound {
        /// The missing file path
        path: PathBuf,
    },
}

/// Type alias for Results using `StationStatsError`.
pub type Result<T> = std::result::Result<T, StationStatsError>;

impl StationStatsError {
    /// Get a user-friendly error message.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Schema(e) => e.user_message(),
            Self::Io(e) => e.user_message(),
            Self::Query(e) => format!("Query error: {e}"),
            Self::Other(e) => format!("Error: {e}"),
        }
    }

    /// Get recovery suggestions if available.
    ///
    /// Returns helpful suggestions on how to fix or work around the error.
    #[must_use]
    pub fn recovery_suggestion(&self) -> Option<String> {
        match self {
            Self::Schema(e) => e.recovery_suggestion(),
            Self::Io(e) => e.recovery_suggestion(),
            _ => None,
        }
    }
}

impl SchemaError {
    fn user_message(&self) -> String {
        match self {
            Self::MissingColumn {
                table,
                column,
                available,
            } => {
                format!(
                    "The {table} table is missing column '{column}'.\n\nAvailable columns:\n{}",
                    available
                        .split(", ")
                        .map(|c| format!("  - {c}"))
                        .collect::<Vec<_>>()
                        .join("\n")
                )
            },
        }
    }

    fn recovery_suggestion(&self) -> Option<String> {
        match self {
            Self::MissingColumn { table, column, .. } => Some(format!(
                "Check that the {table} CSV header names a '{column}' column."
            )),
        }
    }
}

impl IoError {
    fn user_message(&self) -> String {
        match self {
            Self::Read { format, path, .. } => {
                format!("Failed to read {} file: {}", format, path.display())
            },
            Self::FileNotFound { path } => {
                format!("File not found: {}", path.display())
            },
        }
    }

    fn recovery_suggestion(&self) -> Option<String> {
        match self {
            Self::FileNotFound { .. } => {
                Some("Check that the file path is correct and the file exists.".to_string())
            },
            Self::Read { .. } => None,
        }
    }
}

/// Extension trait for adding I/O context to errors.
///
/// This trait provides a convenient method to wrap errors with file and format
/// context, creating more informative error messages.
pub trait IoErrorExt<T> {
    /// Add read context to an error.
    ///
    /// # Errors
    ///
    /// Returns an [`IoError::Read`] if the underlying operation fails.
    fn with_read_context(self, format: &str, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T, E> IoErrorExt<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn with_read_context(self, format: &str, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|e| {
            StationStatsError::Io(IoError::Read {
                format: format.to_string(),
                path: path.into(),
                source: Box::new(e),
            })
        })
    }
}
