//! Error types for report generation.
//!
//! The pipeline is all-or-nothing: every variant here aborts the run before
//! the output file is touched.

use std::path::PathBuf;

use crate::stats::StatsError;

/// Result type for report operations
pub type Result<T> = std::result::Result<T, ReportError>;

/// Errors that can occur while turning a benchmark log into a table
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// A required benchmark-level or measurement-level key is absent or empty
    #[error("no {field} found in {benchmark}")]
    MissingField {
        /// Raw benchmark key from the log
        benchmark: String,
        /// Name of the missing key
        field: String,
    },

    /// A required sample array could not be aggregated
    #[error("cannot aggregate {field} in {benchmark}: {source}")]
    Sample {
        benchmark: String,
        field: String,
        #[source]
        source: StatsError,
    },

    /// The log is valid JSON but does not have the expected shape
    #[error("malformed log entry {benchmark}: {reason}")]
    InvalidLog { benchmark: String, reason: String },

    /// The rendering engine rejected the template or its input
    #[error("failed to render template: {0}")]
    TemplateRender(String),

    /// The output path extension matches no known format
    #[error("unsupported output format for {}: expected .html or .tex", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl ReportError {
    pub(crate) fn missing(benchmark: &str, field: &str) -> Self {
        ReportError::MissingField {
            benchmark: benchmark.to_string(),
            field: field.to_string(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ReportError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<minijinja::Error> for ReportError {
    fn from(err: minijinja::Error) -> Self {
        ReportError::TemplateRender(err.to_string())
    }
}
