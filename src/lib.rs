use std::path::Path;

use clap::ValueEnum;

pub mod config;
pub mod error;
pub mod fields;
pub mod ingest;
pub mod model;
pub mod render;
pub mod report;
pub mod rows;
pub mod schema;
pub mod stats;

pub use error::{ReportError, Result};

/// Document type produced by the report.
#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// Full HTML table with every field and perf counter.
    Html,
    /// Compact LaTeX tabular for print.
    Latex,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Html => "html",
            OutputFormat::Latex => "latex",
        }
    }

    /// Format implied by the output file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("html" | "htm") => Ok(OutputFormat::Html),
            Some("tex") => Ok(OutputFormat::Latex),
            _ => Err(ReportError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            OutputFormat::from_path(Path::new("out/table.html")).unwrap(),
            OutputFormat::Html
        );
        assert_eq!(
            OutputFormat::from_path(Path::new("paper.TEX")).unwrap(),
            OutputFormat::Latex
        );
        assert!(matches!(
            OutputFormat::from_path(Path::new("table.csv")),
            Err(ReportError::UnsupportedFormat { .. })
        ));
        assert!(OutputFormat::from_path(Path::new("table")).is_err());
    }
}
