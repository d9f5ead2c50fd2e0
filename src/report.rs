//! The whole pipeline: log file in, rendered table out.

use std::path::Path;

use tracing::info;

use crate::config::ReportConfig;
use crate::error::Result;
use crate::fields::FieldRegistry;
use crate::ingest;
use crate::model::Benchmark;
use crate::render::TableTemplate;
use crate::rows::{self, RowOptions, Table};

/// What a finished run produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportSummary {
    pub benchmarks: usize,
    pub columns: usize,
}

/// Build the table for already-ingested benchmarks.
pub fn build_table(benchmarks: &[Benchmark], cfg: &ReportConfig) -> Table {
    let registry = FieldRegistry::for_format(cfg.format, &cfg.ingest.perf_events);
    let opts = RowOptions {
        format: cfg.format,
        number_style: cfg.number_style,
        clock_ticks_per_sec: cfg.clock_ticks_per_sec,
    };
    rows::assemble(benchmarks, &registry, &opts)
}

/// Render a log held in memory to document text.
pub fn render_str(json: &str, cfg: &ReportConfig) -> Result<String> {
    let benchmarks = ingest::ingest_str(json, &cfg.ingest)?;
    let table = build_table(&benchmarks, cfg);
    TableTemplate::for_format(cfg.format)?.render(&table.to_rows())
}

pub fn generate(log_path: &Path, out_path: &Path, cfg: &ReportConfig) -> Result<ReportSummary> {
    let benchmarks = ingest::ingest_file(log_path, &cfg.ingest)?;
    let table = build_table(&benchmarks, cfg);

    TableTemplate::for_format(cfg.format)?.write(out_path, &table.to_rows())?;

    let summary = ReportSummary {
        benchmarks: table.rows.len(),
        columns: table.header.len(),
    };
    info!(
        path = %out_path.display(),
        format = cfg.format.as_str(),
        benchmarks = summary.benchmarks,
        columns = summary.columns,
        "wrote report"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IngestConfig;
    use crate::stats::NumberStyle;
    use crate::{OutputFormat, ReportError};
    use serde_json::json;
    use tempfile::tempdir;

    fn config(format: OutputFormat) -> ReportConfig {
        ReportConfig {
            format,
            number_style: NumberStyle::Tiered,
            ingest: IngestConfig::default(),
            clock_ticks_per_sec: 100.0,
        }
    }

    fn lib(scale: f64) -> serde_json::Value {
        json!({
            "compressed_logsizes": [1e6 * scale, 2e6 * scale, 3e6 * scale],
            "log_sizes": [1e7 * scale, 2e7 * scale, 3e7 * scale],
            "system_time": [10, 20, 30],
            "user_time": [100, 200, 300],
            "times": [1.0 * scale, 2.0 * scale, 3.0 * scale],
            "branch-instructions": [1e8, 2e8, 3e8],
            "time_per_cpu": [[1e9, 1e9], [2e9, 2e9], [3e9, 3e9]],
        })
    }

    fn log() -> String {
        json!({
            "word_count-16": {
                "threads": 16,
                "args": ["/inputs/word_100MB.txt"],
                "libs": {
                    "inspector": lib(4.0),
                    "tthread": lib(2.0),
                    "pt": lib(3.0),
                    "pthread": lib(1.0),
                }
            }
        })
        .to_string()
    }

    #[test]
    fn test_markup_table_matches_registry() {
        let cfg = config(OutputFormat::Html);
        let benchmarks = ingest::ingest_str(&log(), &cfg.ingest).unwrap();
        let table = build_table(&benchmarks, &cfg);

        let registry = FieldRegistry::for_format(OutputFormat::Html, &cfg.ingest.perf_events);
        let mut expected = vec!["Name".to_string(), "Options".to_string()];
        expected.extend(registry.names().map(str::to_string));
        assert_eq!(table.header, expected);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].len(), table.header.len());
    }

    #[test]
    fn test_render_latex_uses_total_overheads() {
        let tex = render_str(&log(), &config(OutputFormat::Latex)).unwrap();
        // inspector has 4x the wall time of pthread: 80 MB / 8 s.
        assert!(tex.contains("word\\_c& 80& 8.0 (10x)& 10& 2.50E+07 \\\\"), "{tex}");
    }

    #[test]
    fn test_generate_writes_html() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("log.json");
        let out_path = dir.path().join("site").join("table.html");
        std::fs::write(&log_path, log()).unwrap();

        let summary = generate(&log_path, &out_path, &config(OutputFormat::Html)).unwrap();
        assert_eq!(summary.benchmarks, 1);

        let html = std::fs::read_to_string(&out_path).unwrap();
        assert!(html.contains("<td>word_count</td>"));
        assert!(html.contains("<td>word_100MB.txt</td>"));
        assert!(html.contains("pthread<br>Threading&nbsp;lib.<br>OS&nbsp;support<br>Total&nbsp;overheads"));
    }

    #[test]
    fn test_generate_aborts_without_output_on_missing_field() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("log.json");
        let out_path = dir.path().join("table.html");
        let mut log: serde_json::Value = serde_json::from_str(&log()).unwrap();
        log["word_count-16"]["libs"]["pt"]
            .as_object_mut()
            .unwrap()
            .remove("times");
        std::fs::write(&log_path, log.to_string()).unwrap();

        let err = generate(&log_path, &out_path, &config(OutputFormat::Html)).unwrap_err();
        assert!(matches!(err, ReportError::MissingField { ref field, .. } if field == "times"));
        assert!(!out_path.exists());
    }

    #[test]
    fn test_generate_reports_missing_log() {
        let dir = tempdir().unwrap();
        let err = generate(
            &dir.path().join("absent.json"),
            &dir.path().join("table.tex"),
            &config(OutputFormat::Latex),
        )
        .unwrap_err();
        assert!(matches!(err, ReportError::Io { .. }));
    }
}
