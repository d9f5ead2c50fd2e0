//! Parse a benchmark log into [`Benchmark`]s.
//!
//! Required sample arrays are reduced to their trimmed mean here; counters
//! and per-CPU times are kept raw for the field registry.

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::config::IngestConfig;
use crate::error::{ReportError, Result};
use crate::model::{Benchmark, Measurement};
use crate::schema::{RawBenchmark, RawMeasurement};
use crate::stats;

/// Ingest a log held in memory.
///
/// Entries appear in log key order. Any missing required key aborts the
/// whole ingestion.
pub fn ingest_str(json: &str, cfg: &IngestConfig) -> Result<Vec<Benchmark>> {
    let root: Value = serde_json::from_str(json)?;
    let Value::Object(entries) = root else {
        return Err(ReportError::InvalidLog {
            benchmark: "<root>".to_string(),
            reason: "top level must be an object".to_string(),
        });
    };
    ingest_entries(entries, cfg)
}

pub fn ingest_file(path: &Path, cfg: &IngestConfig) -> Result<Vec<Benchmark>> {
    let json = std::fs::read_to_string(path).map_err(|e| ReportError::io(path, e))?;
    ingest_str(&json, cfg)
}

fn ingest_entries(entries: Map<String, Value>, cfg: &IngestConfig) -> Result<Vec<Benchmark>> {
    let mut benchmarks = Vec::new();
    for (key, value) in entries {
        if let Some(b) = ingest_benchmark(&key, value, cfg)? {
            debug!(benchmark = %key, libs = b.libs.len(), "ingested benchmark");
            benchmarks.push(b);
        }
    }
    Ok(benchmarks)
}

fn ingest_benchmark(key: &str, value: Value, cfg: &IngestConfig) -> Result<Option<Benchmark>> {
    let raw: RawBenchmark = serde_json::from_value(value).map_err(|e| invalid(key, e))?;

    let threads = raw.threads.ok_or_else(|| ReportError::missing(key, "threads"))?;
    if let Some(wanted) = cfg.thread_filter {
        if threads != wanted {
            info!(benchmark = %key, threads, wanted, "skipping benchmark");
            return Ok(None);
        }
    }

    let args = raw.args.ok_or_else(|| ReportError::missing(key, "args"))?;
    let libs = raw.libs.ok_or_else(|| ReportError::missing(key, "libs"))?;

    let mut measurements = Vec::with_capacity(libs.len());
    for (lib, value) in libs {
        let raw: RawMeasurement = serde_json::from_value(value).map_err(|e| invalid(key, e))?;
        measurements.push(ingest_measurement(key, lib, &raw, cfg)?);
    }

    Ok(Some(Benchmark {
        key: key.to_string(),
        name: benchmark_name(key, cfg.name_separator),
        threads,
        args: args.iter().map(display_arg).collect(),
        libs: measurements,
    }))
}

fn ingest_measurement(
    key: &str,
    name: String,
    raw: &RawMeasurement,
    cfg: &IngestConfig,
) -> Result<Measurement> {
    let mut aggregated = [0.0; RawMeasurement::REQUIRED.len()];
    for (slot, field) in aggregated.iter_mut().zip(RawMeasurement::REQUIRED) {
        let samples = raw
            .required(field)
            .ok_or_else(|| ReportError::missing(key, field))?;
        *slot = stats::trimmed_mean(samples).map_err(|source| ReportError::Sample {
            benchmark: key.to_string(),
            field: field.to_string(),
            source,
        })?;
    }
    let [compressed, log_size, system_time, user_time, wall_time] = aggregated;

    let perf_counters: BTreeMap<String, Vec<f64>> = cfg
        .perf_events
        .iter()
        .filter_map(|event| Some((event.clone(), raw.counter(event)?)))
        .collect();

    Ok(Measurement {
        name,
        wall_time,
        system_time_ticks: system_time,
        user_time_ticks: user_time,
        log_size_bytes: log_size,
        compressed_log_size_bytes: compressed,
        perf_counters,
        time_per_cpu: raw.time_per_cpu.clone().unwrap_or_default(),
    })
}

fn invalid(key: &str, err: serde_json::Error) -> ReportError {
    ReportError::InvalidLog {
        benchmark: key.to_string(),
        reason: err.to_string(),
    }
}

fn benchmark_name(key: &str, separator: Option<char>) -> String {
    match separator {
        Some(sep) => key.split(sep).next().unwrap_or(key).to_string(),
        None => key.to_string(),
    }
}

/// String arguments are shown by file name only; anything else as JSON text.
fn display_arg(arg: &Value) -> String {
    match arg {
        Value::String(s) => Path::new(s)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| s.clone()),
        other => other.to_string(),
    }
}
