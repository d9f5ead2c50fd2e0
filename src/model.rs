use std::collections::BTreeMap;

use crate::stats::{self, StatsError};

/// One workload and the results of every library it was run against.
#[derive(Debug, Clone, PartialEq)]
pub struct Benchmark {
    /// Key of the entry in the log, e.g. `blackscholes-16`.
    pub key: String,
    /// Display name, `key` truncated at the configured separator.
    pub name: String,
    pub threads: u64,
    /// Invocation arguments; paths reduced to their base name.
    pub args: Vec<String>,
    /// In log key order.
    pub libs: Vec<Measurement>,
}

/// Aggregated results for one library within a [`Benchmark`].
///
/// Scalar fields hold the trimmed mean over runs. Counters and per-CPU times
/// keep their raw samples because different columns need different
/// statistics of them.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub name: String,
    pub wall_time: f64,
    pub system_time_ticks: f64,
    pub user_time_ticks: f64,
    pub log_size_bytes: f64,
    pub compressed_log_size_bytes: f64,
    pub perf_counters: BTreeMap<String, Vec<f64>>,
    pub time_per_cpu: Vec<Vec<f64>>,
}

impl Measurement {
    /// Trimmed mean of a hardware counter's samples.
    pub fn counter_mean(&self, event: &str) -> Option<f64> {
        let samples = self.perf_counters.get(event)?;
        stats::trimmed_mean(samples).ok()
    }

    /// Total CPU time per run (sum over cores), trimmed-mean over runs, in ns.
    pub fn cpu_time_ns(&self) -> Result<f64, StatsError> {
        let totals: Vec<f64> = self
            .time_per_cpu
            .iter()
            .map(|run| run.iter().sum())
            .collect();
        stats::trimmed_mean(&totals)
    }

    /// Standard deviation across cores per run, trimmed-mean over runs, in ns.
    pub fn cpu_time_deviation_ns(&self) -> Result<f64, StatsError> {
        let deviations = self
            .time_per_cpu
            .iter()
            .map(|run| stats::standard_deviation(run))
            .collect::<Result<Vec<f64>, _>>()?;
        stats::trimmed_mean(&deviations)
    }

    pub fn compression_ratio(&self) -> f64 {
        self.log_size_bytes / self.compressed_log_size_bytes
    }
}
