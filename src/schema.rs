//! Raw shape of a benchmark log as written by the benchmark runner.
//!
//! Everything is optional here; presence is checked during ingestion so the
//! error can name the benchmark and the key that is missing.

use serde::Deserialize;
use serde_json::{Map, Value};

/// One top-level entry: `{"threads": .., "args": [..], "libs": {..}}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawBenchmark {
    pub threads: Option<u64>,
    pub args: Option<Vec<Value>>,
    /// Library key -> [`RawMeasurement`]; kept as a map to retain key order.
    pub libs: Option<Map<String, Value>>,
}

/// Samples for one library, one element per repeated run.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMeasurement {
    pub compressed_logsizes: Option<Vec<f64>>,
    pub log_sizes: Option<Vec<f64>>,
    pub system_time: Option<Vec<f64>>,
    pub user_time: Option<Vec<f64>>,
    pub times: Option<Vec<f64>>,

    /// Outer index = run, inner = per-core nanoseconds.
    pub time_per_cpu: Option<Vec<Vec<f64>>>,

    /// Hardware counters and anything else the runner recorded.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RawMeasurement {
    /// Required per-run sample arrays in the order they are checked.
    pub const REQUIRED: [&'static str; 5] = [
        "compressed_logsizes",
        "log_sizes",
        "system_time",
        "user_time",
        "times",
    ];

    pub fn required(&self, field: &str) -> Option<&[f64]> {
        let samples = match field {
            "compressed_logsizes" => &self.compressed_logsizes,
            "log_sizes" => &self.log_sizes,
            "system_time" => &self.system_time,
            "user_time" => &self.user_time,
            "times" => &self.times,
            _ => return None,
        };
        samples.as_deref().filter(|s| !s.is_empty())
    }

    /// Numeric samples recorded under `name`, if it is an array of numbers.
    pub fn counter(&self, name: &str) -> Option<Vec<f64>> {
        self.extra
            .get(name)?
            .as_array()?
            .iter()
            .map(Value::as_f64)
            .collect()
    }
}
