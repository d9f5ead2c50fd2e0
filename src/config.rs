use crate::stats::NumberStyle;
use crate::OutputFormat;

/// Hardware counters the benchmark runner records via `perf stat`, plus the
/// two signal counters.
pub const DEFAULT_PERF_EVENTS: [&str; 17] = [
    "sigsegv",
    "sigusr1",
    "branch-instructions",
    "bus-cycles",
    "cache-misses",
    "cache-references",
    "cpu-cycles",
    "instructions",
    "ref-cycles",
    "alignment-faults",
    "context-switches",
    "cpu-clock",
    "cpu-migrations",
    "major-faults",
    "minor-faults",
    "page-faults",
    "task-clock",
];

/// Tick rate assumed when the host cannot be asked.
pub const FALLBACK_CLOCK_TICKS: f64 = 100.0;

#[derive(Clone, Debug)]
pub struct IngestConfig {
    /// Keep only benchmarks run with this many threads; `None` keeps all.
    pub thread_filter: Option<u64>,
    /// Benchmark names are the log key up to the first separator.
    pub name_separator: Option<char>,
    pub perf_events: Vec<String>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            thread_filter: Some(16),
            name_separator: Some('-'),
            perf_events: DEFAULT_PERF_EVENTS.iter().map(|e| e.to_string()).collect(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ReportConfig {
    pub format: OutputFormat,
    pub number_style: NumberStyle,
    pub ingest: IngestConfig,
    /// Converts system/user tick counts to seconds.
    pub clock_ticks_per_sec: f64,
}

impl ReportConfig {
    /// Configuration for `format` using the host's clock tick rate.
    pub fn for_format(format: OutputFormat) -> Self {
        Self {
            format,
            number_style: NumberStyle::default(),
            ingest: IngestConfig::default(),
            clock_ticks_per_sec: host_clock_ticks(),
        }
    }
}

/// `sysconf(_SC_CLK_TCK)`, the unit of the kernel's user/system time counters.
#[cfg(unix)]
pub fn host_clock_ticks() -> f64 {
    // SAFETY: sysconf has no preconditions and only reads system configuration.
    let ticks = unsafe { libc::sysconf(libc::_SC_CLK_TCK) };
    if ticks > 0 {
        ticks as f64
    } else {
        tracing::warn!("sysconf(_SC_CLK_TCK) failed, assuming {FALLBACK_CLOCK_TICKS} Hz");
        FALLBACK_CLOCK_TICKS
    }
}

#[cfg(not(unix))]
pub fn host_clock_ticks() -> f64 {
    FALLBACK_CLOCK_TICKS
}
