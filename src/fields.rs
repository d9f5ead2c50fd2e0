//! Column registries: an ordered list of named extraction functions.
//!
//! The registry order is the column order of the rendered table.

use crate::model::{Benchmark, Measurement};
use crate::stats::{format_count, NumberStyle};
use crate::OutputFormat;

/// Shown when an optional statistic is not available for a library.
pub const NOT_AVAILABLE: &str = "-";

/// Short application names for the typeset table.
pub const APPLICATION_ALIASES: [(&str, &str); 7] = [
    ("linear_regression", "linear_reg"),
    ("matrix_multiply", "matrix_mul"),
    ("reverse_index", "reverve_idx"),
    ("streamcluster", "streamcl."),
    ("string_match", "string_ma."),
    ("word_count", "word_c"),
    ("blackscholes", "blackscho."),
];

/// Everything a field may look at besides the measurement itself.
#[derive(Clone, Copy, Debug)]
pub struct FieldContext<'a> {
    pub benchmark: &'a Benchmark,
    /// Library name after aliasing.
    pub display_name: &'a str,
    pub clock_ticks_per_sec: f64,
    pub number_style: NumberStyle,
}

impl FieldContext<'_> {
    fn num(&self, v: f64) -> String {
        self.number_style.format(v)
    }

    /// `v` at the precision [`FieldContext::num`] would print it with.
    fn rounded(&self, v: f64) -> f64 {
        self.num(v).parse().unwrap_or(v)
    }
}

type Extract = Box<dyn Fn(&Measurement, &FieldContext<'_>) -> String + Send + Sync>;

pub struct FieldDescriptor {
    pub name: String,
    extract: Extract,
}

impl FieldDescriptor {
    pub fn new(
        name: impl Into<String>,
        extract: impl Fn(&Measurement, &FieldContext<'_>) -> String + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            extract: Box::new(extract),
        }
    }

    pub fn extract(&self, m: &Measurement, ctx: &FieldContext<'_>) -> String {
        (self.extract)(m, ctx)
    }
}

impl std::fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Insertion-ordered set of columns.
#[derive(Debug, Default)]
pub struct FieldRegistry {
    fields: Vec<FieldDescriptor>,
}

impl FieldRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_format(format: OutputFormat, perf_events: &[String]) -> Self {
        match format {
            OutputFormat::Html => markup_registry(perf_events),
            OutputFormat::Latex => typeset_registry(),
        }
    }

    pub fn push(
        &mut self,
        name: impl Into<String>,
        extract: impl Fn(&Measurement, &FieldContext<'_>) -> String + Send + Sync + 'static,
    ) -> &mut Self {
        self.fields.push(FieldDescriptor::new(name, extract));
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldDescriptor> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn to_mb(bytes: f64) -> f64 {
    bytes / 1000.0 / 1000.0
}

/// Counter mean per second of wall time.
fn counter_rate(m: &Measurement, ctx: &FieldContext<'_>, event: &str) -> String {
    match m.counter_mean(event) {
        Some(v) => ctx.num(v / m.wall_time),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Column title for a perf event: `cache-misses` -> `Cache misses`.
pub fn counter_title(event: &str) -> String {
    let spaced = event.replace('-', " ").to_lowercase();
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Full per-library breakdown for the HTML table.
pub fn markup_registry(perf_events: &[String]) -> FieldRegistry {
    let mut r = FieldRegistry::new();
    r.push("Library", |_, ctx| ctx.display_name.to_string())
        .push("Logsize [MB]", |m, ctx| ctx.num(to_mb(m.log_size_bytes)))
        .push("Compressed Log (Ratio) [MB]", |m, ctx| {
            format!(
                "{} ({:.1}x)",
                ctx.num(to_mb(m.compressed_log_size_bytes)),
                ctx.rounded(m.compression_ratio())
            )
        })
        .push("Log bandwidth [MB/s]", |m, ctx| {
            ctx.num(to_mb(m.log_size_bytes) / m.wall_time)
        })
        .push("Segfault/time [1/s]", |m, ctx| counter_rate(m, ctx, "sigsegv"))
        .push("Branch instructions/time [1/s]", |m, ctx| {
            counter_rate(m, ctx, "branch-instructions")
        })
        .push("Wall time [s]", |m, ctx| ctx.num(m.wall_time))
        .push("System time [s]", |m, ctx| {
            ctx.num(m.system_time_ticks / ctx.clock_ticks_per_sec)
        })
        .push("User time [s]", |m, ctx| {
            ctx.num(m.user_time_ticks / ctx.clock_ticks_per_sec)
        })
        .push("CPU time [s]", |m, ctx| match m.cpu_time_ns() {
            Ok(ns) => ctx.num(ns / 1e9),
            Err(_) => NOT_AVAILABLE.to_string(),
        })
        .push("CPU time deviation across cores [s]", |m, ctx| {
            match m.cpu_time_deviation_ns() {
                Ok(ns) => ctx.num(ns / 1e9),
                Err(_) => NOT_AVAILABLE.to_string(),
            }
        });

    for event in perf_events {
        let event = event.clone();
        r.push(counter_title(&event), move |m, _| match m.counter_mean(&event) {
            Some(v) => format_count(v),
            None => NOT_AVAILABLE.to_string(),
        });
    }
    r
}

pub fn application_alias(name: &str) -> &str {
    APPLICATION_ALIASES
        .iter()
        .find(|(full, _)| *full == name)
        .map_or(name, |&(_, short)| short)
}

/// Narrow table for print.
pub fn typeset_registry() -> FieldRegistry {
    let mut r = FieldRegistry::new();
    r.push("Application", |_, ctx| {
        application_alias(&ctx.benchmark.name).to_string()
    })
    .push("Log size [MB]", |m, _| format!("{:.0}", to_mb(m.log_size_bytes)))
    .push("Compressed Log size [MB]", |m, _| {
        format!(
            "{:.1} ({:.0}x)",
            to_mb(m.compressed_log_size_bytes),
            m.compression_ratio()
        )
    })
    .push("Bandwidth [MB/s]", |m, _| {
        format!("{:.0}", to_mb(m.log_size_bytes) / m.wall_time)
    })
    .push("Branch instr./time [1/s]", |m, ctx| {
        counter_rate(m, ctx, "branch-instructions")
    });
    r
}
