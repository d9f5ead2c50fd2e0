//! Turn benchmarks into table rows.
//!
//! Libraries are ordered by [`LIBRARY_PRIORITY`], renamed through
//! [`LIBRARY_ALIASES`], then every registered field is applied to every
//! library so that each column holds one value per library.

use serde::Serialize;

use crate::fields::{FieldContext, FieldRegistry};
use crate::model::{Benchmark, Measurement};
use crate::stats::NumberStyle;
use crate::OutputFormat;

/// Lower sorts first; unlisted libraries go last in log order.
pub const LIBRARY_PRIORITY: [(&str, usize); 4] =
    [("pthread", 0), ("tthread", 1), ("pt", 2), ("inspector", 3)];

pub const LIBRARY_ALIASES: [(&str, &str); 4] = [
    ("pthread", "pthread"),
    ("pt", "OS support"),
    ("tthread", "Threading lib."),
    ("inspector", "Total overheads"),
];

/// One table cell: benchmark metadata or one value per library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Scalar(String),
    List(Vec<String>),
}

pub type Row = Vec<Cell>;

/// Header plus one row per benchmark; every row is as wide as the header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    /// Header first, as the templates expect.
    pub fn to_rows(&self) -> Vec<Row> {
        let header = self.header.iter().cloned().map(Cell::Scalar).collect();
        std::iter::once(header).chain(self.rows.iter().cloned()).collect()
    }
}

/// Per-benchmark columns placed before the field columns.
struct MetadataColumn {
    name: &'static str,
    value: fn(&Benchmark) -> String,
}

fn metadata_columns(format: OutputFormat) -> &'static [MetadataColumn] {
    fn name(b: &Benchmark) -> String {
        b.name.clone()
    }
    fn options(b: &Benchmark) -> String {
        b.args.join("&nbsp;")
    }

    const HTML: &[MetadataColumn] = &[
        MetadataColumn {
            name: "Name",
            value: name,
        },
        MetadataColumn {
            name: "Options",
            value: options,
        },
    ];
    match format {
        OutputFormat::Html => HTML,
        OutputFormat::Latex => &[],
    }
}

fn priority(lib: &str) -> usize {
    LIBRARY_PRIORITY
        .iter()
        .find(|(name, _)| *name == lib)
        .map_or(usize::MAX, |&(_, p)| p)
}

/// Libraries of `benchmark` in display order.
pub fn ordered_libraries(benchmark: &Benchmark) -> Vec<&Measurement> {
    let mut libs: Vec<&Measurement> = benchmark.libs.iter().collect();
    // sort_by_key is stable, so ties keep log order.
    libs.sort_by_key(|m| priority(&m.name));
    libs
}

pub fn display_name(lib: &str, format: OutputFormat) -> String {
    let alias = LIBRARY_ALIASES
        .iter()
        .find(|(name, _)| *name == lib)
        .map_or(lib, |&(_, alias)| alias);
    match format {
        OutputFormat::Html => alias.replace(char::is_whitespace, "&nbsp;"),
        OutputFormat::Latex => alias.to_string(),
    }
}

/// Settings that shape cell values.
#[derive(Clone, Copy, Debug)]
pub struct RowOptions {
    pub format: OutputFormat,
    pub number_style: NumberStyle,
    pub clock_ticks_per_sec: f64,
}

pub fn assemble_row(benchmark: &Benchmark, registry: &FieldRegistry, opts: &RowOptions) -> Row {
    let libs = ordered_libraries(benchmark);
    let names: Vec<String> = libs
        .iter()
        .map(|m| display_name(&m.name, opts.format))
        .collect();

    let mut row: Row = metadata_columns(opts.format)
        .iter()
        .map(|col| Cell::Scalar((col.value)(benchmark)))
        .collect();

    for field in registry.iter() {
        let values = libs
            .iter()
            .zip(&names)
            .map(|(m, name)| {
                let ctx = FieldContext {
                    benchmark,
                    display_name: name,
                    clock_ticks_per_sec: opts.clock_ticks_per_sec,
                    number_style: opts.number_style,
                };
                field.extract(m, &ctx)
            })
            .collect();
        row.push(Cell::List(values));
    }
    row
}

pub fn assemble(benchmarks: &[Benchmark], registry: &FieldRegistry, opts: &RowOptions) -> Table {
    let header = metadata_columns(opts.format)
        .iter()
        .map(|col| col.name.to_string())
        .chain(registry.names().map(str::to_string))
        .collect();
    let rows = benchmarks
        .iter()
        .map(|b| assemble_row(b, registry, opts))
        .collect();
    Table { header, rows }
}
