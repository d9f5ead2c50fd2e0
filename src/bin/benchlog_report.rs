use benchlog_report::config::{host_clock_ticks, IngestConfig, ReportConfig};
use benchlog_report::stats::NumberStyle;
use benchlog_report::{report, OutputFormat};
use clap::{CommandFactory, Parser, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum NumberStyleArg {
    /// Precision by magnitude, scientific above 10^4.
    Tiered,
    /// Three decimal places everywhere.
    Fixed3,
}

impl From<NumberStyleArg> for NumberStyle {
    fn from(v: NumberStyleArg) -> Self {
        match v {
            NumberStyleArg::Tiered => NumberStyle::Tiered,
            NumberStyleArg::Fixed3 => NumberStyle::Fixed3,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "benchlog-report")]
#[command(about = "Render a benchmark JSON log as an HTML or LaTeX comparison table")]
struct Args {
    /// Benchmark log written by the benchmark runner.
    #[arg(value_name = "LOG_JSON")]
    log: PathBuf,

    /// Output document; `.html` or `.tex` selects the format.
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Force the output format instead of inferring it from the extension.
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Only report benchmarks run with this many threads.
    #[arg(long, default_value_t = 16, conflicts_with = "all_threads")]
    threads: u64,

    /// Report benchmarks regardless of thread count.
    #[arg(long, default_value_t = false)]
    all_threads: bool,

    #[arg(long, value_enum, default_value_t = NumberStyleArg::Tiered)]
    number_style: NumberStyleArg,

    /// Clock ticks per second for system/user times (default: sysconf(_SC_CLK_TCK)).
    #[arg(long, value_name = "HZ")]
    clock_ticks: Option<f64>,

    /// Use the full log key as benchmark name.
    #[arg(long, default_value_t = false)]
    no_name_truncation: bool,

    /// Log debug output to stderr.
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "benchlog_report=debug"
    } else {
        "benchlog_report=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let format = match args.format {
        Some(format) => format,
        None => match OutputFormat::from_path(&args.output) {
            Ok(format) => format,
            Err(err) => {
                eprintln!("error: {err}\n");
                eprintln!("{}", Args::command().render_usage());
                return ExitCode::FAILURE;
            }
        },
    };

    let cfg = ReportConfig {
        format,
        number_style: args.number_style.into(),
        ingest: IngestConfig {
            thread_filter: (!args.all_threads).then_some(args.threads),
            name_separator: (!args.no_name_truncation).then_some('-'),
            ..IngestConfig::default()
        },
        clock_ticks_per_sec: args.clock_ticks.unwrap_or_else(host_clock_ticks),
    };

    match report::generate(&args.log, &args.output, &cfg) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
