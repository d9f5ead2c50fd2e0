//! Summary statistics over repeated-run samples.
//!
//! Every raw multi-sample field in a log goes through [`trimmed_mean`], which
//! drops one minimum and one maximum observation before averaging so that a
//! single warm-up or cool-down run does not skew the table.

/// Smallest sample count for which a trimmed mean leaves anything to average.
pub const MIN_TRIMMED_SAMPLES: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StatsError {
    #[error("{statistic} of an empty sample set")]
    Empty { statistic: &'static str },

    #[error("{statistic} needs at least {required} samples, got {actual}")]
    TooFewSamples {
        statistic: &'static str,
        required: usize,
        actual: usize,
    },
}

pub fn mean(xs: &[f64]) -> Result<f64, StatsError> {
    if xs.is_empty() {
        return Err(StatsError::Empty { statistic: "mean" });
    }
    Ok(xs.iter().sum::<f64>() / xs.len() as f64)
}

/// Unbiased sample variance, `Σ(x - mean)² / (n - 1)`.
pub fn sample_variance(xs: &[f64]) -> Result<f64, StatsError> {
    if xs.len() < 2 {
        return Err(StatsError::TooFewSamples {
            statistic: "sample variance",
            required: 2,
            actual: xs.len(),
        });
    }
    let m = mean(xs)?;
    let sum: f64 = xs.iter().map(|&x| (x - m) * (x - m)).sum();
    Ok(sum / (xs.len() - 1) as f64)
}

pub fn standard_deviation(xs: &[f64]) -> Result<f64, StatsError> {
    sample_variance(xs).map(f64::sqrt)
}

/// Mean after removing exactly one occurrence of the maximum and one of the
/// minimum.
///
/// Fewer than [`MIN_TRIMMED_SAMPLES`] samples is rejected instead of guessing
/// which observation counts as the outlier.
pub fn trimmed_mean(xs: &[f64]) -> Result<f64, StatsError> {
    if xs.len() < MIN_TRIMMED_SAMPLES {
        return Err(StatsError::TooFewSamples {
            statistic: "trimmed mean",
            required: MIN_TRIMMED_SAMPLES,
            actual: xs.len(),
        });
    }

    let mut rest = xs.to_vec();
    rest.remove(position_of(&rest, |a, b| a > b));
    rest.remove(position_of(&rest, |a, b| a < b));
    mean(&rest)
}

/// Index of the first element that no later element beats under `better`.
fn position_of(xs: &[f64], better: impl Fn(f64, f64) -> bool) -> usize {
    let mut best = 0;
    for (i, &x) in xs.iter().enumerate().skip(1) {
        if better(x, xs[best]) {
            best = i;
        }
    }
    best
}

/// How floating point values are printed in table cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NumberStyle {
    /// Precision shrinks as magnitude grows; scientific above 10⁴.
    #[default]
    Tiered,
    /// Always three decimal places.
    Fixed3,
}

impl NumberStyle {
    pub fn format(&self, v: f64) -> String {
        match self {
            NumberStyle::Tiered => format_tiered(v),
            NumberStyle::Fixed3 => format!("{v:.3}"),
        }
    }
}

/// Human-readable tiered formatting.
///
/// ```
/// use benchlog_report::stats::format_tiered;
/// assert_eq!(format_tiered(15000.0), "1.50E+04");
/// assert_eq!(format_tiered(150.0), "150");
/// assert_eq!(format_tiered(0.15), "0.150");
/// ```
pub fn format_tiered(v: f64) -> String {
    if v > 1e4 {
        format_scientific(v)
    } else if v > 100.0 {
        format!("{v:.0}")
    } else if v > 10.0 {
        format!("{v:.1}")
    } else if v > 1.0 {
        format!("{v:.2}")
    } else {
        format!("{v:.3}")
    }
}

/// Two-digit mantissa with a signed, zero-padded exponent: `1.50E+04`.
pub fn format_scientific(v: f64) -> String {
    let raw = format!("{v:.2E}");
    match raw.split_once('E') {
        Some((mantissa, exp)) => match exp.parse::<i32>() {
            Ok(e) => {
                let sign = if e < 0 { '-' } else { '+' };
                format!("{mantissa}E{sign}{:02}", e.abs())
            }
            Err(_) => raw,
        },
        // inf / NaN
        None => raw,
    }
}

/// Integer-truncated count, scientific above 10⁴.
pub fn format_count(v: f64) -> String {
    let truncated = v.trunc();
    if truncated > 1e4 {
        format_scientific(truncated)
    } else {
        format!("{}", truncated as i64)
    }
}
