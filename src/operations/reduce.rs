use std::cmp::Ordering;

use crate::commands::{CommandError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReduceOperation {
    Max,
    Min,
    IndexMax,
    IndexMin,
    Sum,
    Product,
    Mean,
    Stdev,
    SampStdev,
    Variance,
    Tsnr,
    Cov,
    L2Norm,
    Median,
    Mode,
    CountNonzero,
}

impl ReduceOperation {
    pub const NAMES: &'static [&'static str] = &[
        "MAX",
        "MIN",
        "INDEXMAX",
        "INDEXMIN",
        "SUM",
        "PRODUCT",
        "MEAN",
        "STDEV",
        "SAMPSTDEV",
        "VARIANCE",
        "TSNR",
        "COV",
        "L2NORM",
        "MEDIAN",
        "MODE",
        "COUNT_NONZERO",
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        let operation = match name {
            "MAX" => Self::Max,
            "MIN" => Self::Min,
            "INDEXMAX" => Self::IndexMax,
            "INDEXMIN" => Self::IndexMin,
            "SUM" => Self::Sum,
            "PRODUCT" => Self::Product,
            "MEAN" => Self::Mean,
            "STDEV" => Self::Stdev,
            "SAMPSTDEV" => Self::SampStdev,
            "VARIANCE" => Self::Variance,
            "TSNR" => Self::Tsnr,
            "COV" => Self::Cov,
            "L2NORM" => Self::L2Norm,
            "MEDIAN" => Self::Median,
            "MODE" => Self::Mode,
            "COUNT_NONZERO" => Self::CountNonzero,
            _ => return None,
        };
        Some(operation)
    }

    /// Reduces `values` to one number. Index results are 1-based.
    pub fn apply(self, values: &[f64]) -> Result<f64> {
        if values.is_empty() {
            return Err(CommandError::operation("no data to reduce"));
        }
        let count = values.len() as f64;
        let mean = || values.iter().sum::<f64>() / count;
        let squared_deviation = || {
            let center = mean();
            values
                .iter()
                .map(|value| (value - center).powi(2))
                .sum::<f64>()
        };
        let sample_stdev = || {
            if values.len() < 2 {
                return Err(CommandError::operation(
                    "sample standard deviation needs at least 2 values",
                ));
            }
            Ok((squared_deviation() / (count - 1.0)).sqrt())
        };

        let result = match self {
            Self::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            Self::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
            Self::IndexMax => position_of(values, Ordering::Greater) as f64 + 1.0,
            Self::IndexMin => position_of(values, Ordering::Less) as f64 + 1.0,
            Self::Sum => values.iter().sum(),
            Self::Product => values.iter().product(),
            Self::Mean => mean(),
            Self::Stdev => (squared_deviation() / count).sqrt(),
            Self::SampStdev => sample_stdev()?,
            Self::Variance => squared_deviation() / count,
            Self::Tsnr => mean() / sample_stdev()?,
            Self::Cov => sample_stdev()? / mean(),
            Self::L2Norm => values.iter().map(|value| value * value).sum::<f64>().sqrt(),
            Self::Median => percentile(values, 50.0)?,
            Self::Mode => mode(values),
            Self::CountNonzero => values.iter().filter(|value| **value != 0.0).count() as f64,
        };
        Ok(result)
    }
}

/// First index whose value compares `wanted` against every earlier candidate.
fn position_of(values: &[f64], wanted: Ordering) -> usize {
    let mut best = 0;
    for (index, value) in values.iter().enumerate().skip(1) {
        if value.partial_cmp(&values[best]) == Some(wanted) {
            best = index;
        }
    }
    best
}

/// Most frequent value; ties go to the smallest.
fn mode(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mut best = (sorted[0], 0_usize);
    for run in sorted.chunk_by(|left, right| left == right) {
        if run.len() > best.1 {
            best = (run[0], run.len());
        }
    }
    best.0
}

/// Percentile with linear interpolation between the closest ranks.
pub fn percentile(values: &[f64], percent: f64) -> Result<f64> {
    if !(0.0..=100.0).contains(&percent) {
        return Err(CommandError::operation(
            "percentile must be between 0 and 100",
        ));
    }
    if values.is_empty() {
        return Err(CommandError::operation("no data to reduce"));
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let position = percent / 100.0 * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let weight = position - lower as f64;
    Ok(sorted[lower] + (sorted[upper] - sorted[lower]) * weight)
}
