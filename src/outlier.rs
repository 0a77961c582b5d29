//! Iterative outlier removal around the median.
//!
//! Each pass computes the quartiles of the working set with "lower"
//! interpolation (every percentile is an element of the data), builds the
//! band `median ± factor_iqr * iqr` and removes exactly one value outside it:
//! the last one found when scanning in order. Passes repeat until no value is
//! outside the band or the working set becomes too small to trust its
//! quartiles.

use thiserror::Error;

/// Trimming stops once the working set drops below this many elements.
const MIN_LEN: usize = 4;

/// Default multiplier applied to the interquartile range.
pub const DEFAULT_FACTOR_IQR: f64 = 2.0;

/// Value of the working set together with its position in the original input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub index: usize,
    pub value: f64,
}

#[derive(Debug, Error, PartialEq)]
pub enum FilterError {
    #[error("input vector is empty")]
    Empty,

    #[error("index vector length must be {expected}, but is {got}")]
    IndexLengthMismatch { expected: usize, got: usize },

    #[error("factor_iqr must be a positive finite number, but is {0}")]
    InvalidFactor(f64),

    #[error("value at index {index} is not finite ({value})")]
    NonFinite { index: usize, value: f64 },
}

/// Percentile `q` (in `0..=100`) of an ascending slice using "lower" interpolation.
///
/// The result is the element at `floor(q / 100 * (n - 1))`, never an
/// interpolated value. Returns `None` for an empty slice.
pub fn percentile_lower(sorted: &[f64], q: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let pos = (q / 100.0 * last as f64).floor() as usize;
    sorted.get(pos.min(last)).copied()
}

/// Remove outliers from `values`, returning the survivors with their original indices.
///
/// # Errors
/// Fails without filtering if `values` is empty or contains a non-finite
/// value, or if `factor_iqr` is not a positive finite number.
pub fn remove_outliers_iteratively(
    values: &[f64],
    factor_iqr: f64,
) -> Result<Vec<Sample>, FilterError> {
    let samples = values
        .iter()
        .enumerate()
        .map(|(index, &value)| Sample { index, value })
        .collect();
    resume_outlier_removal(samples, factor_iqr)
}

/// Continue outlier removal on samples that already carry an index mapping,
/// e.g. the output of a previous pass.
///
/// The size thresholds are relative to `samples.len()` at call time.
pub fn resume_outlier_removal(
    mut samples: Vec<Sample>,
    factor_iqr: f64,
) -> Result<Vec<Sample>, FilterError> {
    validate(&samples, factor_iqr)?;

    let original_len = samples.len();
    let mut n_passes = 0;
    loop {
        n_passes += 1;
        let Some((lower, upper)) = outlier_band(&samples, factor_iqr) else {
            break;
        };

        // Only the last match of the scan is removed in a pass.
        let Some(pos) = samples
            .iter()
            .rposition(|s| s.value < lower || s.value > upper)
        else {
            break;
        };
        let removed = samples.remove(pos);
        log::debug!(
            "pass {n_passes}: removed {} at index {} (band [{lower}, {upper}])",
            removed.value,
            removed.index
        );

        let len = samples.len();
        if len < MIN_LEN || 2 * len < original_len {
            log::debug!("stopping with {len} of {original_len} values left");
            break;
        }
    }

    Ok(samples)
}

/// Two-vector form of [`resume_outlier_removal`].
///
/// `index` defaults to the identity mapping `0..values.len()`.
pub fn remove_outliers_with_index(
    values: &[f64],
    index: Option<&[usize]>,
    factor_iqr: f64,
) -> Result<(Vec<f64>, Vec<usize>), FilterError> {
    if values.is_empty() {
        return Err(FilterError::Empty);
    }
    let samples = match index {
        Some(index) => {
            if index.len() != values.len() {
                return Err(FilterError::IndexLengthMismatch {
                    expected: values.len(),
                    got: index.len(),
                });
            }
            index
                .iter()
                .zip(values)
                .map(|(&index, &value)| Sample { index, value })
                .collect()
        }
        None => values
            .iter()
            .enumerate()
            .map(|(index, &value)| Sample { index, value })
            .collect(),
    };

    let kept = resume_outlier_removal(samples, factor_iqr)?;
    Ok(kept.into_iter().map(|s| (s.value, s.index)).unzip())
}

fn validate(samples: &[Sample], factor_iqr: f64) -> Result<(), FilterError> {
    if samples.is_empty() {
        return Err(FilterError::Empty);
    }
    if !(factor_iqr.is_finite() && factor_iqr > 0.0) {
        return Err(FilterError::InvalidFactor(factor_iqr));
    }
    if let Some(s) = samples.iter().find(|s| !s.value.is_finite()) {
        return Err(FilterError::NonFinite {
            index: s.index,
            value: s.value,
        });
    }
    Ok(())
}

fn outlier_band(samples: &[Sample], factor_iqr: f64) -> Option<(f64, f64)> {
    let mut sorted: Vec<f64> = samples.iter().map(|s| s.value).collect();
    sorted.sort_by(f64::total_cmp);

    let q1 = percentile_lower(&sorted, 25.0)?;
    let median = percentile_lower(&sorted, 50.0)?;
    let q3 = percentile_lower(&sorted, 75.0)?;
    let half_width = factor_iqr * (q3 - q1);

    Some((median - half_width, median + half_width))
}
