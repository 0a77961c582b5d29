//! Zero-phase smoothing with moving-average (FIR) taps.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SmoothError {
    #[error("filter taps are empty")]
    EmptyTaps,

    #[error("signal is empty")]
    EmptySignal,
}

/// Uniform moving-average taps of length `n_taps`, summing to one.
pub fn moving_average(n_taps: usize) -> Result<Vec<f64>, SmoothError> {
    if n_taps == 0 {
        return Err(SmoothError::EmptyTaps);
    }
    Ok(vec![1.0 / n_taps as f64; n_taps])
}

/// Filter `signal` forwards and then backwards with `taps`.
///
/// The signal is first extended on both sides by `taps.len() - 1` copies of
/// its edge values, which keeps the output free of start-up transients. The
/// result has the same length as `signal`.
///
/// Only meant for FIR taps; recursive filters need proper initial conditions.
pub fn filtfilt(taps: &[f64], signal: &[f64]) -> Result<Vec<f64>, SmoothError> {
    if taps.is_empty() {
        return Err(SmoothError::EmptyTaps);
    }
    let (Some(&first), Some(&last)) = (signal.first(), signal.last()) else {
        return Err(SmoothError::EmptySignal);
    };

    let n_pad = taps.len() - 1;
    let mut padded = Vec::with_capacity(signal.len() + 2 * n_pad);
    padded.extend(std::iter::repeat_n(first, n_pad));
    padded.extend_from_slice(signal);
    padded.extend(std::iter::repeat_n(last, n_pad));

    let mut filtered = convolve_same(&padded, taps);
    filtered.reverse();
    let mut filtered = convolve_same(&filtered, taps);
    filtered.reverse();

    Ok(filtered[n_pad..n_pad + signal.len()].to_vec())
}

/// Discrete convolution cropped to the central `max(len(x), len(kernel))`
/// samples, with zeros assumed outside `x`.
fn convolve_same(x: &[f64], kernel: &[f64]) -> Vec<f64> {
    let n_out = x.len().max(kernel.len());
    let offset = (x.len().min(kernel.len()) - 1) / 2;

    (offset..offset + n_out)
        .map(|k| {
            // full[k] = sum over j of kernel[j] * x[k - j]
            let j_min = k.saturating_sub(x.len() - 1);
            let j_max = k.min(kernel.len() - 1);
            (j_min..=j_max).map(|j| kernel[j] * x[k - j]).sum::<f64>()
        })
        .collect()
}
