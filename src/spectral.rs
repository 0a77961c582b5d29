//! Peak features of energy spectral density (ESD) frames.

/// Hertz per ESD bin.
pub const DEFAULT_BIN_SCALE: f64 = 500.0;

/// Bins this close to either end of a frame are treated as noise.
const EDGE_BINS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EsdFeature {
    /// Frequency of the peak bin.
    pub center_freq: f64,
    /// Share of the total energy held by the peak bin and its two neighbours.
    pub narrowness: f64,
}

/// Estimate the dominant frequency and its narrowness from one ESD frame.
///
/// Returns `None` when the peak sits within three bins of either end of the
/// frame, or when the frame holds non-finite values or no energy.
pub fn esd_feature(frame: &[f64], bin_scale: f64) -> Option<EsdFeature> {
    if frame.iter().any(|val| !val.is_finite()) {
        return None;
    }
    let total: f64 = frame.iter().sum();
    if total <= 0.0 {
        return None;
    }

    let peak = argmax(frame)?;
    if peak < EDGE_BINS || peak + EDGE_BINS > frame.len() {
        return None;
    }

    let narrowness = frame[peak - 1..=peak + 1].iter().sum::<f64>() / total;
    Some(EsdFeature {
        center_freq: bin_scale * peak as f64,
        narrowness,
    })
}

/// Index of the first maximum.
fn argmax(frame: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, &val) in frame.iter().enumerate() {
        if best.is_none_or(|(_, best_val)| val > best_val) {
            best = Some((idx, val));
        }
    }
    best.map(|(idx, _)| idx)
}
