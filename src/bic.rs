//! Model-order selection with the Bayesian Information Criterion.
//!
//! Fitting is left to the caller: candidates only need to report their
//! log-likelihood on the fitted data and their number of free parameters.

use anyhow::{Context, Result, bail};
use std::ops::RangeInclusive;

/// Component counts tried when no range is given.
pub const DEFAULT_COMPONENT_RANGE: RangeInclusive<usize> = 1..=6;

/// A fitted model that can be scored.
pub trait Scored {
    /// Total log-likelihood of the data the model was fitted on.
    fn log_likelihood(&self) -> f64;

    /// Number of free parameters of the model.
    fn n_free_params(&self) -> usize;
}

/// `ln(n_samples) * n_params - 2 * log_likelihood`.
pub fn bic(log_likelihood: f64, n_params: usize, n_samples: usize) -> f64 {
    (n_samples as f64).ln() * n_params as f64 - 2.0 * log_likelihood
}

/// Free parameters of a Gaussian HMM with diagonal covariances: means,
/// variances, transition matrix rows and start probabilities.
pub fn hmm_free_params(n_states: usize, n_features: usize) -> usize {
    2 * n_states * n_features + n_states * n_states.saturating_sub(1) + n_states.saturating_sub(1)
}

/// Free parameters of a diagonal-covariance Gaussian mixture: means,
/// variances and mixture weights.
pub fn gmm_diag_free_params(n_components: usize, n_features: usize) -> usize {
    2 * n_components * n_features + n_components.saturating_sub(1)
}

/// Outcome of [`select_lowest_bic`].
#[derive(Debug)]
pub struct Selection<M> {
    pub best: M,
    pub n_components: usize,
    /// Score of every candidate, in range order.
    pub scores: Vec<f64>,
}

/// Fit one model per component count in `range` and keep the one with the
/// lowest BIC. On ties the smaller model wins.
///
/// # Errors
/// Fails if `range` is empty or any fit fails.
pub fn select_lowest_bic<M, F>(
    range: RangeInclusive<usize>,
    n_samples: usize,
    mut fit: F,
) -> Result<Selection<M>>
where
    M: Scored,
    F: FnMut(usize) -> Result<M>,
{
    let mut scores = Vec::new();
    let mut best: Option<(M, usize, f64)> = None;

    for n_components in range.clone() {
        let model = fit(n_components)
            .with_context(|| format!("failed to fit model with {n_components} components"))?;
        let score = bic(model.log_likelihood(), model.n_free_params(), n_samples);
        log::debug!("{n_components} components: bic = {score}");
        scores.push(score);

        if best.as_ref().is_none_or(|(_, _, best_score)| score < *best_score) {
            best = Some((model, n_components, score));
        }
    }

    let Some((best, n_components, _)) = best else {
        bail!("component range {range:?} is empty");
    };
    Ok(Selection {
        best,
        n_components,
        scores,
    })
}
