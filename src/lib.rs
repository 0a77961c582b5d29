//! Utilities for audio and time-series analysis.
//!
//! The centre piece is [`outlier::remove_outliers_iteratively`], an iterative
//! interquartile-range filter that keeps track of which original positions
//! survive. The other modules cover the surrounding chores: ragged CSV
//! input, forward-backward smoothing, spectral peak features, BIC model
//! selection and WAV concatenation.

pub mod bic;
pub mod config;
pub mod data;
pub mod manager;
pub mod outlier;
pub mod smooth;
pub mod spectral;
pub mod wav;
