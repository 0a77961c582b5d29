use crate::outlier::DEFAULT_FACTOR_IQR;
use crate::spectral::DEFAULT_BIN_SCALE;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{fmt::Debug, fs, ops::RangeBounds, path::Path};

/// Tool configuration.
///
/// Loaded from a TOML file and validated before use. Every section and field
/// is optional; missing values take their defaults.
#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub outlier: OutlierConfig,
    pub smooth: SmoothConfig,
    pub features: FeaturesConfig,
}

/// Outlier removal parameters.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutlierConfig {
    /// Multiplier of the interquartile range defining the outlier band.
    pub factor_iqr: f64,
}

/// Smoothing parameters.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SmoothConfig {
    /// Length of the moving-average window.
    pub n_taps: usize,
}

/// Spectral feature parameters.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeaturesConfig {
    /// Frequency width of one ESD bin.
    pub bin_scale: f64,
}

impl Default for OutlierConfig {
    fn default() -> Self {
        Self {
            factor_iqr: DEFAULT_FACTOR_IQR,
        }
    }
}

impl Default for SmoothConfig {
    fn default() -> Self {
        Self { n_taps: 5 }
    }
}

impl Default for FeaturesConfig {
    fn default() -> Self {
        Self {
            bin_scale: DEFAULT_BIN_SCALE,
        }
    }
}

impl Config {
    /// Load a [`Config`] from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, deserialized,
    /// or if the configuration values are invalid.
    pub fn from_file<P: AsRef<Path>>(file: P) -> Result<Self> {
        let file = file.as_ref();
        let contents =
            fs::read_to_string(file).with_context(|| format!("failed to read {file:?}"))?;

        let config: Config = toml::from_str(&contents).context("failed to deserialize config")?;

        config.validate().context("failed to validate config")?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        check_num(self.outlier.factor_iqr, 1e-6..1e6).context("invalid IQR factor")?;
        check_num(self.smooth.n_taps, 1..10_000).context("invalid number of taps")?;
        check_num(self.features.bin_scale, 1e-6..1e9).context("invalid bin scale")?;
        Ok(())
    }
}

pub fn check_num<T, R>(num: T, range: R) -> Result<()>
where
    T: PartialOrd + Debug,
    R: RangeBounds<T> + Debug,
{
    if !range.contains(&num) {
        bail!("number must be in the range {range:?}, but is {num:?}");
    }
    Ok(())
}
