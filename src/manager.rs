use crate::config::Config;
use crate::data::{read_ragged_csv, write_ragged_csv};
use crate::outlier::remove_outliers_iteratively;
use crate::smooth::{filtfilt, moving_average};
use crate::spectral::esd_feature;
use crate::wav::{concat_wav_dir, wav_spec};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Runs the file-level tasks of the command-line tool with a shared config.
pub struct Manager {
    cfg: Config,
}

impl Manager {
    pub fn new(config_file: Option<PathBuf>) -> Result<Self> {
        let cfg = match config_file {
            Some(file) => Config::from_file(&file)
                .with_context(|| format!("failed to load config from {file:?}"))?,
            None => Config::default(),
        };
        log::info!("{cfg:#?}");

        Ok(Self { cfg })
    }

    pub fn cfg(&self) -> &Config {
        &self.cfg
    }

    pub fn cfg_mut(&mut self) -> &mut Config {
        &mut self.cfg
    }

    /// Remove outliers from every series of `input` and write the survivors
    /// to `output`, and their original positions to `index_output` if given.
    pub fn trim_series<P: AsRef<Path>>(
        &self,
        input: P,
        output: P,
        index_output: Option<P>,
    ) -> Result<()> {
        let series_vec = read_ragged_csv(input).context("failed to read series")?;
        let factor_iqr = self.cfg.outlier.factor_iqr;

        let mut kept_vals = Vec::with_capacity(series_vec.len());
        let mut kept_idxs = Vec::with_capacity(series_vec.len());
        for (i_row, series) in series_vec.iter().enumerate() {
            if series.is_empty() {
                kept_vals.push(Vec::new());
                kept_idxs.push(Vec::new());
                continue;
            }
            let kept = remove_outliers_iteratively(series, factor_iqr)
                .with_context(|| format!("failed to trim row {i_row}"))?;
            log::info!(
                "row {i_row}: kept {} of {} values",
                kept.len(),
                series.len()
            );

            let (vals, idxs): (Vec<_>, Vec<_>) = kept.iter().map(|s| (s.value, s.index)).unzip();
            kept_vals.push(vals);
            kept_idxs.push(idxs);
        }

        write_ragged_csv(output, &kept_vals).context("failed to write trimmed series")?;
        if let Some(index_output) = index_output {
            write_ragged_csv(index_output, &kept_idxs).context("failed to write indices")?;
        }

        Ok(())
    }

    /// Smooth every series of `input` with a forward-backward moving average.
    pub fn smooth_series<P: AsRef<Path>>(&self, input: P, output: P) -> Result<()> {
        let series_vec = read_ragged_csv(input).context("failed to read series")?;
        let taps = moving_average(self.cfg.smooth.n_taps).context("failed to build taps")?;

        let mut smoothed_vec = Vec::with_capacity(series_vec.len());
        for (i_row, series) in series_vec.iter().enumerate() {
            if series.is_empty() {
                smoothed_vec.push(Vec::new());
                continue;
            }
            let smoothed =
                filtfilt(&taps, series).with_context(|| format!("failed to smooth row {i_row}"))?;
            smoothed_vec.push(smoothed);
        }

        write_ragged_csv(output, &smoothed_vec).context("failed to write smoothed series")?;
        Ok(())
    }

    /// Write the peak frequency and narrowness of every ESD frame of `input`.
    ///
    /// Rejected frames are written as a pair of NaNs.
    pub fn extract_features<P: AsRef<Path>>(&self, input: P, output: P) -> Result<()> {
        let frames = read_ragged_csv(input).context("failed to read frames")?;

        let mut rows = Vec::with_capacity(frames.len());
        let mut n_rejected = 0;
        for frame in &frames {
            match esd_feature(frame, self.cfg.features.bin_scale) {
                Some(feature) => rows.push(vec![feature.center_freq, feature.narrowness]),
                None => {
                    n_rejected += 1;
                    rows.push(vec![f64::NAN, f64::NAN]);
                }
            }
        }
        log::info!("rejected {n_rejected} of {} frames", frames.len());

        write_ragged_csv(output, &rows).context("failed to write features")?;
        Ok(())
    }

    /// Join the WAV files of `wav_dir` into `wav_dir/output_name`.
    pub fn concat_wavs<P: AsRef<Path>>(&self, wav_dir: P, output_name: &str) -> Result<()> {
        let wav_dir = wav_dir.as_ref();
        let n_files = concat_wav_dir(wav_dir, output_name).context("failed to concat wavs")?;

        let spec = wav_spec(wav_dir.join(output_name))?;
        log::info!("joined {n_files} files into {output_name} ({spec:?})");
        Ok(())
    }
}
