use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tsutils::manager::Manager;

#[derive(Debug, Parser)]
#[command(version, about)]
struct CLI {
    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Remove outliers from every series of a CSV file.
    Trim {
        #[arg(long)]
        input: PathBuf,

        #[arg(long)]
        output: PathBuf,

        /// Also write the original positions of the kept values.
        #[arg(long)]
        index_output: Option<PathBuf>,

        #[arg(long)]
        factor_iqr: Option<f64>,
    },

    /// Smooth every series of a CSV file with a forward-backward moving average.
    Smooth {
        #[arg(long)]
        input: PathBuf,

        #[arg(long)]
        output: PathBuf,

        #[arg(long)]
        n_taps: Option<usize>,
    },

    /// Extract peak frequency and narrowness from ESD frames.
    Features {
        #[arg(long)]
        input: PathBuf,

        #[arg(long)]
        output: PathBuf,
    },

    /// Join the WAV files of a directory in file name order.
    Concat {
        #[arg(long)]
        wav_dir: PathBuf,

        #[arg(long)]
        output: String,
    },
}

fn main() {
    env_logger::Builder::new()
        .format_timestamp_millis()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    if let Err(error) = run_cli() {
        log::error!("{error:#?}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<()> {
    let args = CLI::parse();
    log::info!("{args:#?}");

    let mut mgr = Manager::new(args.config).context("failed to construct mgr")?;

    match &args.command {
        Command::Trim {
            factor_iqr: Some(factor_iqr),
            ..
        } => mgr.cfg_mut().outlier.factor_iqr = *factor_iqr,
        Command::Smooth {
            n_taps: Some(n_taps),
            ..
        } => mgr.cfg_mut().smooth.n_taps = *n_taps,
        _ => {}
    }
    mgr.cfg()
        .validate()
        .context("invalid command-line override")?;

    match args.command {
        Command::Trim {
            input,
            output,
            index_output,
            ..
        } => mgr.trim_series(input, output, index_output)?,
        Command::Smooth { input, output, .. } => mgr.smooth_series(input, output)?,
        Command::Features { input, output } => mgr.extract_features(input, output)?,
        Command::Concat { wav_dir, output } => mgr.concat_wavs(wav_dir, &output)?,
    }

    Ok(())
}
