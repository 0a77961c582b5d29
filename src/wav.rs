//! Concatenation of WAV recordings split across several files.

use anyhow::{Context, Result, bail};
use glob::{Pattern, glob};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::{Path, PathBuf},
};

/// Append every `*.wav` file of `wav_dir`, in file name order, into
/// `wav_dir/output_name`. Returns the number of files appended.
///
/// Meant for recorders that put a timestamp in the file name. All inputs must
/// share the sample rate, bit depth, sample format and channel count of the
/// first one.
pub fn concat_wav_dir<P: AsRef<Path>>(wav_dir: P, output_name: &str) -> Result<usize> {
    let wav_dir = wav_dir.as_ref();
    let output_file = wav_dir.join(output_name);

    let input_files: Vec<_> = list_wav_files(wav_dir)
        .context("failed to list wav files")?
        .into_iter()
        .filter(|file| file.file_name() != output_file.file_name())
        .collect();
    let Some(first_file) = input_files.first() else {
        bail!("no wav files found in {wav_dir:?}");
    };

    let spec = wav_spec(first_file)?;
    // Formats are checked up front so a mismatch leaves no partial output.
    for file in &input_files[1..] {
        let file_spec = wav_spec(file)?;
        if file_spec != spec {
            bail!("{file:?} has format {file_spec:?}, but {spec:?} was expected");
        }
    }

    let mut writer = WavWriter::create(&output_file, spec)
        .with_context(|| format!("failed to create {output_file:?}"))?;
    for file in &input_files {
        let reader = WavReader::open(file).with_context(|| format!("failed to open {file:?}"))?;
        append_samples(reader, &mut writer)
            .with_context(|| format!("failed to append {file:?}"))?;
        log::info!("added {file:?}");
    }

    writer
        .finalize()
        .with_context(|| format!("failed to finalize {output_file:?}"))?;

    Ok(input_files.len())
}

fn list_wav_files(wav_dir: &Path) -> Result<Vec<PathBuf>> {
    let wav_dir = wav_dir.to_str().context("directory is not valid UTF-8")?;
    let pattern = Path::new(&Pattern::escape(wav_dir)).join("*.wav");
    let pattern = pattern.to_str().context("pattern is not valid UTF-8")?;

    let mut files: Vec<_> = glob(pattern)
        .context("failed to glob wav files")?
        .filter_map(Result::ok)
        .filter(|p| p.is_file())
        .collect();
    files.sort();
    Ok(files)
}

fn append_samples(
    mut reader: WavReader<BufReader<File>>,
    writer: &mut WavWriter<BufWriter<File>>,
) -> Result<()> {
    match reader.spec().sample_format {
        SampleFormat::Int => {
            for sample in reader.samples::<i32>() {
                writer.write_sample(sample?)?;
            }
        }
        SampleFormat::Float => {
            for sample in reader.samples::<f32>() {
                writer.write_sample(sample?)?;
            }
        }
    }
    Ok(())
}

/// Format of a WAV file, for callers that want to check inputs up front.
pub fn wav_spec<P: AsRef<Path>>(file: P) -> Result<WavSpec> {
    let file = file.as_ref();
    let reader = WavReader::open(file).with_context(|| format!("failed to open {file:?}"))?;
    Ok(reader.spec())
}
