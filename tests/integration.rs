use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::{env, fs, path::Path, path::PathBuf, process::Command};

fn run_bin(args: &[&str]) -> bool {
    let bin = PathBuf::from(env!("CARGO_BIN_EXE_tsutils"));

    let output = Command::new(bin)
        .args(args)
        .output()
        .expect("failed to execute command");

    let stdout_str =
        std::str::from_utf8(&output.stdout).expect("failed to convert stdout to string");
    let stderr_str =
        std::str::from_utf8(&output.stderr).expect("failed to convert stderr to string");
    if !output.status.success() {
        eprintln!("binary failed with {args:?}\nstdout:\n{stdout_str}\nstderr:\n{stderr_str}\n");
    }
    output.status.success()
}

fn fresh_dir(name: &str) -> PathBuf {
    let test_dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join(name);
    fs::remove_dir_all(&test_dir).ok();
    fs::create_dir(&test_dir).expect("failed to create test directory");
    test_dir
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("failed to convert path to string")
}

#[test]
fn trim_workflow() {
    let test_dir = fresh_dir("trim_workflow");

    let input = test_dir.join("series.csv");
    fs::write(&input, "1,2,3,4,5,100\n\n5,5,5,5,5,,\n").expect("failed to write input file");
    let output = test_dir.join("trimmed.csv");
    let index_output = test_dir.join("index.csv");

    assert!(run_bin(&[
        "trim",
        "--input",
        path_str(&input),
        "--output",
        path_str(&output),
        "--index-output",
        path_str(&index_output),
    ]));

    let trimmed = fs::read_to_string(&output).expect("failed to read output");
    // The blank line stays in place so rows of both outputs match the input.
    assert_eq!(trimmed, "1,2,3,4,5\n\"\"\n5,5,5,5,5\n");
    let index = fs::read_to_string(&index_output).expect("failed to read indices");
    assert_eq!(index, "0,1,2,3,4\n\"\"\n0,1,2,3,4\n");

    // Invalid overrides and configs are refused before any work is done.
    assert!(!run_bin(&[
        "trim",
        "--input",
        path_str(&input),
        "--output",
        path_str(&output),
        "--factor-iqr=-1",
    ]));

    let config = test_dir.join("config.toml");
    fs::write(&config, "[outlier]\nfactor_iqr = 0.0\n").expect("failed to write config file");
    assert!(!run_bin(&[
        "--config",
        path_str(&config),
        "trim",
        "--input",
        path_str(&input),
        "--output",
        path_str(&output),
    ]));

    fs::remove_dir_all(&test_dir).ok();
}

#[test]
fn smooth_and_features_workflow() {
    let test_dir = fresh_dir("smooth_and_features_workflow");

    let config = test_dir.join("config.toml");
    fs::write(&config, "[smooth]\nn_taps = 3\n\n[features]\nbin_scale = 500.0\n")
        .expect("failed to write config file");

    let series = test_dir.join("series.csv");
    fs::write(&series, "3,3,3,3,3,3\n1,2\n").expect("failed to write series file");
    let smoothed = test_dir.join("smoothed.csv");
    assert!(run_bin(&[
        "--config",
        path_str(&config),
        "smooth",
        "--input",
        path_str(&series),
        "--output",
        path_str(&smoothed),
    ]));

    let smoothed = fs::read_to_string(&smoothed).expect("failed to read smoothed series");
    let rows: Vec<Vec<f64>> = smoothed
        .lines()
        .map(|line| line.split(',').map(|v| v.parse().unwrap()).collect())
        .collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].len(), 6);
    assert!(rows[0].iter().all(|v| (v - 3.0).abs() < 1e-12));
    assert_eq!(rows[1].len(), 2);

    let frames = test_dir.join("esd.csv");
    fs::write(&frames, "0,0,0,1,4,1,0,0,0,2\n5,1,1,1,1,1,1,1,1,1\n")
        .expect("failed to write frames file");
    let features = test_dir.join("features.csv");
    assert!(run_bin(&[
        "--config",
        path_str(&config),
        "features",
        "--input",
        path_str(&frames),
        "--output",
        path_str(&features),
    ]));

    let features = fs::read_to_string(&features).expect("failed to read features");
    assert_eq!(features, "2000,0.75\nNaN,NaN\n");

    fs::remove_dir_all(&test_dir).ok();
}

#[test]
fn concat_workflow() {
    let test_dir = fresh_dir("concat_workflow");

    let spec = WavSpec {
        channels: 1,
        sample_rate: 16000,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    for (name, samples) in [("b.wav", [3i16, 4]), ("a.wav", [1, 2])] {
        let mut writer =
            WavWriter::create(test_dir.join(name), spec).expect("failed to create wav file");
        for s in samples {
            writer.write_sample(s).expect("failed to write sample");
        }
        writer.finalize().expect("failed to finalize wav file");
    }

    assert!(run_bin(&[
        "concat",
        "--wav-dir",
        path_str(&test_dir),
        "--output",
        "joined.wav",
    ]));

    let samples: Vec<i16> = WavReader::open(test_dir.join("joined.wav"))
        .expect("failed to open joined file")
        .samples::<i16>()
        .map(|s| s.expect("failed to read sample"))
        .collect();
    assert_eq!(samples, vec![1, 2, 3, 4]);

    fs::remove_dir_all(&test_dir).ok();
}
