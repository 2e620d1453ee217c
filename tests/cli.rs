//! End-to-end CLI tests

use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

fn write_stereo_wav(path: &Path, sample_rate: u32, frames: usize) {
    let spec = hound::WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for i in 0..frames {
        let s = ((i as f32 * 0.02).sin() * 9000.0) as i16;
        writer.write_sample(s).unwrap();
        writer.write_sample(-s).unwrap();
    }
    writer.finalize().unwrap();
}

#[test]
fn converts_single_file_to_mono_wav() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input = temp_dir.path().join("voice.wav");
    let output = temp_dir.path().join("voice_16k.wav");
    write_stereo_wav(&input, 44100, 4410);

    Command::cargo_bin("monowav")?
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .arg("-r")
        .arg("16000")
        .assert()
        .success()
        .stdout(predicate::str::contains("Converted:"));

    let reader = hound::WavReader::open(&output)?;
    assert_eq!(reader.spec().channels, 1);
    assert_eq!(reader.spec().sample_rate, 16000);

    Ok(())
}

#[test]
fn converts_directory_and_reports_summary() -> Result<()> {
    let temp_dir = TempDir::new()?;
    write_stereo_wav(&temp_dir.path().join("a.wav"), 22050, 2205);
    write_stereo_wav(&temp_dir.path().join("b.wav"), 44100, 4410);
    std::fs::write(temp_dir.path().join("broken.m4a"), b"not audio")?;

    let out_dir = temp_dir.path().join("converted");

    Command::cargo_bin("monowav")?
        .arg(temp_dir.path())
        .arg("-o")
        .arg(&out_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 converted, 1 failed"));

    assert!(out_dir.join("a.wav").exists());
    assert!(out_dir.join("b.wav").exists());
    assert!(!out_dir.join("broken.wav").exists());

    Ok(())
}

#[test]
fn fails_with_nonzero_exit_on_missing_input() -> Result<()> {
    Command::cargo_bin("monowav")?
        .arg("/nonexistent/voice.m4a")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a valid file or directory"));

    Ok(())
}

#[test]
fn fails_with_nonzero_exit_when_nothing_converts() -> Result<()> {
    let temp_dir = TempDir::new()?;
    std::fs::write(temp_dir.path().join("junk.m4a"), b"not audio")?;

    Command::cargo_bin("monowav")?
        .arg(temp_dir.path())
        .arg("--ffmpeg-path")
        .arg("definitely-not-a-real-tool")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no files converted"));

    Ok(())
}
