//! Directory batch driver
//!
//! Non-recursive: converts every supported audio file directly inside the
//! directory, continuing past individual failures. No transactional
//! guarantee across the batch.

use crate::convert::{ConversionRequest, Converter};
use crate::error::{ConvertError, Result};
use std::path::{Path, PathBuf};

/// Extensions handed to the conversion pipeline (case-insensitive).
pub const AUDIO_EXTENSIONS: [&str; 6] = ["m4a", "mp3", "flac", "ogg", "wav", "aac"];

#[derive(Debug)]
pub struct BatchOutcome {
    pub input: PathBuf,
    pub result: Result<PathBuf>,
}

/// Enumerate supported audio files in `dir`, sorted for deterministic order.
pub fn find_audio_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| ConvertError::io(format!("Cannot read directory {}: {}", dir.display(), e)))?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && has_audio_extension(path))
        .collect();

    files.sort();
    Ok(files)
}

fn has_audio_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            AUDIO_EXTENSIONS.iter().any(|known| *known == ext)
        })
        .unwrap_or(false)
}

/// Convert every supported file in `dir`. Individual failures are recorded
/// in the outcome list, never propagated.
pub fn convert_all(
    converter: &Converter,
    dir: &Path,
    output_dir: Option<&Path>,
    sample_rate: u32,
) -> Result<Vec<BatchOutcome>> {
    let files = find_audio_files(dir)?;

    if let Some(out_dir) = output_dir {
        std::fs::create_dir_all(out_dir).map_err(|e| {
            ConvertError::write(format!(
                "Cannot create output directory {}: {}",
                out_dir.display(),
                e
            ))
        })?;
    }

    let mut outcomes = Vec::with_capacity(files.len());

    for input in files {
        let mut request = ConversionRequest::new(&input, sample_rate);

        if let Some(out_dir) = output_dir {
            let stem = input
                .file_stem()
                .map(|s| s.to_os_string())
                .unwrap_or_else(|| "output".into());
            let mut name = stem;
            name.push(".wav");
            request = request.with_output(out_dir.join(name));
        }

        let result = converter.convert(&request);
        outcomes.push(BatchOutcome { input, result });
    }

    Ok(outcomes)
}

pub fn succeeded(outcomes: &[BatchOutcome]) -> usize {
    outcomes.iter().filter(|o| o.result.is_ok()).count()
}

pub fn failed(outcomes: &[BatchOutcome]) -> usize {
    outcomes.iter().filter(|o| o.result.is_err()).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use tempfile::TempDir;

    fn write_mono_wav(path: &Path, sample_rate: u32, frames: usize) {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for i in 0..frames {
            writer.write_sample(((i % 100) as i16) * 100).unwrap();
        }
        writer.finalize().unwrap();
    }

    fn test_converter() -> Converter {
        let mut config = Config::default();
        config.tools.ffmpeg_path = "definitely-not-a-real-tool".into();
        Converter::new(&config)
    }

    #[test]
    fn test_find_audio_files_filters_and_sorts() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("b.mp3"), b"x").unwrap();
        std::fs::write(temp_dir.path().join("a.M4A"), b"x").unwrap();
        std::fs::write(temp_dir.path().join("notes.txt"), b"x").unwrap();
        std::fs::write(temp_dir.path().join("noext"), b"x").unwrap();
        std::fs::create_dir(temp_dir.path().join("sub.wav")).unwrap();

        let files = find_audio_files(temp_dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a.M4A", "b.mp3"]);
    }

    #[test]
    fn test_batch_continues_past_failures() {
        let temp_dir = TempDir::new().unwrap();
        write_mono_wav(&temp_dir.path().join("one.wav"), 16000, 1600);
        write_mono_wav(&temp_dir.path().join("two.wav"), 22050, 2205);
        std::fs::write(temp_dir.path().join("broken.m4a"), b"not audio").unwrap();

        let out_dir = temp_dir.path().join("out");
        let outcomes = convert_all(
            &test_converter(),
            temp_dir.path(),
            Some(&out_dir),
            16000,
        )
        .unwrap();

        assert_eq!(outcomes.len(), 3);
        assert_eq!(succeeded(&outcomes), 2);
        assert_eq!(failed(&outcomes), 1);
        assert!(out_dir.join("one.wav").exists());
        assert!(out_dir.join("two.wav").exists());
        assert!(!out_dir.join("broken.wav").exists());
    }

    #[test]
    fn test_batch_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let outcomes = convert_all(&test_converter(), temp_dir.path(), None, 16000).unwrap();
        assert!(outcomes.is_empty());
    }

    #[test]
    fn test_batch_missing_directory() {
        let result = find_audio_files(Path::new("/nonexistent/dir"));
        assert!(result.is_err());
    }
}
