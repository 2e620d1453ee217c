//! Conversion orchestrator
//!
//! Walks the ordered backend list for one input file. Each backend is tried
//! exactly once: decode, down-mix to mono, resample when the native rate
//! differs, write mono 16-bit PCM WAV. The first success wins; exhaustion
//! returns the per-backend failure reasons.

use crate::audio::{AudioFormat, SampleRateConverter, WavAudio};
use crate::backend::{default_backends, DecodeBackend};
use crate::config::Config;
use crate::error::{BackendFailure, ConvertError, Result};
use std::path::{Path, PathBuf};

/// One conversion job. Consumed by a single orchestration pass.
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    pub input_path: PathBuf,
    pub output_path: Option<PathBuf>,
    pub sample_rate: u32,
}

impl ConversionRequest {
    pub fn new<P: Into<PathBuf>>(input_path: P, sample_rate: u32) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: None,
            sample_rate,
        }
    }

    pub fn with_output<P: Into<PathBuf>>(mut self, output_path: P) -> Self {
        self.output_path = Some(output_path.into());
        self
    }

    /// Output path, defaulting to the input path with a `.wav` extension.
    pub fn resolved_output(&self) -> PathBuf {
        match &self.output_path {
            Some(path) => path.clone(),
            None => self.input_path.with_extension("wav"),
        }
    }
}

pub struct Converter {
    backends: Vec<Box<dyn DecodeBackend>>,
}

impl Converter {
    pub fn new(config: &Config) -> Self {
        Self {
            backends: default_backends(config),
        }
    }

    pub fn with_backends(backends: Vec<Box<dyn DecodeBackend>>) -> Self {
        Self { backends }
    }

    pub fn backend_names(&self) -> Vec<&'static str> {
        self.backends.iter().map(|b| b.name()).collect()
    }

    /// Convert one file, trying each backend in order.
    pub fn convert(&self, request: &ConversionRequest) -> Result<PathBuf> {
        let output = request.resolved_output();
        let mut attempts: Vec<BackendFailure> = Vec::new();

        for backend in &self.backends {
            if !backend.is_available() {
                log::info!("Backend {} is not available, skipping", backend.name());
                attempts.push(BackendFailure {
                    backend: backend.name().to_string(),
                    reason: "not available".to_string(),
                });
                continue;
            }

            log::info!(
                "Trying {} for {}",
                backend.name(),
                request.input_path.display()
            );

            match self.try_backend(backend.as_ref(), request, &output) {
                Ok(()) => {
                    log::info!(
                        "Converted {} -> {} via {}",
                        request.input_path.display(),
                        output.display(),
                        backend.name()
                    );
                    return Ok(output);
                }
                Err(e) => {
                    log::warn!("Backend {} failed: {}", backend.name(), e);
                    attempts.push(BackendFailure {
                        backend: backend.name().to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        Err(ConvertError::AllBackendsFailed {
            path: request.input_path.clone(),
            attempts,
        })
    }

    fn try_backend(
        &self,
        backend: &dyn DecodeBackend,
        request: &ConversionRequest,
        output: &Path,
    ) -> Result<()> {
        let decoded = backend.decode(&request.input_path, request.sample_rate)?;

        let mono = decoded.data.to_mono();
        let mono = if decoded.sample_rate == request.sample_rate {
            mono
        } else {
            SampleRateConverter::resample(mono.view(), decoded.sample_rate, request.sample_rate)?
        };

        let guard = OutputGuard::new(output);
        WavAudio::new_mono(request.sample_rate, mono, AudioFormat::Int16).save_to_file(output)?;
        guard.commit();

        Ok(())
    }
}

/// Scoped output acquisition: removes a freshly created output file when the
/// write attempt fails. A pre-existing file (including in-place
/// `foo.wav -> foo.wav` conversion) is never deleted.
struct OutputGuard {
    path: PathBuf,
    existed_before: bool,
    committed: bool,
}

impl OutputGuard {
    fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            existed_before: path.exists(),
            committed: false,
        }
    }

    fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for OutputGuard {
    fn drop(&mut self) {
        if !self.committed && !self.existed_before && self.path.exists() {
            if let Err(e) = std::fs::remove_file(&self.path) {
                log::warn!(
                    "Failed to remove partial output {}: {}",
                    self.path.display(),
                    e
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioData;
    use crate::backend::DecodedAudio;
    use ndarray::Array1;
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
            let s = ((i as f32 * 0.05).sin() * 12000.0) as i16;
            writer.write_sample(s).unwrap();
            writer.write_sample(s / 2).unwrap();
        }
        writer.finalize().unwrap();
    }

    fn test_converter() -> Converter {
        let mut config = Config::default();
        // Point the subprocess backend at a missing tool so tests never
        // depend on a local ffmpeg install.
        config.tools.ffmpeg_path = "definitely-not-a-real-tool".into();
        Converter::new(&config)
    }

    #[test]
    fn test_resolved_output_defaults_to_wav_extension() {
        let request = ConversionRequest::new("/tmp/voice.m4a", 16000);
        assert_eq!(request.resolved_output(), PathBuf::from("/tmp/voice.wav"));

        let request = request.with_output("/tmp/custom.wav");
        assert_eq!(request.resolved_output(), PathBuf::from("/tmp/custom.wav"));
    }

    #[test]
    fn test_convert_produces_mono_at_target_rate() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("voice.wav");
        write_stereo_wav(&input, 44100, 44100);

        let output_path = temp_dir.path().join("out.wav");
        let request =
            ConversionRequest::new(&input, 16000).with_output(&output_path);

        let result = test_converter().convert(&request).unwrap();
        assert_eq!(result, output_path);

        let reader = hound::WavReader::open(&output_path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 16000);
        // One second of input stays one second of output
        assert!((reader.len() as i64 - 16000).abs() <= 1);
    }

    #[test]
    fn test_convert_native_rate_preserves_sample_count() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("native.wav");
        write_stereo_wav(&input, 16000, 8000);

        let output_path = temp_dir.path().join("native_out.wav");
        let request =
            ConversionRequest::new(&input, 16000).with_output(&output_path);

        test_converter().convert(&request).unwrap();

        let reader = hound::WavReader::open(&output_path).unwrap();
        assert_eq!(reader.len(), 8000);
    }

    #[test]
    fn test_convert_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("voice.wav");
        write_stereo_wav(&input, 44100, 4410);

        let out_a = temp_dir.path().join("a.wav");
        let out_b = temp_dir.path().join("b.wav");
        let converter = test_converter();

        converter
            .convert(&ConversionRequest::new(&input, 16000).with_output(&out_a))
            .unwrap();
        converter
            .convert(&ConversionRequest::new(&input, 16000).with_output(&out_b))
            .unwrap();

        let bytes_a = std::fs::read(&out_a).unwrap();
        let bytes_b = std::fs::read(&out_b).unwrap();
        assert_eq!(bytes_a, bytes_b);
    }

    #[test]
    fn test_convert_exhausts_all_backends_on_corrupt_input() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("corrupt.m4a");
        std::fs::write(&input, b"not audio").unwrap();

        let request = ConversionRequest::new(&input, 16000);
        let err = test_converter().convert(&request).unwrap_err();

        // symphonia, wav, ffmpeg: one recorded attempt each
        assert_eq!(err.attempts().len(), 3);
        assert!(!input.with_extension("wav").exists());
    }

    #[test]
    fn test_failing_backend_then_success() {
        struct FailingBackend;
        impl DecodeBackend for FailingBackend {
            fn name(&self) -> &'static str {
                "failing"
            }
            fn decode(&self, _path: &Path, _rate: u32) -> Result<DecodedAudio> {
                Err(ConvertError::decode("always fails"))
            }
        }

        struct SilenceBackend;
        impl DecodeBackend for SilenceBackend {
            fn name(&self) -> &'static str {
                "silence"
            }
            fn decode(&self, _path: &Path, rate: u32) -> Result<DecodedAudio> {
                Ok(DecodedAudio {
                    data: AudioData::Mono(Array1::zeros(100)),
                    sample_rate: rate,
                })
            }
        }

        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("silence.wav");
        let converter =
            Converter::with_backends(vec![Box::new(FailingBackend), Box::new(SilenceBackend)]);

        let request = ConversionRequest::new("whatever.m4a", 16000).with_output(&output);
        converter.convert(&request).unwrap();
        assert!(output.exists());
    }

    #[test]
    fn test_output_guard_removes_new_file_on_failure() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("partial.wav");

        {
            let _guard = OutputGuard::new(&path);
            std::fs::write(&path, b"partial data").unwrap();
            // dropped without commit
        }
        assert!(!path.exists());
    }

    #[test]
    fn test_output_guard_keeps_committed_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("done.wav");

        let guard = OutputGuard::new(&path);
        std::fs::write(&path, b"finished").unwrap();
        guard.commit();
        assert!(path.exists());
    }

    #[test]
    fn test_output_guard_never_deletes_preexisting_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("existing.wav");
        std::fs::write(&path, b"original").unwrap();

        {
            let _guard = OutputGuard::new(&path);
            // failure path: no commit
        }
        assert!(path.exists());
    }
}
