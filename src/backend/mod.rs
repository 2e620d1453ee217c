//! Decoding backends
//!
//! Each backend turns a compressed audio file into raw f32 samples. The
//! orchestrator walks them in priority order and takes the first success:
//! symphonia (in-process, covers M4A/MP3/FLAC/OGG/AAC and more), direct
//! WAV reading via hound, then an ffmpeg subprocess as the last resort.

pub mod ffmpeg;
pub mod symphonia;
pub mod wav;

use crate::audio::AudioData;
use crate::config::Config;
use crate::error::Result;
use std::path::Path;

pub use ffmpeg::FfmpegBackend;
pub use symphonia::SymphoniaBackend;
pub use wav::WavBackend;

/// Raw decoded audio at the backend's native (or, for the subprocess
/// backend, already-converted) rate.
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    pub data: AudioData,
    pub sample_rate: u32,
}

/// A decoding strategy.
pub trait DecodeBackend {
    /// Short name used in progress and error messages.
    fn name(&self) -> &'static str;

    /// Whether the backend can run at all in this environment.
    fn is_available(&self) -> bool {
        true
    }

    /// Decode the file into raw samples. `target_sample_rate` is a hint;
    /// backends that can convert during decode may return audio already at
    /// that rate, everything else returns the native rate.
    fn decode(&self, path: &Path, target_sample_rate: u32) -> Result<DecodedAudio>;
}

/// Ordered strategy list used by the orchestrator.
pub fn default_backends(config: &Config) -> Vec<Box<dyn DecodeBackend>> {
    vec![
        Box::new(SymphoniaBackend),
        Box::new(WavBackend),
        Box::new(FfmpegBackend::new(
            config.ffmpeg_path(),
            config.ffmpeg_timeout(),
        )),
    ]
}
