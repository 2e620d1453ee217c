//! Secondary decoder: direct WAV reading via hound
//!
//! Redundant with symphonia for PCM WAV, but keeps plain WAV conversion
//! working even when the probe stumbles over unusual headers.

use crate::backend::{DecodeBackend, DecodedAudio};
use crate::audio::WavAudio;
use crate::error::Result;
use std::path::Path;

pub struct WavBackend;

impl DecodeBackend for WavBackend {
    fn name(&self) -> &'static str {
        "wav"
    }

    fn decode(&self, path: &Path, _target_sample_rate: u32) -> Result<DecodedAudio> {
        let audio = WavAudio::from_file(path)?;
        Ok(DecodedAudio {
            sample_rate: audio.sample_rate(),
            data: audio.data,
        })
    }
}
