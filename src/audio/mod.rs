//! Audio buffers and WAV IO
//!
//! Decoded audio is held as f32 buffers (mono or frames x channels).
//! WAV reading and writing goes through hound.

pub mod converter;
pub mod wav;

pub use converter::SampleRateConverter;
pub use wav::{AudioData, AudioFormat, AudioHeader, WavAudio};
