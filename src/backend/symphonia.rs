//! Primary decoder backed by symphonia
//!
//! Covers the compressed formats enabled in Cargo.toml (mp3, flac, aac,
//! isomp4/m4a, vorbis) plus symphonia's default readers.

use crate::backend::{DecodeBackend, DecodedAudio};
use crate::audio::AudioData;
use crate::error::{ConvertError, Result};
use std::fs::File;
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

pub struct SymphoniaBackend;

impl DecodeBackend for SymphoniaBackend {
    fn name(&self) -> &'static str {
        "symphonia"
    }

    fn decode(&self, path: &Path, _target_sample_rate: u32) -> Result<DecodedAudio> {
        let file = File::open(path).map_err(|e| {
            ConvertError::decode(format!("Cannot open audio file {}: {}", path.display(), e))
        })?;

        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = path.extension() {
            hint.with_extension(ext.to_str().unwrap_or(""));
        }

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| ConvertError::decode(format!("Unsupported format: {}", e)))?;

        let mut format = probed.format;

        let track = format
            .default_track()
            .ok_or_else(|| ConvertError::decode("No audio track found"))?;
        let track_id = track.id;
        let codec_params = track.codec_params.clone();

        let mut decoder = symphonia::default::get_codecs()
            .make(&codec_params, &DecoderOptions::default())
            .map_err(|e| ConvertError::decode(format!("Unsupported codec: {}", e)))?;

        let mut samples: Vec<f32> = Vec::new();
        let mut sample_buf: Option<SampleBuffer<f32>> = None;
        let mut sample_rate = 0u32;
        let mut channels = 0usize;

        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    break;
                }
                Err(SymphoniaError::ResetRequired) => break,
                Err(e) => return Err(ConvertError::decode(format!("Demux error: {}", e))),
            };

            if packet.track_id() != track_id {
                continue;
            }

            match decoder.decode(&packet) {
                Ok(decoded) => {
                    let spec = *decoded.spec();
                    if sample_buf.is_none() {
                        sample_rate = spec.rate;
                        channels = spec.channels.count();
                        sample_buf = Some(SampleBuffer::new(decoded.capacity() as u64, spec));
                    }
                    if let Some(buf) = sample_buf.as_mut() {
                        buf.copy_interleaved_ref(decoded);
                        samples.extend_from_slice(buf.samples());
                    }
                }
                // Corrupt packets are skipped, not fatal
                Err(SymphoniaError::DecodeError(e)) => {
                    log::warn!("{}: skipping undecodable packet: {}", path.display(), e);
                }
                Err(e) => return Err(ConvertError::decode(format!("Decode error: {}", e))),
            }
        }

        if samples.is_empty() || sample_rate == 0 || channels == 0 {
            return Err(ConvertError::decode(format!(
                "No decodable audio in {}",
                path.display()
            )));
        }

        let data = AudioData::from_interleaved(samples, channels)?;

        Ok(DecodedAudio { data, sample_rate })
    }
}
