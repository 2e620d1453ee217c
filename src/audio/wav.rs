//! WAV audio file reading and writing

use crate::error::{ConvertError, Result};
use hound::{SampleFormat, WavReader, WavWriter};
use ndarray::{Array1, Array2, Axis};
use std::fs::File;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Int16,
    Int24,
    Int32,
    Float32,
}

impl AudioFormat {
    pub fn name(&self) -> &'static str {
        match self {
            AudioFormat::Int16 => "int16",
            AudioFormat::Int24 => "int24",
            AudioFormat::Int32 => "int32",
            AudioFormat::Float32 => "float32",
        }
    }

    pub fn bytes_per_sample(&self) -> u16 {
        match self {
            AudioFormat::Int16 => 2,
            AudioFormat::Int24 => 3,
            AudioFormat::Int32 | AudioFormat::Float32 => 4,
        }
    }

    pub fn to_sample_format(self) -> SampleFormat {
        match self {
            AudioFormat::Float32 => SampleFormat::Float,
            _ => SampleFormat::Int,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AudioHeader {
    pub sample_rate: u32,
    pub channels: u16,
    pub format: AudioFormat,
    pub total_frames: u32,
    pub bits_per_sample: u16,
    pub duration: f64,
}

impl AudioHeader {
    pub fn new(sample_rate: u32, channels: u16, format: AudioFormat, total_frames: u32) -> Self {
        let bits_per_sample = format.bytes_per_sample() * 8;
        let duration = total_frames as f64 / sample_rate as f64;

        Self {
            sample_rate,
            channels,
            format,
            total_frames,
            bits_per_sample,
            duration,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(ConvertError::decode("Sample rate cannot be 0"));
        }

        if self.channels == 0 {
            return Err(ConvertError::decode("Channel count cannot be 0"));
        }

        if self.total_frames == 0 {
            return Err(ConvertError::decode("Audio contains no frames"));
        }

        Ok(())
    }

    pub fn to_wav_spec(&self) -> hound::WavSpec {
        hound::WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate,
            bits_per_sample: self.bits_per_sample,
            sample_format: self.format.to_sample_format(),
        }
    }
}

/// Decoded sample buffer. `Multi` holds frames x channels.
#[derive(Debug, Clone)]
pub enum AudioData {
    Mono(Array1<f32>),
    Multi(Array2<f32>),
}

impl AudioData {
    /// Number of frames (samples per channel).
    pub fn len(&self) -> usize {
        match self {
            AudioData::Mono(data) => data.len(),
            AudioData::Multi(data) => data.nrows(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn channels(&self) -> u16 {
        match self {
            AudioData::Mono(_) => 1,
            AudioData::Multi(data) => data.ncols() as u16,
        }
    }

    /// Down-mix to one channel by averaging sample values across channels.
    pub fn to_mono(&self) -> Array1<f32> {
        match self {
            AudioData::Mono(data) => data.clone(),
            AudioData::Multi(data) => data
                .mean_axis(Axis(1))
                .unwrap_or_else(|| Array1::zeros(0)),
        }
    }

    /// Build from interleaved samples. Frames with missing trailing samples
    /// are dropped.
    pub fn from_interleaved(samples: Vec<f32>, channels: usize) -> Result<Self> {
        if channels == 0 {
            return Err(ConvertError::decode("Channel count cannot be 0"));
        }

        if channels == 1 {
            return Ok(AudioData::Mono(Array1::from(samples)));
        }

        let frames = samples.len() / channels;
        let mut truncated = samples;
        truncated.truncate(frames * channels);

        let data = Array2::from_shape_vec((frames, channels), truncated)
            .map_err(|e| ConvertError::decode(format!("Invalid interleaved buffer: {}", e)))?;
        Ok(AudioData::Multi(data))
    }
}

#[derive(Debug, Clone)]
pub struct WavAudio {
    pub header: AudioHeader,
    pub data: AudioData,
}

impl WavAudio {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let file = File::open(path).map_err(|e| {
            ConvertError::decode(format!("Cannot open audio file {}: {}", path.display(), e))
        })?;

        let mut reader = WavReader::new(file)
            .map_err(|e| ConvertError::decode(format!("Cannot create WAV reader: {}", e)))?;

        let spec = reader.spec();

        if spec.sample_rate == 0 {
            return Err(ConvertError::decode("Invalid sample rate"));
        }
        if spec.channels == 0 {
            return Err(ConvertError::decode("Invalid channel count"));
        }

        let (samples, format): (Vec<f32>, AudioFormat) =
            match (spec.sample_format, spec.bits_per_sample) {
                (SampleFormat::Int, 16) => {
                    (read_samples::<i16>(&mut reader, 1.0 / 32768.0)?, AudioFormat::Int16)
                }
                (SampleFormat::Int, 24) => {
                    (read_samples::<i32>(&mut reader, 1.0 / 8388608.0)?, AudioFormat::Int24)
                }
                (SampleFormat::Int, 32) => {
                    (read_samples::<i32>(&mut reader, 1.0 / 2147483648.0)?, AudioFormat::Int32)
                }
                (SampleFormat::Float, 32) => {
                    (read_samples::<f32>(&mut reader, 1.0)?, AudioFormat::Float32)
                }
                (format, bits) => {
                    return Err(ConvertError::decode(format!(
                        "Unsupported WAV format: {:?} {} bit",
                        format, bits
                    )));
                }
            };

        let data = AudioData::from_interleaved(samples, spec.channels as usize)?;

        let header = AudioHeader {
            sample_rate: spec.sample_rate,
            channels: spec.channels,
            format,
            total_frames: data.len() as u32,
            bits_per_sample: spec.bits_per_sample,
            duration: data.len() as f64 / spec.sample_rate as f64,
        };

        header.validate()?;

        Ok(WavAudio { header, data })
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    ConvertError::write(format!("Cannot create output directory: {}", e))
                })?;
            }
        }

        let file = File::create(path).map_err(|e| {
            ConvertError::write(format!("Cannot create output file {}: {}", path.display(), e))
        })?;

        let spec = self.header.to_wav_spec();
        let mut writer = WavWriter::new(file, spec)
            .map_err(|e| ConvertError::write(format!("Cannot create WAV writer: {}", e)))?;

        match &self.data {
            AudioData::Mono(data) => {
                for &sample in data.iter() {
                    write_sample(&mut writer, sample, self.header.format)?;
                }
            }
            AudioData::Multi(data) => {
                for row in data.rows() {
                    for &sample in row.iter() {
                        write_sample(&mut writer, sample, self.header.format)?;
                    }
                }
            }
        }

        writer
            .finalize()
            .map_err(|e| ConvertError::write(format!("Failed to finalize WAV writing: {}", e)))?;

        Ok(())
    }

    pub fn new_mono(sample_rate: u32, data: Array1<f32>, format: AudioFormat) -> Self {
        let total_frames = data.len() as u32;
        let header = AudioHeader::new(sample_rate, 1, format, total_frames);

        WavAudio {
            header,
            data: AudioData::Mono(data),
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.header.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.header.channels
    }

    pub fn total_frames(&self) -> u32 {
        self.header.total_frames
    }

    pub fn duration(&self) -> f64 {
        self.header.duration
    }

    pub fn format(&self) -> AudioFormat {
        self.header.format
    }
}

fn read_samples<S>(reader: &mut WavReader<File>, scale: f32) -> Result<Vec<f32>>
where
    S: hound::Sample + Into<f64>,
{
    reader
        .samples::<S>()
        .map(|sample| {
            sample
                .map(|s| (Into::<f64>::into(s) as f32) * scale)
                .map_err(|e| ConvertError::decode(format!("Failed to read sample: {}", e)))
        })
        .collect()
}

fn write_sample(
    writer: &mut WavWriter<File>,
    sample: f32,
    format: AudioFormat,
) -> Result<()> {
    let clamped = sample.clamp(-1.0, 1.0);
    let result = match format {
        AudioFormat::Float32 => writer.write_sample(clamped),
        AudioFormat::Int16 => writer.write_sample((clamped * 32767.0) as i16),
        AudioFormat::Int24 => writer.write_sample((clamped * 8388607.0) as i32),
        AudioFormat::Int32 => writer.write_sample((clamped as f64 * 2147483647.0) as i32),
    };
    result.map_err(|e| ConvertError::write(format!("Failed to write sample: {}", e)))
}
