//! Configuration management for audio conversion

use crate::error::{ConvertError, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub audio: AudioConfig,
    pub tools: ToolConfig,
    pub processing: ProcessingConfig,
    pub input_path: PathBuf,
    pub output_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub sample_rate: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    pub ffmpeg_path: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            audio: AudioConfig::default(),
            tools: ToolConfig::default(),
            processing: ProcessingConfig::default(),
            input_path: PathBuf::from("input.m4a"),
            output_path: None,
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self { sample_rate: 16000 }
    }
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: String::from("ffmpeg"),
            timeout_secs: 60,
        }
    }
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self { verbose: false }
    }
}

impl Config {
    /// Get target sample rate (convenience method)
    pub fn sample_rate(&self) -> u32 {
        self.audio.sample_rate
    }

    /// Get ffmpeg executable name or path (convenience method)
    pub fn ffmpeg_path(&self) -> &str {
        &self.tools.ffmpeg_path
    }

    /// Get subprocess decode timeout (convenience method)
    pub fn ffmpeg_timeout(&self) -> Duration {
        Duration::from_secs(self.tools.timeout_secs)
    }

    /// Get verbose mode (convenience method)
    pub fn verbose(&self) -> bool {
        self.processing.verbose
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "monowav", about = "Convert audio files to mono WAV", version)]
pub struct Args {
    #[arg(help = "Input audio file or directory")]
    pub input: PathBuf,

    #[arg(short = 'o', long = "output", help = "Output WAV file or directory")]
    pub output: Option<PathBuf>,

    #[arg(short = 'r', long = "sample-rate", default_value = "16000", help = "Target sample rate (Hz)")]
    pub sample_rate: u32,

    #[arg(long = "ffmpeg-path", default_value = "ffmpeg", help = "ffmpeg executable used by the subprocess backend")]
    pub ffmpeg_path: String,

    #[arg(long = "ffmpeg-timeout", default_value = "60", help = "Subprocess decode timeout (seconds)")]
    pub ffmpeg_timeout: u64,

    #[arg(short = 'v', long = "verbose", help = "Enable verbose output mode")]
    pub verbose: bool,

    #[arg(short = 'c', long = "config", help = "Config file path (TOML format)")]
    pub config_file: Option<PathBuf>,
}

impl Config {
    /// Create config from command line arguments and optional config file.
    /// Command line arguments override config file settings.
    pub fn from_args_and_config(args: Args) -> Result<Self> {
        let mut config = if let Some(config_path) = &args.config_file {
            Self::from_file(config_path)?
        } else {
            Self::default()
        };

        config.input_path = args.input;
        config.output_path = args.output;
        config.audio.sample_rate = args.sample_rate;
        config.tools.ffmpeg_path = args.ffmpeg_path;
        config.tools.timeout_secs = args.ffmpeg_timeout;
        config.processing.verbose = args.verbose;

        config.validate()?;

        Ok(config)
    }

    /// Load config from TOML config file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConvertError::config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| ConvertError::config(format!("Failed to parse config file: {}", e)))
    }

    /// Validate configuration parameter validity
    pub fn validate(&self) -> Result<()> {
        if self.audio.sample_rate == 0 {
            return Err(ConvertError::config("Sample rate must be greater than 0"));
        }
        if self.audio.sample_rate > 192000 {
            return Err(ConvertError::config("Sample rate cannot exceed 192000 Hz"));
        }

        if self.tools.timeout_secs == 0 {
            return Err(ConvertError::config("Subprocess timeout must be greater than 0"));
        }
        if self.tools.timeout_secs > 3600 {
            return Err(ConvertError::config("Subprocess timeout cannot exceed 3600 seconds"));
        }

        if self.tools.ffmpeg_path.is_empty() {
            return Err(ConvertError::config("ffmpeg path cannot be empty"));
        }

        Ok(())
    }

    /// Save config to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConvertError::config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| ConvertError::config(format!("Failed to write config file: {}", e)))
    }
}
