//! Last-resort decoder: ffmpeg invoked as a subprocess
//!
//! ffmpeg does the down-mix and rate conversion itself (`-ac 1 -ar <rate>`)
//! and streams raw f32 samples to stdout, so the returned audio is already
//! mono at the target rate. Every invocation runs under a bounded timeout;
//! expiry kills the process and counts as a backend failure.

use crate::backend::{DecodeBackend, DecodedAudio};
use crate::audio::AudioData;
use crate::error::{ConvertError, Result};
use ndarray::Array1;
use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(25);

pub struct FfmpegBackend {
    program: String,
    timeout: Duration,
}

impl FfmpegBackend {
    pub fn new<S: Into<String>>(program: S, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    /// Installation hints printed when the tool is missing. Purely
    /// informational; absence is never an error by itself.
    pub fn install_instructions() -> &'static str {
        "ffmpeg was not found on the executable search path.\n\
         The subprocess fallback backend is disabled without it.\n\
         \n\
         Installation options:\n\
           conda install -c conda-forge ffmpeg\n\
           sudo apt install ffmpeg          (Ubuntu/Debian)\n\
           brew install ffmpeg              (macOS)\n\
           https://ffmpeg.org/download.html"
    }

    fn wait_with_timeout(&self, child: &mut Child) -> Result<ExitStatus> {
        let deadline = Instant::now() + self.timeout;

        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(status);
            }

            if Instant::now() >= deadline {
                child.kill().ok();
                child.wait().ok();
                return Err(ConvertError::decode(format!(
                    "{} timed out after {:?}",
                    self.program, self.timeout
                )));
            }

            thread::sleep(POLL_INTERVAL);
        }
    }
}

impl DecodeBackend for FfmpegBackend {
    fn name(&self) -> &'static str {
        "ffmpeg"
    }

    fn is_available(&self) -> bool {
        Command::new(&self.program)
            .arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    fn decode(&self, path: &Path, target_sample_rate: u32) -> Result<DecodedAudio> {
        let mut child = Command::new(&self.program)
            .arg("-hide_banner")
            .arg("-loglevel")
            .arg("error")
            .arg("-i")
            .arg(path)
            .arg("-f")
            .arg("f32le")
            .arg("-acodec")
            .arg("pcm_f32le")
            .arg("-ac")
            .arg("1")
            .arg("-ar")
            .arg(target_sample_rate.to_string())
            .arg("pipe:1")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                ConvertError::backend_unavailable(format!("Cannot run {}: {}", self.program, e))
            })?;

        // Drain both pipes on threads so a full pipe buffer cannot stall
        // the child while we poll for exit.
        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| ConvertError::decode("Failed to capture ffmpeg stdout"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| ConvertError::decode("Failed to capture ffmpeg stderr"))?;

        let stdout_reader = thread::spawn(move || {
            let mut buf = Vec::new();
            stdout.read_to_end(&mut buf).map(|_| buf)
        });
        let stderr_reader = thread::spawn(move || {
            let mut buf = String::new();
            stderr.read_to_string(&mut buf).map(|_| buf)
        });

        let status = self.wait_with_timeout(&mut child)?;

        let raw = stdout_reader
            .join()
            .map_err(|_| ConvertError::decode("ffmpeg stdout reader panicked"))?
            .unwrap_or_default();
        let errors = stderr_reader
            .join()
            .map_err(|_| ConvertError::decode("ffmpeg stderr reader panicked"))?
            .unwrap_or_default();

        if !status.success() {
            let reason = errors.trim();
            return Err(ConvertError::decode(format!(
                "{} exited with {}: {}",
                self.program,
                status,
                if reason.is_empty() { "no error output" } else { reason }
            )));
        }

        let samples = parse_f32le(&raw);
        if samples.is_empty() {
            return Err(ConvertError::decode(format!(
                "{} produced no audio for {}",
                self.program,
                path.display()
            )));
        }

        Ok(DecodedAudio {
            data: AudioData::Mono(Array1::from(samples)),
            sample_rate: target_sample_rate,
        })
    }
}

fn parse_f32le(raw: &[u8]) -> Vec<f32> {
    raw.chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}
