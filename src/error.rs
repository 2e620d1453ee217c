//! Error types

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// One failed decode attempt, recorded per backend.
#[derive(Debug, Clone)]
pub struct BackendFailure {
    pub backend: String,
    pub reason: String,
}

impl fmt::Display for BackendFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.backend, self.reason)
    }
}

/// Main error type
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Decode error: {message}")]
    Decode { message: String },

    #[error("Backend unavailable: {message}")]
    BackendUnavailable { message: String },

    #[error("Write error: {message}")]
    Write { message: String },

    #[error("Config error: {message}")]
    Config { message: String },

    #[error("IO error: {message}")]
    Io { message: String },

    #[error("all backends failed for {} ({} attempts)", .path.display(), .attempts.len())]
    AllBackendsFailed {
        path: PathBuf,
        attempts: Vec<BackendFailure>,
    },

    #[error("no files converted: {failed} of {total} inputs failed")]
    BatchFailed { failed: usize, total: usize },
}

impl ConvertError {
    pub fn decode<S: Into<String>>(msg: S) -> Self {
        Self::Decode { message: msg.into() }
    }

    pub fn backend_unavailable<S: Into<String>>(msg: S) -> Self {
        Self::BackendUnavailable { message: msg.into() }
    }

    pub fn write<S: Into<String>>(msg: S) -> Self {
        Self::Write { message: msg.into() }
    }

    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config { message: msg.into() }
    }

    pub fn io<S: Into<String>>(msg: S) -> Self {
        Self::Io { message: msg.into() }
    }

    /// Per-backend failure reasons, for reporting after exhaustion.
    pub fn attempts(&self) -> &[BackendFailure] {
        match self {
            Self::AllBackendsFailed { attempts, .. } => attempts,
            _ => &[],
        }
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;

impl From<std::io::Error> for ConvertError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string())
    }
}

impl From<hound::Error> for ConvertError {
    fn from(err: hound::Error) -> Self {
        Self::decode(err.to_string())
    }
}

impl From<symphonia::core::errors::Error> for ConvertError {
    fn from(err: symphonia::core::errors::Error) -> Self {
        Self::decode(err.to_string())
    }
}
