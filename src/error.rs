//! Error types for configuration, frame sources and message sinks.
//!
//! The per-frame slot engine itself has no failure modes; everything here
//! belongs to the edges of the crate.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Rejected configuration. Raised before a [`crate::SlotTracker`] exists.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("max_slots must be at least 1")]
    NoSlots,
    #[error("ema factor must lie in [0, 1), got {0}")]
    EmaOutOfRange(f32),
    #[error("min_area must be a finite, non-negative fraction of the frame, got {0}")]
    InvalidMinArea(f32),
    #[error("min_confidence must lie in [0, 1], got {0}")]
    InvalidMinConfidence(f32),
    #[error("at least one class label must be allowed")]
    NoClasses,
    #[error("OSC address `{0}` must start with '/' and must not contain whitespace or '#'")]
    InvalidAddress(String),
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure while delivering messages downstream.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to open UDP socket: {0}")]
    Bind(#[source] io::Error),
    #[error("could not resolve OSC target `{0}`")]
    Resolve(String),
    #[error("failed to send OSC packet: {0}")]
    Send(#[source] io::Error),
}

/// Failure while reading frames from a recorded detection stream.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read frame stream: {0}")]
    Io(#[from] io::Error),
    #[error("malformed frame on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}
