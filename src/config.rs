//! Configuration consumed by the slot engine and its integrations.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Order in which unassigned candidates are offered to empty slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateOrder {
    /// Largest normalized size first, then lowest track id.
    #[default]
    LargestFirst,
    /// Lowest track id first.
    LowestTrackId,
}

/// Configuration for the slot engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotConfig {
    /// Detector class labels to accept, matched case-insensitively
    pub classes: Vec<String>,
    /// Number of output slots, fixed for the process lifetime
    pub max_slots: usize,
    /// Minimum box area as a fraction of the frame area
    pub min_area: f32,
    /// Minimum detection confidence
    pub min_confidence: f32,
    /// EMA weight of the previous smoothed value, in [0, 1); 0 disables smoothing
    pub ema: f32,
    /// Frames a bound slot tolerates without an observation before release
    pub hold: u32,
    pub candidate_order: CandidateOrder,
}

impl Default for SlotConfig {
    fn default() -> Self {
        Self {
            classes: vec!["sports ball".to_string()],
            max_slots: 3,
            min_area: 0.0008,
            min_confidence: 0.25,
            ema: 0.25,
            hold: 12,
            candidate_order: CandidateOrder::LargestFirst,
        }
    }
}

impl SlotConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_slots == 0 {
            return Err(ConfigError::NoSlots);
        }
        if !(0.0..1.0).contains(&self.ema) {
            return Err(ConfigError::EmaOutOfRange(self.ema));
        }
        if !self.min_area.is_finite() || self.min_area < 0.0 {
            return Err(ConfigError::InvalidMinArea(self.min_area));
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(ConfigError::InvalidMinConfidence(self.min_confidence));
        }
        if self.classes.iter().all(|c| c.trim().is_empty()) {
            return Err(ConfigError::NoClasses);
        }
        Ok(())
    }
}

/// Addressing and destination of the outbound OSC messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Per-slot address prefix; slot `n` is sent to `<base_path>/<n>`
    pub base_path: String,
    /// Address of the active-slot count message
    pub count_path: String,
    pub host: String,
    pub port: u16,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            base_path: "/ball".to_string(),
            count_path: "/balls/count".to_string(),
            host: "127.0.0.1".to_string(),
            port: 9000,
        }
    }
}

impl OutputConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_address(&self.base_path)?;
        validate_address(&self.count_path)?;
        if self.base_path.len() > 1 && self.base_path.ends_with('/') {
            return Err(ConfigError::InvalidAddress(self.base_path.clone()));
        }
        Ok(())
    }

    /// Address for the 0-based slot `index`.
    pub fn slot_address(&self, index: usize) -> String {
        format!("{}/{}", self.base_path.trim_end_matches('/'), index + 1)
    }
}

fn validate_address(address: &str) -> Result<(), ConfigError> {
    if !address.starts_with('/') || address.chars().any(|c| c.is_whitespace() || c == '#') {
        return Err(ConfigError::InvalidAddress(address.to_string()));
    }
    Ok(())
}

/// Complete settings file: `{ "slots": { .. }, "output": { .. } }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub slots: SlotConfig,
    pub output: OutputConfig,
}

impl Settings {
    /// Load settings from a JSON file. Missing fields take their defaults.
    ///
    /// The result is not validated; call [`Settings::validate`] after applying
    /// any overrides.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.slots.validate()?;
        self.output.validate()
    }
}
