//! Stable output slots for tracked object detections.
//!
//! A detector + multi-object tracker reports a variable, unordered set of
//! identity-tagged boxes per frame. [`SlotTracker`] maps those identities onto a
//! fixed number of persistent slots, smooths each slot against detector jitter,
//! and bridges short dropouts, so that downstream consumers always see the same
//! number of channels. The [`integration`] module publishes the result as OSC.

pub mod config;
pub mod error;
pub mod integration;
pub mod slots;

pub use config::{CandidateOrder, OutputConfig, Settings, SlotConfig};
pub use error::{ConfigError, SinkError, SourceError};
pub use integration::{
    DetectionBuilder, Frame, FrameSource, MessageSink, OscArg, OscMessage, SlotPipeline,
};
pub use slots::{
    Detection, FrameOutput, NormalizedObservation, Rect, SENTINEL, SlotOutput, SlotState,
    SlotTracker, TrackId,
};
