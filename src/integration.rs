//! Integration module for connecting detector/tracker outputs and message
//! transports with the slot engine.
//!
//! This module provides traits and utilities for feeding frames into a
//! [`SlotTracker`](crate::SlotTracker) and publishing its output as OSC.

mod builder;
mod osc;
mod pipeline;
mod sink;
mod source;

pub use builder::DetectionBuilder;
pub use osc::{OscArg, OscMessage, frame_messages};
pub use pipeline::SlotPipeline;
pub use sink::{LogSink, MessageSink, RecordingSink, UdpOscSink};
pub use source::{Frame, FrameSource, JsonLinesSource};
