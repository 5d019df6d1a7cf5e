//! SlotPipeline for combining a frame source, the slot engine and a sink.

use tracing::{debug, warn};

use crate::config::{OutputConfig, Settings};
use crate::error::ConfigError;
use crate::integration::osc::frame_messages;
use crate::integration::sink::MessageSink;
use crate::integration::source::FrameSource;
use crate::slots::{FrameOutput, SlotTracker};

/// Runs frames from a `FrameSource` through a `SlotTracker` and publishes
/// every frame's output to a `MessageSink`.
///
/// Each frame is processed to completion before the next one is requested.
pub struct SlotPipeline<S: FrameSource, K: MessageSink> {
    source: S,
    tracker: SlotTracker,
    sink: K,
    output: OutputConfig,
}

impl<S: FrameSource, K: MessageSink> SlotPipeline<S, K> {
    /// Create a new pipeline. Fails if `settings` do not validate.
    pub fn new(source: S, sink: K, settings: Settings) -> Result<Self, ConfigError> {
        settings.output.validate()?;
        Ok(Self {
            source,
            tracker: SlotTracker::new(settings.slots)?,
            sink,
            output: settings.output,
        })
    }

    /// Create a new pipeline with default settings.
    pub fn with_default_config(source: S, sink: K) -> Result<Self, ConfigError> {
        Self::new(source, sink, Settings::default())
    }

    /// Pull, process and publish one frame.
    ///
    /// Returns `Ok(None)` once the source is exhausted. Delivery failures are
    /// logged and otherwise ignored.
    pub fn process_next(&mut self) -> Result<Option<FrameOutput>, S::Error> {
        let Some(frame) = self.source.next_frame()? else {
            return Ok(None);
        };

        let output = self
            .tracker
            .update(&frame.detections, frame.width, frame.height);
        self.publish(&output);
        Ok(Some(output))
    }

    /// Process frames until the source is exhausted. Returns the frame count.
    pub fn run(&mut self) -> Result<u64, S::Error> {
        let mut frames = 0;
        while self.process_next()?.is_some() {
            frames += 1;
        }
        debug!(frames, "frame source exhausted");
        Ok(frames)
    }

    fn publish(&mut self, output: &FrameOutput) {
        for message in frame_messages(output, &self.output) {
            if let Err(err) = self.sink.send(&message) {
                warn!(address = %message.address, error = %err, "dropping OSC message");
            }
        }
    }

    /// Get a reference to the underlying tracker.
    pub fn tracker(&self) -> &SlotTracker {
        &self.tracker
    }

    /// Get a reference to the underlying sink.
    pub fn sink(&self) -> &K {
        &self.sink
    }
}
