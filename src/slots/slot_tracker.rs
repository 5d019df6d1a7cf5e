//! Per-frame Translator → Manager → Filter pass.

use tracing::{debug, trace};

use crate::config::SlotConfig;
use crate::error::ConfigError;
use crate::slots::frame_translator::FrameTranslator;
use crate::slots::observation::{Detection, NormalizedObservation, TrackId};
use crate::slots::slot::Slot;
use crate::slots::slot_filter::FilterOutcome;
use crate::slots::slot_manager::{Assignment, SlotManager};
use crate::slots::slot_state::SlotState;

/// Emitted state of one slot for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotOutput {
    /// 0-based slot index
    pub index: usize,
    pub track_id: Option<TrackId>,
    pub state: SlotState,
    /// `(x, y, size)`, or the sentinel when `state` is `Empty`
    pub value: [f32; 3],
}

/// Everything emitted for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutput {
    pub frame_id: u64,
    pub slots: Vec<SlotOutput>,
    /// Number of slots that are bound or holding
    pub active_count: usize,
}

/// Owner of the slot array and driver of the per-frame pipeline.
pub struct SlotTracker {
    config: SlotConfig,
    translator: FrameTranslator,
    manager: SlotManager,
    slots: Box<[Slot]>,
    frame_id: u64,
}

impl SlotTracker {
    /// Validate `config` and allocate the slot array.
    pub fn new(config: SlotConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let slots = (0..config.max_slots).map(Slot::new).collect();
        Ok(Self {
            translator: FrameTranslator::new(&config),
            manager: SlotManager::new(config.candidate_order),
            slots,
            frame_id: 0,
            config,
        })
    }

    pub fn config(&self) -> &SlotConfig {
        &self.config
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Number of frames processed so far.
    pub fn frame_id(&self) -> u64 {
        self.frame_id
    }

    /// Process one frame of raw detections.
    pub fn update(&mut self, detections: &[Detection], width: u32, height: u32) -> FrameOutput {
        let observations = self.translator.translate(detections, width, height);
        self.update_observations(observations)
    }

    /// Process one frame of already normalized observations.
    pub fn update_observations(&mut self, observations: Vec<NormalizedObservation>) -> FrameOutput {
        self.frame_id += 1;

        let assignments = self.manager.assign(&mut self.slots, observations);

        for (slot, assignment) in self.slots.iter_mut().zip(assignments) {
            if let Assignment::Evicted { .. } = assignment {
                slot.filter.reset();
            }
            let observation = slot.last_observation;
            let outcome = slot
                .filter
                .apply(observation.as_ref(), self.config.ema, self.config.hold);
            if outcome == FilterOutcome::Released {
                debug!(slot = slot.index(), hold = self.config.hold, "hold window expired");
                self.manager.release(slot);
            }
        }

        let output = self.snapshot();
        trace!(
            frame_id = output.frame_id,
            active = output.active_count,
            "frame processed"
        );
        output
    }

    /// Current output without advancing a frame.
    pub fn snapshot(&self) -> FrameOutput {
        let slots: Vec<SlotOutput> = self
            .slots
            .iter()
            .map(|slot| SlotOutput {
                index: slot.index(),
                track_id: slot.bound_track_id(),
                state: slot.state(),
                value: slot.value(),
            })
            .collect();
        let active_count = slots.iter().filter(|s| s.state.is_active()).count();

        FrameOutput {
            frame_id: self.frame_id,
            slots,
            active_count,
        }
    }

    /// Unbind every slot and clear all smoothing state.
    pub fn reset(&mut self) {
        for slot in self.slots.iter_mut() {
            self.manager.release(slot);
            slot.filter.reset();
        }
        self.frame_id = 0;
    }
}
