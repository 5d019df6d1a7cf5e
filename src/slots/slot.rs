//! Persistent output slot.

use crate::slots::observation::{NormalizedObservation, TrackId};
use crate::slots::slot_filter::SlotFilter;
use crate::slots::slot_state::SlotState;

/// One entry of the fixed slot array.
///
/// Binding (`bound_track_id`, `last_observation`) is written only by the
/// [`SlotManager`](crate::slots::SlotManager); the numeric state lives in the
/// slot's [`SlotFilter`].
#[derive(Debug, Clone, Default)]
pub struct Slot {
    index: usize,
    pub(crate) bound_track_id: Option<TrackId>,
    pub(crate) last_observation: Option<NormalizedObservation>,
    pub(crate) filter: SlotFilter,
}

impl Slot {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            ..Self::default()
        }
    }

    /// 0-based position in the slot array.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn bound_track_id(&self) -> Option<TrackId> {
        self.bound_track_id
    }

    /// Observation attached by the slot manager for the current frame.
    #[inline]
    pub fn last_observation(&self) -> Option<&NormalizedObservation> {
        self.last_observation.as_ref()
    }

    #[inline]
    pub fn miss_count(&self) -> u32 {
        self.filter.miss_count()
    }

    pub fn state(&self) -> SlotState {
        match self.bound_track_id {
            None => SlotState::Empty,
            Some(_) if self.filter.miss_count() > 0 => SlotState::Holding,
            Some(_) => SlotState::Bound,
        }
    }

    /// The `(x, y, size)` tuple currently emitted by this slot.
    #[inline]
    pub fn value(&self) -> [f32; 3] {
        self.filter.output()
    }
}
