//! Per-slot exponential smoothing with dropout hold.

use nalgebra::Vector3;

use crate::slots::observation::NormalizedObservation;

/// Value emitted by a slot that has no active target.
pub const SENTINEL: [f32; 3] = [-1.0, -1.0, 0.0];

/// What happened to a slot's filter on this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOutcome {
    /// A fresh observation was blended in
    Updated,
    /// No observation; the previous value is repeated
    Held,
    /// The hold window ran out; the slot must be unbound
    Released,
    /// Nothing bound and nothing observed
    Idle,
}

/// Smoothed numeric state of one slot.
///
/// `smoothed` is `Some` exactly while the slot is bound or holding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlotFilter {
    smoothed: Option<Vector3<f32>>,
    miss_count: u32,
}

impl SlotFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consecutive frames without an observation.
    #[inline]
    pub fn miss_count(&self) -> u32 {
        self.miss_count
    }

    #[inline]
    pub fn smoothed(&self) -> Option<Vector3<f32>> {
        self.smoothed
    }

    /// Forget all history. The next observation passes through unsmoothed.
    pub fn reset(&mut self) {
        self.smoothed = None;
        self.miss_count = 0;
    }

    /// Advance the filter by one frame.
    ///
    /// With an observation, `smoothed = alpha * previous + (1 - alpha) * observation`
    /// (the first observation after a reset is taken as is). Without one, the
    /// miss counter is incremented and the slot is released once it reaches
    /// `hold`.
    pub fn apply(
        &mut self,
        observation: Option<&NormalizedObservation>,
        alpha: f32,
        hold: u32,
    ) -> FilterOutcome {
        match (observation, self.smoothed) {
            (Some(obs), previous) => {
                let input = obs.as_vector();
                self.smoothed = Some(match previous {
                    Some(prev) if alpha > 0.0 => prev * alpha + input * (1.0 - alpha),
                    _ => input,
                });
                self.miss_count = 0;
                FilterOutcome::Updated
            }
            (None, Some(_)) => {
                self.miss_count += 1;
                if self.miss_count >= hold {
                    self.reset();
                    FilterOutcome::Released
                } else {
                    FilterOutcome::Held
                }
            }
            (None, None) => FilterOutcome::Idle,
        }
    }

    /// The `(x, y, size)` tuple to emit for the current frame.
    pub fn output(&self) -> [f32; 3] {
        match self.smoothed {
            Some(v) => [v.x, v.y, v.z],
            None => SENTINEL,
        }
    }
}
