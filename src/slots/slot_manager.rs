//! Mapping of tracker identities onto the fixed slot array.

use std::cmp::Ordering;
use std::collections::HashMap;

use tracing::debug;

use crate::config::CandidateOrder;
use crate::slots::observation::{NormalizedObservation, TrackId};
use crate::slots::slot::Slot;

/// Per-slot result of one assignment pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assignment {
    /// Still bound to the same track, observed this frame
    Retained,
    /// Was empty, now bound to a new track
    Filled,
    /// Taken over by a larger candidate; `previous` lost its slot
    Evicted { previous: TrackId },
    /// Bound, but its track was not observed this frame
    Missed,
    /// Empty and nothing left to fill it with
    Vacant,
}

/// Retain / fill / evict policy over a slot array.
///
/// Candidates are put into a deterministic order before the fill step so that
/// identical inputs always produce identical bindings, whatever order the
/// tracker reported them in.
#[derive(Debug, Clone, Default)]
pub struct SlotManager {
    candidate_order: CandidateOrder,
}

impl SlotManager {
    pub fn new(candidate_order: CandidateOrder) -> Self {
        Self { candidate_order }
    }

    /// Run one frame of assignment. Attaches this frame's observation to each
    /// slot that receives one and clears it on the others.
    pub fn assign(
        &self,
        slots: &mut [Slot],
        observations: Vec<NormalizedObservation>,
    ) -> Vec<Assignment> {
        let mut candidates = dedup_by_track(observations);
        let mut assignments: Vec<Assignment> = slots
            .iter_mut()
            .map(|slot| {
                slot.last_observation = None;
                if slot.bound_track_id.is_some() {
                    Assignment::Missed
                } else {
                    Assignment::Vacant
                }
            })
            .collect();

        // Step 1: retain existing bindings
        for (slot, assignment) in slots.iter_mut().zip(assignments.iter_mut()) {
            let Some(track_id) = slot.bound_track_id else {
                continue;
            };
            if let Some(pos) = candidates.iter().position(|o| o.track_id == track_id) {
                slot.last_observation = Some(candidates.swap_remove(pos));
                *assignment = Assignment::Retained;
            }
        }

        // Step 2: fill empty slots in index order
        self.order_candidates(&mut candidates);
        let mut pending = candidates.into_iter();
        for (slot, assignment) in slots.iter_mut().zip(assignments.iter_mut()) {
            if slot.bound_track_id.is_some() {
                continue;
            }
            let Some(observation) = pending.next() else {
                break;
            };
            debug!(slot = slot.index(), track_id = %observation.track_id, "slot filled");
            bind(slot, observation);
            *assignment = Assignment::Filled;
        }

        // Step 3: a single largest-vs-smallest swap
        let challenger = pending.max_by(|a, b| by_size_then_id(a, b).reverse());
        if let Some(challenger) = challenger {
            let weakest = slots
                .iter()
                .filter_map(|slot| slot.last_observation.map(|o| (slot.index(), o.size)))
                .min_by(|(ia, sa), (ib, sb)| sa.total_cmp(sb).then(ia.cmp(ib)));

            if let Some((index, size)) = weakest
                && challenger.size > size
            {
                let slot = &mut slots[index];
                if let Some(previous) = slot.bound_track_id {
                    debug!(
                        slot = index,
                        evicted = %previous,
                        track_id = %challenger.track_id,
                        "slot taken over by larger candidate"
                    );
                    assignments[index] = Assignment::Evicted { previous };
                }
                bind(slot, challenger);
            }
        }

        assignments
    }

    /// Unbind a slot whose hold window has run out.
    pub fn release(&self, slot: &mut Slot) {
        if let Some(track_id) = slot.bound_track_id.take() {
            debug!(slot = slot.index(), %track_id, "slot released");
        }
        slot.last_observation = None;
    }

    fn order_candidates(&self, candidates: &mut [NormalizedObservation]) {
        match self.candidate_order {
            CandidateOrder::LargestFirst => candidates.sort_by(by_size_then_id),
            CandidateOrder::LowestTrackId => candidates.sort_by_key(|o| o.track_id),
        }
    }
}

fn bind(slot: &mut Slot, observation: NormalizedObservation) {
    slot.bound_track_id = Some(observation.track_id);
    slot.last_observation = Some(observation);
}

/// Larger size first, then lower track id.
fn by_size_then_id(a: &NormalizedObservation, b: &NormalizedObservation) -> Ordering {
    b.size
        .total_cmp(&a.size)
        .then_with(|| a.track_id.cmp(&b.track_id))
}

/// Keep one observation per track identity (the largest), preserving first-seen order.
fn dedup_by_track(observations: Vec<NormalizedObservation>) -> Vec<NormalizedObservation> {
    let mut index: HashMap<TrackId, usize> = HashMap::with_capacity(observations.len());
    let mut unique: Vec<NormalizedObservation> = Vec::with_capacity(observations.len());
    for observation in observations {
        match index.get(&observation.track_id) {
            Some(&i) => {
                if observation.size > unique[i].size {
                    unique[i] = observation;
                }
            }
            None => {
                index.insert(observation.track_id, unique.len());
                unique.push(observation);
            }
        }
    }
    unique
}
