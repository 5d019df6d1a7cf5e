mod frame_translator;
mod observation;
mod rect;
mod slot;
mod slot_filter;
mod slot_manager;
mod slot_state;
mod slot_tracker;

pub use frame_translator::FrameTranslator;
pub use observation::{Detection, NormalizedObservation, TrackId};
pub use rect::Rect;
pub use slot::Slot;
pub use slot_filter::{FilterOutcome, SENTINEL, SlotFilter};
pub use slot_manager::{Assignment, SlotManager};
pub use slot_state::SlotState;
pub use slot_tracker::{FrameOutput, SlotOutput, SlotTracker};
