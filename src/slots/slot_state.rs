/// Slot state enumeration for the output channel lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlotState {
    /// Not bound to any track, emitting the sentinel
    #[default]
    Empty,
    /// Bound and observed this frame
    Bound,
    /// Bound but missed this frame, repeating the last smoothed value
    Holding,
}

impl SlotState {
    /// Whether the slot emits a real value rather than the sentinel.
    #[inline]
    pub fn is_active(self) -> bool {
        !matches!(self, SlotState::Empty)
    }
}
