//! Per-frame inputs to the slot engine.

use std::fmt;

use nalgebra::Vector3;
use serde::{Deserialize, Deserializer, Serialize};

use crate::slots::rect::Rect;

/// Identity assigned by the external multi-object tracker.
///
/// Stable for as long as the tracker keeps observing the same physical object,
/// not across occlusion or re-entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(pub u64);

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for TrackId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Detection input from the detector/tracker collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Tracker identity; `None` when the tracker has not assigned one yet
    #[serde(default, deserialize_with = "deserialize_track_id")]
    pub track_id: Option<TrackId>,
    /// Bounding box in pixel space (TLWH format)
    pub bbox: Rect,
    /// Detection confidence score
    pub confidence: f32,
    /// Detector class name, e.g. "sports ball"
    pub class_label: String,
}

impl Detection {
    pub fn new(
        track_id: u64,
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        confidence: f32,
        class_label: impl Into<String>,
    ) -> Self {
        Self {
            track_id: Some(TrackId(track_id)),
            bbox: Rect::from_tlbr(x1, y1, x2, y2),
            confidence,
            class_label: class_label.into(),
        }
    }
}

/// Trackers report unassigned boxes with a negative id.
fn deserialize_track_id<'de, D>(deserializer: D) -> Result<Option<TrackId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<i64>::deserialize(deserializer)?;
    Ok(raw.and_then(|id| u64::try_from(id).ok()).map(TrackId))
}

/// A detection translated into frame-relative coordinates.
///
/// `x` and `y` are the box center with the origin at the top-left of the frame,
/// `size` is box area over frame area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedObservation {
    pub track_id: TrackId,
    pub x: f32,
    pub y: f32,
    pub size: f32,
}

impl NormalizedObservation {
    pub fn new(track_id: u64, x: f32, y: f32, size: f32) -> Self {
        Self {
            track_id: TrackId(track_id),
            x,
            y,
            size,
        }
    }

    /// The `(x, y, size)` tuple as a vector for component-wise smoothing.
    #[inline]
    pub fn as_vector(&self) -> Vector3<f32> {
        Vector3::new(self.x, self.y, self.size)
    }
}
