//! Translation of pixel-space detections into normalized observations.

use tracing::{trace, warn};

use crate::config::SlotConfig;
use crate::slots::observation::{Detection, NormalizedObservation};

/// Stateless filter and normalizer for one frame of detections.
#[derive(Debug, Clone)]
pub struct FrameTranslator {
    classes: Vec<String>,
    min_area: f32,
    min_confidence: f32,
}

impl FrameTranslator {
    pub fn new(config: &SlotConfig) -> Self {
        let classes = config
            .classes
            .iter()
            .map(|c| c.trim().to_lowercase())
            .filter(|c| !c.is_empty())
            .collect();
        Self {
            classes,
            min_area: config.min_area,
            min_confidence: config.min_confidence,
        }
    }

    /// Whether `label` is in the class allow-list.
    pub fn accepts_class(&self, label: &str) -> bool {
        let label = label.trim().to_lowercase();
        self.classes.iter().any(|c| *c == label)
    }

    /// Normalize one frame's detections.
    ///
    /// Detections without a track identity, of a class outside the allow-list,
    /// below the confidence gate, or smaller than `min_area` are dropped, as are
    /// boxes with non-finite coordinates or area.
    ///
    /// The returned order follows the input order and carries no meaning.
    pub fn translate(
        &self,
        detections: &[Detection],
        width: u32,
        height: u32,
    ) -> Vec<NormalizedObservation> {
        if width == 0 || height == 0 {
            warn!(width, height, "frame has no area, dropping its detections");
            return Vec::new();
        }

        let frame_w = width as f32;
        let frame_h = height as f32;
        let frame_area = frame_w * frame_h;

        let mut observations = Vec::with_capacity(detections.len());

        for det in detections {
            let Some(track_id) = det.track_id else {
                continue;
            };
            if !(det.confidence >= self.min_confidence) || !self.accepts_class(&det.class_label) {
                continue;
            }

            let size = det.bbox.area() / frame_area;
            if !size.is_finite() || size < self.min_area {
                continue;
            }

            let (cx, cy) = det.bbox.center();
            if !cx.is_finite() || !cy.is_finite() {
                continue;
            }
            observations.push(NormalizedObservation {
                track_id,
                x: (cx / frame_w).clamp(0.0, 1.0),
                y: (cy / frame_h).clamp(0.0, 1.0),
                size,
            });
        }

        trace!(
            detections = detections.len(),
            observations = observations.len(),
            "translated frame"
        );
        observations
    }
}
