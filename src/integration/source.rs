//! Trait for the detector/tracker collaborator that supplies frames.

use std::io::BufRead;

use serde::{Deserialize, Serialize};

use crate::error::SourceError;
use crate::slots::Detection;

/// One frame of tracked detections plus the frame's pixel dimensions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub detections: Vec<Detection>,
}

/// Polled source of tracked frames.
///
/// Implement this trait to connect any detector + tracker combination to the
/// slot pipeline. Returning `Ok(None)` ends the stream.
///
/// # Example
///
/// ```ignore
/// use slottrack_rs::{Frame, FrameSource};
///
/// struct MyTracker {
///     // Your detector and tracker here
/// }
///
/// impl FrameSource for MyTracker {
///     type Error = std::io::Error;
///
///     fn next_frame(&mut self) -> Result<Option<Frame>, Self::Error> {
///         // Grab an image, detect, track, and report
///         Ok(None)
///     }
/// }
/// ```
pub trait FrameSource {
    /// Error type for capture or inference failures.
    type Error;

    /// Block until the next frame is ready and return it.
    fn next_frame(&mut self) -> Result<Option<Frame>, Self::Error>;
}

/// Recorded frames, one JSON object per line. Blank lines are skipped.
pub struct JsonLinesSource<R> {
    reader: R,
    line: usize,
    buf: String,
}

impl<R: BufRead> JsonLinesSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            buf: String::new(),
        }
    }
}

impl<R: BufRead> FrameSource for JsonLinesSource<R> {
    type Error = SourceError;

    fn next_frame(&mut self) -> Result<Option<Frame>, Self::Error> {
        loop {
            self.buf.clear();
            if self.reader.read_line(&mut self.buf)? == 0 {
                return Ok(None);
            }
            self.line += 1;

            let text = self.buf.trim();
            if text.is_empty() {
                continue;
            }
            return serde_json::from_str(text)
                .map(Some)
                .map_err(|source| SourceError::Parse {
                    line: self.line,
                    source,
                });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slots::TrackId;

    #[test]
    fn test_reads_frames_and_skips_blank_lines() {
        let data = r#"{"width":640,"height":480,"detections":[{"track_id":4,"bbox":{"x":10,"y":20,"width":30,"height":40},"confidence":0.8,"class_label":"sports ball"}]}

{"width":640,"height":480}
"#;
        let mut source = JsonLinesSource::new(data.as_bytes());

        let first = source.next_frame().unwrap().unwrap();
        assert_eq!(first.detections.len(), 1);
        assert_eq!(first.detections[0].track_id, Some(TrackId(4)));

        let second = source.next_frame().unwrap().unwrap();
        assert!(second.detections.is_empty());

        assert!(source.next_frame().unwrap().is_none());
    }

    #[test]
    fn test_negative_track_id_means_unassigned() {
        let data = r#"{"width":100,"height":100,"detections":[{"track_id":-1,"bbox":{"x":0,"y":0,"width":50,"height":50},"confidence":0.9,"class_label":"sports ball"}]}"#;
        let mut source = JsonLinesSource::new(data.as_bytes());

        let frame = source.next_frame().unwrap().unwrap();
        assert_eq!(frame.detections.len(), 1);
        assert_eq!(frame.detections[0].track_id, None);
    }

    #[test]
    fn test_reports_line_of_malformed_frame() {
        let data = "{\"width\":1,\"height\":1}\n{not json}\n";
        let mut source = JsonLinesSource::new(data.as_bytes());

        source.next_frame().unwrap();
        match source.next_frame() {
            Err(SourceError::Parse { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected parse error, got {other:?}"),
        }
    }
}
