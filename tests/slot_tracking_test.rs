use slottrack_rs::integration::{RecordingSink, frame_messages};
use slottrack_rs::{
    Detection, DetectionBuilder, Frame, FrameSource, OscArg, OutputConfig, SENTINEL, Settings, SlotConfig,
    SlotPipeline, SlotState, SlotTracker, TrackId,
};

fn ball(track_id: u64, x1: f32, y1: f32, x2: f32, y2: f32) -> Detection {
    DetectionBuilder::new()
        .track_id(track_id)
        .tlbr(x1, y1, x2, y2)
        .confidence(0.9)
        .class_label("sports ball")
        .build()
}

#[test]
fn test_hold_then_release_scenario() {
    let mut tracker = SlotTracker::new(SlotConfig {
        max_slots: 2,
        hold: 2,
        ema: 0.0,
        ..SlotConfig::default()
    })
    .unwrap();

    // Frame 1: track A fills slot 0, 20x20 on a 100x100 frame is size 0.04
    let out1 = tracker.update(&[ball(1, 40.0, 40.0, 60.0, 60.0)], 100, 100);
    assert_eq!(out1.slots[0].track_id, Some(TrackId(1)));
    assert_eq!(out1.slots[0].state, SlotState::Bound);
    assert!((out1.slots[0].value[0] - 0.5).abs() < 1e-6);
    assert!((out1.slots[0].value[1] - 0.5).abs() < 1e-6);
    assert!((out1.slots[0].value[2] - 0.04).abs() < 1e-6);
    assert_eq!(out1.slots[1].value, SENTINEL);
    assert_eq!(out1.active_count, 1);

    // Frame 2: no detections, slot 0 holds frame 1's value
    let out2 = tracker.update(&[], 100, 100);
    assert_eq!(out2.slots[0].state, SlotState::Holding);
    assert_eq!(tracker.slots()[0].miss_count(), 1);
    assert_eq!(out2.slots[0].value, out1.slots[0].value);
    assert_eq!(out2.active_count, 1);

    // Frame 3: still nothing, the hold window is exhausted
    let out3 = tracker.update(&[], 100, 100);
    assert_eq!(out3.slots[0].state, SlotState::Empty);
    assert_eq!(out3.slots[0].track_id, None);
    assert_eq!(out3.slots[0].value, SENTINEL);
    assert_eq!(out3.active_count, 0);

    let messages = frame_messages(&out3, &OutputConfig::default());
    assert_eq!(
        messages[0].args,
        vec![OscArg::Float(-1.0), OscArg::Float(-1.0), OscArg::Float(0.0)]
    );
    assert_eq!(messages[2].args, vec![OscArg::Int(0)]);
}

#[test]
fn test_eviction_of_smallest_slot() {
    let mut tracker = SlotTracker::new(SlotConfig {
        max_slots: 3,
        min_area: 0.0,
        ema: 0.0,
        ..SlotConfig::default()
    })
    .unwrap();

    // sizes 0.01, 0.02, 0.03 and 0.05 on a 100x100 frame
    let small = ball(1, 0.0, 0.0, 10.0, 10.0);
    let medium = ball(2, 0.0, 0.0, 10.0, 20.0);
    let large = ball(3, 0.0, 0.0, 10.0, 30.0);
    let newcomer = ball(4, 0.0, 0.0, 10.0, 50.0);

    tracker.update(&[small.clone(), medium.clone(), large.clone()], 100, 100);
    let slot_of_small = tracker
        .slots()
        .iter()
        .position(|s| s.bound_track_id() == Some(TrackId(1)))
        .unwrap();

    let out = tracker.update(&[small, medium, large, newcomer], 100, 100);
    assert_eq!(out.slots[slot_of_small].track_id, Some(TrackId(4)));
    assert!((out.slots[slot_of_small].value[2] - 0.05).abs() < 1e-6);
    assert_eq!(out.active_count, 3);
}

#[test]
fn test_binding_uniqueness_and_retention_over_many_frames() {
    let mut tracker = SlotTracker::new(SlotConfig {
        max_slots: 3,
        hold: 3,
        ..SlotConfig::default()
    })
    .unwrap();

    let mut previous: Vec<Option<TrackId>> = vec![None; 3];
    for frame in 0..200u64 {
        // a deterministic churn of up to six tracks with varying sizes
        let detections: Vec<Detection> = (0..6u64)
            .filter(|id| (frame * 7 + id * 3) % 5 != 0)
            .map(|id| {
                let side = 10.0 + ((frame + id * 11) % 17) as f32;
                let x = (id * 40) as f32;
                ball(id, x, 20.0, x + side, 20.0 + side)
            })
            .collect();
        let seen: Vec<TrackId> = detections.iter().filter_map(|d| d.track_id).collect();

        let out = tracker.update(&detections, 320, 240);

        let mut bound: Vec<TrackId> = out.slots.iter().filter_map(|s| s.track_id).collect();
        let total = bound.len();
        bound.sort();
        bound.dedup();
        assert_eq!(bound.len(), total, "track bound to two slots at frame {frame}");

        for (index, prev) in previous.iter().enumerate() {
            if let Some(id) = prev
                && seen.contains(id)
                && out.slots[index].track_id != Some(*id)
            {
                // the only way to lose a visible track is to be moved by nobody:
                // it must not show up in another slot
                assert!(
                    out.slots.iter().all(|s| s.track_id != Some(*id)),
                    "track {id} moved from slot {index} at frame {frame}"
                );
            }
        }

        for (slot, out_slot) in tracker.slots().iter().zip(&out.slots) {
            assert!(slot.miss_count() < 3);
            if out_slot.state == SlotState::Empty {
                assert_eq!(out_slot.value, SENTINEL);
            }
        }
        assert_eq!(
            out.active_count,
            out.slots.iter().filter(|s| s.state.is_active()).count()
        );

        previous = out.slots.iter().map(|s| s.track_id).collect();
    }
}

struct ScriptedSource {
    frames: std::vec::IntoIter<Frame>,
}

impl FrameSource for ScriptedSource {
    type Error = std::convert::Infallible;

    fn next_frame(&mut self) -> Result<Option<Frame>, Self::Error> {
        Ok(self.frames.next())
    }
}

#[test]
fn test_pipeline_publishes_every_slot_every_frame() {
    let frames = vec![
        Frame {
            width: 200,
            height: 100,
            detections: vec![
                ball(10, 0.0, 0.0, 40.0, 40.0),
                DetectionBuilder::new()
                    .track_id(11)
                    .tlwh(100.0, 0.0, 40.0, 40.0)
                    .confidence(0.9)
                    .class_label("person")
                    .build(),
            ],
        },
        Frame {
            width: 200,
            height: 100,
            detections: vec![],
        },
    ];

    let mut settings = Settings::default();
    settings.slots.max_slots = 2;
    settings.output.base_path = "/obj".to_string();
    settings.output.count_path = "/obj/count".to_string();

    let source = ScriptedSource {
        frames: frames.into_iter(),
    };
    let mut pipeline = SlotPipeline::new(source, RecordingSink::new(), settings).unwrap();
    assert_eq!(pipeline.run().unwrap(), 2);

    let addresses: Vec<&str> = pipeline
        .sink()
        .messages
        .iter()
        .map(|m| m.address.as_str())
        .collect();
    assert_eq!(
        addresses,
        vec!["/obj/1", "/obj/2", "/obj/count", "/obj/1", "/obj/2", "/obj/count"]
    );
    assert_eq!(pipeline.sink().messages[2].args, vec![OscArg::Int(1)]);
}
