//! End-to-end replay log tests: file-backed round trips, batch/sequential
//! byte identity and arbitrary frame contents.

use proptest::prelude::*;
use tickcap_core::{
    BonesSnapshot, DomainEvent, Frame, FrameIndex, SlotId, StatIncrement, Timestamp, UserBones,
};
use tickcap_replay::{ReplayError, ReplayReader, ReplayWriter, WriterConfig};
use tickcap_test_utils::{frame_with_every_event, player, scripted_match, SessionBuilder};

// ── Helpers ─────────────────────────────────────────────────────

fn scripted_frames(n: usize) -> Vec<Frame> {
    scripted_match(n)
        .into_iter()
        .enumerate()
        .map(|(i, session)| Frame {
            index: FrameIndex(i as u32),
            timestamp: Timestamp::new(1_700_000_000, (i as u32) * 1_666_667),
            session,
            bones: None,
            events: Vec::new(),
        })
        .collect()
}

fn write_all(frames: &[Frame], config: WriterConfig) -> Vec<u8> {
    let mut buf = Vec::new();
    let mut writer = ReplayWriter::with_config(&mut buf, config).unwrap();
    for frame in frames {
        writer.write_frame(frame).unwrap();
    }
    writer.finish().unwrap();
    buf
}

fn read_all(bytes: &[u8]) -> Vec<Frame> {
    let mut reader = ReplayReader::from_reader(bytes).unwrap();
    let mut out = Vec::new();
    let mut scratch = Frame::default();
    while reader.read_frame_to(&mut scratch).unwrap() {
        out.push(scratch.clone());
    }
    out
}

// ── File-backed ─────────────────────────────────────────────────

#[test]
fn file_roundtrip_through_tempdir() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("capture.tcap");
    let frames = scripted_frames(240);

    let mut writer = ReplayWriter::create(&path).unwrap();
    writer.write_frame_batch(&frames[..100]).unwrap();
    for frame in &frames[100..] {
        writer.write_frame(frame).unwrap();
    }
    assert_eq!(writer.frames_written(), 240);
    writer.close().unwrap();
    assert!(matches!(
        writer.write_frame(&frames[0]),
        Err(ReplayError::WriterClosed)
    ));

    let mut reader = ReplayReader::open(&path).unwrap();
    let mut scratch = Frame::default();
    let mut n = 0;
    while reader.read_frame_to(&mut scratch).unwrap() {
        assert_eq!(scratch, frames[n]);
        n += 1;
    }
    assert_eq!(n, frames.len());
    reader.close().unwrap();

    // "Rewind" is a reopen.
    let again = ReplayReader::open(&path).unwrap();
    assert_eq!(again.frames().count(), frames.len());
}

#[test]
fn opening_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = ReplayReader::open(dir.path().join("missing.tcap"));
    assert!(matches!(result, Err(ReplayError::Io(_))));
}

#[test]
fn file_truncated_mid_record_is_corrupt() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cut.tcap");
    let bytes = write_all(&scripted_frames(10), WriterConfig::default());
    std::fs::write(&path, &bytes[..bytes.len() - 3]).unwrap();

    let reader = ReplayReader::open(&path).unwrap();
    let results: Vec<_> = reader.frames().collect();
    assert_eq!(results.len(), 10);
    assert!(results[..9].iter().all(Result::is_ok));
    assert!(matches!(
        results[9],
        Err(ReplayError::CorruptRecord { .. })
    ));
}

// ── Byte identity ───────────────────────────────────────────────

#[test]
fn batch_is_byte_identical_to_sequential() {
    let mut frames = scripted_frames(300);
    frames.extend((300..310).map(frame_with_every_event));

    let sequential = write_all(&frames, WriterConfig::default());

    let mut batched = Vec::new();
    let mut writer = ReplayWriter::new(&mut batched).unwrap();
    for chunk in frames.chunks(37) {
        writer.write_frame_batch(chunk).unwrap();
    }
    writer.finish().unwrap();

    assert_eq!(sequential, batched);
    assert_eq!(read_all(&batched), frames);
}

#[test]
fn flush_threshold_does_not_change_bytes() {
    let frames = scripted_frames(120);
    let big = write_all(&frames, WriterConfig::default());
    let tiny = write_all(&frames, WriterConfig { flush_threshold: 0 });
    assert_eq!(big, tiny);
}

#[test]
fn buffer_size_tracks_unflushed_bytes() {
    let frames = scripted_frames(50);
    let mut sink = Vec::new();
    let config = WriterConfig {
        flush_threshold: 2048,
    };
    let mut writer = ReplayWriter::with_config(&mut sink, config).unwrap();
    for frame in &frames {
        writer.write_frame(frame).unwrap();
        assert!(writer.buffer_size() < 2048);
    }
    let pending = writer.buffer_size() as u64;
    let flushed = writer.bytes_flushed();
    writer.finish().unwrap();
    assert_eq!(sink.len() as u64, flushed + pending);
}

// ── Arbitrary frames ────────────────────────────────────────────

fn arb_frame() -> impl Strategy<Value = Frame> {
    (
        any::<u32>(),
        any::<i64>(),
        0u32..1_000_000_000,
        prop::collection::vec((0i32..16, "[a-zA-Z0-9 ]{0,12}", -1i32..10), 0..8),
        prop::option::of(prop::collection::vec(-1.0f32..1.0, 0..24)),
        prop::collection::vec((0i32..16, 0i32..100), 0..6),
        "\\PC{0,16}",
    )
        .prop_map(|(index, secs, nanos, roster, bones, stats, status)| {
            let session = SessionBuilder::new()
                .status(&status)
                .players(roster.into_iter().map(|(s, n, j)| player(s, &n, j)))
                .build();
            let bones = bones.map(|bone_t| BonesSnapshot {
                user_bones: vec![UserBones {
                    bone_o: bone_t.iter().map(|v| -v).collect(),
                    bone_t,
                }],
                err_code: 0,
                err_description: String::new(),
            });
            let events = stats
                .into_iter()
                .map(|(slot, total)| {
                    DomainEvent::PlayerStun(StatIncrement {
                        slot: SlotId(slot),
                        total,
                    })
                })
                .collect();
            Frame {
                index: FrameIndex(index),
                timestamp: Timestamp::new(secs, nanos),
                session,
                bones,
                events,
            }
        })
}

proptest! {
    #[test]
    fn arbitrary_frames_roundtrip(frames in prop::collection::vec(arb_frame(), 0..12)) {
        let bytes = write_all(&frames, WriterConfig { flush_threshold: 256 });
        prop_assert_eq!(read_all(&bytes), frames);
    }
}
