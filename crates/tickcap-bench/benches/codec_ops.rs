//! Criterion micro-benchmarks for the replay codec.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use tickcap_bench::{assemble_frames, lobby_profile};
use tickcap_core::Frame;
use tickcap_replay::codec::{decode_frame_into, encode_frame};
use tickcap_replay::{ReplayReader, ReplayWriter};

fn lobby_frame() -> Frame {
    let frames = assemble_frames(&lobby_profile(2));
    frames.into_iter().last().unwrap_or_default()
}

/// Benchmark: Encode a full-lobby frame with bones.
fn bench_encode_lobby_frame(c: &mut Criterion) {
    let frame = lobby_frame();
    let mut buf = Vec::with_capacity(16 * 1024);

    c.bench_function("codec_encode_lobby_frame", |b| {
        b.iter(|| {
            buf.clear();
            encode_frame(&mut buf, black_box(&frame));
            black_box(&buf);
        });
    });
}

/// Benchmark: Decode the same frame into a reused destination.
fn bench_decode_lobby_frame(c: &mut Criterion) {
    let frame = lobby_frame();
    let mut encoded = Vec::new();
    encode_frame(&mut encoded, &frame);
    let mut dst = Frame::default();

    c.bench_function("codec_decode_lobby_frame", |b| {
        b.iter(|| {
            decode_frame_into(black_box(&encoded), &mut dst).unwrap();
            black_box(&dst);
        });
    });
}

/// Benchmark: Write one second of capture (600 frames) to memory.
fn bench_write_one_second(c: &mut Criterion) {
    let frames = assemble_frames(&lobby_profile(600));
    let mut group = c.benchmark_group("replay_write");
    group.throughput(Throughput::Elements(frames.len() as u64));

    group.bench_function("sequential_600", |b| {
        b.iter(|| {
            let mut writer = ReplayWriter::new(Vec::with_capacity(8 << 20)).unwrap();
            for frame in &frames {
                writer.write_frame(frame).unwrap();
            }
            black_box(writer.finish().unwrap());
        });
    });

    group.bench_function("batch_600", |b| {
        b.iter(|| {
            let mut writer = ReplayWriter::new(Vec::with_capacity(8 << 20)).unwrap();
            writer.write_frame_batch(&frames).unwrap();
            black_box(writer.finish().unwrap());
        });
    });
    group.finish();
}

/// Benchmark: Read one second of capture back into a reused frame.
fn bench_read_one_second(c: &mut Criterion) {
    let frames = assemble_frames(&lobby_profile(600));
    let mut writer = ReplayWriter::new(Vec::new()).unwrap();
    writer.write_frame_batch(&frames).unwrap();
    let bytes = writer.finish().unwrap();

    let mut group = c.benchmark_group("replay_read");
    group.throughput(Throughput::Bytes(bytes.len() as u64));
    group.bench_function("read_600", |b| {
        let mut frame = Frame::default();
        b.iter(|| {
            let mut reader = ReplayReader::from_reader(bytes.as_slice()).unwrap();
            while reader.read_frame_to(&mut frame).unwrap() {}
            black_box(reader.frames_read());
        });
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_encode_lobby_frame,
    bench_decode_lobby_frame,
    bench_write_one_second,
    bench_read_one_second
);
criterion_main!(benches);
