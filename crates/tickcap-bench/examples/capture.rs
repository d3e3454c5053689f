//! End-to-end capture example.
//!
//! Demonstrates: load config → process payloads → record on a background
//! writer → read the log back → tally events. Run with `RUST_LOG=debug`
//! to see pipeline logging.

use std::collections::BTreeMap;
use std::time::{Duration, SystemTime};

use log::info;
use tickcap_bench::match_profile;
use tickcap_core::{EventKind, Frame};
use tickcap_engine::{open_capture, BackgroundWriter, CaptureConfig, FrameProcessor};
use tickcap_replay::ReplayWriter;

const CONFIG: &str = r#"{
    "tick_rate_hz": 600.0,
    "writer": { "flush_threshold": 32768 }
}"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    println!("=== tickcap capture example ===\n");

    let config = CaptureConfig::from_json(CONFIG)?;
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("match.tcap");

    // --- Capture: 10 seconds of a scripted match ---
    let payloads = match_profile(6000);
    let writer = ReplayWriter::create_with_config(&path, config.writer)?;
    let background = BackgroundWriter::spawn(writer, &config)?;
    let mut processor = FrameProcessor::new();

    let start = SystemTime::now();
    let tick = Duration::from_secs_f64(1.0 / config.tick_rate_hz);
    for (i, p) in payloads.iter().enumerate() {
        let at = start + tick * i as u32;
        let frame = processor.process_frame(&p.session, &p.bones, at)?;
        background.send(frame)?;
    }
    background.finish()?;

    let metrics = processor.metrics();
    info!("last tick took {}us", metrics.last_process_us);
    println!(
        "Captured {} frames, {} events, {} decode failures",
        metrics.frames_processed, metrics.events_emitted, metrics.decode_failures
    );
    println!("Log size: {} bytes\n", std::fs::metadata(&path)?.len());

    // --- Playback ---
    let mut reader = open_capture(&path, &config)?;
    let mut frame = Frame::default();
    let mut by_kind: BTreeMap<EventKind, usize> = BTreeMap::new();
    while reader.read_frame_to(&mut frame)? {
        for event in &frame.events {
            *by_kind.entry(event.kind()).or_default() += 1;
        }
    }
    println!("Read back {} frames", reader.frames_read());
    for kind in EventKind::ALL {
        let name = format!("{kind:?}");
        println!("  {name:<24} {}", by_kind.get(&kind).copied().unwrap_or(0));
    }

    println!("\n=== Done ===");
    Ok(())
}
