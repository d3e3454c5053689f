//! tickcap: high-frequency game telemetry capture with event detection and
//! compact binary replay logs.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! tickcap sub-crates. For most users, adding `tickcap` as a single dependency
//! is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use std::time::SystemTime;
//! use tickcap::prelude::*;
//!
//! let mut recorder = CaptureRecorder::new(ReplayWriter::new(Vec::new()).unwrap());
//!
//! let empty = br#"{"game_status": "playing", "teams": [{"team": "BLUE TEAM"}]}"#;
//! let joined = br#"{
//!     "game_status": "playing",
//!     "teams": [{"team": "BLUE TEAM", "players": [{"playerid": 1, "name": "Player1"}]}]
//! }"#;
//! recorder.record(empty, b"", SystemTime::now()).unwrap();
//! let frame = recorder.record(joined, b"", SystemTime::now()).unwrap();
//! assert_eq!(frame.index, FrameIndex(1));
//! assert!(matches!(frame.events[0], DomainEvent::PlayerJoined(_)));
//!
//! let log = recorder.finish().unwrap();
//! let frames: Vec<Frame> = ReplayReader::from_reader(log.as_slice())
//!     .unwrap()
//!     .frames()
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//! assert_eq!(frames.len(), 2);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `tickcap-core` | Snapshots, events, frames, IDs |
//! | [`detect`] | `tickcap-detect` | Event detection between consecutive snapshots |
//! | [`replay`] | `tickcap-replay` | Binary replay log writer, reader and codec |
//! | [`engine`] | `tickcap-engine` | Payload decoding, frame processing, recording |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Snapshots, events, frames and IDs (`tickcap-core`).
///
/// Contains [`types::SessionSnapshot`], [`types::BonesSnapshot`],
/// [`types::DomainEvent`] and [`types::Frame`].
pub use tickcap_core as types;

/// Event detection (`tickcap-detect`).
///
/// [`detect::EventDetector`] diffs each session snapshot against the state
/// it retained from the previous one.
pub use tickcap_detect as detect;

/// Binary replay logs (`tickcap-replay`).
///
/// Record frames with [`replay::ReplayWriter`] and play them back with
/// [`replay::ReplayReader`].
pub use tickcap_replay as replay;

/// Frame processing and recording (`tickcap-engine`).
///
/// [`engine::FrameProcessor`] for decode → detect → assemble,
/// [`engine::CaptureRecorder`] to also write each frame, and
/// [`engine::BackgroundWriter`] to move writing off the capture thread.
pub use tickcap_engine as engine;

/// Common imports for typical tickcap usage.
///
/// ```rust
/// use tickcap::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use tickcap_core::{
        BonesSnapshot, DomainEvent, EventKind, Frame, FrameIndex, SessionSnapshot, SlotId,
        Timestamp,
    };

    // Detection
    pub use tickcap_detect::EventDetector;

    // Replay
    pub use tickcap_replay::{ReplayError, ReplayReader, ReplayWriter};

    // Engine
    pub use tickcap_engine::{
        open_capture, BackgroundWriter, CaptureConfig, CaptureRecorder, DecodeError,
        FrameProcessor, RecordError,
    };
}
