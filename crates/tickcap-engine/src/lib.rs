//! Frame processing and recording pipeline for tickcap.
//!
//! Turns raw per-tick telemetry payloads into assembled
//! [`Frame`](tickcap_core::Frame)s and persists them.
//!
//! # Components
//!
//! - [`FrameDecoder`]: raw bytes to snapshots ([`JsonFrameDecoder`] for
//!   the game's JSON API)
//! - [`FrameProcessor`]: frame counter + decode → detect → assemble
//! - [`CaptureRecorder`]: processor and replay writer driven in one call
//! - [`BackgroundWriter`]: replay writer moved onto its own thread behind a
//!   bounded channel
//! - [`CaptureConfig`]: validated settings for all of the above
//!
//! Nothing here installs a logger; diagnostics go through the `log`
//! facade.

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod background;
pub mod config;
pub mod decode;
pub mod error;
pub mod metrics;
pub mod processor;
pub mod recorder;

pub use background::BackgroundWriter;
pub use config::{CaptureConfig, ConfigError, DEFAULT_TICK_RATE_HZ, MAX_CHANNEL_CAPACITY};
pub use decode::{FrameDecoder, JsonFrameDecoder};
pub use error::{DecodeError, PayloadKind, RecordError};
pub use metrics::ProcessMetrics;
pub use processor::FrameProcessor;
pub use recorder::{open_capture, CaptureRecorder};
