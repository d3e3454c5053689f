//! Decode → detect → assemble, once per tick.
//!
//! [`FrameProcessor`] owns the frame counter, an [`EventDetector`] and a
//! [`FrameDecoder`]. Each call decodes the raw payloads, stamps the next
//! index and the capture time, appends the detected events and hands back
//! the assembled [`Frame`].

use std::time::{Instant, SystemTime};

use log::{debug, trace};
use tickcap_core::{Frame, FrameIndex, Timestamp};
use tickcap_detect::EventDetector;

use crate::decode::{FrameDecoder, JsonFrameDecoder};
use crate::error::DecodeError;
use crate::metrics::ProcessMetrics;

/// Per-session frame assembly.
///
/// Single-threaded: drive one instance from one capture loop. Run one
/// processor per session for parallel captures.
///
/// The index increases by exactly one per successful call and returns to
/// zero only through [`reset`](Self::reset). It wraps after `u32::MAX`
/// frames. A call that fails to decode consumes no index and leaves the
/// detector untouched.
///
/// # Examples
///
/// ```
/// use std::time::SystemTime;
/// use tickcap_core::FrameIndex;
/// use tickcap_engine::FrameProcessor;
///
/// let mut processor = FrameProcessor::new();
/// let session = br#"{"game_status": "playing", "teams": []}"#;
/// let frame = processor.process_frame(session, b"", SystemTime::now()).unwrap();
/// assert_eq!(frame.index, FrameIndex(0));
/// assert!(frame.bones.is_none());
/// assert_eq!(processor.next_index(), FrameIndex(1));
/// ```
#[derive(Debug)]
pub struct FrameProcessor<D: FrameDecoder = JsonFrameDecoder> {
    next_index: FrameIndex,
    detector: EventDetector,
    decoder: D,
    metrics: ProcessMetrics,
}

impl FrameProcessor {
    /// A processor for JSON payloads.
    pub fn new() -> Self {
        Self::with_decoder(JsonFrameDecoder)
    }
}

impl Default for FrameProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: FrameDecoder> FrameProcessor<D> {
    /// A processor using `decoder` for raw payloads.
    pub fn with_decoder(decoder: D) -> Self {
        Self {
            next_index: FrameIndex(0),
            detector: EventDetector::new(),
            decoder,
            metrics: ProcessMetrics::default(),
        }
    }

    /// Assemble the next frame into a fresh [`Frame`].
    pub fn process_frame(
        &mut self,
        session: &[u8],
        bones: &[u8],
        timestamp: SystemTime,
    ) -> Result<Frame, DecodeError> {
        let mut frame = Frame::default();
        self.process_frame_into(&mut frame, session, bones, timestamp)?;
        Ok(frame)
    }

    /// Assemble the next frame into `dst`, reusing its event buffer.
    ///
    /// Every field of `dst` is overwritten on success. On error the
    /// session or bones of `dst` may already hold the new tick's data and
    /// the rest is stale.
    pub fn process_frame_into(
        &mut self,
        dst: &mut Frame,
        session: &[u8],
        bones: &[u8],
        timestamp: SystemTime,
    ) -> Result<(), DecodeError> {
        let start = Instant::now();
        let decoded = self
            .decoder
            .decode_session(session, &mut dst.session)
            .and_then(|()| self.decoder.decode_bones(bones, &mut dst.bones));
        if let Err(e) = decoded {
            self.metrics.decode_failures += 1;
            debug!("frame {} not assembled: {e}", self.next_index);
            return Err(e);
        }

        dst.index = self.next_index;
        dst.timestamp = Timestamp::from(timestamp);
        dst.events.clear();
        self.detector.add_frame_into(&dst.session, &mut dst.events);
        self.next_index = self.next_index.next();

        self.metrics.frames_processed += 1;
        self.metrics.record_events(&dst.events);
        self.metrics.last_process_us = start.elapsed().as_micros() as u64;
        if !dst.events.is_empty() {
            trace!("frame {} carries {} events", dst.index, dst.events.len());
        }
        Ok(())
    }

    /// Start a new capture session: index back to zero, detector state
    /// and metrics cleared. Allocations are kept.
    pub fn reset(&mut self) {
        debug!(
            "frame processor reset after {} frames",
            self.metrics.frames_processed
        );
        self.next_index = FrameIndex(0);
        self.detector.reset();
        self.metrics = ProcessMetrics::default();
    }

    /// Index the next successful call will assign.
    pub fn next_index(&self) -> FrameIndex {
        self.next_index
    }

    /// Counters since construction or the last reset.
    pub fn metrics(&self) -> &ProcessMetrics {
        &self.metrics
    }

    /// The event detector, for inspecting retained state.
    pub fn detector(&self) -> &EventDetector {
        &self.detector
    }

    /// The payload decoder.
    pub fn decoder(&self) -> &D {
        &self.decoder
    }
}
