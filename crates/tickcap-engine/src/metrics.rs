//! Per-processor counters.
//!
//! [`ProcessMetrics`] is updated by every
//! [`process_frame`](crate::FrameProcessor::process_frame) call and read
//! back by the capture loop for logging or backpressure decisions.

use tickcap_core::{DomainEvent, EventKind};

/// Counters collected by a [`FrameProcessor`](crate::FrameProcessor).
///
/// All counts are cumulative since construction or the last reset.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProcessMetrics {
    /// Frames assembled successfully.
    pub frames_processed: u64,
    /// Events attached to assembled frames.
    pub events_emitted: u64,
    /// Calls rejected with a decode error.
    pub decode_failures: u64,
    /// Wall-clock time of the most recent successful call, in microseconds.
    pub last_process_us: u64,
    /// Events emitted, indexed by [`EventKind::tag`].
    pub events_by_kind: [u64; EventKind::ALL.len()],
}

impl ProcessMetrics {
    /// Count one batch of emitted events.
    pub fn record_events(&mut self, events: &[DomainEvent]) {
        self.events_emitted += events.len() as u64;
        for event in events {
            self.events_by_kind[event.kind().tag() as usize] += 1;
        }
    }

    /// Events of `kind` emitted so far.
    pub fn events_of(&self, kind: EventKind) -> u64 {
        self.events_by_kind[kind.tag() as usize]
    }
}
