//! Event detection for tickcap telemetry capture.
//!
//! Turns consecutive [`SessionSnapshot`](tickcap_core::SessionSnapshot)s
//! into an ordered list of [`DomainEvent`](tickcap_core::DomainEvent)s.
//!
//! - [`EventDetector`] retains the previous frame and diffs each new one
//!   against it; [`EventDetector::reset`] starts over.
//! - [`detect_events`] is the pure two-snapshot form.
//! - [`DetectorState`] is the only memory kept between calls: the
//!   previous roster keyed by slot, scoreboard, disc state and game status.
//!
//! Detection is infallible. A live capture loop at 600 Hz must never be
//! interrupted by an odd snapshot, so missing data means "no event".

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod detector;
pub mod state;

pub use detector::{detect_events, detect_into, EventDetector};
pub use state::{DetectorState, DiscState};
