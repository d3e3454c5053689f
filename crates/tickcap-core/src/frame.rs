//! The assembled per-tick [`Frame`].

use crate::event::DomainEvent;
use crate::id::{FrameIndex, Timestamp};
use crate::session::{BonesSnapshot, SessionSnapshot};

/// One timestamped snapshot of session telemetry plus derived events.
///
/// Frames handed out by the processor are not mutated afterwards. The
/// `Default` value doubles as a reusable scratch frame for
/// `process_frame_into` and `read_frame_to`, which overwrite every field.
///
/// # Examples
///
/// ```
/// use tickcap_core::{Frame, FrameIndex};
///
/// let frame = Frame::default();
/// assert_eq!(frame.index, FrameIndex(0));
/// assert!(frame.bones.is_none());
/// assert!(frame.events.is_empty());
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    /// Monotonic index assigned by the processor.
    pub index: FrameIndex,
    /// Capture time.
    pub timestamp: Timestamp,
    /// Decoded session snapshot.
    pub session: SessionSnapshot,
    /// Decoded bones snapshot, when the tick carried one.
    pub bones: Option<BonesSnapshot>,
    /// Events derived for this tick, in detection order.
    pub events: Vec<DomainEvent>,
}
