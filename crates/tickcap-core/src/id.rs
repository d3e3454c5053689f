//! Strongly-typed identifiers and the capture [`Timestamp`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Roster slot of a player within a session.
///
/// The slot is the stable identity of a player across frames for as
/// long as the slot stays occupied. [`SlotId::NONE`] (`-1`) is used
/// where "no player" must be expressed, e.g. when nobody holds the disc.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SlotId(pub i32);

impl SlotId {
    /// Sentinel for "no slot".
    pub const NONE: SlotId = SlotId(-1);

    /// Returns `true` unless this is [`SlotId::NONE`].
    pub fn is_some(self) -> bool {
        self != Self::NONE
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for SlotId {
    fn from(v: i32) -> Self {
        Self(v)
    }
}

/// Monotonic frame counter assigned by the frame processor.
///
/// Starts at 0 and advances by exactly one per processed frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameIndex(pub u32);

impl FrameIndex {
    /// The index following this one. Wraps at `u32::MAX`.
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for FrameIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for FrameIndex {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Wall-clock capture time, split into Unix seconds and nanoseconds.
///
/// Times before the Unix epoch are represented with negative `seconds`
/// and a non-negative `nanos` offset, so `nanos` is always `< 1e9`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timestamp {
    /// Whole seconds since the Unix epoch.
    pub seconds: i64,
    /// Sub-second nanoseconds, `0..1_000_000_000`.
    pub nanos: u32,
}

impl Timestamp {
    /// Build a timestamp from raw parts.
    pub fn new(seconds: i64, nanos: u32) -> Self {
        Self { seconds, nanos }
    }

    /// Convert back to a [`SystemTime`].
    ///
    /// Returns `None` if the platform clock cannot represent the time,
    /// which a corrupt or hostile log can cause.
    pub fn to_system_time(self) -> Option<SystemTime> {
        let whole = if self.seconds >= 0 {
            UNIX_EPOCH.checked_add(Duration::from_secs(self.seconds.unsigned_abs()))
        } else {
            UNIX_EPOCH.checked_sub(Duration::from_secs(self.seconds.unsigned_abs()))
        };
        whole?.checked_add(Duration::from_nanos(u64::from(self.nanos)))
    }
}

impl From<SystemTime> for Timestamp {
    fn from(t: SystemTime) -> Self {
        match t.duration_since(UNIX_EPOCH) {
            Ok(d) => Self {
                seconds: d.as_secs() as i64,
                nanos: d.subsec_nanos(),
            },
            Err(e) => {
                let d = e.duration();
                if d.subsec_nanos() == 0 {
                    Self {
                        seconds: -(d.as_secs() as i64),
                        nanos: 0,
                    }
                } else {
                    Self {
                        seconds: -(d.as_secs() as i64) - 1,
                        nanos: 1_000_000_000 - d.subsec_nanos(),
                    }
                }
            }
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:09}", self.seconds, self.nanos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn slot_none_is_minus_one() {
        assert_eq!(SlotId::NONE, SlotId(-1));
        assert!(!SlotId::NONE.is_some());
        assert!(SlotId(0).is_some());
    }

    #[test]
    fn frame_index_wraps() {
        assert_eq!(FrameIndex(u32::MAX).next(), FrameIndex(0));
        assert_eq!(FrameIndex(7).next(), FrameIndex(8));
    }

    #[test]
    fn timestamp_system_time_roundtrip() {
        let t = UNIX_EPOCH + Duration::new(1_700_000_000, 123_456_789);
        let ts = Timestamp::from(t);
        assert_eq!(ts, Timestamp::new(1_700_000_000, 123_456_789));
        assert_eq!(ts.to_system_time(), Some(t));
    }

    #[test]
    fn timestamp_before_epoch() {
        let t = UNIX_EPOCH - Duration::new(1, 250_000_000);
        let ts = Timestamp::from(t);
        assert_eq!(ts, Timestamp::new(-2, 750_000_000));
        assert_eq!(ts.to_system_time(), Some(t));
    }

    #[test]
    fn extreme_timestamps_do_not_panic() {
        // Whether these fit depends on the platform clock; either way the
        // conversion must not overflow.
        if let Some(t) = Timestamp::new(i64::MAX, 999_999_999).to_system_time() {
            assert!(t > UNIX_EPOCH);
        }
        if let Some(t) = Timestamp::new(i64::MIN, 0).to_system_time() {
            assert!(t < UNIX_EPOCH);
        }
    }

    proptest! {
        #[test]
        fn timestamp_roundtrips_through_system_time(
            seconds in -10_000_000_000i64..10_000_000_000,
            nanos in 0u32..1_000_000_000,
        ) {
            let ts = Timestamp::new(seconds, nanos);
            let t = ts.to_system_time();
            prop_assert!(t.is_some());
            prop_assert_eq!(t.map(Timestamp::from), Some(ts));
        }

        #[test]
        fn timestamps_order_like_system_times(
            a in -1_000_000_000i64..1_000_000_000,
            b in -1_000_000_000i64..1_000_000_000,
            na in 0u32..1_000_000_000,
            nb in 0u32..1_000_000_000,
        ) {
            let (x, y) = (Timestamp::new(a, na), Timestamp::new(b, nb));
            prop_assert_eq!(x.cmp(&y), x.to_system_time().cmp(&y.to_system_time()));
        }
    }
}
