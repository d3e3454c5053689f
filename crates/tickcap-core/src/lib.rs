//! Core types for the tickcap telemetry capture framework.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the data shared by every other tickcap crate: identifiers, the
//! decoded session and bones snapshots, the closed [`DomainEvent`] set,
//! and the assembled [`Frame`].

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod event;
pub mod frame;
pub mod id;
pub mod session;

pub use event::{
    DiscPossessionChanged, DiscThrown, DomainEvent, EventKind, PlayerJoined, PlayerLeft, Role,
    ScoreboardUpdated, StatIncrement,
};
pub use frame::Frame;
pub use id::{FrameIndex, SlotId, Timestamp};
pub use session::{
    BonesSnapshot, LastScore, LastThrow, Player, PlayerStats, Scoreboard, SessionSnapshot, Team,
    UserBones, GAME_STATUS_PLAYING, GAME_STATUS_POST_MATCH, GAME_STATUS_ROUND_OVER,
};
