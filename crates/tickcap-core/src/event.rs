//! Domain events derived from consecutive session snapshots.
//!
//! [`DomainEvent`] is a closed set of variants. Each variant has a stable
//! [`EventKind`] discriminant whose `u8` tag is part of the replay format.

use std::fmt;

use crate::id::SlotId;
use crate::session::{LastScore, LastThrow, Player};

/// Team role derived from a player's jersey number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// Jersey `-1`.
    Spectator,
    /// Even jersey numbers.
    BlueTeam,
    /// Odd jersey numbers.
    OrangeTeam,
}

impl Role {
    /// Map a jersey number to a role.
    ///
    /// `-1` is a spectator; otherwise even numbers play for blue and odd
    /// numbers for orange. Other negative numbers follow the parity rule.
    pub fn from_jersey(jersey_number: i32) -> Self {
        if jersey_number == -1 {
            Self::Spectator
        } else if jersey_number % 2 == 0 {
            Self::BlueTeam
        } else {
            Self::OrangeTeam
        }
    }

    /// Wire tag.
    pub fn tag(self) -> u8 {
        match self {
            Self::Spectator => 0,
            Self::BlueTeam => 1,
            Self::OrangeTeam => 2,
        }
    }

    /// Inverse of [`tag`](Self::tag).
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Self::Spectator),
            1 => Some(Self::BlueTeam),
            2 => Some(Self::OrangeTeam),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Spectator => "SPECTATOR",
            Self::BlueTeam => "BLUE_TEAM",
            Self::OrangeTeam => "ORANGE_TEAM",
        })
    }
}

/// Payload of [`DomainEvent::PlayerJoined`].
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerJoined {
    /// Full roster entry of the new player.
    pub player: Player,
    /// Role derived from the jersey number.
    pub role: Role,
}

/// Payload of [`DomainEvent::PlayerLeft`].
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerLeft {
    /// Slot that became free.
    pub slot: SlotId,
    /// Display name the slot held in the previous frame.
    pub display_name: String,
}

/// Payload of [`DomainEvent::ScoreboardUpdated`].
#[derive(Clone, Debug, PartialEq)]
pub struct ScoreboardUpdated {
    /// Current blue points.
    pub blue_points: i32,
    /// Current orange points.
    pub orange_points: i32,
    /// Current blue round wins.
    pub blue_round_score: i32,
    /// Current orange round wins.
    pub orange_round_score: i32,
    /// Game clock at the time of the change.
    pub game_clock_display: String,
}

/// Payload of [`DomainEvent::DiscPossessionChanged`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DiscPossessionChanged {
    /// Previous holder, or [`SlotId::NONE`].
    pub previous_slot: SlotId,
    /// Current holder, or [`SlotId::NONE`].
    pub current_slot: SlotId,
}

/// Payload of [`DomainEvent::DiscThrown`].
#[derive(Clone, Debug, PartialEq)]
pub struct DiscThrown {
    /// Possession holder in the frame carrying the throw, or [`SlotId::NONE`].
    pub player_slot: SlotId,
    /// Throw kinematics.
    pub throw: LastThrow,
}

/// Payload shared by the per-player stat increment events.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatIncrement {
    /// Player slot.
    pub slot: SlotId,
    /// Counter value after this increment.
    pub total: i32,
}

/// A discrete event derived from the diff of two snapshots.
#[derive(Clone, Debug, PartialEq)]
pub enum DomainEvent {
    /// A slot became occupied.
    PlayerJoined(PlayerJoined),
    /// A slot became free.
    PlayerLeft(PlayerLeft),
    /// At least one of the four score fields changed.
    ScoreboardUpdated(ScoreboardUpdated),
    /// The snapshot reported a goal.
    GoalScored(LastScore),
    /// The disc holder changed.
    DiscPossessionChanged(DiscPossessionChanged),
    /// The snapshot reported a throw.
    DiscThrown(DiscThrown),
    /// One save was recorded.
    PlayerSave(StatIncrement),
    /// One stun was recorded.
    PlayerStun(StatIncrement),
    /// One pass was recorded.
    PlayerPass(StatIncrement),
    /// Game status moved to `round_over`.
    RoundEnded,
    /// Game status moved to `post_match`.
    MatchEnded,
}

impl DomainEvent {
    /// Discriminant of this event.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::PlayerJoined(_) => EventKind::PlayerJoined,
            Self::PlayerLeft(_) => EventKind::PlayerLeft,
            Self::ScoreboardUpdated(_) => EventKind::ScoreboardUpdated,
            Self::GoalScored(_) => EventKind::GoalScored,
            Self::DiscPossessionChanged(_) => EventKind::DiscPossessionChanged,
            Self::DiscThrown(_) => EventKind::DiscThrown,
            Self::PlayerSave(_) => EventKind::PlayerSave,
            Self::PlayerStun(_) => EventKind::PlayerStun,
            Self::PlayerPass(_) => EventKind::PlayerPass,
            Self::RoundEnded => EventKind::RoundEnded,
            Self::MatchEnded => EventKind::MatchEnded,
        }
    }
}

/// Fieldless discriminant of [`DomainEvent`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum EventKind {
    /// See [`DomainEvent::PlayerJoined`].
    PlayerJoined = 0,
    /// See [`DomainEvent::PlayerLeft`].
    PlayerLeft = 1,
    /// See [`DomainEvent::ScoreboardUpdated`].
    ScoreboardUpdated = 2,
    /// See [`DomainEvent::GoalScored`].
    GoalScored = 3,
    /// See [`DomainEvent::DiscPossessionChanged`].
    DiscPossessionChanged = 4,
    /// See [`DomainEvent::DiscThrown`].
    DiscThrown = 5,
    /// See [`DomainEvent::PlayerSave`].
    PlayerSave = 6,
    /// See [`DomainEvent::PlayerStun`].
    PlayerStun = 7,
    /// See [`DomainEvent::PlayerPass`].
    PlayerPass = 8,
    /// See [`DomainEvent::RoundEnded`].
    RoundEnded = 9,
    /// See [`DomainEvent::MatchEnded`].
    MatchEnded = 10,
}

impl EventKind {
    /// Every kind, in tag order.
    pub const ALL: [EventKind; 11] = [
        Self::PlayerJoined,
        Self::PlayerLeft,
        Self::ScoreboardUpdated,
        Self::GoalScored,
        Self::DiscPossessionChanged,
        Self::DiscThrown,
        Self::PlayerSave,
        Self::PlayerStun,
        Self::PlayerPass,
        Self::RoundEnded,
        Self::MatchEnded,
    ];

    /// Wire tag.
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Inverse of [`tag`](Self::tag).
    pub fn from_tag(tag: u8) -> Option<Self> {
        Self::ALL.get(tag as usize).copied()
    }

    /// Short snake_case name, for logs.
    pub fn name(self) -> &'static str {
        match self {
            Self::PlayerJoined => "player_joined",
            Self::PlayerLeft => "player_left",
            Self::ScoreboardUpdated => "scoreboard_updated",
            Self::GoalScored => "goal_scored",
            Self::DiscPossessionChanged => "disc_possession_changed",
            Self::DiscThrown => "disc_thrown",
            Self::PlayerSave => "player_save",
            Self::PlayerStun => "player_stun",
            Self::PlayerPass => "player_pass",
            Self::RoundEnded => "round_ended",
            Self::MatchEnded => "match_ended",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
