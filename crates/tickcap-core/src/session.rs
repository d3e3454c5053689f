//! Canonical session and bones snapshot structures.
//!
//! These mirror the JSON documents served by the game's local telemetry
//! API. Every field carries a serde default so that a payload missing
//! optional data still decodes; only structurally wrong input (bad
//! syntax, wrong value types) is rejected by the decoder.

use serde::{Deserialize, Deserializer, Serialize};
use smallvec::SmallVec;

use crate::id::SlotId;

/// `game_status` value while a round is being played.
pub const GAME_STATUS_PLAYING: &str = "playing";
/// `game_status` value after the last goal of a round.
pub const GAME_STATUS_ROUND_OVER: &str = "round_over";
/// `game_status` value once the match has been decided.
pub const GAME_STATUS_POST_MATCH: &str = "post_match";

// ── null handling ───────────────────────────────────────────────
//
// The API sends `null` for fields it has no value for. A `null` decodes
// to the same value an absent key would.

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_no_slot<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SlotId, D::Error> {
    Ok(Option::<SlotId>::deserialize(deserializer)?.unwrap_or(SlotId::NONE))
}

fn null_as_spectator<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i32, D::Error> {
    Ok(Option::<i32>::deserialize(deserializer)?.unwrap_or(-1))
}

/// Per-player statistic counters.
///
/// Counters are cumulative for the lifetime of the slot's occupant; the
/// game resets them when a new player takes over a slot.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerStats {
    /// Saves made.
    #[serde(deserialize_with = "null_as_default")]
    pub saves: i32,
    /// Opponents stunned.
    #[serde(deserialize_with = "null_as_default")]
    pub stuns: i32,
    /// Completed passes.
    #[serde(deserialize_with = "null_as_default")]
    pub passes: i32,
    /// Points scored.
    #[serde(deserialize_with = "null_as_default")]
    pub points: i32,
    /// Goals scored.
    #[serde(deserialize_with = "null_as_default")]
    pub goals: i32,
    /// Assists.
    #[serde(deserialize_with = "null_as_default")]
    pub assists: i32,
    /// Steals.
    #[serde(deserialize_with = "null_as_default")]
    pub steals: i32,
    /// Blocks.
    #[serde(deserialize_with = "null_as_default")]
    pub blocks: i32,
    /// Interceptions.
    #[serde(deserialize_with = "null_as_default")]
    pub interceptions: i32,
    /// Catches.
    #[serde(deserialize_with = "null_as_default")]
    pub catches: i32,
    /// Shots taken.
    #[serde(deserialize_with = "null_as_default")]
    pub shots_taken: i32,
    /// Seconds spent holding the disc.
    #[serde(deserialize_with = "null_as_default")]
    pub possession_time: f32,
}

/// A single roster entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Player {
    /// Stable slot identity.
    #[serde(rename = "playerid", deserialize_with = "null_as_no_slot")]
    pub slot_number: SlotId,
    /// In-game display name.
    #[serde(rename = "name", deserialize_with = "null_as_default")]
    pub display_name: String,
    /// Platform account id.
    #[serde(rename = "userid", deserialize_with = "null_as_default")]
    pub account_id: u64,
    /// Jersey number; `-1` marks a spectator.
    #[serde(rename = "number", deserialize_with = "null_as_spectator")]
    pub jersey_number: i32,
    /// Player level.
    #[serde(deserialize_with = "null_as_default")]
    pub level: i32,
    /// Round-trip latency in milliseconds.
    #[serde(deserialize_with = "null_as_default")]
    pub ping: i32,
    /// Whether this player currently holds the disc.
    #[serde(rename = "possession", deserialize_with = "null_as_default")]
    pub has_possession: bool,
    /// Whether this player is currently stunned.
    #[serde(rename = "stunned", deserialize_with = "null_as_default")]
    pub is_stunned: bool,
    /// Cumulative statistics.
    #[serde(deserialize_with = "null_as_default")]
    pub stats: PlayerStats,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            slot_number: SlotId::NONE,
            display_name: String::new(),
            account_id: 0,
            jersey_number: -1,
            level: 0,
            ping: 0,
            has_possession: false,
            is_stunned: false,
            stats: PlayerStats::default(),
        }
    }
}

/// One team block of the roster (blue, orange or spectators).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Team {
    /// Team label as reported by the game.
    #[serde(rename = "team", deserialize_with = "null_as_default")]
    pub name: String,
    /// Whether a member of this team holds the disc.
    #[serde(deserialize_with = "null_as_default")]
    pub possession: bool,
    /// Team members.
    #[serde(deserialize_with = "null_as_default")]
    pub players: Vec<Player>,
}

/// Details of the most recent goal.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LastScore {
    /// Disc speed at the goal line, m/s.
    #[serde(deserialize_with = "null_as_default")]
    pub disc_speed: f32,
    /// Scoring team label.
    #[serde(deserialize_with = "null_as_default")]
    pub team: String,
    /// Goal type label (e.g. `"INSIDE SHOT"`).
    #[serde(deserialize_with = "null_as_default")]
    pub goal_type: String,
    /// Points awarded.
    #[serde(deserialize_with = "null_as_default")]
    pub point_amount: i32,
    /// Distance the disc travelled, metres.
    #[serde(deserialize_with = "null_as_default")]
    pub distance_thrown: f32,
    /// Display name of the scorer.
    #[serde(deserialize_with = "null_as_default")]
    pub person_scored: String,
    /// Display name of the assisting player.
    #[serde(deserialize_with = "null_as_default")]
    pub assist_scored: String,
}

/// Kinematics of the most recent throw.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LastThrow {
    /// Arm speed at release.
    #[serde(deserialize_with = "null_as_default")]
    pub arm_speed: f32,
    /// Total release speed.
    #[serde(deserialize_with = "null_as_default")]
    pub total_speed: f32,
    /// Off-axis spin, degrees.
    #[serde(deserialize_with = "null_as_default")]
    pub off_axis_spin_deg: f32,
    /// Penalty applied for wrist throws.
    #[serde(deserialize_with = "null_as_default")]
    pub wrist_throw_penalty: f32,
    /// Rotations per second.
    #[serde(deserialize_with = "null_as_default")]
    pub rot_per_sec: f32,
    /// Potential speed from rotation.
    #[serde(deserialize_with = "null_as_default")]
    pub pot_speed_from_rot: f32,
    /// Speed contributed by the arm.
    #[serde(deserialize_with = "null_as_default")]
    pub speed_from_arm: f32,
    /// Speed contributed by body movement.
    #[serde(deserialize_with = "null_as_default")]
    pub speed_from_movement: f32,
    /// Speed contributed by the wrist.
    #[serde(deserialize_with = "null_as_default")]
    pub speed_from_wrist: f32,
    /// Wrist alignment to throw direction, degrees.
    #[serde(deserialize_with = "null_as_default")]
    pub wrist_align_to_throw_deg: f32,
    /// Throw alignment to movement direction, degrees.
    #[serde(deserialize_with = "null_as_default")]
    pub throw_align_to_movement_deg: f32,
    /// Penalty for off-axis release.
    #[serde(deserialize_with = "null_as_default")]
    pub off_axis_penalty: f32,
    /// Penalty for throwing against movement.
    #[serde(deserialize_with = "null_as_default")]
    pub throw_move_penalty: f32,
}

/// The four score fields diffed by the scoreboard step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Scoreboard {
    /// Blue team points in the current round.
    pub blue_points: i32,
    /// Orange team points in the current round.
    pub orange_points: i32,
    /// Rounds won by blue.
    pub blue_round_score: i32,
    /// Rounds won by orange.
    pub orange_round_score: i32,
}

/// One decoded session document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSnapshot {
    /// Session identifier.
    #[serde(rename = "sessionid", deserialize_with = "null_as_default")]
    pub session_id: String,
    /// Arena/map name.
    #[serde(deserialize_with = "null_as_default")]
    pub map_name: String,
    /// Match type label.
    #[serde(deserialize_with = "null_as_default")]
    pub match_type: String,
    /// Current game status (see the `GAME_STATUS_*` constants).
    #[serde(deserialize_with = "null_as_default")]
    pub game_status: String,
    /// Human-readable game clock (e.g. `"04:59.12"`).
    #[serde(deserialize_with = "null_as_default")]
    pub game_clock_display: String,
    /// Game clock in seconds.
    #[serde(deserialize_with = "null_as_default")]
    pub game_clock: f32,
    /// Blue team points.
    #[serde(deserialize_with = "null_as_default")]
    pub blue_points: i32,
    /// Orange team points.
    #[serde(deserialize_with = "null_as_default")]
    pub orange_points: i32,
    /// Rounds won by blue.
    #[serde(deserialize_with = "null_as_default")]
    pub blue_round_score: i32,
    /// Rounds won by orange.
    #[serde(deserialize_with = "null_as_default")]
    pub orange_round_score: i32,
    /// Roster, grouped by team.
    #[serde(deserialize_with = "null_as_default")]
    pub teams: Vec<Team>,
    /// Most recent goal, if the game reports one on this tick.
    pub last_score: Option<LastScore>,
    /// Most recent throw, if the game reports one on this tick.
    pub last_throw: Option<LastThrow>,
}

impl SessionSnapshot {
    /// The four score fields as a [`Scoreboard`].
    pub fn scoreboard(&self) -> Scoreboard {
        Scoreboard {
            blue_points: self.blue_points,
            orange_points: self.orange_points,
            blue_round_score: self.blue_round_score,
            orange_round_score: self.orange_round_score,
        }
    }

    /// Iterate over every player of every team, in roster order.
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.teams.iter().flat_map(|t| t.players.iter())
    }

    /// All players sorted by ascending slot number.
    ///
    /// When the same slot appears twice, the first occurrence in roster
    /// order wins and later duplicates are dropped.
    pub fn players_by_slot(&self) -> SmallVec<[&Player; 16]> {
        let mut out: SmallVec<[&Player; 16]> = self.players().collect();
        // Stable sort keeps roster order among equal slots.
        out.sort_by_key(|p| p.slot_number);
        out.dedup_by_key(|p| p.slot_number);
        out
    }

    /// Slot of the first player flagged as holding the disc, if any.
    pub fn possession_holder(&self) -> Option<SlotId> {
        self.players()
            .find(|p| p.has_possession)
            .map(|p| p.slot_number)
    }
}

/// Bone transforms for one local user.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserBones {
    /// Flattened bone translations (x, y, z per bone).
    #[serde(deserialize_with = "null_as_default")]
    pub bone_t: Vec<f32>,
    /// Flattened bone orientations (x, y, z, w per bone).
    #[serde(deserialize_with = "null_as_default")]
    pub bone_o: Vec<f32>,
}

/// One decoded player-bones document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BonesSnapshot {
    /// Per-user bone data.
    #[serde(deserialize_with = "null_as_default")]
    pub user_bones: Vec<UserBones>,
    /// API error code (0 on success).
    #[serde(deserialize_with = "null_as_default")]
    pub err_code: i32,
    /// API error description.
    #[serde(deserialize_with = "null_as_default")]
    pub err_description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(slot: i32, possession: bool) -> Player {
        Player {
            slot_number: SlotId(slot),
            has_possession: possession,
            ..Player::default()
        }
    }

    #[test]
    fn players_by_slot_sorts_and_dedups() {
        let session = SessionSnapshot {
            teams: vec![
                Team {
                    players: vec![player(4, false), player(1, false)],
                    ..Team::default()
                },
                Team {
                    players: vec![player(3, false), player(1, true)],
                    ..Team::default()
                },
            ],
            ..SessionSnapshot::default()
        };
        let slots: Vec<_> = session
            .players_by_slot()
            .iter()
            .map(|p| (p.slot_number.0, p.has_possession))
            .collect();
        assert_eq!(slots, vec![(1, false), (3, false), (4, false)]);
    }

    #[test]
    fn possession_holder_scans_all_teams() {
        let session = SessionSnapshot {
            teams: vec![
                Team {
                    players: vec![player(0, false)],
                    ..Team::default()
                },
                Team {
                    players: vec![player(5, true)],
                    ..Team::default()
                },
            ],
            ..SessionSnapshot::default()
        };
        assert_eq!(session.possession_holder(), Some(SlotId(5)));
        assert_eq!(SessionSnapshot::default().possession_holder(), None);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let json = r#"{"game_status":"playing","teams":[{"players":[{"playerid":2,"name":"a"}]}]}"#;
        let session: SessionSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(session.game_status, GAME_STATUS_PLAYING);
        assert_eq!(session.blue_points, 0);
        assert!(session.last_score.is_none());
        let p = &session.teams[0].players[0];
        assert_eq!(p.slot_number, SlotId(2));
        assert_eq!(p.jersey_number, -1);
        assert_eq!(p.stats, PlayerStats::default());
    }

    #[test]
    fn explicit_nulls_take_defaults() {
        let json = r#"{
            "game_status": null, "map_name": null, "blue_points": null,
            "last_score": null, "last_throw": null,
            "teams": [
                {"team": null, "possession": null, "players": null},
                {"team": "BLUE TEAM", "players": [
                    {"playerid": null, "name": null, "number": null, "stats": null},
                    {"playerid": 3, "number": 4, "stats": {"saves": null, "passes": 2}}
                ]}
            ]
        }"#;
        let session: SessionSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(session.game_status, "");
        assert_eq!(session.map_name, "");
        assert_eq!(session.blue_points, 0);
        assert!(session.last_score.is_none());
        assert!(session.last_throw.is_none());
        assert_eq!(session.teams[0], Team::default());

        let unnamed = &session.teams[1].players[0];
        assert_eq!(unnamed, &Player::default());
        let named = &session.teams[1].players[1];
        assert_eq!(named.slot_number, SlotId(3));
        assert_eq!(named.stats.saves, 0);
        assert_eq!(named.stats.passes, 2);
    }

    #[test]
    fn bones_nulls_take_defaults() {
        let json =
            r#"{"user_bones": [{"bone_t": null, "bone_o": [0.5]}], "err_description": null}"#;
        let bones: BonesSnapshot = serde_json::from_str(json).unwrap();
        assert!(bones.user_bones[0].bone_t.is_empty());
        assert_eq!(bones.user_bones[0].bone_o, vec![0.5]);
        assert_eq!(bones.err_description, "");
    }
}
