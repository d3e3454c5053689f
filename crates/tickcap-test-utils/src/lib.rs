//! Test utilities and snapshot builders for tickcap development.
//!
//! Provides a [`SessionBuilder`] for constructing session snapshots,
//! shorthand constructors for players and goal/throw payloads, JSON
//! payload helpers for driving the frame processor, and a scripted
//! synthetic match in [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{frame_with_every_event, scripted_match};

use tickcap_core::{
    BonesSnapshot, LastScore, LastThrow, Player, PlayerStats, SessionSnapshot, SlotId, Team,
    UserBones,
};

/// A roster entry with the given slot, name and jersey number.
pub fn player(slot: i32, name: &str, jersey: i32) -> Player {
    Player {
        slot_number: SlotId(slot),
        display_name: name.to_string(),
        account_id: 1000 + slot as u64,
        jersey_number: jersey,
        level: 10,
        ping: 30,
        ..Player::default()
    }
}

/// Replace the save/stun/pass counters of `p`.
pub fn with_stats(mut p: Player, saves: i32, stuns: i32, passes: i32) -> Player {
    p.stats = PlayerStats {
        saves,
        stuns,
        passes,
        ..p.stats
    };
    p
}

/// A goal payload with recognisable values.
pub fn sample_last_score() -> LastScore {
    LastScore {
        disc_speed: 15.5,
        team: "blue".into(),
        goal_type: "INSIDE SHOT".into(),
        point_amount: 2,
        distance_thrown: 8.2,
        person_scored: "Player1".into(),
        assist_scored: "[INVALID]".into(),
    }
}

/// A throw payload with recognisable values.
pub fn sample_last_throw() -> LastThrow {
    LastThrow {
        arm_speed: 12.3,
        total_speed: 15.1,
        off_axis_spin_deg: 4.0,
        rot_per_sec: 1.5,
        speed_from_arm: 9.0,
        speed_from_movement: 3.1,
        ..LastThrow::default()
    }
}

/// A bones payload for one user with two bones.
pub fn sample_bones() -> BonesSnapshot {
    BonesSnapshot {
        user_bones: vec![UserBones {
            bone_t: vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0],
            bone_o: vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
        }],
        err_code: 0,
        err_description: String::new(),
    }
}

/// Serialize a session snapshot into the JSON payload the processor consumes.
pub fn session_json(session: &SessionSnapshot) -> Vec<u8> {
    serde_json::to_vec(session).expect("session snapshot serializes")
}

/// Serialize a bones snapshot into the JSON payload the processor consumes.
pub fn bones_json(bones: &BonesSnapshot) -> Vec<u8> {
    serde_json::to_vec(bones).expect("bones snapshot serializes")
}

/// Builder for [`SessionSnapshot`] values.
///
/// Players added with [`player`](SessionBuilder::player) land in blue
/// (even jersey), orange (odd jersey) or spectator (`-1`) team blocks,
/// matching the layout the game reports.
#[derive(Clone, Debug)]
pub struct SessionBuilder {
    session: SessionSnapshot,
}

impl SessionBuilder {
    pub fn new() -> Self {
        let mut session = SessionSnapshot {
            session_id: "00000000-0000-0000-0000-000000000001".into(),
            map_name: "mpl_arena_a".into(),
            match_type: "Echo_Arena".into(),
            game_status: "playing".into(),
            game_clock_display: "05:00.00".into(),
            game_clock: 300.0,
            ..SessionSnapshot::default()
        };
        for name in ["BLUE TEAM", "ORANGE TEAM", "SPECTATORS"] {
            session.teams.push(Team {
                name: name.into(),
                ..Team::default()
            });
        }
        Self { session }
    }

    pub fn status(mut self, status: &str) -> Self {
        self.session.game_status = status.into();
        self
    }

    pub fn clock(mut self, display: &str) -> Self {
        self.session.game_clock_display = display.into();
        self
    }

    pub fn score(mut self, blue: i32, orange: i32, blue_round: i32, orange_round: i32) -> Self {
        self.session.blue_points = blue;
        self.session.orange_points = orange;
        self.session.blue_round_score = blue_round;
        self.session.orange_round_score = orange_round;
        self
    }

    pub fn player(mut self, p: Player) -> Self {
        let team = match p.jersey_number {
            -1 => 2,
            n if n % 2 == 0 => 0,
            _ => 1,
        };
        self.session.teams[team].players.push(p);
        self
    }

    pub fn players(self, players: impl IntoIterator<Item = Player>) -> Self {
        players.into_iter().fold(self, Self::player)
    }

    /// Flag `slot` as the disc holder. Unknown slots are ignored.
    pub fn possession(mut self, slot: i32) -> Self {
        for team in &mut self.session.teams {
            let mut holds = false;
            for p in &mut team.players {
                p.has_possession = p.slot_number == SlotId(slot);
                holds |= p.has_possession;
            }
            team.possession = holds;
        }
        self
    }

    pub fn last_score(mut self, score: LastScore) -> Self {
        self.session.last_score = Some(score);
        self
    }

    pub fn last_throw(mut self, throw: LastThrow) -> Self {
        self.session.last_throw = Some(throw);
        self
    }

    pub fn build(self) -> SessionSnapshot {
        self.session
    }
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A session with no players and a 0-0 score.
pub fn empty_session() -> SessionSnapshot {
    SessionBuilder::new().build()
}

/// A session holding exactly `players`.
pub fn session_with_players(players: Vec<Player>) -> SessionSnapshot {
    SessionBuilder::new().players(players).build()
}

/// A session with the given four score fields and no players.
pub fn session_with_score(
    blue: i32,
    orange: i32,
    blue_round: i32,
    orange_round: i32,
) -> SessionSnapshot {
    SessionBuilder::new()
        .score(blue, orange, blue_round, orange_round)
        .build()
}

/// A session with a single player at `slot` holding the disc.
pub fn session_with_possession(slot: i32) -> SessionSnapshot {
    SessionBuilder::new()
        .player(player(slot, &format!("Player{slot}"), 0))
        .possession(slot)
        .build()
}
