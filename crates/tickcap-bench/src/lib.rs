//! Capture profiles for benchmarks and examples.
//!
//! Provides pre-serialized tick payloads shaped like what the game's local
//! API serves:
//!
//! - [`match_profile`]: a scripted match (4 players, one spectator)
//!   with a small bones payload on every tick
//! - [`lobby_session`]: a full 10-player session with stats populated
//! - [`lobby_bones`]: bones for a full lobby, 23 bones per user
//! - [`lobby_profile`]: a full lobby where one player's stats move each tick

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use tickcap_core::{BonesSnapshot, Frame, SessionSnapshot, UserBones};
use tickcap_engine::FrameProcessor;
use tickcap_test_utils::{
    bones_json, player, sample_bones, session_json, with_stats, SessionBuilder,
};

/// Players in a full lobby.
pub const LOBBY_PLAYERS: usize = 10;

/// Bones tracked per user by the game.
pub const BONES_PER_USER: usize = 23;

/// One tick of raw input: the session and bones payloads.
#[derive(Clone, Debug)]
pub struct TickPayload {
    /// Session JSON.
    pub session: Vec<u8>,
    /// Bones JSON, empty when the tick has none.
    pub bones: Vec<u8>,
}

/// Serialize a scripted match of `frames` ticks.
pub fn match_profile(frames: usize) -> Vec<TickPayload> {
    let bones = bones_json(&sample_bones());
    tickcap_test_utils::scripted_match(frames)
        .iter()
        .map(|s| TickPayload {
            session: session_json(s),
            bones: bones.clone(),
        })
        .collect()
}

/// A full lobby: five players per team, disc held by slot 0.
pub fn lobby_session() -> SessionSnapshot {
    let players = (0..LOBBY_PLAYERS as i32).map(|slot| {
        let p = player(slot, &format!("Player{slot}"), slot);
        with_stats(p, slot, slot * 2, slot * 3)
    });
    SessionBuilder::new()
        .score(4, 2, 1, 0)
        .players(players)
        .possession(0)
        .build()
}

/// Bones for every player in a full lobby.
pub fn lobby_bones() -> BonesSnapshot {
    let user = UserBones {
        bone_t: (0..BONES_PER_USER * 3).map(|i| i as f32 * 0.01).collect(),
        bone_o: (0..BONES_PER_USER * 4).map(|i| (i % 4) as f32 * 0.25).collect(),
    };
    BonesSnapshot {
        user_bones: vec![user; LOBBY_PLAYERS],
        err_code: 0,
        err_description: String::new(),
    }
}

/// Serialize `frames` ticks of a full lobby.
///
/// One player's save count increments every tick, so each tick after the
/// first carries a stat event.
pub fn lobby_profile(frames: usize) -> Vec<TickPayload> {
    let bones = bones_json(&lobby_bones());
    let mut session = lobby_session();
    (0..frames)
        .map(|tick| {
            let p = &mut session.teams[0].players[tick % 5];
            p.stats.saves += 1;
            TickPayload {
                session: session_json(&session),
                bones: bones.clone(),
            }
        })
        .collect()
}

/// Run `payloads` through a fresh processor and collect the frames.
///
/// Ticks that fail to decode are skipped.
pub fn assemble_frames(payloads: &[TickPayload]) -> Vec<Frame> {
    let mut processor = FrameProcessor::new();
    payloads
        .iter()
        .filter_map(|p| {
            processor
                .process_frame(&p.session, &p.bones, std::time::SystemTime::UNIX_EPOCH)
                .ok()
        })
        .collect()
}
