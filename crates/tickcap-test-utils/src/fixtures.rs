//! Reusable capture fixtures.
//!
//! - [`scripted_match`]: a deterministic session timeline that exercises
//!   every detection step (joins, leaves, possession, throws, goals,
//!   stat increments, round and match transitions).
//! - [`frame_with_every_event`]: a fully populated [`Frame`] carrying one
//!   event of each kind, for codec tests.

use tickcap_core::{
    DiscPossessionChanged, DiscThrown, DomainEvent, Frame, FrameIndex, PlayerJoined, PlayerLeft,
    Role, ScoreboardUpdated, SessionSnapshot, SlotId, StatIncrement, Timestamp,
};

use crate::{player, sample_bones, sample_last_score, sample_last_throw, SessionBuilder};

/// Ticks between possession hand-offs.
const PASS_EVERY: usize = 25;
/// Ticks between goals.
const GOAL_EVERY: usize = 100;
/// Length of a round, in ticks.
const ROUND_LEN: usize = 300;
/// Ticks the game spends in `round_over`.
const ROUND_OVER_LEN: usize = 20;
/// Ticks of `post_match` at the end of the script.
const POST_MATCH_LEN: usize = 30;

/// Build a deterministic match of `frames` session snapshots.
///
/// Four players join over the first 15 ticks, a spectator joins at
/// tick 20 and leaves at tick 60, possession moves every
/// [`PASS_EVERY`] ticks (crediting a pass to the previous holder), blue
/// scores every [`GOAL_EVERY`] ticks with `last_score` set on that tick
/// only, each [`ROUND_LEN`] ticks ends in `round_over`, and the final
/// [`POST_MATCH_LEN`] ticks are `post_match`.
pub fn scripted_match(frames: usize) -> Vec<SessionSnapshot> {
    let joins = [(0usize, 0i32), (5, 1), (10, 2), (15, 3)];
    let mut passes = [0i32; 4];
    let mut saves = [0i32; 4];
    let mut holder: Option<i32> = None;
    let mut blue_points = 0;
    let mut blue_rounds = 0;
    let mut out = Vec::with_capacity(frames);

    for tick in 0..frames {
        let present: Vec<i32> = joins
            .iter()
            .filter(|(at, _)| tick >= *at)
            .map(|(_, slot)| *slot)
            .collect();

        if tick % PASS_EVERY == 0 && !present.is_empty() {
            let next = present[(tick / PASS_EVERY) % present.len()];
            if let Some(prev) = holder {
                if prev != next {
                    passes[prev as usize] += 1;
                }
            }
            holder = Some(next);
        }

        let in_round = tick % ROUND_LEN;
        let goal = tick > 0 && tick % GOAL_EVERY == 0 && in_round != 0;
        if goal {
            blue_points += 2;
            saves[1] += 1;
        }

        let status = if frames >= POST_MATCH_LEN && tick >= frames - POST_MATCH_LEN {
            "post_match"
        } else if tick >= ROUND_LEN && in_round < ROUND_OVER_LEN {
            "round_over"
        } else {
            "playing"
        };
        if tick >= ROUND_LEN && in_round == 0 {
            blue_rounds += 1;
            blue_points = 0;
        }

        let secs = 300 - in_round / 60;
        let mut builder = SessionBuilder::new()
            .status(status)
            .clock(&format!("{:02}:{:02}.00", secs / 60, secs % 60))
            .score(blue_points, 0, blue_rounds, 0);
        for &slot in &present {
            let idx = slot as usize;
            let mut p = player(slot, &format!("Player{slot}"), slot);
            p.stats.passes = passes[idx];
            p.stats.saves = saves[idx];
            builder = builder.player(p);
        }
        if (20..60).contains(&tick) {
            builder = builder.player(player(8, "Watcher", -1));
        }
        if let Some(slot) = holder {
            builder = builder.possession(slot);
        }
        if goal {
            builder = builder.last_score(sample_last_score());
        }
        if tick % PASS_EVERY == 1 && tick > 1 {
            builder = builder.last_throw(sample_last_throw());
        }
        out.push(builder.build());
    }
    out
}

/// A frame with bones data and one event of every kind.
pub fn frame_with_every_event(index: u32) -> Frame {
    let joined = player(3, "Player3", 3);
    let session = SessionBuilder::new()
        .score(2, 1, 1, 0)
        .player(player(0, "Player0", 0))
        .player(joined.clone())
        .possession(0)
        .last_score(sample_last_score())
        .last_throw(sample_last_throw())
        .build();

    let events = vec![
        DomainEvent::PlayerJoined(PlayerJoined {
            player: joined,
            role: Role::OrangeTeam,
        }),
        DomainEvent::PlayerLeft(PlayerLeft {
            slot: SlotId(5),
            display_name: "Gone".into(),
        }),
        DomainEvent::ScoreboardUpdated(ScoreboardUpdated {
            blue_points: 2,
            orange_points: 1,
            blue_round_score: 1,
            orange_round_score: 0,
            game_clock_display: "05:00.00".into(),
        }),
        DomainEvent::GoalScored(sample_last_score()),
        DomainEvent::DiscPossessionChanged(DiscPossessionChanged {
            previous_slot: SlotId::NONE,
            current_slot: SlotId(0),
        }),
        DomainEvent::DiscThrown(DiscThrown {
            player_slot: SlotId(0),
            throw: sample_last_throw(),
        }),
        DomainEvent::PlayerSave(StatIncrement {
            slot: SlotId(0),
            total: 1,
        }),
        DomainEvent::PlayerStun(StatIncrement {
            slot: SlotId(0),
            total: 4,
        }),
        DomainEvent::PlayerPass(StatIncrement {
            slot: SlotId(3),
            total: 9,
        }),
        DomainEvent::RoundEnded,
        DomainEvent::MatchEnded,
    ];

    Frame {
        index: FrameIndex(index),
        timestamp: Timestamp::new(1_700_000_000 + i64::from(index), 500_000_000),
        session,
        bones: Some(sample_bones()),
        events,
    }
}
