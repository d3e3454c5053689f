//! Snapshot-diff event detection.
//!
//! Each call runs six diff steps in a fixed order and appends their
//! output to a single event list:
//!
//! 1. roster (joins in ascending slot order, then leaves in ascending slot order)
//! 2. scoreboard (`ScoreboardUpdated`, then `GoalScored` if `last_score` is present)
//! 3. possession
//! 4. throw (`DiscThrown` whenever `last_throw` is present)
//! 5. per-player stats (ascending slot; saves, stuns, passes; one event per unit of increase)
//! 6. game status transition (`RoundEnded` / `MatchEnded`)
//!
//! Detection never fails. Missing substructures yield no events for the
//! affected step.

use log::{debug, trace};
use tickcap_core::{
    DiscPossessionChanged, DiscThrown, DomainEvent, Player, PlayerJoined, PlayerLeft, Role,
    ScoreboardUpdated, SessionSnapshot, StatIncrement, GAME_STATUS_POST_MATCH,
    GAME_STATUS_ROUND_OVER,
};

use crate::state::{DetectorState, DiscState};

/// Stateful detector that diffs each snapshot against the previous one.
///
/// # Examples
///
/// ```
/// use tickcap_core::{DomainEvent, Player, SessionSnapshot, SlotId, Team};
/// use tickcap_detect::EventDetector;
///
/// let mut detector = EventDetector::new();
/// assert!(detector.add_frame(&SessionSnapshot::default()).is_empty());
///
/// let mut session = SessionSnapshot::default();
/// session.teams.push(Team {
///     players: vec![Player { slot_number: SlotId(1), jersey_number: 0, ..Player::default() }],
///     ..Team::default()
/// });
/// let events = detector.add_frame(&session);
/// assert!(matches!(events.as_slice(), [DomainEvent::PlayerJoined(_)]));
/// ```
#[derive(Debug, Default)]
pub struct EventDetector {
    state: DetectorState,
}

impl EventDetector {
    /// A detector with empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Diff `curr` against the retained state, then retain `curr`.
    pub fn add_frame(&mut self, curr: &SessionSnapshot) -> Vec<DomainEvent> {
        let mut events = Vec::new();
        self.add_frame_into(curr, &mut events);
        events
    }

    /// Like [`add_frame`](Self::add_frame), appending to a caller-owned buffer.
    ///
    /// `out` is not cleared first.
    pub fn add_frame_into(&mut self, curr: &SessionSnapshot, out: &mut Vec<DomainEvent>) {
        detect_into(&self.state, curr, out);
        self.state.update(curr);
    }

    /// Clear all retained state.
    pub fn reset(&mut self) {
        debug!("event detector reset");
        self.state.clear();
    }

    /// The retained previous-frame state.
    pub fn state(&self) -> &DetectorState {
        &self.state
    }
}

/// Diff two snapshots without touching any detector.
///
/// `prev == None` behaves like a freshly reset detector.
pub fn detect_events(prev: Option<&SessionSnapshot>, curr: &SessionSnapshot) -> Vec<DomainEvent> {
    let state = prev.map(DetectorState::from_snapshot).unwrap_or_default();
    let mut events = Vec::new();
    detect_into(&state, curr, &mut events);
    events
}

/// Run every diff step of `curr` against `prev`, appending to `out`.
pub fn detect_into(prev: &DetectorState, curr: &SessionSnapshot, out: &mut Vec<DomainEvent>) {
    let start = out.len();
    let players = curr.players_by_slot();
    if players.len() != curr.players().count() {
        debug!(
            "duplicate slot in roster: {} entries, {} distinct slots",
            curr.players().count(),
            players.len()
        );
    }

    diff_roster(prev, &players, out);
    diff_scoreboard(prev, curr, out);
    let disc = DiscState::of(curr);
    diff_possession(prev, disc, out);
    detect_throw(curr, disc, out);
    diff_stats(prev, &players, out);
    detect_status_transition(prev, curr, out);

    if out.len() > start {
        trace!("detected {} events", out.len() - start);
    }
}

/// Slots only in `curr` join, slots only in `prev` leave.
fn diff_roster(prev: &DetectorState, curr: &[&Player], out: &mut Vec<DomainEvent>) {
    for p in curr {
        if prev.player(p.slot_number).is_none() {
            out.push(DomainEvent::PlayerJoined(PlayerJoined {
                player: (*p).clone(),
                role: Role::from_jersey(p.jersey_number),
            }));
        }
    }
    for (slot, p) in prev.players() {
        if curr.binary_search_by_key(slot, |c| c.slot_number).is_err() {
            out.push(DomainEvent::PlayerLeft(PlayerLeft {
                slot: *slot,
                display_name: p.display_name.clone(),
            }));
        }
    }
}

/// `last_score` presence alone decides `GoalScored`.
fn diff_scoreboard(prev: &DetectorState, curr: &SessionSnapshot, out: &mut Vec<DomainEvent>) {
    let board = curr.scoreboard();
    if prev.scoreboard().is_some_and(|p| p != board) {
        out.push(DomainEvent::ScoreboardUpdated(ScoreboardUpdated {
            blue_points: board.blue_points,
            orange_points: board.orange_points,
            blue_round_score: board.blue_round_score,
            orange_round_score: board.orange_round_score,
            game_clock_display: curr.game_clock_display.clone(),
        }));
    }
    if let Some(score) = &curr.last_score {
        out.push(DomainEvent::GoalScored(score.clone()));
    }
}

fn diff_possession(prev: &DetectorState, curr: DiscState, out: &mut Vec<DomainEvent>) {
    let before = prev.disc_state();
    if before != curr {
        out.push(DomainEvent::DiscPossessionChanged(DiscPossessionChanged {
            previous_slot: before.player_slot,
            current_slot: curr.player_slot,
        }));
    }
}

/// Fires on every snapshot carrying `last_throw`; repeats are not suppressed.
fn detect_throw(curr: &SessionSnapshot, disc: DiscState, out: &mut Vec<DomainEvent>) {
    if let Some(throw) = &curr.last_throw {
        out.push(DomainEvent::DiscThrown(DiscThrown {
            player_slot: disc.player_slot,
            throw: throw.clone(),
        }));
    }
}

fn diff_stats(prev: &DetectorState, curr: &[&Player], out: &mut Vec<DomainEvent>) {
    for p in curr {
        let Some(before) = prev.player(p.slot_number) else {
            continue;
        };
        let slot = p.slot_number;
        push_increments(before.stats.saves, p.stats.saves, out, |total| {
            DomainEvent::PlayerSave(StatIncrement { slot, total })
        });
        push_increments(before.stats.stuns, p.stats.stuns, out, |total| {
            DomainEvent::PlayerStun(StatIncrement { slot, total })
        });
        push_increments(before.stats.passes, p.stats.passes, out, |total| {
            DomainEvent::PlayerPass(StatIncrement { slot, total })
        });
    }
}

/// One event per unit of increase; decreases emit nothing.
fn push_increments(
    before: i32,
    after: i32,
    out: &mut Vec<DomainEvent>,
    make: impl Fn(i32) -> DomainEvent,
) {
    if after > before {
        out.extend((before + 1..=after).map(make));
    }
}

fn detect_status_transition(
    prev: &DetectorState,
    curr: &SessionSnapshot,
    out: &mut Vec<DomainEvent>,
) {
    if curr.game_status == prev.game_status() {
        return;
    }
    match curr.game_status.as_str() {
        GAME_STATUS_ROUND_OVER => out.push(DomainEvent::RoundEnded),
        GAME_STATUS_POST_MATCH => out.push(DomainEvent::MatchEnded),
        _ => {}
    }
}
