//! Previous-frame memory retained by the detector between calls.

use indexmap::IndexMap;
use tickcap_core::{Player, Scoreboard, SessionSnapshot, SlotId};

/// Disc possession as derived from a roster scan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DiscState {
    /// Whether any player holds the disc.
    pub has_possession: bool,
    /// Holder slot, or [`SlotId::NONE`].
    pub player_slot: SlotId,
}

impl DiscState {
    /// Nobody holds the disc.
    pub const NONE: DiscState = DiscState {
        has_possession: false,
        player_slot: SlotId::NONE,
    };

    /// Scan every player of every team for the possession flag.
    ///
    /// The first flagged player in roster order wins.
    pub fn of(session: &SessionSnapshot) -> Self {
        match session.possession_holder() {
            Some(slot) => Self {
                has_possession: true,
                player_slot: slot,
            },
            None => Self::NONE,
        }
    }
}

impl Default for DiscState {
    fn default() -> Self {
        Self::NONE
    }
}

/// Minimal previous-frame memory.
///
/// Only [`update`](DetectorState::update) and
/// [`clear`](DetectorState::clear) mutate it. A cleared state has no
/// roster, no scoreboard, no disc state and an empty game status; the
/// scoreboard step stays silent until a first scoreboard is retained,
/// and the possession step compares against [`DiscState::NONE`].
#[derive(Clone, Debug, Default)]
pub struct DetectorState {
    /// Kept sorted by ascending slot after every update.
    prev_players_by_slot: IndexMap<SlotId, Player>,
    prev_scoreboard: Option<Scoreboard>,
    prev_disc_state: Option<DiscState>,
    prev_game_status: String,
}

impl DetectorState {
    /// An empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// The state that results from observing `session` once.
    pub fn from_snapshot(session: &SessionSnapshot) -> Self {
        let mut state = Self::new();
        state.update(session);
        state
    }

    /// Retain `curr` as the previous frame.
    ///
    /// Existing roster entries are updated in place; slots no longer in
    /// the roster are dropped. Map capacity is kept across calls.
    pub fn update(&mut self, curr: &SessionSnapshot) {
        let players = curr.players_by_slot();
        self.prev_players_by_slot.retain(|slot, _| {
            players
                .binary_search_by_key(slot, |p| p.slot_number)
                .is_ok()
        });
        for p in &players {
            match self.prev_players_by_slot.get_mut(&p.slot_number) {
                Some(existing) => existing.clone_from(p),
                None => {
                    self.prev_players_by_slot.insert(p.slot_number, (*p).clone());
                }
            }
        }
        self.prev_players_by_slot.sort_unstable_keys();

        self.prev_scoreboard = Some(curr.scoreboard());
        self.prev_disc_state = Some(DiscState::of(curr));
        if self.prev_game_status != curr.game_status {
            self.prev_game_status.clone_from(&curr.game_status);
        }
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        self.prev_players_by_slot.clear();
        self.prev_scoreboard = None;
        self.prev_disc_state = None;
        self.prev_game_status.clear();
    }

    /// `true` if nothing has been retained since construction or the last clear.
    pub fn is_empty(&self) -> bool {
        self.prev_players_by_slot.is_empty()
            && self.prev_scoreboard.is_none()
            && self.prev_disc_state.is_none()
            && self.prev_game_status.is_empty()
    }

    /// Previous roster, in ascending slot order.
    pub fn players(&self) -> impl Iterator<Item = (&SlotId, &Player)> {
        self.prev_players_by_slot.iter()
    }

    /// Previous roster entry for `slot`.
    pub fn player(&self, slot: SlotId) -> Option<&Player> {
        self.prev_players_by_slot.get(&slot)
    }

    /// Number of retained roster entries.
    pub fn player_count(&self) -> usize {
        self.prev_players_by_slot.len()
    }

    /// Previous scoreboard, if one has been observed.
    pub fn scoreboard(&self) -> Option<Scoreboard> {
        self.prev_scoreboard
    }

    /// Previous disc state; [`DiscState::NONE`] when nothing was observed.
    pub fn disc_state(&self) -> DiscState {
        self.prev_disc_state.unwrap_or(DiscState::NONE)
    }

    /// Previous game status; empty when nothing was observed.
    pub fn game_status(&self) -> &str {
        &self.prev_game_status
    }
}
