//! Binary encode/decode for the replay format.
//!
//! All integers are little-endian. Strings are length-prefixed with a `u32`
//! byte length and float arrays with a `u32` element count. Optional
//! substructures carry a one-byte presence flag (0 or 1). No compression,
//! no alignment padding, no self-describing schema.
//!
//! ```text
//! file    = MAGIC version:u8 record*
//! record  = len:u32 payload[len]
//! payload = index:u32 seconds:i64 nanos:u32 session bones? count:u32 event*
//! event   = tag:u8 body
//! ```
//!
//! Encoding appends into a `Vec<u8>` and cannot fail until the record
//! length is known; decoding walks a [`RecordCursor`] over one complete
//! payload and must consume it exactly.

use std::io::{ErrorKind, Read, Write};

use tickcap_core::{
    BonesSnapshot, DiscPossessionChanged, DiscThrown, DomainEvent, EventKind, Frame, FrameIndex,
    LastScore, LastThrow, Player, PlayerJoined, PlayerLeft, PlayerStats, Role, ScoreboardUpdated,
    SessionSnapshot, SlotId, StatIncrement, Team, Timestamp, UserBones,
};

use crate::error::ReplayError;
use crate::{FORMAT_VERSION, MAGIC};

/// Size of the file header: magic plus version byte.
pub const HEADER_LEN: usize = MAGIC.len() + 1;

/// Size of the little-endian length prefix in front of every record.
pub const RECORD_HEADER_LEN: usize = 4;

// Smallest possible encodings, used to reject absurd element counts
// before allocating for them.
const MIN_TEAM_LEN: usize = 4 + 1 + 4;
const MIN_PLAYER_LEN: usize = 4 + 4 + 8 + 4 + 4 + 4 + 1 + STATS_LEN;
const MIN_USER_BONES_LEN: usize = 4 + 4;
const MIN_EVENT_LEN: usize = 1;
const STATS_LEN: usize = 11 * 4 + 4;

const FLAG_POSSESSION: u8 = 0b01;
const FLAG_STUNNED: u8 = 0b10;

// ── Primitive writers ───────────────────────────────────────────

/// Write a single byte.
pub fn write_u8(buf: &mut Vec<u8>, v: u8) {
    buf.push(v);
}

/// Write a presence flag or boolean as one byte.
pub fn write_bool(buf: &mut Vec<u8>, v: bool) {
    buf.push(u8::from(v));
}

/// Write a little-endian u32.
pub fn write_u32_le(buf: &mut Vec<u8>, v: u32) {
    buf.extend_from_slice(&v.to_le_bytes());
}

/// Write a little-endian i32.
pub fn write_i32_le(buf: &mut Vec<u8>, v: i32) {
    buf.extend_from_slice(&v.to_le_bytes());
}

/// Write a little-endian u64.
pub fn write_u64_le(buf: &mut Vec<u8>, v: u64) {
    buf.extend_from_slice(&v.to_le_bytes());
}

/// Write a little-endian i64.
pub fn write_i64_le(buf: &mut Vec<u8>, v: i64) {
    buf.extend_from_slice(&v.to_le_bytes());
}

/// Write a little-endian f32.
pub fn write_f32_le(buf: &mut Vec<u8>, v: f32) {
    buf.extend_from_slice(&v.to_le_bytes());
}

/// Write a length-prefixed UTF-8 string (u32 length + bytes).
///
/// A string longer than `u32::MAX` bytes cannot fit in a record either, so
/// the enclosing [`encode_record`] rejects it before anything is emitted.
pub fn write_str(buf: &mut Vec<u8>, s: &str) {
    write_u32_le(buf, s.len() as u32);
    buf.extend_from_slice(s.as_bytes());
}

/// Write a count-prefixed array of f32.
pub fn write_f32_slice(buf: &mut Vec<u8>, v: &[f32]) {
    write_u32_le(buf, v.len() as u32);
    buf.reserve(v.len() * 4);
    for &x in v {
        write_f32_le(buf, x);
    }
}

// ── Record cursor ───────────────────────────────────────────────

/// Sequential reader over one record payload.
///
/// Every read is bounds-checked; running off the end is a
/// [`ReplayError::MalformedFrame`] since the record length was already
/// validated against the stream.
#[derive(Debug)]
pub struct RecordCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> RecordCursor<'a> {
    /// Start reading at the beginning of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], ReplayError> {
        if self.remaining() < n {
            return Err(ReplayError::malformed(format!(
                "payload ends at offset {}: needed {n} bytes, {} left",
                self.pos,
                self.remaining()
            )));
        }
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], ReplayError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    /// Read a single byte.
    pub fn read_u8(&mut self) -> Result<u8, ReplayError> {
        Ok(self.take_array::<1>()?[0])
    }

    /// Read a presence flag; anything but 0 or 1 is malformed.
    pub fn read_bool(&mut self) -> Result<bool, ReplayError> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            flag => Err(ReplayError::malformed(format!(
                "invalid presence flag {flag} at offset {}",
                self.pos - 1
            ))),
        }
    }

    /// Read a little-endian u32.
    pub fn read_u32_le(&mut self) -> Result<u32, ReplayError> {
        Ok(u32::from_le_bytes(self.take_array()?))
    }

    /// Read a little-endian i32.
    pub fn read_i32_le(&mut self) -> Result<i32, ReplayError> {
        Ok(i32::from_le_bytes(self.take_array()?))
    }

    /// Read a little-endian u64.
    pub fn read_u64_le(&mut self) -> Result<u64, ReplayError> {
        Ok(u64::from_le_bytes(self.take_array()?))
    }

    /// Read a little-endian i64.
    pub fn read_i64_le(&mut self) -> Result<i64, ReplayError> {
        Ok(i64::from_le_bytes(self.take_array()?))
    }

    /// Read a little-endian f32.
    pub fn read_f32_le(&mut self) -> Result<f32, ReplayError> {
        Ok(f32::from_le_bytes(self.take_array()?))
    }

    /// Read an element count, rejecting counts whose smallest encoding
    /// would not fit in the rest of the payload.
    pub fn read_count(&mut self, min_item_len: usize) -> Result<usize, ReplayError> {
        let n = self.read_u32_le()? as usize;
        if n.saturating_mul(min_item_len) > self.remaining() {
            return Err(ReplayError::malformed(format!(
                "count {n} at offset {} exceeds the {} bytes left",
                self.pos - 4,
                self.remaining()
            )));
        }
        Ok(n)
    }

    /// Read a length-prefixed string into `dst`, reusing its allocation.
    pub fn read_str_into(&mut self, dst: &mut String) -> Result<(), ReplayError> {
        let len = self.read_count(1)?;
        let bytes = self.take(len)?;
        let s = std::str::from_utf8(bytes)
            .map_err(|e| ReplayError::malformed(format!("invalid UTF-8 string: {e}")))?;
        dst.clear();
        dst.push_str(s);
        Ok(())
    }

    /// Read a length-prefixed string.
    pub fn read_string(&mut self) -> Result<String, ReplayError> {
        let mut s = String::new();
        self.read_str_into(&mut s)?;
        Ok(s)
    }

    /// Read a count-prefixed f32 array into `dst`, reusing its allocation.
    pub fn read_f32_vec_into(&mut self, dst: &mut Vec<f32>) -> Result<(), ReplayError> {
        let n = self.read_count(4)?;
        dst.clear();
        dst.reserve(n);
        for _ in 0..n {
            dst.push(self.read_f32_le()?);
        }
        Ok(())
    }

    /// Fail unless the whole payload has been consumed.
    pub fn finish(&self) -> Result<(), ReplayError> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(ReplayError::malformed(format!(
                "{n} trailing bytes after frame"
            ))),
        }
    }
}

// ── Header encode/decode ────────────────────────────────────────

/// Write the file header (magic and version).
pub fn encode_header(w: &mut dyn Write) -> Result<(), ReplayError> {
    w.write_all(&MAGIC)?;
    w.write_all(&[FORMAT_VERSION])?;
    Ok(())
}

/// Read and validate the file header.
pub fn decode_header(r: &mut dyn Read) -> Result<(), ReplayError> {
    let mut magic = [0u8; 4];
    r.read_exact(&mut magic)?;
    if magic != MAGIC {
        return Err(ReplayError::InvalidMagic);
    }
    let mut version = [0u8; 1];
    r.read_exact(&mut version)?;
    if version[0] != FORMAT_VERSION {
        return Err(ReplayError::UnsupportedVersion { found: version[0] });
    }
    Ok(())
}

// ── Record framing ──────────────────────────────────────────────

/// Append one length-prefixed record for `frame` to `buf`.
///
/// Returns the number of bytes appended (prefix included). On error `buf`
/// is left exactly as it was.
pub fn encode_record(buf: &mut Vec<u8>, frame: &Frame) -> Result<usize, ReplayError> {
    let start = buf.len();
    buf.extend_from_slice(&[0u8; RECORD_HEADER_LEN]);
    encode_frame(buf, frame);
    let payload_len = buf.len() - start - RECORD_HEADER_LEN;
    let Ok(len) = u32::try_from(payload_len) else {
        buf.truncate(start);
        return Err(ReplayError::RecordTooLarge { len: payload_len });
    };
    buf[start..start + RECORD_HEADER_LEN].copy_from_slice(&len.to_le_bytes());
    Ok(buf.len() - start)
}

/// Read a record length prefix, or `None` at a clean end of stream.
pub fn read_record_len(r: &mut dyn Read) -> Result<Option<u32>, ReplayError> {
    // Byte-by-byte fill to tell clean EOF (nothing read) from a
    // partial prefix.
    let mut len_buf = [0u8; RECORD_HEADER_LEN];
    let mut filled = 0;
    while filled < RECORD_HEADER_LEN {
        match r.read(&mut len_buf[filled..]) {
            Ok(0) if filled == 0 => return Ok(None),
            Ok(0) => {
                return Err(ReplayError::corrupt(format!(
                    "truncated length prefix: got {filled} of {RECORD_HEADER_LEN} bytes"
                )));
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(ReplayError::Io(e)),
        }
    }
    Ok(Some(u32::from_le_bytes(len_buf)))
}

/// Read the next record payload into `buf`, replacing its contents.
///
/// Returns `Ok(false)` at a clean end of stream. A partial prefix, a
/// payload shorter than its prefix, or a prefix above `max_len` is
/// [`ReplayError::CorruptRecord`].
pub fn read_record(
    r: &mut dyn Read,
    buf: &mut Vec<u8>,
    max_len: u32,
) -> Result<bool, ReplayError> {
    let Some(len) = read_record_len(r)? else {
        return Ok(false);
    };
    if len > max_len {
        return Err(ReplayError::corrupt(format!(
            "record declares {len} bytes, limit is {max_len}"
        )));
    }
    buf.clear();
    buf.resize(len as usize, 0);
    r.read_exact(buf).map_err(|e| {
        if e.kind() == ErrorKind::UnexpectedEof {
            ReplayError::corrupt(format!("truncated record: expected {len} payload bytes"))
        } else {
            ReplayError::Io(e)
        }
    })?;
    Ok(true)
}

// ── Frame encode/decode ─────────────────────────────────────────

/// Append the payload encoding of `frame` (no length prefix).
pub fn encode_frame(buf: &mut Vec<u8>, frame: &Frame) {
    write_u32_le(buf, frame.index.0);
    write_i64_le(buf, frame.timestamp.seconds);
    write_u32_le(buf, frame.timestamp.nanos);
    encode_session(buf, &frame.session);
    encode_optional(buf, frame.bones.as_ref(), encode_bones);
    write_u32_le(buf, frame.events.len() as u32);
    for event in &frame.events {
        encode_event(buf, event);
    }
}

/// Decode one payload into `dst`, overwriting every field.
///
/// String, roster and bone buffers already held by `dst` are reused. On
/// error `dst` holds a partially decoded frame and should be discarded.
pub fn decode_frame_into(data: &[u8], dst: &mut Frame) -> Result<(), ReplayError> {
    let mut c = RecordCursor::new(data);
    dst.index = FrameIndex(c.read_u32_le()?);
    let seconds = c.read_i64_le()?;
    let nanos = c.read_u32_le()?;
    if nanos >= 1_000_000_000 {
        return Err(ReplayError::malformed(format!(
            "timestamp nanos {nanos} out of range"
        )));
    }
    dst.timestamp = Timestamp::new(seconds, nanos);
    decode_session_into(&mut c, &mut dst.session)?;
    decode_optional_into(&mut c, &mut dst.bones, decode_bones_into)?;

    let count = c.read_count(MIN_EVENT_LEN)?;
    dst.events.clear();
    dst.events.reserve(count);
    for _ in 0..count {
        dst.events.push(decode_event(&mut c)?);
    }
    c.finish()
}

/// Decode one payload into a fresh [`Frame`].
pub fn decode_frame(data: &[u8]) -> Result<Frame, ReplayError> {
    let mut frame = Frame::default();
    decode_frame_into(data, &mut frame)?;
    Ok(frame)
}

fn encode_optional<T>(buf: &mut Vec<u8>, value: Option<&T>, encode: fn(&mut Vec<u8>, &T)) {
    match value {
        Some(v) => {
            write_bool(buf, true);
            encode(buf, v);
        }
        None => write_bool(buf, false),
    }
}

fn decode_optional_into<'a, T: Default>(
    c: &mut RecordCursor<'a>,
    slot: &mut Option<T>,
    decode: impl FnOnce(&mut RecordCursor<'a>, &mut T) -> Result<(), ReplayError>,
) -> Result<(), ReplayError> {
    if c.read_bool()? {
        decode(c, slot.get_or_insert_with(T::default))
    } else {
        *slot = None;
        Ok(())
    }
}

// ── Session ─────────────────────────────────────────────────────

fn encode_session(buf: &mut Vec<u8>, s: &SessionSnapshot) {
    write_str(buf, &s.session_id);
    write_str(buf, &s.map_name);
    write_str(buf, &s.match_type);
    write_str(buf, &s.game_status);
    write_str(buf, &s.game_clock_display);
    write_f32_le(buf, s.game_clock);
    write_i32_le(buf, s.blue_points);
    write_i32_le(buf, s.orange_points);
    write_i32_le(buf, s.blue_round_score);
    write_i32_le(buf, s.orange_round_score);
    write_u32_le(buf, s.teams.len() as u32);
    for team in &s.teams {
        write_str(buf, &team.name);
        write_bool(buf, team.possession);
        write_u32_le(buf, team.players.len() as u32);
        for player in &team.players {
            encode_player(buf, player);
        }
    }
    encode_optional(buf, s.last_score.as_ref(), encode_last_score);
    encode_optional(buf, s.last_throw.as_ref(), encode_last_throw);
}

fn decode_session_into(
    c: &mut RecordCursor<'_>,
    dst: &mut SessionSnapshot,
) -> Result<(), ReplayError> {
    c.read_str_into(&mut dst.session_id)?;
    c.read_str_into(&mut dst.map_name)?;
    c.read_str_into(&mut dst.match_type)?;
    c.read_str_into(&mut dst.game_status)?;
    c.read_str_into(&mut dst.game_clock_display)?;
    dst.game_clock = c.read_f32_le()?;
    dst.blue_points = c.read_i32_le()?;
    dst.orange_points = c.read_i32_le()?;
    dst.blue_round_score = c.read_i32_le()?;
    dst.orange_round_score = c.read_i32_le()?;

    let teams = c.read_count(MIN_TEAM_LEN)?;
    dst.teams.resize_with(teams, Team::default);
    for team in &mut dst.teams {
        decode_team_into(c, team)?;
    }
    decode_optional_into(c, &mut dst.last_score, decode_last_score_into)?;
    decode_optional_into(c, &mut dst.last_throw, |c, t| {
        *t = decode_last_throw(c)?;
        Ok(())
    })
}

fn decode_team_into(c: &mut RecordCursor<'_>, dst: &mut Team) -> Result<(), ReplayError> {
    c.read_str_into(&mut dst.name)?;
    dst.possession = c.read_bool()?;
    let players = c.read_count(MIN_PLAYER_LEN)?;
    dst.players.resize_with(players, Player::default);
    for player in &mut dst.players {
        decode_player_into(c, player)?;
    }
    Ok(())
}

fn encode_player(buf: &mut Vec<u8>, p: &Player) {
    write_i32_le(buf, p.slot_number.0);
    write_str(buf, &p.display_name);
    write_u64_le(buf, p.account_id);
    write_i32_le(buf, p.jersey_number);
    write_i32_le(buf, p.level);
    write_i32_le(buf, p.ping);
    let mut flags = 0;
    if p.has_possession {
        flags |= FLAG_POSSESSION;
    }
    if p.is_stunned {
        flags |= FLAG_STUNNED;
    }
    write_u8(buf, flags);
    encode_stats(buf, &p.stats);
}

fn decode_player_into(c: &mut RecordCursor<'_>, dst: &mut Player) -> Result<(), ReplayError> {
    dst.slot_number = SlotId(c.read_i32_le()?);
    c.read_str_into(&mut dst.display_name)?;
    dst.account_id = c.read_u64_le()?;
    dst.jersey_number = c.read_i32_le()?;
    dst.level = c.read_i32_le()?;
    dst.ping = c.read_i32_le()?;
    let flags = c.read_u8()?;
    if flags & !(FLAG_POSSESSION | FLAG_STUNNED) != 0 {
        return Err(ReplayError::malformed(format!(
            "unknown player flags {flags:#04x}"
        )));
    }
    dst.has_possession = flags & FLAG_POSSESSION != 0;
    dst.is_stunned = flags & FLAG_STUNNED != 0;
    dst.stats = decode_stats(c)?;
    Ok(())
}

fn encode_stats(buf: &mut Vec<u8>, s: &PlayerStats) {
    for v in [
        s.saves,
        s.stuns,
        s.passes,
        s.points,
        s.goals,
        s.assists,
        s.steals,
        s.blocks,
        s.interceptions,
        s.catches,
        s.shots_taken,
    ] {
        write_i32_le(buf, v);
    }
    write_f32_le(buf, s.possession_time);
}

fn decode_stats(c: &mut RecordCursor<'_>) -> Result<PlayerStats, ReplayError> {
    Ok(PlayerStats {
        saves: c.read_i32_le()?,
        stuns: c.read_i32_le()?,
        passes: c.read_i32_le()?,
        points: c.read_i32_le()?,
        goals: c.read_i32_le()?,
        assists: c.read_i32_le()?,
        steals: c.read_i32_le()?,
        blocks: c.read_i32_le()?,
        interceptions: c.read_i32_le()?,
        catches: c.read_i32_le()?,
        shots_taken: c.read_i32_le()?,
        possession_time: c.read_f32_le()?,
    })
}

fn encode_last_score(buf: &mut Vec<u8>, s: &LastScore) {
    write_f32_le(buf, s.disc_speed);
    write_str(buf, &s.team);
    write_str(buf, &s.goal_type);
    write_i32_le(buf, s.point_amount);
    write_f32_le(buf, s.distance_thrown);
    write_str(buf, &s.person_scored);
    write_str(buf, &s.assist_scored);
}

fn decode_last_score_into(
    c: &mut RecordCursor<'_>,
    dst: &mut LastScore,
) -> Result<(), ReplayError> {
    dst.disc_speed = c.read_f32_le()?;
    c.read_str_into(&mut dst.team)?;
    c.read_str_into(&mut dst.goal_type)?;
    dst.point_amount = c.read_i32_le()?;
    dst.distance_thrown = c.read_f32_le()?;
    c.read_str_into(&mut dst.person_scored)?;
    c.read_str_into(&mut dst.assist_scored)?;
    Ok(())
}

fn encode_last_throw(buf: &mut Vec<u8>, t: &LastThrow) {
    for v in [
        t.arm_speed,
        t.total_speed,
        t.off_axis_spin_deg,
        t.wrist_throw_penalty,
        t.rot_per_sec,
        t.pot_speed_from_rot,
        t.speed_from_arm,
        t.speed_from_movement,
        t.speed_from_wrist,
        t.wrist_align_to_throw_deg,
        t.throw_align_to_movement_deg,
        t.off_axis_penalty,
        t.throw_move_penalty,
    ] {
        write_f32_le(buf, v);
    }
}

fn decode_last_throw(c: &mut RecordCursor<'_>) -> Result<LastThrow, ReplayError> {
    Ok(LastThrow {
        arm_speed: c.read_f32_le()?,
        total_speed: c.read_f32_le()?,
        off_axis_spin_deg: c.read_f32_le()?,
        wrist_throw_penalty: c.read_f32_le()?,
        rot_per_sec: c.read_f32_le()?,
        pot_speed_from_rot: c.read_f32_le()?,
        speed_from_arm: c.read_f32_le()?,
        speed_from_movement: c.read_f32_le()?,
        speed_from_wrist: c.read_f32_le()?,
        wrist_align_to_throw_deg: c.read_f32_le()?,
        throw_align_to_movement_deg: c.read_f32_le()?,
        off_axis_penalty: c.read_f32_le()?,
        throw_move_penalty: c.read_f32_le()?,
    })
}

// ── Bones ───────────────────────────────────────────────────────

fn encode_bones(buf: &mut Vec<u8>, b: &BonesSnapshot) {
    write_u32_le(buf, b.user_bones.len() as u32);
    for user in &b.user_bones {
        write_f32_slice(buf, &user.bone_t);
        write_f32_slice(buf, &user.bone_o);
    }
    write_i32_le(buf, b.err_code);
    write_str(buf, &b.err_description);
}

fn decode_bones_into(c: &mut RecordCursor<'_>, dst: &mut BonesSnapshot) -> Result<(), ReplayError> {
    let users = c.read_count(MIN_USER_BONES_LEN)?;
    dst.user_bones.resize_with(users, UserBones::default);
    for user in &mut dst.user_bones {
        c.read_f32_vec_into(&mut user.bone_t)?;
        c.read_f32_vec_into(&mut user.bone_o)?;
    }
    dst.err_code = c.read_i32_le()?;
    c.read_str_into(&mut dst.err_description)
}

// ── Events ──────────────────────────────────────────────────────

fn encode_event(buf: &mut Vec<u8>, event: &DomainEvent) {
    write_u8(buf, event.kind().tag());
    match event {
        DomainEvent::PlayerJoined(j) => {
            encode_player(buf, &j.player);
            write_u8(buf, j.role.tag());
        }
        DomainEvent::PlayerLeft(l) => {
            write_i32_le(buf, l.slot.0);
            write_str(buf, &l.display_name);
        }
        DomainEvent::ScoreboardUpdated(u) => {
            write_i32_le(buf, u.blue_points);
            write_i32_le(buf, u.orange_points);
            write_i32_le(buf, u.blue_round_score);
            write_i32_le(buf, u.orange_round_score);
            write_str(buf, &u.game_clock_display);
        }
        DomainEvent::GoalScored(s) => encode_last_score(buf, s),
        DomainEvent::DiscPossessionChanged(p) => {
            write_i32_le(buf, p.previous_slot.0);
            write_i32_le(buf, p.current_slot.0);
        }
        DomainEvent::DiscThrown(t) => {
            write_i32_le(buf, t.player_slot.0);
            encode_last_throw(buf, &t.throw);
        }
        DomainEvent::PlayerSave(i) | DomainEvent::PlayerStun(i) | DomainEvent::PlayerPass(i) => {
            write_i32_le(buf, i.slot.0);
            write_i32_le(buf, i.total);
        }
        DomainEvent::RoundEnded | DomainEvent::MatchEnded => {}
    }
}

fn decode_event(c: &mut RecordCursor<'_>) -> Result<DomainEvent, ReplayError> {
    let tag = c.read_u8()?;
    let kind = EventKind::from_tag(tag).ok_or(ReplayError::UnknownEventTag { tag })?;
    Ok(match kind {
        EventKind::PlayerJoined => {
            let mut player = Player::default();
            decode_player_into(c, &mut player)?;
            let role_tag = c.read_u8()?;
            let role = Role::from_tag(role_tag).ok_or_else(|| {
                ReplayError::malformed(format!("unknown role tag {role_tag}"))
            })?;
            DomainEvent::PlayerJoined(PlayerJoined { player, role })
        }
        EventKind::PlayerLeft => DomainEvent::PlayerLeft(PlayerLeft {
            slot: SlotId(c.read_i32_le()?),
            display_name: c.read_string()?,
        }),
        EventKind::ScoreboardUpdated => DomainEvent::ScoreboardUpdated(ScoreboardUpdated {
            blue_points: c.read_i32_le()?,
            orange_points: c.read_i32_le()?,
            blue_round_score: c.read_i32_le()?,
            orange_round_score: c.read_i32_le()?,
            game_clock_display: c.read_string()?,
        }),
        EventKind::GoalScored => {
            let mut score = LastScore::default();
            decode_last_score_into(c, &mut score)?;
            DomainEvent::GoalScored(score)
        }
        EventKind::DiscPossessionChanged => {
            DomainEvent::DiscPossessionChanged(DiscPossessionChanged {
                previous_slot: SlotId(c.read_i32_le()?),
                current_slot: SlotId(c.read_i32_le()?),
            })
        }
        EventKind::DiscThrown => DomainEvent::DiscThrown(DiscThrown {
            player_slot: SlotId(c.read_i32_le()?),
            throw: decode_last_throw(c)?,
        }),
        EventKind::PlayerSave => DomainEvent::PlayerSave(decode_increment(c)?),
        EventKind::PlayerStun => DomainEvent::PlayerStun(decode_increment(c)?),
        EventKind::PlayerPass => DomainEvent::PlayerPass(decode_increment(c)?),
        EventKind::RoundEnded => DomainEvent::RoundEnded,
        EventKind::MatchEnded => DomainEvent::MatchEnded,
    })
}

fn decode_increment(c: &mut RecordCursor<'_>) -> Result<StatIncrement, ReplayError> {
    Ok(StatIncrement {
        slot: SlotId(c.read_i32_le()?),
        total: c.read_i32_le()?,
    })
}
