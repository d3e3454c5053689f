//! Raw payload decoding.
//!
//! The telemetry transport hands the processor opaque bytes per tick. A
//! [`FrameDecoder`] turns them into the canonical snapshot types; the
//! stock [`JsonFrameDecoder`] reads the JSON documents served by the
//! game's local API.

use tickcap_core::{BonesSnapshot, SessionSnapshot};

use crate::error::{DecodeError, PayloadKind};

/// Turns raw per-tick payloads into snapshots.
///
/// Implementations must tolerate missing or `null` optional fields and
/// fail only on malformed required structure.
pub trait FrameDecoder {
    /// Decode a session payload into `dst`.
    ///
    /// An empty payload is an error. On error `dst` is left unchanged.
    fn decode_session(
        &mut self,
        payload: &[u8],
        dst: &mut SessionSnapshot,
    ) -> Result<(), DecodeError>;

    /// Decode an optional bones payload into `dst`.
    ///
    /// An empty payload means "no bones data this tick" and sets `dst` to
    /// `None`. On error `dst` is left unchanged.
    fn decode_bones(
        &mut self,
        payload: &[u8],
        dst: &mut Option<BonesSnapshot>,
    ) -> Result<(), DecodeError>;
}

/// [`FrameDecoder`] for JSON payloads.
///
/// Unknown keys are ignored and absent or `null` keys take their
/// defaults, so only syntax errors and type mismatches fail.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonFrameDecoder;

impl FrameDecoder for JsonFrameDecoder {
    fn decode_session(
        &mut self,
        payload: &[u8],
        dst: &mut SessionSnapshot,
    ) -> Result<(), DecodeError> {
        if payload.is_empty() {
            return Err(DecodeError::Empty {
                payload: PayloadKind::Session,
            });
        }
        *dst = serde_json::from_slice(payload).map_err(|source| DecodeError::Malformed {
            payload: PayloadKind::Session,
            source,
        })?;
        Ok(())
    }

    fn decode_bones(
        &mut self,
        payload: &[u8],
        dst: &mut Option<BonesSnapshot>,
    ) -> Result<(), DecodeError> {
        if payload.is_empty() {
            *dst = None;
            return Ok(());
        }
        let bones = serde_json::from_slice(payload).map_err(|source| DecodeError::Malformed {
            payload: PayloadKind::Bones,
            source,
        })?;
        *dst = Some(bones);
        Ok(())
    }
}
