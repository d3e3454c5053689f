//! Error types for frame processing and recording.

use std::fmt;

use thiserror::Error;
use tickcap_replay::ReplayError;

use crate::config::ConfigError;

/// Which raw payload a [`DecodeError`] came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PayloadKind {
    /// The per-tick session payload.
    Session,
    /// The optional per-tick bones payload.
    Bones,
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Session => "session",
            Self::Bones => "bones",
        })
    }
}

/// A raw payload with malformed required structure.
///
/// Missing optional fields never produce this error.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// A required payload was empty.
    #[error("{payload} payload is empty")]
    Empty {
        /// Payload that was empty.
        payload: PayloadKind,
    },
    /// The payload is not a structurally valid document.
    #[error("{payload} payload is malformed: {source}")]
    Malformed {
        /// Payload that failed to decode.
        payload: PayloadKind,
        /// Underlying parser error, with line and column.
        #[source]
        source: serde_json::Error,
    },
}

impl DecodeError {
    /// The payload this error came from.
    pub fn payload(&self) -> PayloadKind {
        match self {
            Self::Empty { payload } | Self::Malformed { payload, .. } => *payload,
        }
    }
}

/// Errors from the recording pipeline.
#[derive(Debug, Error)]
pub enum RecordError {
    /// A payload could not be decoded; nothing was recorded.
    #[error(transparent)]
    Decode(#[from] DecodeError),
    /// The replay log rejected the frame.
    #[error(transparent)]
    Replay(#[from] ReplayError),
    /// Invalid configuration, or the writer thread could not start.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The background writer thread is no longer accepting frames.
    #[error("background writer has stopped")]
    Disconnected,
    /// The background writer thread panicked.
    #[error("background writer thread panicked")]
    WorkerPanicked,
}
