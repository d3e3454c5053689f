//! Error types for the replay log.

use std::io;

use thiserror::Error;

/// Errors that can occur while writing or reading a replay log.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// An I/O error occurred on the backing store.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// The stream does not start with the expected `b"TCAP"` magic bytes.
    #[error("invalid magic bytes (expected b\"TCAP\")")]
    InvalidMagic,
    /// The format version is not supported by this build.
    #[error("unsupported format version {found}")]
    UnsupportedVersion {
        /// The version found in the stream.
        found: u8,
    },
    /// A record is truncated or declares an impossible length.
    #[error("corrupt record: {detail}")]
    CorruptRecord {
        /// Human-readable description of what went wrong.
        detail: String,
    },
    /// A complete record whose payload does not decode.
    #[error("malformed frame: {detail}")]
    MalformedFrame {
        /// Human-readable description of what went wrong.
        detail: String,
    },
    /// An event tag is not recognized.
    #[error("unknown event tag {tag}")]
    UnknownEventTag {
        /// The unrecognized tag.
        tag: u8,
    },
    /// A record payload exceeds the 4-byte length prefix.
    #[error("record of {len} bytes does not fit a u32 length prefix")]
    RecordTooLarge {
        /// Encoded payload length.
        len: usize,
    },
    /// The writer has already been closed.
    #[error("replay writer is closed")]
    WriterClosed,
    /// An earlier write to the sink failed; the writer accepts no more
    /// frames. [`close`](crate::ReplayWriter::close) still attempts to
    /// write out what is buffered.
    #[error("replay writer stopped after an earlier I/O failure")]
    WriterFailed,
    /// The reader has already been closed.
    #[error("replay reader is closed")]
    ReaderClosed,
}

impl ReplayError {
    pub(crate) fn malformed(detail: impl Into<String>) -> Self {
        Self::MalformedFrame {
            detail: detail.into(),
        }
    }

    pub(crate) fn corrupt(detail: impl Into<String>) -> Self {
        Self::CorruptRecord {
            detail: detail.into(),
        }
    }

    /// `true` for the closed-writer and closed-reader state errors.
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::WriterClosed | Self::ReaderClosed)
    }
}
