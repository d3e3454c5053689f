//! Tunables for [`ReplayWriter`](crate::ReplayWriter) and
//! [`ReplayReader`](crate::ReplayReader).

use serde::{Deserialize, Serialize};

/// Default number of buffered bytes that triggers a flush.
pub const DEFAULT_FLUSH_THRESHOLD: usize = 64 * 1024;

/// Default upper bound on a single record's declared length.
pub const DEFAULT_MAX_RECORD_LEN: u32 = 64 * 1024 * 1024;

/// Writer configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    /// Buffered bytes at or above which the buffer is written to the sink.
    /// Zero flushes after every frame.
    pub flush_threshold: usize,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            flush_threshold: DEFAULT_FLUSH_THRESHOLD,
        }
    }
}

/// Reader configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Records declaring a longer payload are rejected as corrupt rather
    /// than allocated.
    pub max_record_len: u32,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            max_record_len: DEFAULT_MAX_RECORD_LEN,
        }
    }
}
