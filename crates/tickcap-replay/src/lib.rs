//! Append-only replay log for tickcap capture frames.
//!
//! Persists the assembled [`Frame`](tickcap_core::Frame) sequence of a
//! capture session so it can be played back exactly, in order.
//!
//! # Architecture
//!
//! - [`ReplayWriter`] buffers length-prefixed records and flushes them to
//!   any `Write` sink once a byte threshold is reached or on close
//! - [`ReplayReader`] decodes records sequentially from any `Read` source
//!   into a caller-owned frame
//! - All I/O uses a custom binary codec ([`codec`]); there is no seeking
//!
//! # Format
//!
//! ```text
//! [MAGIC "TCAP"] [VERSION u8]
//! [len u32][Frame 1] [len u32][Frame 2] ... [len u32][Frame N]
//! ```
//!
//! Each record is a little-endian `u32` payload length followed by the
//! frame: index, timestamp, session snapshot, optional bones snapshot and
//! the derived events.

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod codec;
pub mod config;
pub mod error;
pub mod reader;
pub mod writer;

pub use config::{ReaderConfig, WriterConfig, DEFAULT_FLUSH_THRESHOLD, DEFAULT_MAX_RECORD_LEN};
pub use error::ReplayError;
pub use reader::{FrameIter, ReplayReader};
pub use writer::ReplayWriter;

/// Magic bytes identifying a tickcap replay log.
pub const MAGIC: [u8; 4] = *b"TCAP";

/// Current replay format version.
pub const FORMAT_VERSION: u8 = 1;
