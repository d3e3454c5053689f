//! Replay recording writer.
//!
//! [`ReplayWriter`] encodes frames into an internal buffer and hands that
//! buffer to its `Write` sink once it reaches the flush threshold. The
//! header is written to the sink immediately on construction.

use std::fs::File;
use std::io::{self, ErrorKind, Write};
use std::path::Path;

use log::{debug, trace, warn};
use tickcap_core::Frame;

use crate::codec::{encode_header, encode_record, HEADER_LEN};
use crate::config::WriterConfig;
use crate::error::ReplayError;

/// Record size assumed for batch reservation before anything was written.
const INITIAL_RECORD_ESTIMATE: usize = 512;

/// Writes replay data to a byte stream.
///
/// Generic over `W: Write` so tests can use `Vec<u8>` and production code
/// can use a [`File`]. Frames are buffered, so the sink needs no buffering
/// of its own.
///
/// After [`close`](Self::close) every write returns
/// [`ReplayError::WriterClosed`]. Dropping an open writer makes a
/// best-effort flush and logs a warning.
///
/// # Sink failures
///
/// A frame is buffered before any flush it triggers, so an I/O error from
/// [`write_frame`](Self::write_frame) means the frame is held in the
/// buffer but the sink failed. From then on every write and flush returns
/// [`ReplayError::WriterFailed`] instead of buffering more frames.
/// Bytes the sink accepted before failing are never sent again, and
/// [`close`](Self::close) makes one last attempt to write the rest.
///
/// # Examples
///
/// ```
/// use tickcap_core::{Frame, FrameIndex};
/// use tickcap_replay::{ReplayReader, ReplayWriter};
///
/// // Write two frames to an in-memory buffer.
/// let mut buf = Vec::new();
/// let mut writer = ReplayWriter::new(&mut buf).unwrap();
/// for i in 0..2u32 {
///     let frame = Frame { index: FrameIndex(i), ..Frame::default() };
///     writer.write_frame(&frame).unwrap();
/// }
/// assert_eq!(writer.frames_written(), 2);
/// writer.finish().unwrap();
///
/// // Read them back.
/// let mut reader = ReplayReader::from_reader(buf.as_slice()).unwrap();
/// let mut frame = Frame::default();
/// assert!(reader.read_frame_to(&mut frame).unwrap());
/// assert_eq!(frame.index, FrameIndex(0));
/// assert!(reader.read_frame_to(&mut frame).unwrap());
/// assert_eq!(frame.index, FrameIndex(1));
/// assert!(!reader.read_frame_to(&mut frame).unwrap());
/// ```
pub struct ReplayWriter<W: Write> {
    sink: Option<W>,
    buf: Vec<u8>,
    flush_threshold: usize,
    frames_written: u64,
    record_bytes: u64,
    bytes_flushed: u64,
    failed: bool,
}

impl ReplayWriter<File> {
    /// Create (or truncate) a replay log at `path` with default settings.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, ReplayError> {
        Self::create_with_config(path, WriterConfig::default())
    }

    /// Create (or truncate) a replay log at `path`.
    pub fn create_with_config(
        path: impl AsRef<Path>,
        config: WriterConfig,
    ) -> Result<Self, ReplayError> {
        let path = path.as_ref();
        let file = File::create(path)?;
        debug!("replay log created at {}", path.display());
        Self::with_config(file, config)
    }
}

impl<W: Write> ReplayWriter<W> {
    /// Create a new replay writer with default settings, immediately
    /// writing the header.
    pub fn new(sink: W) -> Result<Self, ReplayError> {
        Self::with_config(sink, WriterConfig::default())
    }

    /// Create a new replay writer, immediately writing the header.
    pub fn with_config(mut sink: W, config: WriterConfig) -> Result<Self, ReplayError> {
        encode_header(&mut sink)?;
        Ok(Self {
            sink: Some(sink),
            buf: Vec::with_capacity(config.flush_threshold.saturating_add(INITIAL_RECORD_ESTIMATE)),
            flush_threshold: config.flush_threshold,
            frames_written: 0,
            record_bytes: 0,
            bytes_flushed: HEADER_LEN as u64,
            failed: false,
        })
    }

    /// Append one frame as a length-prefixed record.
    ///
    /// Flushes to the sink if the buffer reaches the threshold.
    pub fn write_frame(&mut self, frame: &Frame) -> Result<(), ReplayError> {
        self.ensure_open()?;
        self.record_bytes += encode_record(&mut self.buf, frame)? as u64;
        self.frames_written += 1;
        self.flush_if_full()
    }

    /// Append `frames` in order.
    ///
    /// Produces the same bytes as calling [`write_frame`](Self::write_frame)
    /// once per frame, with a single up-front reservation and at most one
    /// threshold check. If a frame fails to encode, the frames before it
    /// stay buffered.
    pub fn write_frame_batch(&mut self, frames: &[Frame]) -> Result<(), ReplayError> {
        self.ensure_open()?;
        if frames.is_empty() {
            return Ok(());
        }
        self.buf.reserve(self.record_estimate() * frames.len());
        for frame in frames {
            self.record_bytes += encode_record(&mut self.buf, frame)? as u64;
            self.frames_written += 1;
        }
        self.flush_if_full()
    }

    /// Bytes encoded but not yet handed to the sink.
    pub fn buffer_size(&self) -> usize {
        self.buf.len()
    }

    /// Write out the buffer and flush the sink.
    pub fn flush(&mut self) -> Result<(), ReplayError> {
        self.ensure_open()?;
        self.write_buffer(true)
    }

    /// Flush remaining bytes and release the sink.
    ///
    /// The sink is released even if the final flush fails. A second call
    /// returns [`ReplayError::WriterClosed`].
    pub fn close(&mut self) -> Result<(), ReplayError> {
        let mut sink = self.sink.take().ok_or(ReplayError::WriterClosed)?;
        let result = finish_sink(&mut sink, &mut self.buf, &mut self.bytes_flushed);
        debug!(
            "replay writer closed: {} frames, {} bytes",
            self.frames_written, self.bytes_flushed
        );
        result
    }

    /// Flush remaining bytes and return the sink.
    pub fn finish(mut self) -> Result<W, ReplayError> {
        let mut sink = self.sink.take().ok_or(ReplayError::WriterClosed)?;
        finish_sink(&mut sink, &mut self.buf, &mut self.bytes_flushed)?;
        Ok(sink)
    }

    /// `true` once [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.sink.is_none()
    }

    /// `true` once a write to the sink has failed.
    pub fn has_failed(&self) -> bool {
        self.failed
    }

    /// Number of frames written so far.
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    /// Bytes handed to the sink so far, header included.
    pub fn bytes_flushed(&self) -> u64 {
        self.bytes_flushed
    }

    fn ensure_open(&self) -> Result<(), ReplayError> {
        if self.sink.is_none() {
            Err(ReplayError::WriterClosed)
        } else if self.failed {
            Err(ReplayError::WriterFailed)
        } else {
            Ok(())
        }
    }

    fn record_estimate(&self) -> usize {
        if self.frames_written == 0 {
            INITIAL_RECORD_ESTIMATE
        } else {
            (self.record_bytes / self.frames_written) as usize
        }
    }

    fn flush_if_full(&mut self) -> Result<(), ReplayError> {
        if self.buf.len() < self.flush_threshold {
            return Ok(());
        }
        self.write_buffer(false)
    }

    fn write_buffer(&mut self, flush_sink: bool) -> Result<(), ReplayError> {
        let sink = self.sink.as_mut().ok_or(ReplayError::WriterClosed)?;
        let mut result = drain(sink, &mut self.buf, &mut self.bytes_flushed);
        if result.is_ok() && flush_sink {
            result = sink.flush().map_err(ReplayError::from);
        }
        if let Err(e) = &result {
            self.failed = true;
            warn!(
                "replay writer stopped after {} frames, {} bytes buffered: {e}",
                self.frames_written,
                self.buf.len()
            );
        }
        result
    }
}

impl<W: Write> Drop for ReplayWriter<W> {
    fn drop(&mut self) {
        let Some(sink) = self.sink.as_mut() else {
            return;
        };
        warn!(
            "replay writer dropped without close; flushing {} buffered bytes",
            self.buf.len()
        );
        if let Err(e) = finish_sink(sink, &mut self.buf, &mut self.bytes_flushed) {
            warn!("best-effort flush of dropped replay writer failed: {e}");
        }
    }
}

/// Hand the buffer to the sink, removing every byte it accepts.
///
/// On error the accepted prefix is removed all the same, so the next
/// attempt resumes where the sink stopped.
fn drain<W: Write>(sink: &mut W, buf: &mut Vec<u8>, flushed: &mut u64) -> Result<(), ReplayError> {
    let mut written = 0;
    let result = loop {
        if written == buf.len() {
            break Ok(());
        }
        match sink.write(&buf[written..]) {
            Ok(0) => break Err(io::Error::from(ErrorKind::WriteZero)),
            Ok(n) => written += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => break Err(e),
        }
    };
    buf.drain(..written);
    *flushed += written as u64;
    if written > 0 {
        trace!("replay writer flushed {written} bytes");
    }
    Ok(result?)
}

fn finish_sink<W: Write>(
    sink: &mut W,
    buf: &mut Vec<u8>,
    flushed: &mut u64,
) -> Result<(), ReplayError> {
    drain(sink, buf, flushed)?;
    sink.flush()?;
    Ok(())
}
