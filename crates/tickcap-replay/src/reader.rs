//! Replay playback reader.
//!
//! [`ReplayReader`] reads frames sequentially from any `Read` source,
//! decoding the binary replay format. The header is validated on
//! construction. There is no seeking: reopen the source to start over.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::{debug, warn};
use tickcap_core::Frame;

use crate::codec::{decode_frame_into, decode_header, read_record};
use crate::config::ReaderConfig;
use crate::error::ReplayError;

/// Reads replay data from a byte stream.
///
/// Generic over `R: Read` so tests can use `&[u8]` and production code can
/// use `BufReader<File>`. One record buffer is kept and reused, so steady
/// state reads into a reused [`Frame`] do not allocate for the record.
pub struct ReplayReader<R: Read> {
    source: Option<R>,
    record: Vec<u8>,
    max_record_len: u32,
    frames_read: u64,
}

impl ReplayReader<BufReader<File>> {
    /// Open the replay log at `path` with default settings.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ReplayError> {
        Self::open_with_config(path, ReaderConfig::default())
    }

    /// Open the replay log at `path`.
    pub fn open_with_config(
        path: impl AsRef<Path>,
        config: ReaderConfig,
    ) -> Result<Self, ReplayError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        debug!("replay log opened at {}", path.display());
        Self::with_config(BufReader::new(file), config)
    }
}

impl<R: Read> ReplayReader<R> {
    /// Wrap a replay stream, reading and validating the header.
    pub fn from_reader(source: R) -> Result<Self, ReplayError> {
        Self::with_config(source, ReaderConfig::default())
    }

    /// Wrap a replay stream, reading and validating the header.
    pub fn with_config(mut source: R, config: ReaderConfig) -> Result<Self, ReplayError> {
        decode_header(&mut source)?;
        Ok(Self {
            source: Some(source),
            record: Vec::new(),
            max_record_len: config.max_record_len,
            frames_read: 0,
        })
    }

    /// Decode the next record into `dst`.
    ///
    /// Returns `Ok(true)` when a frame was decoded and `Ok(false)` at a
    /// clean end of stream, leaving `dst` untouched. A truncated record
    /// is [`ReplayError::CorruptRecord`].
    pub fn read_frame_to(&mut self, dst: &mut Frame) -> Result<bool, ReplayError> {
        let source = self.source.as_mut().ok_or(ReplayError::ReaderClosed)?;
        match read_record(source, &mut self.record, self.max_record_len) {
            Ok(true) => {}
            Ok(false) => {
                debug!("replay stream ended after {} frames", self.frames_read);
                return Ok(false);
            }
            Err(e) => {
                if matches!(e, ReplayError::CorruptRecord { .. }) {
                    warn!("corrupt record after frame {}: {e}", self.frames_read);
                }
                return Err(e);
            }
        }
        decode_frame_into(&self.record, dst)?;
        self.frames_read += 1;
        Ok(true)
    }

    /// Read the next frame into a fresh allocation, or `None` at the end.
    pub fn next_frame(&mut self) -> Result<Option<Frame>, ReplayError> {
        let mut frame = Frame::default();
        Ok(self.read_frame_to(&mut frame)?.then_some(frame))
    }

    /// Number of frames read so far.
    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }

    /// Release the source. A second call returns
    /// [`ReplayError::ReaderClosed`], as does any later read.
    pub fn close(&mut self) -> Result<(), ReplayError> {
        self.source.take().ok_or(ReplayError::ReaderClosed)?;
        debug!("replay reader closed after {} frames", self.frames_read);
        Ok(())
    }

    /// `true` once [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.source.is_none()
    }

    /// Convert into a frame iterator.
    pub fn frames(self) -> FrameIter<R> {
        FrameIter {
            reader: self,
            done: false,
        }
    }
}

/// Iterator adapter over replay frames.
///
/// Yields each frame once and stops after the first error.
pub struct FrameIter<R: Read> {
    reader: ReplayReader<R>,
    done: bool,
}

impl<R: Read> FrameIter<R> {
    /// Frames yielded so far.
    pub fn frames_read(&self) -> u64 {
        self.reader.frames_read()
    }
}

impl<R: Read> Iterator for FrameIter<R> {
    type Item = Result<Frame, ReplayError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.reader.next_frame() {
            Ok(Some(frame)) => Some(Ok(frame)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{HEADER_LEN, RECORD_HEADER_LEN};
    use crate::config::WriterConfig;
    use crate::writer::ReplayWriter;
    use tickcap_core::FrameIndex;
    use tickcap_test_utils::frame_with_every_event;

    fn recorded(n: u32) -> Vec<u8> {
        let mut buf = Vec::new();
        let mut writer = ReplayWriter::new(&mut buf).unwrap();
        for i in 0..n {
            writer.write_frame(&frame_with_every_event(i)).unwrap();
        }
        writer.finish().unwrap();
        buf
    }

    #[test]
    fn roundtrip_write_read_frames() {
        let buf = recorded(5);
        let mut reader = ReplayReader::from_reader(buf.as_slice()).unwrap();
        let mut frame = Frame::default();
        for i in 0..5u32 {
            assert!(reader.read_frame_to(&mut frame).unwrap());
            assert_eq!(frame, frame_with_every_event(i));
        }
        assert!(!reader.read_frame_to(&mut frame).unwrap());
        assert_eq!(reader.frames_read(), 5);
        // dst untouched at end of stream
        assert_eq!(frame.index, FrameIndex(4));
    }

    #[test]
    fn frame_iterator_works() {
        let buf = recorded(3);
        let reader = ReplayReader::from_reader(buf.as_slice()).unwrap();
        let frames: Vec<_> = reader.frames().collect::<Result<Vec<_>, _>>().unwrap();
        let indices: Vec<u32> = frames.iter().map(|f| f.index.0).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn empty_log_is_clean_eof() {
        let buf = recorded(0);
        assert_eq!(buf.len(), HEADER_LEN);
        let mut reader = ReplayReader::from_reader(buf.as_slice()).unwrap();
        assert!(reader.next_frame().unwrap().is_none());
    }

    #[test]
    fn truncated_stream_errors() {
        let mut buf = recorded(2);
        buf.truncate(buf.len() - 4);
        let mut reader = ReplayReader::from_reader(buf.as_slice()).unwrap();
        assert!(reader.next_frame().unwrap().is_some());
        assert!(matches!(
            reader.next_frame(),
            Err(ReplayError::CorruptRecord { .. })
        ));
    }

    #[test]
    fn iterator_stops_after_error() {
        let mut buf = recorded(2);
        buf.truncate(HEADER_LEN + RECORD_HEADER_LEN + 1);
        let reader = ReplayReader::from_reader(buf.as_slice()).unwrap();
        let results: Vec<_> = reader.frames().collect();
        assert_eq!(results.len(), 1);
        assert!(results[0].is_err());
    }

    #[test]
    fn record_limit_enforced() {
        let buf = recorded(1);
        let config = ReaderConfig { max_record_len: 8 };
        let mut reader = ReplayReader::with_config(buf.as_slice(), config).unwrap();
        assert!(matches!(
            reader.next_frame(),
            Err(ReplayError::CorruptRecord { .. })
        ));
    }

    #[test]
    fn reads_after_close_fail() {
        let buf = recorded(1);
        let mut reader = ReplayReader::from_reader(buf.as_slice()).unwrap();
        reader.close().unwrap();
        assert!(reader.is_closed());
        let mut frame = Frame::default();
        assert!(matches!(
            reader.read_frame_to(&mut frame),
            Err(ReplayError::ReaderClosed)
        ));
        assert!(matches!(reader.close(), Err(ReplayError::ReaderClosed)));
    }

    #[test]
    fn bad_magic_on_open() {
        let data = b"XCAP\x01rest of data";
        let result = ReplayReader::from_reader(data.as_slice());
        assert!(matches!(result, Err(ReplayError::InvalidMagic)));
    }

    #[test]
    fn small_flush_threshold_is_transparent() {
        let mut buf = Vec::new();
        let config = WriterConfig { flush_threshold: 1 };
        let mut writer = ReplayWriter::with_config(&mut buf, config).unwrap();
        for i in 0..4 {
            writer.write_frame(&frame_with_every_event(i)).unwrap();
        }
        writer.finish().unwrap();
        assert_eq!(buf, recorded(4));
    }
}
