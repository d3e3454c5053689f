//! Synchronous capture: process a tick and append it to the replay log in
//! one call. [`open_capture`] reads a finished log back with the same
//! configuration.

use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;
use std::time::SystemTime;

use tickcap_core::Frame;
use tickcap_replay::{ReplayReader, ReplayWriter};

use crate::config::CaptureConfig;
use crate::decode::{FrameDecoder, JsonFrameDecoder};
use crate::error::RecordError;
use crate::processor::FrameProcessor;

/// A [`FrameProcessor`] feeding a [`ReplayWriter`] through one reused
/// scratch frame.
///
/// Decode failures are returned and nothing is written for that tick; the
/// recorder stays usable. Replay errors are returned as-is.
pub struct CaptureRecorder<W: Write, D: FrameDecoder = JsonFrameDecoder> {
    processor: FrameProcessor<D>,
    writer: ReplayWriter<W>,
    scratch: Frame,
}

impl CaptureRecorder<File> {
    /// Validate `config` and start a new replay log at `path`.
    pub fn create(path: impl AsRef<Path>, config: &CaptureConfig) -> Result<Self, RecordError> {
        config.validate()?;
        let writer = ReplayWriter::create_with_config(path, config.writer)?;
        Ok(Self::new(writer))
    }
}

/// Validate `config` and open the replay log at `path` for reading.
pub fn open_capture(
    path: impl AsRef<Path>,
    config: &CaptureConfig,
) -> Result<ReplayReader<BufReader<File>>, RecordError> {
    config.validate()?;
    Ok(ReplayReader::open_with_config(path, config.reader)?)
}

impl<W: Write> CaptureRecorder<W> {
    /// Record into `writer` with a JSON frame processor.
    pub fn new(writer: ReplayWriter<W>) -> Self {
        Self::with_processor(FrameProcessor::new(), writer)
    }
}

impl<W: Write, D: FrameDecoder> CaptureRecorder<W, D> {
    /// Record into `writer` using `processor`.
    pub fn with_processor(processor: FrameProcessor<D>, writer: ReplayWriter<W>) -> Self {
        Self {
            processor,
            writer,
            scratch: Frame::default(),
        }
    }

    /// Process one tick and append it to the log.
    ///
    /// Returns the frame as written; it is overwritten by the next call.
    pub fn record(
        &mut self,
        session: &[u8],
        bones: &[u8],
        timestamp: SystemTime,
    ) -> Result<&Frame, RecordError> {
        self.processor
            .process_frame_into(&mut self.scratch, session, bones, timestamp)?;
        self.writer.write_frame(&self.scratch)?;
        Ok(&self.scratch)
    }

    /// Begin a new capture session in the same log.
    pub fn reset(&mut self) {
        self.processor.reset();
    }

    /// The frame processor.
    pub fn processor(&self) -> &FrameProcessor<D> {
        &self.processor
    }

    /// The replay writer.
    pub fn writer(&self) -> &ReplayWriter<W> {
        &self.writer
    }

    /// Flush buffered frames to the sink.
    pub fn flush(&mut self) -> Result<(), RecordError> {
        self.writer.flush()?;
        Ok(())
    }

    /// Flush and release the sink.
    pub fn close(&mut self) -> Result<(), RecordError> {
        self.writer.close()?;
        Ok(())
    }

    /// Flush and return the sink.
    pub fn finish(self) -> Result<W, RecordError> {
        Ok(self.writer.finish()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;
    use std::time::UNIX_EPOCH;
    use tickcap_core::FrameIndex;
    use tickcap_replay::{ReaderConfig, ReplayError};
    use tickcap_test_utils::{player, session_json, SessionBuilder};

    #[test]
    fn recorded_frames_read_back() {
        let mut recorder = CaptureRecorder::new(ReplayWriter::new(Vec::new()).unwrap());
        let empty = session_json(&SessionBuilder::new().build());
        let joined = session_json(&SessionBuilder::new().player(player(1, "Player1", 0)).build());

        let first = recorder.record(&empty, b"", UNIX_EPOCH).unwrap().clone();
        let second = recorder.record(&joined, b"", UNIX_EPOCH).unwrap().clone();
        assert!(recorder.record(b"", b"", UNIX_EPOCH).is_err());
        assert_eq!(recorder.writer().frames_written(), 2);

        let bytes = recorder.finish().unwrap();
        let mut reader = ReplayReader::from_reader(bytes.as_slice()).unwrap();
        assert_eq!(reader.next_frame().unwrap(), Some(first));
        let read = reader.next_frame().unwrap().unwrap();
        assert_eq!(read.index, FrameIndex(1));
        assert_eq!(read, second);
        assert!(reader.next_frame().unwrap().is_none());
    }

    #[test]
    fn record_after_close_fails() {
        let mut recorder = CaptureRecorder::new(ReplayWriter::new(Vec::new()).unwrap());
        recorder.close().unwrap();
        let payload = session_json(&SessionBuilder::new().build());
        let err = recorder.record(&payload, b"", UNIX_EPOCH).unwrap_err();
        assert!(matches!(
            err,
            RecordError::Replay(ReplayError::WriterClosed)
        ));
    }

    #[test]
    fn create_rejects_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = CaptureConfig {
            tick_rate_hz: 0.0,
            ..CaptureConfig::default()
        };
        let result = CaptureRecorder::create(dir.path().join("x.tcap"), &config);
        assert!(matches!(result, Err(RecordError::Config(_))));
    }

    #[test]
    fn capture_reopens_with_its_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("capture.tcap");
        let config = CaptureConfig::default();
        let mut recorder = CaptureRecorder::create(&path, &config).unwrap();
        let joined = session_json(&SessionBuilder::new().player(player(1, "Player1", 0)).build());
        recorder.record(&joined, b"", UNIX_EPOCH).unwrap();
        recorder.close().unwrap();

        let mut reader = open_capture(&path, &config).unwrap();
        assert!(reader.next_frame().unwrap().is_some());
        assert!(reader.next_frame().unwrap().is_none());

        let strict = CaptureConfig {
            reader: ReaderConfig { max_record_len: 8 },
            ..config
        };
        let mut reader = open_capture(&path, &strict).unwrap();
        assert!(matches!(
            reader.next_frame(),
            Err(ReplayError::CorruptRecord { .. })
        ));
    }

    #[test]
    fn open_capture_rejects_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("capture.tcap");
        CaptureRecorder::create(&path, &CaptureConfig::default())
            .unwrap()
            .close()
            .unwrap();
        let config = CaptureConfig {
            reader: ReaderConfig { max_record_len: 0 },
            ..CaptureConfig::default()
        };
        let result = open_capture(&path, &config);
        assert!(matches!(
            result,
            Err(RecordError::Config(ConfigError::RecordLimitZero))
        ));
    }
}
