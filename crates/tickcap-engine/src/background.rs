//! Replay writing on a dedicated thread.
//!
//! ```text
//!   capture loop                     tickcap-writer thread
//!     |--send(frame)-------------->| rx.recv()
//!     |   [tx: bounded(capacity)]  | + rx.try_iter()  (drain queued)
//!     |                            | writer.write_frame_batch(batch)
//!     |--finish()----------------->| channel closed -> return writer
//!     |<---------------------------| join, writer.finish()
//! ```
//!
//! The worker thread owns the [`ReplayWriter`] exclusively (moved in via
//! `thread::Builder::spawn`), so the log still has a single writer. A full
//! queue blocks [`send`](BackgroundWriter::send) and fails
//! [`try_send`](BackgroundWriter::try_send).

use std::io::Write;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, TrySendError};
use log::{info, warn};
use tickcap_core::Frame;
use tickcap_replay::{ReplayError, ReplayWriter};

use crate::config::{check_channel_capacity, CaptureConfig, ConfigError};
use crate::error::RecordError;

/// Most frames the worker hands to the writer in one batch.
const MAX_BATCH: usize = 1024;

type WorkerResult<W> = Result<ReplayWriter<W>, ReplayError>;

/// Handle to a replay writer running on its own thread.
///
/// Dropping the handle without [`finish`](Self::finish) closes the queue,
/// waits for the worker and lets the writer's own drop flush it.
pub struct BackgroundWriter<W: Write + Send + 'static> {
    tx: Option<Sender<Frame>>,
    worker: Option<JoinHandle<WorkerResult<W>>>,
}

impl<W: Write + Send + 'static> BackgroundWriter<W> {
    /// Move `writer` onto a new thread with a queue sized by `config`.
    pub fn spawn(writer: ReplayWriter<W>, config: &CaptureConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Self::with_capacity(writer, config.resolved_channel_capacity())
    }

    /// Move `writer` onto a new thread with a queue of `capacity` frames.
    ///
    /// `capacity` must be between 1 and
    /// [`MAX_CHANNEL_CAPACITY`](crate::config::MAX_CHANNEL_CAPACITY).
    pub fn with_capacity(writer: ReplayWriter<W>, capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::ChannelCapacityZero);
        }
        check_channel_capacity(capacity)?;
        let (tx, rx) = crossbeam_channel::bounded(capacity);
        let max_batch = capacity.min(MAX_BATCH);
        let worker = thread::Builder::new()
            .name("tickcap-writer".into())
            .spawn(move || run(writer, rx, max_batch))
            .map_err(|e| ConfigError::ThreadSpawnFailed {
                reason: format!("replay writer thread: {e}"),
            })?;
        info!("background replay writer started (queue {capacity} frames)");
        Ok(Self {
            tx: Some(tx),
            worker: Some(worker),
        })
    }

    /// Queue `frame`, blocking while the queue is full.
    pub fn send(&self, frame: Frame) -> Result<(), RecordError> {
        let tx = self.tx.as_ref().ok_or(RecordError::Disconnected)?;
        tx.send(frame).map_err(|_| RecordError::Disconnected)
    }

    /// Queue `frame` without blocking.
    ///
    /// Returns `Ok(Some(frame))`, handing the frame back, if the queue is
    /// full.
    pub fn try_send(&self, frame: Frame) -> Result<Option<Frame>, RecordError> {
        let tx = self.tx.as_ref().ok_or(RecordError::Disconnected)?;
        match tx.try_send(frame) {
            Ok(()) => Ok(None),
            Err(TrySendError::Full(frame)) => Ok(Some(frame)),
            Err(TrySendError::Disconnected(_)) => Err(RecordError::Disconnected),
        }
    }

    /// Frames queued but not yet taken by the worker.
    pub fn queued(&self) -> usize {
        self.tx.as_ref().map_or(0, Sender::len)
    }

    /// Close the queue, wait for every queued frame to be written, then
    /// flush and return the sink.
    ///
    /// If the worker stopped on a replay error, that error is returned.
    pub fn finish(mut self) -> Result<W, RecordError> {
        let writer = self.join()?;
        Ok(writer.finish()?)
    }

    fn join(&mut self) -> Result<ReplayWriter<W>, RecordError> {
        self.tx.take();
        let worker = self.worker.take().ok_or(RecordError::Disconnected)?;
        match worker.join() {
            Ok(Ok(writer)) => Ok(writer),
            Ok(Err(e)) => Err(e.into()),
            Err(_) => Err(RecordError::WorkerPanicked),
        }
    }
}

impl<W: Write + Send + 'static> Drop for BackgroundWriter<W> {
    fn drop(&mut self) {
        if self.worker.is_none() {
            return;
        }
        if let Err(e) = self.join() {
            warn!("background replay writer dropped with error: {e}");
        }
    }
}

fn run<W: Write>(
    mut writer: ReplayWriter<W>,
    rx: Receiver<Frame>,
    max_batch: usize,
) -> WorkerResult<W> {
    let mut batch = Vec::with_capacity(max_batch);
    while let Ok(first) = rx.recv() {
        batch.push(first);
        batch.extend(rx.try_iter().take(max_batch - 1));
        if let Err(e) = writer.write_frame_batch(&batch) {
            warn!(
                "background replay writer stopping after {} frames: {e}",
                writer.frames_written()
            );
            return Err(e);
        }
        batch.clear();
    }
    info!(
        "background replay writer finished: {} frames",
        writer.frames_written()
    );
    Ok(writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use tickcap_core::FrameIndex;
    use tickcap_replay::{ReplayReader, WriterConfig};
    use tickcap_test_utils::frame_with_every_event;

    #[test]
    fn frames_arrive_in_order() {
        let writer = ReplayWriter::new(Vec::new()).unwrap();
        let bg = BackgroundWriter::with_capacity(writer, 4).unwrap();
        for i in 0..50 {
            bg.send(frame_with_every_event(i)).unwrap();
        }
        let bytes = bg.finish().unwrap();

        let reader = ReplayReader::from_reader(bytes.as_slice()).unwrap();
        let indices: Vec<u32> = reader.frames().map(|f| f.unwrap().index.0).collect();
        assert_eq!(indices, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn output_matches_synchronous_writer() {
        let frames: Vec<Frame> = (0..30).map(frame_with_every_event).collect();

        let mut sync = ReplayWriter::new(Vec::new()).unwrap();
        sync.write_frame_batch(&frames).unwrap();
        let expected = sync.finish().unwrap();

        let bg = BackgroundWriter::spawn(
            ReplayWriter::new(Vec::new()).unwrap(),
            &CaptureConfig::default(),
        )
        .unwrap();
        for frame in frames {
            bg.send(frame).unwrap();
        }
        assert_eq!(bg.finish().unwrap(), expected);
    }

    #[test]
    fn zero_capacity_rejected() {
        let writer = ReplayWriter::new(Vec::new()).unwrap();
        assert!(matches!(
            BackgroundWriter::with_capacity(writer, 0),
            Err(ConfigError::ChannelCapacityZero)
        ));
    }

    #[test]
    fn oversized_capacity_rejected() {
        let writer = ReplayWriter::new(Vec::new()).unwrap();
        assert!(matches!(
            BackgroundWriter::with_capacity(writer, usize::MAX),
            Err(ConfigError::ChannelCapacityTooLarge { .. })
        ));

        let config = CaptureConfig {
            tick_rate_hz: 1e15,
            ..CaptureConfig::default()
        };
        let writer = ReplayWriter::new(Vec::new()).unwrap();
        assert!(matches!(
            BackgroundWriter::spawn(writer, &config),
            Err(ConfigError::ChannelCapacityTooLarge { .. })
        ));
    }

    #[test]
    fn large_queue_drains_in_bounded_batches() {
        let frames: Vec<Frame> = (0..3000)
            .map(|i| Frame {
                index: FrameIndex(i),
                ..Frame::default()
            })
            .collect();
        let bg = BackgroundWriter::with_capacity(
            ReplayWriter::new(Vec::new()).unwrap(),
            crate::config::MAX_CHANNEL_CAPACITY,
        )
        .unwrap();
        for frame in frames.iter().cloned() {
            bg.send(frame).unwrap();
        }
        let bytes = bg.finish().unwrap();
        let read: Vec<Frame> = ReplayReader::from_reader(bytes.as_slice())
            .unwrap()
            .frames()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(read, frames);
    }

    /// Accepts the header, then fails every write.
    #[derive(Debug)]
    struct FailAfterHeader {
        written: usize,
    }

    impl Write for FailAfterHeader {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.written >= tickcap_replay::codec::HEADER_LEN {
                return Err(io::Error::other("disk full"));
            }
            self.written += buf.len();
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn worker_error_surfaces_on_finish() {
        let config = WriterConfig { flush_threshold: 1 };
        let writer = ReplayWriter::with_config(FailAfterHeader { written: 0 }, config).unwrap();
        let bg = BackgroundWriter::with_capacity(writer, 2).unwrap();
        // The worker may already have stopped by the time later sends run.
        for i in 0..3 {
            if bg.send(frame_with_every_event(i)).is_err() {
                break;
            }
        }
        let err = bg.finish().unwrap_err();
        assert!(
            matches!(err, RecordError::Replay(ReplayError::Io(_))),
            "{err}"
        );
    }

    #[test]
    fn try_send_hands_back_until_queued() {
        let writer = ReplayWriter::new(Vec::new()).unwrap();
        let bg = BackgroundWriter::with_capacity(writer, 1).unwrap();
        let mut frame = Frame {
            index: FrameIndex(9),
            ..Frame::default()
        };
        loop {
            match bg.try_send(frame).unwrap() {
                None => break,
                Some(back) => {
                    frame = back;
                    thread::yield_now();
                }
            }
        }
        let bytes = bg.finish().unwrap();
        let mut reader = ReplayReader::from_reader(bytes.as_slice()).unwrap();
        assert_eq!(reader.next_frame().unwrap().unwrap().index, FrameIndex(9));
    }
}
