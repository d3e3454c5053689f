//! Capture configuration, validation, and error types.
//!
//! [`CaptureConfig`] bundles the replay writer/reader settings with the
//! knobs of the recording pipeline. [`validate()`](CaptureConfig::validate)
//! checks invariants at startup; [`from_json`](CaptureConfig::from_json)
//! parses and validates in one step.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tickcap_replay::{ReaderConfig, WriterConfig};

/// Default capture rate of the telemetry source.
pub const DEFAULT_TICK_RATE_HZ: f64 = 600.0;

/// Largest background writer queue, in frames (about 109 s at 600 Hz).
pub const MAX_CHANNEL_CAPACITY: usize = 1 << 16;

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected while loading or validating a [`CaptureConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// tick_rate_hz is NaN, infinite, zero, or negative.
    #[error("tick_rate_hz must be finite and positive, got {value}")]
    InvalidTickRate {
        /// The invalid value.
        value: f64,
    },
    /// The writer flush threshold is zero.
    #[error("writer.flush_threshold must be at least 1")]
    FlushThresholdZero,
    /// The reader record limit is zero.
    #[error("reader.max_record_len must be at least 1")]
    RecordLimitZero,
    /// An explicit channel capacity of zero.
    #[error("channel_capacity must be at least 1")]
    ChannelCapacityZero,
    /// The queue length, explicit or derived from `tick_rate_hz`, exceeds
    /// [`MAX_CHANNEL_CAPACITY`].
    #[error("channel capacity {requested} exceeds the maximum of {max} frames")]
    ChannelCapacityTooLarge {
        /// The resolved capacity.
        requested: usize,
        /// [`MAX_CHANNEL_CAPACITY`].
        max: usize,
    },
    /// The configuration document could not be parsed.
    #[error("invalid configuration document: {0}")]
    Parse(#[from] serde_json::Error),
    /// A background thread could not be spawned.
    #[error("thread spawn failed: {reason}")]
    ThreadSpawnFailed {
        /// Description of which thread failed.
        reason: String,
    },
}

// ── CaptureConfig ──────────────────────────────────────────────────

/// Complete configuration for a capture session.
///
/// Every field is optional in serialized form; missing fields take their
/// defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Replay writer settings.
    pub writer: WriterConfig,
    /// Replay reader settings.
    pub reader: ReaderConfig,
    /// Background writer queue length, in frames. `None` = one second of
    /// frames at `tick_rate_hz`.
    pub channel_capacity: Option<usize>,
    /// Expected telemetry rate. Default: 600.
    pub tick_rate_hz: f64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            writer: WriterConfig::default(),
            reader: ReaderConfig::default(),
            channel_capacity: None,
            tick_rate_hz: DEFAULT_TICK_RATE_HZ,
        }
    }
}

impl CaptureConfig {
    /// Parse a JSON document and validate the result.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check all invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.tick_rate_hz.is_finite() || self.tick_rate_hz <= 0.0 {
            return Err(ConfigError::InvalidTickRate {
                value: self.tick_rate_hz,
            });
        }
        if self.writer.flush_threshold == 0 {
            return Err(ConfigError::FlushThresholdZero);
        }
        if self.reader.max_record_len == 0 {
            return Err(ConfigError::RecordLimitZero);
        }
        if self.channel_capacity == Some(0) {
            return Err(ConfigError::ChannelCapacityZero);
        }
        check_channel_capacity(self.resolved_channel_capacity())
    }

    /// Resolve the background writer queue length.
    ///
    /// Without an explicit value this is one second of frames, at least 1.
    /// Very high tick rates saturate at `usize::MAX`, which
    /// [`validate`](Self::validate) rejects.
    pub fn resolved_channel_capacity(&self) -> usize {
        match self.channel_capacity {
            Some(n) => n.max(1),
            None if self.tick_rate_hz.is_finite() && self.tick_rate_hz > 0.0 => {
                (self.tick_rate_hz.ceil() as usize).max(1)
            }
            None => DEFAULT_TICK_RATE_HZ as usize,
        }
    }
}

/// Reject queue lengths above [`MAX_CHANNEL_CAPACITY`].
pub(crate) fn check_channel_capacity(capacity: usize) -> Result<(), ConfigError> {
    if capacity > MAX_CHANNEL_CAPACITY {
        return Err(ConfigError::ChannelCapacityTooLarge {
            requested: capacity,
            max: MAX_CHANNEL_CAPACITY,
        });
    }
    Ok(())
}
