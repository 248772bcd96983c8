//! Error taxonomy for the monitor. None of these are fatal to the monitoring loop.

use std::collections::TryReserveError;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MonitorError {
    /// Touchpad absent or not readable. Surfaced once as a status flag.
    #[error("touchpad unavailable at {}: {source}", path.display())]
    DeviceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Raw payload could not be decoded; the caller degrades to an empty batch.
    #[error("malformed input payload: {0}")]
    MalformedInput(String),

    /// Timestamp earlier than the last observation; treated as no new evidence.
    #[error("clock regression: {now_ms}ms is earlier than last observation at {last_ms}ms")]
    ClockRegression { now_ms: u64, last_ms: u64 },

    #[error("icon surface allocation failed: {0}")]
    IconAllocation(#[from] TryReserveError),

    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl MonitorError {
    pub fn device_unavailable(path: impl Into<PathBuf>, source: io::Error) -> Self {
        MonitorError::DeviceUnavailable {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_unavailable_message_names_path() {
        let err = MonitorError::device_unavailable(
            "/dev/input/event7",
            io::Error::new(io::ErrorKind::NotFound, "no such device"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/dev/input/event7"));
        assert!(msg.contains("no such device"));
    }

    #[test]
    fn test_clock_regression_message() {
        let err = MonitorError::ClockRegression { now_ms: 10, last_ms: 40 };
        assert_eq!(
            err.to_string(),
            "clock regression: 10ms is earlier than last observation at 40ms"
        );
    }
}
