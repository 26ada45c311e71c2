//! Errors raised at the parsing boundary

use thiserror::Error;

/// Failures while turning raw input into domain values.
///
/// The charting pipeline itself is total; only event decoding and
/// string-keyed parameter parsing can fail.
#[derive(Debug, Error)]
pub enum WatchError {
    #[error("malformed deployment events: {0}")]
    MalformedEvents(#[from] serde_json::Error),

    #[error("unknown metric: {0:?}")]
    UnknownMetric(String),

    #[error("unknown smoothing level: {0:?}")]
    UnknownSmoothing(String),

    #[error("unknown display mode: {0:?}")]
    UnknownDisplayMode(String),
}

pub type Result<T> = std::result::Result<T, WatchError>;
