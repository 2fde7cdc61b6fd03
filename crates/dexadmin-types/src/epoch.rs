use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Epoch index (monotonic counter of fixed-duration matching windows)
pub type EpochIndex = i64;

/// The last epoch a market runs before a scheduled suspension takes effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuspendEpoch {
    pub idx: EpochIndex,
    /// Wall-clock end of the final epoch, which is when trading halts.
    pub end: DateTime<Utc>,
}

/// When a requested suspension should happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuspendTime {
    /// At the next opportunity, i.e. the end of the currently active epoch.
    Immediate,
    /// At the first epoch boundary at or after the given time.
    At(DateTime<Utc>),
}

/// Convert milliseconds since the Unix epoch to a UTC timestamp. Returns
/// `None` when the value is outside the representable range.
pub fn unix_millis(ms: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms).single()
}
