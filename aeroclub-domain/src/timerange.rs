use chrono::{DateTime, Duration, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Half-open interval [start, end). Construction enforces `end > start`, and
/// a constructed range is never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTimeRange")]
pub struct TimeRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct RawTimeRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum TimeRangeError {
    #[error("Invalid range: end {end} is not after start {start}")]
    InvalidRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, TimeRangeError> {
        if end <= start {
            return Err(TimeRangeError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Half-open semantics: back-to-back ranges do not overlap.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl TryFrom<RawTimeRange> for TimeRange {
    type Error = TimeRangeError;

    fn try_from(raw: RawTimeRange) -> Result<Self, Self::Error> {
        TimeRange::new(raw.start, raw.end)
    }
}

/// Rounds an instant down to the nearest slot boundary, e.g. 10:07 with a
/// 15-minute granularity becomes 10:00. Seconds and sub-seconds are truncated.
/// A granularity of zero (or one not dividing the hour evenly) still rounds
/// down to the nearest multiple within the hour.
pub fn normalize_to_granularity(instant: DateTime<Utc>, granularity_minutes: u32) -> DateTime<Utc> {
    let truncated = instant
        .with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(instant);

    if granularity_minutes == 0 {
        return truncated;
    }

    let minute = truncated.minute() - truncated.minute() % granularity_minutes;
    truncated.with_minute(minute).unwrap_or(truncated)
}

/// Slot pickers hand over raw hour values; anything outside a day is clamped
/// to [0, 23].
pub fn clamp_slot_hour(hour: i64) -> u32 {
    hour.clamp(0, 23) as u32
}
