// Countdown module
// Remaining-time value recomputed on every tick

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MILLIS_PER_SECOND: i64 = 1_000;
pub const MILLIS_PER_MINUTE: i64 = 60 * MILLIS_PER_SECOND;
pub const MILLIS_PER_HOUR: i64 = 60 * MILLIS_PER_MINUTE;
pub const MILLIS_PER_DAY: i64 = 24 * MILLIS_PER_HOUR;

/// Time left until a target instant, floor-truncated to whole seconds.
///
/// When `is_expired` is set every numeric field is zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRemaining {
    pub days: u64,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    pub is_expired: bool,
}

impl TimeRemaining {
    pub const fn expired() -> Self {
        Self {
            days: 0,
            hours: 0,
            minutes: 0,
            seconds: 0,
            is_expired: true,
        }
    }

    /// Decompose `target - now`. Both sides are absolute instants, so the
    /// result does not depend on any timezone.
    pub fn between(target: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        if target <= now {
            return Self::expired();
        }

        Self::from_millis((target - now).num_milliseconds())
    }

    /// Decompose a positive millisecond difference. Non-positive input is
    /// treated as expired.
    pub fn from_millis(difference: i64) -> Self {
        if difference <= 0 {
            return Self::expired();
        }

        Self {
            days: (difference / MILLIS_PER_DAY) as u64,
            hours: ((difference % MILLIS_PER_DAY) / MILLIS_PER_HOUR) as u32,
            minutes: ((difference % MILLIS_PER_HOUR) / MILLIS_PER_MINUTE) as u32,
            seconds: ((difference % MILLIS_PER_MINUTE) / MILLIS_PER_SECOND) as u32,
            is_expired: false,
        }
    }

    /// Milliseconds represented by the whole-second fields.
    pub fn total_millis(&self) -> i64 {
        self.days as i64 * MILLIS_PER_DAY
            + self.hours as i64 * MILLIS_PER_HOUR
            + self.minutes as i64 * MILLIS_PER_MINUTE
            + self.seconds as i64 * MILLIS_PER_SECOND
    }

    pub fn phase(&self) -> CountdownPhase {
        if self.is_expired {
            CountdownPhase::Expired
        } else {
            CountdownPhase::Active
        }
    }
}

/// `"{days}d {hh}h {mm}m {ss}s"`, or `"ended"` once expired.
impl fmt::Display for TimeRemaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_expired {
            return f.write_str("ended");
        }
        write!(
            f,
            "{}d {:02}h {:02}m {:02}s",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}

/// Lifecycle of a single countdown display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CountdownPhase {
    /// Target still ahead; the value changes every second
    Active,
    /// Target reached; the value is frozen at zero
    Expired,
}
