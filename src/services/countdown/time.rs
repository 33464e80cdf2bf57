//! Remaining-time arithmetic for string targets.

use chrono::{DateTime, Utc};

use crate::models::countdown::TimeRemaining;
use crate::utils::date::{parse_instant, DateParseError};

use super::clock::Clock;

/// Time remaining until `target` as seen from `now`.
///
/// Unparseable targets are rejected instead of being reported as expired.
pub fn calculate_time_remaining(
    target: &str,
    now: DateTime<Utc>,
) -> Result<TimeRemaining, DateParseError> {
    let target = parse_instant(target)?;
    Ok(TimeRemaining::between(target, now))
}

/// [`calculate_time_remaining`] against the given clock.
pub fn time_remaining_with(
    target: &str,
    clock: &dyn Clock,
) -> Result<TimeRemaining, DateParseError> {
    let target = parse_instant(target)?;
    Ok(TimeRemaining::between(target, clock.now()))
}

/// [`calculate_time_remaining`] against the wall clock.
pub fn time_remaining_from_now(target: &str) -> Result<TimeRemaining, DateParseError> {
    calculate_time_remaining(target, Utc::now())
}
