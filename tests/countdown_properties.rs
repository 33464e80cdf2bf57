// Property-based tests for remaining-time arithmetic

use chrono::{DateTime, Duration, SecondsFormat, TimeZone, Utc};
use morrow::calculate_time_remaining;
use morrow::models::countdown::TimeRemaining;
use proptest::prelude::*;

const TEN_YEARS_MS: i64 = 10 * 365 * 24 * 60 * 60 * 1000;

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
}

fn iso(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

proptest! {
    /// Future targets are active and the fields floor the exact difference
    #[test]
    fn prop_future_targets_reconstruct_difference(
        now_offset in 0..TEN_YEARS_MS,
        diff in 1..TEN_YEARS_MS,
    ) {
        let now = base() + Duration::milliseconds(now_offset);
        let target = now + Duration::milliseconds(diff);

        let remaining = calculate_time_remaining(&iso(target), now).unwrap();
        prop_assert!(!remaining.is_expired);
        prop_assert!(remaining.hours < 24);
        prop_assert!(remaining.minutes < 60);
        prop_assert!(remaining.seconds < 60);

        let total = remaining.total_millis();
        prop_assert!(total <= diff);
        prop_assert!(diff < total + 1000);
    }

    /// Targets at or before now are all zeros and expired
    #[test]
    fn prop_past_targets_are_expired(
        now_offset in 0..TEN_YEARS_MS,
        back in 0..TEN_YEARS_MS,
    ) {
        let now = base() + Duration::milliseconds(now_offset);
        let target = now - Duration::milliseconds(back);

        let remaining = calculate_time_remaining(&iso(target), now).unwrap();
        prop_assert_eq!(remaining, TimeRemaining::expired());
    }

    /// No elapsed time, no change
    #[test]
    fn prop_repeated_calls_agree(
        now_offset in 0..TEN_YEARS_MS,
        diff in -TEN_YEARS_MS..TEN_YEARS_MS,
    ) {
        let now = base() + Duration::milliseconds(now_offset);
        let target = iso(now + Duration::milliseconds(diff));

        let first = calculate_time_remaining(&target, now).unwrap();
        let second = calculate_time_remaining(&target, now).unwrap();
        prop_assert_eq!(first, second);
    }
}

#[test]
fn test_unparseable_target_is_an_error() {
    assert!(calculate_time_remaining("soon", base()).is_err());
    assert!(calculate_time_remaining("", base()).is_err());
}
