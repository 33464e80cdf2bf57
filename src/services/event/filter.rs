use chrono::{DateTime, Utc};

use crate::models::event::{Event, EventFilter};

/// Keep events whose title or description contains `search_term`,
/// ignoring case. A blank term keeps everything.
pub fn filter_events_by_search(events: &[Event], search_term: &str) -> Vec<Event> {
    if search_term.trim().is_empty() {
        return events.to_vec();
    }

    let needle = search_term.to_lowercase();
    events
        .iter()
        .filter(|event| matches_search(event, &needle))
        .cloned()
        .collect()
}

/// `needle` must already be lower-cased.
fn matches_search(event: &Event, needle: &str) -> bool {
    event.title.to_lowercase().contains(needle)
        || event
            .description
            .as_deref()
            .is_some_and(|description| description.to_lowercase().contains(needle))
}

/// Keep events matching the upcoming/ended classification at `now`.
pub fn filter_events_by_type(events: &[Event], filter: EventFilter, now: DateTime<Utc>) -> Vec<Event> {
    events
        .iter()
        .filter(|event| filter.matches(event, now))
        .cloned()
        .collect()
}

/// Soonest first. Events sharing a date keep their input order.
pub fn sort_events_by_date(events: &[Event]) -> Vec<Event> {
    let mut sorted = events.to_vec();
    sorted.sort_by_key(|event| event.date);
    sorted
}

/// Search, then classify, then sort. The input is left untouched.
pub fn process_events(
    events: &[Event],
    search_term: &str,
    filter: EventFilter,
    now: DateTime<Utc>,
) -> Vec<Event> {
    let searched = filter_events_by_search(events, search_term);
    let classified = filter_events_by_type(&searched, filter, now);
    sort_events_by_date(&classified)
}
