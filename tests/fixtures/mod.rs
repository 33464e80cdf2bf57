// Test fixtures - reusable events and payloads shared by the integration tests

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use morrow::models::event::{Event, EventVisibility};

/// Fixed "now" used across tests: May 1, 2025 at 12:00 UTC
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap()
}

pub fn event_at(id: &str, title: &str, date: DateTime<Utc>) -> Event {
    Event::builder()
        .id(id)
        .title(title)
        .date(date)
        .created_at(now() - Duration::days(30))
        .build()
        .unwrap()
}

/// Tomorrow's product launch, with a description
pub fn launch() -> Event {
    Event::builder()
        .id("launch")
        .title("Product launch")
        .description("Ship version two to everyone")
        .date(now() + Duration::days(1))
        .emoji("🚀")
        .visibility(EventVisibility::Public)
        .created_at(now() - Duration::days(30))
        .build()
        .unwrap()
}

/// A birthday two days out
pub fn birthday() -> Event {
    event_at("birthday", "Birthday party", now() + Duration::days(2))
}

/// Yesterday's conference
pub fn conference() -> Event {
    event_at("conference", "RustConf", now() - Duration::days(1))
}

pub fn sample_events() -> Vec<Event> {
    vec![birthday(), conference(), launch()]
}

/// GraphQL response with one good record and one with a broken date
pub const GRAPHQL_RESPONSE: &str = r#"{
  "data": {
    "events": [
      {
        "id": "evt-1",
        "title": "Team offsite",
        "description": "Two days in the mountains",
        "startTime": "2030-06-01T09:00:00Z",
        "endTime": "2030-06-02T17:00:00Z",
        "emoji": "🏔",
        "visibility": "SHARED",
        "createdAt": "2025-01-01T00:00:00Z",
        "updatedAt": "2025-01-02T00:00:00Z"
      },
      {
        "id": "evt-2",
        "title": "Broken",
        "startTime": "next tuesday",
        "createdAt": "2025-01-01T00:00:00Z",
        "updatedAt": "2025-01-01T00:00:00Z"
      }
    ]
  }
}"#;
