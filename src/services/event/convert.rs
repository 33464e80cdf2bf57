//! Mapping of GraphQL event records onto [`Event`].
//!
//! The GraphQL layer speaks camelCase strings for every timestamp and the
//! upper-case visibility enum. Records are validated here, at the boundary,
//! so the rest of the crate only ever sees well-formed events.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::event::{Event, EventError, EventVisibility};
use crate::utils::date::parse_instant;

/// Event as returned by the `events` query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQlEvent {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_time: String,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub emoji: Option<String>,
    #[serde(default)]
    pub visibility: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Accepted payload shapes: a bare list, or a full query response.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GraphQlPayload {
    List(Vec<GraphQlEvent>),
    Response { data: GraphQlData },
}

#[derive(Debug, Deserialize)]
struct GraphQlData {
    events: Vec<GraphQlEvent>,
}

/// Outcome of converting a batch: good events plus rejected record ids.
#[derive(Debug, Default)]
pub struct ConversionReport {
    pub events: Vec<Event>,
    pub rejected: Vec<(String, EventError)>,
}

pub fn convert_graphql_event(record: &GraphQlEvent) -> Result<Event, EventError> {
    let field = |name: &'static str, value: &str| {
        parse_instant(value).map_err(|source| EventError::InvalidDate { field: name, source })
    };

    let mut builder = Event::builder()
        .id(record.id.clone())
        .title(record.title.clone())
        .date(field("startTime", &record.start_time)?)
        .created_at(field("createdAt", &record.created_at)?)
        .updated_at(field("updatedAt", &record.updated_at)?);

    if let Some(end_time) = record.end_time.as_deref().filter(|v| !v.trim().is_empty()) {
        builder = builder.end_time(field("endTime", end_time)?);
    }
    if let Some(description) = &record.description {
        builder = builder.description(description.clone());
    }
    if let Some(emoji) = &record.emoji {
        builder = builder.emoji(emoji.clone());
    }

    let visibility = match record.visibility.as_deref() {
        Some(value) if !value.trim().is_empty() => value.parse()?,
        _ => EventVisibility::default(),
    };

    builder.visibility(visibility).build()
}

impl TryFrom<&GraphQlEvent> for Event {
    type Error = EventError;

    fn try_from(record: &GraphQlEvent) -> Result<Self, Self::Error> {
        convert_graphql_event(record)
    }
}

/// Convert every record, collecting failures instead of stopping at the
/// first bad one.
pub fn convert_graphql_events(records: &[GraphQlEvent]) -> ConversionReport {
    let mut report = ConversionReport::default();
    for record in records {
        match convert_graphql_event(record) {
            Ok(event) => report.events.push(event),
            Err(err) => {
                log::warn!("Skipping GraphQL event {}: {}", record.id, err);
                report.rejected.push((record.id.clone(), err));
            }
        }
    }
    report
}

/// Parse a JSON payload holding GraphQL event records.
pub fn parse_graphql_payload(json: &str) -> Result<Vec<GraphQlEvent>> {
    let payload: GraphQlPayload =
        serde_json::from_str(json).context("failed to parse GraphQL events payload")?;
    Ok(match payload {
        GraphQlPayload::List(events) => events,
        GraphQlPayload::Response { data } => data.events,
    })
}
