// Event module
// Countdown event model shared by the local store and GraphQL imports

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::countdown::TimeRemaining;
use crate::utils::date::DateParseError;

/// Validation and conversion failures for events.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    #[error("Event title cannot be empty")]
    EmptyTitle,
    #[error("Event end time must be after start time")]
    EndBeforeStart,
    #[error("Event {field} is invalid: {source}")]
    InvalidDate {
        field: &'static str,
        #[source]
        source: DateParseError,
    },
    #[error("Unknown event visibility '{0}' (expected private, shared or public)")]
    UnknownVisibility(String),
    #[error("Event {0} is required")]
    MissingField(&'static str),
}

/// Who can see an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventVisibility {
    #[default]
    Private,
    Shared,
    Public,
}

impl EventVisibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventVisibility::Private => "private",
            EventVisibility::Shared => "shared",
            EventVisibility::Public => "public",
        }
    }
}

impl fmt::Display for EventVisibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventVisibility {
    type Err = EventError;

    /// GraphQL enums arrive upper-case (`PRIVATE`), the backend stores them
    /// lower-case, so matching ignores case.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "private" => Ok(EventVisibility::Private),
            "shared" => Ok(EventVisibility::Shared),
            "public" => Ok(EventVisibility::Public),
            _ => Err(EventError::UnknownVisibility(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown event filter '{0}' (expected all, upcoming or ended)")]
pub struct ParseFilterError(pub String);

/// Classification of events relative to the current instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventFilter {
    #[default]
    All,
    /// Target date strictly after now
    Upcoming,
    /// Target date at or before now
    Ended,
}

impl EventFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventFilter::All => "all",
            EventFilter::Upcoming => "upcoming",
            EventFilter::Ended => "ended",
        }
    }

    pub fn matches(&self, event: &Event, now: DateTime<Utc>) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::Upcoming => event.is_upcoming(now),
            EventFilter::Ended => event.is_ended(now),
        }
    }
}

impl fmt::Display for EventFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventFilter {
    type Err = ParseFilterError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(EventFilter::All),
            "upcoming" => Ok(EventFilter::Upcoming),
            "ended" => Ok(EventFilter::Ended),
            _ => Err(ParseFilterError(value.to_string())),
        }
    }
}

/// A titled occurrence with a countdown target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Countdown target (the event's start time).
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    #[serde(default)]
    pub visibility: EventVisibility,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Create a new event with required fields
    ///
    /// # Examples
    /// ```
    /// use morrow::models::event::Event;
    /// use chrono::{Duration, Utc};
    ///
    /// let event = Event::new("Launch", Utc::now() + Duration::days(3)).unwrap();
    /// assert!(event.description.is_none());
    /// ```
    pub fn new(title: impl Into<String>, date: DateTime<Utc>) -> Result<Self, EventError> {
        Self::builder().title(title).date(date).build()
    }

    /// Create a builder for constructing events with optional fields
    pub fn builder() -> EventBuilder {
        EventBuilder::new()
    }

    /// Validate the event
    pub fn validate(&self) -> Result<(), EventError> {
        if self.title.trim().is_empty() {
            return Err(EventError::EmptyTitle);
        }

        if let Some(end) = self.end_time {
            if end <= self.date {
                return Err(EventError::EndBeforeStart);
            }
        }

        Ok(())
    }

    /// True while the target date is strictly in the future.
    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        self.date > now
    }

    /// True once the target date has been reached.
    pub fn is_ended(&self, now: DateTime<Utc>) -> bool {
        self.date <= now
    }

    pub fn time_remaining(&self, now: DateTime<Utc>) -> TimeRemaining {
        TimeRemaining::between(self.date, now)
    }
}

/// Builder for creating events with optional fields
#[derive(Debug, Default)]
pub struct EventBuilder {
    id: Option<String>,
    title: Option<String>,
    description: Option<String>,
    date: Option<DateTime<Utc>>,
    end_time: Option<DateTime<Utc>>,
    emoji: Option<String>,
    visibility: EventVisibility,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl EventBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a known identifier instead of generating one
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the description; blank text is stored as no description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.description = (!description.trim().is_empty()).then_some(description);
        self
    }

    pub fn date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    pub fn end_time(mut self, end_time: DateTime<Utc>) -> Self {
        self.end_time = Some(end_time);
        self
    }

    pub fn emoji(mut self, emoji: impl Into<String>) -> Self {
        let emoji = emoji.into();
        self.emoji = (!emoji.is_empty()).then_some(emoji);
        self
    }

    pub fn visibility(mut self, visibility: EventVisibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = Some(updated_at);
        self
    }

    /// Build the event
    ///
    /// A missing id is generated; missing timestamps default to the
    /// current instant (`updated_at` falls back to `created_at`).
    pub fn build(self) -> Result<Event, EventError> {
        let title = self.title.ok_or(EventError::MissingField("title"))?;
        let date = self.date.ok_or(EventError::MissingField("date"))?;
        let created_at = self.created_at.unwrap_or_else(Utc::now);

        let event = Event {
            id: self.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            title,
            description: self.description,
            date,
            end_time: self.end_time,
            emoji: self.emoji,
            visibility: self.visibility,
            created_at,
            updated_at: self.updated_at.unwrap_or(created_at),
        };

        event.validate()?;
        Ok(event)
    }
}

/// Partial edit of an existing event. `None` leaves a field untouched; an
/// empty description or emoji clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    /// Drop the end time; ignored when `end_time` is also set
    pub clear_end_time: bool,
    pub emoji: Option<String>,
    pub visibility: Option<EventVisibility>,
}

impl EventChanges {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Copy of `event` with these changes applied. Timestamps are left to
    /// the store; the result is not validated.
    pub fn apply_to(&self, event: &Event) -> Event {
        let mut edited = event.clone();

        if let Some(title) = &self.title {
            edited.title = title.clone();
        }
        if let Some(description) = &self.description {
            edited.description = (!description.trim().is_empty()).then(|| description.clone());
        }
        if let Some(date) = self.date {
            edited.date = date;
        }
        if let Some(end_time) = self.end_time {
            edited.end_time = Some(end_time);
        } else if self.clear_end_time {
            edited.end_time = None;
        }
        if let Some(emoji) = &self.emoji {
            edited.emoji = (!emoji.is_empty()).then(|| emoji.clone());
        }
        if let Some(visibility) = self.visibility {
            edited.visibility = visibility;
        }

        edited
    }
}
