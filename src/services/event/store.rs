use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use chrono::Utc;

use super::persistence::{load_snapshot, save_snapshot, EventSnapshot};
use crate::models::event::{Event, EventChanges};

/// Counts returned by [`EventStore::import`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub added: usize,
    pub updated: usize,
}

/// JSON-file backed event collection.
///
/// The store owns `created_at`/`updated_at`: they are stamped on create and
/// update, never taken from the caller.
#[derive(Debug)]
pub struct EventStore {
    path: PathBuf,
    events: Vec<Event>,
    dirty: bool,
}

impl EventStore {
    /// Load events from `path`; a missing file yields an empty store.
    ///
    /// Every stored event must validate and ids must be unique.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let snapshot = load_snapshot(&path)?;

        let mut seen = HashSet::new();
        for event in &snapshot.events {
            event
                .validate()
                .with_context(|| format!("Invalid event {} in {}", event.id, path.display()))?;
            if !seen.insert(event.id.as_str()) {
                bail!("Duplicate event id {} in {}", event.id, path.display());
            }
        }
        log::debug!("Loaded {} event(s) from {}", snapshot.events.len(), path.display());

        Ok(Self {
            path,
            events: snapshot.events,
            dirty: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn get(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|event| event.id == id)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Add a new event.
    pub fn create(&mut self, mut event: Event) -> Result<Event> {
        event.validate().map_err(|e| anyhow!(e))?;
        if self.get(&event.id).is_some() {
            bail!("Event {} already exists", event.id);
        }

        let now = Utc::now();
        event.created_at = now;
        event.updated_at = now;

        log::info!("Created event {} ({})", event.id, event.title);
        self.events.push(event.clone());
        self.dirty = true;
        Ok(event)
    }

    /// Replace an existing event, keeping its creation time.
    pub fn update(&mut self, mut event: Event) -> Result<Event> {
        event.validate().map_err(|e| anyhow!(e))?;
        let existing = self
            .events
            .iter_mut()
            .find(|existing| existing.id == event.id)
            .ok_or_else(|| anyhow!("Event {} not found", event.id))?;

        event.created_at = existing.created_at;
        event.updated_at = Utc::now();
        *existing = event.clone();

        log::info!("Updated event {} ({})", event.id, event.title);
        self.dirty = true;
        Ok(event)
    }

    /// Apply a partial edit to the event with `id` and store the result.
    pub fn edit(&mut self, id: &str, changes: &EventChanges) -> Result<Event> {
        let current = self.get(id).ok_or_else(|| anyhow!("Event {} not found", id))?;
        let edited = changes.apply_to(current);
        self.update(edited)
    }

    /// Remove an event. Returns false when no event has that id.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.events.len();
        self.events.retain(|event| event.id != id);
        let removed = self.events.len() != before;
        if removed {
            log::info!("Deleted event {}", id);
            self.dirty = true;
        }
        removed
    }

    /// Upsert externally sourced events (e.g. a GraphQL export), keeping
    /// their own timestamps.
    pub fn import(&mut self, events: Vec<Event>) -> ImportSummary {
        let mut summary = ImportSummary::default();
        for event in events {
            match self.events.iter_mut().find(|existing| existing.id == event.id) {
                Some(existing) => {
                    if *existing != event {
                        *existing = event;
                        summary.updated += 1;
                    }
                }
                None => {
                    self.events.push(event);
                    summary.added += 1;
                }
            }
        }

        if summary.added + summary.updated > 0 {
            self.dirty = true;
        }
        summary
    }

    /// Write to disk if anything changed since the last save.
    pub fn save(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }

        let snapshot = EventSnapshot {
            events: self.events.clone(),
        };
        save_snapshot(&self.path, &snapshot)?;
        self.dirty = false;
        log::debug!("Saved {} event(s) to {}", self.events.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone};
    use pretty_assertions::assert_eq;

    fn date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap()
    }

    fn sample(id: &str) -> Event {
        Event::builder()
            .id(id)
            .title("Sample")
            .date(date())
            .created_at(date() - Duration::days(365))
            .build()
            .unwrap()
    }

    fn empty_store() -> (tempfile::TempDir, EventStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = EventStore::open(dir.path().join("events.json")).unwrap();
        (dir, store)
    }

    #[test]
    fn test_create_stamps_timestamps() {
        let (_dir, mut store) = empty_store();
        let before = Utc::now();

        let created = store.create(sample("a")).unwrap();
        assert!(created.created_at >= before);
        assert_eq!(created.created_at, created.updated_at);
        assert!(store.is_dirty());
        assert_eq!(store.events().len(), 1);
    }

    #[test]
    fn test_create_rejects_duplicates() {
        let (_dir, mut store) = empty_store();
        store.create(sample("a")).unwrap();
        let err = store.create(sample("a")).unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn test_update_keeps_created_at() {
        let (_dir, mut store) = empty_store();
        let created = store.create(sample("a")).unwrap();

        let mut changed = sample("a");
        changed.title = "Renamed".to_string();
        let updated = store.update(changed).unwrap();

        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
        assert_eq!(store.get("a").unwrap().title, "Renamed");
    }

    #[test]
    fn test_update_missing_event() {
        let (_dir, mut store) = empty_store();
        assert!(store.update(sample("ghost")).is_err());
    }

    #[test]
    fn test_update_validates() {
        let (_dir, mut store) = empty_store();
        store.create(sample("a")).unwrap();

        let mut invalid = sample("a");
        invalid.title = String::new();
        assert!(store.update(invalid).is_err());
        assert_eq!(store.get("a").unwrap().title, "Sample");
    }

    #[test]
    fn test_edit_applies_changes_and_validates() {
        let (_dir, mut store) = empty_store();
        let created = store.create(sample("a")).unwrap();

        let changes = EventChanges {
            title: Some("Moved".to_string()),
            date: Some(date() + Duration::days(1)),
            ..EventChanges::default()
        };
        let edited = store.edit("a", &changes).unwrap();
        assert_eq!(edited.title, "Moved");
        assert_eq!(edited.date, date() + Duration::days(1));
        assert_eq!(edited.created_at, created.created_at);
        assert_eq!(store.get("a"), Some(&edited));

        // An end before the start is refused and the stored event is kept
        let backwards = EventChanges {
            end_time: Some(date()),
            ..EventChanges::default()
        };
        assert!(store.edit("a", &backwards).is_err());
        assert_eq!(store.get("a"), Some(&edited));

        assert!(store.edit("ghost", &changes).is_err());
    }

    #[test]
    fn test_delete() {
        let (_dir, mut store) = empty_store();
        store.create(sample("a")).unwrap();
        assert!(store.delete("a"));
        assert!(!store.delete("a"));
        assert!(store.events().is_empty());
    }

    #[test]
    fn test_import_upserts_and_keeps_timestamps() {
        let (_dir, mut store) = empty_store();
        store.import(vec![sample("a")]);

        let mut renamed = sample("a");
        renamed.title = "Renamed".to_string();
        let summary = store.import(vec![renamed.clone(), sample("b"), sample("b")]);

        assert_eq!(summary, ImportSummary { added: 1, updated: 1 });
        assert_eq!(store.get("a"), Some(&renamed));
        assert_eq!(store.get("b").unwrap().created_at, date() - Duration::days(365));
    }

    fn stored_event(id: &str, title: &str, end_time: Option<&str>) -> serde_json::Value {
        let mut value = serde_json::json!({
            "id": id,
            "title": title,
            "date": "2030-01-01T10:00:00Z",
            "createdAt": "2025-01-01T00:00:00Z",
            "updatedAt": "2025-01-01T00:00:00Z",
        });
        if let Some(end_time) = end_time {
            value["endTime"] = serde_json::json!(end_time);
        }
        value
    }

    fn open_with(events: Vec<serde_json::Value>) -> Result<EventStore> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.json");
        let file = serde_json::json!({ "events": events });
        std::fs::write(&path, file.to_string()).unwrap();
        EventStore::open(&path)
    }

    #[test]
    fn test_open_accepts_valid_file() {
        let store = open_with(vec![
            stored_event("a", "Launch", Some("2030-01-01T12:00:00Z")),
            stored_event("b", "Party", None),
        ])
        .unwrap();
        assert_eq!(store.events().len(), 2);
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_open_rejects_blank_title() {
        let err = open_with(vec![stored_event("x", "   ", None)]).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("Invalid event x"));
        assert!(message.contains("events.json"));
    }

    #[test]
    fn test_open_rejects_end_before_start() {
        let err = open_with(vec![stored_event("x", "Backwards", Some("2029-12-31T00:00:00Z"))])
            .unwrap_err();
        assert!(format!("{err:#}").contains("Invalid event x"));
    }

    #[test]
    fn test_open_rejects_duplicate_ids() {
        let err = open_with(vec![
            stored_event("x", "First", None),
            stored_event("x", "Second", None),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("Duplicate event id x"));
    }

    #[test]
    fn test_save_and_reopen() {
        let (dir, mut store) = empty_store();
        store.create(sample("a")).unwrap();
        store.save().unwrap();
        assert!(!store.is_dirty());

        let reopened = EventStore::open(dir.path().join("events.json")).unwrap();
        assert_eq!(reopened.events(), store.events());
    }
}
