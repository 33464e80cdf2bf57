//! Set of live countdowns, one ticker per displayed event.
//!
//! Mirrors the list of event cards on screen: mounting an event starts its
//! ticker, unmounting stops it, and syncing against a fresh event list
//! reconciles both while retargeting cards whose date moved.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Notify};

use crate::models::countdown::TimeRemaining;
use crate::models::event::Event;

use super::clock::SharedClock;
use super::ticker::CountdownTicker;

struct MountedCountdown {
    event_id: String,
    title: String,
    ticker: CountdownTicker,
}

/// Point-in-time view of one mounted countdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountdownSnapshot {
    pub event_id: String,
    pub title: String,
    pub remaining: TimeRemaining,
}

/// What a [`CountdownBoard::sync`] call changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardSyncResult {
    pub mounted: Vec<String>,
    pub retargeted: Vec<String>,
    pub unmounted: Vec<String>,
}

impl BoardSyncResult {
    pub fn is_empty(&self) -> bool {
        self.mounted.is_empty() && self.retargeted.is_empty() && self.unmounted.is_empty()
    }
}

pub struct CountdownBoard {
    cards: Vec<MountedCountdown>,
    clock: SharedClock,
    period: Duration,
    changes: Arc<Notify>,
}

impl CountdownBoard {
    pub fn new(clock: SharedClock, period: Duration) -> Self {
        Self {
            cards: Vec::new(),
            clock,
            period,
            changes: Arc::new(Notify::new()),
        }
    }

    /// Start a countdown for `event`. An already mounted event is
    /// retargeted instead; returns true only for a new mount.
    pub fn mount(&mut self, event: &Event) -> bool {
        if let Some(card) = self.cards.iter_mut().find(|card| card.event_id == event.id) {
            card.title = event.title.clone();
            card.ticker.retarget(event.date);
            return false;
        }

        let ticker = CountdownTicker::spawn_with_listener(
            event.date,
            Arc::clone(&self.clock),
            self.period,
            Some(Arc::clone(&self.changes)),
        );
        log::debug!("Mounted countdown for event {} ({})", event.id, event.title);
        self.cards.push(MountedCountdown {
            event_id: event.id.clone(),
            title: event.title.clone(),
            ticker,
        });
        true
    }

    /// Stop and forget the countdown for `event_id`.
    pub fn unmount(&mut self, event_id: &str) -> bool {
        let Some(index) = self.cards.iter().position(|card| card.event_id == event_id) else {
            return false;
        };

        let card = self.cards.remove(index);
        card.ticker.stop();
        log::debug!("Unmounted countdown for event {}", event_id);
        true
    }

    /// Reconcile with `events`: mount new ones, retarget moved ones, unmount
    /// the rest. Card order follows `events`.
    pub fn sync(&mut self, events: &[Event]) -> BoardSyncResult {
        let mut result = BoardSyncResult::default();

        let stale: Vec<String> = self
            .cards
            .iter()
            .filter(|card| !events.iter().any(|event| event.id == card.event_id))
            .map(|card| card.event_id.clone())
            .collect();
        for id in stale {
            self.unmount(&id);
            result.unmounted.push(id);
        }

        for event in events {
            let moved = self
                .cards
                .iter()
                .find(|card| card.event_id == event.id)
                .map(|card| card.ticker.target() != event.date);

            match moved {
                None => {
                    self.mount(event);
                    result.mounted.push(event.id.clone());
                }
                Some(true) => {
                    self.mount(event);
                    result.retargeted.push(event.id.clone());
                }
                Some(false) => {
                    if let Some(card) = self.cards.iter_mut().find(|card| card.event_id == event.id) {
                        card.title = event.title.clone();
                    }
                }
            }
        }

        let order = |id: &str| events.iter().position(|event| event.id == id);
        self.cards.sort_by_key(|card| order(&card.event_id));

        if !result.is_empty() {
            log::info!(
                "Countdown board synced: {} mounted, {} retargeted, {} unmounted",
                result.mounted.len(),
                result.retargeted.len(),
                result.unmounted.len()
            );
        }
        result
    }

    pub fn snapshot(&self) -> Vec<CountdownSnapshot> {
        self.cards
            .iter()
            .map(|card| CountdownSnapshot {
                event_id: card.event_id.clone(),
                title: card.title.clone(),
                remaining: card.ticker.current(),
            })
            .collect()
    }

    pub fn subscribe(&self, event_id: &str) -> Option<watch::Receiver<TimeRemaining>> {
        self.cards
            .iter()
            .find(|card| card.event_id == event_id)
            .map(|card| card.ticker.subscribe())
    }

    /// Resolves after any mounted countdown published a new value.
    pub async fn changed(&self) {
        self.changes.notified().await;
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Number of tickers whose task is still alive.
    pub fn active_count(&self) -> usize {
        self.cards.iter().filter(|card| card.ticker.is_running()).count()
    }

    pub fn all_expired(&self) -> bool {
        self.cards.iter().all(|card| card.ticker.current().is_expired)
    }

    /// Stop every ticker.
    pub fn clear(&mut self) {
        for card in self.cards.drain(..) {
            card.ticker.stop();
        }
    }
}
