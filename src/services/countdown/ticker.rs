//! Live countdown for a single display.
//!
//! [`Countdown`] is the pure state machine; [`CountdownTicker`] drives one on
//! the Tokio runtime, recomputing once per period and publishing changes
//! through a `watch` channel. Each ticker owns exactly one task, which is
//! cancelled when the ticker is stopped, dropped or retargeted.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::models::countdown::{CountdownPhase, TimeRemaining};

use super::clock::{Clock, SharedClock};

/// Floor for the tick period; a zero period would spin.
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Remaining time towards a fixed target, advanced by explicit ticks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    target: DateTime<Utc>,
    current: TimeRemaining,
}

impl Countdown {
    /// Computes the first value immediately.
    pub fn new(target: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        Self {
            target,
            current: TimeRemaining::between(target, now),
        }
    }

    pub fn start(target: DateTime<Utc>, clock: &dyn Clock) -> Self {
        Self::new(target, clock.now())
    }

    pub fn target(&self) -> DateTime<Utc> {
        self.target
    }

    pub fn current(&self) -> TimeRemaining {
        self.current
    }

    pub fn phase(&self) -> CountdownPhase {
        self.current.phase()
    }

    /// Recompute for `now`. Returns true when the displayed value changed.
    ///
    /// `Expired` is terminal: once reached the value never changes again.
    pub fn tick(&mut self, now: DateTime<Utc>) -> bool {
        if self.current.is_expired {
            return false;
        }

        let next = TimeRemaining::between(self.target, now);
        if next == self.current {
            return false;
        }

        self.current = next;
        true
    }

    /// Point at a new target, recomputing immediately.
    pub fn retarget(&mut self, target: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        let previous = self.current;
        self.target = target;
        self.current = TimeRemaining::between(target, now);
        previous != self.current
    }
}

/// Handle to a running countdown. Dropping the handle cancels its task.
pub struct CountdownTicker {
    countdown_target: DateTime<Utc>,
    clock: SharedClock,
    period: Duration,
    sender: Arc<watch::Sender<TimeRemaining>>,
    listener: Option<Arc<Notify>>,
    task: Option<JoinHandle<()>>,
}

impl CountdownTicker {
    /// Start ticking towards `target` every `period`.
    ///
    /// The first value is available immediately; the first recomputation
    /// happens one period later. Must be called within a Tokio runtime.
    pub fn spawn(target: DateTime<Utc>, clock: SharedClock, period: Duration) -> Self {
        Self::spawn_with_listener(target, clock, period, None)
    }

    /// Like [`CountdownTicker::spawn`], additionally waking `listener`
    /// whenever the published value changes.
    pub fn spawn_with_listener(
        target: DateTime<Utc>,
        clock: SharedClock,
        period: Duration,
        listener: Option<Arc<Notify>>,
    ) -> Self {
        let countdown = Countdown::start(target, clock.as_ref());
        let (sender, _) = watch::channel(countdown.current());

        let mut ticker = Self {
            countdown_target: target,
            clock,
            period: period.max(MIN_PERIOD),
            sender: Arc::new(sender),
            listener,
            task: None,
        };
        ticker.task = ticker.start_task(countdown);
        ticker
    }

    fn start_task(&self, mut countdown: Countdown) -> Option<JoinHandle<()>> {
        if countdown.phase() == CountdownPhase::Expired {
            log::debug!("Countdown to {} already expired; no task started", countdown.target());
            return None;
        }

        let clock = Arc::clone(&self.clock);
        let sender = Arc::clone(&self.sender);
        let listener = self.listener.clone();
        let period = self.period;
        // Anchored at spawn time, not at the task's first poll
        let first_tick = Instant::now() + period;

        Some(tokio::spawn(async move {
            let mut interval = time::interval_at(first_tick, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;

                if !countdown.tick(clock.now()) {
                    continue;
                }

                sender.send_replace(countdown.current());
                if let Some(listener) = &listener {
                    listener.notify_one();
                }

                if countdown.phase() == CountdownPhase::Expired {
                    log::debug!("Countdown to {} expired", countdown.target());
                    break;
                }
            }
        }))
    }

    pub fn target(&self) -> DateTime<Utc> {
        self.countdown_target
    }

    /// Latest published value.
    pub fn current(&self) -> TimeRemaining {
        *self.sender.borrow()
    }

    /// Receiver that wakes whenever the value changes.
    pub fn subscribe(&self) -> watch::Receiver<TimeRemaining> {
        self.sender.subscribe()
    }

    /// True while the ticking task is alive. Expired countdowns stop on
    /// their own.
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Switch to a new target. The previous task is cancelled before the
    /// replacement starts; subscribers keep their receivers.
    pub fn retarget(&mut self, target: DateTime<Utc>) {
        if target == self.countdown_target && self.task.is_some() {
            return;
        }

        self.cancel();

        let countdown = Countdown::start(target, self.clock.as_ref());
        self.countdown_target = target;
        let previous = self.sender.send_replace(countdown.current());
        if previous != countdown.current() {
            if let Some(listener) = &self.listener {
                listener.notify_one();
            }
        }
        self.task = self.start_task(countdown);
    }

    /// Stop ticking. Equivalent to dropping the handle.
    pub fn stop(mut self) {
        self.cancel();
    }

    /// Abort the task if one is held. Returns false when already cancelled.
    fn cancel(&mut self) -> bool {
        match self.task.take() {
            Some(task) => {
                task.abort();
                log::debug!("Cancelled countdown to {}", self.countdown_target);
                true
            }
            None => false,
        }
    }
}

impl Drop for CountdownTicker {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for CountdownTicker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CountdownTicker")
            .field("target", &self.countdown_target)
            .field("period", &self.period)
            .field("current", &self.current())
            .field("running", &self.is_running())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::countdown::clock::ManualClock;
    use chrono::{Duration as ChronoDuration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn countdown_ticks_until_expired_then_freezes() {
        let mut countdown = Countdown::new(t0() + ChronoDuration::seconds(2), t0());
        assert_eq!(countdown.current().seconds, 2);
        assert_eq!(countdown.phase(), CountdownPhase::Active);

        assert!(countdown.tick(t0() + ChronoDuration::seconds(1)));
        assert_eq!(countdown.current().seconds, 1);

        // Same instant, nothing new to show
        assert!(!countdown.tick(t0() + ChronoDuration::seconds(1)));

        // 500 ms left floors to a zero display that is still active
        assert!(countdown.tick(t0() + ChronoDuration::milliseconds(1500)));
        assert_eq!(countdown.current().seconds, 0);
        assert_eq!(countdown.phase(), CountdownPhase::Active);
        assert!(!countdown.tick(t0() + ChronoDuration::milliseconds(1999)));

        assert!(countdown.tick(t0() + ChronoDuration::seconds(2)));
        assert_eq!(countdown.current(), TimeRemaining::expired());

        // Terminal even if the clock is wound back
        assert!(!countdown.tick(t0()));
        assert_eq!(countdown.phase(), CountdownPhase::Expired);
    }

    #[test]
    fn countdown_retarget_leaves_expired_state() {
        let mut countdown = Countdown::new(t0(), t0());
        assert_eq!(countdown.phase(), CountdownPhase::Expired);

        assert!(countdown.retarget(t0() + ChronoDuration::minutes(1), t0()));
        assert_eq!(countdown.phase(), CountdownPhase::Active);
        assert_eq!(countdown.current().minutes, 1);
    }

    async fn settle() {
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn ticker_publishes_immediately_and_every_period() {
        let clock = Arc::new(ManualClock::new(t0()));
        let ticker = CountdownTicker::spawn(
            t0() + ChronoDuration::seconds(10),
            clock.clone(),
            Duration::from_secs(1),
        );
        let mut rx = ticker.subscribe();
        assert_eq!(ticker.current().seconds, 10);
        assert!(!rx.has_changed().unwrap());

        clock.advance(ChronoDuration::seconds(1));
        time::advance(Duration::from_secs(1)).await;
        settle().await;

        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().seconds, 9);
        assert!(ticker.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn first_recompute_is_one_period_after_spawn() {
        let clock = Arc::new(ManualClock::new(t0()));
        let ticker = CountdownTicker::spawn(
            t0() + ChronoDuration::seconds(2),
            clock.clone(),
            Duration::from_secs(1),
        );
        let mut rx = ticker.subscribe();

        // The task has not been polled yet when time starts moving
        clock.advance(ChronoDuration::milliseconds(999));
        time::advance(Duration::from_millis(999)).await;
        settle().await;
        assert!(!rx.has_changed().unwrap());

        clock.advance(ChronoDuration::milliseconds(1));
        time::advance(Duration::from_millis(1)).await;
        settle().await;
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().seconds, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn ticker_for_past_target_starts_no_task() {
        let clock = Arc::new(ManualClock::new(t0()));
        let ticker = CountdownTicker::spawn(
            t0() - ChronoDuration::seconds(1),
            clock,
            Duration::from_secs(1),
        );
        assert_eq!(ticker.current(), TimeRemaining::expired());
        assert!(!ticker.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn ticker_notifies_listener_on_change() {
        let clock = Arc::new(ManualClock::new(t0()));
        let listener = Arc::new(Notify::new());
        let _ticker = CountdownTicker::spawn_with_listener(
            t0() + ChronoDuration::seconds(5),
            clock.clone(),
            Duration::from_secs(1),
            Some(listener.clone()),
        );

        clock.advance(ChronoDuration::seconds(1));
        time::advance(Duration::from_secs(1)).await;
        settle().await;

        // A stored permit resolves immediately
        tokio::time::timeout(Duration::from_millis(1), listener.notified())
            .await
            .expect("listener should have a pending notification");
    }
}
