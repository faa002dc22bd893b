//! Repeating tick timer for a single-threaded loop.
//!
//! The loop asks [`TickScheduler::timeout`] how long it may block on input,
//! then calls [`TickScheduler::fire`]. Whenever the period or the running
//! flag changes the schedule is cancelled and armed afresh, so a stale
//! period never produces another tick.

use std::time::{Duration, Instant};

use log::debug;

/// Identifies one armed schedule. A new handle is issued on every re-arm.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickHandle(u64);

#[derive(Clone, Copy, Debug)]
struct Schedule {
    handle: TickHandle,
    period: Duration,
    due: Instant,
}

/// Result of [`TickScheduler::sync`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncAction {
    Armed(TickHandle),
    Cancelled(TickHandle),
    Unchanged,
}

#[derive(Debug, Default)]
pub struct TickScheduler {
    active: Option<Schedule>,
    issued: u64,
}

impl TickScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancels whatever is armed, then arms a new schedule whose first tick
    /// is one `period` from `now`.
    pub fn arm(&mut self, period: Duration, now: Instant) -> TickHandle {
        self.cancel();
        self.issued += 1;
        let handle = TickHandle(self.issued);
        self.active = Some(Schedule {
            handle,
            period,
            due: now + period,
        });
        debug!("Armed {:?} every {}ms", handle, period.as_millis());
        handle
    }

    pub fn cancel(&mut self) -> Option<TickHandle> {
        let cancelled = self.active.take().map(|s| s.handle);
        if let Some(handle) = cancelled {
            debug!("Cancelled {:?}", handle);
        }
        cancelled
    }

    /// Brings the schedule in line with the game: nothing armed while
    /// stopped, and exactly one schedule with the current period while
    /// running.
    pub fn sync(&mut self, running: bool, period: Duration, now: Instant) -> SyncAction {
        match (running, self.active) {
            (false, Some(_)) => match self.cancel() {
                Some(handle) => SyncAction::Cancelled(handle),
                None => SyncAction::Unchanged,
            },
            (false, None) => SyncAction::Unchanged,
            (true, Some(s)) if s.period == period => SyncAction::Unchanged,
            (true, _) => SyncAction::Armed(self.arm(period, now)),
        }
    }

    /// True when a tick is due at `now`. The next one is scheduled a full
    /// period after `now`; late ticks are not caught up.
    pub fn fire(&mut self, now: Instant) -> bool {
        match &mut self.active {
            Some(s) if now >= s.due => {
                s.due = now + s.period;
                true
            }
            _ => false,
        }
    }

    /// Time left until the next tick, or `None` when nothing is armed.
    pub fn timeout(&self, now: Instant) -> Option<Duration> {
        self.active.map(|s| s.due.saturating_duration_since(now))
    }

    pub fn handle(&self) -> Option<TickHandle> {
        self.active.map(|s| s.handle)
    }

    pub fn period(&self) -> Option<Duration> {
        self.active.map(|s| s.period)
    }

    pub fn is_armed(&self) -> bool {
        self.active.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_200: Duration = Duration::from_millis(200);
    const MS_196: Duration = Duration::from_millis(196);

    #[test]
    fn test_nothing_fires_until_armed() {
        let mut scheduler = TickScheduler::new();
        let now = Instant::now();

        assert!(!scheduler.is_armed());
        assert_eq!(scheduler.timeout(now), None);
        assert!(!scheduler.fire(now + Duration::from_secs(10)));
    }

    #[test]
    fn test_fires_each_period() {
        let mut scheduler = TickScheduler::new();
        let t0 = Instant::now();
        scheduler.arm(MS_200, t0);

        assert!(!scheduler.fire(t0 + Duration::from_millis(199)));
        assert!(scheduler.fire(t0 + MS_200));
        assert!(!scheduler.fire(t0 + MS_200));
        assert_eq!(scheduler.timeout(t0 + MS_200), Some(MS_200));
        assert!(scheduler.fire(t0 + 2 * MS_200));
    }

    #[test]
    fn test_late_tick_does_not_catch_up() {
        let mut scheduler = TickScheduler::new();
        let t0 = Instant::now();
        scheduler.arm(MS_200, t0);

        let late = t0 + Duration::from_millis(750);
        assert!(scheduler.fire(late));
        assert!(!scheduler.fire(late));
        assert_eq!(scheduler.timeout(late), Some(MS_200));
    }

    #[test]
    fn test_rearm_cancels_previous() {
        let mut scheduler = TickScheduler::new();
        let t0 = Instant::now();
        let first = scheduler.arm(MS_200, t0);

        let t1 = t0 + Duration::from_millis(150);
        let second = scheduler.arm(MS_196, t1);

        assert_ne!(first, second);
        assert_eq!(scheduler.handle(), Some(second));
        // The old schedule would have fired at t0 + 200.
        assert!(!scheduler.fire(t0 + MS_200));
        assert!(scheduler.fire(t1 + MS_196));
    }

    #[test]
    fn test_cancel_stops_everything() {
        let mut scheduler = TickScheduler::new();
        let t0 = Instant::now();
        let handle = scheduler.arm(MS_200, t0);

        assert_eq!(scheduler.cancel(), Some(handle));
        assert_eq!(scheduler.cancel(), None);
        assert!(!scheduler.fire(t0 + Duration::from_secs(5)));
    }

    #[test]
    fn test_sync_follows_running_flag() {
        let mut scheduler = TickScheduler::new();
        let t0 = Instant::now();

        assert_eq!(scheduler.sync(false, MS_200, t0), SyncAction::Unchanged);

        let armed = match scheduler.sync(true, MS_200, t0) {
            SyncAction::Armed(handle) => handle,
            other => panic!("expected Armed, got {other:?}"),
        };
        assert_eq!(scheduler.sync(true, MS_200, t0 + MS_196), SyncAction::Unchanged);

        assert_eq!(scheduler.sync(false, MS_200, t0 + MS_196), SyncAction::Cancelled(armed));
        assert!(!scheduler.is_armed());
        assert!(!scheduler.fire(t0 + MS_200));
    }

    #[test]
    fn test_sync_rearms_on_period_change() {
        let mut scheduler = TickScheduler::new();
        let t0 = Instant::now();
        scheduler.sync(true, MS_200, t0);

        let t1 = t0 + MS_200;
        assert!(scheduler.fire(t1));
        assert!(matches!(scheduler.sync(true, MS_196, t1), SyncAction::Armed(_)));
        assert_eq!(scheduler.period(), Some(MS_196));
        assert_eq!(scheduler.timeout(t1), Some(MS_196));
    }
}
