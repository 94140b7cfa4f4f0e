use std::time::{Duration, Instant};

/// Repeating timer that drives gravity.
///
/// The timer is a plain value: it never sleeps or spawns anything. The event
/// loop asks it for its next [`deadline`](Self::deadline) and calls
/// [`fire_if_due`](Self::fire_if_due) with the current instant. Every method
/// that depends on time takes that instant as an argument, so the lifecycle
/// can be driven with synthetic instants.
///
/// ```text
///            start          suspend
///  Stopped ────────> Running ──────> Suspended
///     ^                 ^    <──────     |
///     |   cancel        |    resume      |  cancel
///     └─────────────────┴────────────────┘
/// ```
///
/// A suspended or cancelled timer has no deadline and never fires.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DropTimer {
    interval: Option<Duration>,
    next_fire: Option<Instant>,
}

impl DropTimer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts (or restarts) the timer with a new period.
    ///
    /// The first firing happens one full `interval` after `now`.
    pub fn start(&mut self, interval: Duration, now: Instant) {
        self.interval = Some(interval);
        self.next_fire = Some(now + interval);
        tracing::trace!(?interval, "drop timer started");
    }

    /// Stops firing but remembers the period for [`resume`](Self::resume).
    pub fn suspend(&mut self) {
        if self.next_fire.take().is_some() {
            tracing::trace!("drop timer suspended");
        }
    }

    /// Restarts a suspended timer; the next firing is one period after `now`.
    ///
    /// Does nothing if the timer is already running or was never started.
    pub fn resume(&mut self, now: Instant) {
        if self.next_fire.is_some() {
            return;
        }
        if let Some(interval) = self.interval {
            self.next_fire = Some(now + interval);
            tracing::trace!("drop timer resumed");
        }
    }

    /// Stops the timer and forgets its period.
    pub fn cancel(&mut self) {
        self.interval = None;
        self.next_fire = None;
        tracing::trace!("drop timer cancelled");
    }

    /// Resumes or suspends so that the timer runs iff `running` is true.
    pub fn set_running(&mut self, running: bool, now: Instant) {
        if running {
            self.resume(now);
        } else {
            self.suspend();
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.next_fire.is_some()
    }

    #[must_use]
    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.next_fire
    }

    /// Returns `true` and schedules the next period if the deadline has been
    /// reached at `now`.
    ///
    /// Missed periods are not replayed: a late firing counts once and the
    /// next one is a full period after `now`.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match (self.next_fire, self.interval) {
            (Some(deadline), Some(interval)) if deadline <= now => {
                self.next_fire = Some(now + interval);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERIOD: Duration = Duration::from_millis(500);

    #[test]
    fn test_new_timer_never_fires() {
        let now = Instant::now();
        let mut timer = DropTimer::new();
        assert!(!timer.is_running());
        assert_eq!(timer.deadline(), None);
        assert!(!timer.fire_if_due(now + Duration::from_secs(3600)));
    }

    #[test]
    fn test_fires_once_per_period() {
        let t0 = Instant::now();
        let mut timer = DropTimer::new();
        timer.start(PERIOD, t0);
        assert_eq!(timer.deadline(), Some(t0 + PERIOD));

        assert!(!timer.fire_if_due(t0 + PERIOD / 2));
        assert!(timer.fire_if_due(t0 + PERIOD));
        assert!(!timer.fire_if_due(t0 + PERIOD));
        assert_eq!(timer.deadline(), Some(t0 + PERIOD * 2));
        assert!(timer.fire_if_due(t0 + PERIOD * 2));
    }

    #[test]
    fn test_late_firing_is_not_replayed() {
        let t0 = Instant::now();
        let mut timer = DropTimer::new();
        timer.start(PERIOD, t0);

        let late = t0 + PERIOD * 5;
        assert!(timer.fire_if_due(late));
        assert!(!timer.fire_if_due(late));
        assert_eq!(timer.deadline(), Some(late + PERIOD));
    }

    #[test]
    fn test_suspend_and_resume() {
        let t0 = Instant::now();
        let mut timer = DropTimer::new();
        timer.start(PERIOD, t0);

        timer.suspend();
        assert!(!timer.is_running());
        assert_eq!(timer.deadline(), None);
        assert!(!timer.fire_if_due(t0 + PERIOD * 10));
        assert_eq!(timer.interval(), Some(PERIOD));

        let t1 = t0 + PERIOD * 10;
        timer.resume(t1);
        assert!(timer.is_running());
        assert_eq!(timer.deadline(), Some(t1 + PERIOD));
        assert!(!timer.fire_if_due(t1));
        assert!(timer.fire_if_due(t1 + PERIOD));
    }

    #[test]
    fn test_resume_keeps_running_deadline() {
        let t0 = Instant::now();
        let mut timer = DropTimer::new();
        timer.start(PERIOD, t0);
        timer.resume(t0 + PERIOD / 2);
        assert_eq!(timer.deadline(), Some(t0 + PERIOD));
    }

    #[test]
    fn test_cancel_forgets_interval() {
        let t0 = Instant::now();
        let mut timer = DropTimer::new();
        timer.start(PERIOD, t0);
        timer.cancel();

        assert_eq!(timer, DropTimer::new());
        timer.resume(t0);
        assert!(!timer.is_running());
        assert!(!timer.fire_if_due(t0 + PERIOD * 2));
    }

    #[test]
    fn test_set_running() {
        let t0 = Instant::now();
        let mut timer = DropTimer::new();
        timer.start(PERIOD, t0);

        timer.set_running(false, t0);
        assert!(!timer.is_running());
        timer.set_running(false, t0);
        assert!(!timer.is_running());

        let t1 = t0 + PERIOD * 3;
        timer.set_running(true, t1);
        assert_eq!(timer.deadline(), Some(t1 + PERIOD));
    }

    #[test]
    fn test_restart_changes_period() {
        let t0 = Instant::now();
        let mut timer = DropTimer::new();
        timer.start(PERIOD, t0);
        timer.start(PERIOD * 2, t0);
        assert!(!timer.fire_if_due(t0 + PERIOD));
        assert!(timer.fire_if_due(t0 + PERIOD * 2));
    }
}
