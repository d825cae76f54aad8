//! Virtual-clock timer queue
//!
//! Stands in for the host's interval/timeout primitives. The owner advances
//! the clock and pulls due timers out one at a time, so a handler that cancels
//! everything (game over) also stops the rest of the batch from firing.

use std::time::Duration;

/// Shortest period an interval may have; zero would fire forever
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// What a timer does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    SpawnEnemy,
    RampSpeed,
    ReopenFireGate,
}

#[derive(Debug, Clone)]
struct Timer {
    /// Creation order, breaks ties between timers due at the same instant
    seq: u64,
    kind: TimerKind,
    due: Duration,
    period: Option<Duration>,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    now: Duration,
    timers: Vec<Timer>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed on the virtual clock
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Fires `kind` every `period`, first after one full period
    pub fn set_interval(&mut self, kind: TimerKind, period: Duration) {
        let period = period.max(MIN_PERIOD);
        self.insert(kind, self.now + period, Some(period));
    }

    /// Fires `kind` once after `delay`
    pub fn set_timeout(&mut self, kind: TimerKind, delay: Duration) {
        self.insert(kind, self.now + delay, None);
    }

    fn insert(&mut self, kind: TimerKind, due: Duration, period: Option<Duration>) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.push(Timer {
            seq,
            kind,
            due,
            period,
        });
    }

    pub fn cancel_all(&mut self) {
        self.timers.clear();
    }

    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    pub fn is_pending(&self, kind: TimerKind) -> bool {
        self.timers.iter().any(|t| t.kind == kind)
    }

    /// Pops the earliest timer due at or before `until`, moving the clock to its
    /// due time. Ties fire in creation order. Intervals are re-armed before
    /// returning. Call [`Scheduler::settle`] once nothing more is due.
    pub fn pop_due(&mut self, until: Duration) -> Option<TimerKind> {
        let idx = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= until)
            .min_by_key(|(_, t)| (t.due, t.seq))
            .map(|(idx, _)| idx)?;

        let Timer {
            kind, due, period, ..
        } = self.timers[idx].clone();
        self.now = self.now.max(due);
        match period {
            Some(period) => self.timers[idx].due = due + period,
            None => {
                self.timers.swap_remove(idx);
            }
        }
        Some(kind)
    }

    /// Moves the clock to `until` after all due timers have been popped
    pub fn settle(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(scheduler: &mut Scheduler, dt: Duration) -> Vec<TimerKind> {
        let until = scheduler.now() + dt;
        let mut fired = Vec::new();
        while let Some(kind) = scheduler.pop_due(until) {
            fired.push(kind);
        }
        scheduler.settle(until);
        fired
    }

    #[test]
    fn test_timeout_fires_once() {
        let mut scheduler = Scheduler::new();
        scheduler.set_timeout(TimerKind::ReopenFireGate, Duration::from_millis(100));

        assert!(drain(&mut scheduler, Duration::from_millis(99)).is_empty());
        assert_eq!(
            drain(&mut scheduler, Duration::from_millis(1)),
            vec![TimerKind::ReopenFireGate]
        );
        assert!(drain(&mut scheduler, Duration::from_millis(500)).is_empty());
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_interval_rearms() {
        let mut scheduler = Scheduler::new();
        scheduler.set_interval(TimerKind::SpawnEnemy, Duration::from_millis(1000));

        let fired = drain(&mut scheduler, Duration::from_millis(3500));
        assert_eq!(fired, vec![TimerKind::SpawnEnemy; 3]);
        assert_eq!(scheduler.now(), Duration::from_millis(3500));
        assert!(scheduler.is_pending(TimerKind::SpawnEnemy));
    }

    #[test]
    fn test_timers_fire_in_due_order() {
        let mut scheduler = Scheduler::new();
        scheduler.set_interval(TimerKind::RampSpeed, Duration::from_millis(300));
        scheduler.set_interval(TimerKind::SpawnEnemy, Duration::from_millis(200));

        let fired = drain(&mut scheduler, Duration::from_millis(600));
        assert_eq!(
            fired,
            vec![
                TimerKind::SpawnEnemy,
                TimerKind::RampSpeed,
                TimerKind::SpawnEnemy,
                // both due at 600; the ramp timer was created first
                TimerKind::RampSpeed,
                TimerKind::SpawnEnemy,
            ]
        );
    }

    #[test]
    fn test_cancel_all() {
        let mut scheduler = Scheduler::new();
        scheduler.set_interval(TimerKind::SpawnEnemy, Duration::from_millis(10));
        scheduler.set_timeout(TimerKind::ReopenFireGate, Duration::from_millis(10));
        scheduler.set_interval(TimerKind::RampSpeed, Duration::from_millis(10));

        scheduler.cancel_all();
        assert_eq!(scheduler.pending(), 0);
        assert!(drain(&mut scheduler, Duration::from_millis(50)).is_empty());
    }

    #[test]
    fn test_zero_period_interval_is_clamped() {
        let mut scheduler = Scheduler::new();
        scheduler.set_interval(TimerKind::SpawnEnemy, Duration::ZERO);
        assert_eq!(drain(&mut scheduler, Duration::from_millis(3)).len(), 3);
    }
}
