// Refresh scheduler
//
// Cooperative periodic timer polled from the event loop. Nothing runs in
// the background: the loop calls `poll` with the current instant and the
// scheduler fires the handler when the period has elapsed.

use crate::error::Result;
use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Default refresh period in milliseconds
pub const DEFAULT_REFRESH_MS: u64 = 5000;

/// Minimum refresh period in milliseconds
pub const MIN_REFRESH_MS: u64 = 1000;

/// Maximum refresh period in milliseconds
pub const MAX_REFRESH_MS: u64 = 60_000;

/// Refresh period adjustment step in milliseconds
pub const REFRESH_STEP_MS: u64 = 500;

/// Result of one `poll`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not due, or the timer is stopped
    Idle,
    /// The handler ran and succeeded
    Fired,
    /// The handler ran and failed; the schedule continues
    Failed,
}

/// Keeps the timer armed while alive
///
/// Dropping the handle (or calling [`RefreshHandle::cancel`]) stops the
/// scheduler it came from.
#[derive(Debug)]
pub struct RefreshHandle {
    active: Rc<Cell<bool>>,
}

impl RefreshHandle {
    pub fn cancel(self) {
        drop(self);
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        self.active.set(false);
    }
}

#[derive(Debug)]
pub struct RefreshScheduler {
    period: Duration,
    next_due: Option<Instant>,
    active: Rc<Cell<bool>>,
    fired_ticks: u64,
    failed_ticks: u64,
}

/// Clamp a requested period to the supported bounds
pub fn clamp_period_ms(period_ms: u64) -> u64 {
    period_ms.clamp(MIN_REFRESH_MS, MAX_REFRESH_MS)
}

impl RefreshScheduler {
    /// Create a stopped scheduler with a clamped period
    pub fn new(period_ms: u64) -> Self {
        Self {
            period: Duration::from_millis(clamp_period_ms(period_ms)),
            next_due: None,
            active: Rc::new(Cell::new(false)),
            fired_ticks: 0,
            failed_ticks: 0,
        }
    }

    /// Arm the timer; the first tick is due one period after `now`
    ///
    /// Restarting hands out a fresh handle. A handle from an earlier start
    /// no longer controls the timer.
    pub fn start(&mut self, now: Instant) -> RefreshHandle {
        let active = Rc::new(Cell::new(true));
        self.active = Rc::clone(&active);
        self.next_due = Some(now + self.period);
        tracing::debug!(period_ms = self.period_ms(), "Refresh timer started");
        RefreshHandle { active }
    }

    pub fn is_running(&self) -> bool {
        self.active.get() && self.next_due.is_some()
    }

    pub fn period_ms(&self) -> u64 {
        self.period.as_millis() as u64
    }

    /// Change the period; an armed timer is rescheduled from `now`
    ///
    /// Returns the period actually applied after clamping.
    pub fn set_period(&mut self, period_ms: u64, now: Instant) -> u64 {
        let applied = clamp_period_ms(period_ms);
        self.period = Duration::from_millis(applied);
        if self.is_running() {
            self.next_due = Some(now + self.period);
        }
        applied
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.next_due.filter(|_| self.active.get())
    }

    pub fn fired_ticks(&self) -> u64 {
        self.fired_ticks
    }

    pub fn failed_ticks(&self) -> u64 {
        self.failed_ticks
    }

    /// Run `handler` if a tick is due at `now`
    ///
    /// Missed periods are not replayed: after a late poll the next tick is
    /// due one period after `now`.
    pub fn poll<F>(&mut self, now: Instant, mut handler: F) -> TickOutcome
    where
        F: FnMut() -> Result<()>,
    {
        if !self.active.get() {
            self.next_due = None;
            return TickOutcome::Idle;
        }
        let Some(due) = self.next_due else {
            return TickOutcome::Idle;
        };
        if now < due {
            return TickOutcome::Idle;
        }

        self.next_due = Some(now + self.period);
        match handler() {
            Ok(()) => {
                self.fired_ticks += 1;
                TickOutcome::Fired
            }
            Err(e) => {
                self.failed_ticks += 1;
                tracing::warn!(error = %e, failed_ticks = self.failed_ticks, "Refresh tick failed");
                TickOutcome::Failed
            }
        }
    }
}

impl Default for RefreshScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_REFRESH_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_fires_only_when_due() {
        let t0 = Instant::now();
        let mut scheduler = RefreshScheduler::new(5000);
        let _handle = scheduler.start(t0);
        let mut calls = 0;
        let mut count = || -> Result<()> {
            calls += 1;
            Ok(())
        };

        assert_eq!(scheduler.poll(t0 + ms(4999), &mut count), TickOutcome::Idle);
        assert_eq!(scheduler.poll(t0 + ms(5000), &mut count), TickOutcome::Fired);
        assert_eq!(scheduler.poll(t0 + ms(6000), &mut count), TickOutcome::Idle);
        assert_eq!(scheduler.poll(t0 + ms(10_000), &mut count), TickOutcome::Fired);
        assert_eq!(calls, 2);
        assert_eq!(scheduler.fired_ticks(), 2);
    }

    #[test]
    fn test_stopped_scheduler_never_fires() {
        let t0 = Instant::now();
        let mut scheduler = RefreshScheduler::new(1000);
        assert!(!scheduler.is_running());
        assert_eq!(scheduler.poll(t0 + ms(60_000), || Ok(())), TickOutcome::Idle);
    }

    #[test]
    fn test_dropping_handle_stops_timer() {
        let t0 = Instant::now();
        let mut scheduler = RefreshScheduler::new(1000);
        {
            let handle = scheduler.start(t0);
            assert!(handle.is_active());
            assert!(scheduler.is_running());
        }
        assert!(!scheduler.is_running());
        assert_eq!(scheduler.poll(t0 + ms(2000), || Ok(())), TickOutcome::Idle);
        assert_eq!(scheduler.next_due(), None);
    }

    #[test]
    fn test_cancel_and_restart() {
        let t0 = Instant::now();
        let mut scheduler = RefreshScheduler::new(1000);
        let first = scheduler.start(t0);
        first.cancel();
        assert!(!scheduler.is_running());

        let _second = scheduler.start(t0 + ms(5000));
        assert!(scheduler.is_running());
        assert_eq!(scheduler.poll(t0 + ms(6000), || Ok(())), TickOutcome::Fired);
    }

    #[test]
    fn test_stale_handle_does_not_stop_restarted_timer() {
        let t0 = Instant::now();
        let mut scheduler = RefreshScheduler::new(1000);
        let first = scheduler.start(t0);
        let _second = scheduler.start(t0);
        drop(first);
        assert!(scheduler.is_running());
    }

    #[test]
    fn test_failed_tick_is_counted_and_schedule_continues() {
        let t0 = Instant::now();
        let mut scheduler = RefreshScheduler::new(1000);
        let _handle = scheduler.start(t0);

        let outcome = scheduler.poll(t0 + ms(1000), || Err(EngineError::EmptyInput));
        assert_eq!(outcome, TickOutcome::Failed);
        assert_eq!(scheduler.failed_ticks(), 1);
        assert!(scheduler.is_running());
        assert_eq!(scheduler.poll(t0 + ms(2000), || Ok(())), TickOutcome::Fired);
    }

    #[test]
    fn test_period_is_clamped_and_reschedules() {
        let t0 = Instant::now();
        let mut scheduler = RefreshScheduler::new(10);
        assert_eq!(scheduler.period_ms(), MIN_REFRESH_MS);
        assert_eq!(RefreshScheduler::new(1_000_000).period_ms(), MAX_REFRESH_MS);

        let _handle = scheduler.start(t0);
        assert_eq!(scheduler.set_period(2500, t0 + ms(500)), 2500);
        assert_eq!(scheduler.next_due(), Some(t0 + ms(3000)));
        assert_eq!(scheduler.set_period(0, t0), MIN_REFRESH_MS);
    }

    #[test]
    fn test_late_poll_does_not_replay_missed_ticks() {
        let t0 = Instant::now();
        let mut scheduler = RefreshScheduler::new(1000);
        let _handle = scheduler.start(t0);
        let mut calls = 0;
        let mut count = || -> Result<()> {
            calls += 1;
            Ok(())
        };
        scheduler.poll(t0 + ms(10_000), &mut count);
        scheduler.poll(t0 + ms(10_500), &mut count);
        assert_eq!(calls, 1);
    }
}
