use std::time::Duration;

/// A repeating timer driven by elapsed time rather than the wall clock.
///
/// The owner feeds elapsed time through [`Self::advance`] and receives the
/// number of periods that completed. A cancelled timer never fires again until
/// it is re-armed.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use blockfall_engine::IntervalTimer;
///
/// let mut timer = IntervalTimer::new(Duration::from_millis(500));
/// assert_eq!(timer.advance(Duration::from_millis(1200)), 2);
/// assert_eq!(timer.time_until_fire(), Some(Duration::from_millis(300)));
///
/// timer.cancel();
/// assert_eq!(timer.advance(Duration::from_secs(10)), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalTimer {
    period: Duration,
    elapsed: Duration,
    armed: bool,
}

impl IntervalTimer {
    /// Creates an armed timer.
    ///
    /// # Panics
    ///
    /// Panics if `period` is zero.
    #[must_use]
    pub fn new(period: Duration) -> Self {
        assert!(!period.is_zero(), "timer period must be positive");
        Self {
            period,
            elapsed: Duration::ZERO,
            armed: true,
        }
    }

    /// Creates a cancelled timer that fires only after [`Self::rearm`].
    #[must_use]
    pub fn disarmed(period: Duration) -> Self {
        let mut timer = Self::new(period);
        timer.armed = false;
        timer
    }

    #[must_use]
    pub fn period(&self) -> Duration {
        self.period
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Arms the timer with a new period and restarts its phase.
    ///
    /// # Panics
    ///
    /// Panics if `period` is zero.
    pub fn rearm(&mut self, period: Duration) {
        assert!(!period.is_zero(), "timer period must be positive");
        self.period = period;
        self.elapsed = Duration::ZERO;
        self.armed = true;
    }

    pub fn cancel(&mut self) {
        self.armed = false;
        self.elapsed = Duration::ZERO;
    }

    /// Returns how much time must pass before the next fire, or `None` when
    /// cancelled.
    #[must_use]
    pub fn time_until_fire(&self) -> Option<Duration> {
        self.armed.then(|| self.period - self.elapsed)
    }

    /// Advances the timer by `dt` and returns how many times it fired.
    pub fn advance(&mut self, dt: Duration) -> u32 {
        if !self.armed {
            return 0;
        }
        let mut fires = 0;
        self.elapsed += dt;
        while self.elapsed >= self.period {
            self.elapsed -= self.period;
            fires += 1;
        }
        fires
    }
}

/// Finds the timer that fires first within `budget`.
///
/// Returns its index in `timers` and the time until it fires. Ties go to the
/// lower index, which gives owners a fixed processing order for timers that
/// are due at the same instant.
#[must_use]
pub fn earliest_due(timers: &[&IntervalTimer], budget: Duration) -> Option<(usize, Duration)> {
    timers
        .iter()
        .enumerate()
        .filter_map(|(i, timer)| Some((i, timer.time_until_fire()?)))
        .filter(|(_, wait)| *wait <= budget)
        .min_by_key(|(i, wait)| (*wait, *i))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_fires_once_per_period() {
        let mut timer = IntervalTimer::new(ms(100));
        assert_eq!(timer.advance(ms(99)), 0);
        assert_eq!(timer.advance(ms(1)), 1);
        assert_eq!(timer.advance(ms(350)), 3);
        assert_eq!(timer.time_until_fire(), Some(ms(50)));
    }

    #[test]
    fn test_cancel_stops_fires() {
        let mut timer = IntervalTimer::new(ms(100));
        timer.advance(ms(90));
        timer.cancel();
        assert!(!timer.is_armed());
        assert_eq!(timer.time_until_fire(), None);
        assert_eq!(timer.advance(ms(1000)), 0);
    }

    #[test]
    fn test_rearm_restarts_phase() {
        let mut timer = IntervalTimer::new(ms(600));
        timer.advance(ms(500));
        timer.rearm(ms(450));
        assert_eq!(timer.time_until_fire(), Some(ms(450)));
        assert_eq!(timer.advance(ms(449)), 0);
        assert_eq!(timer.advance(ms(1)), 1);
    }

    #[test]
    fn test_disarmed_timer_waits_for_rearm() {
        let mut timer = IntervalTimer::disarmed(ms(10));
        assert_eq!(timer.advance(ms(100)), 0);
        timer.rearm(ms(10));
        assert_eq!(timer.advance(ms(25)), 2);
    }

    #[test]
    #[should_panic(expected = "timer period must be positive")]
    fn test_zero_period_panics() {
        let _ = IntervalTimer::new(Duration::ZERO);
    }

    #[test]
    fn test_earliest_due_orders_by_time_then_index() {
        let a = IntervalTimer::new(ms(300));
        let b = IntervalTimer::new(ms(200));
        let c = IntervalTimer::new(ms(200));
        assert_eq!(earliest_due(&[&a, &b, &c], ms(1000)), Some((1, ms(200))));
        assert_eq!(earliest_due(&[&a, &b, &c], ms(199)), None);
        assert_eq!(earliest_due(&[&c, &b], ms(200)), Some((0, ms(200))));
    }

    #[test]
    fn test_earliest_due_skips_cancelled() {
        let mut a = IntervalTimer::new(ms(100));
        let b = IntervalTimer::new(ms(500));
        a.cancel();
        assert_eq!(earliest_due(&[&a, &b], ms(1000)), Some((1, ms(500))));
    }
}
