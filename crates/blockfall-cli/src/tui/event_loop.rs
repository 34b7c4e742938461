use std::time::{Duration, Instant};

use crossterm::event;

use crate::tui::event::TuiEvent;

/// When the screen gets redrawn.
#[derive(Debug, Clone, Copy, Default)]
pub enum RenderMode {
    /// Render at a fixed interval.
    Interval(Duration),
    /// Render after each tick or terminal event.
    #[default]
    OnDirty,
}

impl RenderMode {
    pub fn from_rate(rate: f64) -> Self {
        Self::Interval(Duration::from_secs_f64(1.0 / rate))
    }

    fn as_interval(self) -> Option<Duration> {
        match self {
            RenderMode::Interval(interval) => Some(interval),
            RenderMode::OnDirty => None,
        }
    }
}

/// Produces tick, render and terminal events in order of their deadlines.
///
/// Without a tick interval no ticks are generated. Ticks report the measured
/// time since the previous tick, so a late tick carries the time it missed.
#[derive(Debug)]
pub(super) struct EventLoop {
    tick_interval: Option<Duration>,
    render_mode: RenderMode,
    last_tick: Instant,
    last_render: Instant,
    dirty: bool,
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLoop {
    pub(super) fn new() -> Self {
        let now = Instant::now();
        Self {
            tick_interval: None,
            render_mode: RenderMode::default(),
            last_tick: now,
            last_render: now,
            dirty: true, // first frame
        }
    }

    /// Sets the tick interval, restarting the tick phase.
    pub(super) fn set_tick_interval(&mut self, interval: Option<Duration>) {
        if interval != self.tick_interval {
            self.last_tick = Instant::now();
        }
        self.tick_interval = interval;
    }

    pub(super) fn set_render_mode(&mut self, render_mode: RenderMode) {
        self.render_mode = render_mode;
    }

    /// Blocks until the next tick, render or terminal event.
    pub(super) fn next(&mut self) -> anyhow::Result<TuiEvent> {
        loop {
            let now = Instant::now();
            if let Some(tick_interval) = self.tick_interval {
                let elapsed = now.duration_since(self.last_tick);
                if elapsed >= tick_interval {
                    self.last_tick = now;
                    self.dirty = true;
                    return Ok(TuiEvent::Tick(elapsed));
                }
            }

            let do_render = match self.render_mode {
                RenderMode::Interval(interval) => now.duration_since(self.last_render) >= interval,
                RenderMode::OnDirty => self.dirty,
            };
            if do_render {
                self.last_render = now;
                self.dirty = false;
                return Ok(TuiEvent::Render);
            }

            if let Some(timeout) = self.compute_timeout(now)
                && !event::poll(timeout)?
            {
                continue;
            }

            self.dirty = true;
            return Ok(event::read()?.into());
        }
    }

    fn compute_timeout(&self, now: Instant) -> Option<Duration> {
        let next_tick_at = self.tick_interval.map(|interval| self.last_tick + interval);
        let next_render_at = self
            .render_mode
            .as_interval()
            .map(|interval| self.last_render + interval);
        let next_at = [next_tick_at, next_render_at].into_iter().flatten().min()?;
        Some(next_at.saturating_duration_since(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_follows_nearest_deadline() {
        let mut events = EventLoop::new();
        let now = events.last_tick;
        assert_eq!(events.compute_timeout(now), None);

        events.last_render = now;
        events.set_render_mode(RenderMode::Interval(Duration::from_millis(50)));
        assert_eq!(
            events.compute_timeout(now),
            Some(Duration::from_millis(50))
        );

        events.tick_interval = Some(Duration::from_millis(20));
        assert_eq!(
            events.compute_timeout(now),
            Some(Duration::from_millis(20))
        );
        assert_eq!(
            events.compute_timeout(now + Duration::from_millis(30)),
            Some(Duration::ZERO)
        );
    }

    #[test]
    fn test_render_mode_from_rate() {
        let RenderMode::Interval(interval) = RenderMode::from_rate(50.0) else {
            panic!("expected interval mode");
        };
        assert_eq!(interval, Duration::from_millis(20));
    }
}
