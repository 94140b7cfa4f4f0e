use std::{
    io,
    time::{Duration, Instant},
};

use crossterm::event;

use crate::{DropTimer, event::LoopEvent};

/// Rendering trigger mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderMode {
    /// Render at fixed intervals.
    Interval(Duration),
    /// Render after state changes (tick or crossterm event).
    #[default]
    OnDirty,
    /// Render after state changes, but with minimum interval between renders.
    ///
    /// If events occur faster than the interval, they are batched into one render.
    Throttled(Duration),
}

impl RenderMode {
    /// Creates `Throttled` mode from frame rate (FPS).
    #[must_use]
    pub fn throttled_from_rate(rate: f64) -> Self {
        Self::Throttled(Duration::from_secs_f64(1.0 / rate))
    }
}

/// Multiplexes the drop timer, redraws and terminal input.
///
/// [`next`](Self::next) returns exactly one event per call. A due timer
/// firing wins over a due redraw, which wins over input; input that arrives
/// while the loop is waiting is returned as soon as it is read.
#[derive(Debug)]
pub(super) struct EventLoop {
    timer: DropTimer,
    render_mode: RenderMode,
    last_render: Instant,
    dirty: bool,
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLoop {
    /// Creates an event loop with a stopped timer and `OnDirty` rendering.
    pub fn new() -> Self {
        let now = Instant::now();
        let past_time = now.checked_sub(Duration::from_secs(86400)).unwrap_or(now);
        Self {
            timer: DropTimer::new(),
            render_mode: RenderMode::default(),
            last_render: past_time,
            dirty: true, // Initial render is required on startup
        }
    }

    pub(super) fn timer(&self) -> &DropTimer {
        &self.timer
    }

    pub(super) fn timer_mut(&mut self) -> &mut DropTimer {
        &mut self.timer
    }

    pub(super) fn set_render_mode(&mut self, render_mode: RenderMode) {
        self.render_mode = render_mode;
    }

    /// Returns the next event.
    ///
    /// Blocks until the timer fires, a render is due, or a crossterm event
    /// arrives. With a suspended timer and nothing to render, only waits for
    /// crossterm events.
    pub(super) fn next(&mut self) -> io::Result<LoopEvent> {
        loop {
            let now = Instant::now();
            if let Some(event) = self.due_event(now) {
                return Ok(event);
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

    fn due_event(&mut self, now: Instant) -> Option<LoopEvent> {
        if self.timer.fire_if_due(now) {
            self.dirty = true;
            return Some(LoopEvent::Tick);
        }

        let do_render = match self.render_mode {
            RenderMode::Interval(interval) => now.duration_since(self.last_render) >= interval,
            RenderMode::OnDirty => self.dirty,
            RenderMode::Throttled(interval) => {
                self.dirty && now.duration_since(self.last_render) >= interval
            }
        };
        if do_render {
            self.last_render = now;
            self.dirty = false;
            return Some(LoopEvent::Render);
        }
        None
    }

    fn compute_timeout(&self, now: Instant) -> Option<Duration> {
        let next_tick_at = self.timer.deadline();
        let next_render_at = match self.render_mode {
            RenderMode::Interval(interval) => Some(self.last_render + interval),
            RenderMode::OnDirty => self.dirty.then_some(now),
            RenderMode::Throttled(interval) => self.dirty.then(|| self.last_render + interval),
        };
        let next_timeout_at = [next_tick_at, next_render_at].into_iter().flatten().min()?;
        Some(next_timeout_at.saturating_duration_since(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERIOD: Duration = Duration::from_millis(100);

    fn rendered_loop(now: Instant) -> EventLoop {
        let mut events = EventLoop::new();
        assert!(events.due_event(now).is_some_and(|e| e.is_render()));
        events
    }

    #[test]
    fn test_initial_render() {
        let now = Instant::now();
        let mut events = rendered_loop(now);
        assert!(events.due_event(now).is_none());
        // nothing scheduled: wait for input only
        assert_eq!(events.compute_timeout(now), None);
    }

    #[test]
    fn test_tick_then_render() {
        let t0 = Instant::now();
        let mut events = rendered_loop(t0);
        events.timer_mut().start(PERIOD, t0);
        assert_eq!(events.compute_timeout(t0), Some(PERIOD));

        let t1 = t0 + PERIOD;
        assert!(events.due_event(t1).is_some_and(|e| e.is_tick()));
        assert!(events.due_event(t1).is_some_and(|e| e.is_render()));
        assert!(events.due_event(t1).is_none());
        assert_eq!(events.compute_timeout(t1), Some(PERIOD));
    }

    #[test]
    fn test_suspended_timer_produces_no_ticks() {
        let t0 = Instant::now();
        let mut events = rendered_loop(t0);
        events.timer_mut().start(PERIOD, t0);
        events.timer_mut().suspend();

        assert!(events.due_event(t0 + PERIOD * 3).is_none());
        assert_eq!(events.compute_timeout(t0), None);
    }

    #[test]
    fn test_throttled_render_waits_for_interval() {
        let t0 = Instant::now();
        let mut events = EventLoop::new();
        events.set_render_mode(RenderMode::Throttled(PERIOD));
        assert!(events.due_event(t0).is_some_and(|e| e.is_render()));

        events.dirty = true;
        assert!(events.due_event(t0 + PERIOD / 2).is_none());
        assert_eq!(events.compute_timeout(t0 + PERIOD / 2), Some(PERIOD / 2));
        assert!(events.due_event(t0 + PERIOD).is_some_and(|e| e.is_render()));
    }
}
