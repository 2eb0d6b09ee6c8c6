use std::{
    io,
    time::{Duration, Instant},
};

use crossterm::event;

use crate::tui::event::TuiEvent;

/// Produces tick, render, and terminal events for the runner.
///
/// `next()` blocks until the earlier of the next tick or render
/// deadline, waking early for terminal events. An unset interval
/// disables that event type.
#[derive(Debug)]
pub(super) struct EventLoop {
    tick_interval: Option<Duration>,
    render_interval: Option<Duration>,
    last_tick: Instant,
    last_render: Instant,
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
            render_interval: None,
            last_tick: now,
            last_render: now,
        }
    }

    pub(super) fn set_tick_interval(&mut self, interval: Option<Duration>) {
        self.tick_interval = interval;
    }

    pub(super) fn set_render_interval(&mut self, interval: Option<Duration>) {
        self.render_interval = interval;
    }

    /// Returns the next event, blocking until one is due.
    pub(super) fn next(&mut self) -> io::Result<TuiEvent> {
        loop {
            let now = Instant::now();
            if let Some(interval) = self.tick_interval
                && now.duration_since(self.last_tick) >= interval
            {
                self.last_tick = now;
                return Ok(TuiEvent::Tick);
            }

            if let Some(interval) = self.render_interval
                && now.duration_since(self.last_render) >= interval
            {
                self.last_render = now;
                return Ok(TuiEvent::Render);
            }

            // Wait for a terminal event, but never past the next
            // tick/render deadline. With no timers set, block freely.
            if let Some(timeout) = self.next_deadline(now)
                && !event::poll(timeout)?
            {
                continue;
            }

            return Ok(event::read()?.into());
        }
    }

    fn next_deadline(&self, now: Instant) -> Option<Duration> {
        let tick_at = self.tick_interval.map(|interval| self.last_tick + interval);
        let render_at = self
            .render_interval
            .map(|interval| self.last_render + interval);
        let earliest = [tick_at, render_at].into_iter().flatten().min()?;
        Some(earliest.saturating_duration_since(now))
    }
}
