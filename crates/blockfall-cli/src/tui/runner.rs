use std::{io, time::Duration};

use crossterm::{
    event::{
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute, terminal,
};

use crate::tui::{
    App,
    event::TuiEvent,
    event_loop::EventLoop,
};

/// TUI application runtime.
///
/// Owns the event loop and runs applications that implement [`App`].
/// Where the terminal supports keyboard-enhancement flags, key release
/// (and repeat) events are switched on for the duration of the run so
/// held keys can be tracked; [`Self::reports_key_release`] tells the
/// application whether that worked.
#[derive(Default, Debug)]
pub struct Tui {
    events: EventLoop,
    reports_key_release: bool,
}

impl Tui {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the tick rate (Hz, ticks per second).
    pub fn set_tick_rate(&mut self, rate: f64) {
        self.events
            .set_tick_interval(Some(Duration::from_secs_f64(1.0 / rate)));
    }

    /// Sets the render rate (Hz, frames per second).
    pub fn set_frame_rate(&mut self, rate: f64) {
        self.events
            .set_render_interval(Some(Duration::from_secs_f64(1.0 / rate)));
    }

    /// Whether the terminal delivers key release events.
    #[must_use]
    pub fn reports_key_release(&self) -> bool {
        self.reports_key_release
    }

    /// Runs the application until [`App::should_exit`].
    pub fn run<A: App>(mut self, app: &mut A) -> anyhow::Result<()> {
        self.reports_key_release = terminal::supports_keyboard_enhancement().unwrap_or(false);
        app.init(&mut self);

        let enhanced = self.reports_key_release;
        ratatui::run(|terminal| -> io::Result<()> {
            if enhanced {
                execute!(
                    io::stdout(),
                    PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
                )?;
            }
            let result = (|| {
                while !app.should_exit() {
                    match self.events.next()? {
                        TuiEvent::Tick => app.update(&mut self),
                        TuiEvent::Render => {
                            terminal.draw(|frame| app.draw(frame))?;
                        }
                        TuiEvent::Crossterm(event) => app.handle_event(&mut self, event),
                    }
                }
                Ok(())
            })();
            if enhanced {
                execute!(io::stdout(), PopKeyboardEnhancementFlags)?;
            }
            result
        })?;
        Ok(())
    }
}
