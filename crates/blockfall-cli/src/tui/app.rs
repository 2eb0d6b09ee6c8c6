use crossterm::event::Event;
use ratatui::Frame;

use crate::tui::Tui;

/// Trait for TUI applications run by [`Tui::run`].
pub trait App {
    /// Initializes the application.
    ///
    /// Called before the event loop starts; use this to configure the
    /// tick and frame rates.
    fn init(&mut self, tui: &mut Tui);

    /// Returns whether the application should exit.
    fn should_exit(&self) -> bool;

    /// Handles terminal events (key input, resize, ...).
    fn handle_event(&mut self, tui: &mut Tui, event: Event);

    /// Updates application state (called on each tick).
    fn update(&mut self, tui: &mut Tui);

    /// Draws the screen (called on each render).
    fn draw(&self, frame: &mut Frame);
}
