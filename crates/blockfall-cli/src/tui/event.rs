use crossterm::event::Event as CrosstermEvent;

/// Events processed by TUI applications.
#[derive(Debug, Clone, derive_more::From)]
pub(super) enum TuiEvent {
    /// Game logic update timing (based on the tick interval).
    Tick,
    /// Screen render timing (based on the frame interval).
    Render,
    /// Terminal events such as key input and resize.
    Crossterm(CrosstermEvent),
}
