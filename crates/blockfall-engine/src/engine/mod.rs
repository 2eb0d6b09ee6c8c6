//! Game logic and state management.
//!
//! This module provides the high-level logic that orchestrates the core
//! data structures into a playable game:
//!
//! - [`Board`] - The board state machine (locked grid, falling piece, next piece)
//! - [`GameSession`] - Timer-driven session wrapping a board and its statistics
//! - [`GameStats`] - Level, score, line, and elapsed-time counters
//! - [`PieceSource`] - Injectable piece randomness ([`RandomPieceSource`],
//!   [`ScriptedPieceSource`])
//!
//! # Game flow
//!
//! 1. Build a [`Board`] with a piece source and wrap it in a [`GameSession`]
//! 2. Call [`GameSession::start_new_game`]
//! 3. Forward the five logical inputs via `key_down`/`key_up` and drive
//!    the timers with [`GameSession::advance`] from the host's loop
//! 4. Drain [`GameEvent`]s and redraw from the board/stats snapshots
//! 5. On [`GameEvent::GameOver`], offer a new game (which resets everything)
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use blockfall_engine::{Board, GameSession, InputAction, RandomPieceSource};
//!
//! let source = Box::new(RandomPieceSource::new());
//! let mut session = GameSession::new(Board::new(20, 10, source));
//! session.start_new_game();
//!
//! session.key_down(InputAction::Left, false);
//! session.key_up(InputAction::Left);
//! session.advance(Duration::from_millis(800));
//!
//! let _events: Vec<_> = session.drain_events().collect();
//! ```

pub use self::{board::*, game_session::*, game_stats::*, piece_source::*};

mod board;
mod game_session;
mod game_stats;
mod piece_source;
