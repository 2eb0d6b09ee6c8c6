use std::{collections::VecDeque, time::Duration};

use super::{
    board::{Board, BoardEvent},
    game_stats::GameStats,
};

/// Gravity interval per level, in milliseconds. Roughly an 18% speed
/// increase per level.
const GRAVITY_INTERVALS_MS: [u64; 15] = [
    800, 656, 538, 441, 362, 297, 243, 199, 164, 134, 110, 90, 74, 61, 50,
];

/// Descent interval while the soft-drop input is held.
const SOFT_DROP_INTERVAL: Duration = Duration::from_millis(50);

/// Repeat interval for held left/right input.
const MOVE_REPEAT_INTERVAL: Duration = Duration::from_millis(100);

/// Repeat interval for held rotate input.
const ROTATE_REPEAT_INTERVAL: Duration = Duration::from_millis(250);

/// Interval of the elapsed-time counter.
const CLOCK_INTERVAL: Duration = Duration::from_secs(1);

fn gravity_interval(level: usize) -> Duration {
    let index = usize::min(level.saturating_sub(1), GRAVITY_INTERVALS_MS.len() - 1);
    Duration::from_millis(GRAVITY_INTERVALS_MS[index])
}

/// The five logical inputs the session understands. Mapping physical
/// keys to actions is the host's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    Left,
    Right,
    Rotate,
    SoftDrop,
    Pause,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionState {
    /// No game started yet.
    NotStarted,
    Running,
    Paused,
    /// Terminal until [`GameSession::start_new_game`].
    GameOver,
}

/// Notification for the presentation layer, drained via
/// [`GameSession::drain_events`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// The locked grid or the falling piece changed.
    BoardChanged,
    /// A new next piece was generated.
    NextPieceChanged,
    /// Level, score, lines, or time changed.
    StatsChanged,
    /// The game ended; carries the final score.
    GameOver { score: usize },
}

/// Periodic trigger driven by [`GameSession::advance`]. Accumulates
/// elapsed time and fires once per full interval.
#[derive(Debug, Clone)]
struct IntervalTimer {
    interval: Duration,
    elapsed: Duration,
    running: bool,
}

impl IntervalTimer {
    fn new(interval: Duration) -> Self {
        Self {
            interval,
            elapsed: Duration::ZERO,
            running: false,
        }
    }

    fn start(&mut self) {
        self.running = true;
        self.elapsed = Duration::ZERO;
    }

    fn stop(&mut self) {
        self.running = false;
        self.elapsed = Duration::ZERO;
    }

    /// Changes the interval and restarts the countdown; the running
    /// state is kept.
    fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
        self.elapsed = Duration::ZERO;
    }

    /// Advances the timer, returning how many times it fired.
    fn advance(&mut self, dt: Duration) -> u32 {
        if !self.running {
            return 0;
        }
        self.elapsed += dt;
        let mut fires = 0;
        while self.elapsed >= self.interval {
            self.elapsed -= self.interval;
            fires += 1;
        }
        fires
    }
}

/// Orchestrates one game: the board, its statistics, and the timers for
/// gravity, input repeat, and elapsed time.
///
/// The host forwards `key_down`/`key_up` for the five logical actions
/// and calls [`Self::advance`] from its loop. Within one call all
/// validation happens before any mutation is committed, and observers
/// read state only between calls, so every step is atomic from their
/// point of view. No timer fires while paused or after game over.
#[derive(Debug)]
pub struct GameSession {
    board: Board,
    stats: GameStats,
    state: SessionState,
    fall_timer: IntervalTimer,
    move_timer: IntervalTimer,
    rotate_timer: IntervalTimer,
    clock_timer: IntervalTimer,
    left_held: bool,
    right_held: bool,
    left_has_priority: bool,
    soft_dropping: bool,
    events: VecDeque<GameEvent>,
}

impl GameSession {
    #[must_use]
    pub fn new(board: Board) -> Self {
        let mut session = Self {
            board,
            stats: GameStats::new(),
            state: SessionState::NotStarted,
            fall_timer: IntervalTimer::new(gravity_interval(1)),
            move_timer: IntervalTimer::new(MOVE_REPEAT_INTERVAL),
            rotate_timer: IntervalTimer::new(ROTATE_REPEAT_INTERVAL),
            clock_timer: IntervalTimer::new(CLOCK_INTERVAL),
            left_held: false,
            right_held: false,
            left_has_priority: false,
            soft_dropping: false,
            events: VecDeque::new(),
        };
        session.pump_board_events();
        session
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Drains pending notifications, oldest first.
    pub fn drain_events(&mut self) -> impl Iterator<Item = GameEvent> + '_ {
        self.events.drain(..)
    }

    fn pump_board_events(&mut self) {
        while let Some(event) = self.board.pop_event() {
            self.events.push_back(match event {
                BoardEvent::Changed => GameEvent::BoardChanged,
                BoardEvent::NextPieceChanged => GameEvent::NextPieceChanged,
            });
        }
    }

    /// Resets the board and statistics and starts the timers. Also the
    /// way out of the game-over state.
    pub fn start_new_game(&mut self) {
        self.board.reset();
        self.stats.reset();
        self.state = SessionState::Running;
        self.left_held = false;
        self.right_held = false;
        self.left_has_priority = false;
        self.soft_dropping = false;
        self.move_timer.stop();
        self.rotate_timer.stop();
        self.fall_timer.set_interval(gravity_interval(self.stats.level()));
        self.fall_timer.start();
        self.clock_timer.start();
        self.pump_board_events();
        self.events.push_back(GameEvent::StatsChanged);
    }

    /// Stops every timer and releases held inputs.
    pub fn pause(&mut self) {
        if !self.state.is_running() {
            return;
        }
        self.state = SessionState::Paused;
        self.left_held = false;
        self.right_held = false;
        self.soft_dropping = false;
        self.move_timer.stop();
        self.rotate_timer.stop();
        self.fall_timer.stop();
        self.clock_timer.stop();
    }

    pub fn resume(&mut self) {
        if !self.state.is_paused() {
            return;
        }
        self.state = SessionState::Running;
        self.fall_timer.set_interval(gravity_interval(self.stats.level()));
        self.fall_timer.start();
        self.clock_timer.start();
    }

    pub fn toggle_pause(&mut self) {
        match self.state {
            SessionState::Running => self.pause(),
            SessionState::Paused => self.resume(),
            SessionState::NotStarted | SessionState::GameOver => {}
        }
    }

    /// Handles a key-down for one of the five actions.
    ///
    /// Host auto-repeat (`is_repeat`) is ignored: the session runs its
    /// own repeat timers. Left and right each claim the repeat timer on
    /// press, so with both held the most recent press wins.
    pub fn key_down(&mut self, action: InputAction, is_repeat: bool) {
        if is_repeat {
            return;
        }
        match action {
            InputAction::Pause => {
                self.toggle_pause();
                return;
            }
            _ if !self.state.is_running() => return,
            InputAction::Left => {
                self.left_held = true;
                self.left_has_priority = true;
                self.board.try_move_left();
                self.move_timer.start();
            }
            InputAction::Right => {
                self.right_held = true;
                self.left_has_priority = false;
                self.board.try_move_right();
                self.move_timer.start();
            }
            InputAction::Rotate => {
                self.board.try_rotate();
                self.rotate_timer.start();
            }
            InputAction::SoftDrop => {
                self.soft_dropping = true;
                self.descend();
                self.fall_timer.set_interval(SOFT_DROP_INTERVAL);
            }
        }
        self.pump_board_events();
    }

    /// Handles a key-up for one of the five actions: stops the matching
    /// repeat timer, or restores the gravity interval for soft drop.
    pub fn key_up(&mut self, action: InputAction) {
        if !self.state.is_running() {
            return;
        }
        match action {
            InputAction::Left => {
                self.left_held = false;
                self.left_has_priority = false;
                if !self.right_held {
                    self.move_timer.stop();
                }
            }
            InputAction::Right => {
                self.right_held = false;
                self.left_has_priority = true;
                if !self.left_held {
                    self.move_timer.stop();
                }
            }
            InputAction::Rotate => self.rotate_timer.stop(),
            InputAction::SoftDrop => {
                self.soft_dropping = false;
                self.fall_timer.set_interval(gravity_interval(self.stats.level()));
            }
            InputAction::Pause => {}
        }
    }

    /// Advances all running timers by `dt` and performs the moves they
    /// trigger. Does nothing unless the session is running.
    pub fn advance(&mut self, dt: Duration) {
        if !self.state.is_running() {
            return;
        }

        for _ in 0..self.clock_timer.advance(dt) {
            self.stats.tick_second();
            self.events.push_back(GameEvent::StatsChanged);
        }
        for _ in 0..self.move_timer.advance(dt) {
            if self.left_has_priority {
                self.board.try_move_left();
            } else {
                self.board.try_move_right();
            }
        }
        for _ in 0..self.rotate_timer.advance(dt) {
            self.board.try_rotate();
        }
        for _ in 0..self.fall_timer.advance(dt) {
            // A descent can end the game; later fires must not run.
            if !self.state.is_running() {
                break;
            }
            self.descend();
        }
        self.pump_board_events();
    }

    /// One gravity step: move the piece down, or lock it and resolve
    /// the consequences when it cannot descend further.
    fn descend(&mut self) {
        if self.board.try_move_down() {
            self.pump_board_events();
            if self.soft_dropping {
                self.stats.apply_soft_drop_row();
                self.events.push_back(GameEvent::StatsChanged);
            }
            return;
        }

        let cleared = self.board.lock_piece_and_clear_rows();
        self.pump_board_events();
        if cleared > 0 {
            let level_before = self.stats.level();
            self.stats.apply_row_clears(cleared);
            self.events.push_back(GameEvent::StatsChanged);
            if self.stats.level() > level_before && !self.soft_dropping {
                self.fall_timer.set_interval(gravity_interval(self.stats.level()));
            }
        }

        if self.board.next_piece_collides_with_locked() {
            self.state = SessionState::GameOver;
            self.move_timer.stop();
            self.rotate_timer.stop();
            self.fall_timer.stop();
            self.clock_timer.stop();
            self.events.push_back(GameEvent::GameOver {
                score: self.stats.score(),
            });
            return;
        }

        self.board.advance_to_next_piece();
        self.pump_board_events();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::{grid::Cell, piece::PieceKind},
        engine::piece_source::ScriptedPieceSource,
    };

    fn session_with(script: &[PieceKind]) -> GameSession {
        GameSession::new(Board::new(
            20,
            10,
            Box::new(ScriptedPieceSource::new(script.to_vec())),
        ))
    }

    fn started_session(script: &[PieceKind]) -> GameSession {
        let mut session = session_with(script);
        session.start_new_game();
        let _ = session.drain_events().count();
        session
    }

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn current_row(session: &GameSession) -> i16 {
        session.board().current_piece().row()
    }

    fn current_col(session: &GameSession) -> i16 {
        session.board().current_piece().col()
    }

    #[test]
    fn test_nothing_happens_before_start() {
        let mut session = session_with(&[PieceKind::O]);
        assert!(session.state().is_not_started());
        let row = current_row(&session);
        session.advance(Duration::from_secs(10));
        assert_eq!(current_row(&session), row);
    }

    #[test]
    fn test_gravity_descends_once_per_interval() {
        let mut session = started_session(&[PieceKind::O]);
        let row = current_row(&session);
        session.advance(ms(799));
        assert_eq!(current_row(&session), row);
        session.advance(ms(1));
        assert_eq!(current_row(&session), row + 1);
        // Residual time carries over between calls.
        session.advance(ms(400));
        session.advance(ms(400));
        assert_eq!(current_row(&session), row + 2);
    }

    #[test]
    fn test_soft_drop_descends_fast_and_scores() {
        let mut session = started_session(&[PieceKind::O]);
        let row = current_row(&session);
        session.key_down(InputAction::SoftDrop, false);
        assert_eq!(current_row(&session), row + 1);
        assert_eq!(session.stats().score(), 1);

        session.advance(ms(50));
        session.advance(ms(50));
        assert_eq!(current_row(&session), row + 3);
        assert_eq!(session.stats().score(), 3);

        // Releasing restores the level-1 gravity interval.
        session.key_up(InputAction::SoftDrop);
        session.advance(ms(50));
        assert_eq!(current_row(&session), row + 3);
        session.advance(ms(750));
        assert_eq!(current_row(&session), row + 4);
        assert_eq!(session.stats().score(), 3);
    }

    #[test]
    fn test_horizontal_repeat_while_held() {
        let mut session = started_session(&[PieceKind::O]);
        let col = current_col(&session);
        session.key_down(InputAction::Left, false);
        assert_eq!(current_col(&session), col - 1);
        session.advance(ms(100));
        assert_eq!(current_col(&session), col - 2);
        session.advance(ms(50));
        session.advance(ms(50));
        assert_eq!(current_col(&session), col - 3);

        session.key_up(InputAction::Left);
        session.advance(ms(300));
        assert_eq!(current_col(&session), col - 3);
    }

    #[test]
    fn test_most_recent_direction_has_priority() {
        let mut session = started_session(&[PieceKind::O]);
        let col = current_col(&session);
        session.key_down(InputAction::Left, false);
        session.key_down(InputAction::Right, false);
        assert_eq!(current_col(&session), col);
        // Right was pressed last, so the repeat timer moves right.
        session.advance(ms(100));
        assert_eq!(current_col(&session), col + 1);
        // Releasing right hands the repeat back to the held left key.
        session.key_up(InputAction::Right);
        session.advance(ms(100));
        assert_eq!(current_col(&session), col);
    }

    #[test]
    fn test_host_auto_repeat_is_ignored() {
        let mut session = started_session(&[PieceKind::O]);
        let col = current_col(&session);
        session.key_down(InputAction::Left, true);
        assert_eq!(current_col(&session), col);
    }

    #[test]
    fn test_rotate_repeats_while_held() {
        let mut session = started_session(&[PieceKind::T]);
        session.key_down(InputAction::Rotate, false);
        assert_eq!(session.board().current_piece().rotation().index(), 1);
        session.advance(ms(250));
        assert_eq!(session.board().current_piece().rotation().index(), 2);
        session.key_up(InputAction::Rotate);
        session.advance(ms(500));
        assert_eq!(session.board().current_piece().rotation().index(), 2);
    }

    #[test]
    fn test_pause_stops_timers_and_releases_keys() {
        let mut session = started_session(&[PieceKind::O]);
        let row = current_row(&session);
        session.key_down(InputAction::Left, false);
        let col = current_col(&session);

        session.key_down(InputAction::Pause, false);
        assert!(session.state().is_paused());
        session.advance(Duration::from_secs(5));
        assert_eq!(current_row(&session), row);
        assert_eq!(session.stats().time_seconds(), 0);

        // Resume: gravity runs again, but the old left-hold is gone.
        session.key_down(InputAction::Pause, false);
        assert!(session.state().is_running());
        session.advance(ms(800));
        assert_eq!(current_row(&session), row + 1);
        assert_eq!(current_col(&session), col);
    }

    #[test]
    fn test_clock_counts_running_seconds() {
        let mut session = started_session(&[PieceKind::O]);
        session.advance(Duration::from_secs(3));
        assert_eq!(session.stats().time_seconds(), 3);
        let events: Vec<_> = session.drain_events().collect();
        assert_eq!(
            events
                .iter()
                .filter(|event| **event == GameEvent::StatsChanged)
                .count(),
            3,
        );
    }

    #[test]
    fn test_locking_applies_row_clears_to_stats() {
        let mut session = started_session(&[PieceKind::O]);
        for col in 0..10 {
            if col != 4 && col != 5 {
                session
                    .board
                    .locked_grid_mut()
                    .set(19, col, Cell::Locked(PieceKind::J));
            }
        }
        // Drive the O to the floor and through the lock.
        for _ in 0..21 {
            session.advance(ms(800));
        }
        assert_eq!(session.stats().lines(), 1);
        assert_eq!(session.stats().score(), 100);
        assert!(session.state().is_running());
        // The next piece is falling now.
        assert_eq!(session.board().current_piece().kind(), PieceKind::O);
    }

    #[test]
    fn test_game_over_when_next_spawn_is_blocked() {
        let mut session = started_session(&[PieceKind::O]);
        // Wall under the spawn area, one gap per row so nothing clears.
        for row in 1..20 {
            for col in 1..10 {
                session
                    .board
                    .locked_grid_mut()
                    .set(row, col, Cell::Locked(PieceKind::J));
            }
        }
        session.advance(ms(800));

        assert!(session.state().is_game_over());
        let events: Vec<_> = session.drain_events().collect();
        assert!(events.contains(&GameEvent::GameOver { score: 0 }));

        // Terminal: timers are dead and input is ignored.
        let col = current_col(&session);
        session.key_down(InputAction::Left, false);
        session.advance(Duration::from_secs(5));
        assert_eq!(current_col(&session), col);
        assert_eq!(session.stats().time_seconds(), 0);
    }

    #[test]
    fn test_new_game_resets_after_game_over() {
        let mut session = started_session(&[PieceKind::O]);
        for row in 1..20 {
            for col in 1..10 {
                session
                    .board
                    .locked_grid_mut()
                    .set(row, col, Cell::Locked(PieceKind::J));
            }
        }
        session.advance(ms(800));
        assert!(session.state().is_game_over());

        session.start_new_game();
        assert!(session.state().is_running());
        assert_eq!(session.stats().score(), 0);
        assert!(
            (0..20).all(|row| {
                session
                    .board()
                    .locked_grid()
                    .row_cells(row)
                    .iter()
                    .all(|cell| cell.is_empty())
            })
        );
    }

    #[test]
    fn test_gravity_interval_table() {
        assert_eq!(gravity_interval(1), ms(800));
        assert_eq!(gravity_interval(2), ms(656));
        assert_eq!(gravity_interval(15), ms(50));
        // Out-of-table levels clamp to the fastest interval.
        assert_eq!(gravity_interval(99), ms(50));
    }

    #[test]
    fn test_interval_timer_accumulates_and_fires() {
        let mut timer = IntervalTimer::new(ms(100));
        assert_eq!(timer.advance(ms(500)), 0); // not started
        timer.start();
        assert_eq!(timer.advance(ms(99)), 0);
        assert_eq!(timer.advance(ms(1)), 1);
        assert_eq!(timer.advance(ms(250)), 2);
        timer.stop();
        assert_eq!(timer.advance(ms(1000)), 0);
    }

    #[test]
    fn test_interval_timer_set_interval_restarts_countdown() {
        let mut timer = IntervalTimer::new(ms(100));
        timer.start();
        assert_eq!(timer.advance(ms(90)), 0);
        timer.set_interval(ms(50));
        assert_eq!(timer.advance(ms(40)), 0);
        assert_eq!(timer.advance(ms(10)), 1);
    }
}
