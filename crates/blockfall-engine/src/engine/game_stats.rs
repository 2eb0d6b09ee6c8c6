/// Score awarded for clearing 1-4 rows in one lock.
const ROW_CLEAR_SCORES: [usize; 4] = [100, 300, 500, 800];

/// Level never rises past this.
const MAX_LEVEL: usize = 15;

/// Rows to clear per level step.
const ROWS_PER_LEVEL: usize = 10;

/// Level, score, line, and elapsed-time counters for one game.
///
/// All counters are monotonically non-decreasing until [`Self::reset`].
/// Inputs are internally generated counts, so nothing here validates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameStats {
    level: usize,
    score: usize,
    lines: usize,
    time_seconds: usize,
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            level: 1,
            score: 0,
            lines: 0,
            time_seconds: 0,
        }
    }

    /// Current level, between 1 and 15.
    #[must_use]
    pub const fn level(&self) -> usize {
        self.level
    }

    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    /// Total rows cleared.
    #[must_use]
    pub const fn lines(&self) -> usize {
        self.lines
    }

    /// Seconds the game has been running (excluding pauses).
    #[must_use]
    pub const fn time_seconds(&self) -> usize {
        self.time_seconds
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Applies a lock's row-clear count: lines, score table, level.
    ///
    /// A count of zero changes nothing.
    ///
    /// # Panics
    ///
    /// Panics if `cleared > 4`; a piece has only 4 blocks.
    pub fn apply_row_clears(&mut self, cleared: usize) {
        if cleared == 0 {
            return;
        }
        self.lines += cleared;
        self.score += ROW_CLEAR_SCORES[cleared - 1];
        self.level = usize::min(self.lines / ROWS_PER_LEVEL + 1, MAX_LEVEL);
    }

    /// One point per row descended while the soft-drop input is held.
    pub fn apply_soft_drop_row(&mut self) {
        self.score += 1;
    }

    pub fn tick_second(&mut self) {
        self.time_seconds += 1;
    }
}
