use serde::{Deserialize, Serialize};

/// Base points for line clears, before the level multiplier.
///
/// Index corresponds to number of lines cleared by one lock:
/// - 0 lines: 0 points
/// - 1 line: 100 points
/// - 2 lines: 300 points
/// - 3 lines: 500 points
/// - 4 lines: 800 points
const SCORE_TABLE: [usize; 5] = [0, 100, 300, 500, 800];

/// Lines needed for each level-up.
const LINES_PER_LEVEL: isize = 10;

/// Score, level and combo bookkeeping for one game.
///
/// # Scoring
///
/// Each lock that clears lines awards `SCORE_TABLE[lines] * (level + 1)`,
/// using the level before any level-up caused by that same lock.
///
/// # Leveling
///
/// `lines_to_next_level` starts at 10 and counts down by the lines cleared.
/// When it reaches zero or below, the level goes up by one and 10 more lines
/// are added to the countdown (at most one level per lock).
///
/// # Example
///
/// ```
/// use blockfall_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.complete_piece_drop(4);
///
/// assert_eq!(stats.score(), 800);
/// assert_eq!(stats.combo(), 1);
/// assert_eq!(stats.lines_to_next_level(), 6);
/// assert_eq!(stats.line_cleared_counter()[4], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStats {
    score: usize,
    level: usize,
    lines_to_next_level: isize,
    combo: usize,
    lines_last_step: usize,
    completed_pieces: usize,
    total_cleared_lines: usize,
    line_cleared_counter: [usize; 5],
}

/// What a single lock earned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LockAward {
    pub lines: usize,
    pub points: usize,
    pub leveled_up: bool,
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
            score: 0,
            level: 0,
            lines_to_next_level: LINES_PER_LEVEL,
            combo: 0,
            lines_last_step: 0,
            completed_pieces: 0,
            total_cleared_lines: 0,
            line_cleared_counter: [0; 5],
        }
    }

    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub const fn level(&self) -> usize {
        self.level
    }

    /// Lines remaining until the next level-up.
    #[must_use]
    pub const fn lines_to_next_level(&self) -> isize {
        self.lines_to_next_level
    }

    /// Number of consecutive locks that each cleared at least one line.
    #[must_use]
    pub const fn combo(&self) -> usize {
        self.combo
    }

    /// Lines cleared by the most recent lock.
    #[must_use]
    pub const fn lines_last_step(&self) -> usize {
        self.lines_last_step
    }

    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    #[must_use]
    pub const fn total_cleared_lines(&self) -> usize {
        self.total_cleared_lines
    }

    /// Returns a histogram of locks by lines cleared.
    ///
    /// Index `n` counts locks that cleared `n` lines; clears of more than four
    /// lines are counted at index 4.
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    /// Updates statistics after a piece locks and lines are cleared.
    #[expect(clippy::cast_possible_wrap)]
    pub fn complete_piece_drop(&mut self, cleared_lines: usize) -> LockAward {
        let bucket = cleared_lines.min(SCORE_TABLE.len() - 1);
        self.completed_pieces += 1;
        self.lines_last_step = cleared_lines;
        self.line_cleared_counter[bucket] += 1;

        if cleared_lines == 0 {
            self.combo = 0;
            return LockAward::default();
        }

        let points = SCORE_TABLE[bucket] * (self.level + 1);
        self.score += points;
        self.combo += 1;
        self.total_cleared_lines += cleared_lines;
        self.lines_to_next_level -= cleared_lines as isize;

        let leveled_up = self.lines_to_next_level <= 0;
        if leveled_up {
            self.level += 1;
            self.lines_to_next_level += LINES_PER_LEVEL;
        }
        LockAward {
            lines: cleared_lines,
            points,
            leveled_up,
        }
    }
}
