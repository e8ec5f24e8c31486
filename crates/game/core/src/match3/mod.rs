//! Match-3 mini-game resolution.
//!
//! A [`Match3Session`] is created per mission attempt and discarded when it
//! completes. Timing is external: the caller waits out the settle delay before
//! calling [`Match3Session::resolve_swap`] and the completion delay before
//! calling [`Match3Session::finish`]. Cancelling those waits is all it takes
//! to abandon a session.

mod board;

pub use board::{Board, Cell, Gem};

use crate::config::Match3Config;
use crate::env::PcgStream;
use crate::error::{ErrorSeverity, GameError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Match3Phase {
    /// Board populated, not yet shown to the player.
    Init,
    Ready,
    Selected(Cell),
    /// A tentative swap is waiting out the settle delay.
    Resolving,
    /// Terminal condition reached; waiting out the completion delay.
    Finishing,
    Complete,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Match3Error {
    #[error("operation requires phase {expected}, session is in {actual}")]
    InvalidPhase {
        expected: &'static str,
        actual: Match3Phase,
    },

    #[error("board rows must be non-empty and of equal length")]
    MalformedBoard,
}

impl GameError for Match3Error {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InvalidPhase { .. } => ErrorSeverity::Recoverable,
            Self::MalformedBoard => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidPhase { .. } => "MATCH3_INVALID_PHASE",
            Self::MalformedBoard => "MATCH3_MALFORMED_BOARD",
        }
    }
}

/// Result of a tap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TapOutcome {
    /// Tap arrived while the board was not interactive, or outside it.
    Ignored,
    Selected(Cell),
    Deselected,
    /// Gems exchanged tentatively; resolve after the settle delay.
    SwapStarted { from: Cell, to: Cell },
}

/// Result of resolving a tentative swap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// No run formed; the board is back to its pre-swap state, no move charged.
    Reverted,
    Matched {
        cleared: usize,
        points: u64,
        moves_left: u32,
        /// True when the session is now finishing.
        finished: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MissionResult {
    pub success: bool,
    pub score: u64,
}

#[derive(Clone, Debug)]
pub struct Match3Session {
    board: Board,
    phase: Match3Phase,
    pending: Option<(Cell, Cell)>,
    score: u64,
    moves_left: u32,
    target_score: u64,
    score_per_cell: u64,
    rng: PcgStream,
}

impl Match3Session {
    /// Creates a session with a freshly randomized board.
    pub fn new(config: &Match3Config, moves: u32, target_score: u64, seed: u64) -> Self {
        let mut rng = PcgStream::new(seed);
        let board = Board::random(config.rows, config.cols, &mut rng);
        Self::with_board(config, board, moves, target_score, rng)
    }

    /// Creates a session over a given board; `rng` feeds refills.
    pub fn with_board(
        config: &Match3Config,
        board: Board,
        moves: u32,
        target_score: u64,
        rng: PcgStream,
    ) -> Self {
        Self {
            board,
            phase: Match3Phase::Init,
            pending: None,
            score: 0,
            moves_left: moves,
            target_score,
            score_per_cell: config.score_per_cell,
            rng,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn phase(&self) -> Match3Phase {
        self.phase
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn moves_left(&self) -> u32 {
        self.moves_left
    }

    pub fn target_score(&self) -> u64 {
        self.target_score
    }

    pub fn selected(&self) -> Option<Cell> {
        match self.phase {
            Match3Phase::Selected(cell) => Some(cell),
            _ => None,
        }
    }

    fn is_terminal(&self) -> bool {
        self.moves_left == 0 || self.score >= self.target_score
    }

    fn invalid_phase(&self, expected: &'static str) -> Match3Error {
        Match3Error::InvalidPhase {
            expected,
            actual: self.phase,
        }
    }

    /// Opens the board for input. Goes straight to `Finishing` when there is
    /// nothing left to play.
    pub fn begin(&mut self) -> Result<Match3Phase, Match3Error> {
        if self.phase != Match3Phase::Init {
            return Err(self.invalid_phase("init"));
        }
        self.phase = if self.is_terminal() {
            Match3Phase::Finishing
        } else {
            Match3Phase::Ready
        };
        Ok(self.phase)
    }

    pub fn tap(&mut self, cell: Cell) -> TapOutcome {
        if !self.board.contains(cell) {
            return TapOutcome::Ignored;
        }

        match self.phase {
            Match3Phase::Ready => {
                self.phase = Match3Phase::Selected(cell);
                TapOutcome::Selected(cell)
            }
            Match3Phase::Selected(selected) if selected == cell => {
                self.phase = Match3Phase::Ready;
                TapOutcome::Deselected
            }
            Match3Phase::Selected(selected) if selected.is_adjacent(&cell) => {
                self.board.swap(selected, cell);
                self.pending = Some((selected, cell));
                self.phase = Match3Phase::Resolving;
                TapOutcome::SwapStarted {
                    from: selected,
                    to: cell,
                }
            }
            Match3Phase::Selected(_) => {
                self.phase = Match3Phase::Selected(cell);
                TapOutcome::Selected(cell)
            }
            Match3Phase::Init
            | Match3Phase::Resolving
            | Match3Phase::Finishing
            | Match3Phase::Complete => TapOutcome::Ignored,
        }
    }

    /// Checks the board after the settle delay.
    ///
    /// Without a run the swap is undone and no move is spent. With runs, one
    /// move is spent regardless of how many cells matched, every matched cell
    /// scores, and the board collapses and refills once.
    pub fn resolve_swap(&mut self) -> Result<Resolution, Match3Error> {
        let Some((from, to)) = self.pending.filter(|_| self.phase == Match3Phase::Resolving) else {
            return Err(self.invalid_phase("resolving"));
        };
        self.pending = None;

        let matches = self.board.find_matches();
        if matches.is_empty() {
            self.board.swap(from, to);
            self.phase = Match3Phase::Ready;
            return Ok(Resolution::Reverted);
        }

        let points = matches.len() as u64 * self.score_per_cell;
        self.moves_left = self.moves_left.saturating_sub(1);
        self.score = self.score.saturating_add(points);
        self.board.collapse(&matches, &mut self.rng);

        let finished = self.is_terminal();
        self.phase = if finished {
            Match3Phase::Finishing
        } else {
            Match3Phase::Ready
        };

        Ok(Resolution::Matched {
            cleared: matches.len(),
            points,
            moves_left: self.moves_left,
            finished,
        })
    }

    /// Completes the session after the completion delay.
    pub fn finish(&mut self) -> Result<MissionResult, Match3Error> {
        if self.phase != Match3Phase::Finishing {
            return Err(self.invalid_phase("finishing"));
        }
        self.phase = Match3Phase::Complete;
        Ok(MissionResult {
            success: self.score >= self.target_score,
            score: self.score,
        })
    }
}
