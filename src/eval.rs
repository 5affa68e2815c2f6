//! Static evaluation of board states

use static_assertions::*;

use crate::board::{Board, GameState, Player};
use crate::lines::{lines_through, Direction, LINES, NUM_LINES};
use crate::{HEIGHT, WIDTH};

pub type Score = i32;

/// Bound used as the open end of a search window
pub const INFINITY: Score = Score::MAX;

/// The score of a win on an empty board, reduced by one for each tile played
pub const WIN_SCORE: Score = INFINITY - 1;

// the largest blocked-line total either side can reach, with every multiplier maxed out
const MAX_HEURISTIC: i64 = NUM_LINES as i64 * 4 * u16::MAX as i64;

// terminal scores must dominate every heuristic score, however many tiles are played
const_assert!(MAX_HEURISTIC < WIN_SCORE as i64 - (WIDTH * HEIGHT) as i64);

/// Whether a score is a win sentinel rather than a heuristic estimate
pub fn is_win(score: Score) -> bool {
    score > WIN_SCORE - (WIDTH * HEIGHT) as Score - 1
}

/// Whether a score is a loss sentinel rather than a heuristic estimate
pub fn is_loss(score: Score) -> bool {
    score < -WIN_SCORE + (WIDTH * HEIGHT) as Score + 1
}

/// Per-direction multipliers applied to each line's base weight
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct EvalWeights {
    pub horizontal: u16,
    pub vertical: u16,
    pub diagonal: u16,
}

impl EvalWeights {
    pub fn multiplier(&self, direction: Direction) -> Score {
        Score::from(match direction {
            Direction::Horizontal => self.horizontal,
            Direction::Vertical => self.vertical,
            Direction::DiagonalDown | Direction::DiagonalUp => self.diagonal,
        })
    }
}

impl Default for EvalWeights {
    fn default() -> Self {
        Self {
            horizontal: 1,
            vertical: 1,
            diagonal: 1,
        }
    }
}

/// Weighted count of each player's lines that the other player has blocked
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct BlockedLines([Score; 2]);

impl BlockedLines {
    /// The weight of `player`'s lines containing at least one opposing tile
    pub fn against(&self, player: Player) -> Score {
        self.0[player.index()]
    }
}

#[derive(Copy, Clone, Debug, Default)]
pub struct Evaluator {
    weights: EvalWeights,
}

impl Evaluator {
    pub fn new(weights: EvalWeights) -> Self {
        Self { weights }
    }

    /// The weight of a single line under this evaluator's multipliers
    pub fn line_weight(&self, id: usize) -> Score {
        let line = &LINES[id];
        Score::from(line.weight) * self.weights.multiplier(line.direction)
    }

    /// The sum of every line's weight, an upper bound on either side's blocked total
    pub fn total_weight(&self) -> Score {
        (0..NUM_LINES).map(|id| self.line_weight(id)).sum()
    }

    /// Scores a state from `perspective`'s point of view
    ///
    /// Finished games score a win or loss sentinel (faster wins and slower
    /// losses preferred) or 0 for a draw. Otherwise the score is the weight of
    /// the opponent's blocked lines minus the weight of our own.
    pub fn evaluate<B: Board>(&self, board: &B, perspective: Player) -> Score {
        let pieces = board.pieces_played() as Score;
        match board.state() {
            GameState::Draw => 0,
            GameState::Won(winner) if winner == perspective => WIN_SCORE - pieces,
            GameState::Won(_) => -WIN_SCORE + pieces,
            GameState::Playing => {
                let blocked = self.blocked_lines(board);
                blocked.against(perspective.other()) - blocked.against(perspective)
            }
        }
    }

    /// Credits every line touched by a tile to the opposing player's blocked total
    ///
    /// A line is credited at most once per player, however many tiles lie on it.
    pub fn blocked_lines<B: Board>(&self, board: &B) -> BlockedLines {
        let mut credited = [[false; NUM_LINES]; 2];
        let mut blocked = BlockedLines::default();

        for column in 0..WIDTH {
            for row in 0..board.column_height(column) {
                let owner = match board.cell(column, row) {
                    Some(owner) => owner,
                    None => continue,
                };
                let victim = owner.other().index();
                for &id in lines_through(column, row) {
                    let id = id as usize;
                    if !credited[victim][id] {
                        credited[victim][id] = true;
                        blocked.0[victim] += self.line_weight(id);
                    }
                }
            }
        }
        blocked
    }
}
