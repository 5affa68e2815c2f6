//! Successor generation with static move ordering

use crate::board::{Board, Player};
use crate::eval::{Evaluator, Score};
use crate::tree::Role;
use crate::WIDTH;

/// A legal successor of a position, tagged with its static evaluation
#[derive(Clone, Debug)]
pub struct Candidate<B> {
    pub column: usize,
    pub state: B,
    pub eval: Score,
}

/// Successor states sorted so the searching side sees its favourite first
///
/// Candidates with equal evaluations keep ascending column order.
pub struct MoveSorter<B> {
    searcher: Role,
    moves: Vec<Candidate<B>>,
}

impl<B: Board> MoveSorter<B> {
    pub fn new(searcher: Role) -> Self {
        Self {
            searcher,
            moves: Vec::with_capacity(WIDTH),
        }
    }

    /// Generates every legal successor of `parent`, evaluated from `perspective`
    pub fn generate(parent: &B, searcher: Role, evaluator: &Evaluator, perspective: Player) -> Self {
        let mut moves = Self::new(searcher);
        for column in 0..WIDTH {
            if parent.can_drop(column) {
                let mut state = parent.clone();
                state.drop_piece(column);
                let eval = evaluator.evaluate(&state, perspective);
                moves.push(Candidate { column, state, eval });
            }
        }
        moves
    }

    pub fn push(&mut self, candidate: Candidate<B>) {
        // insert before the first move the searcher likes strictly less
        let searcher = self.searcher;
        let pos = self
            .moves
            .iter()
            .position(|m| searcher.prefers(candidate.eval, m.eval))
            .unwrap_or(self.moves.len());
        self.moves.insert(pos, candidate);
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

impl<B> IntoIterator for MoveSorter<B> {
    type Item = Candidate<B>;
    type IntoIter = std::vec::IntoIter<Candidate<B>>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.into_iter()
    }
}
