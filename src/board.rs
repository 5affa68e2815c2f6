//! The rules-engine contract the search is written against

use std::fmt;

#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum Player {
    One,
    Two,
}

impl Player {
    pub fn other(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Index into per-player tables
    pub fn index(self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::One => write!(f, "Player 1"),
            Player::Two => write!(f, "Player 2"),
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum GameState {
    Playing,
    Won(Player),
    Draw,
}

/// A snapshot of a game in progress
///
/// The search never mutates a state reachable from another node: every
/// branch clones its parent's state and then drops a piece into the copy.
/// Columns are zero-indexed and rows count upwards from the bottom.
pub trait Board: Clone {
    /// The player whose turn it is
    fn active_player(&self) -> Player;

    fn state(&self) -> GameState;

    fn is_game_over(&self) -> bool {
        self.state() != GameState::Playing
    }

    /// The winner of a finished game, `None` for a draw or a game in progress
    fn winner(&self) -> Option<Player> {
        match self.state() {
            GameState::Won(player) => Some(player),
            _ => None,
        }
    }

    /// The number of tiles on the board
    fn pieces_played(&self) -> usize;

    fn column_height(&self, column: usize) -> usize;

    /// The owner of a tile, `None` if it is empty
    fn cell(&self, column: usize, row: usize) -> Option<Player>;

    fn can_drop(&self, column: usize) -> bool;

    /// Drops a tile for the active player into `column`
    ///
    /// The caller guarantees `can_drop(column)` holds.
    fn drop_piece(&mut self, column: usize);
}
