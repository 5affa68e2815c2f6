//! An array-backed rules engine for playing games against the search

use anyhow::{anyhow, Result};
use crossterm::{
    cursor::MoveTo,
    style::{style, Attribute, Color, PrintStyledContent},
    QueueableCommand,
};

use std::io::{stdout, Write};

use crate::board::{Board, GameState, Player};
use crate::{CONNECT, HEIGHT, WIDTH};

#[derive(Clone, Debug)]
pub struct ArrayBoard {
    cells: [Option<Player>; WIDTH * HEIGHT], // cells are stored left-to-right, bottom-to-top
    heights: [usize; WIDTH],
    active: Player,
    game: String,
    num_moves: usize,
    state: GameState,
}

impl ArrayBoard {
    pub fn new() -> Self {
        Self {
            cells: [None; WIDTH * HEIGHT],
            heights: [0; WIDTH],
            active: Player::One,
            game: String::new(),
            num_moves: 0,
            state: GameState::Playing,
        }
    }

    /// Builds a position from a string of 1-indexed column digits, player one moving first
    pub fn from_moves<S: AsRef<str>>(moves: S) -> Result<Self> {
        let mut board = Self::new();

        for column_char in moves.as_ref().chars() {
            match column_char.to_digit(10) {
                Some(column) => {
                    let _ = board.play_checked(column as usize)?;
                }
                _ => return Err(anyhow!("could not parse '{}' as a valid move", column_char)),
            }
        }
        Ok(board)
    }

    pub fn play_checked(&mut self, column_one_indexed: usize) -> Result<GameState> {
        if self.is_game_over() {
            return Err(anyhow!("Invalid move, the game is already over"));
        }
        if column_one_indexed < 1 || column_one_indexed > WIDTH {
            return Err(anyhow!(
                "Invalid move, column {} out of range. Columns must be between 1 and {}",
                column_one_indexed,
                WIDTH
            ));
        }
        let column = column_one_indexed - 1;
        if !self.can_drop(column) {
            return Err(anyhow!("Invalid move, column {} full", column_one_indexed));
        }

        self.drop_piece(column);
        Ok(self.state)
    }

    /// The moves played so far, as 1-indexed column digits
    pub fn moves(&self) -> &str {
        &self.game
    }

    pub fn display(&self) -> Result<()> {
        let mut stdout = stdout();

        let cols: String = (1..=WIDTH).map(|x| x.to_string()).collect();
        stdout.queue(PrintStyledContent(style(cols + "\n")))?;
        for _ in 0..HEIGHT {
            stdout.queue(PrintStyledContent(style("\n")))?;
        }
        stdout.flush()?;

        let (origin_x, origin_y) = crossterm::cursor::position()?;

        for (idx, cell) in self.cells.iter().enumerate() {
            let (pos_x, pos_y) = (
                origin_x + (idx % WIDTH) as u16,
                origin_y - (idx / WIDTH) as u16,
            );

            stdout
                .queue(MoveTo(pos_x, pos_y))?
                .queue(PrintStyledContent(
                    style("O")
                        .attribute(Attribute::Bold)
                        .on(Color::DarkBlue)
                        .with(match cell {
                            Some(Player::One) => Color::Red,
                            Some(Player::Two) => Color::Yellow,
                            None => Color::DarkBlue,
                        }),
                ))?;
        }
        stdout
            .queue(MoveTo(origin_x + WIDTH as u16, origin_y))?
            .queue(PrintStyledContent(style("\n")))?;
        stdout.flush()?;
        Ok(())
    }

    // checks whether the active player would complete a line by playing `column`
    fn check_winning_move(&self, column: usize) -> bool {
        let player = Some(self.active);
        let height = self.heights[column];

        // check vertical alignment
        if height >= CONNECT - 1
            && (1..CONNECT).all(|below| self.cells[column + WIDTH * (height - below)] == player)
        {
            return true;
        }

        // check horizontal and diagonal alignment
        for dy_dx in -1i32..=1 {
            let mut run = 0;
            for dx in [-1i32, 1].iter() {
                let mut x = column as i32 + dx;
                let mut y = height as i32 + dx * dy_dx;
                loop {
                    if x < 0
                        || x >= WIDTH as i32
                        || y < 0
                        || y >= HEIGHT as i32
                        || self.cells[x as usize + WIDTH * y as usize] != player
                    {
                        break;
                    }
                    x += dx;
                    y += dx * dy_dx;
                    run += 1;
                }
            }
            if run >= CONNECT - 1 {
                return true;
            }
        }

        false
    }
}

impl Default for ArrayBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl Board for ArrayBoard {
    fn active_player(&self) -> Player {
        self.active
    }

    fn state(&self) -> GameState {
        self.state
    }

    fn pieces_played(&self) -> usize {
        self.num_moves
    }

    fn column_height(&self, column: usize) -> usize {
        self.heights[column]
    }

    fn cell(&self, column: usize, row: usize) -> Option<Player> {
        self.cells[column + WIDTH * row]
    }

    fn can_drop(&self, column: usize) -> bool {
        column < WIDTH && self.heights[column] < HEIGHT && !self.is_game_over()
    }

    fn drop_piece(&mut self, column: usize) {
        let winning = self.check_winning_move(column);

        self.cells[column + WIDTH * self.heights[column]] = Some(self.active);
        self.heights[column] += 1;
        self.num_moves += 1;
        self.game.push_str(&(column + 1).to_string());

        self.state = if winning {
            GameState::Won(self.active)
        } else if self.num_moves == WIDTH * HEIGHT {
            GameState::Draw
        } else {
            GameState::Playing
        };
        self.active = self.active.other();
    }
}
