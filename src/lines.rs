//! The table of every line of `CONNECT` tiles on the board
//!
//! Lines are enumerated once at compile time from the board dimensions,
//! together with an index from each cell to the lines passing through it.

use static_assertions::*;

use crate::{CONNECT, HEIGHT, WIDTH};

const HORIZONTAL_LINES: usize = (WIDTH - CONNECT + 1) * HEIGHT;
const VERTICAL_LINES: usize = WIDTH * (HEIGHT - CONNECT + 1);
const DIAGONAL_LINES: usize = (WIDTH - CONNECT + 1) * (HEIGHT - CONNECT + 1);

/// The number of distinct lines on the board
pub const NUM_LINES: usize = HORIZONTAL_LINES + VERTICAL_LINES + 2 * DIAGONAL_LINES;

/// A cell lies on at most `CONNECT` lines in each of the four directions
pub const MAX_LINES_PER_CELL: usize = 4 * CONNECT;

// line ids are stored as bytes in the cell index
const_assert!(NUM_LINES <= 256);

/// The column every horizontal and diagonal line passes through
pub const CENTRE_COLUMN: usize = WIDTH / 2;

const_assert!(WIDTH - CONNECT <= CENTRE_COLUMN && CENTRE_COLUMN < CONNECT);

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Direction {
    Horizontal,
    Vertical,
    /// Falling from left to right
    DiagonalDown,
    /// Rising from left to right
    DiagonalUp,
}

impl Direction {
    const ALL: [Direction; 4] = [
        Direction::Horizontal,
        Direction::Vertical,
        Direction::DiagonalDown,
        Direction::DiagonalUp,
    ];

    // exclusive bounds of the starting (leftmost, or lowest for vertical) cell
    const fn starts(self) -> (usize, usize, usize) {
        match self {
            Direction::Horizontal => (WIDTH - CONNECT + 1, 0, HEIGHT),
            Direction::Vertical => (WIDTH, 0, HEIGHT - CONNECT + 1),
            Direction::DiagonalDown => (WIDTH - CONNECT + 1, CONNECT - 1, HEIGHT),
            Direction::DiagonalUp => (WIDTH - CONNECT + 1, 0, HEIGHT - CONNECT + 1),
        }
    }

    const fn step(self, column: usize, row: usize, n: usize) -> (usize, usize) {
        match self {
            Direction::Horizontal => (column + n, row),
            Direction::Vertical => (column, row + n),
            Direction::DiagonalDown => (column + n, row - n),
            Direction::DiagonalUp => (column + n, row + n),
        }
    }
}

/// The base weight of a line crossing the centre column at `row`
///
/// Rows 1 to 3 carry extra weight, decreasing upwards.
pub const fn row_band_weight(row: usize) -> u8 {
    match row {
        1 => 4,
        2 => 3,
        3 => 2,
        _ => 1,
    }
}

#[derive(Copy, Clone, Debug)]
pub struct Line {
    pub direction: Direction,
    /// (column, row) of each tile, left to right (bottom to top for vertical lines)
    pub cells: [(usize, usize); CONNECT],
    pub weight: u8,
}

impl Line {
    const PLACEHOLDER: Line = Line {
        direction: Direction::Horizontal,
        cells: [(0, 0); CONNECT],
        weight: 0,
    };

    const fn new(direction: Direction, column: usize, row: usize) -> Self {
        let mut cells = [(0, 0); CONNECT];
        let mut n = 0;
        while n < CONNECT {
            cells[n] = direction.step(column, row, n);
            n += 1;
        }
        let weight = match direction {
            Direction::Vertical => 1,
            _ => row_band_weight(cells[CENTRE_COLUMN - column].1),
        };
        Self {
            direction,
            cells,
            weight,
        }
    }

    /// The row where this line meets the centre column, if it does
    pub fn centre_row(&self) -> Option<usize> {
        self.cells
            .iter()
            .find(|&&(column, _)| column == CENTRE_COLUMN)
            .map(|&(_, row)| row)
    }
}

/// The ids of the lines passing through one cell
#[derive(Copy, Clone)]
struct CellLines {
    ids: [u8; MAX_LINES_PER_CELL],
    len: usize,
}

impl CellLines {
    const EMPTY: CellLines = CellLines {
        ids: [0; MAX_LINES_PER_CELL],
        len: 0,
    };
}

const fn generate_lines() -> [Line; NUM_LINES] {
    let mut lines = [Line::PLACEHOLDER; NUM_LINES];
    let mut id = 0;
    let mut d = 0;
    while d < Direction::ALL.len() {
        let direction = Direction::ALL[d];
        let (column_end, row_start, row_end) = direction.starts();
        let mut row = row_start;
        while row < row_end {
            let mut column = 0;
            while column < column_end {
                lines[id] = Line::new(direction, column, row);
                id += 1;
                column += 1;
            }
            row += 1;
        }
        d += 1;
    }
    lines
}

const fn index_cells(lines: &[Line; NUM_LINES]) -> [CellLines; WIDTH * HEIGHT] {
    let mut table = [CellLines::EMPTY; WIDTH * HEIGHT];
    let mut id = 0;
    while id < NUM_LINES {
        let mut n = 0;
        while n < CONNECT {
            let (column, row) = lines[id].cells[n];
            let cell = column + WIDTH * row;
            let len = table[cell].len;
            table[cell].ids[len] = id as u8;
            table[cell].len = len + 1;
            n += 1;
        }
        id += 1;
    }
    table
}

const LINE_TABLE: [Line; NUM_LINES] = generate_lines();

/// Every line on the board, indexed by line id
pub static LINES: [Line; NUM_LINES] = LINE_TABLE;

static CELL_LINES: [CellLines; WIDTH * HEIGHT] = index_cells(&LINE_TABLE);

/// The ids of the lines passing through a cell
pub fn lines_through(column: usize, row: usize) -> &'static [u8] {
    let cell = &CELL_LINES[column + WIDTH * row];
    &cell.ids[..cell.len]
}
