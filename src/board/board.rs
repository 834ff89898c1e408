//! Board value type with bitmask cell storage
//!
//! The board is an immutable value: every move produces a new `Board`.
//! This keeps tree search trivially safe (searchers never mutate shared
//! state) and makes the board itself usable as a transposition-table key.

use serde::{Serialize, Serializer};

use super::{GameResult, Mark, Move, BOARD_SIZE, TOTAL_CELLS};
use crate::error::EngineError;

/// The eight winning lines as cell bitmasks (bit i = cell index i).
const WIN_LINES: [u16; 8] = [
    0b000_000_111, // top row
    0b000_111_000, // middle row
    0b111_000_000, // bottom row
    0b001_001_001, // left column
    0b010_010_010, // center column
    0b100_100_100, // right column
    0b100_010_001, // main diagonal
    0b001_010_100, // anti-diagonal
];

/// Mask covering all nine cells.
const FULL: u16 = 0b111_111_111;

/// Game board: one occupancy mask per player.
///
/// X moves first, so the side to move is derived from the stone counts
/// rather than stored. The invariant `x_count == o_count` or
/// `x_count == o_count + 1` holds for every reachable board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    x: u16,
    o: u16,
}

impl Board {
    /// Create an empty board (X to move).
    #[must_use]
    pub fn new() -> Self {
        Self { x: 0, o: 0 }
    }

    /// Rebuild a board from raw occupancy masks. Used by the symmetry
    /// module, which permutes masks of already-valid boards.
    #[inline]
    pub(crate) fn from_masks(x: u16, o: u16) -> Self {
        debug_assert_eq!(x & o, 0);
        Self { x, o }
    }

    /// Raw occupancy masks `(x, o)`.
    #[inline]
    pub(crate) fn masks(&self) -> (u16, u16) {
        (self.x, self.o)
    }

    /// Build a board from explicit cell contents, validating the turn
    /// invariant.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidBoard`] if the mark counts cannot
    /// arise from legal play or both players have a completed line.
    pub fn from_cells(cells: [Mark; TOTAL_CELLS]) -> Result<Self, EngineError> {
        let mut board = Self { x: 0, o: 0 };
        for (idx, mark) in cells.iter().enumerate() {
            match mark {
                Mark::X => board.x |= 1 << idx,
                Mark::O => board.o |= 1 << idx,
                Mark::Empty => {}
            }
        }

        let xc = board.x.count_ones();
        let oc = board.o.count_ones();
        if xc != oc && xc != oc + 1 {
            return Err(EngineError::InvalidBoard(format!(
                "impossible mark counts: {xc} X vs {oc} O"
            )));
        }
        let x_won = WIN_LINES.iter().any(|&line| board.x & line == line);
        let o_won = WIN_LINES.iter().any(|&line| board.o & line == line);
        if x_won && o_won {
            return Err(EngineError::InvalidBoard(
                "both players have a completed line".into(),
            ));
        }
        Ok(board)
    }

    /// Get the mark at a cell.
    #[inline]
    #[must_use]
    pub fn get(&self, mov: Move) -> Mark {
        let bit = 1u16 << mov.to_index();
        if self.x & bit != 0 {
            Mark::X
        } else if self.o & bit != 0 {
            Mark::O
        } else {
            Mark::Empty
        }
    }

    /// Check if a cell is empty.
    #[inline]
    #[must_use]
    pub fn is_empty_cell(&self, mov: Move) -> bool {
        (self.x | self.o) & (1 << mov.to_index()) == 0
    }

    /// The mark whose turn it is. X moves first.
    #[inline]
    #[must_use]
    pub fn to_move(&self) -> Mark {
        if self.x.count_ones() == self.o.count_ones() {
            Mark::X
        } else {
            Mark::O
        }
    }

    /// Total marks on the board.
    #[inline]
    #[must_use]
    pub fn mark_count(&self) -> u32 {
        (self.x | self.o).count_ones()
    }

    /// All legal moves in row-major order, or empty if the game is over.
    ///
    /// The scan order is fixed and doubles as the tie-break order for the
    /// deterministic search algorithms: the first move with the best score
    /// wins.
    #[must_use]
    pub fn legal_moves(&self) -> Vec<Move> {
        if self.result().is_terminal() {
            return Vec::new();
        }
        let occupied = self.x | self.o;
        (0..TOTAL_CELLS)
            .filter(|idx| occupied & (1 << idx) == 0)
            .map(Move::from_index)
            .collect()
    }

    /// Apply a move for the side to move, returning the resulting board.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::IllegalMove`] if the target cell is occupied
    /// or the game is already over.
    pub fn apply_move(&self, mov: Move) -> Result<Board, EngineError> {
        if self.result().is_terminal() || !self.is_empty_cell(mov) {
            return Err(EngineError::IllegalMove {
                row: mov.row,
                col: mov.col,
            });
        }
        let bit = 1u16 << mov.to_index();
        let mut next = *self;
        match self.to_move() {
            Mark::X => next.x |= bit,
            Mark::O => next.o |= bit,
            Mark::Empty => unreachable!("to_move never returns Empty"),
        }
        Ok(next)
    }

    /// Derive the game result from rows, columns and diagonals.
    #[must_use]
    pub fn result(&self) -> GameResult {
        for &line in &WIN_LINES {
            if self.x & line == line {
                return GameResult::XWins;
            }
            if self.o & line == line {
                return GameResult::OWins;
            }
        }
        if (self.x | self.o) == FULL {
            GameResult::Draw
        } else {
            GameResult::InProgress
        }
    }

    /// True once the game has ended.
    #[inline]
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.result().is_terminal()
    }

    /// Terminal evaluation from `perspective`: +1 win, -1 loss, 0 draw.
    ///
    /// In-progress boards evaluate to 0, which is what the optional depth
    /// cap uses when it cuts a search off before a terminal state.
    #[must_use]
    pub fn evaluate(&self, perspective: Mark) -> i32 {
        match self.result().winner() {
            Some(w) if w == perspective => 1,
            Some(_) => -1,
            None => 0,
        }
    }

    /// Packed encoding: 2 bits per cell, cell 0 most significant.
    ///
    /// Numeric order on keys equals lexicographic order on cell contents,
    /// which is what the symmetry canonicalizer minimizes over. Used
    /// directly as the plain transposition-table key.
    #[must_use]
    pub fn key(&self) -> u32 {
        let mut key = 0u32;
        for idx in 0..TOTAL_CELLS {
            let code = match self.get(Move::from_index(idx)) {
                Mark::Empty => 0u32,
                Mark::X => 1,
                Mark::O => 2,
            };
            key = (key << 2) | code;
        }
        key
    }

    /// Cell contents in row-major order.
    #[must_use]
    pub fn cells(&self) -> [Mark; TOTAL_CELLS] {
        let mut cells = [Mark::Empty; TOTAL_CELLS];
        for (idx, cell) in cells.iter_mut().enumerate() {
            *cell = self.get(Move::from_index(idx));
        }
        cells
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                let mark = self.get(Move::new(row as u8, col as u8));
                write!(f, " {}", mark.as_char())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Serialized as a 9-character row-major string, e.g. `"X.O.X...."`.
impl Serialize for Board {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let s: String = self.cells().iter().map(|m| m.as_char()).collect();
        serializer.serialize_str(&s)
    }
}
