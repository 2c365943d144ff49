use rand::{seq::SliceRandom, thread_rng, Rng};
use std::fmt;
use thiserror::Error;

/// Sentinel value for the empty cell. Tile labels run from 1 to `n² - 1`.
pub const BLANK: u32 = 0;

/// Rejection-sampling bound for [`Board::shuffled`]. Half of all permutations
/// are solvable on an even-width board, so reaching this bound means the
/// shuffle or the parity test is broken, not bad luck.
pub const MAX_SHUFFLE_ATTEMPTS: usize = 10_000;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PuzzleError {
    #[error("value {0} is missing from the board")]
    ValueNotFound(u32),
    #[error("cell layout is not a permutation of 0..{0}")]
    NotAPermutation(u32),
    #[error("no solvable permutation found after {0} shuffle attempts")]
    ShuffleRetriesExhausted(usize),
}

/// True iff cells `a` and `b` are grid-adjacent on a `size`-wide board,
/// i.e. their Manhattan distance is exactly 1.
pub fn is_adjacent(a: usize, b: usize, size: usize) -> bool {
    let (row_a, col_a) = (a / size, a % size);
    let (row_b, col_b) = (b / size, b % size);
    row_a.abs_diff(row_b) + col_a.abs_diff(col_b) == 1
}

/// A `size × size` sliding-tile board stored row-major, with the blank's
/// position tracked alongside. Exactly one cell holds [`BLANK`]; every
/// constructor establishes that invariant and every move preserves it,
/// since moves are swaps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: usize,
    cells: Vec<u32>,
    blank: usize,
}

impl Board {
    /// The canonical solved layout `[1, 2, …, size² - 1, blank]`.
    pub fn solved(size: usize) -> Self {
        assert!(size >= 2, "board must be at least 2x2");
        let cell_count = size * size;
        let mut cells: Vec<u32> = (1..cell_count as u32).collect();
        cells.push(BLANK);
        Self {
            size,
            cells,
            blank: cell_count - 1,
        }
    }

    /// Builds a board from an explicit layout, validating that it is a
    /// permutation of `{0, 1, …, size² - 1}`. The layout need not be
    /// solvable; callers that care should check [`Board::is_solvable`].
    pub fn from_cells(size: usize, cells: Vec<u32>) -> Result<Self, PuzzleError> {
        let cell_count = size * size;
        if cells.len() != cell_count {
            return Err(PuzzleError::NotAPermutation(cell_count as u32));
        }
        let mut seen = vec![false; cell_count];
        for &value in &cells {
            let slot = value as usize;
            if slot >= cell_count || seen[slot] {
                return Err(PuzzleError::NotAPermutation(cell_count as u32));
            }
            seen[slot] = true;
        }
        let blank = cells
            .iter()
            .position(|&v| v == BLANK)
            .ok_or(PuzzleError::ValueNotFound(BLANK))?;
        Ok(Self { size, cells, blank })
    }

    /// A uniformly random, solvable layout, using the thread-local RNG.
    pub fn shuffled(size: usize) -> Result<Self, PuzzleError> {
        Self::shuffled_with(size, &mut thread_rng())
    }

    /// Fisher–Yates shuffle with rejection sampling: reshuffle until the
    /// parity test passes. Exhausting [`MAX_SHUFFLE_ATTEMPTS`] indicates a
    /// logic defect and surfaces as a hard error.
    pub fn shuffled_with<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Result<Self, PuzzleError> {
        let mut cells = Self::solved(size).cells;
        for _ in 0..MAX_SHUFFLE_ATTEMPTS {
            cells.shuffle(rng);
            let blank = cells
                .iter()
                .position(|&v| v == BLANK)
                .ok_or(PuzzleError::ValueNotFound(BLANK))?;
            if is_solvable(&cells, size, blank / size) {
                return Ok(Self { size, cells, blank });
            }
        }
        Err(PuzzleError::ShuffleRetriesExhausted(MAX_SHUFFLE_ATTEMPTS))
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn cells(&self) -> &[u32] {
        &self.cells
    }

    /// Index of the blank cell.
    pub fn blank_index(&self) -> usize {
        self.blank
    }

    /// Index of the cell holding `value`. Absence means the board invariant
    /// is broken, so this is an internal-consistency error, not a routine
    /// outcome.
    pub fn locate(&self, value: u32) -> Result<usize, PuzzleError> {
        self.cells
            .iter()
            .position(|&v| v == value)
            .ok_or(PuzzleError::ValueNotFound(value))
    }

    /// Slides the tile at `tile_index` into the blank if the two cells are
    /// adjacent. Returns whether a move happened; illegal requests (index
    /// out of range, the blank itself, or a non-adjacent cell) leave the
    /// board untouched.
    pub fn try_move(&mut self, tile_index: usize) -> bool {
        if tile_index >= self.cells.len() || tile_index == self.blank {
            return false;
        }
        if !is_adjacent(tile_index, self.blank, self.size) {
            return false;
        }
        self.cells.swap(tile_index, self.blank);
        self.blank = tile_index;
        true
    }

    /// True iff the board matches the canonical solved layout
    /// position-for-position.
    pub fn is_solved(&self) -> bool {
        let last = self.cells.len() - 1;
        self.blank == last
            && self.cells[..last]
                .iter()
                .enumerate()
                .all(|(i, &v)| v == i as u32 + 1)
    }

    /// Whether the current layout is reachable from the solved board.
    ///
    /// Even width: a vertical slide carries a tile past `size - 1` (odd)
    /// other tiles, flipping the inversion parity while the blank's row
    /// changes by one, so `inversions + blank_row` keeps its parity across
    /// every move. The solved board has zero inversions with the blank on
    /// row `size - 1`, hence solvable iff that sum is odd. Odd width: the
    /// blank's row drops out of the invariant and the layout is solvable
    /// iff the inversion count is even.
    pub fn is_solvable(&self) -> bool {
        is_solvable(&self.cells, self.size, self.blank / self.size)
    }
}

fn is_solvable(cells: &[u32], size: usize, blank_row: usize) -> bool {
    let inversions = count_inversions(cells);
    if size % 2 == 1 {
        inversions % 2 == 0
    } else {
        (inversions + blank_row) % 2 == 1
    }
}

/// Ordered pairs of non-blank cells whose values are out of ascending order.
fn count_inversions(cells: &[u32]) -> usize {
    cells
        .iter()
        .enumerate()
        .filter(|&(_, &val)| val != BLANK)
        .map(|(i, &val)| {
            cells[i + 1..]
                .iter()
                .filter(|&&next| next != BLANK && next < val)
                .count()
        })
        .sum()
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.size) {
            for &val in row {
                if val == BLANK {
                    write!(f, " . ")?;
                } else {
                    write!(f, "{:2} ", val)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
