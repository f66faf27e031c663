//! Lookup tables indexed by a 16-bit row, built once per engine.

use super::{Board, COL_MASK, Direction, MAX_RANK, ROW_MASK};
use crate::search::heuristic::{HeuristicWeights, row_heuristic, row_score};

const TABLE_SIZE: usize = 1 << 16;

/// Precomputed move deltas and row scores for every possible row.
///
/// Move entries are XOR masks: `row ^ table[row]` is the row after the move.
/// Column tables hold the mask already spread over a column (one nibble per
/// 16-bit row), ready to be shifted into place.
pub struct MoveTables {
    row_left: Box<[u16]>,
    row_right: Box<[u16]>,
    col_up: Box<[u64]>,
    col_down: Box<[u64]>,
    pub(crate) heur_scores: Box<[f64]>,
    pub(crate) scores: Box<[f64]>,
}

impl MoveTables {
    pub fn new(weights: &HeuristicWeights) -> Self {
        let mut row_left = vec![0u16; TABLE_SIZE].into_boxed_slice();
        let mut row_right = vec![0u16; TABLE_SIZE].into_boxed_slice();
        let mut col_up = vec![0u64; TABLE_SIZE].into_boxed_slice();
        let mut col_down = vec![0u64; TABLE_SIZE].into_boxed_slice();
        let mut heur_scores = vec![0f64; TABLE_SIZE].into_boxed_slice();
        let mut scores = vec![0f64; TABLE_SIZE].into_boxed_slice();

        for row in 0..TABLE_SIZE {
            let row = row as u16;
            let line = unpack_row(row);

            scores[row as usize] = row_score(line);
            heur_scores[row as usize] = row_heuristic(line, weights);

            let result = pack_row(swipe_left(line));
            let rev_row = reverse_row(row);
            let rev_result = reverse_row(result);

            row_left[row as usize] = row ^ result;
            row_right[rev_row as usize] = rev_row ^ rev_result;
            col_up[row as usize] = unpack_col(row) ^ unpack_col(result);
            col_down[rev_row as usize] = unpack_col(rev_row) ^ unpack_col(rev_result);
        }

        log::debug!("Built move tables for {TABLE_SIZE} rows");

        Self {
            row_left,
            row_right,
            col_up,
            col_down,
            heur_scores,
            scores,
        }
    }

    /// Slides and merges `board` towards `direction`.
    ///
    /// A move that has no effect returns `board` unchanged; that equality is
    /// the only legality check.
    #[inline]
    pub fn apply(&self, board: Board, direction: Direction) -> Board {
        let raw = board.raw();

        let delta = match direction {
            Direction::Left => Self::row_delta(&self.row_left, raw),
            Direction::Right => Self::row_delta(&self.row_right, raw),
            Direction::Up => Self::col_delta(&self.col_up, board.transpose().raw()),
            Direction::Down => Self::col_delta(&self.col_down, board.transpose().raw()),
        };

        Board::from_raw(raw ^ delta)
    }

    #[inline]
    fn row_delta(table: &[u16], raw: u64) -> u64 {
        (0..4).fold(0, |delta, i| {
            let row = (raw >> (16 * i)) & ROW_MASK;
            delta | ((table[row as usize] as u64) << (16 * i))
        })
    }

    #[inline]
    fn col_delta(table: &[u64], transposed: u64) -> u64 {
        (0..4).fold(0, |delta, i| {
            let col = (transposed >> (16 * i)) & ROW_MASK;
            delta | (table[col as usize] << (4 * i))
        })
    }
}

fn unpack_row(row: u16) -> [u8; 4] {
    std::array::from_fn(|i| ((row >> (4 * i)) & 0xF) as u8)
}

fn pack_row(line: [u8; 4]) -> u16 {
    line.iter()
        .rev()
        .fold(0u16, |row, &rank| (row << 4) | rank as u16)
}

pub(crate) fn reverse_row(row: u16) -> u16 {
    (row >> 12) | ((row >> 4) & 0x00F0) | ((row << 4) & 0x0F00) | (row << 12)
}

/// Spreads the four nibbles of `row` down a column.
pub(crate) fn unpack_col(row: u16) -> u64 {
    let tmp = row as u64;
    (tmp | (tmp << 12) | (tmp << 24) | (tmp << 36)) & COL_MASK
}

/// Compacts `line` towards index 0, merging each pair of equal ranks once.
///
/// A tile produced by a merge is not merged again in the same pass, and two
/// tiles of [`MAX_RANK`] stay apart.
pub fn swipe_left(mut line: [u8; 4]) -> [u8; 4] {
    let mut i = 0;

    while i < 3 {
        let Some(j) = (i + 1..4).find(|&j| line[j] != 0) else {
            break;
        };

        if line[i] == 0 {
            line[i] = line[j];
            line[j] = 0;
            // Slot i is filled now, look for a partner again
            continue;
        }

        if line[i] == line[j] && line[i] != MAX_RANK {
            line[i] += 1;
            line[j] = 0;
        }

        i += 1;
    }

    line
}
