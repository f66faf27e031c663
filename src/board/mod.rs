use std::{
    array,
    fmt::{self, Write},
    str::FromStr,
};

use thiserror::Error;

pub mod tables;

pub use tables::MoveTables;

/// Mask selecting the lowest row of a packed board.
pub const ROW_MASK: u64 = 0xFFFF;
/// Mask selecting the first cell of every row.
pub const COL_MASK: u64 = 0x000F_000F_000F_000F;
/// Largest rank a nibble can hold (tile 32768).
pub const MAX_RANK: u8 = 0xF;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// Enumeration order used by the search. Ties go to the earlier entry.
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Up => "up",
            Direction::Down => "down",
        };

        f.pad(name)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("cell {index} holds {value}, which is neither empty nor a power of two in 2..=32768")]
    InvalidTile { index: usize, value: u32 },

    #[error("expected 16 cells, found {0}")]
    CellCount(usize),

    #[error("unexpected character {0:?} in board string")]
    InvalidChar(char),
}

/// A 4x4 board packed into 16 nibbles.
///
/// Nibble `4 * row + col` holds the rank of that cell: 0 for empty, `r` for
/// a tile of value `2^r`. Row 0 occupies the lowest 16 bits and column 0 the
/// lowest nibble of each row, so "left" compacts towards the low nibble.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Board(u64);

impl Board {
    pub const EMPTY: Board = Board(0);

    pub const fn from_raw(raw: u64) -> Self {
        Board(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Packs a grid snapshot without validating it.
    ///
    /// Cells that are not 0 or a power of two up to 2^15 produce an
    /// unspecified (but in-range) rank.
    pub fn from_grid(grid: &[u32; 16]) -> Self {
        let raw = grid
            .iter()
            .rev()
            .fold(0u64, |board, &value| (board << 4) | (rank_of(value) & MAX_RANK) as u64);

        Board(raw)
    }

    /// Packs a grid snapshot, rejecting cells that have no rank.
    pub fn try_from_grid(grid: &[u32; 16]) -> Result<Self, BoardError> {
        for (index, &value) in grid.iter().enumerate() {
            let valid = value == 0
                || (value.is_power_of_two() && (2..=1u32 << MAX_RANK).contains(&value));
            if !valid {
                return Err(BoardError::InvalidTile { index, value });
            }
        }

        Ok(Self::from_grid(grid))
    }

    pub fn to_grid(self) -> [u32; 16] {
        array::from_fn(|idx| match self.cell(idx) {
            0 => 0,
            rank => 1 << rank,
        })
    }

    pub fn from_array(cells: [[u8; 4]; 4]) -> Self {
        let raw = cells
            .as_flattened()
            .iter()
            .rev()
            .fold(0u64, |board, &rank| (board << 4) | (rank & MAX_RANK) as u64);

        Board(raw)
    }

    pub fn to_array(self) -> [[u8; 4]; 4] {
        array::from_fn(|row| array::from_fn(|col| self.cell(4 * row + col)))
    }

    /// Rank stored at `idx` (row-major, 0..16).
    #[inline]
    pub fn cell(self, idx: usize) -> u8 {
        debug_assert!(idx < 16);
        ((self.0 >> (4 * idx)) & 0xF) as u8
    }

    #[inline]
    pub fn with_cell(self, idx: usize, rank: u8) -> Self {
        debug_assert!(idx < 16);
        let shift = 4 * idx;
        let cleared = self.0 & !(0xF << shift);
        Board(cleared | (((rank & MAX_RANK) as u64) << shift))
    }

    #[inline]
    pub fn row(self, idx: usize) -> u16 {
        debug_assert!(idx < 4);
        ((self.0 >> (16 * idx)) & ROW_MASK) as u16
    }

    #[inline]
    pub fn rows(self) -> [u16; 4] {
        array::from_fn(|idx| self.row(idx))
    }

    /// Swaps rows and columns.
    #[inline]
    pub fn transpose(self) -> Self {
        let x = self.0;
        let a1 = x & 0xF0F0_0F0F_F0F0_0F0F;
        let a2 = x & 0x0000_F0F0_0000_F0F0;
        let a3 = x & 0x0F0F_0000_0F0F_0000;
        let a = a1 | (a2 << 12) | (a3 >> 12);
        let b1 = a & 0xFF00_FF00_00FF_00FF;
        let b2 = a & 0x00FF_00FF_0000_0000;
        let b3 = a & 0x0000_0000_FF00_FF00;
        Board(b1 | (b2 >> 24) | (b3 << 24))
    }

    /// One bit per nibble, set when the nibble is non-zero.
    #[inline]
    fn occupancy(self) -> u64 {
        let mut x = self.0;
        x |= (x >> 2) & 0x3333_3333_3333_3333;
        x |= x >> 1;
        x & 0x1111_1111_1111_1111
    }

    #[inline]
    pub fn count_empty(self) -> u32 {
        16 - self.count_occupied()
    }

    #[inline]
    pub fn count_occupied(self) -> u32 {
        self.occupancy().count_ones()
    }

    /// Indices of the empty cells in ascending order.
    pub fn empty_cells(self) -> impl Iterator<Item = usize> {
        (0..16).filter(move |&idx| self.cell(idx) == 0)
    }

    pub fn max_rank(self) -> u8 {
        (0..16).map(|idx| self.cell(idx)).max().unwrap_or(0)
    }
}

/// Bit length minus one; 0 for an empty cell.
fn rank_of(value: u32) -> u8 {
    match value {
        0 => 0,
        v => (u32::BITS - 1 - v.leading_zeros()) as u8,
    }
}

pub fn val_to_char(rank: u8) -> char {
    match rank {
        0 => '.',
        r => char::from_digit(r as u32, 16).unwrap_or('?'),
    }
}

impl FromStr for Board {
    type Err = BoardError;

    /// Parses 16 rank characters in row-major order: `.` or `0` for empty,
    /// `1`-`9` and `a`-`f` for ranks. Whitespace is skipped.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ranks: Vec<u8> = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| match c {
                '.' => Ok(0),
                c => c
                    .to_digit(16)
                    .map(|d| d as u8)
                    .ok_or(BoardError::InvalidChar(c)),
            })
            .collect::<Result<_, _>>()?;

        if ranks.len() != 16 {
            return Err(BoardError::CellCount(ranks.len()));
        }

        Ok(ranks
            .iter()
            .enumerate()
            .fold(Board::EMPTY, |board, (idx, &rank)| board.with_cell(idx, rank)))
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rows = self.to_array().into_iter();

        if let Some(row) = rows.next() {
            row.iter().try_for_each(|&c| write!(f, "{:>2}", val_to_char(c)))?
        }

        for row in rows {
            f.write_char('\n')?;
            row.iter().try_for_each(|&c| write!(f, "{:>2}", val_to_char(c)))?
        }

        Ok(())
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, row) in self.to_grid().chunks(4).enumerate() {
            if idx > 0 {
                f.write_char('\n')?;
            }

            for value in row {
                match value {
                    0 => write!(f, "{:>6}", '.')?,
                    v => write!(f, "{v:>6}")?,
                }
            }
        }

        Ok(())
    }
}

pub mod test_utils {
    use itertools::Itertools as _;
    use rand::{
        Rng,
        seq::{IndexedRandom as _, SliceRandom as _},
    };

    use super::Board;

    /// Random board with ranks `1..=filled` placed once each, plus
    /// `duplicates` extra copies of ranks already on the board.
    pub fn generate_random_board(rng: &mut impl Rng, filled: u8, duplicates: u8) -> Board {
        let mut ranks = Vec::with_capacity(16);
        ranks.extend(1..filled.min(15) + 1);

        if !ranks.is_empty() {
            let extra = (0..duplicates)
                .filter_map(|_| ranks.choose(rng).copied())
                .collect_vec();

            ranks.extend(extra);
        }

        ranks.truncate(16);
        ranks.resize(16, 0);
        ranks.shuffle(rng);

        ranks
            .into_iter()
            .enumerate()
            .fold(Board::EMPTY, |board, (idx, rank)| board.with_cell(idx, rank))
    }

    /// A spread of boards from sparse to full, for tests and benchmarks.
    pub fn generate_boards(rng: &mut impl Rng, per_shape: usize) -> Vec<Board> {
        (0..16u8)
            .flat_map(|filled| (0..filled.max(1)).map(move |dup| (filled, dup)))
            .cartesian_product(0..per_shape)
            .map(|((filled, dup), _)| generate_random_board(rng, filled, dup))
            .collect()
    }
}
