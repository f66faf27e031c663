//! The authoritative game the driver plays: a grid of tile values, its
//! score, and random tile spawns drawn from a caller-owned RNG.

use rand::Rng;

use crate::board::{Direction, MAX_RANK};

/// Largest tile value the packed board can represent.
pub const MAX_TILE: u32 = 1 << MAX_RANK;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    grid: [u32; 16],
    score: u64,
}

impl Game {
    /// A fresh game with two random tiles.
    pub fn new(rng: &mut impl Rng) -> Self {
        let mut game = Self::from_grid([0; 16]);
        game.spawn_tile(rng);
        game.spawn_tile(rng);
        game
    }

    pub fn from_grid(grid: [u32; 16]) -> Self {
        Self { grid, score: 0 }
    }

    /// Row-major snapshot of the tile values, 0 for empty.
    pub fn grid(&self) -> &[u32; 16] {
        &self.grid
    }

    /// Sum of every tile produced by a merge.
    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn max_tile(&self) -> u32 {
        self.grid.iter().copied().max().unwrap_or(0)
    }

    /// Puts a 2 (90%) or a 4 into a uniformly chosen empty cell.
    ///
    /// Returns `false` when the grid is full.
    pub fn spawn_tile(&mut self, rng: &mut impl Rng) -> bool {
        let empty: Vec<usize> = (0..16).filter(|&idx| self.grid[idx] == 0).collect();
        if empty.is_empty() {
            return false;
        }

        let idx = empty[rng.random_range(0..empty.len())];
        self.grid[idx] = if rng.random_range(0..10) < 9 { 2 } else { 4 };
        true
    }

    /// Slides every line towards `direction`. Returns whether any tile moved.
    pub fn slide(&mut self, direction: Direction) -> bool {
        let before = self.grid;

        for line in 0..4 {
            let indices = line_indices(direction, line);
            let mut cells = indices.map(|idx| self.grid[idx]);
            self.score += swipe_line(&mut cells);

            for (idx, value) in indices.into_iter().zip(cells) {
                self.grid[idx] = value;
            }
        }

        self.grid != before
    }

    /// Slides and, if anything moved, spawns a tile.
    pub fn step(&mut self, direction: Direction, rng: &mut impl Rng) -> bool {
        let moved = self.slide(direction);
        if moved {
            self.spawn_tile(rng);
        }

        moved
    }

    pub fn is_game_over(&self) -> bool {
        Direction::ALL
            .into_iter()
            .all(|direction| !self.clone().slide(direction))
    }
}

/// Grid indices of `line`, starting at the side tiles slide towards.
fn line_indices(direction: Direction, line: usize) -> [usize; 4] {
    match direction {
        Direction::Left => [4 * line, 4 * line + 1, 4 * line + 2, 4 * line + 3],
        Direction::Right => [4 * line + 3, 4 * line + 2, 4 * line + 1, 4 * line],
        Direction::Up => [line, line + 4, line + 8, line + 12],
        Direction::Down => [line + 12, line + 8, line + 4, line],
    }
}

/// Compacts `cells` towards index 0, merging equal neighbours once.
///
/// Returns the value of the merged tiles.
pub fn swipe_line(cells: &mut [u32]) -> u64 {
    // Find first non empty cell
    let Some(current) = cells.iter().position(|&c| c != 0) else {
        return 0;
    };

    let mut gained = 0;
    let mut last = 0; // Write ptr
    cells.swap(last, current);

    for current in current + 1..cells.len() {
        if cells[current] == 0 {
            continue;
        } else if cells[current] == cells[last] && cells[last] < MAX_TILE {
            cells[last] *= 2;
            cells[current] = 0;
            gained += cells[last] as u64;
            last += 1;
        } else {
            if cells[last] != 0 {
                last += 1;
            }
            cells.swap(last, current);
        }
    }

    gained
}

#[cfg(test)]
mod test {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::board::{Board, MoveTables, test_utils};
    use crate::search::HeuristicWeights;

    #[test]
    fn test_swipe_line() {
        let cases: [([u32; 4], [u32; 4], u64); 6] = [
            ([2, 2, 0, 0], [4, 0, 0, 0], 4),
            ([0, 2, 0, 2], [4, 0, 0, 0], 4),
            ([2, 2, 2, 2], [4, 4, 0, 0], 8),
            ([4, 2, 2, 0], [4, 4, 0, 0], 4),
            ([2, 4, 8, 16], [2, 4, 8, 16], 0),
            ([MAX_TILE, MAX_TILE, 0, 2], [MAX_TILE, MAX_TILE, 2, 0], 0),
        ];

        for (mut cells, expected, gained) in cases {
            assert_eq!(swipe_line(&mut cells), gained);
            assert_eq!(cells, expected);
        }
    }

    #[test]
    fn test_slide_matches_tables() {
        let tables = MoveTables::new(&HeuristicWeights::default());
        let mut rng = StdRng::seed_from_u64(5);

        for board in test_utils::generate_boards(&mut rng, 10) {
            for direction in Direction::ALL {
                let mut game = Game::from_grid(board.to_grid());
                let moved = game.slide(direction);
                let expected = tables.apply(board, direction);

                assert_eq!(Board::from_grid(game.grid()), expected, "{board:?} {direction}");
                assert_eq!(moved, expected != board);
            }
        }
    }

    #[test]
    fn test_spawn() {
        let mut rng = StdRng::seed_from_u64(1);
        let game = Game::new(&mut rng);

        let tiles: Vec<u32> = game.grid().iter().copied().filter(|&v| v != 0).collect();
        assert_eq!(tiles.len(), 2);
        assert!(tiles.iter().all(|&v| v == 2 || v == 4));

        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(Game::new(&mut rng), game);
    }

    #[test]
    fn test_spawn_full() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut game = Game::from_grid([2; 16]);

        assert!(!game.spawn_tile(&mut rng));
    }

    #[test]
    fn test_game_over() {
        let locked = [2, 4, 2, 4, 4, 2, 4, 2, 2, 4, 2, 4, 4, 2, 4, 2];
        assert!(Game::from_grid(locked).is_game_over());

        let mut mergeable = locked;
        mergeable[1] = 2;
        assert!(!Game::from_grid(mergeable).is_game_over());
    }

    #[test]
    fn test_score() {
        let mut game = Game::from_grid([2, 2, 4, 4, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);

        assert!(game.slide(Direction::Left));
        assert_eq!(game.score(), 12);
        assert_eq!(&game.grid()[..4], &[4, 8, 0, 0]);
        assert_eq!(game.max_tile(), 8);
    }
}
