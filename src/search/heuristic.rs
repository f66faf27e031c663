use crate::board::{Board, MoveTables, ROW_MASK};

/// Per-row bonuses summed into the heuristic table.
#[derive(Debug, Clone, PartialEq)]
pub struct HeuristicWeights {
    /// Added once per empty cell.
    pub empty: f64,
    /// Added when the largest rank sits at either end of the row.
    pub edge: f64,
    /// Added per adjacent pair whose ranks differ by exactly one.
    pub close: f64,
    /// Added when the row is strictly increasing or strictly decreasing.
    pub ordered: f64,
}

impl HeuristicWeights {
    pub const DEFAULT: HeuristicWeights = HeuristicWeights {
        empty: 10000.0,
        edge: 20000.0,
        close: 1000.0,
        ordered: 10000.0,
    };
}

impl Default for HeuristicWeights {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Total value of the tiles in `line`, counting every merge that built them.
pub(crate) fn row_score(line: [u8; 4]) -> f64 {
    line.iter()
        .filter(|&&rank| rank >= 2)
        .map(|&rank| ((rank as u32 - 1) * (1 << rank)) as f64)
        .sum()
}

pub(crate) fn row_heuristic(line: [u8; 4], weights: &HeuristicWeights) -> f64 {
    let mut heur = 0.0;

    heur += weights.empty * line.iter().filter(|&&rank| rank == 0).count() as f64;

    // First maximum wins, so an empty row counts as edge-anchored
    let max_col = (1..4).fold(0, |best, i| if line[i] > line[best] { i } else { best });
    if max_col == 0 || max_col == 3 {
        heur += weights.edge;
    }

    let close_pairs = line
        .windows(2)
        .filter(|pair| pair[0].abs_diff(pair[1]) == 1)
        .count();
    heur += weights.close * close_pairs as f64;

    if line.windows(2).all(|pair| pair[0] < pair[1]) {
        heur += weights.ordered;
    }

    if line.windows(2).all(|pair| pair[0] > pair[1]) {
        heur += weights.ordered;
    }

    heur
}

impl MoveTables {
    /// Heuristic value of a board: its rows plus the rows of its transpose.
    #[inline]
    pub fn heuristic(&self, board: Board) -> f64 {
        Self::sum_rows(&self.heur_scores, board)
            + Self::sum_rows(&self.heur_scores, board.transpose())
    }

    /// Game score implied by the tiles on the board. Used for reporting only.
    #[inline]
    pub fn raw_score(&self, board: Board) -> f64 {
        Self::sum_rows(&self.scores, board)
    }

    #[inline]
    fn sum_rows(table: &[f64], board: Board) -> f64 {
        let raw = board.raw();

        table[(raw & ROW_MASK) as usize]
            + table[((raw >> 16) & ROW_MASK) as usize]
            + table[((raw >> 32) & ROW_MASK) as usize]
            + table[((raw >> 48) & ROW_MASK) as usize]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_row_score() {
        assert_eq!(row_score([0, 0, 0, 0]), 0.0);
        assert_eq!(row_score([1, 1, 0, 0]), 0.0);
        assert_eq!(row_score([2, 0, 0, 0]), 4.0);
        assert_eq!(row_score([3, 2, 0, 1]), 16.0 + 4.0);
    }

    #[test]
    fn test_row_heuristic_terms() {
        let weights = HeuristicWeights::default();

        // Four empties, edge max, no close pairs, not strictly ordered
        assert_eq!(row_heuristic([0, 0, 0, 0], &weights), 4.0 * 10000.0 + 20000.0);

        // One empty, max off the edge, 0-1 and 3-2 are close
        assert_eq!(
            row_heuristic([0, 1, 3, 2], &weights),
            10000.0 + 1000.0 + 1000.0
        );
    }

    #[test]
    fn test_ordered_bonus_isolated() {
        let with_bonus = HeuristicWeights::default();
        let without_bonus = HeuristicWeights {
            ordered: 0.0,
            ..HeuristicWeights::default()
        };

        for line in [[1, 2, 3, 4], [1, 3, 5, 9], [9, 4, 2, 1]] {
            assert_eq!(
                row_heuristic(line, &with_bonus) - with_bonus.ordered,
                row_heuristic(line, &without_bonus),
                "{line:?}"
            );
        }

        let unordered = [1, 3, 2, 4];
        assert_eq!(
            row_heuristic(unordered, &with_bonus),
            row_heuristic(unordered, &without_bonus)
        );
    }

    #[test]
    fn test_board_heuristic_symmetric() {
        let tables = MoveTables::new(&HeuristicWeights::default());
        let board = Board::from_array([[1, 2, 3, 4], [0, 0, 5, 0], [1, 0, 0, 7], [0, 0, 0, 0]]);

        assert_eq!(tables.heuristic(board), tables.heuristic(board.transpose()));
        assert!(tables.heuristic(Board::EMPTY) > 0.0);
        assert_eq!(tables.raw_score(board), 4.0 + 16.0 + 48.0 + 128.0 + 768.0);
    }
}
