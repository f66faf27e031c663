use super::{
    depth::DepthLimits,
    eval::{EvalState, EvalStats},
};
use crate::{
    board::{Board, Direction, MoveTables},
    config::{ConfigError, EngineConfig},
};

/// Outcome of a full top-level search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchReport {
    /// Winning direction, `None` when no direction scores above zero.
    pub best: Option<Direction>,
    /// Top-level value per direction, indexed by [`Direction::index`].
    /// No-op directions hold 0.
    pub values: [f64; 4],
    pub stats: EvalStats,
}

impl SearchReport {
    pub fn best_value(&self) -> f64 {
        self.best.map_or(0.0, |direction| self.values[direction.index()])
    }
}

/// Depth- and probability-bounded expectimax over packed boards.
pub struct Expectimax {
    tables: MoveTables,
    limits: DepthLimits,
    cprob_thresh_base: f64,
    tile_gen_prob: f64,
    cache_capacity: usize,
}

impl Expectimax {
    pub fn new(config: &EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            tables: MoveTables::new(&config.weights),
            limits: config.initial_limits,
            cprob_thresh_base: config.cprob_thresh_base,
            tile_gen_prob: config.tile_gen_prob(),
            cache_capacity: config.cache_capacity,
        })
    }

    pub fn tables(&self) -> &MoveTables {
        &self.tables
    }

    pub fn limits(&self) -> DepthLimits {
        self.limits
    }

    pub fn set_limits(&mut self, limits: DepthLimits) {
        self.limits = DepthLimits::new(limits.cache, limits.search);
    }

    pub fn best_move(&self, board: Board) -> Option<Direction> {
        self.search(board).best
    }

    /// Evaluates every direction and keeps the strict maximum above zero.
    pub fn search(&self, board: Board) -> SearchReport {
        let mut report = SearchReport {
            best: None,
            values: [0.0; 4],
            stats: EvalStats::default(),
        };
        let mut best = 0.0;

        for direction in Direction::ALL {
            let (value, stats) = self.top_move_value(board, direction);
            report.values[direction.index()] = value;
            report.stats += stats;

            if value > best {
                best = value;
                report.best = Some(direction);
            }
        }

        report
    }

    /// Expected value of playing `direction` on `board`, 0 if it has no effect.
    pub fn top_move_value(&self, board: Board, direction: Direction) -> (f64, EvalStats) {
        let moved = self.tables.apply(board, direction);
        if moved == board {
            return (0.0, EvalStats::default());
        }

        let mut state = EvalState::new(self.cprob_thresh_base, self.cache_capacity);
        let value = self.env_move(&mut state, moved, 1.0);
        let stats = state.stats();

        log::trace!("Move {direction}: result {value}: {stats}");

        (value, stats)
    }

    /// Chance node: averages over every empty cell and both spawn ranks.
    fn env_move(&self, state: &mut EvalState, board: Board, cprob: f64) -> f64 {
        let num_open = board.count_empty();
        if num_open == 0 {
            return self.leaf(state, board);
        }

        let cprob = cprob / num_open as f64;
        let p2 = self.tile_gen_prob;
        let p4 = 1.0 - p2;

        let mut res = 0.0;
        let mut tmp = board.raw();
        let mut tile_2 = 1u64;

        while tile_2 != 0 {
            if tmp & 0xF == 0 {
                let with_2 = Board::from_raw(board.raw() | tile_2);
                let with_4 = Board::from_raw(board.raw() | (tile_2 << 1));

                res += self.after_env_move(state, with_2, cprob * p2) * p2;
                res += self.after_env_move(state, with_4, cprob * p4) * p4;
            }

            tmp >>= 4;
            tile_2 <<= 4;
        }

        res / num_open as f64
    }

    /// Max node: the best chance-node value over the moves that change `board`.
    fn after_env_move(&self, state: &mut EvalState, board: Board, cprob: f64) -> f64 {
        if cprob < state.cprob_thresh || state.current_depth >= self.limits.search {
            return self.leaf(state, board);
        }

        if state.current_depth <= self.limits.cache {
            if let Some(value) = state.cache.get(board) {
                return value;
            }
        }

        let mut best = 0.0f64;
        state.current_depth += 1;

        for direction in Direction::ALL {
            let moved = self.tables.apply(board, direction);
            state.moves_evaled += 1;

            if moved != board {
                best = best.max(self.env_move(state, moved, cprob));
            }
        }

        state.current_depth -= 1;

        if state.current_depth <= self.limits.cache {
            state.cache.insert(board, best);
        }

        best
    }

    fn leaf(&self, state: &mut EvalState, board: Board) -> f64 {
        state.max_depth = state.max_depth.max(state.current_depth);
        self.tables.heuristic(board)
    }
}
