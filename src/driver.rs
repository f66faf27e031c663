use std::time::{Duration, Instant};

use rand::Rng;

use crate::{
    board::Board,
    config::EngineConfig,
    game::Game,
    search::{DepthController, DepthLimits, EvalStats, Expectimax, Throughput},
};

/// Result of one finished game.
#[derive(Debug, Clone)]
pub struct GameSummary {
    pub score: u64,
    pub max_tile: u32,
    pub moves: u64,
    pub elapsed: Duration,
    pub limits: DepthLimits,
    pub stats: EvalStats,
}

impl GameSummary {
    pub fn moves_per_sec(&self) -> f64 {
        self.moves as f64 / self.elapsed.as_secs_f64().max(f64::EPSILON)
    }
}

/// Plays whole games with the engine, retuning its depth limits after every
/// committed move.
///
/// The move count and session clock span all games played by one driver.
pub struct Driver<R> {
    engine: Expectimax,
    controller: DepthController,
    rng: R,
    max_moves: Option<u64>,
    move_count: u64,
    started: Instant,
    last_depth_change: Instant,
}

impl<R: Rng> Driver<R> {
    pub fn new(engine: Expectimax, config: &EngineConfig, rng: R) -> Self {
        let now = Instant::now();

        Self {
            engine,
            controller: config.depth_controller(),
            rng,
            max_moves: None,
            move_count: 0,
            started: now,
            last_depth_change: now,
        }
    }

    /// Stops each game after `max_moves` committed moves.
    pub fn with_max_moves(mut self, max_moves: Option<u64>) -> Self {
        self.max_moves = max_moves;
        self
    }

    /// Keeps the engine's current limits for the whole session.
    pub fn with_fixed_depth(mut self) -> Self {
        self.controller = DepthController::new(f64::INFINITY, Duration::MAX);
        self
    }

    pub fn engine(&self) -> &Expectimax {
        &self.engine
    }

    pub fn move_count(&self) -> u64 {
        self.move_count
    }

    /// Wall-clock time since the session clock last started.
    pub fn session_elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn play_game(&mut self) -> GameSummary {
        let game_start = Instant::now();
        let mut game = Game::new(&mut self.rng);
        let mut moves = 0;
        let mut stats = EvalStats::default();

        while !game.is_game_over() {
            if self.max_moves.is_some_and(|max| moves >= max) {
                log::debug!("Move cap of {moves} reached");
                break;
            }

            let board = Board::from_grid(game.grid());
            let report = self.engine.search(board);
            stats += report.stats;

            let Some(direction) = report.best else {
                log::debug!("No move improves on:\n{board:?}");
                break;
            };

            game.step(direction, &mut self.rng);
            moves += 1;
            self.move_count += 1;

            log::trace!(
                "Move #{moves}: {direction} ({:.1}) score={}",
                report.best_value(),
                game.score()
            );

            self.retune();
        }

        let summary = GameSummary {
            score: game.score(),
            max_tile: game.max_tile(),
            moves,
            elapsed: game_start.elapsed(),
            limits: self.engine.limits(),
            stats,
        };

        log::info!(
            "Game over: score={} max tile={} moves={} ({:.1} moves/s, {})",
            summary.score,
            summary.max_tile,
            summary.moves,
            summary.moves_per_sec(),
            summary.limits
        );

        summary
    }

    /// Plays `games` games back to back, reporting each as it finishes.
    ///
    /// Restarts the session clock first, so throughput only counts time spent
    /// playing.
    pub fn run(
        &mut self,
        games: usize,
        mut on_game: impl FnMut(&GameSummary),
    ) -> Vec<GameSummary> {
        let now = Instant::now();
        self.started = now;
        self.last_depth_change = now;

        (0..games)
            .map(|_| {
                let summary = self.play_game();
                on_game(&summary);
                summary
            })
            .collect()
    }

    fn retune(&mut self) {
        let now = Instant::now();
        let sample = Throughput {
            moves: self.move_count,
            elapsed: now.duration_since(self.started),
            since_change: now.duration_since(self.last_depth_change),
        };

        let limits = self.engine.limits();
        let next = self.controller.adjust(limits, sample);

        if next != limits {
            log::debug!(
                "Depth {limits} -> {next} at {:.1} moves/s",
                sample.moves_per_sec()
            );
            self.engine.set_limits(next);
            self.last_depth_change = now;
        }
    }
}
