use std::time::{Duration, Instant};

use anyhow::Context as _;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use number_prefix::NumberPrefix;
use rand::{SeedableRng as _, rngs::StdRng};
use twenty_fourty_eight_bot::{
    Board, Direction, EngineConfig, Expectimax,
    driver::{Driver, GameSummary},
    search::{DepthController, DepthLimits, HeuristicWeights, cache::TranspositionCache},
};

/// Plays 2048 with a depth-adaptive expectimax search.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Number of games to play
    #[arg(short = 'n', long, default_value_t = 1)]
    games: usize,

    /// Seed for tile spawns; random when omitted
    #[arg(short, long)]
    seed: Option<u64>,

    /// Stop each game after this many moves
    #[arg(long)]
    max_moves: Option<u64>,

    /// Print the search result for one board (16 rank characters, `.` for empty) and exit
    #[arg(short, long)]
    board: Option<String>,

    /// Search nodes reached with a lower probability are scored heuristically
    #[arg(long, default_value_t = EngineConfig::DEFAULT_CPROB_THRESH)]
    cprob_thresh: f64,

    #[arg(long, default_value_t = HeuristicWeights::DEFAULT.empty)]
    empty_weight: f64,

    #[arg(long, default_value_t = HeuristicWeights::DEFAULT.edge)]
    edge_weight: f64,

    #[arg(long, default_value_t = HeuristicWeights::DEFAULT.close)]
    close_weight: f64,

    #[arg(long, default_value_t = HeuristicWeights::DEFAULT.ordered)]
    ordered_weight: f64,

    /// Odds of a 2 spawning against a 4
    #[arg(long, default_value_t = EngineConfig::DEFAULT_TILE_GEN_RATIO)]
    tile_gen_ratio: f64,

    /// Seconds between two depth reductions
    #[arg(long, default_value_t = 0.1)]
    depth_change_interval: f64,

    /// Moves per second above which the search deepens
    #[arg(long, default_value_t = DepthController::DEFAULT_RATE_THRESHOLD)]
    rate_threshold: f64,

    #[arg(long, default_value_t = DepthLimits::INITIAL.cache)]
    cache_depth: u32,

    #[arg(long, default_value_t = DepthLimits::INITIAL.search)]
    search_depth: u32,

    /// Keep the starting depth limits for the whole run
    #[arg(long)]
    fixed_depth: bool,

    /// Transposition entries kept per evaluated move
    #[arg(long, default_value_t = TranspositionCache::DEFAULT_CAPACITY)]
    cache_capacity: usize,
}

impl Args {
    fn engine_config(&self) -> anyhow::Result<EngineConfig> {
        let depth_change_interval = Duration::try_from_secs_f64(self.depth_change_interval)
            .context("invalid --depth-change-interval")?;

        let config = EngineConfig {
            cprob_thresh_base: self.cprob_thresh,
            weights: HeuristicWeights {
                empty: self.empty_weight,
                edge: self.edge_weight,
                close: self.close_weight,
                ordered: self.ordered_weight,
            },
            tile_gen_ratio: self.tile_gen_ratio,
            depth_change_interval,
            rate_threshold: self.rate_threshold,
            initial_limits: DepthLimits::new(self.cache_depth, self.search_depth),
            cache_capacity: self.cache_capacity,
        };

        config.validate()?;
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = args.engine_config()?;

    let start = Instant::now();
    let engine = Expectimax::new(&config)?;
    log::debug!("Engine ready in {:?}", start.elapsed());

    if let Some(board) = &args.board {
        let board: Board = board.parse().context("invalid --board")?;
        analyse(&engine, board);
        return Ok(());
    }

    let seed = args.seed.unwrap_or_else(rand::random);
    log::info!("Seed: {seed}, limits: {}", engine.limits());

    let mut driver = Driver::new(engine, &config, StdRng::seed_from_u64(seed))
        .with_max_moves(args.max_moves);
    if args.fixed_depth {
        driver = driver.with_fixed_depth();
    }

    let progress = ProgressBar::new(args.games as u64);
    progress.set_style(
        ProgressStyle::with_template("{spinner} [{elapsed_precise}] {bar:40} {pos}/{len} {msg}")?
            .progress_chars("##-"),
    );

    let summaries = driver.run(args.games, |summary| {
        progress.set_message(format!("last score {}", summary.score));
        progress.inc(1);
    });
    progress.finish_and_clear();

    report(&summaries, driver.session_elapsed());
    Ok(())
}

fn analyse(engine: &Expectimax, board: Board) {
    let report = engine.search(board);

    println!("{board}");
    println!("raw score: {}", engine.tables().raw_score(board));
    println!("max tile:  {}", 1u32 << board.max_rank());
    for direction in Direction::ALL {
        println!("{direction:>6}: {:.1}", report.values[direction.index()]);
    }

    match report.best {
        Some(direction) => println!("best move: {direction}"),
        None => println!("best move: none"),
    }
    println!("{}", report.stats);
}

fn report(summaries: &[GameSummary], elapsed: Duration) {
    if summaries.is_empty() {
        return;
    }

    let games = summaries.len() as f64;
    let total_score: u64 = summaries.iter().map(|s| s.score).sum();
    let max_score = summaries.iter().map(|s| s.score).max().unwrap_or(0);
    let best_tile = summaries.iter().map(|s| s.max_tile).max().unwrap_or(0);
    let moves: u64 = summaries.iter().map(|s| s.moves).sum();
    let evaluated: u64 = summaries.iter().map(|s| s.stats.moves_evaled).sum();

    println!("games:      {}", summaries.len());
    println!("avg score:  {:.1}", total_score as f64 / games);
    println!("max score:  {max_score}");
    println!("max tile:   {best_tile}");
    println!("moves:      {moves}");
    println!(
        "throughput: {} moves/s, {} nodes/s",
        human(moves as f64 / elapsed.as_secs_f64()),
        human(evaluated as f64 / elapsed.as_secs_f64())
    );
}

fn human(n: f64) -> String {
    match NumberPrefix::decimal(n) {
        NumberPrefix::Standalone(n) => format!("{n:.1}"),
        NumberPrefix::Prefixed(prefix, n) => format!("{n:.1}{prefix}"),
    }
}
