use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use rand::{SeedableRng as _, rngs::StdRng};
use twenty_fourty_eight_bot::{
    Board, Direction, EngineConfig, Expectimax,
    board::{MoveTables, test_utils},
    search::{DepthLimits, HeuristicWeights},
};

fn generate_boards(count: usize) -> Vec<Board> {
    let mut rng = StdRng::seed_from_u64(0);
    test_utils::generate_boards(&mut rng, count)
}

fn bench_tables(c: &mut Criterion) {
    let weights = HeuristicWeights::default();

    c.bench_function("build_tables", |b| {
        b.iter(|| black_box(MoveTables::new(&weights)));
    });
}

fn bench_moves(c: &mut Criterion) {
    const COUNT: usize = 100;

    let tables = MoveTables::new(&HeuristicWeights::default());
    let boards = generate_boards(COUNT);

    let mut group = c.benchmark_group("moves");
    group.throughput(Throughput::Elements(boards.len() as u64));

    group.bench_function("apply", |b| {
        b.iter(|| {
            for &board in &boards {
                for direction in Direction::ALL {
                    black_box(tables.apply(board, direction));
                }
            }
        });
    });

    group.bench_function("heuristic", |b| {
        b.iter(|| {
            for &board in &boards {
                black_box(tables.heuristic(board));
            }
        });
    });

    group.bench_function("transpose", |b| {
        b.iter(|| {
            for &board in &boards {
                black_box(board.transpose());
            }
        });
    });
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    group.sample_size(10);

    let board: Board = "1 2 3 4 . . 2 1 . . . . . . . 1".parse().unwrap();

    for depth in [2, 3, 4] {
        let config = EngineConfig {
            initial_limits: DepthLimits::new(depth, depth),
            ..EngineConfig::default()
        };
        let engine = Expectimax::new(&config).unwrap();

        group.bench_function(format!("best_move_depth_{depth}"), |b| {
            b.iter(|| black_box(engine.best_move(board)));
        });
    }
}

criterion_group!(benches, bench_tables, bench_moves, bench_search);
criterion_main!(benches);
