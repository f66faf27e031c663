//! Expectimax move selection.

pub mod cache;
pub mod depth;
pub mod eval;
pub mod expectimax;
pub mod heuristic;

pub use depth::{DepthController, DepthLimits, Throughput};
pub use eval::EvalStats;
pub use expectimax::{Expectimax, SearchReport};
pub use heuristic::HeuristicWeights;
