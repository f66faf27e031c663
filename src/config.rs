use std::time::Duration;

use thiserror::Error;

use crate::search::{
    cache::TranspositionCache,
    depth::{DepthController, DepthLimits},
    heuristic::HeuristicWeights,
};

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("cutoff probability must lie in (0, 1), got {0}")]
    CutoffProbability(f64),

    #[error("tile generation ratio must be positive, got {0}")]
    GenerationRatio(f64),

    #[error("heuristic weight `{name}` must be a non-negative number, got {value}")]
    Weight { name: &'static str, value: f64 },

    #[error("rate threshold must be positive, got {0}")]
    RateThreshold(f64),

    #[error("transposition cache needs room for at least one board and its transpose")]
    CacheCapacity,
}

/// Engine parameters fixed at construction.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub cprob_thresh_base: f64,
    pub weights: HeuristicWeights,
    /// Odds of a 2 spawning against a 4.
    pub tile_gen_ratio: f64,
    pub depth_change_interval: Duration,
    /// Moves per second above which the search deepens.
    pub rate_threshold: f64,
    pub initial_limits: DepthLimits,
    pub cache_capacity: usize,
}

impl EngineConfig {
    pub const DEFAULT_CPROB_THRESH: f64 = 0.0001;
    pub const DEFAULT_TILE_GEN_RATIO: f64 = 9.0;

    /// Probability that a spawned tile is a 2.
    pub fn tile_gen_prob(&self) -> f64 {
        self.tile_gen_ratio / (self.tile_gen_ratio + 1.0)
    }

    pub fn depth_controller(&self) -> DepthController {
        DepthController::new(self.rate_threshold, self.depth_change_interval)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.cprob_thresh_base > 0.0 && self.cprob_thresh_base < 1.0) {
            return Err(ConfigError::CutoffProbability(self.cprob_thresh_base));
        }

        if !(self.tile_gen_ratio > 0.0 && self.tile_gen_ratio.is_finite()) {
            return Err(ConfigError::GenerationRatio(self.tile_gen_ratio));
        }

        let weights = &self.weights;
        for (name, value) in [
            ("empty", weights.empty),
            ("edge", weights.edge),
            ("close", weights.close),
            ("ordered", weights.ordered),
        ] {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(ConfigError::Weight { name, value });
            }
        }

        if !(self.rate_threshold > 0.0) {
            return Err(ConfigError::RateThreshold(self.rate_threshold));
        }

        if self.cache_capacity < 2 {
            return Err(ConfigError::CacheCapacity);
        }

        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cprob_thresh_base: Self::DEFAULT_CPROB_THRESH,
            weights: HeuristicWeights::default(),
            tile_gen_ratio: Self::DEFAULT_TILE_GEN_RATIO,
            depth_change_interval: DepthController::DEFAULT_CHANGE_INTERVAL,
            rate_threshold: DepthController::DEFAULT_RATE_THRESHOLD,
            initial_limits: DepthLimits::INITIAL,
            cache_capacity: TranspositionCache::DEFAULT_CAPACITY,
        }
    }
}
