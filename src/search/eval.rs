use std::{fmt, ops::AddAssign};

use super::cache::TranspositionCache;

/// Scratch state of one top-level move evaluation.
pub struct EvalState {
    pub cache: TranspositionCache,
    /// Nodes reached with a smaller cumulative probability become leaves.
    pub cprob_thresh: f64,
    pub current_depth: u32,
    pub max_depth: u32,
    pub moves_evaled: u64,
}

impl EvalState {
    pub fn new(cprob_thresh: f64, cache_capacity: usize) -> Self {
        Self {
            cache: TranspositionCache::new(cache_capacity),
            cprob_thresh,
            current_depth: 0,
            max_depth: 0,
            moves_evaled: 0,
        }
    }

    pub fn stats(&self) -> EvalStats {
        EvalStats {
            moves_evaled: self.moves_evaled,
            cache_hits: self.cache.hit_counter() as u64,
            cache_size: self.cache.len(),
            max_depth: self.max_depth,
        }
    }
}

/// Counters reported by a finished evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvalStats {
    pub moves_evaled: u64,
    pub cache_hits: u64,
    pub cache_size: usize,
    pub max_depth: u32,
}

impl AddAssign for EvalStats {
    fn add_assign(&mut self, rhs: Self) {
        self.moves_evaled += rhs.moves_evaled;
        self.cache_hits += rhs.cache_hits;
        self.cache_size += rhs.cache_size;
        self.max_depth = self.max_depth.max(rhs.max_depth);
    }
}

impl fmt::Display for EvalStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "eval'd {} moves ({} cache hits, {} cache size) (maxdepth={})",
            self.moves_evaled, self.cache_hits, self.cache_size, self.max_depth
        )
    }
}
