use std::{fmt, time::Duration};

/// Depth bounds of the expectimax recursion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthLimits {
    /// Deepest max node whose value goes through the transposition cache.
    pub cache: u32,
    /// Max nodes at this depth are evaluated with the heuristic.
    pub search: u32,
}

impl DepthLimits {
    pub const MIN: u32 = 2;
    pub const MAX_CACHE: u32 = 7;
    pub const MAX_SEARCH: u32 = 8;

    pub const INITIAL: DepthLimits = DepthLimits {
        cache: 6,
        search: 7,
    };

    /// Builds limits clamped into the allowed ranges.
    pub fn new(cache: u32, search: u32) -> Self {
        Self {
            cache: cache.clamp(Self::MIN, Self::MAX_CACHE),
            search: search.clamp(Self::MIN, Self::MAX_SEARCH),
        }
    }

    pub fn deeper(self) -> Self {
        Self::new(self.cache + 1, self.search + 1)
    }

    pub fn shallower(self) -> Self {
        Self::new(self.cache.saturating_sub(1), self.search.saturating_sub(1))
    }
}

impl Default for DepthLimits {
    fn default() -> Self {
        Self::INITIAL
    }
}

impl fmt::Display for DepthLimits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cache={} search={}", self.cache, self.search)
    }
}

/// Timing observed by the driver after committing a move.
#[derive(Debug, Clone, Copy)]
pub struct Throughput {
    /// Moves committed since the session started.
    pub moves: u64,
    /// Wall-clock time since the session started.
    pub elapsed: Duration,
    /// Time since the limits last changed.
    pub since_change: Duration,
}

impl Throughput {
    pub fn moves_per_sec(&self) -> f64 {
        if self.elapsed.is_zero() {
            return f64::INFINITY;
        }

        self.moves as f64 / self.elapsed.as_secs_f64()
    }
}

/// Trades search depth for move rate between searches.
#[derive(Debug, Clone)]
pub struct DepthController {
    /// Moves per second above which both limits grow.
    pub rate_threshold: f64,
    /// Minimum time between two reductions.
    pub change_interval: Duration,
}

impl DepthController {
    pub const DEFAULT_RATE_THRESHOLD: f64 = 105.0;
    pub const DEFAULT_CHANGE_INTERVAL: Duration = Duration::from_millis(100);

    pub fn new(rate_threshold: f64, change_interval: Duration) -> Self {
        Self {
            rate_threshold,
            change_interval,
        }
    }

    /// Next limits given the current ones and the latest measurement.
    ///
    /// The driver restarts its change timer whenever the returned limits
    /// differ from `limits`.
    pub fn adjust(&self, limits: DepthLimits, sample: Throughput) -> DepthLimits {
        if sample.moves_per_sec() > self.rate_threshold {
            limits.deeper()
        } else if sample.since_change > self.change_interval {
            limits.shallower()
        } else {
            limits
        }
    }
}

impl Default for DepthController {
    fn default() -> Self {
        Self::new(Self::DEFAULT_RATE_THRESHOLD, Self::DEFAULT_CHANGE_INTERVAL)
    }
}
