use std::collections::HashMap;

use crate::board::Board;

/// Expected values of boards seen during one top-level evaluation.
///
/// Every entry is stored under both the board and its transpose, since the
/// heuristic cannot tell them apart. Once `capacity` keys are held, further
/// inserts are dropped and lookups keep being served.
pub struct TranspositionCache {
    cache: HashMap<u64, f64, fxhash::FxBuildHasher>,
    capacity: usize,
    hit_counter: u32,
    lookup_counter: u32,
}

impl TranspositionCache {
    pub const DEFAULT_CAPACITY: usize = 1 << 22;

    pub fn new(capacity: usize) -> Self {
        Self {
            cache: HashMap::with_hasher(fxhash::FxBuildHasher::default()),
            capacity,
            hit_counter: 0,
            lookup_counter: 0,
        }
    }

    pub fn get(&mut self, board: Board) -> Option<f64> {
        self.lookup_counter += 1;

        let found = self
            .cache
            .get(&board.raw())
            .or_else(|| self.cache.get(&board.transpose().raw()))
            .copied();

        if found.is_some() {
            self.hit_counter += 1;
        }

        found
    }

    pub fn insert(&mut self, board: Board, value: f64) {
        if self.is_full() {
            return;
        }

        self.cache.insert(board.raw(), value);
        self.cache.insert(board.transpose().raw(), value);
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.cache.len() + 2 > self.capacity
    }

    pub fn hit_counter(&self) -> u32 {
        self.hit_counter
    }

    pub fn lookup_counter(&self) -> u32 {
        self.lookup_counter
    }
}

impl Default for TranspositionCache {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_transpose_hit() {
        let mut cache = TranspositionCache::default();
        let board = Board::from_array([[1, 2, 0, 0], [0, 0, 0, 0], [3, 0, 0, 0], [0, 0, 0, 0]]);

        assert_eq!(cache.get(board), None);
        cache.insert(board, 42.5);

        assert_eq!(cache.get(board), Some(42.5));
        assert_eq!(cache.get(board.transpose()), Some(42.5));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.hit_counter(), 2);
        assert_eq!(cache.lookup_counter(), 3);
    }

    #[test]
    fn test_symmetric_board_single_key() {
        let mut cache = TranspositionCache::default();
        let board = Board::from_array([[1, 0, 0, 0], [0, 1, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]);

        cache.insert(board, 1.0);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_capacity() {
        let mut cache = TranspositionCache::new(2);
        let a = Board::from_array([[1, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let b = Board::from_array([[3, 4, 0, 0], [0; 4], [0; 4], [0; 4]]);

        cache.insert(a, 1.0);
        assert!(cache.is_full());

        cache.insert(b, 2.0);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(b), None);
        assert_eq!(cache.get(a), Some(1.0));
    }
}
