//! Transposition table: position-key → (depth, score) memo.
//!
//! The table lives inside one searcher instance and is shared by every
//! node of that searcher's recursion tree. An entry is only trusted when
//! it was computed at least as deep as the depth being requested —
//! shallower entries are stale for deeper queries and are ignored (not
//! evicted). Storage is an unconditional overwrite, so later (deeper)
//! writes win. There is no eviction policy: unbounded growth is an
//! accepted trade-off, with [`TranspositionTable::clear`] as the explicit
//! release valve.
//!
//! Keys are the rules engine's Zobrist hashes, which incorporate the side
//! to move — the same physical arrangement with the other side to move is
//! a different key, so color-relative scores cannot collide across
//! perspectives.

use std::collections::HashMap;

/// One memoized search result.
#[derive(Debug, Clone, Copy, PartialEq)]
struct TtEntry {
    /// Depth the score was searched to.
    depth: u8,
    /// Color-relative evaluation at that depth.
    score: f64,
}

/// Depth-aware memo of search scores, keyed by position hash.
#[derive(Debug, Default, Clone)]
pub struct TranspositionTable {
    entries: HashMap<u64, TtEntry>,
}

impl TranspositionTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up `key`, trusting the entry only if it was searched to at
    /// least `requested_depth`.
    pub fn lookup(&self, key: u64, requested_depth: u8) -> Option<f64> {
        self.entries
            .get(&key)
            .filter(|entry| entry.depth >= requested_depth)
            .map(|entry| entry.score)
    }

    /// Store `score` for `key` at `depth`, overwriting any prior entry.
    pub fn store(&mut self, key: u64, depth: u8, score: f64) {
        self.entries.insert(key, TtEntry { depth, score });
    }

    /// Number of stored positions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry, releasing the table's memory growth.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_iff_stored_depth_sufficient() {
        let mut tt = TranspositionTable::new();
        tt.store(42, 3, 1.5);

        assert_eq!(tt.lookup(42, 3), Some(1.5));
        assert_eq!(tt.lookup(42, 2), Some(1.5));
        assert_eq!(tt.lookup(42, 4), None);
        assert_eq!(tt.lookup(7, 1), None);
    }

    #[test]
    fn later_writes_win() {
        let mut tt = TranspositionTable::new();
        tt.store(42, 5, 1.0);
        tt.store(42, 2, -3.0);

        // Unconditional overwrite: the shallow write replaced the deep one.
        assert_eq!(tt.lookup(42, 2), Some(-3.0));
        assert_eq!(tt.lookup(42, 5), None);
    }

    #[test]
    fn side_to_move_keys_are_independent() {
        use std::str::FromStr;

        // Same piece arrangement, opposite side to move — distinct keys,
        // so color-relative scores never cross-contaminate.
        let white = chess::Board::from_str("4k3/8/8/8/8/8/8/4K2R w - - 0 1").unwrap();
        let black = chess::Board::from_str("4k3/8/8/8/8/8/8/4K2R b - - 0 1").unwrap();
        assert_ne!(white.get_hash(), black.get_hash());

        let mut tt = TranspositionTable::new();
        tt.store(white.get_hash(), 4, 2.0);
        tt.store(black.get_hash(), 4, -2.0);
        assert_eq!(tt.lookup(white.get_hash(), 4), Some(2.0));
        assert_eq!(tt.lookup(black.get_hash(), 4), Some(-2.0));
    }

    #[test]
    fn clear_removes_all_entries() {
        let mut tt = TranspositionTable::new();
        tt.store(1, 1, 0.5);
        tt.store(2, 2, -0.5);
        assert_eq!(tt.len(), 2);

        tt.clear();
        assert!(tt.is_empty());
        assert_eq!(tt.lookup(1, 1), None);
    }
}
