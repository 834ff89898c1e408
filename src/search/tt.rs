//! Transposition table for caching search results
//!
//! Two different move sequences can reach the same board; the table lets
//! the search reuse the earlier result instead of recursing again. Keys
//! are exact packed board encodings ([`crate::board::Board::key`]) or
//! canonical D4 keys ([`crate::symmetry::canonicalize`]) depending on the
//! search variant, so unlike a hashed table there are no collisions to
//! verify against.
//!
//! A table is owned by a single searcher and cleared at the start of every
//! top-level search. Nothing persists across calls, which keeps algorithm
//! comparisons fair.

use std::collections::HashMap;

use crate::board::Move;

/// Score interpretation for a stored entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// Exact minimax value
    Exact,
    /// Score is a lower bound (search failed high)
    Lower,
    /// Score is an upper bound (search failed low)
    Upper,
}

/// Cached result for one position.
#[derive(Debug, Clone, Copy)]
pub struct TtEntry {
    /// Evaluation score
    pub score: i32,
    /// Remaining search depth the score was computed with
    pub depth: u8,
    /// How to interpret the score
    pub bound: Bound,
    /// Best move found, in the key's orientation
    pub best_move: Option<Move>,
}

/// Transposition table keyed by exact board encodings.
///
/// The 3x3 state space is tiny (5,478 reachable positions), so a plain
/// map with an always-replace policy is all that is needed; there is no
/// fixed-size slot array or depth-preferred replacement.
#[derive(Debug, Default)]
pub struct TranspositionTable {
    entries: HashMap<u32, TtEntry>,
}

impl TranspositionTable {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Probe for a usable score.
    ///
    /// Returns `Some((score, best_move))` only when the stored entry was
    /// computed with at least `depth` remaining plies and its bound allows
    /// use inside the current `(alpha, beta)` window. Use
    /// [`TranspositionTable::get_best_move`] when only the move is wanted.
    #[must_use]
    pub fn probe(&self, key: u32, depth: u8, alpha: i32, beta: i32) -> Option<(i32, Option<Move>)> {
        let entry = self.entries.get(&key)?;
        if entry.depth < depth {
            return None;
        }
        match entry.bound {
            Bound::Exact => Some((entry.score, entry.best_move)),
            Bound::Lower if entry.score >= beta => Some((entry.score, entry.best_move)),
            Bound::Upper if entry.score <= alpha => Some((entry.score, entry.best_move)),
            _ => None,
        }
    }

    /// Best move stored for a position, regardless of depth or bound.
    #[must_use]
    pub fn get_best_move(&self, key: u32) -> Option<Move> {
        self.entries.get(&key).and_then(|e| e.best_move)
    }

    /// Store a result. Always replaces (the simple scheme the exact-key
    /// space allows).
    pub fn store(&mut self, key: u32, depth: u8, score: i32, bound: Bound, best_move: Option<Move>) {
        self.entries.insert(
            key,
            TtEntry {
                score,
                depth,
                bound,
                best_move,
            },
        );
    }

    /// Drop every entry. Called at the start of each top-level search.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of distinct positions stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_probe_exact() {
        let mut tt = TranspositionTable::new();
        tt.store(42, 5, 1, Bound::Exact, Some(Move::new(0, 2)));

        let (score, best) = tt.probe(42, 5, -2, 2).unwrap();
        assert_eq!(score, 1);
        assert_eq!(best, Some(Move::new(0, 2)));
    }

    #[test]
    fn test_depth_requirement() {
        let mut tt = TranspositionTable::new();
        tt.store(42, 3, 1, Bound::Exact, None);

        // Deeper request cannot use a shallower entry
        assert!(tt.probe(42, 5, -2, 2).is_none());
        // Shallower or equal request can
        assert!(tt.probe(42, 3, -2, 2).is_some());
        assert!(tt.probe(42, 1, -2, 2).is_some());
    }

    #[test]
    fn test_lower_bound_cutoff() {
        let mut tt = TranspositionTable::new();
        tt.store(7, 4, 1, Bound::Lower, None);

        // score >= beta: usable
        assert_eq!(tt.probe(7, 4, -2, 1).unwrap().0, 1);
        // score < beta: not usable
        assert!(tt.probe(7, 4, -2, 2).is_none());
    }

    #[test]
    fn test_upper_bound_cutoff() {
        let mut tt = TranspositionTable::new();
        tt.store(7, 4, -1, Bound::Upper, None);

        // score <= alpha: usable
        assert_eq!(tt.probe(7, 4, -1, 2).unwrap().0, -1);
        // score > alpha: not usable
        assert!(tt.probe(7, 4, -2, 2).is_none());
    }

    #[test]
    fn test_missing_key() {
        let tt = TranspositionTable::new();
        assert!(tt.probe(99, 0, -2, 2).is_none());
        assert!(tt.get_best_move(99).is_none());
    }

    #[test]
    fn test_always_replace() {
        let mut tt = TranspositionTable::new();
        tt.store(5, 6, 1, Bound::Exact, Some(Move::new(0, 0)));
        tt.store(5, 2, 0, Bound::Exact, Some(Move::new(1, 1)));

        // Shallower store still replaces
        assert!(tt.probe(5, 6, -2, 2).is_none());
        assert_eq!(tt.probe(5, 2, -2, 2).unwrap().0, 0);
        assert_eq!(tt.get_best_move(5), Some(Move::new(1, 1)));
        assert_eq!(tt.len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut tt = TranspositionTable::new();
        tt.store(1, 0, 0, Bound::Exact, None);
        assert!(!tt.is_empty());
        tt.clear();
        assert!(tt.is_empty());
        assert!(tt.probe(1, 0, -2, 2).is_none());
    }
}
