//! Alpha-Beta search and its transposition-table variants
//!
//! Three public searchers share one core:
//!
//! - [`AlphaBeta`]: plain (alpha, beta) window pruning. Chooses the
//!   identical move and score as Minimax on every position; only the
//!   visited-node and prune counts differ.
//! - [`AlphaBetaTt`]: additionally caches results in a
//!   [`TranspositionTable`] keyed by the exact packed board encoding, so
//!   transpositions (different move orders reaching the same board) are
//!   searched once.
//! - [`AlphaBetaSymmetry`]: caches under the D4-canonical key instead,
//!   merging the up-to-8 symmetric copies of every subtree into one
//!   entry. The chosen move may differ from plain Alpha-Beta's but always
//!   has equal minimax value; cached moves are mapped back to the
//!   caller's orientation through the inverse symmetry transform.
//!
//! Cached best moves are also used for move ordering inside the
//! recursion: the remembered move is tried first, which tightens the
//! window sooner.

use std::time::Instant;

use log::debug;

use crate::board::{Board, Mark, Move, TOTAL_CELLS};
use crate::error::EngineError;
use crate::symmetry::{canonicalize, Transform};

use super::tree::{NodeKind, TreeRecorder};
use super::tt::{Bound, TranspositionTable};
use super::{ensure_searchable, Algorithm, AlgorithmKind, Decision, MoveScore, SearchStats, INF};

/// How the shared core keys its transposition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TtMode {
    /// No table at all
    Off,
    /// Exact board key
    Plain,
    /// D4-canonical key
    Canonical,
}

/// The recursion shared by all three variants.
#[derive(Debug)]
struct AbCore {
    mode: TtMode,
    depth_limit: Option<u8>,
    record_tree: bool,
    tt: TranspositionTable,
}

impl AbCore {
    fn new(mode: TtMode) -> Self {
        Self {
            mode,
            depth_limit: None,
            record_tree: false,
            tt: TranspositionTable::new(),
        }
    }

    #[inline]
    fn capped(&self, ply: u8) -> bool {
        self.depth_limit.is_some_and(|limit| ply >= limit)
    }

    /// Remaining plies this node can still be searched for, used as the
    /// transposition-table depth field.
    #[inline]
    fn remaining(&self, board: &Board, ply: u8) -> u8 {
        let empties = (TOTAL_CELLS as u32 - board.mark_count()) as u8;
        match self.depth_limit {
            Some(limit) => empties.min(limit.saturating_sub(ply)),
            None => empties,
        }
    }

    /// Key the table by board orientation (plain) or canonical form.
    /// The transform maps the board into the key's orientation.
    fn table_key(&self, board: &Board) -> (u32, Transform) {
        match self.mode {
            TtMode::Plain => (board.key(), Transform::Identity),
            TtMode::Canonical => canonicalize(board),
            TtMode::Off => unreachable!("table_key only called with a table"),
        }
    }

    fn choose_move(&mut self, board: &Board, kind: AlgorithmKind) -> Result<Decision, EngineError> {
        ensure_searchable(board)?;
        let start = Instant::now();
        let me = board.to_move();
        let mut stats = SearchStats::default();
        let mut rec = TreeRecorder::new(self.record_tree);
        // Fresh table per top-level search: never reuse results across
        // calls, so separate runs stay comparable.
        self.tt.clear();
        rec.enter(board, None, NodeKind::Max);

        let mut best: Option<MoveScore> = None;
        let mut alternatives = Vec::with_capacity(TOTAL_CELLS);
        let mut alpha = -INF;
        let beta = INF;
        // Canonical forms of root children already searched, for the
        // symmetry variant's root-level deduplication.
        let mut seen_children: Vec<(u32, i32)> = Vec::new();

        for mov in board.legal_moves() {
            let child = board.apply_move(mov)?;

            let score = if self.mode == TtMode::Canonical {
                let (canon, _) = canonicalize(&child);
                if let Some(&(_, cached)) = seen_children.iter().find(|&&(k, _)| k == canon) {
                    // Symmetric sibling already searched; reuse its score
                    stats.symmetry_hits += 1;
                    cached
                } else {
                    let score =
                        self.alpha_beta(&child, mov, me, 1, alpha, beta, false, &mut stats, &mut rec)?;
                    seen_children.push((canon, score));
                    score
                }
            } else {
                self.alpha_beta(&child, mov, me, 1, alpha, beta, false, &mut stats, &mut rec)?
            };

            alternatives.push(MoveScore { mov, score });
            if best.is_none_or(|b| score > b.score) {
                best = Some(MoveScore { mov, score });
            }
            alpha = alpha.max(score);
        }

        let best = best.ok_or_else(|| EngineError::InvalidBoard("no legal moves".into()))?;
        rec.leave(best.score);
        stats.tt_stores = self.tt.len() as u64;
        stats.elapsed = start.elapsed();
        debug!(
            "{} chose ({}, {}) score {} after {} nodes ({} prunes, {} tt hits)",
            kind,
            best.mov.row,
            best.mov.col,
            best.score,
            stats.nodes,
            stats.prunes,
            stats.tt_hits
        );

        Ok(Decision {
            mov: best.mov,
            score: best.score,
            alternatives,
            stats,
            tree: rec.finish(),
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn alpha_beta(
        &mut self,
        board: &Board,
        mov: Move,
        me: Mark,
        ply: u8,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
        stats: &mut SearchStats,
        rec: &mut TreeRecorder,
    ) -> Result<i32, EngineError> {
        let original_alpha = alpha;
        let original_beta = beta;
        let node_kind = if maximizing { NodeKind::Max } else { NodeKind::Min };

        let key = if self.mode == TtMode::Off {
            None
        } else {
            let (key, transform) = self.table_key(board);
            stats.tt_probes += 1;
            let remaining = self.remaining(board, ply);
            if let Some((score, _)) = self.tt.probe(key, remaining, alpha, beta) {
                stats.tt_hits += 1;
                // Subtree answered from the table; record it as elided
                rec.enter(board, Some(mov), node_kind);
                rec.leave(score);
                return Ok(score);
            }
            Some((key, transform))
        };

        stats.visit(ply);

        if board.is_terminal() || self.capped(ply) {
            stats.leaves += 1;
            let score = board.evaluate(me);
            if let Some((key, _)) = key {
                self.tt
                    .store(key, self.remaining(board, ply), score, Bound::Exact, None);
            }
            rec.enter(board, Some(mov), NodeKind::Terminal);
            rec.leave(score);
            return Ok(score);
        }

        rec.enter(board, Some(mov), node_kind);

        // Remembered move first: symmetric-table moves come back in
        // canonical orientation and must be mapped to ours.
        let mut moves = board.legal_moves();
        if let Some((key, transform)) = key {
            if let Some(cached) = self.tt.get_best_move(key) {
                let local = transform.unapply_move(cached);
                if let Some(pos) = moves.iter().position(|&m| m == local) {
                    moves.swap(0, pos);
                }
            }
        }

        let mut value = if maximizing { -INF } else { INF };
        let mut best_local: Option<Move> = None;

        for m in moves {
            let child = board.apply_move(m)?;
            let score =
                self.alpha_beta(&child, m, me, ply + 1, alpha, beta, !maximizing, stats, rec)?;

            if maximizing {
                if score > value {
                    value = score;
                    best_local = Some(m);
                }
                alpha = alpha.max(value);
            } else {
                if score < value {
                    value = score;
                    best_local = Some(m);
                }
                beta = beta.min(value);
            }

            if beta <= alpha {
                stats.prunes += 1;
                break;
            }
        }

        if let Some((key, transform)) = key {
            let bound = classify_bound(value, original_alpha, original_beta);
            // Store the best move in the key's orientation
            let stored_move = best_local.map(|m| transform.apply_move(m));
            self.tt
                .store(key, self.remaining(board, ply), value, bound, stored_move);
        }

        rec.leave(value);
        Ok(value)
    }
}

/// Classify a fail-soft result against the window the node was entered
/// with. The loop tightens alpha and beta as it goes, so using the
/// mutated bounds would mislabel in-window values at minimizing nodes as
/// lower bounds.
#[inline]
fn classify_bound(value: i32, original_alpha: i32, original_beta: i32) -> Bound {
    if value <= original_alpha {
        Bound::Upper
    } else if value >= original_beta {
        Bound::Lower
    } else {
        Bound::Exact
    }
}

macro_rules! ab_variant {
    ($(#[$doc:meta])* $name:ident, $mode:expr, $kind:expr) => {
        $(#[$doc])*
        #[derive(Debug)]
        pub struct $name {
            core: AbCore,
        }

        impl $name {
            #[must_use]
            pub fn new() -> Self {
                Self {
                    core: AbCore::new($mode),
                }
            }

            /// Cap the search at `limit` plies below the root; at the cap
            /// the search fails closed with the best move found so far.
            #[must_use]
            pub fn with_depth_limit(limit: u8) -> Self {
                let mut core = AbCore::new($mode);
                core.depth_limit = Some(limit);
                Self { core }
            }

            /// Capture the full decision tree in the returned [`Decision`].
            #[must_use]
            pub fn record_tree(mut self, on: bool) -> Self {
                self.core.record_tree = on;
                self
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl Algorithm for $name {
            fn kind(&self) -> AlgorithmKind {
                $kind
            }

            fn choose_move(&mut self, board: &Board) -> Result<Decision, EngineError> {
                self.core.choose_move(board, $kind)
            }
        }
    };
}

ab_variant!(
    /// Alpha-Beta pruning without any caching.
    AlphaBeta,
    TtMode::Off,
    AlgorithmKind::AlphaBeta
);

ab_variant!(
    /// Alpha-Beta with a plain-key transposition table.
    AlphaBetaTt,
    TtMode::Plain,
    AlgorithmKind::AlphaBetaTt
);

ab_variant!(
    /// Alpha-Beta with a D4-canonical transposition table.
    AlphaBetaSymmetry,
    TtMode::Canonical,
    AlgorithmKind::AlphaBetaSymmetry
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::Minimax;

    fn play(indices: &[usize]) -> Board {
        let mut board = Board::new();
        for &idx in indices {
            board = board.apply_move(Move::from_index(idx)).unwrap();
        }
        board
    }

    /// A spread of non-terminal positions at assorted depths.
    fn sample_positions() -> Vec<Board> {
        vec![
            Board::new(),
            play(&[0]),
            play(&[4]),
            play(&[0, 4]),
            play(&[4, 0, 8]),
            play(&[0, 1, 3, 4]),    // X threatens 6, O threatens 7... both live
            play(&[0, 3, 1, 4]),    // X wins with 2
            play(&[4, 0, 2, 6, 3]), // midgame
            play(&[0, 4, 8, 2, 6, 3]),
            play(&[0, 1, 2, 4, 3, 5, 7, 6]), // one empty cell
        ]
    }

    #[test]
    fn test_matches_minimax_move_and_score() {
        for board in sample_positions() {
            let mm = Minimax::new().choose_move(&board).unwrap();
            let ab = AlphaBeta::new().choose_move(&board).unwrap();
            assert_eq!(ab.mov, mm.mov, "move mismatch on\n{board}");
            assert_eq!(ab.score, mm.score, "score mismatch on\n{board}");
        }
    }

    #[test]
    fn test_never_visits_more_nodes_than_minimax() {
        for board in sample_positions() {
            let mm = Minimax::new().choose_move(&board).unwrap();
            let ab = AlphaBeta::new().choose_move(&board).unwrap();
            assert!(
                ab.stats.nodes <= mm.stats.nodes,
                "alpha-beta visited more nodes on\n{board}"
            );
        }
    }

    #[test]
    fn test_prunes_recorded() {
        let ab = AlphaBeta::new().choose_move(&Board::new()).unwrap();
        assert!(ab.stats.prunes > 0);
        assert_eq!(ab.stats.tt_probes, 0);
    }

    #[test]
    fn test_tt_variant_same_move_and_score() {
        for board in sample_positions() {
            let ab = AlphaBeta::new().choose_move(&board).unwrap();
            let tt = AlphaBetaTt::new().choose_move(&board).unwrap();
            assert_eq!(tt.mov, ab.mov, "move mismatch on\n{board}");
            assert_eq!(tt.score, ab.score, "score mismatch on\n{board}");
        }
    }

    #[test]
    fn test_tt_variant_caches() {
        let tt = AlphaBetaTt::new().choose_move(&Board::new()).unwrap();
        assert!(tt.stats.tt_hits > 0);
        assert!(tt.stats.tt_stores > 0);
        let ab = AlphaBeta::new().choose_move(&Board::new()).unwrap();
        assert!(tt.stats.nodes < ab.stats.nodes);
    }

    #[test]
    fn test_symmetry_variant_equal_score() {
        for board in sample_positions() {
            let ab = AlphaBeta::new().choose_move(&board).unwrap();
            let sym = AlphaBetaSymmetry::new().choose_move(&board).unwrap();
            // The move may differ under symmetry, but its value may not
            assert_eq!(sym.score, ab.score, "score mismatch on\n{board}");
            // And the symmetry variant's move must be one of the best
            let mm = Minimax::new().choose_move(&board).unwrap();
            let exact = mm
                .alternatives
                .iter()
                .find(|a| a.mov == sym.mov)
                .map(|a| a.score);
            assert_eq!(exact, Some(ab.score), "inferior move on\n{board}");
        }
    }

    #[test]
    fn test_symmetry_merges_root_children() {
        // From the empty board, the 9 openings collapse to 3 canonical ones
        let sym = AlphaBetaSymmetry::new().choose_move(&Board::new()).unwrap();
        assert_eq!(sym.stats.symmetry_hits, 6);
        assert_eq!(sym.alternatives.len(), 9);
    }

    #[test]
    fn test_symmetry_beats_plain_tt_on_empty_board() {
        let tt = AlphaBetaTt::new().choose_move(&Board::new()).unwrap();
        let sym = AlphaBetaSymmetry::new().choose_move(&Board::new()).unwrap();
        assert!(sym.stats.nodes < tt.stats.nodes);
    }

    #[test]
    fn test_symmetric_boards_evaluate_identically() {
        use crate::symmetry::Transform;
        let board = play(&[0, 4, 5]);
        let base = AlphaBetaSymmetry::new().choose_move(&board).unwrap();
        for t in Transform::ALL {
            let rotated = t.apply_board(&board);
            let other = AlphaBetaSymmetry::new().choose_move(&rotated).unwrap();
            assert_eq!(other.score, base.score, "score differs under {t:?}");
        }
    }

    #[test]
    fn test_table_cleared_between_calls() {
        let mut engine = AlphaBetaTt::new();
        let first = engine.choose_move(&Board::new()).unwrap();
        let second = engine.choose_move(&Board::new()).unwrap();
        // Identical runs: a persistent table would change the counters
        assert_eq!(first.stats.nodes, second.stats.nodes);
        assert_eq!(first.stats.tt_hits, second.stats.tt_hits);
    }

    #[test]
    fn test_depth_cap_fails_closed() {
        let decision = AlphaBeta::with_depth_limit(3)
            .choose_move(&Board::new())
            .unwrap();
        assert!(decision.stats.max_depth <= 3);
        assert_eq!(decision.score, 0);
    }

    #[test]
    fn test_bound_classification_uses_entry_window() {
        // A minimizing node entered with (-2, 2) that settles on 0 has
        // tightened beta to 0 by the end of its loop; the stored entry
        // must still be Exact, judged against the entry window.
        assert_eq!(classify_bound(0, -2, 2), Bound::Exact);
        assert_eq!(classify_bound(1, -2, 2), Bound::Exact);
        // Fail-low and fail-high still classify as bounds
        assert_eq!(classify_bound(-1, -1, 2), Bound::Upper);
        assert_eq!(classify_bound(0, 0, 2), Bound::Upper);
        assert_eq!(classify_bound(1, -2, 1), Bound::Lower);
        assert_eq!(classify_bound(2, -2, 2), Bound::Lower);
    }

    #[test]
    fn test_exact_entries_usable_across_windows() {
        // Exact scores cached at minimizing nodes must satisfy probes
        // under any window, so the TT variant stays in lockstep with
        // plain Alpha-Beta while hitting the table.
        let tt = AlphaBetaTt::new().choose_move(&Board::new()).unwrap();
        let ab = AlphaBeta::new().choose_move(&Board::new()).unwrap();
        assert_eq!(tt.mov, ab.mov);
        assert_eq!(tt.score, ab.score);
        assert!(tt.stats.tt_hits > 0);
    }

    #[test]
    fn test_win_in_one_all_variants() {
        let board = play(&[0, 3, 1, 4]);
        for decision in [
            AlphaBeta::new().choose_move(&board).unwrap(),
            AlphaBetaTt::new().choose_move(&board).unwrap(),
            AlphaBetaSymmetry::new().choose_move(&board).unwrap(),
        ] {
            assert_eq!(decision.mov, Move::new(0, 2));
            assert_eq!(decision.score, 1);
        }
    }
}
