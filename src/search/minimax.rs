//! Exhaustive Minimax search
//!
//! The correctness baseline for every other variant: no pruning, no
//! caching, every reachable subtree visited. Its nodes-visited count is
//! an upper bound for the pruned variants on the same position.

use std::time::Instant;

use log::debug;

use crate::board::{Board, Mark, Move, TOTAL_CELLS};
use crate::error::EngineError;

use super::tree::{NodeKind, TreeRecorder};
use super::{ensure_searchable, Algorithm, AlgorithmKind, Decision, MoveScore, SearchStats, INF};

/// Exhaustive minimax searcher.
#[derive(Debug, Default)]
pub struct Minimax {
    depth_limit: Option<u8>,
    record_tree: bool,
}

impl Minimax {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap the search at `limit` plies below the root. At the cap,
    /// non-terminal positions evaluate to 0 and the best move found so
    /// far is still returned (the cap fails closed, never with an error).
    #[must_use]
    pub fn with_depth_limit(limit: u8) -> Self {
        Self {
            depth_limit: Some(limit),
            record_tree: false,
        }
    }

    /// Capture the full decision tree in the returned [`Decision`].
    #[must_use]
    pub fn record_tree(mut self, on: bool) -> Self {
        self.record_tree = on;
        self
    }

    /// True when `ply` is at or past the configured cap.
    #[inline]
    fn capped(&self, ply: u8) -> bool {
        self.depth_limit.is_some_and(|limit| ply >= limit)
    }

    #[allow(clippy::too_many_arguments)]
    fn minimax(
        &self,
        board: &Board,
        mov: Move,
        me: Mark,
        ply: u8,
        maximizing: bool,
        stats: &mut SearchStats,
        rec: &mut TreeRecorder,
    ) -> Result<i32, EngineError> {
        stats.visit(ply);

        if board.is_terminal() || self.capped(ply) {
            stats.leaves += 1;
            let score = board.evaluate(me);
            rec.enter(board, Some(mov), NodeKind::Terminal);
            rec.leave(score);
            return Ok(score);
        }

        let kind = if maximizing { NodeKind::Max } else { NodeKind::Min };
        rec.enter(board, Some(mov), kind);

        let mut value = if maximizing { -INF } else { INF };
        for m in board.legal_moves() {
            let child = board.apply_move(m)?;
            let score = self.minimax(&child, m, me, ply + 1, !maximizing, stats, rec)?;
            value = if maximizing {
                value.max(score)
            } else {
                value.min(score)
            };
        }

        rec.leave(value);
        Ok(value)
    }
}

impl Algorithm for Minimax {
    fn kind(&self) -> AlgorithmKind {
        AlgorithmKind::Minimax
    }

    fn choose_move(&mut self, board: &Board) -> Result<Decision, EngineError> {
        ensure_searchable(board)?;
        let start = Instant::now();
        let me = board.to_move();
        let mut stats = SearchStats::default();
        let mut rec = TreeRecorder::new(self.record_tree);
        rec.enter(board, None, NodeKind::Max);

        let mut best: Option<MoveScore> = None;
        let mut alternatives = Vec::with_capacity(TOTAL_CELLS);

        for mov in board.legal_moves() {
            let child = board.apply_move(mov)?;
            let score = self.minimax(&child, mov, me, 1, false, &mut stats, &mut rec)?;
            alternatives.push(MoveScore { mov, score });
            if best.is_none_or(|b| score > b.score) {
                best = Some(MoveScore { mov, score });
            }
        }

        // A non-terminal board always has at least one legal move
        let best = best.ok_or_else(|| EngineError::InvalidBoard("no legal moves".into()))?;
        rec.leave(best.score);
        stats.elapsed = start.elapsed();
        debug!(
            "minimax chose ({}, {}) score {} after {} nodes",
            best.mov.row, best.mov.col, best.score, stats.nodes
        );

        Ok(Decision {
            mov: best.mov,
            score: best.score,
            alternatives,
            stats,
            tree: rec.finish(),
        })
    }
}
