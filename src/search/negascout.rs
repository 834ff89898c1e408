//! NegaScout (principal variation search)
//!
//! Negamax with null-window scouting: the first child of every node is
//! searched with the full window and becomes the principal variation;
//! every later child is first probed with a minimal `[alpha, alpha + 1]`
//! window, which is enough to prove it is not better. Only when the
//! probe lands inside the window is the child re-searched with a full
//! window. Returns the same evaluation as Alpha-Beta on every position,
//! typically visiting fewer nodes.

use std::time::Instant;

use log::debug;

use crate::board::{Board, Mark, Move, TOTAL_CELLS};
use crate::error::EngineError;

use super::tree::{NodeKind, TreeRecorder};
use super::{ensure_searchable, Algorithm, AlgorithmKind, Decision, MoveScore, SearchStats, INF};

/// NegaScout searcher.
#[derive(Debug, Default)]
pub struct NegaScout {
    depth_limit: Option<u8>,
    record_tree: bool,
}

impl NegaScout {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap the search at `limit` plies below the root; at the cap the
    /// search fails closed with the best move found so far.
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

    #[inline]
    fn capped(&self, ply: u8) -> bool {
        self.depth_limit.is_some_and(|limit| ply >= limit)
    }

    /// Negamax recursion: scores are from the side to move's point of
    /// view, `color` is +1 when that side is the root player.
    #[allow(clippy::too_many_arguments)]
    fn negascout(
        &self,
        board: &Board,
        mov: Move,
        me: Mark,
        ply: u8,
        mut alpha: i32,
        beta: i32,
        color: i32,
        stats: &mut SearchStats,
        rec: &mut TreeRecorder,
    ) -> Result<i32, EngineError> {
        stats.visit(ply);

        if board.is_terminal() || self.capped(ply) {
            stats.leaves += 1;
            let score = color * board.evaluate(me);
            // Recorded scores stay in the root player's perspective
            rec.enter(board, Some(mov), NodeKind::Terminal);
            rec.leave(color * score);
            return Ok(score);
        }

        let node_kind = if color == 1 { NodeKind::Max } else { NodeKind::Min };
        rec.enter(board, Some(mov), node_kind);

        let mut value = -INF;
        for (i, m) in board.legal_moves().into_iter().enumerate() {
            let child = board.apply_move(m)?;

            let score = if i == 0 {
                // Principal variation: full window
                -self.negascout(&child, m, me, ply + 1, -beta, -alpha, -color, stats, rec)?
            } else {
                // Scout with a null window
                stats.null_window_searches += 1;
                let probe =
                    -self.negascout(&child, m, me, ply + 1, -alpha - 1, -alpha, -color, stats, rec)?;
                if alpha < probe && probe < beta {
                    // Probe landed inside the window: full re-search
                    stats.re_searches += 1;
                    -self.negascout(&child, m, me, ply + 1, -beta, -probe, -color, stats, rec)?
                } else {
                    probe
                }
            };

            value = value.max(score);
            alpha = alpha.max(value);
            if alpha >= beta {
                stats.prunes += 1;
                break;
            }
        }

        rec.leave(color * value);
        Ok(value)
    }
}

impl Algorithm for NegaScout {
    fn kind(&self) -> AlgorithmKind {
        AlgorithmKind::NegaScout
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
        let mut alpha = -INF;
        let beta = INF;

        for (i, mov) in board.legal_moves().into_iter().enumerate() {
            let child = board.apply_move(mov)?;

            let score = if i == 0 {
                -self.negascout(&child, mov, me, 1, -beta, -alpha, -1, &mut stats, &mut rec)?
            } else {
                stats.null_window_searches += 1;
                let probe =
                    -self.negascout(&child, mov, me, 1, -alpha - 1, -alpha, -1, &mut stats, &mut rec)?;
                if alpha < probe && probe < beta {
                    stats.re_searches += 1;
                    -self.negascout(&child, mov, me, 1, -beta, -probe, -1, &mut stats, &mut rec)?
                } else {
                    probe
                }
            };

            alternatives.push(MoveScore { mov, score });
            if best.is_none_or(|b| score > b.score) {
                best = Some(MoveScore { mov, score });
            }
            alpha = alpha.max(score);
        }

        let best = best.ok_or_else(|| EngineError::InvalidBoard("no legal moves".into()))?;
        rec.leave(best.score);
        stats.elapsed = start.elapsed();
        debug!(
            "negascout chose ({}, {}) score {} after {} nodes ({} scouts, {} re-searches)",
            best.mov.row,
            best.mov.col,
            best.score,
            stats.nodes,
            stats.null_window_searches,
            stats.re_searches
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
