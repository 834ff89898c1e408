//! Random baseline player
//!
//! Picks uniformly among the legal moves with no lookahead at all. Used
//! as the weak baseline in comparisons, not as a serious opponent; its
//! statistics record zero visited nodes.

use std::time::Instant;

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::board::Board;
use crate::error::EngineError;

use super::tree::{NodeKind, TreeRecorder};
use super::{ensure_searchable, Algorithm, AlgorithmKind, Decision, SearchStats};

/// Uniformly random mover.
#[derive(Debug)]
pub struct Random {
    rng: StdRng,
    record_tree: bool,
}

impl Random {
    /// Entropy-seeded instance.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            record_tree: false,
        }
    }

    /// Fixed-seed instance for reproducible games and tests.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            record_tree: false,
        }
    }

    /// Capture the single recorded ply in the returned [`Decision`].
    #[must_use]
    pub fn record_tree(mut self, on: bool) -> Self {
        self.record_tree = on;
        self
    }
}

impl Default for Random {
    fn default() -> Self {
        Self::new()
    }
}

impl Algorithm for Random {
    fn kind(&self) -> AlgorithmKind {
        AlgorithmKind::Random
    }

    fn choose_move(&mut self, board: &Board) -> Result<Decision, EngineError> {
        ensure_searchable(board)?;
        let start = Instant::now();

        let moves = board.legal_moves();
        let mov = moves[self.rng.gen_range(0..moves.len())];
        debug!("random chose ({}, {})", mov.row, mov.col);

        let mut rec = TreeRecorder::new(self.record_tree);
        rec.enter(board, None, NodeKind::Max);
        let child = board.apply_move(mov)?;
        rec.enter(&child, Some(mov), NodeKind::Min);
        rec.leave(0);
        rec.leave(0);

        let stats = SearchStats {
            max_depth: 1,
            elapsed: start.elapsed(),
            ..SearchStats::default()
        };

        Ok(Decision {
            mov,
            score: 0,
            alternatives: Vec::new(),
            stats,
            tree: rec.finish(),
        })
    }
}
