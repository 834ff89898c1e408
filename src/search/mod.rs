//! Search algorithms over the shared board model
//!
//! Six variants are implemented behind one capability, [`Algorithm`]:
//!
//! - [`Minimax`]: exhaustive baseline, no pruning
//! - [`AlphaBeta`]: window pruning, identical move and score to Minimax
//! - [`AlphaBetaTt`]: Alpha-Beta plus a plain-key transposition table
//! - [`AlphaBetaSymmetry`]: Alpha-Beta plus a D4-canonical transposition
//!   table, merging symmetry-equivalent subtrees
//! - [`NegaScout`]: principal-variation search with null-window scouts
//! - [`Random`]: uniform baseline opponent, no search
//!
//! Every deterministic variant agrees on the evaluation of every position;
//! they differ only in how much of the tree they visit, which is what
//! [`SearchStats`] measures. Ties between equally good moves are broken
//! by the fixed row-major move order of
//! [`Board::legal_moves`](crate::board::Board::legal_moves).

pub mod alphabeta;
pub mod minimax;
pub mod negascout;
pub mod random;
pub mod tree;
pub mod tt;

// Re-exports
pub use alphabeta::{AlphaBeta, AlphaBetaSymmetry, AlphaBetaTt};
pub use minimax::Minimax;
pub use negascout::NegaScout;
pub use random::Random;
pub use tree::{NodeKind, TreeNode, TreeRecorder};
pub use tt::{Bound, TranspositionTable, TtEntry};

use std::time::Duration;

use serde::Serialize;

use crate::board::{Board, Move};
use crate::error::EngineError;

/// One above any reachable evaluation (scores are -1, 0 or +1).
pub const INF: i32 = 2;

/// Per-invocation search counters.
///
/// Created at the start of a `choose_move` call, owned by that call, and
/// returned inside the [`Decision`]. Counters an algorithm does not use
/// stay zero (e.g. `tt_hits` for plain Minimax).
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchStats {
    /// Interior and leaf nodes visited by the recursion
    pub nodes: u64,
    /// Terminal (or depth-capped) evaluations
    pub leaves: u64,
    /// Beta cutoffs
    pub prunes: u64,
    /// Transposition table probes
    pub tt_probes: u64,
    /// Probes that returned a usable score
    pub tt_hits: u64,
    /// Positions stored in the table
    pub tt_stores: u64,
    /// Root moves answered from a symmetry-equivalent sibling
    pub symmetry_hits: u64,
    /// Null-window scout searches (NegaScout)
    pub null_window_searches: u64,
    /// Scouts that had to be re-searched with a full window (NegaScout)
    pub re_searches: u64,
    /// Deepest ply reached, root = 0
    pub max_depth: u8,
    /// Wall-clock duration of the call
    pub elapsed: Duration,
}

impl SearchStats {
    /// Share of probes that produced a usable score, as a percentage.
    #[must_use]
    pub fn tt_hit_rate(&self) -> f64 {
        if self.tt_probes == 0 {
            0.0
        } else {
            self.tt_hits as f64 / self.tt_probes as f64 * 100.0
        }
    }

    #[inline]
    pub(crate) fn visit(&mut self, ply: u8) {
        self.nodes += 1;
        if ply > self.max_depth {
            self.max_depth = ply;
        }
    }
}

/// A root move together with the score the search assigned it.
///
/// Scores of moves rejected inside a narrowed window may be bounds rather
/// than exact values; the chosen move's score is always exact.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MoveScore {
    pub mov: Move,
    pub score: i32,
}

/// Result of one `choose_move` invocation.
#[derive(Debug, Clone, Serialize)]
pub struct Decision {
    /// The chosen move
    pub mov: Move,
    /// Its evaluation from the mover's perspective
    pub score: i32,
    /// Every root move with its (possibly bounded) score
    pub alternatives: Vec<MoveScore>,
    /// Counters for this invocation
    pub stats: SearchStats,
    /// Full decision tree, when recording was enabled
    pub tree: Option<TreeNode>,
}

/// The one capability all variants share: given a non-terminal board,
/// return the best move for the side to move and its evaluation.
///
/// Implementations own their mutable search state (tables, RNG); nothing
/// is shared between two algorithm instances, so separate runs can never
/// contaminate each other's statistics.
pub trait Algorithm {
    /// Which variant this is.
    fn kind(&self) -> AlgorithmKind;

    /// Choose a move for `board.to_move()`.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidBoard`] if the board is already terminal.
    fn choose_move(&mut self, board: &Board) -> Result<Decision, EngineError>;
}

/// Identifier for each search variant, the registry the presentation
/// layer selects algorithms by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AlgorithmKind {
    Minimax,
    AlphaBeta,
    AlphaBetaTt,
    AlphaBetaSymmetry,
    NegaScout,
    Random,
}

impl AlgorithmKind {
    /// All variants, strongest-baseline first.
    pub const ALL: [AlgorithmKind; 6] = [
        AlgorithmKind::Minimax,
        AlgorithmKind::AlphaBeta,
        AlgorithmKind::AlphaBetaTt,
        AlgorithmKind::AlphaBetaSymmetry,
        AlgorithmKind::NegaScout,
        AlgorithmKind::Random,
    ];

    /// Stable string identifier.
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            AlgorithmKind::Minimax => "minimax",
            AlgorithmKind::AlphaBeta => "alpha-beta",
            AlgorithmKind::AlphaBetaTt => "alpha-beta-tt",
            AlgorithmKind::AlphaBetaSymmetry => "alpha-beta-symmetry",
            AlgorithmKind::NegaScout => "negascout",
            AlgorithmKind::Random => "random",
        }
    }

    /// Look up a variant by identifier.
    ///
    /// # Errors
    ///
    /// [`EngineError::UnknownAlgorithm`] for unrecognized identifiers.
    pub fn from_id(id: &str) -> Result<Self, EngineError> {
        Self::ALL
            .into_iter()
            .find(|k| k.id() == id)
            .ok_or_else(|| EngineError::UnknownAlgorithm(id.to_string()))
    }

    /// Construct a fresh instance with private state.
    #[must_use]
    pub fn build(self) -> Box<dyn Algorithm> {
        match self {
            AlgorithmKind::Minimax => Box::new(Minimax::new()),
            AlgorithmKind::AlphaBeta => Box::new(AlphaBeta::new()),
            AlgorithmKind::AlphaBetaTt => Box::new(AlphaBetaTt::new()),
            AlgorithmKind::AlphaBetaSymmetry => Box::new(AlphaBetaSymmetry::new()),
            AlgorithmKind::NegaScout => Box::new(NegaScout::new()),
            AlgorithmKind::Random => Box::new(Random::new()),
        }
    }

    /// Construct a fresh instance with an optional depth cap. Random has
    /// no search to cap and ignores the limit.
    #[must_use]
    pub fn build_limited(self, depth_limit: Option<u8>) -> Box<dyn Algorithm> {
        let Some(limit) = depth_limit else {
            return self.build();
        };
        match self {
            AlgorithmKind::Minimax => Box::new(Minimax::with_depth_limit(limit)),
            AlgorithmKind::AlphaBeta => Box::new(AlphaBeta::with_depth_limit(limit)),
            AlgorithmKind::AlphaBetaTt => Box::new(AlphaBetaTt::with_depth_limit(limit)),
            AlgorithmKind::AlphaBetaSymmetry => {
                Box::new(AlphaBetaSymmetry::with_depth_limit(limit))
            }
            AlgorithmKind::NegaScout => Box::new(NegaScout::with_depth_limit(limit)),
            AlgorithmKind::Random => Box::new(Random::new()),
        }
    }
}

impl std::fmt::Display for AlgorithmKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AlgorithmKind::Minimax => "Minimax",
            AlgorithmKind::AlphaBeta => "Alpha-Beta",
            AlgorithmKind::AlphaBetaTt => "Alpha-Beta + TT",
            AlgorithmKind::AlphaBetaSymmetry => "Alpha-Beta + Symmetry",
            AlgorithmKind::NegaScout => "NegaScout",
            AlgorithmKind::Random => "Random",
        };
        f.pad(name)
    }
}

/// Reject terminal boards at the top of every search.
pub(crate) fn ensure_searchable(board: &Board) -> Result<(), EngineError> {
    if board.is_terminal() {
        return Err(EngineError::InvalidBoard(format!(
            "game already over: {:?}",
            board.result()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algorithm_ids_roundtrip() {
        for kind in AlgorithmKind::ALL {
            assert_eq!(AlgorithmKind::from_id(kind.id()).unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_id() {
        assert!(matches!(
            AlgorithmKind::from_id("mcts"),
            Err(EngineError::UnknownAlgorithm(_))
        ));
    }

    #[test]
    fn test_build_matches_kind() {
        for kind in AlgorithmKind::ALL {
            assert_eq!(kind.build().kind(), kind);
        }
    }

    #[test]
    fn test_terminal_board_rejected() {
        let mut board = Board::new();
        for idx in [0, 3, 1, 4, 2] {
            board = board.apply_move(Move::from_index(idx)).unwrap();
        }
        assert!(board.is_terminal());
        for kind in AlgorithmKind::ALL {
            let err = kind.build().choose_move(&board).unwrap_err();
            assert!(matches!(err, EngineError::InvalidBoard(_)), "{kind}");
        }
    }

    #[test]
    fn test_tt_hit_rate() {
        let stats = SearchStats {
            tt_probes: 4,
            tt_hits: 1,
            ..SearchStats::default()
        };
        assert!((stats.tt_hit_rate() - 25.0).abs() < f64::EPSILON);
        assert_eq!(SearchStats::default().tt_hit_rate(), 0.0);
    }
}
