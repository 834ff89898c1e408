//! Tic-tac-toe adversarial search engine
//!
//! A study of classic two-player search algorithms on the 3x3 board:
//! Minimax, Alpha-Beta, Alpha-Beta with a transposition table, Alpha-Beta
//! with D4-symmetry reduction, NegaScout and a Random baseline, all
//! behind one `choose_move` capability, plus a decision-tree recorder and
//! an algorithm-comparison report engine.
//!
//! The game itself is trivially small (5,478 reachable positions), so the
//! interest is in implementing the variants correctly over one shared
//! board model and measuring how much of the tree each of them actually
//! visits.
//!
//! # Architecture
//!
//! - [`board`]: immutable board value type, move generation, terminal
//!   test, scoring
//! - [`symmetry`]: D4 canonicalization and move transforms
//! - [`search`]: the six algorithm variants, transposition table,
//!   statistics and decision-tree capture
//! - [`compare`]: runs several algorithms on one position and reduces
//!   their statistics into a ranked report; also plays round-robin
//!   tournaments between them
//! - [`error`]: boundary error types
//!
//! # Quick Start
//!
//! ```
//! use velha::{Algorithm, AlgorithmKind, Board, Move};
//!
//! let board = Board::new().apply_move(Move::new(1, 1)).unwrap();
//!
//! // O responds with perfect play
//! let mut engine = AlgorithmKind::AlphaBeta.build();
//! let decision = engine.choose_move(&board).unwrap();
//! println!(
//!     "O plays at ({}, {}), evaluation {}",
//!     decision.mov.row, decision.mov.col, decision.score
//! );
//! ```
//!
//! # Comparing algorithms
//!
//! ```
//! use velha::{AlgorithmKind, Board, ComparisonEngine};
//!
//! let report = ComparisonEngine::new()
//!     .run(&Board::new(), &[AlgorithmKind::AlphaBeta, AlgorithmKind::Random])
//!     .unwrap();
//! for entry in report.entries() {
//!     println!("{}: {} nodes", entry.algorithm, entry.stats.nodes);
//! }
//! ```

pub mod board;
pub mod compare;
pub mod error;
pub mod search;
pub mod symmetry;

// Re-export commonly used types for convenience
pub use board::{Board, GameResult, Mark, Move, BOARD_SIZE};
pub use compare::{
    ComparisonEngine, ComparisonEntry, ComparisonReport, MatchResult, Outcome, Standing,
    TournamentReport,
};
pub use error::EngineError;
pub use search::{Algorithm, AlgorithmKind, Decision, SearchStats, TreeNode};
pub use symmetry::{canonicalize, CanonicalKey, Transform};
