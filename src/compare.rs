//! Algorithm comparison engine
//!
//! Runs a list of algorithms against the same starting position, each
//! with freshly constructed private state, and reduces the recorded
//! statistics into a [`ComparisonReport`]. Entries keep the input order;
//! a ranking by visited nodes is available on top.
//!
//! The same engine also plays head-to-head matches: a round-robin
//! tournament pits every ordered pair of algorithms against each other
//! over full games from the empty board and aggregates the results into
//! a [`TournamentReport`].

use std::time::{Duration, Instant};

use log::info;
use serde::Serialize;

use crate::board::{Board, GameResult, Mark, Move};
use crate::error::EngineError;
use crate::search::{AlgorithmKind, SearchStats};

/// Coarse classification of a search result for report rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    /// The side to move forces a win
    Win,
    /// The side to move loses against optimal play
    Loss,
    /// Optimal play draws
    Draw,
    /// Depth-capped search that saw no decided line
    Cutoff,
}

/// One algorithm's row in a comparison report.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonEntry {
    pub algorithm: AlgorithmKind,
    pub mov: Move,
    pub score: i32,
    pub outcome: Outcome,
    pub stats: SearchStats,
}

/// Ordered result of one comparison run.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    /// The position every algorithm was asked about
    pub position: Board,
    entries: Vec<ComparisonEntry>,
}

impl ComparisonReport {
    /// Entries in the order the algorithms were requested.
    #[must_use]
    pub fn entries(&self) -> &[ComparisonEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries ranked by visited nodes, fewest first. Ties keep the
    /// input order (stable sort).
    #[must_use]
    pub fn ranked_by_nodes(&self) -> Vec<&ComparisonEntry> {
        let mut ranked: Vec<&ComparisonEntry> = self.entries.iter().collect();
        ranked.sort_by_key(|e| e.stats.nodes);
        ranked
    }
}

/// Result of one full game between two algorithms, X moving first.
#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    pub x: AlgorithmKind,
    pub o: AlgorithmKind,
    pub result: GameResult,
    /// Plies played until the game ended
    pub moves: u32,
    /// Nodes visited by X across all of its turns
    pub nodes_x: u64,
    /// Nodes visited by O across all of its turns
    pub nodes_o: u64,
    pub elapsed: Duration,
    pub final_board: Board,
}

impl MatchResult {
    /// The winning algorithm, if the game was not drawn.
    #[must_use]
    pub fn winner(&self) -> Option<AlgorithmKind> {
        match self.result {
            GameResult::XWins => Some(self.x),
            GameResult::OWins => Some(self.o),
            GameResult::Draw | GameResult::InProgress => None,
        }
    }
}

/// Win/draw/loss tally for one algorithm over a tournament.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Standing {
    pub algorithm: AlgorithmKind,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
}

/// All matches of one round-robin tournament.
#[derive(Debug, Clone, Serialize)]
pub struct TournamentReport {
    matches: Vec<MatchResult>,
}

impl TournamentReport {
    /// Matches in the order they were played.
    #[must_use]
    pub fn matches(&self) -> &[MatchResult] {
        &self.matches
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Tally per algorithm, in first-appearance order.
    #[must_use]
    pub fn standings(&self) -> Vec<Standing> {
        let mut standings: Vec<Standing> = Vec::new();
        let mut entry = |standings: &mut Vec<Standing>, kind: AlgorithmKind| -> usize {
            if let Some(pos) = standings.iter().position(|s| s.algorithm == kind) {
                pos
            } else {
                standings.push(Standing {
                    algorithm: kind,
                    wins: 0,
                    draws: 0,
                    losses: 0,
                });
                standings.len() - 1
            }
        };
        for m in &self.matches {
            let xi = entry(&mut standings, m.x);
            let oi = entry(&mut standings, m.o);
            match m.result {
                GameResult::XWins => {
                    standings[xi].wins += 1;
                    standings[oi].losses += 1;
                }
                GameResult::OWins => {
                    standings[oi].wins += 1;
                    standings[xi].losses += 1;
                }
                GameResult::Draw | GameResult::InProgress => {
                    standings[xi].draws += 1;
                    standings[oi].draws += 1;
                }
            }
        }
        standings
    }
}

/// Runs comparisons. Holds only configuration; every run constructs its
/// algorithms from scratch so no state leaks between runs.
#[derive(Debug, Default)]
pub struct ComparisonEngine {
    depth_limit: Option<u8>,
}

impl ComparisonEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run every deterministic algorithm with this depth cap.
    #[must_use]
    pub fn with_depth_limit(limit: u8) -> Self {
        Self {
            depth_limit: Some(limit),
        }
    }

    /// Run each algorithm on `board`, in order.
    ///
    /// # Errors
    ///
    /// [`EngineError::NoAlgorithms`] for an empty list,
    /// [`EngineError::InvalidBoard`] if the board is already terminal.
    pub fn run(
        &self,
        board: &Board,
        algorithms: &[AlgorithmKind],
    ) -> Result<ComparisonReport, EngineError> {
        if algorithms.is_empty() {
            return Err(EngineError::NoAlgorithms);
        }
        if board.is_terminal() {
            return Err(EngineError::InvalidBoard(format!(
                "game already over: {:?}",
                board.result()
            )));
        }

        let mut entries = Vec::with_capacity(algorithms.len());
        for &kind in algorithms {
            let mut algorithm = kind.build_limited(self.depth_limit);
            let decision = algorithm.choose_move(board)?;
            info!(
                "{}: move ({}, {}) score {} in {:?} ({} nodes)",
                kind,
                decision.mov.row,
                decision.mov.col,
                decision.score,
                decision.stats.elapsed,
                decision.stats.nodes
            );
            entries.push(ComparisonEntry {
                algorithm: kind,
                mov: decision.mov,
                score: decision.score,
                outcome: self.classify(decision.score),
                stats: decision.stats,
            });
        }

        Ok(ComparisonReport {
            position: *board,
            entries,
        })
    }

    /// Play one full game from the empty board, `x` moving first.
    ///
    /// Both sides get freshly constructed engines; the game always ends
    /// within nine plies.
    ///
    /// # Errors
    ///
    /// Propagates any [`EngineError`] raised mid-game; none occur for
    /// the built-in algorithms.
    pub fn play_match(
        &self,
        x: AlgorithmKind,
        o: AlgorithmKind,
    ) -> Result<MatchResult, EngineError> {
        let start = Instant::now();
        let mut engine_x = x.build_limited(self.depth_limit);
        let mut engine_o = o.build_limited(self.depth_limit);

        let mut board = Board::new();
        let mut moves = 0u32;
        let mut nodes_x = 0u64;
        let mut nodes_o = 0u64;

        while !board.is_terminal() {
            let decision = if board.to_move() == Mark::X {
                let decision = engine_x.choose_move(&board)?;
                nodes_x += decision.stats.nodes;
                decision
            } else {
                let decision = engine_o.choose_move(&board)?;
                nodes_o += decision.stats.nodes;
                decision
            };
            board = board.apply_move(decision.mov)?;
            moves += 1;
        }

        let result = board.result();
        info!("{x} (X) vs {o} (O): {result:?} in {moves} moves");
        Ok(MatchResult {
            x,
            o,
            result,
            moves,
            nodes_x,
            nodes_o,
            elapsed: start.elapsed(),
            final_board: board,
        })
    }

    /// Round-robin tournament: every ordered pair of distinct algorithms
    /// plays one game, so each pairing is tried with both colors.
    ///
    /// # Errors
    ///
    /// [`EngineError::NoAlgorithms`] if fewer than two algorithms are
    /// given.
    pub fn run_tournament(
        &self,
        algorithms: &[AlgorithmKind],
    ) -> Result<TournamentReport, EngineError> {
        if algorithms.len() < 2 {
            return Err(EngineError::NoAlgorithms);
        }
        let mut matches = Vec::with_capacity(algorithms.len() * (algorithms.len() - 1));
        for &x in algorithms {
            for &o in algorithms {
                if x != o {
                    matches.push(self.play_match(x, o)?);
                }
            }
        }
        Ok(TournamentReport { matches })
    }

    fn classify(&self, score: i32) -> Outcome {
        match score {
            s if s > 0 => Outcome::Win,
            s if s < 0 => Outcome::Loss,
            _ if self.depth_limit.is_some() => Outcome::Cutoff,
            _ => Outcome::Draw,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(indices: &[usize]) -> Board {
        let mut board = Board::new();
        for &idx in indices {
            board = board.apply_move(Move::from_index(idx)).unwrap();
        }
        board
    }

    #[test]
    fn test_preserves_input_order() {
        let report = ComparisonEngine::new()
            .run(&Board::new(), &[AlgorithmKind::Minimax, AlgorithmKind::Random])
            .unwrap();
        assert_eq!(report.len(), 2);
        assert_eq!(report.entries()[0].algorithm, AlgorithmKind::Minimax);
        assert_eq!(report.entries()[1].algorithm, AlgorithmKind::Random);
        // Random performs no search
        assert_eq!(report.entries()[1].stats.nodes, 0);
    }

    #[test]
    fn test_empty_list_rejected() {
        let err = ComparisonEngine::new().run(&Board::new(), &[]).unwrap_err();
        assert_eq!(err, EngineError::NoAlgorithms);
    }

    #[test]
    fn test_terminal_board_rejected() {
        let board = play(&[0, 3, 1, 4, 2]); // X wins the top row
        let err = ComparisonEngine::new()
            .run(&board, &[AlgorithmKind::Minimax])
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidBoard(_)));
    }

    #[test]
    fn test_deterministic_algorithms_agree() {
        let deterministic = [
            AlgorithmKind::Minimax,
            AlgorithmKind::AlphaBeta,
            AlgorithmKind::AlphaBetaTt,
            AlgorithmKind::AlphaBetaSymmetry,
            AlgorithmKind::NegaScout,
        ];
        for board in [Board::new(), play(&[4]), play(&[0, 4]), play(&[0, 3, 1, 4])] {
            let report = ComparisonEngine::new().run(&board, &deterministic).unwrap();
            let scores: Vec<i32> = report.entries().iter().map(|e| e.score).collect();
            assert!(
                scores.windows(2).all(|w| w[0] == w[1]),
                "evaluations diverge on\n{board}: {scores:?}"
            );
        }
    }

    #[test]
    fn test_win_in_one_classified() {
        let board = play(&[0, 3, 1, 4]);
        let report = ComparisonEngine::new()
            .run(&board, &[AlgorithmKind::AlphaBeta])
            .unwrap();
        let entry = &report.entries()[0];
        assert_eq!(entry.mov, Move::new(0, 2));
        assert_eq!(entry.outcome, Outcome::Win);
    }

    #[test]
    fn test_ranking_sorted_by_nodes() {
        let report = ComparisonEngine::new()
            .run(
                &Board::new(),
                &[AlgorithmKind::Minimax, AlgorithmKind::AlphaBeta, AlgorithmKind::Random],
            )
            .unwrap();
        let ranked = report.ranked_by_nodes();
        assert!(ranked.windows(2).all(|w| w[0].stats.nodes <= w[1].stats.nodes));
        assert_eq!(ranked[0].algorithm, AlgorithmKind::Random);
        assert_eq!(ranked[2].algorithm, AlgorithmKind::Minimax);
    }

    #[test]
    fn test_depth_limited_run_classifies_cutoff() {
        let report = ComparisonEngine::with_depth_limit(2)
            .run(&Board::new(), &[AlgorithmKind::AlphaBeta])
            .unwrap();
        assert_eq!(report.entries()[0].outcome, Outcome::Cutoff);
    }

    #[test]
    fn test_deterministic_match_draws() {
        let m = ComparisonEngine::new()
            .play_match(AlgorithmKind::AlphaBeta, AlgorithmKind::NegaScout)
            .unwrap();
        assert_eq!(m.result, GameResult::Draw);
        assert_eq!(m.moves, 9);
        assert!(m.winner().is_none());
        assert!(m.final_board.is_terminal());
        assert!(m.nodes_x > m.nodes_o); // X searches the bigger trees
    }

    #[test]
    fn test_optimal_play_never_loses_to_random() {
        let engine = ComparisonEngine::new();
        for _ in 0..5 {
            let as_x = engine
                .play_match(AlgorithmKind::AlphaBeta, AlgorithmKind::Random)
                .unwrap();
            assert_ne!(as_x.result, GameResult::OWins);
            assert_eq!(as_x.nodes_o, 0);

            let as_o = engine
                .play_match(AlgorithmKind::Random, AlgorithmKind::AlphaBeta)
                .unwrap();
            assert_ne!(as_o.result, GameResult::XWins);
            assert_eq!(as_o.nodes_x, 0);
        }
    }

    #[test]
    fn test_tournament_plays_all_ordered_pairs() {
        let report = ComparisonEngine::new()
            .run_tournament(&[
                AlgorithmKind::AlphaBetaTt,
                AlgorithmKind::NegaScout,
                AlgorithmKind::Random,
            ])
            .unwrap();
        assert_eq!(report.len(), 6);
        assert_eq!(report.matches()[0].x, AlgorithmKind::AlphaBetaTt);
        assert_eq!(report.matches()[0].o, AlgorithmKind::NegaScout);
    }

    #[test]
    fn test_tournament_requires_two_algorithms() {
        let engine = ComparisonEngine::new();
        assert_eq!(engine.run_tournament(&[]).unwrap_err(), EngineError::NoAlgorithms);
        assert_eq!(
            engine.run_tournament(&[AlgorithmKind::Minimax]).unwrap_err(),
            EngineError::NoAlgorithms
        );
    }

    #[test]
    fn test_standings_tally_draws() {
        // Two perfect players draw both games
        let report = ComparisonEngine::new()
            .run_tournament(&[AlgorithmKind::AlphaBeta, AlgorithmKind::AlphaBetaTt])
            .unwrap();
        let standings = report.standings();
        assert_eq!(standings.len(), 2);
        for s in standings {
            assert_eq!(s.wins, 0);
            assert_eq!(s.losses, 0);
            assert_eq!(s.draws, 2);
        }
    }

    #[test]
    fn test_report_serializes() {
        let report = ComparisonEngine::new()
            .run(&Board::new(), &[AlgorithmKind::AlphaBeta])
            .unwrap();
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("AlphaBeta"));
        assert!(json.contains("........."));
    }
}
