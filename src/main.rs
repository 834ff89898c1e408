//! Tic-tac-toe search engine CLI
//!
//! A command-line demonstration of the engine: compares every algorithm
//! on a few positions and shows the recorded decision tree of a small
//! endgame.

use velha::{AlgorithmKind, Board, ComparisonEngine, ComparisonReport, EngineError, Move};

fn main() -> Result<(), EngineError> {
    env_logger::init();

    println!("===========================================");
    println!("   Tic-Tac-Toe Search Engine v0.1.0");
    println!("===========================================\n");

    println!("--- Scenario 1: Empty Board ---");
    run_comparison(&Board::new())?;

    println!("\n--- Scenario 2: Win in One ---");
    // X X . / O O . / . . .  with X to move
    let mut board = Board::new();
    for (r, c) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
        board = board.apply_move(Move::new(r, c))?;
    }
    print!("{board}");
    run_comparison(&board)?;

    println!("\n--- Scenario 3: Depth-Capped Search ---");
    let report = ComparisonEngine::with_depth_limit(3)
        .run(&Board::new(), &[AlgorithmKind::Minimax, AlgorithmKind::AlphaBeta])?;
    print_report(&report);

    println!("\n--- Scenario 4: Decision Tree ---");
    show_decision_tree()?;

    println!("\n--- Scenario 5: Round-Robin Tournament ---");
    run_tournament()?;

    println!("\n===========================================");
    println!("            All Scenarios Done");
    println!("===========================================");
    Ok(())
}

fn run_comparison(board: &Board) -> Result<(), EngineError> {
    let report = ComparisonEngine::new().run(board, &AlgorithmKind::ALL)?;
    print_report(&report);

    println!("  Ranking by visited nodes:");
    for (i, entry) in report.ranked_by_nodes().iter().enumerate() {
        println!("    {}. {}", i + 1, entry.algorithm);
    }
    Ok(())
}

fn print_report(report: &ComparisonReport) {
    println!(
        "  {:<22} {:>8} {:>7} {:>8} {:>9} {:>10}",
        "algorithm", "nodes", "prunes", "tt hits", "move", "score"
    );
    for entry in report.entries() {
        println!(
            "  {:<22} {:>8} {:>7} {:>8} {:>9} {:>10}",
            entry.algorithm,
            entry.stats.nodes,
            entry.stats.prunes,
            entry.stats.tt_hits,
            format!("({}, {})", entry.mov.row, entry.mov.col),
            entry.score
        );
    }
}

fn run_tournament() -> Result<(), EngineError> {
    let report = ComparisonEngine::new().run_tournament(&[
        AlgorithmKind::AlphaBeta,
        AlgorithmKind::NegaScout,
        AlgorithmKind::Random,
    ])?;

    for m in report.matches() {
        println!(
            "  {} (X) vs {} (O): {:?} in {} moves",
            m.x, m.o, m.result, m.moves
        );
    }

    println!("  Standings:");
    for s in report.standings() {
        println!(
            "    {:<22} {}W {}D {}L",
            s.algorithm, s.wins, s.draws, s.losses
        );
    }
    Ok(())
}

fn show_decision_tree() -> Result<(), EngineError> {
    use velha::search::Minimax;
    use velha::Algorithm;

    // X O X / O X . / . . O  with X to move: three empty cells
    let mut board = Board::new();
    for idx in [0, 1, 2, 3, 4, 8] {
        board = board.apply_move(Move::from_index(idx))?;
    }
    print!("{board}");

    let decision = Minimax::new().record_tree(true).choose_move(&board)?;
    if let Some(tree) = &decision.tree {
        println!("  Recorded tree: {} nodes, depth {}, {} terminal",
            tree.total_nodes(),
            tree.max_depth(),
            tree.terminal_nodes()
        );
        match serde_json::to_string(tree) {
            Ok(json) => println!("  JSON ({} bytes): {json}", json.len()),
            Err(e) => println!("  serialization failed: {e}"),
        }
    }
    println!(
        "  Chosen move ({}, {}), evaluation {}",
        decision.mov.row, decision.mov.col, decision.score
    );
    Ok(())
}
