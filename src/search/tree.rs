//! Decision-tree capture for visualization
//!
//! The external presentation layer can ask for the full recursion of a
//! completed search as data. Rather than re-deriving anything from call
//! stacks, each searcher threads a [`TreeRecorder`] through its recursion;
//! when recording is enabled the recorder builds a flat arena of nodes
//! which is folded into a nested [`TreeNode`] at the end of the search.
//!
//! Recording is off by default: a disabled recorder is a no-op and costs
//! nothing beyond a branch per node.

use serde::Serialize;

use crate::board::{Board, Move};

/// Role of a node in the search tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NodeKind {
    /// Side to move is maximizing
    Max,
    /// Side to move is minimizing
    Min,
    /// Game over (or depth cap reached)
    Terminal,
}

/// One node of a recorded decision tree.
///
/// Scores are from the root player's perspective. `mov` is the move that
/// led from the parent to this node (`None` at the root).
#[derive(Debug, Clone, Serialize)]
pub struct TreeNode {
    pub board: Board,
    pub mov: Option<Move>,
    pub kind: NodeKind,
    pub score: i32,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Total node count including this one.
    #[must_use]
    pub fn total_nodes(&self) -> usize {
        1 + self.children.iter().map(TreeNode::total_nodes).sum::<usize>()
    }

    /// Number of terminal nodes in the tree.
    #[must_use]
    pub fn terminal_nodes(&self) -> usize {
        if self.kind == NodeKind::Terminal {
            1
        } else {
            self.children.iter().map(TreeNode::terminal_nodes).sum()
        }
    }

    /// Depth of the deepest node, root = 0.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.children
            .iter()
            .map(|c| 1 + c.max_depth())
            .max()
            .unwrap_or(0)
    }
}

/// Arena entry while the search is still running.
#[derive(Debug, Clone)]
struct ArenaNode {
    board: Board,
    mov: Option<Move>,
    kind: NodeKind,
    score: i32,
    children: Vec<usize>,
}

/// Collects search nodes as the recursion runs.
///
/// Usage is strictly bracketed: `enter` on the way down, `leave` with the
/// final score on the way up. `finish` consumes the recorder and returns
/// the nested tree.
#[derive(Debug)]
pub struct TreeRecorder {
    enabled: bool,
    arena: Vec<ArenaNode>,
    stack: Vec<usize>,
}

impl TreeRecorder {
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            arena: Vec::new(),
            stack: Vec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Open a node. The parent is whatever node is currently open.
    pub fn enter(&mut self, board: &Board, mov: Option<Move>, kind: NodeKind) {
        if !self.enabled {
            return;
        }
        let id = self.arena.len();
        self.arena.push(ArenaNode {
            board: *board,
            mov,
            kind,
            score: 0,
            children: Vec::new(),
        });
        if let Some(&parent) = self.stack.last() {
            self.arena[parent].children.push(id);
        }
        self.stack.push(id);
    }

    /// Close the current node, fixing its score.
    pub fn leave(&mut self, score: i32) {
        if !self.enabled {
            return;
        }
        if let Some(id) = self.stack.pop() {
            self.arena[id].score = score;
        }
    }

    /// Fold the arena into a nested tree. Returns `None` when recording
    /// was disabled or nothing was recorded.
    #[must_use]
    pub fn finish(self) -> Option<TreeNode> {
        if !self.enabled || self.arena.is_empty() {
            return None;
        }
        debug_assert!(self.stack.is_empty(), "unbalanced enter/leave");
        Some(build_node(&self.arena, 0))
    }
}

fn build_node(arena: &[ArenaNode], id: usize) -> TreeNode {
    let node = &arena[id];
    TreeNode {
        board: node.board,
        mov: node.mov,
        kind: node.kind,
        score: node.score,
        children: node.children.iter().map(|&c| build_node(arena, c)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_recorder_produces_nothing() {
        let mut rec = TreeRecorder::new(false);
        rec.enter(&Board::new(), None, NodeKind::Max);
        rec.leave(0);
        assert!(rec.finish().is_none());
    }

    #[test]
    fn test_nested_structure() {
        let board = Board::new();
        let mut rec = TreeRecorder::new(true);
        rec.enter(&board, None, NodeKind::Max);
        {
            let child = board.apply_move(Move::new(0, 0)).unwrap();
            rec.enter(&child, Some(Move::new(0, 0)), NodeKind::Min);
            rec.leave(-1);
            let child = board.apply_move(Move::new(1, 1)).unwrap();
            rec.enter(&child, Some(Move::new(1, 1)), NodeKind::Min);
            rec.leave(0);
        }
        rec.leave(0);

        let tree = rec.finish().unwrap();
        assert_eq!(tree.total_nodes(), 3);
        assert_eq!(tree.max_depth(), 1);
        assert_eq!(tree.children.len(), 2);
        assert_eq!(tree.children[0].score, -1);
        assert_eq!(tree.children[0].mov, Some(Move::new(0, 0)));
        assert_eq!(tree.children[1].score, 0);
    }

    #[test]
    fn test_terminal_count() {
        let board = Board::new();
        let mut rec = TreeRecorder::new(true);
        rec.enter(&board, None, NodeKind::Max);
        rec.enter(&board, Some(Move::new(0, 0)), NodeKind::Terminal);
        rec.leave(1);
        rec.leave(1);
        let tree = rec.finish().unwrap();
        assert_eq!(tree.terminal_nodes(), 1);
    }

    #[test]
    fn test_serializes_to_json() {
        let mut rec = TreeRecorder::new(true);
        rec.enter(&Board::new(), None, NodeKind::Max);
        rec.leave(0);
        let tree = rec.finish().unwrap();
        let json = serde_json::to_string(&tree).unwrap();
        assert!(json.contains("\"Max\""));
        assert!(json.contains("........."));
    }
}
