//! D4 symmetry canonicalization
//!
//! The square board has 8 symmetries (4 rotations, 4 reflections). Two
//! boards related by one of them are strategically identical, so the
//! symmetry-aware search variant keys its transposition table by the
//! canonical representative: the numerically smallest packed encoding
//! among the 8 transforms.
//!
//! Cell indices:
//!
//! ```text
//!  0 | 1 | 2
//! -----------
//!  3 | 4 | 5
//! -----------
//!  6 | 7 | 8
//! ```

use crate::board::{Board, Move, TOTAL_CELLS};

/// Canonical transposition-table key: the smallest packed board encoding
/// over all 8 symmetric transforms (see [`Board::key`]).
pub type CanonicalKey = u32;

/// One of the 8 operations of the D4 dihedral group.
///
/// Each variant carries a permutation `map` with the meaning
/// `transformed[i] = original[map[i]]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum Transform {
    Identity,
    Rotate90,
    Rotate180,
    Rotate270,
    FlipHorizontal,
    FlipVertical,
    FlipMainDiagonal,
    FlipAntiDiagonal,
}

impl Transform {
    /// All 8 symmetries, identity first (ties in canonicalization resolve
    /// to the earliest transform in this order).
    pub const ALL: [Transform; 8] = [
        Transform::Identity,
        Transform::Rotate90,
        Transform::Rotate180,
        Transform::Rotate270,
        Transform::FlipHorizontal,
        Transform::FlipVertical,
        Transform::FlipMainDiagonal,
        Transform::FlipAntiDiagonal,
    ];

    /// Permutation table: `transformed[i] = original[map[i]]`.
    #[inline]
    const fn map(self) -> [usize; TOTAL_CELLS] {
        match self {
            Transform::Identity => [0, 1, 2, 3, 4, 5, 6, 7, 8],
            Transform::Rotate90 => [6, 3, 0, 7, 4, 1, 8, 5, 2],
            Transform::Rotate180 => [8, 7, 6, 5, 4, 3, 2, 1, 0],
            Transform::Rotate270 => [2, 5, 8, 1, 4, 7, 0, 3, 6],
            Transform::FlipHorizontal => [2, 1, 0, 5, 4, 3, 8, 7, 6],
            Transform::FlipVertical => [6, 7, 8, 3, 4, 5, 0, 1, 2],
            Transform::FlipMainDiagonal => [0, 3, 6, 1, 4, 7, 2, 5, 8],
            Transform::FlipAntiDiagonal => [8, 5, 2, 7, 4, 1, 6, 3, 0],
        }
    }

    /// The transform that undoes this one. Only the quarter-turns are not
    /// their own inverse.
    #[inline]
    #[must_use]
    pub fn inverse(self) -> Transform {
        match self {
            Transform::Rotate90 => Transform::Rotate270,
            Transform::Rotate270 => Transform::Rotate90,
            other => other,
        }
    }

    /// Apply this transform to a board.
    #[must_use]
    pub fn apply_board(self, board: &Board) -> Board {
        let map = self.map();
        let (x, o) = board.masks();
        Board::from_masks(permute_mask(x, &map), permute_mask(o, &map))
    }

    /// Where a cell of the original board lands on the transformed board.
    #[must_use]
    pub fn apply_move(self, mov: Move) -> Move {
        Move::from_index(self.inverse().map()[mov.to_index()])
    }

    /// Map a move on the transformed board back to the original
    /// orientation. Inverse of [`Transform::apply_move`].
    #[must_use]
    pub fn unapply_move(self, mov: Move) -> Move {
        Move::from_index(self.map()[mov.to_index()])
    }
}

/// Apply a cell permutation to an occupancy mask.
fn permute_mask(mask: u16, map: &[usize; TOTAL_CELLS]) -> u16 {
    let mut out = 0u16;
    for (i, &src) in map.iter().enumerate() {
        if mask & (1 << src) != 0 {
            out |= 1 << i;
        }
    }
    out
}

/// Canonicalize a board under the D4 group.
///
/// Returns the smallest packed key over all 8 transforms, together with
/// the transform that produces it. Symmetry-equivalent boards always map
/// to the same key; a cached move found on the canonical board maps back
/// to the caller's orientation via [`Transform::unapply_move`] on the
/// returned transform.
#[must_use]
pub fn canonicalize(board: &Board) -> (CanonicalKey, Transform) {
    let mut best_key = board.key();
    let mut best_transform = Transform::Identity;
    for &t in Transform::ALL.iter().skip(1) {
        let key = t.apply_board(board).key();
        if key < best_key {
            best_key = key;
            best_transform = t;
        }
    }
    (best_key, best_transform)
}
