//! Match detection - finds runs of three or more same-kind tokens
//!
//! Detection slides a three-cell window over every row and every column.
//! A window matches when all three cells are occupied by the same kind; the
//! cells of every matching window are unioned into one [`MatchSet`]. Longer
//! runs are covered because their windows overlap.
//!
//! Everything here is read-only over the grid.

use crate::grid::Grid;
use crate::token::Token;
use crate::types::{GridPos, TokenKind, MATCH_RUN};

/// Deduplicated set of matched cells.
///
/// Iteration order is discovery order: the horizontal pass row by row, then
/// the vertical pass column by column. A cell found by both passes keeps its
/// first (horizontal) slot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MatchSet {
    width: i32,
    positions: Vec<GridPos>,
    mask: Vec<bool>,
}

impl MatchSet {
    fn with_dimensions(width: i32, height: i32) -> Self {
        Self {
            width,
            positions: Vec::new(),
            mask: vec![false; (width.max(0) as usize) * (height.max(0) as usize)],
        }
    }

    fn slot(&self, pos: GridPos) -> Option<usize> {
        if pos.x < 0 || pos.y < 0 || pos.x >= self.width {
            return None;
        }
        let idx = (pos.y as usize) * (self.width as usize) + (pos.x as usize);
        (idx < self.mask.len()).then_some(idx)
    }

    fn insert(&mut self, pos: GridPos) {
        if let Some(idx) = self.slot(pos) {
            if !self.mask[idx] {
                self.mask[idx] = true;
                self.positions.push(pos);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn contains(&self, pos: GridPos) -> bool {
        self.slot(pos).map(|idx| self.mask[idx]).unwrap_or(false)
    }

    pub fn iter(&self) -> impl Iterator<Item = GridPos> + '_ {
        self.positions.iter().copied()
    }

    pub fn positions(&self) -> &[GridPos] {
        &self.positions
    }
}

fn window_matches<K: TokenKind>(grid: &Grid<Token<K>>, cells: [GridPos; 3]) -> bool {
    let [a, b, c] = cells.map(|p| grid.kind_at(p));
    match (a, b, c) {
        (Some(a), Some(b), Some(c)) => a == b && b == c,
        _ => false,
    }
}

/// Find every cell that belongs to a horizontal or vertical run of 3+.
pub fn find_matches<K: TokenKind>(grid: &Grid<Token<K>>) -> MatchSet {
    let (width, height) = (grid.width(), grid.height());
    let mut matches = MatchSet::with_dimensions(width, height);

    // Horizontal
    for y in 0..height {
        for x in 0..=(width - MATCH_RUN) {
            let cells = [
                GridPos::new(x, y),
                GridPos::new(x + 1, y),
                GridPos::new(x + 2, y),
            ];
            if window_matches(grid, cells) {
                cells.into_iter().for_each(|p| matches.insert(p));
            }
        }
    }

    // Vertical
    for x in 0..width {
        for y in 0..=(height - MATCH_RUN) {
            let cells = [
                GridPos::new(x, y),
                GridPos::new(x, y + 1),
                GridPos::new(x, y + 2),
            ];
            if window_matches(grid, cells) {
                cells.into_iter().for_each(|p| matches.insert(p));
            }
        }
    }

    matches
}

/// Whether any run of 3+ exists anywhere on the grid.
pub fn has_matches<K: TokenKind>(grid: &Grid<Token<K>>) -> bool {
    !find_matches(grid).is_empty()
}

/// First adjacent swap that would produce at least one match.
///
/// Cells are scanned row-major; for each cell the right neighbour is tried
/// before the upper one. The grid is probed on a scratch copy and left
/// untouched.
pub fn find_swap_with_match<K: TokenKind>(grid: &Grid<Token<K>>) -> Option<(GridPos, GridPos)> {
    let mut scratch = grid.clone();
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let a = GridPos::new(x, y);
            for b in [a.offset(1, 0), a.offset(0, 1)] {
                if !scratch.is_occupied(a) || !scratch.is_occupied(b) {
                    continue;
                }
                if scratch.kind_at(a) == scratch.kind_at(b) {
                    continue;
                }
                // Both cells are in bounds here, so the swaps cannot fail.
                let _ = scratch.swap_tokens(a, b);
                let found = has_matches(&scratch);
                let _ = scratch.swap_tokens(a, b);
                if found {
                    return Some((a, b));
                }
            }
        }
    }
    None
}
