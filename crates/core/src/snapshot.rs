use std::fmt;

use crate::game_state::Phase;
use crate::types::{GridPos, TokenKind};

/// Plain-data copy of the board for observers.
///
/// `cells` is row-major with row 0 (the bottom row) first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSnapshot<K> {
    pub width: i32,
    pub height: i32,
    pub cells: Vec<Option<K>>,
    pub phase: Phase,
    pub episode_id: u32,
    pub seed: u32,
    pub cycles_completed: u32,
}

impl<K: TokenKind> BoardSnapshot<K> {
    pub fn kind_at(&self, pos: GridPos) -> Option<K> {
        if pos.x < 0 || pos.y < 0 || pos.x >= self.width || pos.y >= self.height {
            return None;
        }
        self.cells
            .get((pos.y as usize) * (self.width as usize) + (pos.x as usize))
            .copied()
            .flatten()
    }

    pub fn selection(&self) -> Option<GridPos> {
        match self.phase {
            Phase::Selecting(pos) => Some(pos),
            _ => None,
        }
    }
}

impl<K> Default for BoardSnapshot<K> {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            cells: Vec::new(),
            phase: Phase::Idle,
            episode_id: 0,
            seed: 0,
            cycles_completed: 0,
        }
    }
}

/// Text dump, top row first; `.` marks an empty cell, `*` the selection.
impl<K: TokenKind> fmt::Display for BoardSnapshot<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let selected = self.selection();
        for y in (0..self.height).rev() {
            for x in 0..self.width {
                let pos = GridPos::new(x, y);
                let glyph = self.kind_at(pos).map(|kind| kind.glyph()).unwrap_or('.');
                let marker = if selected == Some(pos) { '*' } else { ' ' };
                write!(f, "{}{}", glyph, marker)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
