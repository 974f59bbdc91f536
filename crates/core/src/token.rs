//! Token module - the value held by an occupied grid cell
//!
//! A token knows its kind, its id and where it sits. It does not know the
//! grid: the grid owns tokens by value. Moving a token therefore takes two
//! writes (the cell and the token's stored coordinates); use
//! [`Grid::place_token`] and [`Grid::swap_tokens`], which always do both.

use crate::grid::Grid;
use crate::types::{GridPos, TokenId, TokenKind};
use crate::Result;

/// One gem on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token<K> {
    id: TokenId,
    kind: K,
    pos: GridPos,
}

impl<K: TokenKind> Token<K> {
    pub fn new(id: TokenId, kind: K, pos: GridPos) -> Self {
        Self { id, kind, pos }
    }

    pub fn id(&self) -> TokenId {
        self.id
    }

    pub fn kind(&self) -> K {
        self.kind
    }

    pub fn set_kind(&mut self, kind: K) {
        self.kind = kind;
    }

    /// Coordinates the token believes it occupies
    pub fn position(&self) -> GridPos {
        self.pos
    }

    /// Overwrite the stored coordinates without touching any grid.
    pub fn update_position(&mut self, pos: GridPos) {
        self.pos = pos;
    }
}

impl<K: TokenKind> Grid<Token<K>> {
    /// Kind of the token at `pos`, `None` when the cell is empty or out of bounds
    pub fn kind_at(&self, pos: GridPos) -> Option<K> {
        self.get(pos.x, pos.y).ok().flatten().map(Token::kind)
    }

    /// Store `token` at `pos` and stamp `pos` into it.
    ///
    /// Returns whatever occupied the cell before.
    pub fn place_token(&mut self, pos: GridPos, mut token: Token<K>) -> Result<Option<Token<K>>> {
        token.update_position(pos);
        self.set(pos.x, pos.y, Some(token))
    }

    /// Exchange the contents of two cells, keeping stored coordinates in sync.
    pub fn swap_tokens(&mut self, a: GridPos, b: GridPos) -> Result<()> {
        self.swap(a, b)?;
        if let Some(token) = self.get_mut(a.x, a.y)? {
            token.update_position(a);
        }
        if let Some(token) = self.get_mut(b.x, b.y)? {
            token.update_position(b);
        }
        Ok(())
    }

    /// True when every occupied cell's token reports that cell's coordinates.
    pub fn tokens_consistent(&self) -> bool {
        self.iter_occupied()
            .all(|(pos, token)| token.position() == pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GemKind;

    fn token(id: u32, kind: GemKind, x: i32, y: i32) -> Token<GemKind> {
        Token::new(TokenId(id), kind, GridPos::new(x, y))
    }

    #[test]
    fn accessors() {
        let mut t = token(7, GemKind::Red, 1, 2);
        assert_eq!(t.id(), TokenId(7));
        assert_eq!(t.kind(), GemKind::Red);
        t.set_kind(GemKind::Blue);
        assert_eq!(t.kind(), GemKind::Blue);
        t.update_position(GridPos::new(4, 4));
        assert_eq!(t.position(), GridPos::new(4, 4));
    }

    #[test]
    fn place_token_stamps_position() {
        let mut grid = Grid::vertical(3, 3, 1.0, glam::Vec3::ZERO).unwrap();
        grid.place_token(GridPos::new(2, 1), token(1, GemKind::Red, 0, 0))
            .unwrap();
        let stored = grid.get(2, 1).unwrap().unwrap();
        assert_eq!(stored.position(), GridPos::new(2, 1));
        assert!(grid.tokens_consistent());
    }

    #[test]
    fn swap_tokens_updates_both() {
        let mut grid = Grid::vertical(3, 3, 1.0, glam::Vec3::ZERO).unwrap();
        grid.place_token(GridPos::new(0, 0), token(1, GemKind::Red, 0, 0))
            .unwrap();
        grid.place_token(GridPos::new(1, 0), token(2, GemKind::Blue, 1, 0))
            .unwrap();

        grid.swap_tokens(GridPos::new(0, 0), GridPos::new(1, 0)).unwrap();

        assert_eq!(grid.kind_at(GridPos::new(0, 0)), Some(GemKind::Blue));
        assert_eq!(grid.kind_at(GridPos::new(1, 0)), Some(GemKind::Red));
        assert!(grid.tokens_consistent());
    }

    #[test]
    fn swap_with_empty_cell() {
        let mut grid = Grid::vertical(2, 2, 1.0, glam::Vec3::ZERO).unwrap();
        grid.place_token(GridPos::new(0, 0), token(1, GemKind::Red, 0, 0))
            .unwrap();
        grid.swap_tokens(GridPos::new(0, 0), GridPos::new(1, 1)).unwrap();
        assert_eq!(grid.kind_at(GridPos::new(0, 0)), None);
        assert_eq!(grid.kind_at(GridPos::new(1, 1)), Some(GemKind::Red));
        assert!(grid.tokens_consistent());
    }

    #[test]
    fn detects_stale_coordinates() {
        let mut grid = Grid::vertical(2, 1, 1.0, glam::Vec3::ZERO).unwrap();
        grid.set(0, 0, Some(token(1, GemKind::Red, 1, 0))).unwrap();
        assert!(!grid.tokens_consistent());
    }
}
