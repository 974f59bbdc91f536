//! Board configuration, fixed at construction.

use std::sync::Arc;

use glam::Vec3;

use crate::converter::{CoordinateConverter, VerticalConverter};
use crate::types::{GemKind, TokenKind, DEFAULT_CELL_SIZE, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::{Error, Result};

/// Everything needed to build a board.
#[derive(Debug, Clone)]
pub struct BoardConfig<K> {
    pub width: i32,
    pub height: i32,
    pub cell_size: f32,
    pub origin: Vec3,
    /// Kinds drawn (uniformly) for initial fill and refills
    pub kinds: Vec<K>,
    pub converter: Arc<dyn CoordinateConverter>,
    pub seed: u32,
    /// Undo a swap that produced no match
    pub revert_unmatched_swaps: bool,
    /// Resolve matches created by refills within the same cycle
    pub cascade: bool,
}

impl<K: TokenKind> BoardConfig<K> {
    /// Default geometry with a caller-chosen kind set
    pub fn with_kinds(kinds: Vec<K>) -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            cell_size: DEFAULT_CELL_SIZE,
            origin: Vec3::ZERO,
            kinds,
            converter: Arc::new(VerticalConverter),
            seed: 1,
            revert_unmatched_swaps: false,
            cascade: false,
        }
    }

    pub fn size(mut self, width: i32, height: i32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    /// Reject configurations the engine cannot run with.
    ///
    /// Fewer than three kinds is allowed (matches become trivial) but logged.
    pub fn validate(&self) -> Result<()> {
        if self.width <= 0 || self.height <= 0 {
            return Err(Error::InvalidConfiguration(format!(
                "grid dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return Err(Error::InvalidConfiguration(format!(
                "cell size must be positive, got {}",
                self.cell_size
            )));
        }
        if self.kinds.is_empty() {
            return Err(Error::InvalidConfiguration(
                "at least one token kind is required".to_string(),
            ));
        }
        if self.kinds.len() < 3 {
            log::warn!(
                "only {} token kind(s) configured; boards will match trivially",
                self.kinds.len()
            );
        }
        Ok(())
    }
}

impl Default for BoardConfig<GemKind> {
    fn default() -> Self {
        Self::with_kinds(GemKind::ALL.to_vec())
    }
}
