//! Events emitted by the resolution controller
//!
//! The controller queues one [`BoardEvent`] per observable state change.
//! Presentation (animation, audio, effects) consumes them; nothing in the
//! core depends on how or whether they are consumed.

use crate::types::{GridPos, TokenId, TokenKind};

/// One token moved by gravity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallMove<K> {
    pub id: TokenId,
    pub kind: K,
    pub from_y: i32,
    pub to_y: i32,
}

/// Core -> presentation notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardEvent<K> {
    Selected { pos: GridPos },
    Deselected,
    SwapStarted { from: GridPos, to: GridPos },
    SwapFinished { from: GridPos, to: GridPos },
    /// An unmatched swap was undone (only with `revert_unmatched_swaps`)
    SwapReverted { from: GridPos, to: GridPos },
    /// Result of a detection pass; `round` is 0 for the swap, 1+ for cascades
    MatchesFound { count: usize, round: u32 },
    TokenRemoved { pos: GridPos, kind: K, id: TokenId },
    /// A column holding at least one token finished settling
    ColumnSettled { column: i32, moves: Vec<FallMove<K>> },
    TokenCreated { pos: GridPos, kind: K, id: TokenId },
    CycleComplete,
}

impl<K: TokenKind> BoardEvent<K> {
    /// snake_case event name, as used in logs and the JSON protocol
    pub fn name(&self) -> &'static str {
        match self {
            BoardEvent::Selected { .. } => "selected",
            BoardEvent::Deselected => "deselected",
            BoardEvent::SwapStarted { .. } => "swap_started",
            BoardEvent::SwapFinished { .. } => "swap_finished",
            BoardEvent::SwapReverted { .. } => "swap_reverted",
            BoardEvent::MatchesFound { .. } => "matches_found",
            BoardEvent::TokenRemoved { .. } => "token_removed",
            BoardEvent::ColumnSettled { .. } => "column_settled",
            BoardEvent::TokenCreated { .. } => "token_created",
            BoardEvent::CycleComplete => "cycle_complete",
        }
    }
}

/// Receiver of board events.
pub trait EventSink<K> {
    fn emit(&mut self, event: &BoardEvent<K>);
}

impl<K: Clone> EventSink<K> for Vec<BoardEvent<K>> {
    fn emit(&mut self, event: &BoardEvent<K>) {
        self.push(event.clone());
    }
}

impl<K, F> EventSink<K> for F
where
    F: FnMut(&BoardEvent<K>),
{
    fn emit(&mut self, event: &BoardEvent<K>) {
        self(event)
    }
}
