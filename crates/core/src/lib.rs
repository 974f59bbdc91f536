//! Core engine module - pure, deterministic, and testable
//!
//! This crate contains the board, match rules and the turn controller.
//! It has **no dependencies** on rendering, audio, input devices or I/O:
//!
//! - **Deterministic**: Same seed and same selections produce identical event streams
//! - **Testable**: Boards can be built from explicit layouts
//! - **Portable**: Runs headless, under an async driver, or inside a game engine
//!
//! # Module Structure
//!
//! - [`converter`]: grid <-> world coordinate strategies
//! - [`grid`]: fixed-size cell storage with explicit out-of-bounds errors
//! - [`token`]: the gem value and the dual-update helpers that move it
//! - [`matcher`]: three-in-a-row detection
//! - [`game_state`]: selection state machine and the step-wise resolution cycle
//! - [`events`]: notifications for presentation layers
//! - [`rng`]: seeded kind selection
//!
//! # Game Rules
//!
//! - Selecting an occupied cell arms it; selecting it again cancels
//! - Selecting a second occupied cell swaps the two tokens (no adjacency requirement)
//! - Every horizontal or vertical run of 3+ same-kind tokens is removed
//! - Remaining tokens fall towards row 0; empty cells are refilled with random kinds
//! - By default an unmatched swap is kept and refills do not cascade
//!   (see [`BoardConfig::revert_unmatched_swaps`] and [`BoardConfig::cascade`])
//!
//! # Example
//!
//! ```
//! use match3_core::{BoardConfig, GameState, SelectOutcome};
//! use match3_types::GridPos;
//!
//! let mut game = GameState::new(BoardConfig::default().seed(12345)).unwrap();
//! game.take_events(); // initial TokenCreated events
//!
//! game.select(GridPos::new(0, 0)).unwrap();
//! let outcome = game.select(GridPos::new(1, 0)).unwrap();
//! assert!(matches!(outcome, SelectOutcome::CycleStarted { .. }));
//!
//! // Drive the cycle step by step (or call `resolve()`).
//! while let Some(wait) = game.advance() {
//!     let _ = wait.duration_ms; // animate here
//! }
//! assert!(game.is_idle());
//! assert_eq!(game.grid().occupied_count(), 64);
//! ```

pub mod config;
pub mod converter;
pub mod error;
pub mod events;
pub mod game_state;
pub mod grid;
pub mod matcher;
pub mod rng;
pub mod snapshot;
pub mod token;

pub use match3_types as types;

// Re-export commonly used types for convenience
pub use config::BoardConfig;
pub use converter::{CoordinateConverter, VerticalConverter};
pub use error::{Error, Result};
pub use events::{BoardEvent, EventSink, FallMove};
pub use game_state::{GameState, Phase, SelectOutcome, StepKind, StepWait};
pub use grid::{DebugLabel, DebugOverlay, Grid};
pub use matcher::{find_matches, find_swap_with_match, has_matches, MatchSet};
pub use rng::SimpleRng;
pub use snapshot::BoardSnapshot;
pub use token::Token;

pub use glam::Vec3;
