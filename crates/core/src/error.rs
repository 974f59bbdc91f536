//! Error kinds surfaced by the grid and the resolution controller.

use thiserror::Error;

/// Errors reported by core operations.
///
/// Selection errors are informational: the controller leaves its state
/// untouched when it returns one, so callers that only drive input may
/// simply discard them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("cell ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },
    #[error("cell ({x}, {y}) is empty")]
    EmptyCellSelected { x: i32, y: i32 },
    #[error("a resolution cycle is already running")]
    Busy,
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

pub type Result<T> = std::result::Result<T, Error>;
