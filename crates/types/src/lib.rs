//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the engine.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core logic, presentation, observation protocol).
//!
//! # Board Dimensions
//!
//! Default playfield dimensions:
//!
//! - **Width**: 8 columns (indexed 0-7)
//! - **Height**: 8 rows (indexed 0-7, row 0 is the bottom)
//! - **Cell size**: 1.0 world unit
//!
//! # Step Timing Constants
//!
//! Timing values are in milliseconds. They describe how long presentation is
//! expected to animate each step of a resolution cycle:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `SWAP_MS` | 500 | Two tokens trade places |
//! | `EXPLODE_STEP_MS` | 100 | One matched token is removed |
//! | `FALL_MS` | 500 | One column settles under gravity |
//! | `REFILL_STEP_MS` | 100 | One new token drops into an empty cell |
//! | `DEFAULT_STEP_TIMEOUT_MS` | 2000 | Longest wait for a presentation ack |
//!
//! # Examples
//!
//! ```
//! use match3_types::{GemKind, GridPos, TokenKind, DEFAULT_WIDTH, DEFAULT_HEIGHT};
//!
//! // Parse from string (case-insensitive)
//! let parsed = GemKind::from_str("Red").unwrap();
//! assert_eq!(parsed, GemKind::Red);
//! assert_eq!(parsed.as_str(), "red");
//!
//! // Grid coordinates
//! let pos = GridPos::new(3, 4);
//! assert_eq!(pos.offset(1, -1), GridPos::new(4, 3));
//! assert!(pos.is_adjacent(GridPos::new(3, 5)));
//!
//! assert_eq!(DEFAULT_WIDTH, 8);
//! assert_eq!(DEFAULT_HEIGHT, 8);
//! ```

use std::fmt;

/// Default board width in cells
pub const DEFAULT_WIDTH: i32 = 8;

/// Default board height in cells
pub const DEFAULT_HEIGHT: i32 = 8;

/// Default edge length of one cell in world units
pub const DEFAULT_CELL_SIZE: f32 = 1.0;

/// Swap animation length
pub const SWAP_MS: u32 = 500;

/// Pause after each removed token
pub const EXPLODE_STEP_MS: u32 = 100;

/// Fall animation length for one column
pub const FALL_MS: u32 = 500;

/// Pause after each refill placement
pub const REFILL_STEP_MS: u32 = 100;

/// Upper bound on a single presentation wait before the step is applied anyway
pub const DEFAULT_STEP_TIMEOUT_MS: u32 = 2000;

/// Cascade rounds allowed in one cycle when cascading is enabled
pub const MAX_CASCADE_ROUNDS: u32 = 32;

/// Minimum run length that counts as a match
pub const MATCH_RUN: i32 = 3;


/// Token kind contract used by the engine.
///
/// The engine is generic over the kind stored in each token. A kind only has
/// to be cheap to copy, comparable, and nameable for the observation protocol.
pub trait TokenKind: Copy + Eq + fmt::Debug {
    /// Stable lowercase name (used in logs and the JSON protocol)
    fn as_str(&self) -> &'static str;

    /// Single-character glyph for text dumps of the board.
    ///
    /// Defaults to the uppercased first letter of [`TokenKind::as_str`].
    fn glyph(&self) -> char {
        self.as_str()
            .chars()
            .next()
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or('?')
    }
}

/// The six stock gem kinds
///
/// Any subset of these can be configured as the kind set for a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GemKind {
    Blue,
    Green,
    Red,
    Yellow,
    Purple,
    Orange,
}

impl GemKind {
    /// Every kind, in declaration order
    pub const ALL: [GemKind; 6] = [
        GemKind::Blue,
        GemKind::Green,
        GemKind::Red,
        GemKind::Yellow,
        GemKind::Purple,
        GemKind::Orange,
    ];

    /// Parse gem kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use match3_types::GemKind;
    ///
    /// assert_eq!(GemKind::from_str("green"), Some(GemKind::Green));
    /// assert_eq!(GemKind::from_str("PURPLE"), Some(GemKind::Purple));
    /// assert_eq!(GemKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "blue" => Some(GemKind::Blue),
            "green" => Some(GemKind::Green),
            "red" => Some(GemKind::Red),
            "yellow" => Some(GemKind::Yellow),
            "purple" => Some(GemKind::Purple),
            "orange" => Some(GemKind::Orange),
            _ => None,
        }
    }
}

impl TokenKind for GemKind {
    fn as_str(&self) -> &'static str {
        match self {
            GemKind::Blue => "blue",
            GemKind::Green => "green",
            GemKind::Red => "red",
            GemKind::Yellow => "yellow",
            GemKind::Purple => "purple",
            GemKind::Orange => "orange",
        }
    }

    fn glyph(&self) -> char {
        match self {
            GemKind::Blue => 'B',
            GemKind::Green => 'G',
            GemKind::Red => 'R',
            GemKind::Yellow => 'Y',
            GemKind::Purple => 'P',
            GemKind::Orange => 'O',
        }
    }
}

/// Integer cell coordinates.
///
/// `x` grows to the right, `y` grows upward; row 0 is the bottom row that
/// tokens fall towards. Coordinates are signed so that world-to-grid lookups
/// for points left of or below the origin stay representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Position shifted by (dx, dy)
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// True when `other` shares an edge with this cell
    pub fn is_adjacent(self, other: GridPos) -> bool {
        (self.x - other.x).abs() + (self.y - other.y).abs() == 1
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

impl From<(i32, i32)> for GridPos {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Monotonic identifier assigned to every token when it is created.
///
/// Presentation uses it to map tokens to their visuals across moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenId(pub u32);

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
