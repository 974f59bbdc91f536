//! Match-3 (workspace facade crate).
//!
//! This package exposes `match3::{core,adapter,types}` as one public API while
//! the implementation lives in dedicated crates under `crates/`.

pub use match3_adapter as adapter;
pub use match3_core as core;
pub use match3_types as types;
