//! Adapter module - async session driver with a JSON line protocol
//!
//! This crate drives a board on tokio and streams what happens to a
//! presentation layer (renderer, test harness, log file). The core stays
//! synchronous; the adapter decides how long each resolution step lasts.
//!
//! # Protocol Overview
//!
//! Output is **line-delimited JSON**, one object per message, each tagged
//! with `type` and a session-wide `seq`:
//!
//! 1. **Start**: `token_created` for every initial cell, then an `observation`
//! 2. **Input**: each selection yields board events (`selected`, `swap_started`, ...)
//! 3. **Pacing**: in ack mode every animated step is announced with `animate`
//!    and held until presentation acknowledges its `seq` (or the step timeout)
//! 4. **Settle**: an `observation` follows every input
//!
//! # Message Types
//!
//! - **board events**: `selected`, `deselected`, `swap_started`, `swap_finished`,
//!   `swap_reverted`, `matches_found`, `token_removed`, `column_settled`,
//!   `token_created`, `cycle_complete`
//! - **animate**: step name and duration; acknowledge with its `seq`
//! - **observation**: full board, phase, selection, episode id and a move hint
//!
//! # Environment Variables
//!
//! - `MATCH3_WIDTH` / `MATCH3_HEIGHT`: board size (default 8x8)
//! - `MATCH3_SEED`: RNG seed (default 1)
//! - `MATCH3_PACING`: `ack`, `sleep` or `immediate` (default `ack`)
//! - `MATCH3_STEP_TIMEOUT_MS`: bound on one animation wait (default 2000)
//! - `MATCH3_REVERT_UNMATCHED`: undo swaps that match nothing
//! - `MATCH3_CASCADE`: resolve matches created by refills
//! - `MATCH3_MAX_PENDING`: input queue capacity (default 64)
//!
//! # Example Protocol Flow
//!
//! ```text
//! {"type":"selected","seq":66,"x":0,"y":0}
//! {"type":"observation","seq":67,"width":8,"height":8,"cells":["red",...],"phase":"selecting",...}
//! {"type":"swap_started","seq":68,"from":[0,0],"to":[1,0]}
//! {"type":"animate","seq":69,"step":"swap","duration_ms":500}
//! {"type":"swap_finished","seq":70,"from":[0,0],"to":[1,0]}
//! {"type":"matches_found","seq":71,"count":3,"round":0}
//! {"type":"token_removed","seq":72,"x":1,"y":0,"kind":"red","id":12}
//! ```
//!
//! # Implementation
//!
//! - See [`protocol`] for message structure definitions
//! - See [`session`] for the async driver and its configuration
//! - See [`runtime`] for the blocking handle used by synchronous callers

pub mod protocol;
pub mod runtime;
pub mod session;

pub use match3_core as core;
pub use match3_types as types;

// Re-export protocol types for convenience
pub use protocol::*;
pub use runtime::SessionRuntime;
pub use session::{Input, Outbound, Pacing, Session, SessionConfig};
