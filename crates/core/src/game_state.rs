//! Game state module - the selection/resolution controller
//!
//! This module ties together the grid, match detection and the RNG. It owns
//! the board for the whole session and is the only thing that mutates it.
//!
//! # Turn flow
//!
//! ```text
//! Idle --select(a)--> Selecting(a) --select(b != a)--> Resolving --...--> Idle
//!                          |
//!                          +--select(a)--> Idle (deselect)
//! ```
//!
//! A resolution cycle is swap -> detect -> explode -> fall -> refill ->
//! complete. [`GameState::select`] only arms it; [`GameState::advance`] then
//! executes one step per call and reports how long presentation should
//! animate before the next call. Headless callers use [`GameState::resolve`].

use crate::events::{BoardEvent, EventSink, FallMove};
use crate::grid::Grid;
use crate::matcher::{find_matches, MatchSet};
use crate::rng::SimpleRng;
use crate::snapshot::BoardSnapshot;
use crate::token::Token;
use crate::types::*;
use crate::{BoardConfig, Error, Result};

/// Controller phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// First cell of a pending swap has been chosen
    Selecting(GridPos),
    Resolving,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Selecting(_) => "selecting",
            Phase::Resolving => "resolving",
        }
    }
}

/// What a successful `select` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    Selected(GridPos),
    Deselected,
    CycleStarted { from: GridPos, to: GridPos },
}

/// Kind of step just executed by `advance`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    Swap,
    Detect,
    Revert,
    Explode,
    Fall,
    Refill,
    Complete,
}

impl StepKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepKind::Swap => "swap",
            StepKind::Detect => "detect",
            StepKind::Revert => "revert",
            StepKind::Explode => "explode",
            StepKind::Fall => "fall",
            StepKind::Refill => "refill",
            StepKind::Complete => "complete",
        }
    }
}

/// Animation time owed to presentation after a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepWait {
    pub step: StepKind,
    pub duration_ms: u32,
}

impl StepWait {
    fn new(step: StepKind, duration_ms: u32) -> Self {
        Self { step, duration_ms }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Swap,
    Detect,
    Revert,
    Explode { next: usize },
    Fall { column: i32 },
    Refill { cursor: usize },
    Finish,
}

#[derive(Debug, Clone)]
struct Cycle {
    from: GridPos,
    to: GridPos,
    stage: Stage,
    matches: MatchSet,
    /// 0 for the swap's own matches, 1+ for cascades
    round: u32,
    removed: usize,
}

impl Cycle {
    fn new(from: GridPos, to: GridPos) -> Self {
        Self {
            from,
            to,
            stage: Stage::Swap,
            matches: MatchSet::default(),
            round: 0,
            removed: 0,
        }
    }
}

/// Complete board state plus the turn controller
#[derive(Debug, Clone)]
pub struct GameState<K> {
    config: BoardConfig<K>,
    grid: Grid<Token<K>>,
    phase: Phase,
    cycle: Option<Cycle>,
    rng: SimpleRng,
    /// Next id handed to a created token
    next_token_id: u32,
    /// Monotonic episode id (increments on restart).
    episode_id: u32,
    cycles_completed: u32,
    /// Outbound events not yet taken by presentation.
    events: Vec<BoardEvent<K>>,
}

impl<K: TokenKind> GameState<K> {
    /// Build a board and fill every cell with a random token.
    pub fn new(config: BoardConfig<K>) -> Result<Self> {
        let mut state = Self::empty(config)?;
        for x in 0..state.grid.width() {
            for y in 0..state.grid.height() {
                state.spawn_token(GridPos::new(x, y))?;
            }
        }
        log::info!(
            "board {}x{} filled (seed {}, {} kinds)",
            state.grid.width(),
            state.grid.height(),
            state.config.seed,
            state.config.kinds.len()
        );
        Ok(state)
    }

    /// Build a board from an explicit layout; `None` leaves a cell empty.
    ///
    /// Refills still draw from the configured kinds and seed.
    pub fn from_layout(
        config: BoardConfig<K>,
        mut layout: impl FnMut(GridPos) -> Option<K>,
    ) -> Result<Self> {
        let mut state = Self::empty(config)?;
        for x in 0..state.grid.width() {
            for y in 0..state.grid.height() {
                let pos = GridPos::new(x, y);
                if let Some(kind) = layout(pos) {
                    state.insert_token(pos, kind)?;
                }
            }
        }
        Ok(state)
    }

    fn empty(config: BoardConfig<K>) -> Result<Self> {
        config.validate()?;
        let grid = Grid::new(
            config.width,
            config.height,
            config.cell_size,
            config.origin,
            config.converter.clone(),
        )?;
        let rng = SimpleRng::new(config.seed);
        Ok(Self {
            config,
            grid,
            phase: Phase::Idle,
            cycle: None,
            rng,
            next_token_id: 1,
            episode_id: 0,
            cycles_completed: 0,
            events: Vec::new(),
        })
    }

    /// Rebuild a freshly filled board from the configured seed.
    pub fn restart(&mut self) -> Result<()> {
        let next_episode = self.episode_id.wrapping_add(1);
        *self = Self::new(self.config.clone())?;
        self.episode_id = next_episode;
        log::info!("restarted board, episode {}", next_episode);
        Ok(())
    }

    pub fn config(&self) -> &BoardConfig<K> {
        &self.config
    }

    pub fn grid(&self) -> &Grid<Token<K>> {
        &self.grid
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_idle(&self) -> bool {
        self.phase == Phase::Idle
    }

    /// First cell of the pending swap, if any
    pub fn selection(&self) -> Option<GridPos> {
        match self.phase {
            Phase::Selecting(pos) => Some(pos),
            _ => None,
        }
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn cycles_completed(&self) -> u32 {
        self.cycles_completed
    }

    #[cfg(test)]
    pub(crate) fn grid_mut(&mut self) -> &mut Grid<Token<K>> {
        &mut self.grid
    }

    /// Take all queued events.
    pub fn take_events(&mut self) -> Vec<BoardEvent<K>> {
        std::mem::take(&mut self.events)
    }

    /// Deliver all queued events to `sink`, in emission order.
    pub fn drain_events_into(&mut self, sink: &mut impl EventSink<K>) {
        for event in self.events.drain(..) {
            sink.emit(&event);
        }
    }

    pub fn snapshot_into(&self, out: &mut BoardSnapshot<K>) {
        out.width = self.grid.width();
        out.height = self.grid.height();
        out.cells.clear();
        for y in 0..self.grid.height() {
            for x in 0..self.grid.width() {
                out.cells.push(self.grid.kind_at(GridPos::new(x, y)));
            }
        }
        out.phase = self.phase;
        out.episode_id = self.episode_id;
        out.seed = self.rng.seed();
        out.cycles_completed = self.cycles_completed;
    }

    pub fn snapshot(&self) -> BoardSnapshot<K> {
        let mut s = BoardSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    fn emit(&mut self, event: BoardEvent<K>) {
        self.events.push(event);
    }

    fn insert_token(&mut self, pos: GridPos, kind: K) -> Result<Token<K>> {
        let token = Token::new(TokenId(self.next_token_id), kind, pos);
        self.grid.place_token(pos, token)?;
        self.next_token_id = self.next_token_id.wrapping_add(1);
        self.emit(BoardEvent::TokenCreated {
            pos,
            kind,
            id: token.id(),
        });
        Ok(token)
    }

    /// Create a token of a random configured kind at `pos`
    fn spawn_token(&mut self, pos: GridPos) -> Result<Token<K>> {
        let kind = self.rng.pick(&self.config.kinds).ok_or_else(|| {
            Error::InvalidConfiguration("at least one token kind is required".to_string())
        })?;
        self.insert_token(pos, kind)
    }

    fn check_selectable(&self, pos: GridPos) -> Result<()> {
        match self.grid.get(pos.x, pos.y)? {
            Some(_) => Ok(()),
            None => Err(Error::EmptyCellSelected { x: pos.x, y: pos.y }),
        }
    }

    /// Feed one "select cell" input.
    ///
    /// Errors mean the input was ignored; state is unchanged in that case.
    pub fn select(&mut self, pos: GridPos) -> Result<SelectOutcome> {
        match self.phase {
            Phase::Resolving => {
                log::debug!("ignoring selection {} while resolving", pos);
                Err(Error::Busy)
            }
            Phase::Selecting(first) if first == pos => {
                self.phase = Phase::Idle;
                self.emit(BoardEvent::Deselected);
                log::debug!("deselected {}", pos);
                Ok(SelectOutcome::Deselected)
            }
            Phase::Idle => {
                if let Err(err) = self.check_selectable(pos) {
                    log::debug!("ignoring selection: {}", err);
                    return Err(err);
                }
                self.phase = Phase::Selecting(pos);
                self.emit(BoardEvent::Selected { pos });
                log::debug!("selected {}", pos);
                Ok(SelectOutcome::Selected(pos))
            }
            Phase::Selecting(first) => {
                if let Err(err) = self.check_selectable(pos) {
                    log::debug!("ignoring selection: {}", err);
                    return Err(err);
                }
                self.phase = Phase::Resolving;
                self.cycle = Some(Cycle::new(first, pos));
                log::debug!("resolving swap {} <-> {}", first, pos);
                Ok(SelectOutcome::CycleStarted { from: first, to: pos })
            }
        }
    }

    /// Execute the next step of the running cycle.
    ///
    /// Returns `None` when no cycle is running. Each call performs exactly
    /// one suspension point's worth of work and returns the animation time
    /// presentation should be given before the next call.
    pub fn advance(&mut self) -> Option<StepWait> {
        let mut cycle = self.cycle.take()?;
        let wait = loop {
            if let Some(wait) = self.run_stage(&mut cycle) {
                break wait;
            }
        };
        if wait.step == StepKind::Complete {
            self.phase = Phase::Idle;
            self.cycles_completed = self.cycles_completed.wrapping_add(1);
        } else {
            self.cycle = Some(cycle);
        }
        Some(wait)
    }

    /// Run the current cycle to completion; returns the number of steps.
    pub fn resolve(&mut self) -> usize {
        let mut steps = 0;
        while self.advance().is_some() {
            steps += 1;
        }
        steps
    }

    /// Run one stage. `None` means the stage had no work and moved on.
    fn run_stage(&mut self, cycle: &mut Cycle) -> Option<StepWait> {
        match cycle.stage {
            Stage::Swap => {
                self.emit(BoardEvent::SwapStarted {
                    from: cycle.from,
                    to: cycle.to,
                });
                if let Err(err) = self.grid.swap_tokens(cycle.from, cycle.to) {
                    log::error!("swap {} <-> {} failed: {}", cycle.from, cycle.to, err);
                }
                cycle.stage = Stage::Detect;
                Some(StepWait::new(StepKind::Swap, SWAP_MS))
            }
            Stage::Detect => {
                if cycle.round == 0 {
                    self.emit(BoardEvent::SwapFinished {
                        from: cycle.from,
                        to: cycle.to,
                    });
                }
                cycle.matches = find_matches(&self.grid);
                let count = cycle.matches.len();
                self.emit(BoardEvent::MatchesFound {
                    count,
                    round: cycle.round,
                });
                log::debug!("round {}: {} matched cells", cycle.round, count);

                cycle.stage = if count > 0 {
                    Stage::Explode { next: 0 }
                } else if cycle.round > 0 {
                    Stage::Finish
                } else if self.config.revert_unmatched_swaps {
                    Stage::Revert
                } else {
                    // An unmatched swap is kept; the rest of the cycle still runs.
                    Stage::Explode { next: 0 }
                };
                Some(StepWait::new(StepKind::Detect, 0))
            }
            Stage::Revert => {
                if let Err(err) = self.grid.swap_tokens(cycle.from, cycle.to) {
                    log::error!("revert {} <-> {} failed: {}", cycle.from, cycle.to, err);
                }
                self.emit(BoardEvent::SwapReverted {
                    from: cycle.from,
                    to: cycle.to,
                });
                cycle.stage = Stage::Finish;
                Some(StepWait::new(StepKind::Revert, SWAP_MS))
            }
            Stage::Explode { next } => {
                let Some(pos) = cycle.matches.positions().get(next).copied() else {
                    cycle.stage = Stage::Fall { column: 0 };
                    return None;
                };
                cycle.stage = Stage::Explode { next: next + 1 };
                match self.grid.take(pos.x, pos.y) {
                    Ok(Some(token)) => {
                        cycle.removed += 1;
                        self.emit(BoardEvent::TokenRemoved {
                            pos,
                            kind: token.kind(),
                            id: token.id(),
                        });
                        Some(StepWait::new(StepKind::Explode, EXPLODE_STEP_MS))
                    }
                    Ok(None) => None,
                    Err(err) => {
                        log::error!("explode at {} failed: {}", pos, err);
                        None
                    }
                }
            }
            Stage::Fall { column } => {
                if column >= self.grid.width() {
                    cycle.stage = Stage::Refill { cursor: 0 };
                    return None;
                }
                cycle.stage = Stage::Fall { column: column + 1 };
                let moves = self.settle_column(column)?;
                let duration = if moves.is_empty() { 0 } else { FALL_MS };
                self.emit(BoardEvent::ColumnSettled { column, moves });
                Some(StepWait::new(StepKind::Fall, duration))
            }
            Stage::Refill { cursor } => {
                let height = self.grid.height() as usize;
                let total = self.grid.width() as usize * height;
                // Column-major, bottom to top.
                let next_empty = (cursor..total).find(|&idx| {
                    self.grid
                        .is_empty_at(GridPos::new((idx / height) as i32, (idx % height) as i32))
                });
                let Some(idx) = next_empty else {
                    cycle.stage = if self.config.cascade && cycle.round < MAX_CASCADE_ROUNDS {
                        cycle.round += 1;
                        Stage::Detect
                    } else {
                        Stage::Finish
                    };
                    return None;
                };
                cycle.stage = Stage::Refill { cursor: idx + 1 };
                let pos = GridPos::new((idx / height) as i32, (idx % height) as i32);
                match self.spawn_token(pos) {
                    Ok(_) => Some(StepWait::new(StepKind::Refill, REFILL_STEP_MS)),
                    Err(err) => {
                        log::error!("refill at {} failed: {}", pos, err);
                        None
                    }
                }
            }
            Stage::Finish => {
                self.emit(BoardEvent::CycleComplete);
                log::info!(
                    "cycle {} <-> {} complete: {} removed, {} cascade round(s)",
                    cycle.from,
                    cycle.to,
                    cycle.removed,
                    cycle.round
                );
                Some(StepWait::new(StepKind::Complete, 0))
            }
        }
    }

    /// Compact column `x` towards row 0, keeping relative order.
    ///
    /// Returns `None` for a column with no tokens, otherwise the moves made
    /// (possibly none).
    fn settle_column(&mut self, x: i32) -> Option<Vec<FallMove<K>>> {
        let mut moves = Vec::new();
        let mut write_y = 0;
        for read_y in 0..self.grid.height() {
            let Ok(Some(token)) = self.grid.take(x, read_y) else {
                continue;
            };
            if read_y != write_y {
                moves.push(FallMove {
                    id: token.id(),
                    kind: token.kind(),
                    from_y: read_y,
                    to_y: write_y,
                });
            }
            let target = GridPos::new(x, write_y);
            if let Err(err) = self.grid.place_token(target, token) {
                log::error!("settling token {} at {} failed: {}", token.id(), target, err);
                continue;
            }
            write_y += 1;
        }
        (write_y > 0).then_some(moves)
    }
}

impl Default for GameState<GemKind> {
    fn default() -> Self {
        // The default config always validates.
        match Self::new(BoardConfig::default()) {
            Ok(state) => state,
            Err(err) => unreachable!("default board config rejected: {err}"),
        }
    }
}
