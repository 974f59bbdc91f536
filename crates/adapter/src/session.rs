//! Async session driver.
//!
//! A [`Session`] owns one [`GameState`] and runs its resolution cycles on
//! tokio. Between steps it forwards board events to presentation and waits
//! the step's animation time, either for an acknowledgement, a plain sleep,
//! or not at all (see [`Pacing`]). Waits are always bounded; presentation
//! can never wedge the board.

use std::time::Duration;

use anyhow::Context;
use tokio::sync::mpsc;

use crate::core::{BoardConfig, GameState, SelectOutcome, StepWait, Vec3};
use crate::protocol::{
    build_observation, create_animate, create_event, AnimateMessage, EventMessage,
    ObservationMessage,
};
use crate::types::{
    GemKind, GridPos, TokenKind, DEFAULT_HEIGHT, DEFAULT_STEP_TIMEOUT_MS, DEFAULT_WIDTH,
};

/// How the driver spends a step's animation time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pacing {
    /// Wait for presentation to acknowledge the step (bounded)
    Ack,
    /// Sleep for the step's duration
    Sleep,
    /// Apply every step immediately
    Immediate,
}

impl Pacing {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ack" => Some(Pacing::Ack),
            "sleep" => Some(Pacing::Sleep),
            "immediate" | "none" => Some(Pacing::Immediate),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Pacing::Ack => "ack",
            Pacing::Sleep => "sleep",
            Pacing::Immediate => "immediate",
        }
    }
}

/// Session configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub width: i32,
    pub height: i32,
    pub seed: u32,
    /// Upper bound on a single animation wait
    pub step_timeout_ms: u64,
    pub pacing: Pacing,
    pub revert_unmatched_swaps: bool,
    pub cascade: bool,
    /// Capacity of the input queue
    pub max_pending_inputs: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            seed: 1,
            step_timeout_ms: u64::from(DEFAULT_STEP_TIMEOUT_MS),
            pacing: Pacing::Ack,
            revert_unmatched_swaps: false,
            cascade: false,
            max_pending_inputs: 64,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl SessionConfig {
    /// Load configuration from environment variables.
    ///
    /// Missing or unparseable values fall back to the defaults.
    pub fn from_env() -> Self {
        use std::env;

        let defaults = Self::default();

        let width = env::var("MATCH3_WIDTH")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.width);
        let height = env::var("MATCH3_HEIGHT")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.height);
        let seed = env::var("MATCH3_SEED")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.seed);
        let step_timeout_ms = env::var("MATCH3_STEP_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.step_timeout_ms);
        let pacing = env::var("MATCH3_PACING")
            .ok()
            .and_then(|s| Pacing::parse(&s))
            .unwrap_or(defaults.pacing);
        let revert_unmatched_swaps = env::var("MATCH3_REVERT_UNMATCHED")
            .ok()
            .and_then(|s| parse_flag(&s))
            .unwrap_or(defaults.revert_unmatched_swaps);
        let cascade = env::var("MATCH3_CASCADE")
            .ok()
            .and_then(|s| parse_flag(&s))
            .unwrap_or(defaults.cascade);
        let max_pending_inputs = env::var("MATCH3_MAX_PENDING")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.max_pending_inputs);

        Self {
            width,
            height,
            seed,
            step_timeout_ms,
            pacing,
            revert_unmatched_swaps,
            cascade,
            max_pending_inputs,
        }
    }

    /// Board configuration for the built-in gem set
    pub fn board_config(&self) -> BoardConfig<GemKind> {
        let mut config = BoardConfig::default()
            .size(self.width, self.height)
            .seed(self.seed);
        config.revert_unmatched_swaps = self.revert_unmatched_swaps;
        config.cascade = self.cascade;
        config
    }
}

/// Input delivered to a session
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Input {
    Select(GridPos),
    /// World-space pointer hit, mapped through the board's converter
    Pointer(Vec3),
    Restart,
}

/// Message produced by a session, in emission order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    Event(EventMessage),
    /// Presentation should animate, then acknowledge `seq` (ack pacing only)
    Animate(AnimateMessage),
    Observation(ObservationMessage),
}

impl Outbound {
    pub fn seq(&self) -> u64 {
        match self {
            Outbound::Event(msg) => msg.seq,
            Outbound::Animate(msg) => msg.seq,
            Outbound::Observation(msg) => msg.seq,
        }
    }

    pub fn to_json_line(&self) -> serde_json::Result<String> {
        match self {
            Outbound::Event(msg) => serde_json::to_string(msg),
            Outbound::Animate(msg) => serde_json::to_string(msg),
            Outbound::Observation(msg) => serde_json::to_string(msg),
        }
    }
}

/// One board plus its presentation channels
pub struct Session<K> {
    config: SessionConfig,
    game: GameState<K>,
    seq: u64,
    out_tx: mpsc::UnboundedSender<Outbound>,
    /// `None` once presentation has dropped its ack sender
    ack_rx: Option<mpsc::UnboundedReceiver<u64>>,
    out_closed: bool,
}

impl<K: TokenKind> Session<K> {
    pub fn new(
        config: SessionConfig,
        game: GameState<K>,
        out_tx: mpsc::UnboundedSender<Outbound>,
        ack_rx: mpsc::UnboundedReceiver<u64>,
    ) -> Self {
        Self {
            config,
            game,
            seq: 0,
            out_tx,
            ack_rx: Some(ack_rx),
            out_closed: false,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn game(&self) -> &GameState<K> {
        &self.game
    }

    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    fn send(&mut self, msg: Outbound) {
        if self.out_closed {
            return;
        }
        if self.out_tx.send(msg).is_err() {
            log::warn!("presentation channel closed; dropping further output");
            self.out_closed = true;
            self.ack_rx = None;
        }
    }

    /// Forward every queued board event.
    pub fn flush_events(&mut self) {
        for event in self.game.take_events() {
            let seq = self.next_seq();
            self.send(Outbound::Event(create_event(seq, &event)));
        }
    }

    pub fn send_observation(&mut self) {
        let seq = self.next_seq();
        let obs = build_observation(&self.game, seq);
        self.send(Outbound::Observation(obs));
    }

    /// Apply one input, running any cycle it starts to completion, then
    /// send an observation of the settled board.
    ///
    /// Rejected selections are logged and ignored. Only a failed restart is
    /// an error.
    pub async fn handle_input(&mut self, input: Input) -> anyhow::Result<()> {
        match input {
            Input::Select(pos) => self.select(pos).await,
            Input::Pointer(world) => {
                let pos = self.game.grid().world_to_grid(world);
                log::trace!("pointer {:?} -> cell {}", world, pos);
                self.select(pos).await;
            }
            Input::Restart => {
                self.game.restart().context("failed to restart board")?;
                self.flush_events();
            }
        }
        self.send_observation();
        Ok(())
    }

    async fn select(&mut self, pos: GridPos) {
        match self.game.select(pos) {
            Ok(SelectOutcome::CycleStarted { .. }) => {
                self.flush_events();
                self.run_cycle().await;
            }
            Ok(_) => self.flush_events(),
            Err(err) => log::debug!("selection {} ignored: {}", pos, err),
        }
    }

    /// Drive the running cycle until the controller is idle again.
    pub async fn run_cycle(&mut self) {
        while let Some(wait) = self.game.advance() {
            self.flush_events();
            self.pace(wait).await;
        }
    }

    async fn pace(&mut self, wait: StepWait) {
        // Nobody is left to animate once the output channel is gone.
        if wait.duration_ms == 0 || self.out_closed {
            return;
        }
        match self.config.pacing {
            Pacing::Immediate => {}
            Pacing::Sleep => {
                tokio::time::sleep(Duration::from_millis(wait.duration_ms as u64)).await;
            }
            Pacing::Ack => {
                if self.ack_rx.is_none() {
                    return;
                }
                let seq = self.next_seq();
                self.send(Outbound::Animate(create_animate(seq, wait)));
                self.wait_for_ack(seq).await;
            }
        }
    }

    /// Wait for presentation to acknowledge `seq`, bounded by the step timeout.
    ///
    /// Acks for older steps are discarded.
    async fn wait_for_ack(&mut self, seq: u64) {
        let Some(ack_rx) = self.ack_rx.as_mut() else {
            return;
        };
        let limit = Duration::from_millis(self.config.step_timeout_ms);
        let acked = tokio::time::timeout(limit, async {
            loop {
                match ack_rx.recv().await {
                    Some(got) if got >= seq => return true,
                    Some(stale) => log::trace!("discarding stale ack {} (want {})", stale, seq),
                    None => return false,
                }
            }
        })
        .await;

        match acked {
            Ok(true) => {}
            Ok(false) => {
                log::warn!("ack channel closed; remaining steps apply immediately");
                self.ack_rx = None;
            }
            Err(_) => {
                log::warn!(
                    "no ack for step {} within {} ms; applying immediately",
                    seq,
                    self.config.step_timeout_ms
                );
            }
        }
    }

    /// Serve inputs until the input channel closes or presentation goes away.
    pub async fn run(mut self, mut input_rx: mpsc::Receiver<Input>) -> anyhow::Result<()> {
        log::info!(
            "session started: {}x{} board, seed {}, {} pacing",
            self.game.grid().width(),
            self.game.grid().height(),
            self.config.seed,
            self.config.pacing.as_str()
        );
        self.flush_events();
        self.send_observation();

        while let Some(input) = input_rx.recv().await {
            self.handle_input(input).await?;
            if self.out_closed {
                break;
            }
        }

        log::info!(
            "session ended after {} cycle(s)",
            self.game.cycles_completed()
        );
        Ok(())
    }
}
