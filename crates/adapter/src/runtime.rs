//! Session runtime integration.
//!
//! Bridges a synchronous caller (game loop, CLI) with the async session.

use anyhow::Context;
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::core::{GameState, Vec3};
use crate::session::{Input, Outbound, Session, SessionConfig};
use crate::types::GridPos;

/// Running session with its own tokio runtime.
pub struct SessionRuntime {
    rt: Runtime,
    input_tx: mpsc::Sender<Input>,
    out_rx: mpsc::UnboundedReceiver<Outbound>,
    ack_tx: mpsc::UnboundedSender<u64>,
    task: JoinHandle<anyhow::Result<()>>,
}

impl SessionRuntime {
    /// Start a session from environment variables.
    pub fn start_from_env() -> anyhow::Result<Self> {
        Self::start(SessionConfig::from_env())
    }

    pub fn start(config: SessionConfig) -> anyhow::Result<Self> {
        let game = GameState::new(config.board_config()).context("invalid board configuration")?;

        let max_pending = config.max_pending_inputs.max(1);
        let (input_tx, input_rx) = mpsc::channel::<Input>(max_pending);
        let (out_tx, out_rx) = mpsc::unbounded_channel::<Outbound>();
        let (ack_tx, ack_rx) = mpsc::unbounded_channel::<u64>();

        let rt = Runtime::new().context("failed to create tokio runtime")?;
        let session = Session::new(config, game, out_tx, ack_rx);
        let task = rt.spawn(session.run(input_rx));

        Ok(Self {
            rt,
            input_tx,
            out_rx,
            ack_tx,
            task,
        })
    }

    /// Queue an input; blocks while the queue is full.
    ///
    /// Returns false once the session has stopped.
    pub fn send(&self, input: Input) -> bool {
        self.input_tx.blocking_send(input).is_ok()
    }

    pub fn select(&self, pos: GridPos) -> bool {
        self.send(Input::Select(pos))
    }

    pub fn pointer(&self, world: Vec3) -> bool {
        self.send(Input::Pointer(world))
    }

    pub fn restart(&self) -> bool {
        self.send(Input::Restart)
    }

    pub fn try_recv(&mut self) -> Option<Outbound> {
        self.out_rx.try_recv().ok()
    }

    /// Next outbound message; `None` once the session has stopped.
    pub fn recv_blocking(&mut self) -> Option<Outbound> {
        self.out_rx.blocking_recv()
    }

    /// Acknowledge an `Animate` message
    pub fn ack(&self, seq: u64) {
        let _ = self.ack_tx.send(seq);
    }

    /// Close the input queue and wait for the session to finish.
    pub fn shutdown(self) -> anyhow::Result<()> {
        let Self {
            rt,
            input_tx,
            out_rx,
            ack_tx,
            task,
        } = self;
        drop(input_tx);
        let result = rt.block_on(task).context("session task panicked")?;
        drop(out_rx);
        drop(ack_tx);
        result
    }
}
