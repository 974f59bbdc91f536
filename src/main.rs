//! Headless match-3 runner (default binary).
//!
//! Plays a number of turns against a session and prints every outbound
//! message as one JSON line on stdout. Animation requests are acknowledged
//! immediately. Logs go to stderr (`RUST_LOG` overrides the default filter).

use anyhow::{Context, Result};

use match3::adapter::{ObservationMessage, Outbound, SessionRuntime};
use match3::core::SimpleRng;
use match3::types::GridPos;

const DEFAULT_TURNS: u32 = 10;

fn main() -> Result<()> {
    let default = "info";
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp_secs()
        .try_init();

    let turns = std::env::var("MATCH3_TURNS")
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(DEFAULT_TURNS);

    run(turns)
}

fn run(turns: u32) -> Result<()> {
    let mut session = SessionRuntime::start_from_env().context("failed to start session")?;
    let mut rng: Option<SimpleRng> = None;
    let mut played = 0;

    while let Some(msg) = session.recv_blocking() {
        let line = msg.to_json_line().context("failed to encode message")?;
        println!("{}", line);

        match msg {
            Outbound::Animate(anim) => session.ack(anim.seq),
            Outbound::Observation(obs) if obs.phase == "idle" => {
                if played >= turns {
                    break;
                }
                played += 1;
                // Fallback moves are seeded from the board's seed.
                let rng = rng.get_or_insert_with(|| SimpleRng::new(obs.seed.wrapping_add(1)));
                let (a, b) = choose_move(&obs, rng);
                log::info!("turn {}/{}: swap {} <-> {}", played, turns, a, b);
                if !(session.select(a) && session.select(b)) {
                    break;
                }
            }
            _ => {}
        }
    }

    session.shutdown()?;
    log::info!("played {} turn(s)", played);
    Ok(())
}

/// The observation's hint if it has one, otherwise two distinct random cells.
fn choose_move(obs: &ObservationMessage, rng: &mut SimpleRng) -> (GridPos, GridPos) {
    if let Some([a, b]) = obs.hint {
        return (GridPos::new(a[0], a[1]), GridPos::new(b[0], b[1]));
    }
    let cells = (obs.width.max(0) as u32 * obs.height.max(0) as u32).max(1);
    let first = rng.next_range(cells);
    let mut second = rng.next_range(cells);
    if cells > 1 && second == first {
        second = (first + 1) % cells;
    }
    let at = |idx: u32| {
        let idx = idx as i32;
        GridPos::new(idx % obs.width.max(1), idx / obs.width.max(1))
    };
    (at(first), at(second))
}
