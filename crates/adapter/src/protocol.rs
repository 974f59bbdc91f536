//! Protocol module - JSON message types for external observers
//!
//! Every message is one JSON object per line. All messages carry `type` and
//! `seq` (a per-session sequence number shared by all outbound messages).

use serde::{Deserialize, Serialize};

use crate::core::{find_swap_with_match, BoardEvent, FallMove, GameState, StepWait};
use crate::types::{GridPos, TokenKind};

/// Stable 64-bit FNV-1a hasher for deterministic `state_hash`.
///
/// We avoid `DefaultHasher` here since its output is not guaranteed stable across
/// Rust versions/platforms.
#[derive(Debug, Clone)]
struct Fnv1aHasher {
    state: u64,
}

impl Fnv1aHasher {
    const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;

    fn new() -> Self {
        Self {
            state: Self::OFFSET_BASIS,
        }
    }

    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.state ^= b as u64;
            self.state = self.state.wrapping_mul(Self::PRIME);
        }
    }

    fn finish(&self) -> u64 {
        self.state
    }
}

fn xy(pos: GridPos) -> [i32; 2] {
    [pos.x, pos.y]
}

// ============== Board events ==============

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub id: u32,
    pub kind: String,
    pub from_y: i32,
    pub to_y: i32,
}

impl<K: TokenKind> From<&FallMove<K>> for MoveRecord {
    fn from(m: &FallMove<K>) -> Self {
        Self {
            id: m.id.0,
            kind: m.kind.as_str().to_string(),
            from_y: m.from_y,
            to_y: m.to_y,
        }
    }
}

/// Board event payload, tagged by `type`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventPayload {
    Selected {
        x: i32,
        y: i32,
    },
    Deselected,
    SwapStarted {
        from: [i32; 2],
        to: [i32; 2],
    },
    SwapFinished {
        from: [i32; 2],
        to: [i32; 2],
    },
    SwapReverted {
        from: [i32; 2],
        to: [i32; 2],
    },
    MatchesFound {
        count: usize,
        round: u32,
    },
    TokenRemoved {
        x: i32,
        y: i32,
        kind: String,
        id: u32,
    },
    ColumnSettled {
        column: i32,
        moves: Vec<MoveRecord>,
    },
    TokenCreated {
        x: i32,
        y: i32,
        kind: String,
        id: u32,
    },
    CycleComplete,
}

impl<K: TokenKind> From<&BoardEvent<K>> for EventPayload {
    fn from(event: &BoardEvent<K>) -> Self {
        match event {
            BoardEvent::Selected { pos } => EventPayload::Selected { x: pos.x, y: pos.y },
            BoardEvent::Deselected => EventPayload::Deselected,
            BoardEvent::SwapStarted { from, to } => EventPayload::SwapStarted {
                from: xy(*from),
                to: xy(*to),
            },
            BoardEvent::SwapFinished { from, to } => EventPayload::SwapFinished {
                from: xy(*from),
                to: xy(*to),
            },
            BoardEvent::SwapReverted { from, to } => EventPayload::SwapReverted {
                from: xy(*from),
                to: xy(*to),
            },
            BoardEvent::MatchesFound { count, round } => EventPayload::MatchesFound {
                count: *count,
                round: *round,
            },
            BoardEvent::TokenRemoved { pos, kind, id } => EventPayload::TokenRemoved {
                x: pos.x,
                y: pos.y,
                kind: kind.as_str().to_string(),
                id: id.0,
            },
            BoardEvent::ColumnSettled { column, moves } => EventPayload::ColumnSettled {
                column: *column,
                moves: moves.iter().map(MoveRecord::from).collect(),
            },
            BoardEvent::TokenCreated { pos, kind, id } => EventPayload::TokenCreated {
                x: pos.x,
                y: pos.y,
                kind: kind.as_str().to_string(),
                id: id.0,
            },
            BoardEvent::CycleComplete => EventPayload::CycleComplete,
        }
    }
}

/// One board event on the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMessage {
    pub seq: u64,
    #[serde(flatten)]
    pub event: EventPayload,
}

pub fn create_event<K: TokenKind>(seq: u64, event: &BoardEvent<K>) -> EventMessage {
    EventMessage {
        seq,
        event: EventPayload::from(event),
    }
}

// ============== Step pacing ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimateType {
    #[serde(rename = "animate")]
    Animate,
}

impl Default for AnimateType {
    fn default() -> Self {
        Self::Animate
    }
}

/// Animation request; presentation acknowledges it by `seq`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimateMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: AnimateType,
    pub seq: u64,
    pub step: String,
    pub duration_ms: u32,
}

pub fn create_animate(seq: u64, wait: StepWait) -> AnimateMessage {
    AnimateMessage {
        msg_type: AnimateType::Animate,
        seq,
        step: wait.step.as_str().to_string(),
        duration_ms: wait.duration_ms,
    }
}

// ============== Observation ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObservationType {
    #[serde(rename = "observation")]
    Observation,
}

impl Default for ObservationType {
    fn default() -> Self {
        Self::Observation
    }
}

/// Full board state, sent at session start and after every input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: ObservationType,
    pub seq: u64,
    pub width: i32,
    pub height: i32,
    /// Row-major kind names, bottom row first; `null` for empty cells
    pub cells: Vec<Option<String>>,
    pub phase: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection: Option<[i32; 2]>,
    pub episode_id: u32,
    pub seed: u32,
    pub cycles_completed: u32,
    /// An adjacent swap that would match, if one exists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<[[i32; 2]; 2]>,
    pub state_hash: String,
}

impl ObservationMessage {
    pub fn kind_at(&self, x: i32, y: i32) -> Option<&str> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        self.cells
            .get((y as usize) * (self.width as usize) + (x as usize))
            .and_then(|c| c.as_deref())
    }
}

pub fn build_observation<K: TokenKind>(game_state: &GameState<K>, seq: u64) -> ObservationMessage {
    let snap = game_state.snapshot();

    let mut hasher = Fnv1aHasher::new();
    hasher.write(&snap.width.to_le_bytes());
    hasher.write(&snap.height.to_le_bytes());
    for cell in &snap.cells {
        match cell {
            Some(kind) => hasher.write(kind.as_str().as_bytes()),
            None => hasher.write(b"."),
        }
        hasher.write(&[0]);
    }

    ObservationMessage {
        msg_type: ObservationType::Observation,
        seq,
        width: snap.width,
        height: snap.height,
        cells: snap
            .cells
            .iter()
            .map(|c| c.map(|kind| kind.as_str().to_string()))
            .collect(),
        phase: snap.phase.as_str().to_string(),
        selection: snap.selection().map(xy),
        episode_id: snap.episode_id,
        seed: snap.seed,
        cycles_completed: snap.cycles_completed,
        hint: find_swap_with_match(game_state.grid()).map(|(a, b)| [xy(a), xy(b)]),
        state_hash: format!("{:016x}", hasher.finish()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::BoardConfig;
    use crate::types::{GemKind, TokenId};

    #[test]
    fn test_token_removed_wire_shape() {
        let event = BoardEvent::TokenRemoved {
            pos: GridPos::new(1, 0),
            kind: GemKind::Red,
            id: TokenId(12),
        };
        let msg = create_event(7, &event);
        let v: serde_json::Value = serde_json::to_value(&msg).unwrap();
        assert_eq!(v["type"], "token_removed");
        assert_eq!(v["seq"], 7);
        assert_eq!(v["x"], 1);
        assert_eq!(v["y"], 0);
        assert_eq!(v["kind"], "red");
        assert_eq!(v["id"], 12);
    }

    #[test]
    fn test_unit_events_carry_only_type() {
        let msg = create_event::<GemKind>(3, &BoardEvent::CycleComplete);
        let line = serde_json::to_string(&msg).unwrap();
        let v: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(v["type"], "cycle_complete");
        assert_eq!(v.as_object().unwrap().len(), 2);
    }

    #[test]
    fn test_event_message_parses_back() {
        let line = r#"{"type":"column_settled","seq":9,"column":2,"moves":[{"id":4,"kind":"blue","from_y":3,"to_y":1}]}"#;
        let msg: EventMessage = serde_json::from_str(line).unwrap();
        assert_eq!(msg.seq, 9);
        assert_eq!(
            msg.event,
            EventPayload::ColumnSettled {
                column: 2,
                moves: vec![MoveRecord {
                    id: 4,
                    kind: "blue".to_string(),
                    from_y: 3,
                    to_y: 1
                }]
            }
        );
    }

    #[test]
    fn test_observation_fields() {
        let config = BoardConfig::default().size(4, 3).seed(5);
        let gs = GameState::new(config).unwrap();
        let obs = build_observation(&gs, 1);
        assert_eq!(obs.cells.len(), 12);
        assert_eq!(obs.phase, "idle");
        assert_eq!(obs.selection, None);
        assert_eq!(obs.seed, 5);
        assert_eq!(obs.state_hash.len(), 16);
        assert_eq!(
            obs.kind_at(0, 0),
            gs.grid().kind_at(GridPos::new(0, 0)).map(|k| k.as_str())
        );

        let v: serde_json::Value = serde_json::to_value(&obs).unwrap();
        assert_eq!(v["type"], "observation");
    }

    #[test]
    fn test_state_hash_changes_when_board_changes() {
        // Bottom row R G B, top row G B R: no runs anywhere.
        let layout = [GemKind::Red, GemKind::Green, GemKind::Blue];
        let config = BoardConfig::default().size(3, 2);
        let mut gs = GameState::from_layout(config, |pos| {
            Some(layout[((pos.x + pos.y) % 3) as usize])
        })
        .unwrap();
        let obs1 = build_observation(&gs, 1);
        gs.select(GridPos::new(0, 0)).unwrap();
        gs.select(GridPos::new(1, 0)).unwrap();
        gs.resolve();
        let obs2 = build_observation(&gs, 2);
        assert_eq!(obs2.kind_at(0, 0), Some("green"));
        assert_ne!(obs1.state_hash, obs2.state_hash);
    }

    #[test]
    fn test_state_hash_independent_of_seq() {
        let gs = GameState::new(BoardConfig::default()).unwrap();
        assert_eq!(
            build_observation(&gs, 1).state_hash,
            build_observation(&gs, 99).state_hash
        );
    }
}
