//! Resolution cycle tests - selection, swap, explode, fall and refill

use match3::core::{BoardConfig, BoardEvent, GameState, Phase, SelectOutcome, StepKind};
use match3::types::{GemKind, GridPos, TokenId};

fn board_with(rows: &[&str], config: BoardConfig<GemKind>) -> GameState<GemKind> {
    let height = rows.len() as i32;
    let width = rows[0].len() as i32;
    let config = config.size(width, height);
    let mut state = GameState::from_layout(config, |pos| {
        let row = rows[(height - 1 - pos.y) as usize].as_bytes();
        match row[pos.x as usize] {
            b'B' => Some(GemKind::Blue),
            b'G' => Some(GemKind::Green),
            b'R' => Some(GemKind::Red),
            b'Y' => Some(GemKind::Yellow),
            _ => None,
        }
    })
    .unwrap();
    state.take_events();
    state
}

fn board(rows: &[&str]) -> GameState<GemKind> {
    board_with(rows, BoardConfig::default().seed(99))
}

fn columns_contiguous(state: &GameState<GemKind>) -> bool {
    let grid = state.grid();
    (0..grid.width()).all(|x| {
        let filled = (0..grid.height())
            .take_while(|&y| grid.is_occupied(GridPos::new(x, y)))
            .count() as i32;
        (filled..grid.height()).all(|y| grid.is_empty_at(GridPos::new(x, y)))
    })
}

#[test]
fn test_double_select_deselects_without_mutation() {
    let mut state = board(&["RGB", "GBR"]);
    let before = state.snapshot();

    state.select(GridPos::new(0, 0)).unwrap();
    assert_eq!(state.phase(), Phase::Selecting(GridPos::new(0, 0)));
    assert_eq!(
        state.select(GridPos::new(0, 0)),
        Ok(SelectOutcome::Deselected)
    );

    assert_eq!(state.phase(), Phase::Idle);
    assert_eq!(state.snapshot(), before);
    assert_eq!(state.take_events().last(), Some(&BoardEvent::Deselected));
}

#[test]
fn test_unmatched_swap_keeps_swapped_state() {
    let mut state = board(&["RGB", "GBR"]);
    // Non-adjacent swaps are allowed.
    state.select(GridPos::new(0, 1)).unwrap();
    state.select(GridPos::new(1, 0)).unwrap();
    state.resolve();

    assert_eq!(state.grid().kind_at(GridPos::new(0, 1)), Some(GemKind::Blue));
    assert_eq!(state.grid().kind_at(GridPos::new(1, 0)), Some(GemKind::Red));
    assert_eq!(state.grid().kind_at(GridPos::new(0, 0)), Some(GemKind::Green));
    assert!(state.grid().tokens_consistent());

    let events = state.take_events();
    assert!(events.contains(&BoardEvent::MatchesFound { count: 0, round: 0 }));
    assert!(!events
        .iter()
        .any(|e| matches!(e, BoardEvent::TokenRemoved { .. })));
    assert_eq!(events.last(), Some(&BoardEvent::CycleComplete));
    assert!(state.is_idle());
}

#[test]
fn test_unmatched_swap_reverts_when_configured() {
    let mut config = BoardConfig::default().seed(99);
    config.revert_unmatched_swaps = true;
    let mut state = board_with(&["RGB", "GBR"], config);
    let before = state.snapshot();

    state.select(GridPos::new(0, 0)).unwrap();
    state.select(GridPos::new(1, 0)).unwrap();
    state.resolve();

    assert_eq!(state.snapshot().cells, before.cells);
    let names: Vec<&str> = state.take_events().iter().map(|e| e.name()).collect();
    assert_eq!(
        names,
        vec![
            "selected",
            "swap_started",
            "swap_finished",
            "matches_found",
            "swap_reverted",
            "cycle_complete"
        ]
    );
}

#[test]
fn test_exploded_column_falls_and_refills() {
    // Swapping (0,2) and (1,2) completes a red run in column 0, leaving only
    // the blue token on top of it.
    let mut state = board(&["BYG", "GRB", "RGY", "RBG"]);
    let blue_id = state.grid().get(0, 3).unwrap().unwrap().id();

    state.select(GridPos::new(0, 2)).unwrap();
    state.select(GridPos::new(1, 2)).unwrap();
    state.resolve();

    let grid = state.grid();
    assert_eq!(grid.occupied_count(), 12);
    assert!(grid.tokens_consistent());
    assert!(columns_contiguous(&state));

    let bottom = grid.get(0, 0).unwrap().unwrap();
    assert_eq!(bottom.id(), blue_id);
    assert_eq!(bottom.kind(), GemKind::Blue);
    assert_eq!(bottom.position(), GridPos::new(0, 0));

    let events = state.take_events();
    let removed: Vec<GridPos> = events
        .iter()
        .filter_map(|e| match e {
            BoardEvent::TokenRemoved { pos, .. } => Some(*pos),
            _ => None,
        })
        .collect();
    assert_eq!(
        removed,
        vec![GridPos::new(0, 0), GridPos::new(0, 1), GridPos::new(0, 2)]
    );

    let settled = events.iter().find_map(|e| match e {
        BoardEvent::ColumnSettled { column: 0, moves } => Some(moves.clone()),
        _ => None,
    });
    let moves = settled.expect("column 0 settled");
    assert_eq!(moves.len(), 1);
    assert_eq!((moves[0].id, moves[0].from_y, moves[0].to_y), (blue_id, 3, 0));

    let created: Vec<(GridPos, TokenId)> = events
        .iter()
        .filter_map(|e| match e {
            BoardEvent::TokenCreated { pos, id, .. } => Some((*pos, *id)),
            _ => None,
        })
        .collect();
    let created_cells: Vec<GridPos> = created.iter().map(|(p, _)| *p).collect();
    assert_eq!(
        created_cells,
        vec![GridPos::new(0, 1), GridPos::new(0, 2), GridPos::new(0, 3)]
    );
    // Fresh tokens get fresh ids.
    assert!(created.iter().all(|(_, id)| id.0 > 12));
}

#[test]
fn test_event_order_for_a_matching_swap() {
    let mut state = board(&["RBG", "BRR"]);
    state.select(GridPos::new(0, 0)).unwrap();
    state.select(GridPos::new(0, 1)).unwrap();
    state.resolve();

    let names: Vec<&str> = state.take_events().iter().map(|e| e.name()).collect();
    assert_eq!(names[0], "selected");
    assert_eq!(names[1], "swap_started");
    assert_eq!(names[2], "swap_finished");
    assert_eq!(names[3], "matches_found");
    assert_eq!(&names[4..7], &["token_removed"; 3]);
    assert_eq!(&names[7..10], &["column_settled"; 3]);
    assert_eq!(&names[10..13], &["token_created"; 3]);
    assert_eq!(names[13], "cycle_complete");
    assert_eq!(names.len(), 14);
}

#[test]
fn test_advance_one_step_at_a_time() {
    let mut state = board(&["RBG", "BRR"]);
    assert!(state.advance().is_none());

    state.select(GridPos::new(0, 0)).unwrap();
    state.select(GridPos::new(0, 1)).unwrap();

    let first = state.advance().unwrap();
    assert_eq!(first.step, StepKind::Swap);
    assert_eq!(state.phase(), Phase::Resolving);
    assert_eq!(state.select(GridPos::new(2, 0)), Err(match3::core::Error::Busy));

    let mut last = first;
    while let Some(wait) = state.advance() {
        last = wait;
    }
    assert_eq!(last.step, StepKind::Complete);
    assert!(state.is_idle());
    assert_eq!(state.cycles_completed(), 1);
}

#[test]
fn test_same_seed_same_event_stream() {
    let play = |seed: u32| {
        let mut state = GameState::new(BoardConfig::default().seed(seed)).unwrap();
        let inputs = [
            GridPos::new(0, 0),
            GridPos::new(1, 0),
            GridPos::new(3, 4),
            GridPos::new(3, 5),
            GridPos::new(7, 7),
            GridPos::new(6, 7),
        ];
        for pos in inputs {
            let _ = state.select(pos);
            state.resolve();
        }
        (state.take_events(), state.snapshot())
    };

    assert_eq!(play(31337), play(31337));
    assert_ne!(play(31337).1.cells, play(31338).1.cells);
}

#[test]
fn test_cycles_leave_a_full_consistent_board() {
    let mut state = GameState::new(BoardConfig::default().seed(5)).unwrap();
    for i in 0..20 {
        let a = GridPos::new(i % 8, (i / 8) % 8);
        state.select(a).unwrap();
        state.select(a.offset(0, 1)).unwrap();
        state.resolve();
        assert_eq!(state.grid().occupied_count(), 64);
        assert!(state.grid().tokens_consistent());
        assert!(columns_contiguous(&state));
    }
}
