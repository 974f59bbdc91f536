//! Grid tests - storage, bounds and coordinate conversion

use match3::core::{Error, Grid, Token, Vec3};
use match3::types::{GemKind, GridPos, TokenId};

#[test]
fn test_grid_new_empty() {
    let grid: Grid<u8> = Grid::vertical(8, 8, 1.0, Vec3::ZERO).unwrap();
    assert_eq!(grid.width(), 8);
    assert_eq!(grid.height(), 8);
    assert_eq!(grid.occupied_count(), 0);

    for y in 0..8 {
        for x in 0..8 {
            assert_eq!(grid.get(x, y), Ok(None), "cell ({}, {}) should be empty", x, y);
        }
    }
}

#[test]
fn test_grid_rejects_bad_dimensions() {
    assert!(matches!(
        Grid::<u8>::vertical(0, 8, 1.0, Vec3::ZERO),
        Err(Error::InvalidConfiguration(_))
    ));
    assert!(Grid::<u8>::vertical(8, -1, 1.0, Vec3::ZERO).is_err());
    assert!(Grid::<u8>::vertical(8, 8, 0.0, Vec3::ZERO).is_err());
    assert!(Grid::<u8>::vertical(8, 8, f32::NAN, Vec3::ZERO).is_err());
}

#[test]
fn test_grid_out_of_bounds_is_an_error() {
    let mut grid: Grid<u8> = Grid::vertical(3, 2, 1.0, Vec3::ZERO).unwrap();

    assert_eq!(
        grid.get(-1, 0),
        Err(Error::OutOfBounds {
            x: -1,
            y: 0,
            width: 3,
            height: 2
        })
    );
    assert!(grid.get(3, 0).is_err());
    assert!(grid.get(0, 2).is_err());
    assert!(grid.set(3, 1, Some(1)).is_err());
    assert!(grid.take(0, -5).is_err());
    assert!(grid
        .swap(GridPos::new(0, 0), GridPos::new(0, 2))
        .is_err());

    // Failed writes leave the grid untouched.
    assert_eq!(grid.occupied_count(), 0);
    assert!(!grid.contains(GridPos::new(3, 0)));
    assert!(grid.contains(GridPos::new(2, 1)));
}

#[test]
fn test_grid_set_take_swap() {
    let mut grid: Grid<u8> = Grid::vertical(3, 3, 1.0, Vec3::ZERO).unwrap();

    assert_eq!(grid.set(1, 2, Some(7)), Ok(None));
    assert_eq!(grid.set(1, 2, Some(9)), Ok(Some(7)));
    assert_eq!(grid.get(1, 2), Ok(Some(&9)));
    assert!(grid.is_occupied(GridPos::new(1, 2)));

    grid.swap(GridPos::new(1, 2), GridPos::new(0, 0)).unwrap();
    assert_eq!(grid.get(0, 0), Ok(Some(&9)));
    assert!(grid.is_empty_at(GridPos::new(1, 2)));

    assert_eq!(grid.take(0, 0), Ok(Some(9)));
    assert_eq!(grid.take(0, 0), Ok(None));
    assert_eq!(grid.occupied_count(), 0);
}

#[test]
fn test_grid_iter_occupied_row_major() {
    let mut grid: Grid<char> = Grid::vertical(3, 2, 1.0, Vec3::ZERO).unwrap();
    grid.set(2, 1, Some('c')).unwrap();
    grid.set(0, 1, Some('b')).unwrap();
    grid.set(1, 0, Some('a')).unwrap();

    let seen: Vec<(GridPos, char)> = grid.iter_occupied().map(|(p, v)| (p, *v)).collect();
    assert_eq!(
        seen,
        vec![
            (GridPos::new(1, 0), 'a'),
            (GridPos::new(0, 1), 'b'),
            (GridPos::new(2, 1), 'c'),
        ]
    );

    grid.clear();
    assert_eq!(grid.iter_occupied().count(), 0);
}

#[test]
fn test_world_round_trip_for_every_cell() {
    let configs = [
        (1.0, Vec3::ZERO),
        (2.5, Vec3::new(-4.0, 3.0, 0.0)),
        (0.75, Vec3::new(10.0, -2.0, 5.0)),
    ];
    for (cell_size, origin) in configs {
        let grid: Grid<u8> = Grid::vertical(6, 5, cell_size, origin).unwrap();
        for y in 0..5 {
            for x in 0..6 {
                let center = grid.world_position_center(x, y);
                assert_eq!(
                    grid.world_to_grid(center),
                    GridPos::new(x, y),
                    "cell_size {} origin {:?}",
                    cell_size,
                    origin
                );
            }
        }
    }
}

#[test]
fn test_world_position_respects_origin_and_size() {
    let grid: Grid<u8> = Grid::vertical(4, 4, 2.0, Vec3::new(1.0, 1.0, 0.0)).unwrap();
    assert_eq!(grid.world_position(0, 0), Vec3::new(1.0, 1.0, 0.0));
    assert_eq!(grid.world_position(2, 1), Vec3::new(5.0, 3.0, 0.0));
    assert_eq!(grid.world_position_center(2, 1), Vec3::new(6.0, 4.0, 0.0));

    // Points below the origin map outside the grid.
    let outside = grid.world_to_grid(Vec3::new(0.5, 0.5, 0.0));
    assert_eq!(outside, GridPos::new(-1, -1));
    assert!(!grid.contains(outside));
}

#[test]
fn test_debug_overlay_shape() {
    let grid: Grid<u8> = Grid::vertical(3, 2, 1.0, Vec3::ZERO).unwrap();
    let overlay = grid.debug_overlay();

    assert_eq!(overlay.labels.len(), 6);
    assert_eq!(overlay.lines.len(), 3 * 2 * 2 + 2);
    assert!(overlay.labels.iter().any(|l| l.text == "2,1"));
    assert!(overlay.labels.iter().all(|l| l.facing == Vec3::Z));
}

#[test]
fn test_token_helpers_keep_coordinates_in_sync() {
    let mut grid: Grid<Token<GemKind>> = Grid::vertical(3, 3, 1.0, Vec3::ZERO).unwrap();
    let a = Token::new(TokenId(1), GemKind::Red, GridPos::new(9, 9));
    let b = Token::new(TokenId(2), GemKind::Blue, GridPos::new(9, 9));

    grid.place_token(GridPos::new(0, 0), a).unwrap();
    grid.place_token(GridPos::new(2, 2), b).unwrap();
    assert!(grid.tokens_consistent());

    grid.swap_tokens(GridPos::new(0, 0), GridPos::new(2, 2)).unwrap();
    assert!(grid.tokens_consistent());
    assert_eq!(grid.kind_at(GridPos::new(0, 0)), Some(GemKind::Blue));
    let moved = grid.get(2, 2).unwrap().unwrap();
    assert_eq!(moved.id(), TokenId(1));
    assert_eq!(moved.position(), GridPos::new(2, 2));

    // A raw swap bypasses the coordinate update.
    grid.swap(GridPos::new(0, 0), GridPos::new(2, 2)).unwrap();
    assert!(!grid.tokens_consistent());
}
