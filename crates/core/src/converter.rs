//! Coordinate converters - mapping between grid cells and world space
//!
//! A converter is a strategy object: the grid stores one and delegates every
//! position query to it. Only the vertical-plane variant ships today; other
//! layouts (isometric, hex) plug in by implementing [`CoordinateConverter`].

use std::fmt::Debug;

use glam::Vec3;

use crate::types::GridPos;

/// Grid <-> world mapping strategy.
pub trait CoordinateConverter: Debug + Send + Sync {
    /// World position of the cell's lower-left corner
    fn grid_to_world(&self, pos: GridPos, cell_size: f32, origin: Vec3) -> Vec3;

    /// World position of the cell's center (where tokens are placed)
    fn grid_to_world_center(&self, pos: GridPos, cell_size: f32, origin: Vec3) -> Vec3;

    /// Cell containing `world`.
    ///
    /// Floors rather than rounds, so every point inside a cell maps back to
    /// that cell. The result may lie outside the grid.
    fn world_to_grid(&self, world: Vec3, cell_size: f32, origin: Vec3) -> GridPos;

    /// Facing direction of the grid plane (debug overlays only)
    fn forward(&self) -> Vec3;
}

/// Converter for grids standing on the X-Y plane.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VerticalConverter;

impl CoordinateConverter for VerticalConverter {
    fn grid_to_world(&self, pos: GridPos, cell_size: f32, origin: Vec3) -> Vec3 {
        Vec3::new(pos.x as f32, pos.y as f32, 0.0) * cell_size + origin
    }

    fn grid_to_world_center(&self, pos: GridPos, cell_size: f32, origin: Vec3) -> Vec3 {
        let half = cell_size * 0.5;
        Vec3::new(
            pos.x as f32 * cell_size + half,
            pos.y as f32 * cell_size + half,
            0.0,
        ) + origin
    }

    fn world_to_grid(&self, world: Vec3, cell_size: f32, origin: Vec3) -> GridPos {
        let local = (world - origin) / cell_size;
        GridPos::new(local.x.floor() as i32, local.y.floor() as i32)
    }

    fn forward(&self) -> Vec3 {
        Vec3::Z
    }
}
