//! Grid module - fixed-size storage for cell contents
//!
//! The grid is a W x H array of optional values addressed by (x, y), with
//! x in 0..W (left to right) and y in 0..H (bottom to top).
//! Uses a flat row-major vector (`y * W + x`) for cache locality; the size is
//! fixed at construction and never reallocates.
//!
//! The grid carries no game rules. It stores values, reports bounds, and
//! translates between cells and world space through its
//! [`CoordinateConverter`].

use std::sync::Arc;

use glam::Vec3;

use crate::converter::{CoordinateConverter, VerticalConverter};
use crate::types::GridPos;
use crate::{Error, Result};

/// Fixed-size 2D container of `Option<T>`.
#[derive(Debug, Clone)]
pub struct Grid<T> {
    width: i32,
    height: i32,
    cell_size: f32,
    origin: Vec3,
    converter: Arc<dyn CoordinateConverter>,
    /// Flat array of cells, row-major order (y * width + x)
    cells: Vec<Option<T>>,
}

impl<T> Grid<T> {
    /// Create an empty grid.
    ///
    /// Fails with [`Error::InvalidConfiguration`] for non-positive dimensions
    /// or a cell size that is not a positive finite number.
    pub fn new(
        width: i32,
        height: i32,
        cell_size: f32,
        origin: Vec3,
        converter: Arc<dyn CoordinateConverter>,
    ) -> Result<Self> {
        if width <= 0 || height <= 0 {
            return Err(Error::InvalidConfiguration(format!(
                "grid dimensions must be positive, got {}x{}",
                width, height
            )));
        }
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(Error::InvalidConfiguration(format!(
                "cell size must be positive, got {}",
                cell_size
            )));
        }

        let len = (width as usize) * (height as usize);
        let mut cells = Vec::with_capacity(len);
        cells.resize_with(len, || None);

        Ok(Self {
            width,
            height,
            cell_size,
            origin,
            converter,
            cells,
        })
    }

    /// Create an empty grid on the X-Y plane.
    pub fn vertical(width: i32, height: i32, cell_size: f32, origin: Vec3) -> Result<Self> {
        Self::new(width, height, cell_size, origin, Arc::new(VerticalConverter))
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(&self, x: i32, y: i32) -> Result<usize> {
        if x < 0 || x >= self.width || y < 0 || y >= self.height {
            return Err(Error::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok((y as usize) * (self.width as usize) + (x as usize))
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn converter(&self) -> &dyn CoordinateConverter {
        self.converter.as_ref()
    }

    /// Check if position lies inside the grid
    pub fn contains(&self, pos: GridPos) -> bool {
        self.index(pos.x, pos.y).is_ok()
    }

    /// Get the contents of cell (x, y).
    ///
    /// `Ok(None)` is an empty cell; `Err(OutOfBounds)` is no cell at all.
    pub fn get(&self, x: i32, y: i32) -> Result<Option<&T>> {
        let idx = self.index(x, y)?;
        Ok(self.cells[idx].as_ref())
    }

    pub fn get_mut(&mut self, x: i32, y: i32) -> Result<Option<&mut T>> {
        let idx = self.index(x, y)?;
        Ok(self.cells[idx].as_mut())
    }

    /// Replace the contents of cell (x, y), returning the previous value
    pub fn set(&mut self, x: i32, y: i32, value: Option<T>) -> Result<Option<T>> {
        let idx = self.index(x, y)?;
        Ok(std::mem::replace(&mut self.cells[idx], value))
    }

    /// Empty cell (x, y), returning what it held
    pub fn take(&mut self, x: i32, y: i32) -> Result<Option<T>> {
        let idx = self.index(x, y)?;
        Ok(self.cells[idx].take())
    }

    /// Exchange the contents of two cells
    pub fn swap(&mut self, a: GridPos, b: GridPos) -> Result<()> {
        let ia = self.index(a.x, a.y)?;
        let ib = self.index(b.x, b.y)?;
        self.cells.swap(ia, ib);
        Ok(())
    }

    /// True when `pos` is inside the grid and holds nothing
    pub fn is_empty_at(&self, pos: GridPos) -> bool {
        matches!(self.get(pos.x, pos.y), Ok(None))
    }

    /// True when `pos` is inside the grid and holds a value
    pub fn is_occupied(&self, pos: GridPos) -> bool {
        matches!(self.get(pos.x, pos.y), Ok(Some(_)))
    }

    /// Number of occupied cells
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Occupied cells in row-major order
    pub fn iter_occupied(&self) -> impl Iterator<Item = (GridPos, &T)> + '_ {
        let width = self.width as usize;
        self.cells.iter().enumerate().filter_map(move |(idx, cell)| {
            cell.as_ref().map(|value| {
                (
                    GridPos::new((idx % width) as i32, (idx / width) as i32),
                    value,
                )
            })
        })
    }

    /// Empty every cell
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = None;
        }
    }

    /// World position of cell (x, y)'s corner
    pub fn world_position(&self, x: i32, y: i32) -> Vec3 {
        self.converter
            .grid_to_world(GridPos::new(x, y), self.cell_size, self.origin)
    }

    /// World position of cell (x, y)'s center
    pub fn world_position_center(&self, x: i32, y: i32) -> Vec3 {
        self.converter
            .grid_to_world_center(GridPos::new(x, y), self.cell_size, self.origin)
    }

    /// Cell containing a world position (may be outside the grid)
    pub fn world_to_grid(&self, world: Vec3) -> GridPos {
        self.converter
            .world_to_grid(world, self.cell_size, self.origin)
    }

    /// Describe the grid as line segments and coordinate labels.
    ///
    /// Read-only: intended for debug overlays drawn by presentation.
    pub fn debug_overlay(&self) -> DebugOverlay {
        let cells = (self.width as usize) * (self.height as usize);
        let mut overlay = DebugOverlay {
            lines: Vec::with_capacity(cells * 2 + 2),
            labels: Vec::with_capacity(cells),
        };
        let facing = self.converter.forward();

        for x in 0..self.width {
            for y in 0..self.height {
                let corner = self.world_position(x, y);
                overlay.labels.push(DebugLabel {
                    text: GridPos::new(x, y).to_string(),
                    position: corner,
                    facing,
                });
                overlay.lines.push((corner, self.world_position(x, y + 1)));
                overlay.lines.push((corner, self.world_position(x + 1, y)));
            }
        }

        // Closing top and right borders.
        overlay.lines.push((
            self.world_position(0, self.height),
            self.world_position(self.width, self.height),
        ));
        overlay.lines.push((
            self.world_position(self.width, 0),
            self.world_position(self.width, self.height),
        ));

        overlay
    }
}

/// Grid lines and coordinate labels for a debug overlay
#[derive(Debug, Clone, PartialEq)]
pub struct DebugOverlay {
    pub lines: Vec<(Vec3, Vec3)>,
    pub labels: Vec<DebugLabel>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DebugLabel {
    pub text: String,
    pub position: Vec3,
    pub facing: Vec3,
}
