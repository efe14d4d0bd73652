//! Mapping between presentation-space points and grid cells.
//!
//! Presentation space uses the same convention as the grid: `y` grows
//! downward, and `origin` is the top-left corner of cell `(0, 0)`.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::error::GridError;

/// Placement of a grid in presentation space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridLayout {
    /// Top-left corner of cell `(0, 0)`
    origin: Vec2,
    /// Side length of one square cell
    cell_size: f32,
    /// Width in cells
    width: i32,
    /// Height in cells
    height: i32,
}

impl GridLayout {
    /// Create a layout.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidDimensions`] for non-positive dimensions
    /// and [`GridError::InvalidCellSize`] for a non-positive or non-finite
    /// cell size.
    pub fn new(origin: Vec2, cell_size: f32, width: i32, height: i32) -> Result<Self, GridError> {
        if width <= 0 || height <= 0 {
            return Err(GridError::InvalidDimensions { width, height });
        }
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(GridError::InvalidCellSize { cell_size });
        }
        Ok(Self {
            origin,
            cell_size,
            width,
            height,
        })
    }

    /// Top-left corner of cell `(0, 0)`.
    #[must_use]
    pub const fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Side length of one cell.
    #[must_use]
    pub const fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Grid size in cells.
    #[must_use]
    pub const fn size(&self) -> IVec2 {
        IVec2::new(self.width, self.height)
    }

    /// Grid size in presentation units.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn pixel_size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32) * self.cell_size
    }

    /// Cell containing `point`, or `None` if the point is off the grid.
    #[must_use]
    pub fn cell_at(&self, point: Vec2) -> Option<IVec2> {
        let cell = self.cell_at_unclamped(point);
        let on_grid = cell.x >= 0 && cell.y >= 0 && cell.x < self.width && cell.y < self.height;
        on_grid.then_some(cell)
    }

    /// Cell containing `point`, even when it lies off the grid.
    ///
    /// Used for a candidate origin whose footprint only partly overlaps the
    /// board; the highlight query clips the rest.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn cell_at_unclamped(&self, point: Vec2) -> IVec2 {
        let local = (point - self.origin) / self.cell_size;
        IVec2::new(local.x.floor() as i32, local.y.floor() as i32)
    }

    /// Top-left corner of `cell`.
    #[must_use]
    pub fn cell_top_left(&self, cell: IVec2) -> Vec2 {
        self.origin + cell.as_vec2() * self.cell_size
    }

    /// Center of `cell`.
    #[must_use]
    pub fn cell_center(&self, cell: IVec2) -> Vec2 {
        self.cell_top_left(cell) + Vec2::splat(self.cell_size * 0.5)
    }
}
