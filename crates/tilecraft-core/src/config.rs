//! Board configuration.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tessel::{GridError, GridLayout, OccupancyGrid};

/// Configuration for a [`Board`](crate::board::Board).
///
/// Missing fields fall back to [`Default`] when deserialized.
///
/// # Example
///
/// ```
/// use tilecraft_core::BoardConfig;
///
/// let config = BoardConfig::with_size(10, 6);
/// assert_eq!(config.width, 10);
/// assert_eq!(config.cell_size, 64.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Width in cells
    pub width: i32,
    /// Height in cells
    pub height: i32,
    /// Side length of one cell in presentation units
    pub cell_size: f32,
    /// Presentation-space position of the top-left corner of cell (0, 0)
    pub origin: Vec2,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            width: 8,
            height: 8,
            cell_size: 64.0,
            origin: Vec2::ZERO,
        }
    }
}

impl BoardConfig {
    /// Create a config with the given size and default cell geometry.
    #[must_use]
    pub fn with_size(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Build the presentation layout.
    ///
    /// # Errors
    ///
    /// Returns a [`GridError`] for non-positive dimensions or cell size.
    pub fn layout(&self) -> Result<GridLayout, GridError> {
        GridLayout::new(self.origin, self.cell_size, self.width, self.height)
    }

    /// Build an empty grid.
    ///
    /// # Errors
    ///
    /// Returns a [`GridError`] for non-positive dimensions.
    pub fn grid(&self) -> Result<OccupancyGrid, GridError> {
        OccupancyGrid::new(self.width, self.height)
    }
}
