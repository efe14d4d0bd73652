//! Highlight results consumed by presentation layers.
//!
//! A highlight classifies each in-bounds cell of a candidate footprint as
//! valid (free) or invalid (claimed by another piece). Cells outside the grid
//! are clipped from the list.

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// Classification of one highlighted cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellHighlight {
    /// Cell is free (or already held by the candidate itself)
    Valid,
    /// Cell is claimed by another piece
    Invalid,
}

/// One highlighted cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HighlightCell {
    /// Grid coordinate
    pub cell: IVec2,
    /// Valid or invalid
    pub state: CellHighlight,
}

/// Highlight for a candidate footprint at `origin`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highlight {
    /// Candidate origin (top-left of the mask's bounding box)
    pub origin: IVec2,
    /// In-bounds cells of the footprint, in mask row-major order
    pub cells: Vec<HighlightCell>,
    /// Whether the whole footprint can be committed here
    pub placeable: bool,
}

impl Highlight {
    /// Cells classified as valid.
    pub fn valid_cells(&self) -> impl Iterator<Item = IVec2> + '_ {
        self.cells_in(CellHighlight::Valid)
    }

    /// Cells classified as invalid.
    pub fn invalid_cells(&self) -> impl Iterator<Item = IVec2> + '_ {
        self.cells_in(CellHighlight::Invalid)
    }

    /// Number of highlighted cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True if no cell of the footprint lies on the grid.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    fn cells_in(&self, state: CellHighlight) -> impl Iterator<Item = IVec2> + '_ {
        self.cells
            .iter()
            .filter(move |c| c.state == state)
            .map(|c| c.cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{OccupancyGrid, PieceId, PlacementPiece, ShapeMask};

    #[test]
    fn test_classifies_and_round_trips() {
        let mut grid = OccupancyGrid::new(3, 2).unwrap();
        let mut single = PlacementPiece::new(PieceId::new(1), ShapeMask::single(), ());
        assert!(grid.place(&mut single, IVec2::new(1, 0)));

        let bar = ShapeMask::parse("###").unwrap();
        let highlight = grid.highlight(&bar, IVec2::new(1, 0), None);
        assert_eq!(highlight.len(), 2);
        assert_eq!(highlight.invalid_cells().collect::<Vec<_>>(), vec![IVec2::new(1, 0)]);
        assert_eq!(highlight.valid_cells().collect::<Vec<_>>(), vec![IVec2::new(2, 0)]);
        assert!(!highlight.placeable);

        let json = serde_json::to_string(&highlight).unwrap();
        let back: Highlight = serde_json::from_str(&json).unwrap();
        assert_eq!(back, highlight);
    }

    #[test]
    fn test_fully_off_grid_is_empty() {
        let grid = OccupancyGrid::new(3, 2).unwrap();
        let highlight = grid.highlight(&ShapeMask::single(), IVec2::new(-4, 9), None);
        assert!(highlight.is_empty());
        assert!(!highlight.placeable);
    }
}
