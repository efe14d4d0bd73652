//! # Tessel
//!
//! Occupancy grid substrate for placing multi-cell pieces on a fixed board.
//!
//! Tessel represents a board as a 2D array of cell owners and a piece as a
//! boolean shape mask plus a quarter-turn rotation. It provides:
//!
//! - **Shape masks**: validated footprints with a general 90° rotation
//! - **Placement pieces**: mask + rotation + arbitrary domain payload
//! - **Occupancy grid**: bounds checks, feasibility tests, all-or-nothing
//!   commit and release, change notifications
//! - **Highlights**: per-cell valid/invalid classification for previews
//! - **Layouts**: presentation-space point to cell conversion
//!
//! Rejected placement is a normal outcome and is reported as `false` or a
//! [`PlacementRejection`]. Only contract violations (bad dimensions, bad mask
//! data) are errors.
//!
//! ## Quick Start
//!
//! ```rust
//! use glam::IVec2;
//! use tessel::{OccupancyGrid, PieceId, PlacementPiece, ShapeMask};
//!
//! let mut grid = OccupancyGrid::new(8, 8).unwrap();
//! let mut ell = PlacementPiece::new(
//!     PieceId::new(1),
//!     ShapeMask::parse("#.\n##").unwrap(),
//!     "ell",
//! );
//!
//! assert!(grid.place(&mut ell, IVec2::ZERO));
//! assert_eq!(grid.piece_at(IVec2::new(1, 1)), Some(ell.id()));
//! assert_eq!(grid.piece_at(IVec2::new(1, 0)), None);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod grid;
pub mod highlight;
pub mod layout;
pub mod mask;
pub mod piece;
pub mod rotation;

// Re-exports for convenience
pub use error::{GridError, MaskError, PieceError};
pub use grid::{GridEvent, OccupancyGrid, PlacementRejection};
pub use highlight::{CellHighlight, Highlight, HighlightCell};
pub use layout::GridLayout;
pub use mask::ShapeMask;
pub use piece::{PieceId, PlacementPiece};
pub use rotation::Rotation;
