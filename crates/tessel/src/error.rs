//! Error types for contract violations.
//!
//! Only programmer errors and corrupt stored data live here: malformed
//! masks, non-positive grid dimensions, out-of-range mask lookups, grids or
//! pieces whose serialized fields disagree. A placement that does not fit is a
//! normal interactive outcome and is reported through
//! [`PlacementRejection`](crate::grid::PlacementRejection) or a `bool`, never
//! through these types.

use glam::IVec2;
use thiserror::Error;

use crate::piece::PieceId;
use crate::rotation::Rotation;

/// Errors raised while building or indexing a [`ShapeMask`](crate::ShapeMask).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MaskError {
    /// One of the declared dimensions is zero.
    #[error("mask dimensions must be positive, got {rows}x{cols}")]
    EmptyDimensions {
        /// Declared row count
        rows: usize,
        /// Declared column count
        cols: usize,
    },

    /// The cell array does not hold `rows * cols` entries.
    #[error("mask declared {rows}x{cols} but has {len} cells")]
    LengthMismatch {
        /// Declared row count
        rows: usize,
        /// Declared column count
        cols: usize,
        /// Actual cell count
        len: usize,
    },

    /// Every cell is empty; a piece must occupy at least one cell.
    #[error("mask has no solid cells")]
    NoSolidCells,

    /// A row literal is shorter or longer than the first row.
    #[error("mask row {row} has {found} cells, expected {expected}")]
    RaggedRows {
        /// Zero-based row index
        row: usize,
        /// Width of the first row
        expected: usize,
        /// Width of the offending row
        found: usize,
    },

    /// A pattern string contains a character other than `#`, `X` or `.`.
    #[error("invalid mask glyph {glyph:?}")]
    InvalidGlyph {
        /// The offending character
        glyph: char,
    },

    /// `cell_at` was called outside the mask's own bounding box.
    #[error("mask cell ({x}, {y}) is outside {rows}x{cols}")]
    OutOfRange {
        /// Requested column
        x: i32,
        /// Requested row
        y: i32,
        /// Mask row count
        rows: usize,
        /// Mask column count
        cols: usize,
    },
}

/// Errors raised while constructing a grid or its layout.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    /// Width or height is not positive.
    #[error("grid dimensions must be positive, got {width}x{height}")]
    InvalidDimensions {
        /// Requested width in cells
        width: i32,
        /// Requested height in cells
        height: i32,
    },

    /// Cell size is zero, negative or not finite.
    #[error("cell size must be a positive finite number, got {cell_size}")]
    InvalidCellSize {
        /// Requested cell size in presentation units
        cell_size: f32,
    },

    /// A stored grid holds the wrong number of cells.
    #[error("grid {width}x{height} needs {expected} cells, found {found}")]
    CellCountMismatch {
        /// Declared width in cells
        width: i32,
        /// Declared height in cells
        height: i32,
        /// `width * height`
        expected: usize,
        /// Stored cell count
        found: usize,
    },

    /// A recorded footprint and the cell array disagree about `cell`.
    #[error("footprint of piece {piece} disagrees at cell {cell} (cell holds {owner:?})")]
    FootprintMismatch {
        /// Piece the footprint (or cell) names
        piece: PieceId,
        /// The disputed cell
        cell: IVec2,
        /// What the cell array holds there
        owner: Option<PieceId>,
    },
}

/// Errors raised while restoring a stored piece.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PieceError {
    /// The mask does not have the base size turned by the rotation.
    #[error(
        "piece {piece} is {base_width}x{base_height} at {rotation} but its mask is {cols}x{rows}"
    )]
    MaskSizeMismatch {
        /// Offending piece
        piece: PieceId,
        /// Declared width at `Deg0`
        base_width: usize,
        /// Declared height at `Deg0`
        base_height: usize,
        /// Declared rotation
        rotation: Rotation,
        /// Mask row count
        rows: usize,
        /// Mask column count
        cols: usize,
    },
}
