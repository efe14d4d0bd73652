//! Shape masks: the footprint of a piece inside its bounding box.
//!
//! A mask is a row-major grid of booleans. Rotation never shuffles bits in
//! place; it builds a new mask with swapped dimensions, so the declared size
//! and the cell array can never disagree.

use glam::IVec2;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::MaskError;
use crate::rotation::Rotation;

/// Boolean occupancy mask, `rows x cols`, row-major.
///
/// # Example
///
/// ```
/// use tessel::ShapeMask;
///
/// let ell = ShapeMask::parse("#.\n##").unwrap();
/// assert_eq!((ell.rows(), ell.cols()), (2, 2));
/// assert_eq!(ell.solid_count(), 3);
///
/// let turned = ell.rotate90(true);
/// assert_eq!(turned.to_string(), "##\n#.");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawMask", into = "RawMask")]
pub struct ShapeMask {
    rows: usize,
    cols: usize,
    cells: Vec<bool>,
}

impl ShapeMask {
    /// Create a mask, validating dimensions, length and solidity.
    ///
    /// # Errors
    ///
    /// Returns a [`MaskError`] if either dimension is zero, if `cells` does
    /// not hold exactly `rows * cols` entries, or if no cell is solid.
    pub fn new(rows: usize, cols: usize, cells: Vec<bool>) -> Result<Self, MaskError> {
        if rows == 0 || cols == 0 {
            return Err(MaskError::EmptyDimensions { rows, cols });
        }
        if cells.len() != rows * cols {
            return Err(MaskError::LengthMismatch {
                rows,
                cols,
                len: cells.len(),
            });
        }
        if !cells.iter().any(|&c| c) {
            return Err(MaskError::NoSolidCells);
        }
        Ok(Self { rows, cols, cells })
    }

    /// Create a mask from row slices.
    ///
    /// # Errors
    ///
    /// Returns [`MaskError::RaggedRows`] if rows differ in width, plus any
    /// error from [`ShapeMask::new`].
    pub fn from_rows(rows: &[&[bool]]) -> Result<Self, MaskError> {
        let cols = rows.first().map_or(0, |r| r.len());
        let mut cells = Vec::with_capacity(rows.len() * cols);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(MaskError::RaggedRows {
                    row: i,
                    expected: cols,
                    found: row.len(),
                });
            }
            cells.extend_from_slice(row);
        }
        Self::new(rows.len(), cols, cells)
    }

    /// Parse a mask drawn as text: `#` or `X` solid, `.` empty, one row per line.
    ///
    /// Blank lines and surrounding whitespace are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`MaskError::InvalidGlyph`] for unknown characters, plus any
    /// error from [`ShapeMask::from_rows`].
    pub fn parse(pattern: &str) -> Result<Self, MaskError> {
        let mut rows: Vec<Vec<bool>> = Vec::new();
        for line in pattern.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let row = line
                .chars()
                .map(|glyph| match glyph {
                    '#' | 'X' => Ok(true),
                    '.' => Ok(false),
                    _ => Err(MaskError::InvalidGlyph { glyph }),
                })
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(row);
        }
        let slices: Vec<&[bool]> = rows.iter().map(Vec::as_slice).collect();
        Self::from_rows(&slices)
    }

    /// A fully solid rectangle.
    ///
    /// # Errors
    ///
    /// Returns [`MaskError::EmptyDimensions`] if either dimension is zero.
    pub fn filled(rows: usize, cols: usize) -> Result<Self, MaskError> {
        Self::new(rows, cols, vec![true; rows * cols])
    }

    /// A single solid cell.
    #[must_use]
    pub fn single() -> Self {
        Self {
            rows: 1,
            cols: 1,
            cells: vec![true],
        }
    }

    /// Number of rows (footprint height).
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns (footprint width).
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Row-major cell slice.
    #[must_use]
    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    /// Bounds-checked cell lookup, `x` is the column and `y` the row.
    ///
    /// # Errors
    ///
    /// Returns [`MaskError::OutOfRange`] if `(x, y)` lies outside the mask.
    #[allow(clippy::cast_sign_loss)]
    pub fn cell_at(&self, x: i32, y: i32) -> Result<bool, MaskError> {
        if x < 0 || y < 0 || x as usize >= self.cols || y as usize >= self.rows {
            return Err(MaskError::OutOfRange {
                x,
                y,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(self.cells[y as usize * self.cols + x as usize])
    }

    /// Number of solid cells.
    #[must_use]
    pub fn solid_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Offsets `(dx, dy)` of every solid cell, in row-major order.
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn solid_cells(&self) -> impl Iterator<Item = IVec2> + '_ {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, solid)| **solid)
            .map(move |(i, _)| IVec2::new((i % cols) as i32, (i / cols) as i32))
    }

    /// Footprint size as `(width, height)` = `(cols, rows)`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn size(&self) -> IVec2 {
        IVec2::new(self.cols as i32, self.rows as i32)
    }

    /// Rotate a quarter turn, returning a new `cols x rows` mask.
    ///
    /// Clockwise: `new[r][c] = old[rows - 1 - c][r]`.
    /// Counter-clockwise: `new[r][c] = old[c][cols - 1 - r]`.
    #[must_use]
    pub fn rotate90(&self, clockwise: bool) -> Self {
        let (rows, cols) = (self.cols, self.rows);
        let mut cells = Vec::with_capacity(self.cells.len());
        for r in 0..rows {
            for c in 0..cols {
                let (src_r, src_c) = if clockwise {
                    (self.rows - 1 - c, r)
                } else {
                    (c, self.cols - 1 - r)
                };
                cells.push(self.cells[src_r * self.cols + src_c]);
            }
        }
        Self { rows, cols, cells }
    }

    /// This mask rotated clockwise by `rotation`.
    #[must_use]
    pub fn rotated(&self, rotation: Rotation) -> Self {
        let mut mask = self.clone();
        for _ in 0..rotation.quarter_turns() {
            mask = mask.rotate90(true);
        }
        mask
    }
}

impl fmt::Display for ShapeMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (r, row) in self.cells.chunks(self.cols).enumerate() {
            if r > 0 {
                writeln!(f)?;
            }
            for &solid in row {
                write!(f, "{}", if solid { '#' } else { '.' })?;
            }
        }
        Ok(())
    }
}

impl std::str::FromStr for ShapeMask {
    type Err = MaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Unvalidated wire form; deserialization goes through [`ShapeMask::new`].
#[derive(Serialize, Deserialize)]
struct RawMask {
    rows: usize,
    cols: usize,
    cells: Vec<bool>,
}

impl TryFrom<RawMask> for ShapeMask {
    type Error = MaskError;

    fn try_from(raw: RawMask) -> Result<Self, Self::Error> {
        Self::new(raw.rows, raw.cols, raw.cells)
    }
}

impl From<ShapeMask> for RawMask {
    fn from(mask: ShapeMask) -> Self {
        Self {
            rows: mask.rows,
            cols: mask.cols,
            cells: mask.cells,
        }
    }
}
