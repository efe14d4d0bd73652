//! Placement pieces: a shape mask, its rotation, and a domain payload.
//!
//! A piece knows nothing about grids except the origin it was last committed
//! at. That origin is written only by [`OccupancyGrid`](crate::OccupancyGrid).

use glam::IVec2;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::PieceError;
use crate::mask::ShapeMask;
use crate::rotation::Rotation;

/// Handle a grid stores in each claimed cell.
///
/// Cells and footprints hold only this handle, so a piece can leave the grid,
/// sit in a shop slot and come back without the grid owning it. Handles are
/// ordered, which keeps footprint maps and board storage deterministic.
///
/// # Example
///
/// ```
/// use tessel::PieceId;
///
/// let first = PieceId::new(1);
/// assert!(first < PieceId::new(2));
/// assert_eq!(first.to_string(), "1");
/// assert_eq!(format!("{first:?}"), "PieceId(1)");
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PieceId(u64);

impl PieceId {
    /// Wrap a raw handle value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// The raw handle value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PieceId({})", self.0)
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for PieceId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

/// A piece that can be placed on an occupancy grid.
///
/// `A` is the domain payload (tile damage, shop price, sprite handle...). The
/// grid algorithm never looks at it.
///
/// # Invariant
///
/// `mask.rows() == effective_height()` and `mask.cols() == effective_width()`
/// at every rotation. [`rotate`](Self::rotate) updates rotation and mask
/// together.
///
/// # Example
///
/// ```
/// use tessel::{PieceId, PlacementPiece, ShapeMask};
///
/// let mut piece = PlacementPiece::new(PieceId::new(0), ShapeMask::filled(2, 3).unwrap(), ());
/// assert_eq!((piece.effective_width(), piece.effective_height()), (3, 2));
///
/// piece.rotate();
/// assert_eq!((piece.effective_width(), piece.effective_height()), (2, 3));
/// assert_eq!(piece.mask().rows(), 3);
/// ```
///
/// Deserialization checks that the stored mask has the base size turned by
/// the stored rotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "RawPiece<A>",
    bound(deserialize = "A: Deserialize<'de>")
)]
pub struct PlacementPiece<A> {
    /// Identifier stored in grid cells.
    id: PieceId,
    /// Footprint width at `Deg0`.
    base_width: usize,
    /// Footprint height at `Deg0`.
    base_height: usize,
    /// Current rotation.
    rotation: Rotation,
    /// Mask for the current rotation.
    mask: ShapeMask,
    /// Domain payload.
    attributes: A,
    /// Origin of the committed footprint, `None` while unplaced.
    grid_position: Option<IVec2>,
}

impl<A> PlacementPiece<A> {
    /// Create an unplaced, unrotated piece. `mask` is the `Deg0` footprint.
    #[must_use]
    pub fn new(id: PieceId, mask: ShapeMask, attributes: A) -> Self {
        Self {
            id,
            base_width: mask.cols(),
            base_height: mask.rows(),
            rotation: Rotation::Deg0,
            mask,
            attributes,
            grid_position: None,
        }
    }

    /// Start the piece at a given rotation (builder pattern).
    #[must_use]
    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        let base = (0..self.rotation.quarter_turns())
            .fold(self.mask.clone(), |mask, _| mask.rotate90(false));
        self.mask = base.rotated(rotation);
        self.rotation = rotation;
        self
    }

    /// Identifier of this piece.
    #[must_use]
    pub const fn id(&self) -> PieceId {
        self.id
    }

    /// Current rotation.
    #[must_use]
    pub const fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Mask for the current rotation.
    #[must_use]
    pub fn mask(&self) -> &ShapeMask {
        &self.mask
    }

    /// Domain payload.
    #[must_use]
    pub fn attributes(&self) -> &A {
        &self.attributes
    }

    /// Mutable domain payload.
    pub fn attributes_mut(&mut self) -> &mut A {
        &mut self.attributes
    }

    /// Footprint width at `Deg0`.
    #[must_use]
    pub const fn base_width(&self) -> usize {
        self.base_width
    }

    /// Footprint height at `Deg0`.
    #[must_use]
    pub const fn base_height(&self) -> usize {
        self.base_height
    }

    /// Footprint width after rotation.
    #[must_use]
    pub const fn effective_width(&self) -> usize {
        if self.rotation.swaps_axes() {
            self.base_height
        } else {
            self.base_width
        }
    }

    /// Footprint height after rotation.
    #[must_use]
    pub const fn effective_height(&self) -> usize {
        if self.rotation.swaps_axes() {
            self.base_width
        } else {
            self.base_height
        }
    }

    /// Origin of the committed footprint, if placed.
    #[must_use]
    pub const fn grid_position(&self) -> Option<IVec2> {
        self.grid_position
    }

    /// True while the piece is committed to a grid.
    #[must_use]
    pub const fn is_placed(&self) -> bool {
        self.grid_position.is_some()
    }

    /// Advance rotation 90° clockwise and regenerate the mask.
    ///
    /// Purely local: the grid is not consulted. Callers must re-validate
    /// placement afterwards.
    pub fn rotate(&mut self) {
        self.mask = self.mask.rotate90(true);
        self.rotation = self.rotation.clockwise();
    }

    /// Rotate 90° counter-clockwise and regenerate the mask.
    pub fn rotate_counter_clockwise(&mut self) {
        self.mask = self.mask.rotate90(false);
        self.rotation = self.rotation.counter_clockwise();
    }

    /// Absolute cells covered when the mask's top-left sits at `origin`.
    pub fn footprint(&self, origin: IVec2) -> impl Iterator<Item = IVec2> + '_ {
        self.mask.solid_cells().map(move |offset| origin + offset)
    }

    pub(crate) fn set_grid_position(&mut self, position: Option<IVec2>) {
        self.grid_position = position;
    }
}

/// Unchecked serialized form of [`PlacementPiece`].
#[derive(Deserialize)]
struct RawPiece<A> {
    id: PieceId,
    base_width: usize,
    base_height: usize,
    rotation: Rotation,
    mask: ShapeMask,
    attributes: A,
    grid_position: Option<IVec2>,
}

impl<A> TryFrom<RawPiece<A>> for PlacementPiece<A> {
    type Error = PieceError;

    fn try_from(raw: RawPiece<A>) -> Result<Self, Self::Error> {
        let (width, height) = if raw.rotation.swaps_axes() {
            (raw.base_height, raw.base_width)
        } else {
            (raw.base_width, raw.base_height)
        };
        if raw.mask.cols() != width || raw.mask.rows() != height {
            return Err(PieceError::MaskSizeMismatch {
                piece: raw.id,
                base_width: raw.base_width,
                base_height: raw.base_height,
                rotation: raw.rotation,
                rows: raw.mask.rows(),
                cols: raw.mask.cols(),
            });
        }
        Ok(Self {
            id: raw.id,
            base_width: raw.base_width,
            base_height: raw.base_height,
            rotation: raw.rotation,
            mask: raw.mask,
            attributes: raw.attributes,
            grid_position: raw.grid_position,
        })
    }
}
