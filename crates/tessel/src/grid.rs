//! The occupancy grid: bounds checks, feasibility tests, commit and release.
//!
//! Each cell is either empty or claimed by exactly one [`PieceId`]. Cells
//! change state only through [`OccupancyGrid::place`] /
//! [`OccupancyGrid::try_place`] and [`OccupancyGrid::remove`].
//!
//! # Coordinates
//!
//! Cell `(0, 0)` is the top-left cell; `x` grows rightward and `y` downward.
//! A piece's origin is the top-left corner of its mask's bounding box.
//!
//! # Events
//!
//! Every successful mutation queues exactly one [`GridEvent`] after the cells
//! are written. Presentation layers drain them with
//! [`OccupancyGrid::drain_events`].
//!
//! # Example
//!
//! ```
//! use glam::IVec2;
//! use tessel::{OccupancyGrid, PieceId, PlacementPiece, ShapeMask};
//!
//! let mut grid = OccupancyGrid::new(8, 8).unwrap();
//! let mut domino = PlacementPiece::new(PieceId::new(1), ShapeMask::filled(1, 2).unwrap(), ());
//!
//! assert!(!grid.can_place(&domino, IVec2::new(7, 0)));
//! assert!(grid.place(&mut domino, IVec2::new(6, 0)));
//! assert_eq!(grid.piece_at(IVec2::new(7, 0)), Some(PieceId::new(1)));
//!
//! grid.remove(&mut domino);
//! assert_eq!(grid.occupied_count(), 0);
//! ```

use std::collections::BTreeMap;

use glam::IVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::error::GridError;
use crate::highlight::{CellHighlight, Highlight, HighlightCell};
use crate::mask::ShapeMask;
use crate::piece::{PieceId, PlacementPiece};

// =============================================================================
// Events and Rejections
// =============================================================================

/// "Grid changed" notification, one per successful mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GridEvent {
    /// A piece was committed (or moved) to `origin`.
    Placed {
        /// The committed piece
        piece: PieceId,
        /// Its new origin
        origin: IVec2,
    },
    /// A piece released its cells.
    Removed {
        /// The released piece
        piece: PieceId,
        /// The origin it was released from
        origin: IVec2,
    },
}

impl GridEvent {
    /// The piece this event concerns.
    #[must_use]
    pub const fn piece(&self) -> PieceId {
        match self {
            GridEvent::Placed { piece, .. } | GridEvent::Removed { piece, .. } => *piece,
        }
    }
}

/// Why a footprint cannot be committed at a position.
///
/// This is an expected interactive outcome, not a fault. It implements
/// `Error` only so callers can propagate it with `?` when convenient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum PlacementRejection {
    /// Part of the bounding box falls outside the grid.
    #[error("footprint of size {size} at {origin} does not fit a {width}x{height} grid")]
    OutOfBounds {
        /// Requested origin
        origin: IVec2,
        /// Footprint size (width, height)
        size: IVec2,
        /// Grid width
        width: i32,
        /// Grid height
        height: i32,
    },
    /// A solid cell of the footprint is claimed by another piece.
    #[error("cell {cell} is occupied by piece {owner}")]
    Occupied {
        /// First conflicting cell in mask row-major order
        cell: IVec2,
        /// Its current owner
        owner: PieceId,
    },
}

/// Cells written by a committed placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Footprint {
    origin: IVec2,
    cells: Vec<IVec2>,
}

// =============================================================================
// Occupancy Grid
// =============================================================================

/// Fixed-size board mapping cells to the piece that claims them.
///
/// The grid references pieces by [`PieceId`] and never owns them. It also
/// records the exact cells each committed piece wrote, so removal releases
/// the same cells even if the piece rotated in the meantime.
///
/// Deserialization re-checks the dimensions, the cell count and that every
/// recorded footprint agrees with the cell array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGrid")]
pub struct OccupancyGrid {
    /// Width in cells.
    width: i32,
    /// Height in cells.
    height: i32,
    /// Row-major cell owners.
    cells: Vec<Option<PieceId>>,
    /// Committed footprints by piece.
    placements: BTreeMap<PieceId, Footprint>,
    /// Incremented once per successful mutation.
    revision: u64,
    /// Undrained change notifications.
    #[serde(skip)]
    events: Vec<GridEvent>,
}

impl OccupancyGrid {
    /// Create an empty grid.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidDimensions`] if either dimension is not
    /// positive.
    #[allow(clippy::cast_sign_loss)]
    pub fn new(width: i32, height: i32) -> Result<Self, GridError> {
        if width <= 0 || height <= 0 {
            return Err(GridError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            cells: vec![None; width as usize * height as usize],
            placements: BTreeMap::new(),
            revision: 0,
            events: Vec::new(),
        })
    }

    /// Width in cells.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Height in cells.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Size as `(width, height)`.
    #[must_use]
    pub const fn size(&self) -> IVec2 {
        IVec2::new(self.width, self.height)
    }

    /// Mutation counter; bumps once per successful place or remove.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// True if `cell` lies on the grid.
    #[must_use]
    pub const fn is_valid_position(&self, cell: IVec2) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.width && cell.y < self.height
    }

    #[allow(clippy::cast_sign_loss)]
    fn index(&self, cell: IVec2) -> Option<usize> {
        if self.is_valid_position(cell) {
            Some(cell.y as usize * self.width as usize + cell.x as usize)
        } else {
            None
        }
    }

    /// Owner of `cell`; `None` if empty or off the grid.
    #[must_use]
    pub fn piece_at(&self, cell: IVec2) -> Option<PieceId> {
        self.index(cell).and_then(|i| self.cells[i])
    }

    /// True if `cell` is on the grid and claimed.
    #[must_use]
    pub fn is_occupied(&self, cell: IVec2) -> bool {
        self.piece_at(cell).is_some()
    }

    /// Row-major cell owners.
    #[must_use]
    pub fn occupancy(&self) -> &[Option<PieceId>] {
        &self.cells
    }

    /// Every cell with its owner, row-major.
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    pub fn cells(&self) -> impl Iterator<Item = (IVec2, Option<PieceId>)> + '_ {
        let width = self.width as usize;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, owner)| (IVec2::new((i % width) as i32, (i / width) as i32), *owner))
    }

    /// Number of claimed cells.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Number of empty cells.
    #[must_use]
    pub fn free_count(&self) -> usize {
        self.cells.len() - self.occupied_count()
    }

    /// Committed pieces and their origins, ordered by id.
    pub fn placements(&self) -> impl Iterator<Item = (PieceId, IVec2)> + '_ {
        self.placements.iter().map(|(id, fp)| (*id, fp.origin))
    }

    /// Origin of a committed piece.
    #[must_use]
    pub fn origin_of(&self, piece: PieceId) -> Option<IVec2> {
        self.placements.get(&piece).map(|fp| fp.origin)
    }

    /// Cells written when `piece` was committed.
    #[must_use]
    pub fn cells_of(&self, piece: PieceId) -> Option<&[IVec2]> {
        self.placements.get(&piece).map(|fp| fp.cells.as_slice())
    }

    /// True if `piece` currently holds cells on this grid.
    #[must_use]
    pub fn contains_piece(&self, piece: PieceId) -> bool {
        self.placements.contains_key(&piece)
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Test a mask at `origin`, treating cells owned by `ignore` as free.
    ///
    /// # Errors
    ///
    /// Returns the first reason the footprint cannot be committed.
    pub fn check_mask(
        &self,
        mask: &ShapeMask,
        origin: IVec2,
        ignore: Option<PieceId>,
    ) -> Result<(), PlacementRejection> {
        let size = mask.size();
        if origin.x < 0
            || origin.y < 0
            || origin.x > self.width - size.x
            || origin.y > self.height - size.y
        {
            return Err(PlacementRejection::OutOfBounds {
                origin,
                size,
                width: self.width,
                height: self.height,
            });
        }

        for offset in mask.solid_cells() {
            let cell = origin + offset;
            if let Some(owner) = self.piece_at(cell) {
                if Some(owner) != ignore {
                    return Err(PlacementRejection::Occupied { cell, owner });
                }
            }
        }
        Ok(())
    }

    /// Explain whether `piece` can be committed at `origin`.
    ///
    /// The piece's own cells never block it, so a placed piece can be
    /// re-tested while it is dragged.
    ///
    /// # Errors
    ///
    /// Returns the first reason the footprint cannot be committed.
    pub fn check_placement<A>(
        &self,
        piece: &PlacementPiece<A>,
        origin: IVec2,
    ) -> Result<(), PlacementRejection> {
        self.check_mask(piece.mask(), origin, Some(piece.id()))
    }

    /// True if `piece` can be committed at `origin`. Never fails.
    #[must_use]
    pub fn can_place<A>(&self, piece: &PlacementPiece<A>, origin: IVec2) -> bool {
        match self.check_placement(piece, origin) {
            Ok(()) => true,
            Err(reason) => {
                trace!(piece = %piece.id(), %origin, %reason, "placement test rejected");
                false
            }
        }
    }

    /// Classify each in-bounds cell of `mask` at `origin`.
    ///
    /// Off-grid cells are clipped. Cells owned by `ignore` count as valid.
    #[must_use]
    pub fn highlight(&self, mask: &ShapeMask, origin: IVec2, ignore: Option<PieceId>) -> Highlight {
        let cells = mask
            .solid_cells()
            .map(|offset| origin.wrapping_add(offset))
            .filter(|&cell| self.is_valid_position(cell))
            .map(|cell| {
                let state = match self.piece_at(cell) {
                    Some(owner) if Some(owner) != ignore => CellHighlight::Invalid,
                    _ => CellHighlight::Valid,
                };
                HighlightCell { cell, state }
            })
            .collect();

        Highlight {
            origin,
            cells,
            placeable: self.check_mask(mask, origin, ignore).is_ok(),
        }
    }

    /// Highlight for `piece` at `origin`, ignoring its own cells.
    #[must_use]
    pub fn highlight_piece<A>(&self, piece: &PlacementPiece<A>, origin: IVec2) -> Highlight {
        self.highlight(piece.mask(), origin, Some(piece.id()))
    }

    /// First origin (row-major scan) where `piece` fits at its current rotation.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn find_free_position<A>(&self, piece: &PlacementPiece<A>) -> Option<IVec2> {
        let max_x = self.width - piece.effective_width() as i32;
        let max_y = self.height - piece.effective_height() as i32;
        (0..=max_y)
            .flat_map(|y| (0..=max_x).map(move |x| IVec2::new(x, y)))
            .find(|&origin| self.check_placement(piece, origin).is_ok())
    }

    // -------------------------------------------------------------------------
    // Mutators
    // -------------------------------------------------------------------------

    /// Commit `piece` at `origin`, or explain why not.
    ///
    /// All-or-nothing: on rejection no cell changes. A piece already on this
    /// grid is moved: its previous cells are released first and a single
    /// [`GridEvent::Placed`] is queued.
    ///
    /// # Errors
    ///
    /// Returns the [`PlacementRejection`] from
    /// [`check_placement`](Self::check_placement).
    pub fn try_place<A>(
        &mut self,
        piece: &mut PlacementPiece<A>,
        origin: IVec2,
    ) -> Result<(), PlacementRejection> {
        self.check_placement(piece, origin)?;

        let id = piece.id();
        if let Some(previous) = self.placements.remove(&id) {
            self.release_cells(id, &previous.cells);
        }

        let cells: Vec<IVec2> = piece.footprint(origin).collect();
        for &cell in &cells {
            if let Some(i) = self.index(cell) {
                self.cells[i] = Some(id);
            }
        }
        self.placements.insert(id, Footprint { origin, cells });
        piece.set_grid_position(Some(origin));

        self.revision += 1;
        self.events.push(GridEvent::Placed { piece: id, origin });
        debug!(piece = %id, %origin, rotation = %piece.rotation(), "piece placed");
        Ok(())
    }

    /// Commit `piece` at `origin`. Returns `false`, mutating nothing, if it
    /// does not fit.
    pub fn place<A>(&mut self, piece: &mut PlacementPiece<A>, origin: IVec2) -> bool {
        match self.try_place(piece, origin) {
            Ok(()) => true,
            Err(reason) => {
                debug!(piece = %piece.id(), %origin, %reason, "placement rejected");
                false
            }
        }
    }

    /// Release every cell `piece` holds. No-op if the piece is unplaced.
    ///
    /// A cell is cleared only if it still names this piece; a cell claimed by
    /// another piece (stale position from a caller error) is left alone.
    pub fn remove<A>(&mut self, piece: &mut PlacementPiece<A>) {
        let Some(origin) = piece.grid_position() else {
            return;
        };

        let id = piece.id();
        let cells = match self.placements.remove(&id) {
            Some(footprint) => footprint.cells,
            None => piece.footprint(origin).collect(),
        };
        self.release_cells(id, &cells);
        piece.set_grid_position(None);

        self.revision += 1;
        self.events.push(GridEvent::Removed { piece: id, origin });
        debug!(piece = %id, %origin, "piece removed");
    }

    fn release_cells(&mut self, id: PieceId, cells: &[IVec2]) {
        for &cell in cells {
            let Some(i) = self.index(cell) else {
                continue;
            };
            match self.cells[i] {
                Some(owner) if owner == id => self.cells[i] = None,
                Some(owner) => {
                    warn!(piece = %id, %owner, %cell, "stale release skipped cell owned by another piece");
                }
                None => {}
            }
        }
    }

    // -------------------------------------------------------------------------
    // Events
    // -------------------------------------------------------------------------

    /// Notifications queued since the last drain.
    #[must_use]
    pub fn pending_events(&self) -> &[GridEvent] {
        &self.events
    }

    /// Take all queued notifications.
    pub fn drain_events(&mut self) -> Vec<GridEvent> {
        std::mem::take(&mut self.events)
    }
}

// =============================================================================
// Serialization
// =============================================================================

/// Unchecked serialized form of [`OccupancyGrid`].
#[derive(Deserialize)]
struct RawGrid {
    width: i32,
    height: i32,
    cells: Vec<Option<PieceId>>,
    placements: BTreeMap<PieceId, Footprint>,
    revision: u64,
}

impl TryFrom<RawGrid> for OccupancyGrid {
    type Error = GridError;

    fn try_from(raw: RawGrid) -> Result<Self, Self::Error> {
        let mut grid = Self::new(raw.width, raw.height)?;
        if raw.cells.len() != grid.cells.len() {
            return Err(GridError::CellCountMismatch {
                width: raw.width,
                height: raw.height,
                expected: grid.cells.len(),
                found: raw.cells.len(),
            });
        }
        grid.cells = raw.cells;

        for (&piece, footprint) in &raw.placements {
            for &cell in &footprint.cells {
                let owner = grid.piece_at(cell);
                if owner != Some(piece) {
                    return Err(GridError::FootprintMismatch { piece, cell, owner });
                }
            }
        }
        for (cell, owner) in grid.cells() {
            let Some(piece) = owner else { continue };
            let recorded = raw
                .placements
                .get(&piece)
                .is_some_and(|footprint| footprint.cells.contains(&cell));
            if !recorded {
                return Err(GridError::FootprintMismatch {
                    piece,
                    cell,
                    owner,
                });
            }
        }

        grid.placements = raw.placements;
        grid.revision = raw.revision;
        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn piece(id: u64, pattern: &str) -> PlacementPiece<()> {
        PlacementPiece::new(PieceId::new(id), ShapeMask::parse(pattern).unwrap(), ())
    }

    fn grid8() -> OccupancyGrid {
        OccupancyGrid::new(8, 8).unwrap()
    }

    #[test]
    fn test_new_rejects_non_positive() {
        assert_eq!(
            OccupancyGrid::new(0, 8),
            Err(GridError::InvalidDimensions {
                width: 0,
                height: 8
            })
        );
        assert!(OccupancyGrid::new(8, -1).is_err());
    }

    #[test]
    fn test_is_valid_position() {
        let grid = grid8();
        assert!(grid.is_valid_position(IVec2::new(0, 0)));
        assert!(grid.is_valid_position(IVec2::new(7, 7)));
        assert!(!grid.is_valid_position(IVec2::new(8, 0)));
        assert!(!grid.is_valid_position(IVec2::new(0, -1)));
        assert_eq!(grid.piece_at(IVec2::new(-3, 20)), None);
    }

    #[test]
    fn test_horizontal_domino_at_right_edge() {
        let mut grid = grid8();
        let mut domino = piece(1, "##");

        assert!(!grid.can_place(&domino, IVec2::new(7, 0)));
        assert!(matches!(
            grid.check_placement(&domino, IVec2::new(7, 0)),
            Err(PlacementRejection::OutOfBounds { .. })
        ));

        assert!(grid.can_place(&domino, IVec2::new(6, 0)));
        assert!(grid.place(&mut domino, IVec2::new(6, 0)));
        assert_eq!(grid.piece_at(IVec2::new(6, 0)), Some(PieceId::new(1)));
        assert_eq!(grid.piece_at(IVec2::new(7, 0)), Some(PieceId::new(1)));
        assert_eq!(domino.grid_position(), Some(IVec2::new(6, 0)));
    }

    #[test]
    fn test_ell_occupies_only_solid_cells() {
        let mut grid = grid8();
        let mut ell = piece(2, "#.\n##");
        assert!(grid.place(&mut ell, IVec2::ZERO));

        let id = Some(PieceId::new(2));
        assert_eq!(grid.piece_at(IVec2::new(0, 0)), id);
        assert_eq!(grid.piece_at(IVec2::new(0, 1)), id);
        assert_eq!(grid.piece_at(IVec2::new(1, 1)), id);
        assert_eq!(grid.piece_at(IVec2::new(1, 0)), None);
        assert_eq!(grid.occupied_count(), 3);
    }

    #[test]
    fn test_overlap_rejected() {
        let mut grid = grid8();
        let mut a = piece(1, "##");
        let b = piece(2, "#");
        assert!(grid.place(&mut a, IVec2::new(2, 2)));

        assert!(!grid.can_place(&b, IVec2::new(2, 2)));
        assert_eq!(
            grid.check_placement(&b, IVec2::new(3, 2)),
            Err(PlacementRejection::Occupied {
                cell: IVec2::new(3, 2),
                owner: PieceId::new(1)
            })
        );
        assert!(grid.can_place(&b, IVec2::new(2, 3)));
    }

    #[test]
    fn test_ell_gap_accepts_single() {
        let mut grid = grid8();
        let mut ell = piece(1, "#.\n##");
        let mut single = piece(2, "#");
        assert!(grid.place(&mut ell, IVec2::ZERO));
        assert!(grid.place(&mut single, IVec2::new(1, 0)));
        assert_eq!(grid.occupied_count(), 4);
    }

    #[test]
    fn test_rejected_place_mutates_nothing() {
        let mut grid = grid8();
        let mut a = piece(1, "##");
        let mut b = piece(2, "##");
        assert!(grid.place(&mut a, IVec2::new(0, 0)));
        let before = grid.occupancy().to_vec();
        let revision = grid.revision();

        assert!(!grid.place(&mut b, IVec2::new(1, 0)));
        assert_eq!(grid.occupancy(), before.as_slice());
        assert_eq!(grid.revision(), revision);
        assert_eq!(b.grid_position(), None);
    }

    #[test]
    fn test_placed_piece_does_not_block_itself() {
        let mut grid = grid8();
        let mut bar = piece(1, "###");
        assert!(grid.place(&mut bar, IVec2::new(0, 0)));

        // Shifted by one: overlaps its own cells only.
        assert!(grid.can_place(&bar, IVec2::new(1, 0)));
        assert!(grid.place(&mut bar, IVec2::new(1, 0)));
        assert_eq!(grid.piece_at(IVec2::new(0, 0)), None);
        assert_eq!(grid.occupied_count(), 3);
        assert_eq!(grid.origin_of(bar.id()), Some(IVec2::new(1, 0)));
    }

    #[test]
    fn test_move_emits_single_event() {
        let mut grid = grid8();
        let mut bar = piece(1, "##");
        assert!(grid.place(&mut bar, IVec2::new(0, 0)));
        grid.drain_events();

        assert!(grid.place(&mut bar, IVec2::new(4, 4)));
        assert_eq!(
            grid.drain_events(),
            vec![GridEvent::Placed {
                piece: PieceId::new(1),
                origin: IVec2::new(4, 4)
            }]
        );
    }

    #[test]
    fn test_remove_restores_grid() {
        let mut grid = grid8();
        let mut other = piece(9, "#");
        assert!(grid.place(&mut other, IVec2::new(5, 5)));
        let before = grid.occupancy().to_vec();

        let mut ell = piece(1, "#.\n##");
        assert!(grid.place(&mut ell, IVec2::new(2, 1)));
        grid.remove(&mut ell);

        assert_eq!(grid.occupancy(), before.as_slice());
        assert!(!ell.is_placed());
        assert!(!grid.contains_piece(ell.id()));
    }

    #[test]
    fn test_remove_twice_is_noop() {
        let mut grid = grid8();
        let mut ell = piece(1, "#.\n##");
        assert!(grid.place(&mut ell, IVec2::ZERO));
        grid.remove(&mut ell);
        let revision = grid.revision();
        let events = grid.drain_events().len();

        grid.remove(&mut ell);
        assert_eq!(grid.revision(), revision);
        assert!(grid.drain_events().is_empty());
        assert_eq!(events, 2);
    }

    #[test]
    fn test_remove_after_rotation_releases_committed_cells() {
        let mut grid = grid8();
        let mut bar = piece(1, "###");
        assert!(grid.place(&mut bar, IVec2::new(0, 0)));

        bar.rotate();
        grid.remove(&mut bar);
        assert_eq!(grid.occupied_count(), 0);
    }

    #[test]
    fn test_stale_remove_leaves_foreign_cells() {
        let mut first = grid8();
        let mut second = grid8();

        let mut wanderer = piece(1, "##");
        assert!(first.place(&mut wanderer, IVec2::new(0, 0)));

        let mut resident = piece(2, "#");
        assert!(second.place(&mut resident, IVec2::new(1, 0)));

        // Wrong grid: no record, falls back to the mask at the stored origin.
        second.remove(&mut wanderer);
        assert_eq!(second.piece_at(IVec2::new(1, 0)), Some(PieceId::new(2)));
        assert!(!wanderer.is_placed());
    }

    #[test]
    fn test_events_once_per_mutation() {
        let mut grid = grid8();
        let mut a = piece(1, "#");
        assert!(grid.place(&mut a, IVec2::new(3, 3)));
        assert!(!grid.place(&mut piece(2, "#"), IVec2::new(3, 3)));
        grid.remove(&mut a);

        assert_eq!(
            grid.drain_events(),
            vec![
                GridEvent::Placed {
                    piece: PieceId::new(1),
                    origin: IVec2::new(3, 3)
                },
                GridEvent::Removed {
                    piece: PieceId::new(1),
                    origin: IVec2::new(3, 3)
                },
            ]
        );
        assert_eq!(grid.revision(), 2);
        assert!(grid.pending_events().is_empty());
    }

    #[test]
    fn test_highlight_classifies_and_clips() {
        let mut grid = grid8();
        let mut blocker = piece(1, "#");
        assert!(grid.place(&mut blocker, IVec2::new(7, 1)));

        let square = piece(2, "##\n##");
        let highlight = grid.highlight_piece(&square, IVec2::new(6, 0));
        assert!(!highlight.placeable);
        assert_eq!(highlight.len(), 4);
        assert_eq!(highlight.invalid_cells().collect::<Vec<_>>(), vec![IVec2::new(7, 1)]);

        // Hanging off the right edge: two columns clipped.
        let highlight = grid.highlight_piece(&square, IVec2::new(7, 4));
        assert!(!highlight.placeable);
        assert_eq!(
            highlight.valid_cells().collect::<Vec<_>>(),
            vec![IVec2::new(7, 4), IVec2::new(7, 5)]
        );

        let highlight = grid.highlight_piece(&square, IVec2::new(-5, -5));
        assert!(highlight.is_empty());
        assert!(!highlight.placeable);
    }

    #[test]
    fn test_highlight_ignores_own_cells() {
        let mut grid = grid8();
        let mut bar = piece(1, "##");
        assert!(grid.place(&mut bar, IVec2::new(0, 0)));
        let highlight = grid.highlight_piece(&bar, IVec2::new(1, 0));
        assert!(highlight.placeable);
        assert_eq!(highlight.invalid_cells().count(), 0);
    }

    #[test]
    fn test_find_free_position_scans_row_major() {
        let mut grid = OccupancyGrid::new(3, 2).unwrap();
        let mut a = piece(1, "##");
        assert!(grid.place(&mut a, IVec2::new(0, 0)));

        let b = piece(2, "##");
        assert_eq!(grid.find_free_position(&b), Some(IVec2::new(0, 1)));

        let tall = piece(3, "#\n#\n#");
        assert_eq!(grid.find_free_position(&tall), None);
    }

    #[test]
    fn test_rotated_piece_bounds() {
        let mut grid = OccupancyGrid::new(3, 3).unwrap();
        let mut wide = piece(1, "###\n###");
        assert!(grid.can_place(&wide, IVec2::new(0, 1)));
        wide.rotate();
        assert_eq!((wide.effective_width(), wide.effective_height()), (2, 3));
        assert!(!grid.can_place(&wide, IVec2::new(0, 1)));
        assert!(grid.can_place(&wide, IVec2::new(1, 0)));
        assert!(!grid.can_place(&wide, IVec2::new(2, 0)));
    }

    fn stocked_grid() -> OccupancyGrid {
        let mut grid = OccupancyGrid::new(4, 3).unwrap();
        let mut ell = piece(1, "#.\n##");
        let mut bar = piece(2, "###");
        assert!(grid.place(&mut ell, IVec2::ZERO));
        assert!(grid.place(&mut bar, IVec2::new(1, 2)));
        // Rotating after commit must not change what gets stored.
        ell.rotate();
        grid.drain_events();
        grid
    }

    #[test]
    fn test_serde_round_trip_keeps_placements() {
        let grid = stocked_grid();
        let json = serde_json::to_string(&grid).unwrap();
        let back: OccupancyGrid = serde_json::from_str(&json).unwrap();

        assert_eq!(back, grid);
        assert_eq!(back.cells_of(PieceId::new(1)), grid.cells_of(PieceId::new(1)));
        assert_eq!(back.piece_at(IVec2::new(3, 2)), Some(PieceId::new(2)));
        assert!(back.pending_events().is_empty());
    }

    #[test]
    fn test_events_serialize_by_kind() {
        let mut grid = stocked_grid();
        let mut spare = piece(7, "#");
        assert!(grid.place(&mut spare, IVec2::new(3, 0)));
        grid.remove(&mut spare);

        let events = grid.drain_events();
        let json = serde_json::to_string(&events).unwrap();
        assert!(json.contains("Placed") && json.contains("Removed"));
        let back: Vec<GridEvent> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, events);
    }

    #[test]
    fn test_deserialize_rejects_short_cell_array() {
        let json = r#"{"width":8,"height":8,"cells":[],"placements":{},"revision":0}"#;
        let err = serde_json::from_str::<OccupancyGrid>(json).unwrap_err();
        assert!(err.to_string().contains("needs 64 cells, found 0"));
    }

    #[test]
    fn test_deserialize_rejects_bad_dimensions() {
        let json = r#"{"width":0,"height":2,"cells":[],"placements":{},"revision":0}"#;
        assert!(serde_json::from_str::<OccupancyGrid>(json).is_err());
    }

    #[test]
    fn test_deserialize_rejects_footprint_mismatch() {
        let tamper = |index: usize, owner: serde_json::Value| {
            let mut value = serde_json::to_value(stocked_grid()).unwrap();
            value["cells"][index] = owner;
            let json = serde_json::to_string(&value).unwrap();
            serde_json::from_str::<OccupancyGrid>(&json).unwrap_err().to_string()
        };

        // Piece 2 loses one of its cells in the array.
        let err = tamper(9, serde_json::Value::Null);
        assert!(err.contains("footprint of piece 2 disagrees at cell [1, 2]"));

        // A claimed cell no footprint mentions.
        let err = tamper(3, serde_json::json!(2));
        assert!(err.contains("footprint of piece 2 disagrees at cell [3, 0]"));
    }

    #[test]
    fn test_rejection_messages() {
        let reason = PlacementRejection::Occupied {
            cell: IVec2::new(2, 3),
            owner: PieceId::new(4),
        };
        assert_eq!(reason.to_string(), "cell [2, 3] is occupied by piece 4");
    }
}
