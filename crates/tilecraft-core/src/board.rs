//! Board: the owning context for a grid and its pieces.
//!
//! The board is constructed once by whatever runs the game loop and passed
//! by reference to collaborators; there is no global instance. It provides:
//! - Piece storage with deterministic iteration order (`BTreeMap`)
//! - Monotonic [`PieceId`] assignment
//! - Convenience wrappers over the grid's place/remove/query API
//! - Hand-off of grid + piece to a [`GridController`]
//!
//! # Example
//!
//! ```
//! use glam::IVec2;
//! use tessel::ShapeMask;
//! use tilecraft_core::{Board, BoardConfig};
//!
//! let mut board: Board<&str> = Board::new(&BoardConfig::default()).unwrap();
//! let id = board.spawn(ShapeMask::parse("#.\n##").unwrap(), "corner");
//!
//! assert!(board.place(id, IVec2::ZERO));
//! assert_eq!(board.piece_at(IVec2::new(1, 1)).map(|p| p.id()), Some(id));
//! assert!(board.piece_at(IVec2::new(1, 0)).is_none());
//! ```

use std::collections::BTreeMap;

use glam::{IVec2, Vec2};
use tracing::{debug, warn};

use tessel::{GridEvent, GridLayout, OccupancyGrid, PieceId, PlacementPiece, ShapeMask};

use crate::catalog::PieceTemplate;
use crate::config::BoardConfig;
use crate::controller::{GridController, InputResult, InteractionInput, InteractionOutcome};
use crate::error::BoardError;
use crate::view::PlacementView;

/// A grid, its presentation layout and the pieces that may be placed on it.
#[derive(Debug, Clone)]
pub struct Board<A> {
    /// Cell ownership.
    grid: OccupancyGrid,
    /// Presentation-space geometry.
    layout: GridLayout,
    /// Every spawned piece, placed or not.
    pieces: BTreeMap<PieceId, PlacementPiece<A>>,
    /// Monotonically increasing piece ID counter.
    next_id: u64,
}

impl<A> Board<A> {
    /// Create an empty board.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Grid`] if the configuration is invalid.
    pub fn new(config: &BoardConfig) -> Result<Self, BoardError> {
        Ok(Self {
            grid: config.grid()?,
            layout: config.layout()?,
            pieces: BTreeMap::new(),
            next_id: 0,
        })
    }

    /// The occupancy grid.
    #[must_use]
    pub fn grid(&self) -> &OccupancyGrid {
        &self.grid
    }

    /// The presentation layout.
    #[must_use]
    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    /// Spawn an unplaced piece.
    pub fn spawn(&mut self, mask: ShapeMask, attributes: A) -> PieceId {
        let id = PieceId::new(self.next_id);
        self.next_id += 1;
        self.pieces.insert(id, PlacementPiece::new(id, mask, attributes));
        debug!(piece = %id, "piece spawned");
        id
    }

    /// Spawn an unplaced piece from a template.
    pub fn spawn_template(&mut self, template: &PieceTemplate<A>) -> PieceId
    where
        A: Clone,
    {
        self.spawn(template.mask.clone(), template.attributes.clone())
    }

    /// Remove a piece from the board entirely, releasing its cells.
    pub fn despawn(&mut self, id: PieceId) -> Option<PlacementPiece<A>> {
        let mut piece = self.pieces.remove(&id)?;
        self.grid.remove(&mut piece);
        debug!(piece = %id, "piece despawned");
        Some(piece)
    }

    /// A piece by ID.
    #[must_use]
    pub fn get(&self, id: PieceId) -> Option<&PlacementPiece<A>> {
        self.pieces.get(&id)
    }

    /// A mutable piece by ID.
    #[must_use]
    pub fn get_mut(&mut self, id: PieceId) -> Option<&mut PlacementPiece<A>> {
        self.pieces.get_mut(&id)
    }

    /// Number of spawned pieces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    /// True if no piece is spawned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// All pieces in ID order.
    pub fn pieces(&self) -> impl Iterator<Item = &PlacementPiece<A>> + '_ {
        self.pieces.values()
    }

    /// Pieces currently on the grid, in ID order.
    pub fn placed(&self) -> impl Iterator<Item = &PlacementPiece<A>> + '_ {
        self.pieces.values().filter(|p| p.is_placed())
    }

    /// Pieces not on the grid, in ID order.
    pub fn unplaced(&self) -> impl Iterator<Item = &PlacementPiece<A>> + '_ {
        self.pieces.values().filter(|p| !p.is_placed())
    }

    /// The piece claiming `cell`.
    #[must_use]
    pub fn piece_at(&self, cell: IVec2) -> Option<&PlacementPiece<A>> {
        self.grid.piece_at(cell).and_then(|id| self.pieces.get(&id))
    }

    /// The piece under a presentation-space point.
    #[must_use]
    pub fn piece_at_point(&self, point: Vec2) -> Option<&PlacementPiece<A>> {
        self.layout.cell_at(point).and_then(|cell| self.piece_at(cell))
    }

    /// True if `id` exists and fits at `origin`.
    #[must_use]
    pub fn can_place(&self, id: PieceId, origin: IVec2) -> bool {
        self.pieces
            .get(&id)
            .is_some_and(|piece| self.grid.can_place(piece, origin))
    }

    /// Commit a piece at `origin`. `false` for unknown IDs or rejected targets.
    pub fn place(&mut self, id: PieceId, origin: IVec2) -> bool {
        match self.pieces.get_mut(&id) {
            Some(piece) => self.grid.place(piece, origin),
            None => {
                warn!(piece = %id, "place called for unknown piece");
                false
            }
        }
    }

    /// Release a piece's cells. Returns `true` if it was placed.
    pub fn remove(&mut self, id: PieceId) -> bool {
        let Some(piece) = self.pieces.get_mut(&id) else {
            return false;
        };
        let was_placed = piece.is_placed();
        self.grid.remove(piece);
        was_placed
    }

    /// Place a piece at the first free origin, trying each rotation in turn.
    ///
    /// The piece keeps the first rotation that fits. If none fits, it is left
    /// at its original rotation and `None` is returned.
    pub fn auto_place(&mut self, id: PieceId) -> Option<IVec2> {
        let piece = self.pieces.get_mut(&id)?;
        for _ in 0..4 {
            if let Some(origin) = self.grid.find_free_position(piece) {
                if self.grid.place(piece, origin) {
                    return Some(origin);
                }
            }
            piece.rotate();
        }
        debug!(piece = %id, "no free position at any rotation");
        None
    }

    /// Borrow the grid and one piece together, for a [`GridController`].
    pub fn split_mut(
        &mut self,
        id: PieceId,
    ) -> Option<(&mut OccupancyGrid, &mut PlacementPiece<A>)> {
        let piece = self.pieces.get_mut(&id)?;
        Some((&mut self.grid, piece))
    }

    /// Feed one input to `controller` for piece `id`.
    ///
    /// Rejected drops and drags pre-empted by a new `Begin` are rolled back
    /// here: the piece regains its starting rotation and, if it came from the
    /// grid, its starting cells.
    pub fn interact<V: PlacementView>(
        &mut self,
        controller: &mut GridController<V>,
        id: PieceId,
        input: InteractionInput,
    ) -> Option<InputResult> {
        let (grid, piece) = self.split_mut(id)?;
        let result = controller.apply(grid, piece, input);
        match result {
            InputResult::Started(Some(outcome)) | InputResult::Finished(outcome) => {
                self.roll_back(controller, outcome);
            }
            _ => {}
        }
        Some(result)
    }

    fn roll_back<V: PlacementView>(
        &mut self,
        controller: &mut GridController<V>,
        outcome: InteractionOutcome,
    ) {
        let InteractionOutcome::Rejected {
            piece: id,
            restore_to,
            restore_rotation,
            ..
        } = outcome
        else {
            return;
        };
        let Some(piece) = self.pieces.get_mut(&id) else {
            warn!(piece = %id, "rollback for unknown piece");
            return;
        };
        if !controller.restore(&mut self.grid, piece, restore_to, restore_rotation) {
            warn!(piece = %id, ?restore_to, "rejected piece could not return to its cells");
        }
    }

    /// Take all queued grid notifications.
    pub fn drain_events(&mut self) -> Vec<GridEvent> {
        self.grid.drain_events()
    }
}
