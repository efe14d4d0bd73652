//! Grid controller: bridges one drag interaction to an occupancy grid.
//!
//! The host's input layer converts pointer positions to cells (see
//! [`GridLayout`](tessel::GridLayout)) and drives the controller with
//! explicit calls, or with [`InteractionInput`] values through
//! [`GridController::apply`]. Nothing here is tied to a frame loop.
//!
//! # Interaction lifecycle
//!
//! 1. [`begin_interaction`](GridController::begin_interaction) picks the piece
//!    up (releasing its cells if it was placed).
//! 2. [`on_candidate_moved`](GridController::on_candidate_moved) and
//!    [`rotate_candidate`](GridController::rotate_candidate) refresh the
//!    highlight. They never mutate the grid and may run every pointer tick.
//! 3. [`end_interaction`](GridController::end_interaction) tries to commit;
//!    on rejection the view is told where the piece came from.
//!    [`cancel_interaction`](GridController::cancel_interaction) puts the
//!    piece back without trying.
//!
//! Only one interaction is active at a time. Beginning another piece
//! abandons the current drag and returns it as a rejected outcome so the
//! owner can put it back.
//!
//! # Example
//!
//! ```
//! use glam::IVec2;
//! use tessel::{OccupancyGrid, PieceId, PlacementPiece, ShapeMask};
//! use tilecraft_core::controller::{GridController, InteractionOutcome};
//! use tilecraft_core::view::RecordingView;
//!
//! let mut grid = OccupancyGrid::new(8, 8).unwrap();
//! let mut piece = PlacementPiece::new(PieceId::new(1), ShapeMask::filled(1, 2).unwrap(), ());
//! let mut controller = GridController::new(RecordingView::new());
//!
//! controller.begin_interaction(&mut grid, &mut piece);
//! assert!(!controller.on_candidate_moved(&grid, &piece, Some(IVec2::new(7, 0))));
//! assert!(controller.on_candidate_moved(&grid, &piece, Some(IVec2::new(6, 0))));
//!
//! let outcome = controller.end_interaction(&mut grid, &mut piece, Some(IVec2::new(6, 0)));
//! assert!(outcome.is_committed());
//! ```

use glam::IVec2;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use tessel::{OccupancyGrid, PieceId, PlacementPiece, PlacementRejection, Rotation};

use crate::view::PlacementView;

/// An input event for the active interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionInput {
    /// Pick the piece up
    Begin,
    /// Pointer moved; `None` when it left the grid
    Move(Option<IVec2>),
    /// Rotate the candidate clockwise
    Rotate,
    /// Drop the piece; `None` when released off the grid
    End(Option<IVec2>),
    /// Abort and put the piece back
    Cancel,
}

/// Result of ending an interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionOutcome {
    /// The piece was committed.
    Committed {
        /// Committed piece
        piece: PieceId,
        /// Its origin
        origin: IVec2,
    },
    /// The piece did not fit; it should return to where it started.
    Rejected {
        /// Rejected piece
        piece: PieceId,
        /// Why, or `None` if the piece was dropped off the grid
        reason: Option<PlacementRejection>,
        /// Origin before the interaction began
        restore_to: Option<IVec2>,
        /// Rotation before the interaction began
        restore_rotation: Rotation,
    },
}

impl InteractionOutcome {
    /// True if the piece was committed.
    #[must_use]
    pub const fn is_committed(&self) -> bool {
        matches!(self, InteractionOutcome::Committed { .. })
    }

    /// The piece this outcome concerns.
    #[must_use]
    pub const fn piece(&self) -> PieceId {
        match self {
            InteractionOutcome::Committed { piece, .. }
            | InteractionOutcome::Rejected { piece, .. } => *piece,
        }
    }
}

/// What [`GridController::apply`] did with an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputResult {
    /// Interaction started; carries the abandoned interaction, if one was
    /// pre-empted
    Started(Option<InteractionOutcome>),
    /// Candidate re-evaluated; whether it can be committed
    Feasible(bool),
    /// Candidate rotated; feasibility at the last known cell, if any
    Rotated(Option<bool>),
    /// Interaction ended
    Finished(InteractionOutcome),
    /// Interaction cancelled; whether the piece is back where it started
    Cancelled(bool),
}

/// State captured when a piece is picked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Interaction {
    piece: PieceId,
    start_origin: Option<IVec2>,
    start_rotation: Rotation,
    last_cell: Option<IVec2>,
}

/// Mediates between one live candidate piece and an [`OccupancyGrid`].
///
/// The grid is passed in on every call; the controller only keeps the
/// interaction state and the view.
#[derive(Debug)]
pub struct GridController<V> {
    view: V,
    active: Option<Interaction>,
}

impl<V: PlacementView> GridController<V> {
    /// Create an idle controller.
    #[must_use]
    pub fn new(view: V) -> Self {
        Self { view, active: None }
    }

    /// The presentation collaborator.
    #[must_use]
    pub fn view(&self) -> &V {
        &self.view
    }

    /// Mutable presentation collaborator.
    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    /// Consume the controller, returning the view.
    pub fn into_view(self) -> V {
        self.view
    }

    /// Piece of the active interaction.
    #[must_use]
    pub fn active_piece(&self) -> Option<PieceId> {
        self.active.map(|a| a.piece)
    }

    /// Last cell the active candidate was moved to.
    #[must_use]
    pub fn last_candidate_cell(&self) -> Option<IVec2> {
        self.active.and_then(|a| a.last_cell)
    }

    /// Pick `piece` up. A placed piece releases its cells.
    ///
    /// Starting while another piece is mid-drag abandons that drag: its
    /// highlight is cleared, the view is told to restore it, and the returned
    /// [`InteractionOutcome::Rejected`] says where it came from so the owner
    /// can put it back (see [`restore`](Self::restore)). Beginning again with
    /// the active piece keeps the original starting point.
    pub fn begin_interaction<A>(
        &mut self,
        grid: &mut OccupancyGrid,
        piece: &mut PlacementPiece<A>,
    ) -> Option<InteractionOutcome> {
        let id = piece.id();
        let preempted = match self.active.take() {
            Some(active) if active.piece == id => {
                self.active = Some(active);
                debug!(piece = %id, "interaction already active");
                return None;
            }
            Some(active) => {
                warn!(active = %active.piece, piece = %id, "interaction pre-empted");
                self.view.clear_highlight(active.piece);
                self.view.restore_piece(active.piece, active.start_origin);
                Some(InteractionOutcome::Rejected {
                    piece: active.piece,
                    reason: None,
                    restore_to: active.start_origin,
                    restore_rotation: active.start_rotation,
                })
            }
            None => None,
        };

        let start_origin = piece.grid_position();
        if start_origin.is_some() {
            grid.remove(piece);
        }
        self.active = Some(Interaction {
            piece: id,
            start_origin,
            start_rotation: piece.rotation(),
            last_cell: None,
        });
        self.forward_events(grid);
        debug!(piece = %id, ?start_origin, "interaction started");
        preempted
    }

    /// Re-evaluate the candidate at `cell` and refresh the highlight.
    ///
    /// `None` means the pointer is off the grid: the highlight is cleared and
    /// the result is `false`. Never mutates the grid.
    pub fn on_candidate_moved<A>(
        &mut self,
        grid: &OccupancyGrid,
        piece: &PlacementPiece<A>,
        cell: Option<IVec2>,
    ) -> bool {
        let id = piece.id();
        if let Some(active) = self.active.as_mut() {
            if active.piece == id {
                active.last_cell = cell;
            }
        }

        match cell {
            Some(origin) => {
                let feasible = grid.can_place(piece, origin);
                let highlight = grid.highlight_piece(piece, origin);
                self.view.show_highlight(id, &highlight);
                feasible
            }
            None => {
                self.view.clear_highlight(id);
                false
            }
        }
    }

    /// Rotate the candidate clockwise and refresh the highlight at the last
    /// known cell.
    ///
    /// Returns feasibility at that cell, or `None` if no cell is known.
    pub fn rotate_candidate<A>(
        &mut self,
        grid: &OccupancyGrid,
        piece: &mut PlacementPiece<A>,
    ) -> Option<bool> {
        piece.rotate();
        debug!(piece = %piece.id(), rotation = %piece.rotation(), "candidate rotated");

        let cell = self
            .active
            .filter(|a| a.piece == piece.id())
            .and_then(|a| a.last_cell)?;
        Some(self.on_candidate_moved(grid, piece, Some(cell)))
    }

    /// Try to commit the candidate at `cell`.
    ///
    /// On rejection the view is asked to restore the piece to its
    /// pre-interaction origin. The grid is not touched in that case; the
    /// caller decides whether to re-place the piece (see
    /// [`restore`](Self::restore)).
    pub fn end_interaction<A>(
        &mut self,
        grid: &mut OccupancyGrid,
        piece: &mut PlacementPiece<A>,
        cell: Option<IVec2>,
    ) -> InteractionOutcome {
        let id = piece.id();
        let (restore_to, restore_rotation) = match self.take_interaction(id) {
            Some(interaction) => (interaction.start_origin, interaction.start_rotation),
            None => (piece.grid_position(), piece.rotation()),
        };
        self.view.clear_highlight(id);

        let result = match cell {
            Some(origin) => grid.try_place(piece, origin).map(|()| origin).map_err(Some),
            None => Err(None),
        };
        self.forward_events(grid);

        match result {
            Ok(origin) => {
                self.view.piece_committed(id, origin);
                debug!(piece = %id, %origin, "interaction committed");
                InteractionOutcome::Committed { piece: id, origin }
            }
            Err(reason) => {
                self.view.restore_piece(id, restore_to);
                debug!(piece = %id, ?reason, ?restore_to, "interaction rejected");
                InteractionOutcome::Rejected {
                    piece: id,
                    reason,
                    restore_to,
                    restore_rotation,
                }
            }
        }
    }

    /// Abort the active interaction and put the piece back where it started.
    ///
    /// Returns `true` if the piece is back in its starting state. Returns
    /// `false` if `piece` is not the active candidate or its old cells were
    /// taken in the meantime.
    pub fn cancel_interaction<A>(
        &mut self,
        grid: &mut OccupancyGrid,
        piece: &mut PlacementPiece<A>,
    ) -> bool {
        let id = piece.id();
        let Some(interaction) = self.take_interaction(id) else {
            return false;
        };
        self.view.clear_highlight(id);
        let restored = self.restore(
            grid,
            piece,
            interaction.start_origin,
            interaction.start_rotation,
        );
        self.view.restore_piece(id, interaction.start_origin);
        debug!(piece = %id, restored, "interaction cancelled");
        restored
    }

    /// Return `piece` to `rotation` and, if `origin` is set, re-place it there.
    ///
    /// Returns `false` only if the re-placement was rejected.
    pub fn restore<A>(
        &mut self,
        grid: &mut OccupancyGrid,
        piece: &mut PlacementPiece<A>,
        origin: Option<IVec2>,
        rotation: Rotation,
    ) -> bool {
        while piece.rotation() != rotation {
            piece.rotate();
        }
        let restored = origin.map_or(true, |origin| grid.place(piece, origin));
        self.forward_events(grid);
        restored
    }

    /// Dispatch one input to the matching operation.
    pub fn apply<A>(
        &mut self,
        grid: &mut OccupancyGrid,
        piece: &mut PlacementPiece<A>,
        input: InteractionInput,
    ) -> InputResult {
        match input {
            InteractionInput::Begin => InputResult::Started(self.begin_interaction(grid, piece)),
            InteractionInput::Move(cell) => {
                InputResult::Feasible(self.on_candidate_moved(grid, piece, cell))
            }
            InteractionInput::Rotate => InputResult::Rotated(self.rotate_candidate(grid, piece)),
            InteractionInput::End(cell) => {
                InputResult::Finished(self.end_interaction(grid, piece, cell))
            }
            InteractionInput::Cancel => {
                InputResult::Cancelled(self.cancel_interaction(grid, piece))
            }
        }
    }

    fn take_interaction(&mut self, piece: PieceId) -> Option<Interaction> {
        match self.active {
            Some(active) if active.piece == piece => self.active.take(),
            _ => None,
        }
    }

    fn forward_events(&mut self, grid: &mut OccupancyGrid) {
        for event in grid.drain_events() {
            self.view.grid_changed(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{RecordingView, ViewCommand};
    use tessel::{GridEvent, ShapeMask};

    fn setup() -> (OccupancyGrid, GridController<RecordingView>) {
        (
            OccupancyGrid::new(8, 8).unwrap(),
            GridController::new(RecordingView::new()),
        )
    }

    fn piece(id: u64, pattern: &str) -> PlacementPiece<()> {
        PlacementPiece::new(PieceId::new(id), ShapeMask::parse(pattern).unwrap(), ())
    }

    #[test]
    fn test_begin_picks_up_placed_piece() {
        let (mut grid, mut controller) = setup();
        let mut bar = piece(1, "##");
        assert!(grid.place(&mut bar, IVec2::new(2, 2)));
        grid.drain_events();

        controller.begin_interaction(&mut grid, &mut bar);
        assert!(!bar.is_placed());
        assert_eq!(grid.occupied_count(), 0);
        assert_eq!(controller.active_piece(), Some(bar.id()));
        assert_eq!(
            controller.view().commands(),
            &[ViewCommand::GridChanged(GridEvent::Removed {
                piece: bar.id(),
                origin: IVec2::new(2, 2)
            })]
        );
    }

    #[test]
    fn test_begin_reports_preempted_piece() {
        let (mut grid, mut controller) = setup();
        let mut first = piece(1, "##");
        let mut second = piece(2, "#");
        assert!(grid.place(&mut first, IVec2::new(3, 3)));

        assert_eq!(controller.begin_interaction(&mut grid, &mut first), None);
        controller.rotate_candidate(&grid, &mut first);
        controller.view_mut().take();

        let abandoned = controller.begin_interaction(&mut grid, &mut second);
        assert_eq!(
            abandoned,
            Some(InteractionOutcome::Rejected {
                piece: first.id(),
                reason: None,
                restore_to: Some(IVec2::new(3, 3)),
                restore_rotation: Rotation::Deg0,
            })
        );
        assert_eq!(controller.active_piece(), Some(second.id()));
        assert_eq!(
            &controller.view().commands()[..2],
            &[
                ViewCommand::ClearHighlight { piece: first.id() },
                ViewCommand::RestorePiece {
                    piece: first.id(),
                    origin: Some(IVec2::new(3, 3))
                },
            ]
        );

        let origin = Some(IVec2::new(3, 3));
        assert!(controller.restore(&mut grid, &mut first, origin, Rotation::Deg0));
        assert_eq!(grid.piece_at(IVec2::new(4, 3)), Some(first.id()));
    }

    #[test]
    fn test_begin_twice_keeps_start_origin() {
        let (mut grid, mut controller) = setup();
        let mut bar = piece(1, "##");
        assert!(grid.place(&mut bar, IVec2::new(2, 2)));

        controller.begin_interaction(&mut grid, &mut bar);
        assert_eq!(controller.begin_interaction(&mut grid, &mut bar), None);

        assert!(controller.cancel_interaction(&mut grid, &mut bar));
        assert_eq!(bar.grid_position(), Some(IVec2::new(2, 2)));
    }

    #[test]
    fn test_move_does_not_mutate_grid() {
        let (mut grid, mut controller) = setup();
        let mut bar = piece(1, "##");
        controller.begin_interaction(&mut grid, &mut bar);
        let revision = grid.revision();

        for x in -2..10 {
            controller.on_candidate_moved(&grid, &bar, Some(IVec2::new(x, 3)));
        }
        assert_eq!(grid.revision(), revision);
        assert_eq!(controller.last_candidate_cell(), Some(IVec2::new(9, 3)));
    }

    #[test]
    fn test_move_off_grid_clears_highlight() {
        let (mut grid, mut controller) = setup();
        let mut bar = piece(1, "##");
        controller.begin_interaction(&mut grid, &mut bar);
        controller.view_mut().take();

        assert!(!controller.on_candidate_moved(&grid, &bar, None));
        assert_eq!(
            controller.view().commands(),
            &[ViewCommand::ClearHighlight { piece: bar.id() }]
        );
    }

    #[test]
    fn test_rotate_refreshes_highlight_at_last_cell() {
        let (mut grid, mut controller) = setup();
        let mut bar = piece(1, "###");
        controller.begin_interaction(&mut grid, &mut bar);

        // Horizontal bar fits at (5, 6); vertical would run off the bottom.
        assert!(controller.on_candidate_moved(&grid, &bar, Some(IVec2::new(5, 6))));
        assert_eq!(controller.rotate_candidate(&grid, &mut bar), Some(false));

        let highlight = controller.view().last_highlight().unwrap();
        assert_eq!(highlight.origin, IVec2::new(5, 6));
        assert_eq!(highlight.len(), 2);
        assert!(!highlight.placeable);
    }

    #[test]
    fn test_rotate_without_cell_only_rotates() {
        let (mut grid, mut controller) = setup();
        let mut bar = piece(1, "###");
        controller.begin_interaction(&mut grid, &mut bar);
        assert_eq!(controller.rotate_candidate(&grid, &mut bar), None);
        assert_eq!(bar.rotation(), Rotation::Deg90);
    }

    #[test]
    fn test_end_rejected_reports_start_origin() {
        let (mut grid, mut controller) = setup();
        let mut blocker = piece(1, "#");
        let mut bar = piece(2, "##");
        assert!(grid.place(&mut blocker, IVec2::new(4, 4)));
        assert!(grid.place(&mut bar, IVec2::new(0, 0)));

        controller.begin_interaction(&mut grid, &mut bar);
        controller.view_mut().take();
        let outcome = controller.end_interaction(&mut grid, &mut bar, Some(IVec2::new(3, 4)));

        assert_eq!(
            outcome,
            InteractionOutcome::Rejected {
                piece: bar.id(),
                reason: Some(PlacementRejection::Occupied {
                    cell: IVec2::new(4, 4),
                    owner: blocker.id()
                }),
                restore_to: Some(IVec2::ZERO),
                restore_rotation: Rotation::Deg0,
            }
        );
        assert_eq!(controller.active_piece(), None);
        assert!(controller.view().commands().contains(&ViewCommand::RestorePiece {
            piece: bar.id(),
            origin: Some(IVec2::ZERO)
        }));
    }

    #[test]
    fn test_end_off_grid_is_rejected() {
        let (mut grid, mut controller) = setup();
        let mut bar = piece(1, "##");
        controller.begin_interaction(&mut grid, &mut bar);
        let outcome = controller.end_interaction(&mut grid, &mut bar, None);
        assert!(matches!(
            outcome,
            InteractionOutcome::Rejected {
                reason: None,
                restore_to: None,
                ..
            }
        ));
    }

    #[test]
    fn test_cancel_restores_origin_and_rotation() {
        let (mut grid, mut controller) = setup();
        let mut ell = piece(1, "#.\n##");
        assert!(grid.place(&mut ell, IVec2::new(1, 1)));
        let before = grid.occupancy().to_vec();

        controller.begin_interaction(&mut grid, &mut ell);
        controller.on_candidate_moved(&grid, &ell, Some(IVec2::new(5, 5)));
        controller.rotate_candidate(&grid, &mut ell);

        assert!(controller.cancel_interaction(&mut grid, &mut ell));
        assert_eq!(ell.rotation(), Rotation::Deg0);
        assert_eq!(ell.grid_position(), Some(IVec2::new(1, 1)));
        assert_eq!(grid.occupancy(), before.as_slice());
    }

    #[test]
    fn test_cancel_without_interaction_is_false() {
        let (mut grid, mut controller) = setup();
        let mut bar = piece(1, "##");
        assert!(!controller.cancel_interaction(&mut grid, &mut bar));
    }

    #[test]
    fn test_apply_dispatches() {
        let (mut grid, mut controller) = setup();
        let mut bar = piece(1, "##");

        assert_eq!(
            controller.apply(&mut grid, &mut bar, InteractionInput::Begin),
            InputResult::Started(None)
        );
        assert_eq!(
            controller.apply(&mut grid, &mut bar, InteractionInput::Move(Some(IVec2::new(7, 7)))),
            InputResult::Feasible(false)
        );
        assert_eq!(
            controller.apply(&mut grid, &mut bar, InteractionInput::Rotate),
            InputResult::Rotated(Some(false))
        );
        assert_eq!(
            controller.apply(&mut grid, &mut bar, InteractionInput::Move(Some(IVec2::new(7, 6)))),
            InputResult::Feasible(true)
        );
        assert_eq!(
            controller.apply(&mut grid, &mut bar, InteractionInput::End(Some(IVec2::new(7, 6)))),
            InputResult::Finished(InteractionOutcome::Committed {
                piece: bar.id(),
                origin: IVec2::new(7, 6)
            })
        );
        assert_eq!(grid.piece_at(IVec2::new(7, 7)), Some(bar.id()));
    }
}
