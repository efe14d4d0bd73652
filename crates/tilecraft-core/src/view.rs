//! Presentation seam for the grid controller.
//!
//! The controller never owns sprites or transforms. It tells a
//! [`PlacementView`] what to draw and where a rejected piece should snap
//! back to; the view decides how.

use glam::IVec2;
use serde::{Deserialize, Serialize};
use tessel::{GridEvent, Highlight, PieceId};

/// Receiver of controller decisions (highlights, snap-backs, grid changes).
pub trait PlacementView {
    /// Draw the highlight for a candidate footprint.
    fn show_highlight(&mut self, piece: PieceId, highlight: &Highlight);

    /// Remove any highlight drawn for `piece`.
    fn clear_highlight(&mut self, piece: PieceId);

    /// Move the piece's visual back to where it was before the interaction.
    ///
    /// `origin` is `None` if the piece was not on the grid (e.g. it came
    /// from a shop slot).
    fn restore_piece(&mut self, piece: PieceId, origin: Option<IVec2>);

    /// The piece was committed at `origin`.
    fn piece_committed(&mut self, piece: PieceId, origin: IVec2) {
        let _ = (piece, origin);
    }

    /// The grid changed (forwarded [`GridEvent`]).
    fn grid_changed(&mut self, event: &GridEvent) {
        let _ = event;
    }
}

/// A view that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullView;

impl PlacementView for NullView {
    fn show_highlight(&mut self, _piece: PieceId, _highlight: &Highlight) {}

    fn clear_highlight(&mut self, _piece: PieceId) {}

    fn restore_piece(&mut self, _piece: PieceId, _origin: Option<IVec2>) {}
}

/// One call received by a [`RecordingView`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewCommand {
    /// `show_highlight`
    ShowHighlight {
        /// Candidate piece
        piece: PieceId,
        /// Highlight to draw
        highlight: Highlight,
    },
    /// `clear_highlight`
    ClearHighlight {
        /// Candidate piece
        piece: PieceId,
    },
    /// `restore_piece`
    RestorePiece {
        /// Rejected piece
        piece: PieceId,
        /// Where it should go back to
        origin: Option<IVec2>,
    },
    /// `piece_committed`
    PieceCommitted {
        /// Committed piece
        piece: PieceId,
        /// Its origin
        origin: IVec2,
    },
    /// `grid_changed`
    GridChanged(GridEvent),
}

/// A view that records every call, for headless hosts and tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingView {
    commands: Vec<ViewCommand>,
}

impl RecordingView {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands received so far.
    #[must_use]
    pub fn commands(&self) -> &[ViewCommand] {
        &self.commands
    }

    /// Take and clear the recorded commands.
    pub fn take(&mut self) -> Vec<ViewCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Most recent highlight shown, if any.
    #[must_use]
    pub fn last_highlight(&self) -> Option<&Highlight> {
        self.commands.iter().rev().find_map(|c| match c {
            ViewCommand::ShowHighlight { highlight, .. } => Some(highlight),
            _ => None,
        })
    }

    /// Grid events forwarded so far.
    pub fn grid_events(&self) -> impl Iterator<Item = &GridEvent> + '_ {
        self.commands.iter().filter_map(|c| match c {
            ViewCommand::GridChanged(event) => Some(event),
            _ => None,
        })
    }
}

impl PlacementView for RecordingView {
    fn show_highlight(&mut self, piece: PieceId, highlight: &Highlight) {
        self.commands.push(ViewCommand::ShowHighlight {
            piece,
            highlight: highlight.clone(),
        });
    }

    fn clear_highlight(&mut self, piece: PieceId) {
        self.commands.push(ViewCommand::ClearHighlight { piece });
    }

    fn restore_piece(&mut self, piece: PieceId, origin: Option<IVec2>) {
        self.commands.push(ViewCommand::RestorePiece { piece, origin });
    }

    fn piece_committed(&mut self, piece: PieceId, origin: IVec2) {
        self.commands.push(ViewCommand::PieceCommitted { piece, origin });
    }

    fn grid_changed(&mut self, event: &GridEvent) {
        self.commands.push(ViewCommand::GridChanged(*event));
    }
}
