//! Test setup utilities.

use glam::IVec2;
use tessel::{PieceId, ShapeMask};

use crate::board::Board;
use crate::config::BoardConfig;
use crate::controller::GridController;
use crate::view::RecordingView;

/// A board of the given size with unit payloads.
pub fn board(width: i32, height: i32) -> Board<()> {
    Board::new(&BoardConfig::with_size(width, height)).unwrap()
}

/// A controller that records everything it tells the view.
pub fn recording_controller() -> GridController<RecordingView> {
    GridController::new(RecordingView::new())
}

/// Parse a mask pattern, panicking on bad input.
pub fn mask(pattern: &str) -> ShapeMask {
    ShapeMask::parse(pattern).unwrap()
}

/// Spawn a piece and place it, asserting that it fits.
pub fn spawn_placed(board: &mut Board<()>, pattern: &str, origin: IVec2) -> PieceId {
    let id = board.spawn(mask(pattern), ());
    assert!(board.place(id, origin), "{pattern:?} should fit at {origin}");
    id
}

/// Owners of every cell in row-major order.
pub fn snapshot(board: &Board<()>) -> Vec<Option<PieceId>> {
    board.grid().occupancy().to_vec()
}
