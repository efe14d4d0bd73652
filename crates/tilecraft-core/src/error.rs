//! Error type for board construction.

use tessel::{GridError, MaskError};
use thiserror::Error;

/// Errors raised while building boards and catalogs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BoardError {
    /// Grid or layout parameters are invalid.
    #[error(transparent)]
    Grid(#[from] GridError),

    /// A piece shape is malformed.
    #[error(transparent)]
    Mask(#[from] MaskError),
}
