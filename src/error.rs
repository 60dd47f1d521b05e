//! Error types for the allocator's entry preconditions.

use thiserror::Error;

/// Raised when `pack` is called outside its contract. Pieces that do not fit
/// are never errors; they come back as failure records.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PackError {
    #[error("board dimensions must be non-zero, got {width}x{height}")]
    ZeroBoardDimension { width: u32, height: u32 },

    #[error("number of boards must be a positive finite number, got {0}")]
    InvalidBoardCount(f64),
}

pub type Result<T> = std::result::Result<T, PackError>;
