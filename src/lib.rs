//! Greedy allocation of rectangular cut pieces onto stock boards.
//!
//! Pieces keep a fixed clearance from each other, may be rotated by 90°, and
//! overflow from one full board to the next, then onto an optional
//! half-height board when the board count has a fractional part.
//!
//! ```
//! use cut_planner::{CutSpec, pack};
//!
//! let layout = pack(&[CutSpec::new(400, 300, 1)], 1000, 500, 1.0).unwrap();
//! assert_eq!(layout.placements[0].board_number, 1);
//! assert!(layout.all_placed());
//! ```

pub mod board;
pub mod error;
pub mod free_space;
pub mod solver;
pub mod types;

pub use error::{PackError, Result};
pub use solver::{DEFAULT_SPACING, Solver, expand_cuts};
pub use types::{CutSpec, FailureRecord, Layout, Piece, Placement, Rect, UNPLACED};

/// Allocates `cuts` onto `num_boards` boards of `board_width` x `board_height`
/// using the default clearance.
pub fn pack(
    cuts: &[CutSpec],
    board_width: u32,
    board_height: u32,
    num_boards: f64,
) -> Result<Layout> {
    let stock = Rect::new(board_width, board_height);
    Solver::new(stock, num_boards, cuts.to_vec()).solve()
}
