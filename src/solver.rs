use tracing::{debug, info};

use crate::board::{Board, Outcome};
use crate::error::{PackError, Result};
use crate::types::{CutSpec, FailureRecord, Layout, Piece, Placement, Rect, UNPLACED};

/// Clearance between neighbouring pieces, in millimetres.
pub const DEFAULT_SPACING: u32 = 3;

pub struct Solver {
    stock: Rect,
    num_boards: f64,
    spacing: u32,
    cuts: Vec<CutSpec>,
}

impl Solver {
    pub fn new(stock: Rect, num_boards: f64, cuts: Vec<CutSpec>) -> Self {
        Self {
            stock,
            num_boards,
            spacing: DEFAULT_SPACING,
            cuts,
        }
    }

    pub fn with_spacing(mut self, spacing: u32) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn solve(&self) -> Result<Layout> {
        if self.stock.w == 0 || self.stock.h == 0 {
            return Err(PackError::ZeroBoardDimension {
                width: self.stock.w,
                height: self.stock.h,
            });
        }
        if !self.num_boards.is_finite() || self.num_boards <= 0.0 {
            return Err(PackError::InvalidBoardCount(self.num_boards));
        }

        let pieces = expand_cuts(&self.cuts);
        let full_boards = self.num_boards.floor() as u32;
        let has_partial = self.num_boards.fract() != 0.0;

        let mut placements = Vec::new();
        // Pieces still waiting for a board, as recorded by the last pass
        let mut pending: Vec<FailureRecord> = pieces
            .iter()
            .enumerate()
            .map(|(i, p)| FailureRecord::new(p, i, UNPLACED))
            .collect();

        for number in 1..=full_boards {
            if pending.is_empty() {
                break;
            }
            let mut board = Board::full(number, self.stock, self.spacing);
            let (placed, failed) = run_pass(&mut board, &pending);

            if placed.is_empty() {
                // Every further full board would reject the same pieces in the same order
                pending = failed;
                let last = i32::try_from(full_boards).unwrap_or(i32::MAX);
                for f in &mut pending {
                    f.board_number = last;
                }
                break;
            }
            placements.extend(placed);
            pending = failed;
        }

        if has_partial && !pending.is_empty() {
            let number = full_boards.saturating_add(1);
            let mut board = Board::partial(number, self.stock, self.spacing);
            let (placed, failed) = run_pass(&mut board, &pending);
            placements.extend(placed);
            pending = failed;
        }

        Ok(self.aggregate(&pieces, placements, pending))
    }

    fn aggregate(
        &self,
        pieces: &[Piece],
        placements: Vec<Placement>,
        failures: Vec<FailureRecord>,
    ) -> Layout {
        let total_piece_area: u64 = pieces.iter().map(|p| p.rect.area()).sum();
        let total_board_area = self.stock.area() as f64 * self.num_boards;
        let utilization_percent = round2(total_piece_area as f64 / total_board_area * 100.0);

        info!(
            pieces = pieces.len(),
            placed = placements.len(),
            failed = failures.len(),
            utilization_percent,
            "allocation finished"
        );

        Layout {
            placements,
            failures,
            board: self.stock,
            num_boards: self.num_boards,
            total_piece_area,
            total_board_area,
            utilization_percent,
        }
    }
}

/// One piece per unit of quantity, ids dense from 0 in request order.
/// Requests with a zero dimension or quantity yield nothing.
pub fn expand_cuts(cuts: &[CutSpec]) -> Vec<Piece> {
    let mut pieces = Vec::new();
    for cut in cuts.iter().filter(|c| !c.is_degenerate()) {
        for _ in 0..cut.quantity {
            pieces.push(Piece {
                id: pieces.len(),
                rect: cut.rect(),
            });
        }
    }
    pieces
}

/// Offers every pending piece to `board` in order.
fn run_pass(
    board: &mut Board,
    pending: &[FailureRecord],
) -> (Vec<Placement>, Vec<FailureRecord>) {
    let mut placed = Vec::new();
    let mut failed = Vec::new();

    for (pass_index, record) in pending.iter().enumerate() {
        let piece = Piece {
            id: record.piece_id,
            rect: record.rect,
        };
        match board.place(&piece, pass_index) {
            Outcome::Placed(p) => placed.push(p),
            Outcome::Failed(f) => {
                debug!(
                    board = board.number(),
                    piece = f.piece_id,
                    size = %f.rect,
                    "piece does not fit"
                );
                failed.push(f)
            }
        }
    }

    debug!(
        board = board.number(),
        partial = board.is_partial(),
        placed = placed.len(),
        failed = failed.len(),
        "board pass finished"
    );
    (placed, failed)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
