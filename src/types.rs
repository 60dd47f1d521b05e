use serde::{Deserialize, Deserializer, Serialize};

/// Position reported for pieces that never found a spot on any board.
pub const UNPLACED: i32 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    #[serde(rename = "width")]
    pub w: u32,
    #[serde(rename = "height")]
    pub h: u32,
}

impl Rect {
    pub fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }

    pub fn area(&self) -> u64 {
        self.w as u64 * self.h as u64
    }

    pub fn rotated(&self) -> Self {
        Self {
            w: self.h,
            h: self.w,
        }
    }

    pub fn fits_in(&self, other: &Rect) -> bool {
        self.w <= other.w && self.h <= other.h
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.w, self.h)
    }
}

/// A requested cut: `quantity` pieces of `width` x `height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CutSpec {
    #[serde(deserialize_with = "deserialize_u32_from_number")]
    pub width: u32,
    #[serde(deserialize_with = "deserialize_u32_from_number")]
    pub height: u32,
    #[serde(deserialize_with = "deserialize_u32_from_number")]
    pub quantity: u32,
}

impl CutSpec {
    pub fn new(width: u32, height: u32, quantity: u32) -> Self {
        Self {
            width,
            height,
            quantity,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.width, self.height)
    }

    /// Zero in any field means the request yields no pieces.
    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0 || self.quantity == 0
    }
}

/// Accepts any JSON number. Fractions are truncated and negative values
/// become 0, which the expander then drops.
pub fn deserialize_u32_from_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if !value.is_finite() || value <= 0.0 {
        return Ok(0);
    }
    Ok(value.trunc().min(u32::MAX as f64) as u32)
}

/// One physical piece produced by expanding a [`CutSpec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Piece {
    pub id: usize,
    pub rect: Rect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Placement {
    pub piece_id: usize,
    /// Position of the piece in the working set of the pass that placed it.
    pub pass_index: usize,
    pub board_number: u32,
    pub x: u32,
    pub y: u32,
    /// Dimensions as placed, after rotation.
    #[serde(flatten)]
    pub rect: Rect,
    pub rotated: bool,
    pub is_partial: bool,
}

impl Placement {
    pub fn right(&self) -> u64 {
        self.x as u64 + self.rect.w as u64
    }

    pub fn bottom(&self) -> u64 {
        self.y as u64 + self.rect.h as u64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FailureRecord {
    pub piece_id: usize,
    pub pass_index: usize,
    /// Original (unrotated) dimensions.
    #[serde(flatten)]
    pub rect: Rect,
    /// Last board the piece was tried on, or [`UNPLACED`] if none.
    pub board_number: i32,
    pub x: i32,
    pub y: i32,
}

impl FailureRecord {
    pub fn new(piece: &Piece, pass_index: usize, board_number: i32) -> Self {
        Self {
            piece_id: piece.id,
            pass_index,
            rect: piece.rect,
            board_number,
            x: UNPLACED,
            y: UNPLACED,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BoardUsage {
    pub board_number: u32,
    pub is_partial: bool,
}

/// Complete outcome of one allocation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub placements: Vec<Placement>,
    pub failures: Vec<FailureRecord>,
    pub board: Rect,
    pub num_boards: f64,
    pub total_piece_area: u64,
    pub total_board_area: f64,
    pub utilization_percent: f64,
}

impl Layout {
    pub fn placed_count(&self) -> usize {
        self.placements.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failures.len()
    }

    pub fn all_placed(&self) -> bool {
        self.failures.is_empty()
    }

    /// Boards that received at least one piece, in ascending order.
    pub fn boards(&self) -> Vec<BoardUsage> {
        let mut boards: Vec<BoardUsage> = Vec::new();
        for p in &self.placements {
            if !boards.iter().any(|b| b.board_number == p.board_number) {
                boards.push(BoardUsage {
                    board_number: p.board_number,
                    is_partial: p.is_partial,
                });
            }
        }
        boards.sort_by_key(|b| b.board_number);
        boards
    }

    pub fn placements_on(&self, board_number: u32) -> impl Iterator<Item = &Placement> {
        self.placements
            .iter()
            .filter(move |p| p.board_number == board_number)
    }
}
