use crate::free_space::{FreeRegion, free_regions};
use crate::types::{FailureRecord, Piece, Placement, Rect};

/// A single stock board being filled during one allocation pass.
#[derive(Debug, Clone)]
pub struct Board {
    number: u32,
    size: Rect,
    spacing: u32,
    partial: bool,
    placements: Vec<Placement>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fit {
    pub region: FreeRegion,
    pub rotated: bool,
}

/// What happened to one piece on one board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Placed(Placement),
    Failed(FailureRecord),
}

impl Board {
    pub fn full(number: u32, size: Rect, spacing: u32) -> Self {
        Self {
            number,
            size,
            spacing,
            partial: false,
            placements: Vec::new(),
        }
    }

    /// Half-height board cut from a full one (height rounded down).
    pub fn partial(number: u32, full_size: Rect, spacing: u32) -> Self {
        Self {
            number,
            size: Rect::new(full_size.w, full_size.h / 2),
            spacing,
            partial: true,
            placements: Vec::new(),
        }
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn size(&self) -> Rect {
        self.size
    }

    pub fn is_partial(&self) -> bool {
        self.partial
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    pub fn used_area(&self) -> u64 {
        self.placements.iter().map(|p| p.rect.area()).sum()
    }

    /// First region that holds the piece, trying it as given before rotated.
    pub fn find_fit(&self, piece: Rect) -> Option<Fit> {
        let regions = free_regions(self.size, self.spacing, &self.placements);

        for oriented in [piece, piece.rotated()] {
            if let Some(region) = regions.iter().find(|r| oriented.fits_in(&r.rect)) {
                return Some(Fit {
                    region: *region,
                    rotated: oriented.w != piece.w,
                });
            }
        }

        None
    }

    pub fn place(&mut self, piece: &Piece, pass_index: usize) -> Outcome {
        let Some(fit) = self.find_fit(piece.rect) else {
            let board_number = i32::try_from(self.number).unwrap_or(i32::MAX);
            return Outcome::Failed(FailureRecord::new(piece, pass_index, board_number));
        };

        let placed = if fit.rotated {
            piece.rect.rotated()
        } else {
            piece.rect
        };
        let placement = Placement {
            piece_id: piece.id,
            pass_index,
            board_number: self.number,
            x: fit.region.x,
            y: fit.region.y,
            rect: placed,
            rotated: fit.rotated,
            is_partial: self.partial,
        };
        self.placements.push(placement);
        Outcome::Placed(placement)
    }
}
