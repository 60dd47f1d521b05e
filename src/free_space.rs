use crate::types::{Placement, Rect};

/// Candidate open area on a board, anchored at `(x, y)` and running to the
/// board's far edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreeRegion {
    pub x: u32,
    pub y: u32,
    pub rect: Rect,
}

impl FreeRegion {
    pub fn area(&self) -> u64 {
        self.rect.area()
    }
}

/// Candidate regions for the next placement, largest area first.
///
/// Regions grow from anchor points to the bottom-right edges of the board and
/// are kept only if they stay `spacing` away from every placed piece. They
/// may overlap each other. Equal areas keep anchor insertion order.
pub fn free_regions(stock: Rect, spacing: u32, placements: &[Placement]) -> Vec<FreeRegion> {
    if placements.is_empty() {
        return vec![FreeRegion {
            x: 0,
            y: 0,
            rect: stock,
        }];
    }

    let mut regions: Vec<FreeRegion> = anchors(spacing, placements)
        .into_iter()
        .filter(|&(x, y)| x < stock.w && y < stock.h)
        .map(|(x, y)| FreeRegion {
            x,
            y,
            rect: Rect::new(stock.w - x, stock.h - y),
        })
        .filter(|r| r.rect.w > 0 && r.rect.h > 0)
        .filter(|r| !overlaps_any(r, spacing, placements))
        .collect();

    // sort_by is stable, so ties stay in anchor order
    regions.sort_by(|a, b| b.area().cmp(&a.area()));
    regions
}

/// Anchor points in first-seen order, without duplicates.
fn anchors(spacing: u32, placements: &[Placement]) -> Vec<(u32, u32)> {
    let mut anchors = vec![(0, 0)];
    for p in placements {
        let right = (p.x.saturating_add(p.rect.w).saturating_add(spacing), p.y);
        let below = (p.x, p.y.saturating_add(p.rect.h).saturating_add(spacing));
        for anchor in [right, below] {
            if !anchors.contains(&anchor) {
                anchors.push(anchor);
            }
        }
    }
    anchors
}

fn overlaps_any(region: &FreeRegion, spacing: u32, placements: &[Placement]) -> bool {
    let s = spacing as i64;
    let (x, y) = (region.x as i64, region.y as i64);
    let (w, h) = (region.rect.w as i64, region.rect.h as i64);

    placements.iter().any(|p| {
        let left = p.x as i64 - s;
        let right = p.right() as i64 + s;
        let top = p.y as i64 - s;
        let bottom = p.bottom() as i64 + s;

        !(x + w <= left || x >= right || y + h <= top || y >= bottom)
    })
}
