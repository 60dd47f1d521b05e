//! End-to-end properties of the allocator over mixed workloads.

use cut_planner::{CutSpec, DEFAULT_SPACING, Layout, Placement, Rect, Solver, expand_cuts, pack};
use pretty_assertions::assert_eq;
use std::collections::{BTreeMap, BTreeSet};

fn workloads() -> Vec<(Rect, f64, Vec<CutSpec>)> {
    vec![
        (
            Rect::new(2440, 1220),
            2.0,
            vec![
                CutSpec::new(800, 600, 5),
                CutSpec::new(400, 300, 8),
                CutSpec::new(600, 400, 4),
                CutSpec::new(1200, 600, 3),
                CutSpec::new(300, 200, 6),
                CutSpec::new(500, 500, 4),
            ],
        ),
        (
            Rect::new(1000, 500),
            1.5,
            vec![
                CutSpec::new(700, 350, 3),
                CutSpec::new(250, 180, 7),
                CutSpec::new(0, 100, 4),
                CutSpec::new(120, 900, 2),
                CutSpec::new(50, 50, 0),
                CutSpec::new(333, 111, 5),
            ],
        ),
        (
            Rect::new(500, 400),
            3.5,
            vec![
                CutSpec::new(200, 150, 8),
                CutSpec::new(300, 200, 6),
                CutSpec::new(150, 100, 7),
                CutSpec::new(250, 180, 5),
                CutSpec::new(400, 300, 6),
                CutSpec::new(600, 100, 2),
            ],
        ),
    ]
}

fn board_height(layout: &Layout, p: &Placement) -> u32 {
    if p.is_partial {
        layout.board.h / 2
    } else {
        layout.board.h
    }
}

/// `a` stays at least `spacing` away from `b` on some axis.
fn separated(a: &Placement, b: &Placement, spacing: u64) -> bool {
    a.right() + spacing <= b.x as u64
        || b.right() + spacing <= a.x as u64
        || a.bottom() + spacing <= b.y as u64
        || b.bottom() + spacing <= a.y as u64
}

#[test]
fn test_every_piece_has_exactly_one_outcome() {
    for (board, n, cuts) in workloads() {
        let pieces = expand_cuts(&cuts);
        let layout = Solver::new(board, n, cuts).solve().unwrap();

        assert_eq!(layout.placed_count() + layout.failed_count(), pieces.len());

        let placed: BTreeSet<usize> = layout.placements.iter().map(|p| p.piece_id).collect();
        let failed: BTreeSet<usize> = layout.failures.iter().map(|f| f.piece_id).collect();
        assert_eq!(placed.len(), layout.placed_count());
        assert_eq!(failed.len(), layout.failed_count());
        assert!(placed.is_disjoint(&failed));

        let all: BTreeSet<usize> = placed.union(&failed).copied().collect();
        let expected: BTreeSet<usize> = pieces.iter().map(|p| p.id).collect();
        assert_eq!(all, expected);
    }
}

#[test]
fn test_placements_keep_clearance() {
    for (board, n, cuts) in workloads() {
        let layout = Solver::new(board, n, cuts).solve().unwrap();

        let mut by_board: BTreeMap<u32, Vec<Placement>> = BTreeMap::new();
        for p in &layout.placements {
            by_board.entry(p.board_number).or_default().push(*p);
        }

        for (number, placements) in &by_board {
            for i in 0..placements.len() {
                for j in (i + 1)..placements.len() {
                    let (a, b) = (&placements[i], &placements[j]);
                    assert!(
                        separated(a, b, DEFAULT_SPACING as u64),
                        "board {number}: {} @ ({},{}) too close to {} @ ({},{})",
                        a.rect,
                        a.x,
                        a.y,
                        b.rect,
                        b.x,
                        b.y
                    );
                }
            }
        }
    }
}

#[test]
fn test_placements_inside_board() {
    for (board, n, cuts) in workloads() {
        let layout = Solver::new(board, n, cuts).solve().unwrap();
        for p in &layout.placements {
            assert!(p.right() <= layout.board.w as u64, "{p:?} exceeds board width");
            assert!(
                p.bottom() <= board_height(&layout, p) as u64,
                "{p:?} exceeds board height"
            );
        }
    }
}

#[test]
fn test_rotation_flag_matches_dimensions() {
    for (board, n, cuts) in workloads() {
        let pieces = expand_cuts(&cuts);
        let layout = Solver::new(board, n, cuts).solve().unwrap();
        for p in &layout.placements {
            let original = pieces[p.piece_id].rect;
            assert_eq!(p.rotated, p.rect.w != original.w);
            assert_eq!(p.rect.area(), original.area());
        }
        for f in &layout.failures {
            assert_eq!(f.rect, pieces[f.piece_id].rect);
            assert_eq!((f.x, f.y), (-1, -1));
        }
    }
}

#[test]
fn test_identical_inputs_identical_output() {
    for (board, n, cuts) in workloads() {
        let first = Solver::new(board, n, cuts.clone()).solve().unwrap();
        let second = Solver::new(board, n, cuts).solve().unwrap();
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}

#[test]
fn test_partial_board_comes_last() {
    let (board, n, cuts) = workloads().remove(2);
    let layout = Solver::new(board, n, cuts).solve().unwrap();
    for p in &layout.placements {
        assert_eq!(p.is_partial, p.board_number == 4);
    }
    // pass order: board numbers never decrease along the stream
    let numbers: Vec<u32> = layout.placements.iter().map(|p| p.board_number).collect();
    let mut sorted = numbers.clone();
    sorted.sort();
    assert_eq!(numbers, sorted);
}

#[test]
fn test_scenario_single_piece() {
    let layout = pack(&[CutSpec::new(400, 300, 1)], 1000, 500, 1.0).unwrap();
    assert!(layout.failures.is_empty());
    let p = layout.placements[0];
    assert_eq!(
        (p.x, p.y, p.rect, p.rotated, p.board_number),
        (0, 0, Rect::new(400, 300), false, 1)
    );
}

#[test]
fn test_scenario_piece_wider_than_board() {
    let layout = pack(&[CutSpec::new(150, 50, 1)], 100, 100, 1.0).unwrap();
    assert!(layout.placements.is_empty());
    let f = layout.failures[0];
    assert_eq!((f.rect, f.board_number, f.x, f.y), (Rect::new(150, 50), 1, -1, -1));
}

#[test]
fn test_scenario_overflow_onto_half_board() {
    // four 497x247 pieces fill a 1000x500 board once clearance is counted
    let cuts = [CutSpec::new(497, 247, 4), CutSpec::new(400, 200, 1)];
    let layout = pack(&cuts, 1000, 500, 1.5).unwrap();
    assert!(layout.all_placed());

    let first: Vec<_> = layout.placements_on(1).collect();
    assert_eq!(first.len(), 4);

    let overflow = layout.placements.last().unwrap();
    assert_eq!(overflow.piece_id, 4);
    assert_eq!(overflow.board_number, 2);
    assert!(overflow.is_partial);
    assert!(overflow.bottom() <= 250);
}

#[test]
fn test_scenario_utilization() {
    let layout = pack(&[CutSpec::new(500, 500, 1)], 1000, 1000, 1.0).unwrap();
    assert_eq!(layout.utilization_percent, 25.0);
    assert_eq!(format!("{:.2}", layout.utilization_percent), "25.00");
}
