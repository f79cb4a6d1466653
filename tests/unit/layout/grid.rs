use super::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn canvas(width: u32, height: u32) -> Canvas {
    Canvas { width, height }
}

#[test]
fn small_canvas_picks_exact_hint() {
    let g = GridLayout::plan(canvas(200, 100), 100, 30, 150).unwrap();
    assert_eq!((g.cell_size, g.columns, g.rows), (100, 2, 1));
    assert!(g.exact);
    assert_eq!(g.positions, vec![(0, 0), (100, 0)]);
    assert_eq!(g.slot_point(1), Some(Point::new(100.0, 0.0)));
    assert_eq!(g.slot_point(2), None);
}

#[test]
fn default_canvases_divide_exactly() {
    let g = GridLayout::plan(canvas(1680, 1176), 56, 30, 150).unwrap();
    assert_eq!((g.cell_size, g.columns, g.rows), (56, 30, 21));
    assert!(g.exact);
    assert_eq!(g.slot_count(), 630);

    let wide = GridLayout::plan(canvas(3192, 672), 56, 30, 150).unwrap();
    assert_eq!((wide.cell_size, wide.columns, wide.rows), (56, 57, 12));
}

#[test]
fn closest_divisor_wins_and_ties_keep_the_smaller() {
    // Divisors of 120 in range: 30, 40, 60, 120. Hint 50 is equidistant from 40 and 60.
    let g = GridLayout::plan(canvas(120, 120), 50, 30, 150).unwrap();
    assert_eq!(g.cell_size, 40);
    let g = GridLayout::plan(canvas(120, 120), 100, 30, 150).unwrap();
    assert_eq!(g.cell_size, 120);
}

#[test]
fn search_range_is_inclusive() {
    let g = GridLayout::plan(canvas(150, 150), 150, 30, 150).unwrap();
    assert_eq!(g.cell_size, 150);
    assert!(g.exact);
}

#[test]
fn no_divisor_falls_back_to_floor_division() {
    // 101 x 103 are primes: nothing in 30..=150 divides both.
    let g = GridLayout::plan(canvas(101, 103), 40, 30, 150).unwrap();
    assert!(!g.exact);
    assert_eq!(g.cell_size, 50);
    assert_eq!((g.columns, g.rows), (2, 2));
    assert_eq!(g.slot_count(), 4);
}

#[test]
fn degenerate_inputs_are_layout_errors() {
    assert!(matches!(
        GridLayout::plan(canvas(0, 100), 56, 30, 150),
        Err(MosaicError::Layout(_))
    ));
    assert!(matches!(
        GridLayout::plan(canvas(100, 100), 0, 30, 150),
        Err(MosaicError::Layout(_))
    ));
}

#[test]
fn fill_duplicates_when_short() {
    let mut rng = StdRng::seed_from_u64(1);
    let a = SlotAssignment::fill(1, 2, &mut rng).unwrap();
    assert_eq!(a.sources, vec![0, 0]);
    assert_eq!((a.duplicated, a.truncated), (1, 0));

    let a = SlotAssignment::fill(3, 10, &mut rng).unwrap();
    assert_eq!(a.len(), 10);
    assert_eq!(&a.sources[..3], &[0, 1, 2]);
    assert!(a.sources.iter().all(|&s| s < 3));
    assert_eq!(a.duplicated, 7);
}

#[test]
fn fill_truncates_when_long() {
    let mut rng = StdRng::seed_from_u64(2);
    let a = SlotAssignment::fill(10, 4, &mut rng).unwrap();
    assert_eq!(a.sources, vec![0, 1, 2, 3]);
    assert_eq!((a.duplicated, a.truncated), (0, 6));
}

#[test]
fn grid_is_always_exactly_filled() {
    let mut rng = StdRng::seed_from_u64(3);
    for photos in 1..40 {
        for slots in 1..40 {
            let a = SlotAssignment::fill(photos, slots, &mut rng).unwrap();
            assert_eq!(a.len(), slots);
            a.ensure_fills(slots).unwrap();
            assert!(a.ensure_fills(slots + 1).is_err());
        }
    }
}

#[test]
fn zero_photos_is_a_layout_error() {
    let mut rng = StdRng::seed_from_u64(4);
    assert!(matches!(
        SlotAssignment::fill(0, 4, &mut rng),
        Err(MosaicError::Layout(_))
    ));
}
