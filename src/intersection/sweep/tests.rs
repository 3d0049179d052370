use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::find;
use crate::geometry::{compare_y, Location, Point, Segment};
use crate::intersection::find_simple;

fn seg(x1: f64, y1: f64, x2: f64, y2: f64) -> Segment {
    Segment::new(Point::new(x1, y1), Point::new(x2, y2))
}

#[test]
fn two_segment_cross() {
    let segs = vec![seg(0.0, 0.0, 10.0, 10.0), seg(0.0, 10.0, 10.0, 0.0)];
    let result = find(&segs).unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!((result[0].point.x, result[0].point.y), (5.0, 5.0));
    let mut entries = result[0].entries.clone();
    entries.sort_by_key(|(i, _)| *i);
    assert_eq!(entries, vec![(0, Location::Between), (1, Location::Between)]);
}

#[test]
fn three_concurrent_lines() {
    let segs = vec![
        seg(0.0, 0.0, 10.0, 10.0),
        seg(0.0, 10.0, 10.0, 0.0),
        seg(0.0, 5.0, 10.0, 5.0),
    ];
    let result = find(&segs).unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!((result[0].point.x, result[0].point.y), (5.0, 5.0));
    assert_eq!(result[0].entries.len(), 3);
    assert!(result[0]
        .entries
        .iter()
        .all(|(_, loc)| *loc == Location::Between));
}

#[test]
fn shared_endpoint() {
    let segs = vec![seg(0.0, 0.0, 5.0, 5.0), seg(5.0, 5.0, 10.0, 0.0)];
    let result = find(&segs).unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].location_of(0), Some(Location::End));
    assert_eq!(result[0].location_of(1), Some(Location::Start));
}

#[test]
fn parallel_segments_no_crossing() {
    let segs = vec![seg(0.0, 0.0, 10.0, 0.0), seg(0.0, 5.0, 10.0, 5.0)];
    assert!(find(&segs).unwrap().is_empty());
}

#[test]
fn output_is_lexicographically_sorted() {
    let segs = vec![
        seg(0.0, 0.0, 10.0, 10.0),
        seg(0.0, 10.0, 10.0, 0.0),
        seg(2.0, 0.0, 2.0, 10.0),
        seg(8.0, 0.0, 8.0, 10.0),
    ];
    let result = find(&segs).unwrap();
    for pair in result.windows(2) {
        assert_eq!(compare_y(&pair[0].point, &pair[1].point), std::cmp::Ordering::Less);
    }
}

#[test]
fn commutes_with_brute_force_scan() {
    _ = pretty_env_logger::try_init();
    let segs = vec![
        seg(0.0, 0.0, 10.0, 10.0),
        seg(0.0, 10.0, 10.0, 0.0),
        seg(2.0, 0.0, 2.0, 10.0),
        seg(8.0, 0.0, 8.0, 10.0),
        seg(0.0, 3.0, 10.0, 3.0),
    ];
    let mut via_sweep = find(&segs).unwrap();
    let mut via_simple = find_simple(&segs).unwrap();
    for mp in via_sweep.iter_mut().chain(via_simple.iter_mut()) {
        mp.entries.sort_by_key(|(i, _)| *i);
    }
    assert_eq!(via_sweep, via_simple);
}

#[test]
fn rejects_degenerate_segment() {
    let segs = vec![seg(0.0, 0.0, 0.0, 0.0)];
    assert!(find(&segs).is_err());
}

#[test]
fn concurrent_ends_with_differing_slopes_are_recorded() {
    // Three non-collinear segments that all terminate at the same point:
    // spec §4.2 step 2 only records an end-only event as a crossing when at
    // least two of the listed segments differ in slope.
    let segs = vec![
        seg(0.0, 0.0, 5.0, 5.0),
        seg(10.0, 0.0, 5.0, 5.0),
        seg(2.0, 3.0, 5.0, 5.0),
    ];
    let result = find(&segs).unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!((result[0].point.x, result[0].point.y), (5.0, 5.0));
    assert_eq!(result[0].entries.len(), 3);
    assert!(result[0]
        .entries
        .iter()
        .all(|(_, loc)| *loc == Location::End));
}

#[test]
fn commutes_with_brute_force_scan_on_random_segments() {
    _ = pretty_env_logger::try_init();
    let mut rng = StdRng::seed_from_u64(0xC0FFEE);
    for trial in 0..50 {
        let n = rng.gen_range(2..8);
        let mut segs = Vec::with_capacity(n);
        while segs.len() < n {
            let x1 = rng.gen_range(0.0..20.0);
            let y1 = rng.gen_range(0.0..20.0);
            let x2 = rng.gen_range(0.0..20.0);
            let y2 = rng.gen_range(0.0..20.0);
            let candidate = seg(x1, y1, x2, y2);
            if !candidate.is_degenerate() {
                segs.push(candidate);
            }
        }

        let mut via_sweep = find(&segs).unwrap();
        let mut via_simple = find_simple(&segs).unwrap();
        for mp in via_sweep.iter_mut().chain(via_simple.iter_mut()) {
            mp.entries.sort_by_key(|(i, _)| *i);
        }
        assert_eq!(via_sweep, via_simple, "trial {trial} with segments {segs:?}");
    }
}
