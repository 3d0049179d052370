use super::*;
use crate::geometry::Point;

fn tree(capacity: usize, strategy: ProbeStrategy) -> Quadtree<&'static str> {
    let bounds = Rect::new(Point::new(0.0, 0.0), Point::new(100.0, 100.0)).unwrap();
    Quadtree::new(bounds, capacity, strategy).unwrap()
}

#[test]
fn put_get_round_trips() {
    let mut qt = tree(4, ProbeStrategy::Loop);
    qt.put(Point::new(1.0, 1.0), "a").unwrap();
    qt.put(Point::new(99.0, 99.0), "b").unwrap();
    assert_eq!(qt.get(Point::new(1.0, 1.0)), Some(&"a"));
    assert_eq!(qt.get(Point::new(99.0, 99.0)), Some(&"b"));
    assert_eq!(qt.get(Point::new(50.0, 50.0)), None);
    assert_eq!(qt.len(), 2);
}

#[test]
fn put_overwrites_and_returns_previous() {
    let mut qt = tree(4, ProbeStrategy::Loop);
    assert_eq!(qt.put(Point::new(5.0, 5.0), "a").unwrap(), None);
    assert_eq!(qt.put(Point::new(5.0, 5.0), "b").unwrap(), Some("a"));
    assert_eq!(qt.len(), 1);
    assert_eq!(qt.get(Point::new(5.0, 5.0)), Some(&"b"));
}

#[test]
fn rejects_key_outside_bounds() {
    let mut qt = tree(4, ProbeStrategy::Loop);
    assert!(qt.put(Point::new(-1.0, 0.0), "a").is_err());
    assert!(qt.find_node(Point::new(200.0, 0.0)).is_err());
}

#[test]
fn exceeding_capacity_splits_the_leaf() {
    let mut qt = tree(2, ProbeStrategy::Loop);
    assert_eq!(qt.nodes().len(), 1);
    for i in 0..5 {
        let x = 1.0 + i as f64;
        qt.put(Point::new(x, 1.0), "v").unwrap();
    }
    assert!(qt.nodes().len() > 1, "expected the root leaf to split");
    assert_eq!(qt.len(), 5);
    for i in 0..5 {
        let x = 1.0 + i as f64;
        assert_eq!(qt.get(Point::new(x, 1.0)), Some(&"v"));
    }
}

#[test]
fn emptying_one_quadrant_drops_its_leaf_but_not_its_siblings() {
    let mut qt = tree(4, ProbeStrategy::Loop);
    // One point in each corner plus an extra in the bottom-left, forcing a
    // split (5 entries, capacity 4) into four single-quadrant children.
    let pts = [
        Point::new(10.0, 10.0),
        Point::new(90.0, 10.0),
        Point::new(10.0, 90.0),
        Point::new(90.0, 90.0),
        Point::new(11.0, 11.0),
    ];
    for p in pts {
        qt.put(p, "v").unwrap();
    }
    assert!(qt.nodes().len() > 1);

    qt.remove(Point::new(10.0, 10.0)).unwrap();
    qt.remove(Point::new(11.0, 11.0)).unwrap();
    assert_eq!(qt.len(), 3);
    assert!(
        qt.nodes().len() > 1,
        "three corners are still populated, so the root must stay interior"
    );
    assert_eq!(qt.get(Point::new(90.0, 10.0)), Some(&"v"));
}

#[test]
fn draining_every_quadrant_collapses_the_root_to_an_empty_leaf() {
    let mut qt = tree(4, ProbeStrategy::Loop);
    let pts = [
        Point::new(10.0, 10.0),
        Point::new(90.0, 10.0),
        Point::new(10.0, 90.0),
        Point::new(90.0, 90.0),
        Point::new(11.0, 11.0),
    ];
    for p in pts {
        qt.put(p, "v").unwrap();
    }
    for p in pts {
        qt.remove(p).unwrap();
    }
    assert_eq!(qt.len(), 0);
    assert_eq!(
        qt.nodes().len(),
        1,
        "draining every quadrant should collapse the tree back to a single empty leaf"
    );
    assert!(qt.nodes().contains_key(&Signature::root()));
}

#[test]
fn remove_missing_key_is_none() {
    let mut qt = tree(4, ProbeStrategy::Loop);
    assert_eq!(qt.remove(Point::new(3.0, 3.0)).unwrap(), None);
}

#[test]
fn remove_if_is_conditional_on_current_value() {
    let mut qt = tree(4, ProbeStrategy::Loop);
    qt.put(Point::new(2.0, 2.0), "a").unwrap();
    assert!(!qt.remove_if(Point::new(2.0, 2.0), &"wrong").unwrap());
    assert_eq!(qt.len(), 1);
    assert!(qt.remove_if(Point::new(2.0, 2.0), &"a").unwrap());
    assert_eq!(qt.len(), 0);
}

#[test]
fn replace_if_is_conditional_on_current_value() {
    let mut qt = tree(4, ProbeStrategy::Loop);
    qt.put(Point::new(2.0, 2.0), "a").unwrap();
    assert!(!qt.replace_if(Point::new(2.0, 2.0), &"wrong", "b").unwrap());
    assert_eq!(qt.get(Point::new(2.0, 2.0)), Some(&"a"));
    assert!(qt.replace_if(Point::new(2.0, 2.0), &"a", "b").unwrap());
    assert_eq!(qt.get(Point::new(2.0, 2.0)), Some(&"b"));
}

#[test]
fn move_key_rekeys_without_losing_the_value() {
    let mut qt = tree(4, ProbeStrategy::Loop);
    qt.put(Point::new(1.0, 1.0), "a").unwrap();
    qt.move_key(Point::new(1.0, 1.0), Point::new(80.0, 80.0), None)
        .unwrap();
    assert_eq!(qt.get(Point::new(1.0, 1.0)), None);
    assert_eq!(qt.get(Point::new(80.0, 80.0)), Some(&"a"));
    assert_eq!(qt.len(), 1);
}

#[test]
fn move_key_within_same_leaf_skips_find_node_via_hint() {
    let mut qt = tree(4, ProbeStrategy::Loop);
    qt.put(Point::new(1.0, 1.0), "a").unwrap();
    let hint = qt.find_node(Point::new(1.0, 1.0)).unwrap();
    let result = qt
        .move_key(Point::new(1.0, 1.0), Point::new(2.0, 2.0), Some(hint))
        .unwrap();
    assert_eq!(result, Some(hint));
    assert_eq!(qt.get(Point::new(2.0, 2.0)), Some(&"a"));
    assert_eq!(qt.len(), 1);
}

#[test]
fn move_key_ignores_a_hint_that_does_not_contain_the_key() {
    let mut qt = tree(4, ProbeStrategy::Loop);
    qt.put(Point::new(1.0, 1.0), "a").unwrap();
    qt.put(Point::new(90.0, 90.0), "b").unwrap();
    let wrong_hint = qt.find_node(Point::new(90.0, 90.0)).unwrap();
    qt.move_key(Point::new(1.0, 1.0), Point::new(2.0, 2.0), Some(wrong_hint))
        .unwrap();
    assert_eq!(qt.get(Point::new(2.0, 2.0)), Some(&"a"));
    assert_eq!(qt.get(Point::new(90.0, 90.0)), Some(&"b"));
}

#[test]
fn move_key_rejects_missing_source() {
    let mut qt = tree(4, ProbeStrategy::Loop);
    assert!(qt
        .move_key(Point::new(1.0, 1.0), Point::new(2.0, 2.0), None)
        .is_err());
}

#[test]
fn move_key_rejects_out_of_bounds_destination() {
    let mut qt = tree(4, ProbeStrategy::Loop);
    qt.put(Point::new(1.0, 1.0), "a").unwrap();
    assert!(qt
        .move_key(Point::new(1.0, 1.0), Point::new(-5.0, -5.0), None)
        .is_err());
    assert_eq!(qt.get(Point::new(1.0, 1.0)), Some(&"a"));
}

#[test]
fn find_range_returns_only_points_inside_the_rectangle() {
    let mut qt = tree(2, ProbeStrategy::Loop);
    qt.put(Point::new(5.0, 5.0), "in").unwrap();
    qt.put(Point::new(95.0, 95.0), "out").unwrap();
    qt.put(Point::new(10.0, 10.0), "in2").unwrap();

    let window = Rect::new(Point::new(0.0, 0.0), Point::new(20.0, 20.0)).unwrap();
    let mut found: Vec<_> = qt.find_range(window).into_iter().map(|(_, v)| *v).collect();
    found.sort();
    assert_eq!(found, vec!["in", "in2"]);
}

#[test]
fn find_range_radius_filters_by_circle_not_just_bbox() {
    let mut qt = tree(2, ProbeStrategy::Loop);
    qt.put(Point::new(50.0, 50.0), "center").unwrap();
    qt.put(Point::new(53.0, 50.0), "near").unwrap();
    qt.put(Point::new(54.0, 54.0), "corner").unwrap(); // inside bbox, outside circle

    let mut found: Vec<_> = qt
        .find_range_radius(Point::new(50.0, 50.0), 5.0)
        .unwrap()
        .into_iter()
        .map(|(_, v)| *v)
        .collect();
    found.sort();
    assert_eq!(found, vec!["center", "near"]);
}

#[test]
fn find_range_radius_rejects_negative_radius() {
    let qt = tree(2, ProbeStrategy::Loop);
    assert!(qt.find_range_radius(Point::new(50.0, 50.0), -1.0).is_err());
}

#[test]
fn find_node_at_matches_the_address_put_into() {
    let mut qt = tree(2, ProbeStrategy::Loop);
    for i in 0..6 {
        qt.put(Point::new(1.0 + i as f64, 1.0), "v").unwrap();
    }
    let sig = qt.find_node(Point::new(1.0, 1.0)).unwrap();
    let (level, gx, gy) = sig.unpack();
    assert!(qt.find_node_at(level, gx, gy).is_some());
}

#[test]
fn entries_traverses_every_leaf_regardless_of_splits() {
    let mut qt = tree(2, ProbeStrategy::Loop);
    let pts = [
        Point::new(10.0, 10.0),
        Point::new(90.0, 10.0),
        Point::new(10.0, 90.0),
        Point::new(90.0, 90.0),
        Point::new(11.0, 11.0),
    ];
    for p in pts {
        qt.put(p, "v").unwrap();
    }
    assert!(qt.nodes().len() > 1, "expected the root leaf to split");

    let mut seen: Vec<(f64, f64)> = qt.entries().map(|(p, _)| (p.x, p.y)).collect();
    seen.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let mut expected: Vec<(f64, f64)> = pts.iter().map(|p| (p.x, p.y)).collect();
    expected.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert_eq!(seen, expected);
}

#[test]
fn loop_and_bitmask_strategies_agree_on_lookups() {
    let points: Vec<Point> = (0..40)
        .map(|i| Point::new((i as f64 * 2.3) % 100.0, (i as f64 * 3.7) % 100.0))
        .collect();

    let mut loop_tree = tree(3, ProbeStrategy::Loop);
    let mut bitmask_tree = tree(3, ProbeStrategy::Bitmask);
    for (i, p) in points.iter().enumerate() {
        loop_tree.put(*p, i).unwrap();
        bitmask_tree.put(*p, i).unwrap();
    }
    for p in &points {
        assert_eq!(loop_tree.get(*p), bitmask_tree.get(*p));
    }
    assert_eq!(loop_tree.len(), bitmask_tree.len());
}
