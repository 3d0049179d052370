//! The brute-force pairwise intersection scan and the segment-split
//! operation (spec §4.1).

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::geometry::{compare_y_eps, intersect, intersect_eps, Location, Point, Segment, SweepKey};

use super::event::EventPoint;
use super::MultiPoint;

/// All pairwise intersections among `segments`, using exact arithmetic.
///
/// Equivalent to `find_simple_eps(segments, 0.0)`.
pub fn find_simple(segments: &[Segment]) -> Result<Vec<MultiPoint>> {
    find_simple_eps(segments, 0.0)
}

/// All pairwise intersections among `segments`, merging points within `eps`
/// of each other into a single event.
///
/// `O(n^2)` pairwise scan: for every ordered pair `(i, j)`, `i < j`, this
/// computes `intersect_eps(segments[i], segments[j], eps)` and, if it
/// exists, records both touches at the shared event point.
pub fn find_simple_eps(segments: &[Segment], eps: f64) -> Result<Vec<MultiPoint>> {
    if eps < 0.0 {
        return Err(Error::invalid_argument(format!("eps must be >= 0, got {eps}")));
    }
    for (i, seg) in segments.iter().enumerate() {
        if seg.is_degenerate() {
            return Err(Error::invalid_argument(format!(
                "segment {i} has coincident start and end"
            )));
        }
    }

    let mut events: BTreeMap<SweepKey, EventPoint> = BTreeMap::new();

    for i in 0..segments.len() {
        for j in (i + 1)..segments.len() {
            let hit = if eps == 0.0 {
                intersect(&segments[i], &segments[j])
            } else {
                intersect_eps(&segments[i], &segments[j], eps)
            };
            let Some(hit) = hit else { continue };

            let key = find_or_create_key(&events, hit.point, eps);
            let event = events
                .entry(key)
                .or_insert_with(|| EventPoint::new(hit.point));
            event.add(i, hit.first);
            event.add(j, hit.second);
        }
    }

    Ok(events.into_values().map(EventPoint::into_multi_point).collect())
}

/// Finds (or chooses the key for) the event at `point`, merging with an
/// existing event within `eps` if one exists in the `y`-band `[point.y -
/// eps, point.y + eps]`.
fn find_or_create_key(map: &BTreeMap<SweepKey, EventPoint>, point: Point, eps: f64) -> SweepKey {
    if eps <= 0.0 {
        return SweepKey(point);
    }
    let lo = SweepKey(Point::new(f64::NEG_INFINITY, point.y - eps));
    let hi = SweepKey(Point::new(f64::INFINITY, point.y + eps));
    for (key, _) in map.range(lo..=hi) {
        if compare_y_eps(&key.0, &point, eps) == Ordering::Equal {
            return *key;
        }
    }
    SweepKey(point)
}

/// Splits `segments` on `crossings` so that no two resulting segments
/// intersect except at shared endpoints.
///
/// Every `(segment_index, location)` entry in every [`MultiPoint`] of
/// `crossings` must have a location in `{Start, Between, End}` — anything
/// else (a `Before`/`After`/`Left`/`Right` tag, which this crate's own
/// [`crate::geometry::intersect`] never emits but a caller-constructed
/// `MultiPoint` could) is rejected.
pub fn split(segments: &[Segment], crossings: &[MultiPoint]) -> Result<Vec<Segment>> {
    let mut points: Vec<Vec<Point>> = segments
        .iter()
        .map(|s| vec![s.start, s.end])
        .collect();

    for mp in crossings {
        for &(index, loc) in &mp.entries {
            if !loc.is_split_input() {
                return Err(Error::invalid_argument(format!(
                    "split crossing location must be Start/Between/End, got {loc:?}"
                )));
            }
            let Some(list) = points.get_mut(index) else {
                continue;
            };
            match loc {
                Location::Start => {
                    let first = list.first_mut().expect("endpoints always present");
                    *first = mp.point;
                }
                Location::End => {
                    let last = list.last_mut().expect("endpoints always present");
                    *last = mp.point;
                }
                Location::Between => list.push(mp.point),
                _ => unreachable!("validated above"),
            }
        }
    }

    let mut out = Vec::new();
    for list in points.iter_mut() {
        let origin = list[0];
        list.sort_by(|a, b| {
            origin
                .squared_distance(*a)
                .partial_cmp(&origin.squared_distance(*b))
                .unwrap_or(Ordering::Equal)
        });
        for pair in list.windows(2) {
            out.push(Segment::new(pair[0], pair[1]));
        }
    }
    Ok(out)
}
