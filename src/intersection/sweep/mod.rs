//! The Bentley–Ottmann sweep-line intersection strategy (spec §4.2).

mod active;
mod engine;
mod segment;

use crate::error::Result;
use crate::geometry::Segment;

use self::engine::Sweep;
use super::MultiPoint;

/// Finds all pairwise intersections among `segments` in `O((n + k) log n)`
/// time, `k` the number of intersections, using a sweep line instead of the
/// `O(n^2)` pairwise scan in [`super::find_simple`].
///
/// Output is lexicographically sorted by [`crate::geometry::compare_y`] over
/// shared points, by construction: events are consumed from the schedule in
/// that order.
pub fn find(segments: &[Segment]) -> Result<Vec<MultiPoint>> {
    let events = Sweep::run(segments)?;
    Ok(events.into_iter().map(|e| e.into_multi_point()).collect())
}

#[cfg(test)]
mod tests;
