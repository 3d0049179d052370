//! Intersection Engine (spec §4.1, §4.2): find all pairwise intersections
//! among a set of line segments, by brute-force scan or sweep line, and
//! split segments on those intersections.

mod brute_force;
mod event;
mod sweep;

use crate::geometry::{Location, Point};

pub use brute_force::{find_simple, find_simple_eps, split};
pub use sweep::find;

/// A point shared by one or more segments, with every segment that touches
/// it and where.
///
/// The output of both [`find_simple`] and [`find`] is a sequence of these,
/// sorted by [`crate::geometry::compare_y`] over `point`. `entries` is an
/// unordered set: no two entries share a `segment index`.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiPoint {
    pub point: Point,
    pub entries: Vec<(usize, Location)>,
}

impl MultiPoint {
    pub fn location_of(&self, segment_index: usize) -> Option<Location> {
        self.entries
            .iter()
            .find(|(i, _)| *i == segment_index)
            .map(|(_, loc)| *loc)
    }
}
