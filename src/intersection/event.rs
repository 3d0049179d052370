use crate::geometry::{Location, Point};

/// A bundle of coincident segment touches at a single plane point.
///
/// Parallel-list invariant (spec §3): `indices.len() == locations.len()`, no
/// index appears twice, and every listed segment genuinely touches `point`.
/// Kept as parallel vectors rather than a `Vec<(usize, Location)>` to match
/// how both consumers in this crate build it up: scanning candidate
/// segments and appending index/location in lock-step.
#[derive(Debug, Clone)]
pub struct EventPoint {
    pub point: Point,
    pub indices: Vec<usize>,
    pub locations: Vec<Location>,
}

impl EventPoint {
    pub fn new(point: Point) -> Self {
        EventPoint {
            point,
            indices: Vec::new(),
            locations: Vec::new(),
        }
    }

    pub fn has_index(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }

    /// Adds `(index, location)` unless `index` already has an entry here.
    /// Returns whether it was added.
    pub fn add(&mut self, index: usize, location: Location) -> bool {
        if self.has_index(index) {
            false
        } else {
            self.indices.push(index);
            self.locations.push(location);
            true
        }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, Location)> + '_ {
        self.indices.iter().copied().zip(self.locations.iter().copied())
    }

    /// Converts this event into the output [`MultiPoint`](super::MultiPoint)
    /// shape, an unordered set of `(segment index, location)` entries.
    pub fn into_multi_point(self) -> super::MultiPoint {
        super::MultiPoint {
            point: self.point,
            entries: self.indices.into_iter().zip(self.locations).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_is_idempotent_per_index() {
        let mut e = EventPoint::new(Point::new(0.0, 0.0));
        assert!(e.add(3, Location::Start));
        assert!(!e.add(3, Location::Between));
        assert_eq!(e.len(), 1);
        assert_eq!(e.locations[0], Location::Start);
    }
}
