//! A totally-ordered wrapper around sweep-line segments, and the ordered
//! set built from it.
//!
//! Adapted from `geo::algorithm::sweep::active`: the sweep line holds
//! segments that are only `PartialOrd` in general (comparing by a
//! currently-intersecting `x` position that can be `NaN`-free but is still
//! a plain `f64`), so `Active<T>` asserts the total order the algorithm
//! guarantees holds for whatever is actually on the line at any one time.
use std::{
    borrow::Borrow,
    cmp::Ordering,
    collections::BTreeSet,
    fmt::Debug,
    ops::{Bound, Deref},
};

#[derive(Debug, Clone, PartialEq)]
#[repr(transparent)]
pub(super) struct Active<T>(pub(super) T);

impl<T> Active<T> {
    pub(super) fn active_ref(t: &T) -> &Active<T> {
        unsafe { std::mem::transmute(t) }
    }
}

impl<T> Borrow<T> for Active<T> {
    fn borrow(&self) -> &T {
        &self.0
    }
}

impl<T> Deref for Active<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T: PartialEq> Eq for Active<T> {}

/// Assert total ordering of active segments: the algorithm reinserts a
/// segment at the same event whenever a crossing would otherwise make two
/// segments momentarily incomparable, so two elements actually present in
/// the set at the same time are always comparable.
impl<T: PartialOrd + Debug> Ord for Active<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        if let Some(c) = T::partial_cmp(self, other) {
            c
        } else {
            warn!("could not compare sweep-line segments:\n\t{self:?}\n\t{other:?}");
            panic!("unable to compare active sweep-line segments");
        }
    }
}

impl<T: PartialOrd + Debug> PartialOrd for Active<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Trait abstracting the sweep-line container so the algorithm can be
/// written against neighbor queries rather than `BTreeSet` specifics.
pub(super) trait ActiveSet: Default {
    type Seg;
    fn previous(&self, segment: &Self::Seg) -> Option<Self::Seg>;
    fn next(&self, segment: &Self::Seg) -> Option<Self::Seg>;
    fn insert_active(&mut self, segment: Self::Seg);
    /// Removes `segment`; returns whether it was present. Spec §4.2 treats
    /// a miss here as an internal-consistency failure, so unlike the
    /// teacher's `debug_assert!`, this reports rather than panics.
    fn remove_active(&mut self, segment: &Self::Seg) -> bool;
}

impl<T: PartialOrd + Debug + Clone> ActiveSet for BTreeSet<Active<T>> {
    type Seg = T;

    fn previous(&self, segment: &Self::Seg) -> Option<Self::Seg> {
        self.range::<Active<_>, _>((
            Bound::Unbounded,
            Bound::Excluded(Active::active_ref(segment)),
        ))
        .next_back()
        .map(|a| a.0.clone())
    }

    fn next(&self, segment: &Self::Seg) -> Option<Self::Seg> {
        self.range::<Active<_>, _>((
            Bound::Excluded(Active::active_ref(segment)),
            Bound::Unbounded,
        ))
        .next()
        .map(|a| a.0.clone())
    }

    fn insert_active(&mut self, segment: Self::Seg) {
        self.insert(Active(segment));
    }

    fn remove_active(&mut self, segment: &Self::Seg) -> bool {
        self.remove(Active::active_ref(segment))
    }
}
