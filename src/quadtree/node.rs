use std::collections::HashMap;

use crate::geometry::{Point, Rect};

use super::signature::Signature;

/// A leaf holds up to `capacity` entries directly; an interior node holds
/// none and instead has up to four children, one per quadrant `{--, -+,
/// +-, ++}` indexed `[dx + 2*dy]` by the sign of `(key.x, key.y)` relative
/// to the node's center (spec §4.3). A quadrant slot is `None` when that
/// region currently has no entries: leaves are dropped, not kept empty,
/// and an interior node whose last populated child is dropped reverts to
/// being an empty leaf itself (spec §4.3's collapse policy).
#[derive(Debug, Clone)]
pub(super) enum Contents<V> {
    Leaf(HashMap<OrderedPoint, V>),
    Interior([Option<Signature>; 4]),
}

/// `Point` wrapped for use as a `HashMap` key: quadtree entries are keyed by
/// exact coordinate, and `f64` has no `Eq`/`Hash`, so entries compare by bit
/// pattern rather than by a tolerance (an exact key lookup is exact by
/// construction; tolerance only applies to the intersection engine).
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct OrderedPoint(pub Point);

impl Eq for OrderedPoint {}

impl std::hash::Hash for OrderedPoint {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.x.to_bits().hash(state);
        self.0.y.to_bits().hash(state);
    }
}

#[derive(Debug, Clone)]
pub struct Node<V> {
    pub(super) signature: Signature,
    pub(super) bounds: Rect,
    pub(super) parent: Option<Signature>,
    pub(super) contents: Contents<V>,
}

impl<V> Node<V> {
    pub(super) fn new_leaf(signature: Signature, bounds: Rect, parent: Option<Signature>) -> Self {
        Node {
            signature,
            bounds,
            parent,
            contents: Contents::Leaf(HashMap::new()),
        }
    }

    pub fn signature(&self) -> Signature {
        self.signature
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn parent(&self) -> Option<Signature> {
        self.parent
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.contents, Contents::Leaf(_))
    }

    pub fn children(&self) -> Option<[Option<Signature>; 4]> {
        match self.contents {
            Contents::Interior(c) => Some(c),
            Contents::Leaf(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        match &self.contents {
            Contents::Leaf(entries) => entries.len(),
            Contents::Interior(_) => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn entries(&self) -> Box<dyn Iterator<Item = (Point, &V)> + '_> {
        match &self.contents {
            Contents::Leaf(entries) => Box::new(entries.iter().map(|(k, v)| (k.0, v))),
            Contents::Interior(_) => Box::new(std::iter::empty()),
        }
    }
}
