//! Point-region Quadtree Index (spec §4.3, §4.4): a map from point keys to
//! values, addressed by packed node signatures instead of child pointers,
//! with a depth-probe heuristic for near-O(1) lookup in a stabilized tree.

mod node;
mod probe;
mod signature;

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::geometry::{Point, Rect};

use node::{Contents, Node, OrderedPoint};
use probe::ProbeCache;

pub use node::Node as QuadtreeNode;
pub use probe::{ProbeStrategy, PROBE_LEVEL};
pub use signature::{Signature, MAX_LEVEL};

/// Default leaf capacity (spec §6).
pub const DEFAULT_CAPACITY: usize = 128;

/// A point-keyed spatial map over a fixed rectangular universe.
///
/// Every node — leaf or interior — is stored in a single `HashMap<Signature,
/// Node<V>>`, so a node's parent and children are looked up by address
/// rather than followed by pointer (spec §4.3's "arena by signature").
pub struct Quadtree<V> {
    bounds: Rect,
    capacity: usize,
    nodes: HashMap<Signature, Node<V>>,
    size: usize,
    strategy: ProbeStrategy,
    probe_cache: ProbeCache,
}

impl<V> Quadtree<V> {
    /// Builds an empty tree over `bounds` with the given per-leaf
    /// `capacity`. `capacity` must be at least 1.
    pub fn new(bounds: Rect, capacity: usize, strategy: ProbeStrategy) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::invalid_argument("quadtree capacity must be >= 1"));
        }
        let mut nodes = HashMap::new();
        nodes.insert(Signature::root(), Node::new_leaf(Signature::root(), bounds, None));
        Ok(Quadtree {
            bounds,
            capacity,
            nodes,
            size: 0,
            strategy,
            probe_cache: ProbeCache::new(),
        })
    }

    /// Builds a tree with [`DEFAULT_CAPACITY`] and [`ProbeStrategy::Loop`].
    pub fn with_defaults(bounds: Rect) -> Result<Self> {
        Self::new(bounds, DEFAULT_CAPACITY, ProbeStrategy::Loop)
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// The full node table, leaves and interior nodes alike.
    pub fn nodes(&self) -> &HashMap<Signature, Node<V>> {
        &self.nodes
    }

    /// All `(key, value)` pairs in the tree, traversing every leaf via the
    /// node table (spec §4.3 "entrySet iteration"). Order is arbitrary and
    /// does not survive a structural modification (split, collapse) made
    /// between producing and consuming this iterator — it borrows `self`
    /// immutably, so the borrow checker already forbids interleaving a
    /// mutation with consumption of a live iterator.
    pub fn entries(&self) -> impl Iterator<Item = (Point, &V)> {
        self.nodes.values().flat_map(Node::entries)
    }

    pub fn find_node_at(&self, level: u8, grid_x: u32, grid_y: u32) -> Option<&Node<V>> {
        let sig = Signature::new(level, grid_x, grid_y).ok()?;
        self.nodes.get(&sig)
    }

    /// Locates the node that owns (or would own) `key`: a leaf if the
    /// region has any entries, otherwise the nearest interior ancestor
    /// whose quadrant for `key` has no child yet (spec §4.3, §4.4).
    ///
    /// The hot path is the depth probe: guess a starting level `L` from the
    /// node table's size, verify it by an O(1) signature lookup plus an
    /// open-bounds containment check, and fall back to progressively
    /// coarser levels (then the root) only if the guess missed.
    pub fn find_node(&self, key: Point) -> Result<Signature> {
        if !self.bounds.contains(key) {
            return Err(Error::invalid_argument(format!(
                "key ({}, {}) outside quadtree bounds",
                key.x, key.y
            )));
        }

        let count = (self.nodes.len() as u64) >> (probe::PROBE_LEVEL * 2);
        if count == 0 {
            return Ok(self.descend_normally(Signature::root(), key));
        }

        let mut level = probe::guess_level(self.strategy, count, MAX_LEVEL, &self.probe_cache);
        let mut grid = self.grid_coords_at(key, level);

        loop {
            if let Ok(sig) = Signature::new(level, grid.0, grid.1) {
                if let Some(node) = self.nodes.get(&sig) {
                    if node.bounds().contains_open(key) {
                        return Ok(self.descend_normally(sig, key));
                    }
                }
            }
            if level < probe::PROBE_LEVEL {
                break;
            }
            level -= 2;
            grid = (grid.0 >> 2, grid.1 >> 2);
        }
        Ok(self.descend_normally(Signature::root(), key))
    }

    /// Walks from `sig` toward `key`'s leaf by comparing against each
    /// node's center (spec §4.3 "normal descent"), stopping at the deepest
    /// existing node: a leaf, or an interior node whose quadrant for `key`
    /// has no child.
    fn descend_normally(&self, mut sig: Signature, key: Point) -> Signature {
        loop {
            let node = &self.nodes[&sig];
            let children = match node.children() {
                Some(c) => c,
                None => return sig,
            };
            let (dx, dy) = quadrant_of(node.bounds(), key);
            match children[quadrant_index(dx, dy)] {
                Some(child) => sig = child,
                None => return sig,
            }
        }
    }

    fn grid_coords_at(&self, key: Point, level: u8) -> (u32, u32) {
        let span = 1u32 << level;
        let fx = (key.x - self.bounds.min().x) / self.bounds.width();
        let fy = (key.y - self.bounds.min().y) / self.bounds.height();
        let gx = ((fx * span as f64) as u32).min(span - 1);
        let gy = ((fy * span as f64) as u32).min(span - 1);
        (gx, gy)
    }

    pub fn contains_key(&self, key: Point) -> bool {
        self.get(key).is_some()
    }

    pub fn get(&self, key: Point) -> Option<&V> {
        let sig = self.find_node(key).ok()?;
        match &self.nodes.get(&sig)?.contents {
            Contents::Leaf(entries) => entries.get(&OrderedPoint(key)),
            Contents::Interior(_) => None,
        }
    }

    /// Inserts or overwrites `key`, returning the previous value if any.
    /// Splits the owning leaf, then descends into (creating if absent) the
    /// quadrant that fits, repeating until the insert lands (spec §4.3
    /// `put`).
    pub fn put(&mut self, key: Point, value: V) -> Result<Option<V>> {
        if !self.bounds.contains(key) {
            return Err(Error::invalid_argument(format!(
                "key ({}, {}) outside quadtree bounds",
                key.x, key.y
            )));
        }
        let mut sig = self.find_node(key)?;
        loop {
            let is_leaf = self.nodes[&sig].is_leaf();
            if !is_leaf {
                sig = self.create_missing_child(sig, key)?;
                continue;
            }

            let len = self.nodes[&sig].len();
            let at_max_level = sig.level() >= MAX_LEVEL;
            let node = self.nodes.get_mut(&sig).expect("checked above");
            let entries = match &mut node.contents {
                Contents::Leaf(e) => e,
                Contents::Interior(_) => unreachable!("checked is_leaf above"),
            };
            if let Some(slot) = entries.get_mut(&OrderedPoint(key)) {
                return Ok(Some(std::mem::replace(slot, value)));
            }
            if len < self.capacity || at_max_level {
                entries.insert(OrderedPoint(key), value);
                self.size += 1;
                self.probe_cache.invalidate();
                return Ok(None);
            }

            self.split_leaf(sig)?;
            sig = self.find_node(key)?;
        }
    }

    /// Only sets `key`'s value if it is already present, leaving the tree
    /// untouched otherwise. Returns the replaced value, or `None` if `key`
    /// was absent.
    pub fn replace(&mut self, key: Point, value: V) -> Result<Option<V>> {
        let sig = self.find_node(key)?;
        let Some(node) = self.nodes.get_mut(&sig) else {
            return Ok(None);
        };
        let Contents::Leaf(entries) = &mut node.contents else {
            return Ok(None);
        };
        let Some(slot) = entries.get_mut(&OrderedPoint(key)) else {
            return Ok(None);
        };
        Ok(Some(std::mem::replace(slot, value)))
    }

    fn create_missing_child(&mut self, parent_sig: Signature, key: Point) -> Result<Signature> {
        let parent_bounds = self.nodes[&parent_sig].bounds();
        let (dx, dy) = quadrant_of(parent_bounds, key);
        let child_sig = parent_sig.child(dx, dy)?;
        let child_bounds = child_bounds(parent_bounds, parent_bounds.center(), dx, dy)?;
        self.nodes.insert(
            child_sig,
            Node::new_leaf(child_sig, child_bounds, Some(parent_sig)),
        );
        let parent = self.nodes.get_mut(&parent_sig).expect("checked above");
        match &mut parent.contents {
            Contents::Interior(children) => children[quadrant_index(dx, dy)] = Some(child_sig),
            Contents::Leaf(_) => unreachable!("caller only passes an interior parent"),
        }
        debug!("quadtree created child {:?} under {:?}", child_sig, parent_sig);
        Ok(child_sig)
    }

    /// Distributes `sig`'s entries into whichever of its four quadrants
    /// receive at least one, creating only those children (spec §4.3:
    /// quadrants with no entries stay absent rather than becoming empty
    /// leaves).
    fn split_leaf(&mut self, sig: Signature) -> Result<()> {
        if sig.level() >= MAX_LEVEL {
            debug!("quadtree leaf {:?} over capacity at max level, not splitting", sig);
            return Ok(());
        }

        let (bounds, parent, entries) = {
            let node = self.nodes.remove(&sig).expect("caller holds a live leaf");
            let entries = match node.contents {
                Contents::Leaf(entries) => entries,
                Contents::Interior(_) => unreachable!(),
            };
            (node.bounds, node.parent, entries)
        };

        self.nodes.insert(
            sig,
            Node {
                signature: sig,
                bounds,
                parent,
                contents: Contents::Interior([None; 4]),
            },
        );

        let center = bounds.center();
        for (OrderedPoint(key), value) in entries {
            let (dx, dy) = quadrant_of_center(center, key);
            let idx = quadrant_index(dx, dy);
            let child_sig = match self.nodes[&sig].children().expect("just made interior")[idx] {
                Some(c) => c,
                None => {
                    let c = sig.child(dx, dy)?;
                    let cb = child_bounds(bounds, center, dx, dy)?;
                    self.nodes.insert(c, Node::new_leaf(c, cb, Some(sig)));
                    let parent = self.nodes.get_mut(&sig).expect("just inserted above");
                    match &mut parent.contents {
                        Contents::Interior(children) => children[idx] = Some(c),
                        Contents::Leaf(_) => unreachable!(),
                    }
                    c
                }
            };
            let child = self.nodes.get_mut(&child_sig).expect("just ensured present");
            match &mut child.contents {
                Contents::Leaf(e) => {
                    e.insert(OrderedPoint(key), value);
                }
                Contents::Interior(_) => unreachable!(),
            }
        }

        debug!("quadtree split {:?}", sig);
        Ok(())
    }

    /// Removes `key`, returning its value if present. An emptied leaf is
    /// dropped and its parent's matching slot cleared; a parent whose last
    /// child is dropped collapses into an empty leaf itself, cascading up
    /// to the root (spec §4.3's collapse policy).
    pub fn remove(&mut self, key: Point) -> Result<Option<V>> {
        let sig = self.find_node(key)?;
        let removed = {
            let Some(node) = self.nodes.get_mut(&sig) else {
                return Ok(None);
            };
            match &mut node.contents {
                Contents::Leaf(entries) => entries.remove(&OrderedPoint(key)),
                Contents::Interior(_) => None,
            }
        };
        if removed.is_some() {
            self.size -= 1;
            self.probe_cache.invalidate();
            if self.nodes[&sig].is_empty() && sig != Signature::root() {
                self.collapse_up(sig);
            }
        }
        Ok(removed)
    }

    /// Removes `key` only if its current value equals `value`.
    pub fn remove_if(&mut self, key: Point, value: &V) -> Result<bool>
    where
        V: PartialEq,
    {
        if self.get(key) == Some(value) {
            self.remove(key)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Sets `key` to `new` only if its current value equals `old`.
    pub fn replace_if(&mut self, key: Point, old: &V, new: V) -> Result<bool>
    where
        V: PartialEq,
    {
        if self.get(key) == Some(old) {
            self.put(key, new)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn collapse_up(&mut self, sig: Signature) {
        if sig == Signature::root() {
            let bounds = self.nodes[&sig].bounds();
            self.nodes.insert(sig, Node::new_leaf(sig, bounds, None));
            debug!("quadtree root reverted to an empty leaf");
            return;
        }
        let parent_sig = self.nodes[&sig].parent().expect("non-root has a parent");
        self.nodes.remove(&sig);
        let parent = self.nodes.get_mut(&parent_sig).expect("parent still present");
        let all_empty = match &mut parent.contents {
            Contents::Interior(children) => {
                for slot in children.iter_mut() {
                    if *slot == Some(sig) {
                        *slot = None;
                    }
                }
                children.iter().all(|c| c.is_none())
            }
            Contents::Leaf(_) => unreachable!("a node's parent is always interior"),
        };
        debug!("quadtree dropped {:?}", sig);
        if all_empty {
            self.collapse_up(parent_sig);
        }
    }

    /// Rekeys `old_key` to `new_key` (spec §4.3 `move`). `node_hint`, if
    /// given, is consulted first: when it names a leaf of this tree whose
    /// bounds openly contain `old_key`, the initial [`Self::find_node`]
    /// lookup is skipped entirely. If `new_key` falls within that same
    /// leaf's bounds, the value is rekeyed in place with no further descent;
    /// otherwise this falls back to a `remove` + `put`. Returns the
    /// signature of the leaf now holding `new_key`, or `None` if removing
    /// `old_key` collapsed the source leaf and nothing could be resolved for
    /// the newly-inserted key (not reachable in practice, since `put` always
    /// leaves a leaf behind, but mirrors the spec's nullable return).
    pub fn move_key(
        &mut self,
        old_key: Point,
        new_key: Point,
        node_hint: Option<Signature>,
    ) -> Result<Option<Signature>> {
        if !self.bounds.contains(new_key) {
            return Err(Error::invalid_argument(format!(
                "key ({}, {}) outside quadtree bounds",
                new_key.x, new_key.y
            )));
        }

        let leaf_sig = match node_hint {
            Some(sig)
                if self
                    .nodes
                    .get(&sig)
                    .map(|n| n.is_leaf() && n.bounds().contains_open(old_key))
                    .unwrap_or(false) =>
            {
                sig
            }
            _ => self.find_node(old_key)?,
        };

        let leaf_bounds = match self.nodes.get(&leaf_sig) {
            Some(node) if node.is_leaf() => node.bounds(),
            _ => {
                return Err(Error::not_found(format!(
                    "move_key: no entry at ({}, {})",
                    old_key.x, old_key.y
                )))
            }
        };

        let value = {
            let node = self.nodes.get_mut(&leaf_sig).expect("checked above");
            let Contents::Leaf(entries) = &mut node.contents else {
                unreachable!("checked is_leaf above")
            };
            entries.remove(&OrderedPoint(old_key)).ok_or_else(|| {
                Error::not_found(format!(
                    "move_key: no entry at ({}, {})",
                    old_key.x, old_key.y
                ))
            })?
        };

        if leaf_bounds.contains_open(new_key) {
            let node = self.nodes.get_mut(&leaf_sig).expect("checked above");
            let Contents::Leaf(entries) = &mut node.contents else {
                unreachable!("checked is_leaf above")
            };
            entries.insert(OrderedPoint(new_key), value);
            return Ok(Some(leaf_sig));
        }

        self.size -= 1;
        self.probe_cache.invalidate();
        if self.nodes[&leaf_sig].is_empty() && leaf_sig != Signature::root() {
            self.collapse_up(leaf_sig);
        }
        self.put(new_key, value)?;
        Ok(self.find_node(new_key).ok())
    }

    /// All entries whose key falls within `range`, scanning only the leaves
    /// whose bounds overlap it.
    pub fn find_range<'a>(&'a self, range: Rect) -> Vec<(Point, &'a V)> {
        let mut out = Vec::new();
        self.collect_range(Signature::root(), range, &mut out);
        out
    }

    /// All entries within `radius` of `center`: prunes via the circle's
    /// bounding box, then filters by squared distance.
    pub fn find_range_radius<'a>(&'a self, center: Point, radius: f64) -> Result<Vec<(Point, &'a V)>> {
        if radius < 0.0 {
            return Err(Error::invalid_argument("radius must be non-negative"));
        }
        let Some(bbox) = Rect::circumscribing(center, radius) else {
            return Ok(Vec::new());
        };
        let r2 = radius * radius;
        Ok(self
            .find_range(bbox)
            .into_iter()
            .filter(|(p, _)| p.squared_distance(center) <= r2)
            .collect())
    }

    fn collect_range<'a>(&'a self, sig: Signature, range: Rect, out: &mut Vec<(Point, &'a V)>) {
        let Some(node) = self.nodes.get(&sig) else {
            return;
        };
        if !node.bounds().intersects_with(&range) {
            return;
        }
        match &node.contents {
            Contents::Leaf(_) => {
                for (p, v) in node.entries() {
                    if range.contains(p) {
                        out.push((p, v));
                    }
                }
            }
            Contents::Interior(children) => {
                for c in children.iter().flatten() {
                    self.collect_range(*c, range, out);
                }
            }
        }
    }
}

/// `(dx, dy)` in `{0, 1}^2`: the sign of `key` relative to `bounds`'
/// center, negative mapping to 0 ("-", the min side).
fn quadrant_of(bounds: Rect, key: Point) -> (u32, u32) {
    quadrant_of_center(bounds.center(), key)
}

fn quadrant_of_center(center: Point, key: Point) -> (u32, u32) {
    let dx = if key.x >= center.x { 1 } else { 0 };
    let dy = if key.y >= center.y { 1 } else { 0 };
    (dx, dy)
}

fn quadrant_index(dx: u32, dy: u32) -> usize {
    (dx + 2 * dy) as usize
}

fn child_bounds(bounds: Rect, center: Point, dx: u32, dy: u32) -> Result<Rect> {
    let (min_x, max_x) = if dx == 0 {
        (bounds.min().x, center.x)
    } else {
        (center.x, bounds.max().x)
    };
    let (min_y, max_y) = if dy == 0 {
        (bounds.min().y, center.y)
    } else {
        (center.y, bounds.max().y)
    };
    Rect::new(Point::new(min_x, min_y), Point::new(max_x, max_y))
        .ok_or_else(|| Error::invalid_state("quadtree split produced a degenerate child bound"))
}

#[cfg(test)]
mod tests;
