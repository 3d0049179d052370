//! The Bentley–Ottmann sweep (spec §4.2).

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::geometry::{compare_y, intersect, Location, Point, Segment, SweepKey};

use super::active::{Active, ActiveSet};
use super::segment::SweepSegment;
use crate::intersection::event::EventPoint;

pub struct Sweep {
    reoriented: Vec<Segment>,
    /// `flipped[i]` is true when the original caller's segment `i` had
    /// `start` lexicographically after `end`, so this sweep reversed it for
    /// event generation; output normalization undoes the relabeling.
    flipped: Vec<bool>,
    slopes: Rc<[f64]>,
    positions: Rc<RefCell<Vec<f64>>>,
    schedule: BTreeMap<SweepKey, EventPoint>,
    active: BTreeSet<Active<SweepSegment>>,
    output: Vec<EventPoint>,
}

impl Sweep {
    pub fn run(segments: &[Segment]) -> Result<Vec<EventPoint>> {
        let mut sweep = Sweep::new(segments)?;
        sweep.main_loop()?;
        Ok(sweep.output)
    }

    fn new(segments: &[Segment]) -> Result<Self> {
        let n = segments.len();
        let mut reoriented = Vec::with_capacity(n);
        let mut flipped = Vec::with_capacity(n);
        let mut slopes = Vec::with_capacity(n);

        for (i, seg) in segments.iter().enumerate() {
            if seg.is_degenerate() {
                return Err(Error::invalid_argument(format!(
                    "segment {i} has coincident start and end"
                )));
            }
            let flip = compare_y(&seg.start, &seg.end) == std::cmp::Ordering::Greater;
            let oriented = if flip { seg.reverse() } else { *seg };
            slopes.push(oriented.inverse_slope());
            flipped.push(flip);
            reoriented.push(oriented);
        }

        let mut schedule: BTreeMap<SweepKey, EventPoint> = BTreeMap::new();
        for (i, seg) in reoriented.iter().enumerate() {
            schedule
                .entry(SweepKey(seg.start))
                .or_insert_with(|| EventPoint::new(seg.start))
                .add(i, Location::Start);
            schedule
                .entry(SweepKey(seg.end))
                .or_insert_with(|| EventPoint::new(seg.end))
                .add(i, Location::End);
        }

        Ok(Sweep {
            reoriented,
            flipped,
            slopes: slopes.into(),
            positions: Rc::new(RefCell::new(vec![0.0; n])),
            schedule,
            active: BTreeSet::new(),
            output: Vec::new(),
        })
    }

    fn seg(&self, index: usize) -> SweepSegment {
        SweepSegment::new(index, self.slopes.clone(), self.positions.clone())
    }

    fn main_loop(&mut self) -> Result<()> {
        while let Some((_, event)) = self.schedule.pop_first() {
            self.handle_event(event)?;
        }
        if !self.active.is_empty() {
            return Err(Error::invalid_state(
                "sweep line non-empty after the event schedule drained",
            ));
        }
        Ok(())
    }

    fn handle_event(&mut self, mut event: EventPoint) -> Result<()> {
        let cursor = event.point;
        let mut adding = false;
        let mut ending = Vec::new();
        let mut group = Vec::new();

        for (index, loc) in event.iter() {
            match loc {
                Location::Start => {
                    adding = true;
                    group.push(index);
                }
                Location::Between => {
                    adding = true;
                    group.push(index);
                    ending.push(index);
                }
                Location::End => ending.push(index),
                Location::Before | Location::After | Location::Left | Location::Right => {}
            }
        }

        let ending_segs: Vec<SweepSegment> = ending.iter().map(|&i| self.seg(i)).collect();
        for seg in &ending_segs {
            if !self.active.remove_active(seg) {
                return Err(Error::invalid_state(format!(
                    "sweep line did not contain segment {} at its removal event",
                    seg.index
                )));
            }
        }

        if !adding {
            self.handle_end_only(cursor, &ending_segs, &mut event)?;
            if event.len() >= 2 {
                let mut slopes = event.indices.iter().map(|&i| self.slopes[i]);
                let first = slopes.next().expect("len >= 2");
                if slopes.any(|s| s != first) {
                    self.output.push(self.normalize(event));
                }
            }
            return Ok(());
        }

        self.reinsert_remaining(cursor);

        for &i in &group {
            self.positions.borrow_mut()[i] = cursor.x;
            self.active.insert_active(self.seg(i));
        }

        let mut group_segs: Vec<SweepSegment> = group.iter().map(|&i| self.seg(i)).collect();
        group_segs.sort_by(|a, b| a.partial_cmp(b).expect("active segments are comparable"));
        let lowest = group_segs.first().expect("adding implies non-empty group").clone();
        let highest = group_segs.last().expect("adding implies non-empty group").clone();

        let prev = self.active.previous(&lowest);
        let next = self.active.next(&highest);
        if let Some(p) = prev {
            self.add_crossing(p.index, lowest.index, cursor, &mut event)?;
        }
        if let Some(n) = next {
            self.add_crossing(highest.index, n.index, cursor, &mut event)?;
        }

        if event.len() >= 2 {
            self.output.push(self.normalize(event));
        }
        Ok(())
    }

    /// End-only event: the removed segments' former neighbors may now be
    /// adjacent in the sweep line.
    fn handle_end_only(
        &mut self,
        cursor: Point,
        ending_segs: &[SweepSegment],
        event: &mut EventPoint,
    ) -> Result<()> {
        if ending_segs.is_empty() {
            return Ok(());
        }
        let mut sorted = ending_segs.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).expect("active segments are comparable"));
        let lowest = sorted.first().unwrap();
        let highest = sorted.last().unwrap();
        let prev = self.active.previous(lowest);
        let next = self.active.next(highest);
        if let (Some(p), Some(n)) = (prev, next) {
            self.add_crossing(p.index, n.index, cursor, event)?;
        }
        Ok(())
    }

    /// Recomputes `positions[i] = slope[i] * (cursor.y - start[i].y) +
    /// start[i].x` for every segment still active after this event's
    /// removals, then reinserts them (a segment's `Ord` key may not change
    /// while it is a live `BTreeSet` member).
    fn reinsert_remaining(&mut self, cursor: Point) {
        let remaining: Vec<usize> = self.active.iter().map(|a| a.0.index).collect();
        self.active.clear();
        for &i in &remaining {
            let slope = self.slopes[i];
            if slope.is_finite() {
                let start = self.reoriented[i].start;
                self.positions.borrow_mut()[i] = slope * (cursor.y - start.y) + start.x;
            }
            self.active.insert_active(self.seg(i));
        }
    }

    /// spec §4.2 `addCrossing`: only acts when the two lines meet with one
    /// location `Between` and the other in `{Start, Between, End}`.
    fn add_crossing(
        &mut self,
        a: usize,
        b: usize,
        cursor: Point,
        event: &mut EventPoint,
    ) -> Result<()> {
        let Some(hit) = intersect(&self.reoriented[a], &self.reoriented[b]) else {
            return Ok(());
        };
        let relevant = (hit.first == Location::Between && hit.second.is_split_input())
            || (hit.second == Location::Between && hit.first.is_split_input());
        if !relevant {
            return Ok(());
        }

        trace!("crossing candidate: segments {a}, {b} @ {:?}", hit.point);

        match compare_y(&hit.point, &cursor) {
            std::cmp::Ordering::Less => {}
            std::cmp::Ordering::Equal => {
                event.add(a, hit.first);
                event.add(b, hit.second);
            }
            std::cmp::Ordering::Greater => {
                let key = SweepKey(hit.point);
                let scheduled = self
                    .schedule
                    .entry(key)
                    .or_insert_with(|| EventPoint::new(hit.point));
                scheduled.add(a, hit.first);
                scheduled.add(b, hit.second);
            }
        }
        Ok(())
    }

    /// Restores each `(index, location)` pair's `Start`/`End` tag to match
    /// the caller's original segment orientation (spec §4.2
    /// "Normalization").
    fn normalize(&self, mut event: EventPoint) -> EventPoint {
        for (idx, loc) in event.indices.iter().zip(event.locations.iter_mut()) {
            if self.flipped[*idx] {
                *loc = match *loc {
                    Location::Start => Location::End,
                    Location::End => Location::Start,
                    other => other,
                };
            }
        }
        event
    }
}
