//! The two-line intersection primitive.
//!
//! This is one of the "ancillary geometric primitives" this toolkit treats
//! as a data contract rather than core engine logic (spec §1, §6): the
//! brute-force scanner and the sweep line both call [`intersect`] /
//! [`intersect_eps`] as a black box and only ever inspect the returned
//! [`Location`] tags through [`Location::contains`] or by testing for
//! `Between`; neither ever receives or reacts to `Before`/`After`/`Left`/
//! `Right` from this particular primitive. The full six-tag vocabulary
//! exists to describe the general family of point/segment relations the
//! data model admits, but this implementation only ever produces
//! `Start`/`Between`/`End` — see `DESIGN.md` for the rationale.

use super::{orient2d, Location, Orientation, Point, Segment};

/// The shared point of two lines, tagged with where it sits on each line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineIntersection {
    pub point: Point,
    pub first: Location,
    pub second: Location,
}

fn cross(o: Point, a: Point, b: Point) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

/// Classify a parameter `t` (0 at the segment's start, 1 at its end) into a
/// location tag, snapping to `Start`/`End` within `eps`.
fn classify(t: f64, eps: f64) -> Location {
    if t.abs() <= eps {
        Location::Start
    } else if (t - 1.0).abs() <= eps {
        Location::End
    } else if t > 0.0 && t < 1.0 {
        Location::Between
    } else if t < 0.0 {
        Location::Before
    } else {
        Location::After
    }
}

/// Intersect two segments exactly (no tolerance).
pub fn intersect(a: &Segment, b: &Segment) -> Option<LineIntersection> {
    intersect_impl(a, b, 0.0)
}

/// Intersect two segments, treating coordinates within `eps` of a boundary
/// (parallelism, or a segment endpoint) as exactly at that boundary.
pub fn intersect_eps(a: &Segment, b: &Segment, eps: f64) -> Option<LineIntersection> {
    intersect_impl(a, b, eps)
}

fn intersect_impl(a: &Segment, b: &Segment, eps: f64) -> Option<LineIntersection> {
    let r = Point::new(a.end.x - a.start.x, a.end.y - a.start.y);
    let s = Point::new(b.end.x - b.start.x, b.end.y - b.start.y);
    let rxs = r.x * s.y - r.y * s.x;

    if rxs.abs() > eps.max(f64::EPSILON) {
        // Not parallel: solve p + t*r == q + u*s for t, u.
        let qp = Point::new(b.start.x - a.start.x, b.start.y - a.start.y);
        let t = (qp.x * s.y - qp.y * s.x) / rxs;
        let u = (qp.x * r.y - qp.y * r.x) / rxs;
        let loc_a = classify(t, eps);
        let loc_b = classify(u, eps);
        if loc_a.is_split_input() && loc_b.is_split_input() {
            let point = Point::new(a.start.x + t * r.x, a.start.y + t * r.y);
            Some(LineIntersection {
                point,
                first: loc_a,
                second: loc_b,
            })
        } else {
            None
        }
    } else {
        // Parallel (within tolerance). Collinear only if b.start also lies
        // on the line through a.
        let o = orient2d(a.start, a.end, b.start);
        let collinear = match o {
            Orientation::Collinear => true,
            _ => eps > 0.0 && cross(a.start, a.end, b.start).abs() <= eps * r.squared_len().sqrt().max(1.0),
        };
        if !collinear {
            return None;
        }
        collinear_overlap(a, b, eps)
    }
}

impl Point {
    fn squared_len(self) -> f64 {
        self.x * self.x + self.y * self.y
    }
}

/// Two collinear segments: the overlap (if any) of their ranges, projected
/// onto `a`'s own parameterization. The boundary of an interval
/// intersection is always one of the four original endpoints, so the
/// returned point is always exactly one of `a.start`, `a.end`, `b.start`,
/// `b.end`.
fn collinear_overlap(a: &Segment, b: &Segment, eps: f64) -> Option<LineIntersection> {
    let r = Point::new(a.end.x - a.start.x, a.end.y - a.start.y);
    let len2 = r.x * r.x + r.y * r.y;
    if len2 == 0.0 {
        return None;
    }
    let param = |p: Point| -> f64 {
        ((p.x - a.start.x) * r.x + (p.y - a.start.y) * r.y) / len2
    };
    let t_a0 = param(b.start);
    let t_a1 = param(b.end);
    let (lo, hi) = if t_a0 <= t_a1 {
        (t_a0, t_a1)
    } else {
        (t_a1, t_a0)
    };
    let overlap_lo = lo.max(0.0);
    let overlap_hi = hi.min(1.0);
    if overlap_lo > overlap_hi + eps {
        return None;
    }

    let t = overlap_lo;
    let point = Point::new(a.start.x + t * r.x, a.start.y + t * r.y);
    let first = classify(t, eps);
    let second = if (t - t_a0).abs() <= eps.max(f64::EPSILON) {
        Location::Start
    } else if (t - t_a1).abs() <= eps.max(f64::EPSILON) {
        Location::End
    } else {
        Location::Between
    };
    Some(LineIntersection {
        point,
        first,
        second,
    })
}
