//! Adaptive-precision orientation predicate.
//!
//! Grounded on `geo::algorithm::kernels::robust`: rather than computing the
//! 2x2 determinant directly in `f64` (which can flip sign near-collinear
//! inputs to floating-point error), we delegate to the `robust` crate's
//! adaptive-precision `orient2d`. This is this crate's "documented stability
//! strategy" referenced in spec §1 in lieu of arbitrary-precision
//! arithmetic.

use super::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    CounterClockwise,
    Clockwise,
    Collinear,
}

/// Orientation of `r` relative to the directed line through `p`, `q`.
pub fn orient2d(p: Point, q: Point, r: Point) -> Orientation {
    let sign = robust::orient2d(
        robust::Coord { x: p.x, y: p.y },
        robust::Coord { x: q.x, y: q.y },
        robust::Coord { x: r.x, y: r.y },
    );
    if sign > 0.0 {
        Orientation::CounterClockwise
    } else if sign < 0.0 {
        Orientation::Clockwise
    } else {
        Orientation::Collinear
    }
}
