//! Core geometry engines for a planar computational-geometry toolkit.
//!
//! This crate has two independent leaf components:
//!
//! - [`intersection`]: find all pairwise intersections among a set of line
//!   segments (brute-force and sweep-line strategies), and split segments on
//!   those intersections.
//! - [`quadtree`]: a point-region quadtree mapping planar points to values,
//!   addressable in O(1) by a packed node signature and equipped with a
//!   depth-probe heuristic for sublogarithmic lookup.
//!
//! Both components operate on the primitive types in [`geometry`]. Neither
//! component depends on the other; callers compose them as needed.

#[macro_use]
extern crate log;

pub mod error;
pub mod geometry;
pub mod intersection;
pub mod quadtree;

pub use error::{Error, Result};
