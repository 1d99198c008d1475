//! Segment crossing predicate.
//!
//! Two segments *properly cross* when they meet at a single point that is
//! interior to both. Shared endpoints, a vertex touching the other
//! segment, and collinear overlap are all classified as non-crossing:
//! every comparison below is strict, so any zero orientation rejects.
//!
//! The test never divides, so zero-length segments are safe and simply
//! report no crossing.

use serde::{Deserialize, Serialize};

use crate::types::Point;

/// A straight line segment between two points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// First endpoint.
    pub start: Point,
    /// Second endpoint.
    pub end: Point,
}

impl Segment {
    /// Create a new segment.
    #[must_use]
    pub const fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Returns `true` if the bounding boxes of `self` and `other` overlap
    /// with positive extent on both axes.
    ///
    /// Boxes that only touch along an edge or corner do not overlap.
    #[must_use]
    pub fn bounds_overlap(&self, other: &Self) -> bool {
        let (a, b) = (self.start, self.end);
        let (c, d) = (other.start, other.end);
        a.x.max(b.x) > c.x.min(d.x)
            && a.x.min(b.x) < c.x.max(d.x)
            && a.y.max(b.y) > c.y.min(d.y)
            && a.y.min(b.y) < c.y.max(d.y)
    }

    /// Returns `true` if the two segments properly cross.
    ///
    /// # Examples
    ///
    /// ```
    /// use knotwork_pipeline::{Point, Segment};
    ///
    /// let a = Segment::new(Point::new(0.0, 0.0), Point::new(10.0, 10.0));
    /// let b = Segment::new(Point::new(10.0, 0.0), Point::new(0.0, 10.0));
    /// assert!(a.crosses(&b));
    ///
    /// // Sharing an endpoint is not a crossing.
    /// let c = Segment::new(Point::new(10.0, 10.0), Point::new(20.0, 0.0));
    /// assert!(!a.crosses(&c));
    /// ```
    #[must_use]
    pub fn crosses(&self, other: &Self) -> bool {
        segments_cross(*self, *other)
    }
}

/// Signed area of the parallelogram spanned by `b - a` and `c - a`.
///
/// Positive when `a -> b -> c` turns counter-clockwise (in a y-up frame),
/// negative when clockwise, zero when the three points are collinear.
///
/// Plain products, not `mul_add`: a point on the line must give the same
/// zero the unfused formula gives.
#[must_use]
#[allow(clippy::suboptimal_flops)]
pub fn orientation(a: Point, b: Point, c: Point) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Returns `true` if segments `p` and `q` properly cross.
///
/// Cheap rejection on bounding boxes first, then the four-orientation
/// test: the endpoints of each segment must lie strictly on opposite
/// sides of the line through the other.
#[must_use]
pub fn segments_cross(p: Segment, q: Segment) -> bool {
    if !p.bounds_overlap(&q) {
        return false;
    }

    let (a, b) = (p.start, p.end);
    let (c, d) = (q.start, q.end);

    let a_side = orientation(a, c, d);
    let b_side = orientation(b, c, d);
    let c_side = orientation(c, a, b);
    let d_side = orientation(d, a, b);

    a_side * b_side < 0.0 && c_side * d_side < 0.0
}
