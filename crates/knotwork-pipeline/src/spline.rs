//! Closed Catmull-Rom spline to cubic Bezier conversion.
//!
//! A uniform Catmull-Rom spline (alpha = 0) through vertices
//! `P0, P1, P2, P3` has, on the piece from `P1` to `P2`, the Bezier
//! control points
//!
//! ```text
//! C1 = P1 + (P2 - P0) / 6
//! C2 = P2 - (P3 - P1) / 6
//! ```
//!
//! Indexing wraps around the vertex sequence, so the curve passes through
//! every vertex and is C¹-continuous across the seam as well.

use serde::{Deserialize, Serialize};

use crate::types::{Point, Polygon};

/// One cubic Bezier piece: anchor, two controls, anchor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CubicSegment(pub [Point; 4]);

impl CubicSegment {
    /// The four nodes in drawing order.
    #[must_use]
    pub const fn points(&self) -> &[Point; 4] {
        &self.0
    }

    /// Start anchor.
    #[must_use]
    pub const fn start(&self) -> Point {
        self.0[0]
    }

    /// End anchor.
    #[must_use]
    pub const fn end(&self) -> Point {
        self.0[3]
    }

    /// Evaluate the curve at parameter `t` in `[0, 1]`.
    #[must_use]
    pub fn eval(&self, t: f64) -> Point {
        let [p0, p1, p2, p3] = self.0;
        let mt = 1.0 - t;
        let b0 = mt * mt * mt;
        let b1 = 3.0 * mt * mt * t;
        let b2 = 3.0 * mt * t * t;
        let b3 = t * t * t;
        p0 * b0 + p1 * b1 + p2 * b2 + p3 * b3
    }
}

/// The Bezier node sequence of a closed spline.
///
/// Holds `3n + 1` points for `n` vertices:
/// `[P0, C1_0, C2_0, P1, C1_1, C2_1, P2, ..., Pn]` where the final anchor
/// repeats `P0`. Piece `i` is the window of four nodes starting at `3i`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BezierNodes(Vec<Point>);

impl BezierNodes {
    /// All nodes.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.0
    }

    /// Total node count (`3n + 1`).
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no nodes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of cubic pieces (`n`).
    #[must_use]
    pub const fn segment_count(&self) -> usize {
        self.0.len().saturating_sub(1) / 3
    }

    /// Cubic piece `index`, from vertex `index` to vertex `index + 1`.
    #[must_use]
    pub fn segment(&self, index: usize) -> Option<CubicSegment> {
        let start = index.checked_mul(3)?;
        let nodes = self.0.get(start..start + 4)?;
        Some(CubicSegment([nodes[0], nodes[1], nodes[2], nodes[3]]))
    }

    /// Iterate over the cubic pieces in vertex order.
    pub fn segments(&self) -> impl Iterator<Item = CubicSegment> + '_ {
        self.0
            .windows(4)
            .step_by(3)
            .map(|w| CubicSegment([w[0], w[1], w[2], w[3]]))
    }

    /// Consumes the sequence and returns the underlying points.
    #[must_use]
    pub fn into_points(self) -> Vec<Point> {
        self.0
    }
}

/// Convert a closed polygon into the Bezier nodes of the Catmull-Rom
/// spline through its vertices.
///
/// # Examples
///
/// ```
/// use knotwork_pipeline::{Point, Polygon};
/// use knotwork_pipeline::spline::catmull_rom_to_bezier;
///
/// let polygon = Polygon::new(vec![
///     Point::new(0.0, 0.0),
///     Point::new(6.0, 0.0),
///     Point::new(6.0, 6.0),
///     Point::new(0.0, 6.0),
/// ])?;
/// let nodes = catmull_rom_to_bezier(&polygon);
/// assert_eq!(nodes.len(), 13);
/// assert_eq!(nodes.points()[1], Point::new(1.0, -1.0));
/// # Ok::<(), knotwork_pipeline::KnotError>(())
/// ```
#[must_use]
pub fn catmull_rom_to_bezier(polygon: &Polygon) -> BezierNodes {
    let vertices = polygon.vertices();
    let mut nodes = Vec::with_capacity(3 * vertices.len() + 1);

    if let Some(&first) = vertices.first() {
        nodes.push(first);
    }

    for i in 0..vertices.len() {
        #[allow(clippy::cast_possible_wrap)]
        let i = i as isize;
        let p0 = polygon.vertex_cyclic(i - 1);
        let p1 = polygon.vertex_cyclic(i);
        let p2 = polygon.vertex_cyclic(i + 1);
        let p3 = polygon.vertex_cyclic(i + 2);

        nodes.push(p1 + (p2 - p0) / 6.0);
        nodes.push(p2 - (p3 - p1) / 6.0);
        nodes.push(p2);
    }

    BezierNodes(nodes)
}
