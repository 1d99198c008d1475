//! Self-intersection search over the edges of a closed polygon.
//!
//! Every pair of non-adjacent edges is tested with the crossing
//! predicate. Adjacent edges share a vertex and can never properly
//! cross, so they are skipped, including the pair `(0, n - 1)` that
//! meets at vertex 0 across the seam of the closed sequence.
//!
//! The search is O(n²), which is fine for hand-drawn paths with tens to
//! low hundreds of vertices.

use serde::{Deserialize, Serialize};

use crate::geometry::segments_cross;
use crate::types::Polygon;

/// Two edges found to cross, `first < second`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossingPair {
    /// Lower edge index.
    pub first: usize,
    /// Higher edge index.
    pub second: usize,
}

/// All crossings found in a polygon, in detection order.
///
/// The flat index view ([`CrossingSet::indices`]) lists both edges of
/// every pair, so an edge crossed by two different partners appears
/// twice. Multiplicity is kept on purpose; [`crate::weave::FlipRule`]
/// decides what it means for level assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossingSet {
    pairs: Vec<CrossingPair>,
}

impl CrossingSet {
    /// Create a crossing set from pairs in detection order.
    #[must_use]
    pub const fn from_pairs(pairs: Vec<CrossingPair>) -> Self {
        Self { pairs }
    }

    /// The crossing pairs in detection order.
    #[must_use]
    pub fn pairs(&self) -> &[CrossingPair] {
        &self.pairs
    }

    /// Number of crossing pairs.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns `true` if no crossings were found.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Flat edge indices, two per pair, in detection order.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.pairs.iter().flat_map(|p| [p.first, p.second])
    }

    /// How many times `edge` appears in the flat index list.
    #[must_use]
    pub fn multiplicity(&self, edge: usize) -> usize {
        self.indices().filter(|&i| i == edge).count()
    }

    /// Returns `true` if `edge` takes part in at least one crossing.
    #[must_use]
    pub fn contains(&self, edge: usize) -> bool {
        self.pairs
            .iter()
            .any(|p| p.first == edge || p.second == edge)
    }

    /// Per-edge crossing counts for a polygon with `edge_count` edges.
    ///
    /// Indices outside `0..edge_count` are ignored.
    #[must_use]
    pub fn counts(&self, edge_count: usize) -> Vec<usize> {
        let mut counts = vec![0; edge_count];
        for index in self.indices() {
            if let Some(count) = counts.get_mut(index) {
                *count += 1;
            }
        }
        counts
    }
}

/// Find every pair of non-adjacent polygon edges that properly cross.
///
/// Pairs are visited with the outer index ascending, then the inner
/// index ascending, so the result is deterministic.
///
/// # Examples
///
/// ```
/// use knotwork_pipeline::{Point, Polygon};
/// use knotwork_pipeline::crossing::find_crossings;
///
/// // A "bow tie": edges 0 and 2 are the crossing diagonals.
/// let polygon = Polygon::new(vec![
///     Point::new(0.0, 0.0),
///     Point::new(10.0, 10.0),
///     Point::new(10.0, 0.0),
///     Point::new(0.0, 10.0),
/// ])?;
/// let crossings = find_crossings(&polygon);
/// assert_eq!(crossings.indices().collect::<Vec<_>>(), vec![0, 2]);
/// # Ok::<(), knotwork_pipeline::KnotError>(())
/// ```
#[must_use]
pub fn find_crossings(polygon: &Polygon) -> CrossingSet {
    let n = polygon.len();
    let mut pairs = Vec::new();

    for i in 0..n.saturating_sub(2) {
        // Edge 0 and edge n-1 meet at vertex 0.
        let end = if i == 0 { n - 1 } else { n };
        let edge_i = polygon.edge(i);
        for j in (i + 2)..end {
            if segments_cross(edge_i, polygon.edge(j)) {
                pairs.push(CrossingPair {
                    first: i,
                    second: j,
                });
            }
        }
    }

    CrossingSet::from_pairs(pairs)
}
