//! Weave level assignment.
//!
//! Walks the edges once in index order, carrying a running level that
//! starts at [`WeaveLevel::Lower`] and flips at every edge that takes
//! part in a crossing. This is a deterministic heuristic, not a global
//! two-colouring: an edge's level depends only on crossings at or before
//! it in index order.

use serde::{Deserialize, Serialize};

use crate::crossing::CrossingSet;

/// One of the two draw passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WeaveLevel {
    /// Level 0.
    #[default]
    Lower,
    /// Level 1.
    Upper,
}

impl WeaveLevel {
    /// Both levels in index order.
    pub const ALL: [Self; 2] = [Self::Lower, Self::Upper];

    /// The other level.
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Lower => Self::Upper,
            Self::Upper => Self::Lower,
        }
    }

    /// Numeric form: 0 for [`Lower`](Self::Lower), 1 for [`Upper`](Self::Upper).
    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            Self::Lower => 0,
            Self::Upper => 1,
        }
    }
}

/// How an edge that appears several times in the crossing set affects
/// the running level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FlipRule {
    /// Flip once for every edge that crosses anything, no matter how many
    /// partners it has.
    #[default]
    PerEdge,

    /// Flip once per occurrence of the edge in the crossing set. An edge
    /// crossed by two partners flips twice and ends on the level it
    /// started with.
    PerCrossing,
}

/// Assign a weave level to each of `edge_count` edges.
///
/// Crossing indices outside `0..edge_count` are ignored.
///
/// # Examples
///
/// ```
/// use knotwork_pipeline::crossing::{CrossingPair, CrossingSet};
/// use knotwork_pipeline::weave::{FlipRule, WeaveLevel, assign_levels};
///
/// let crossings = CrossingSet::from_pairs(vec![CrossingPair { first: 0, second: 2 }]);
/// let levels = assign_levels(4, &crossings, FlipRule::PerEdge);
/// assert_eq!(
///     levels,
///     vec![WeaveLevel::Upper, WeaveLevel::Upper, WeaveLevel::Lower, WeaveLevel::Lower],
/// );
/// ```
#[must_use]
pub fn assign_levels(
    edge_count: usize,
    crossings: &CrossingSet,
    rule: FlipRule,
) -> Vec<WeaveLevel> {
    let counts = crossings.counts(edge_count);
    let mut level = WeaveLevel::Lower;

    counts
        .into_iter()
        .map(|count| {
            let flips = match rule {
                FlipRule::PerEdge => usize::from(count > 0),
                FlipRule::PerCrossing => count,
            };
            if flips % 2 == 1 {
                level = level.flipped();
            }
            level
        })
        .collect()
}

/// Number of positions where the level differs from the one before it,
/// with level 0 as the implicit predecessor of the first edge.
#[must_use]
pub fn count_level_changes(levels: &[WeaveLevel]) -> usize {
    let mut previous = WeaveLevel::Lower;
    levels
        .iter()
        .filter(|&&level| {
            let changed = level != previous;
            previous = level;
            changed
        })
        .count()
}
