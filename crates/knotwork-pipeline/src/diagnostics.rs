//! Pipeline diagnostics: counts and intermediate structures.
//!
//! Every call to [`process`](crate::process) returns a
//! [`KnotDiagnostics`] alongside the drawing. The CLI prints
//! [`KnotDiagnostics::report`] (or embeds its lines as document
//! comments) in verbose mode and serializes the whole struct with
//! `--json`.

use serde::{Deserialize, Serialize};

use crate::Knot;
use crate::crossing::CrossingPair;
use crate::weave::{FlipRule, WeaveLevel, count_level_changes};

/// Diagnostics collected from a single pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnotDiagnostics {
    /// Number of input vertices.
    pub vertex_count: usize,
    /// Number of polygon edges (equals `vertex_count`).
    pub segment_count: usize,
    /// Crossing pairs in detection order.
    pub crossings: Vec<CrossingPair>,
    /// Flat crossing edge indices, two per pair.
    pub crossing_indices: Vec<usize>,
    /// Flip rule used for level assignment.
    pub flip_rule: FlipRule,
    /// Per-edge weave level as 0/1.
    pub levels: Vec<u8>,
    /// Positions where the level differs from its predecessor.
    pub level_changes: usize,
    /// Bezier node count (`3n + 1`).
    pub node_count: usize,
    /// Whether the woven two-pass mode was rendered.
    pub split_segments: bool,
    /// Primitives handed to the drawing surface.
    pub primitive_count: usize,
}

impl KnotDiagnostics {
    /// Collect diagnostics for a computed knot.
    #[must_use]
    pub fn collect(knot: &Knot, split_segments: bool, primitive_count: usize) -> Self {
        Self {
            vertex_count: knot.polygon.len(),
            segment_count: knot.levels.len(),
            crossings: knot.crossings.pairs().to_vec(),
            crossing_indices: knot.crossings.indices().collect(),
            flip_rule: knot.flip_rule,
            levels: knot.levels.iter().map(|l| l.index()).collect(),
            level_changes: count_level_changes(&knot.levels),
            node_count: knot.nodes.len(),
            split_segments,
            primitive_count,
        }
    }

    /// Number of edges drawn on `level`.
    #[must_use]
    pub fn segments_on(&self, level: WeaveLevel) -> usize {
        self.levels.iter().filter(|&&l| l == level.index()).count()
    }

    /// Summary lines in the form the CLI embeds as document comments.
    #[must_use]
    pub fn summary_lines(&self) -> Vec<String> {
        vec![
            format!("{} segments exist.", self.segment_count),
            format!("crossing: {}", join_numbers(&self.crossing_indices)),
            format!("seg-level: {}", join_numbers(&self.levels)),
        ]
    }

    /// Format diagnostics as a human-readable report.
    #[must_use]
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Knot Diagnostics Report\n{}", "=".repeat(60)));
        lines.push(format!(
            "Vertices: {}  |  Segments: {}  |  Bezier nodes: {}",
            self.vertex_count, self.segment_count, self.node_count,
        ));
        lines.push(format!(
            "Crossings: {} pairs ({} edge hits, flip rule {:?})",
            self.crossings.len(),
            self.crossing_indices.len(),
            self.flip_rule,
        ));
        for pair in &self.crossings {
            lines.push(format!("  edge {:>4} x edge {:>4}", pair.first, pair.second));
        }
        lines.push(format!(
            "Levels: {} on 0, {} on 1, {} changes",
            self.segments_on(WeaveLevel::Lower),
            self.segments_on(WeaveLevel::Upper),
            self.level_changes,
        ));
        lines.push(format!(
            "Render: {} ({} primitives)",
            if self.split_segments {
                "woven"
            } else {
                "single stroke"
            },
            self.primitive_count,
        ));

        lines.join("\n")
    }
}

fn join_numbers<T: ToString>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}
