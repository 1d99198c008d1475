//! Shared types for the knotwork weaving pipeline.

use std::ops::{Add, Div, Mul, Sub};

use serde::{Deserialize, Serialize};

use crate::geometry::Segment;
use crate::weave::FlipRule;

/// A 2D point in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to another point.
    ///
    /// Avoids the square root for comparison purposes.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.mul_add(dx, dy * dy)
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Returns `true` if both coordinates are finite.
    #[must_use]
    pub const fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f64> for Point {
    type Output = Self;

    fn div(self, rhs: f64) -> Self {
        Self::new(self.x / rhs, self.y / rhs)
    }
}

/// A closed polygon: an ordered vertex sequence whose last vertex
/// connects back to the first.
///
/// Edge `i` runs from vertex `i` to vertex `(i + 1) % len`, so a polygon
/// has exactly as many edges as vertices. Edges are computed on demand
/// and never stored.
///
/// Construction validates the invariants the rest of the pipeline relies
/// on: at least [`Polygon::MIN_VERTICES`] vertices, finite coordinates,
/// and no zero-length edge (including the closing edge).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Point>")]
pub struct Polygon(Vec<Point>);

impl Polygon {
    /// Smallest vertex count that encloses anything.
    pub const MIN_VERTICES: usize = 3;

    /// Create a polygon from its vertices in traversal order.
    ///
    /// # Errors
    ///
    /// Returns [`KnotError::TooFewVertices`] for fewer than three vertices,
    /// [`KnotError::NonFiniteCoordinate`] if any coordinate is NaN or
    /// infinite, and [`KnotError::DegenerateEdge`] if two consecutive
    /// vertices coincide.
    pub fn new(vertices: Vec<Point>) -> Result<Self, KnotError> {
        if vertices.len() < Self::MIN_VERTICES {
            return Err(KnotError::TooFewVertices {
                count: vertices.len(),
            });
        }

        if let Some(index) = vertices.iter().position(|p| !p.is_finite()) {
            return Err(KnotError::NonFiniteCoordinate { index });
        }

        let n = vertices.len();
        if let Some(index) = (0..n).find(|&i| vertices[i] == vertices[(i + 1) % n]) {
            return Err(KnotError::DegenerateEdge { index });
        }

        Ok(Self(vertices))
    }

    /// Number of vertices (and edges).
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`: a valid polygon has at least three vertices.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns a slice of all vertices.
    #[must_use]
    pub fn vertices(&self) -> &[Point] {
        &self.0
    }

    /// Vertex at `index`, wrapping around the closed sequence.
    ///
    /// Accepts any signed offset so callers can ask for `i - 1` without
    /// underflow gymnastics.
    #[must_use]
    pub fn vertex_cyclic(&self, index: isize) -> Point {
        #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
        let wrapped = index.rem_euclid(self.0.len() as isize) as usize;
        self.0[wrapped]
    }

    /// Edge `index`, from vertex `index` to the next vertex (wrapping).
    ///
    /// `index` is taken modulo the edge count.
    #[must_use]
    pub fn edge(&self, index: usize) -> Segment {
        let n = self.0.len();
        Segment::new(self.0[index % n], self.0[(index + 1) % n])
    }

    /// Iterate over all edges in index order.
    pub fn edges(&self) -> impl Iterator<Item = Segment> + '_ {
        (0..self.0.len()).map(|i| self.edge(i))
    }

    /// Consumes the polygon and returns the underlying vertices.
    #[must_use]
    pub fn into_vertices(self) -> Vec<Point> {
        self.0
    }
}

impl TryFrom<Vec<Point>> for Polygon {
    type Error = KnotError;

    fn try_from(vertices: Vec<Point>) -> Result<Self, Self::Error> {
        Self::new(vertices)
    }
}

/// The visible region of the output canvas, in the SVG `viewBox`
/// convention.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Left edge.
    pub min_x: f64,
    /// Top edge.
    pub min_y: f64,
    /// Width of the region.
    pub width: f64,
    /// Height of the region.
    pub height: f64,
}

impl Viewport {
    /// Create a viewport from its four bounds.
    #[must_use]
    pub const fn new(min_x: f64, min_y: f64, width: f64, height: f64) -> Self {
        Self {
            min_x,
            min_y,
            width,
            height,
        }
    }

    /// Create a viewport anchored at the origin.
    #[must_use]
    pub const fn from_size(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }
}

/// Stroke appearance for a drawn curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    /// CSS color, e.g. `#ffffff`.
    pub color: String,
    /// Stroke width in document units.
    pub width: f64,
}

impl StrokeStyle {
    /// Create a stroke style.
    #[must_use]
    pub fn new(color: impl Into<String>, width: f64) -> Self {
        Self {
            color: color.into(),
            width,
        }
    }
}

/// Which weave level is drawn first.
///
/// Later passes paint over earlier ones, so the level drawn last appears
/// on top at every crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DrawOrder {
    /// Level 0 first, level 1 on top.
    #[default]
    LowerFirst,
    /// Level 1 first, level 0 on top.
    UpperFirst,
}

/// Configuration for the weaving pipeline.
///
/// Replaces process-wide verbosity switches with an explicit value that
/// is threaded through [`crate::process`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KnotConfig {
    /// Log a diagnostic summary (vertex, segment, and crossing counts and
    /// the level array) at `info` level.
    pub verbose: bool,

    /// Log the raw intermediate structures (segments, crossing pairs,
    /// Bezier nodes) at `debug` level.
    pub debug: bool,

    /// `true` renders the woven two-pass drawing; `false` renders a
    /// single continuous stroke and ignores weave levels.
    pub split_segments: bool,

    /// Level drawn first in woven mode.
    pub draw_order: DrawOrder,

    /// How repeated crossing indices affect the running level.
    pub flip_rule: FlipRule,

    /// Wide stroke drawn under every woven segment to open a gap where
    /// it passes beneath another strand.
    pub background_stroke: StrokeStyle,

    /// Narrow stroke drawn over the background stroke.
    pub foreground_stroke: StrokeStyle,

    /// Stroke for the non-woven single-curve mode.
    pub single_stroke: StrokeStyle,
}

impl KnotConfig {
    /// Default background stroke color.
    pub const DEFAULT_BACKGROUND_COLOR: &str = "#ffffff";
    /// Default background stroke width.
    pub const DEFAULT_BACKGROUND_WIDTH: f64 = 16.0;
    /// Default foreground stroke color.
    pub const DEFAULT_FOREGROUND_COLOR: &str = "#000000";
    /// Default foreground stroke width.
    pub const DEFAULT_FOREGROUND_WIDTH: f64 = 8.0;
    /// Default single-curve stroke width.
    pub const DEFAULT_SINGLE_WIDTH: f64 = 4.0;

    /// Check the stroke settings.
    ///
    /// # Errors
    ///
    /// Returns [`KnotError::InvalidConfig`] if a stroke width is not a
    /// positive finite number or a stroke color is empty.
    pub fn validate(&self) -> Result<(), KnotError> {
        for (name, stroke) in [
            ("background_stroke", &self.background_stroke),
            ("foreground_stroke", &self.foreground_stroke),
            ("single_stroke", &self.single_stroke),
        ] {
            if !(stroke.width.is_finite() && stroke.width > 0.0) {
                return Err(KnotError::InvalidConfig(format!(
                    "{name}.width must be positive and finite, got {}",
                    stroke.width
                )));
            }
            if stroke.color.trim().is_empty() {
                return Err(KnotError::InvalidConfig(format!(
                    "{name}.color must not be empty"
                )));
            }
        }
        Ok(())
    }
}

impl Default for KnotConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            debug: false,
            split_segments: true,
            draw_order: DrawOrder::default(),
            flip_rule: FlipRule::default(),
            background_stroke: StrokeStyle::new(
                Self::DEFAULT_BACKGROUND_COLOR,
                Self::DEFAULT_BACKGROUND_WIDTH,
            ),
            foreground_stroke: StrokeStyle::new(
                Self::DEFAULT_FOREGROUND_COLOR,
                Self::DEFAULT_FOREGROUND_WIDTH,
            ),
            single_stroke: StrokeStyle::new(
                Self::DEFAULT_FOREGROUND_COLOR,
                Self::DEFAULT_SINGLE_WIDTH,
            ),
        }
    }
}

/// Errors that can occur while weaving a knot.
///
/// A failure is permanent for a given input: the pipeline is
/// deterministic, so retrying cannot succeed.
#[derive(Debug, Clone, PartialEq, thiserror::Error, Serialize, Deserialize)]
pub enum KnotError {
    /// The vertex sequence cannot form a closed polygon.
    #[error("a closed path needs at least 3 vertices, got {count}")]
    TooFewVertices {
        /// Number of vertices supplied.
        count: usize,
    },

    /// A vertex has a NaN or infinite coordinate.
    #[error("vertex {index} has a non-finite coordinate")]
    NonFiniteCoordinate {
        /// Index of the offending vertex.
        index: usize,
    },

    /// Two consecutive vertices coincide, giving a zero-length edge.
    #[error("edge {index} has zero length (duplicate consecutive vertices)")]
    DegenerateEdge {
        /// Index of the zero-length edge.
        index: usize,
    },

    /// Configuration is invalid.
    #[error("invalid knot configuration: {0}")]
    InvalidConfig(String),
}
