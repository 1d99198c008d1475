//! knotwork-pipeline: Pure knot weaving pipeline (sans-IO).
//!
//! Turns a closed polygon into a woven "Celtic knot" drawing through:
//! crossing detection -> weave level assignment -> Catmull-Rom spline
//! conversion -> level-ordered two-pass rendering.
//!
//! This crate has **no I/O dependencies**: it takes vertices and a
//! viewport and drives a [`DrawingSurface`]. Reading SVG paths lives in
//! `knotwork-import`, writing SVG documents in `knotwork-export`.

pub mod crossing;
pub mod diagnostics;
pub mod geometry;
pub mod render;
pub mod spline;
pub mod types;
pub mod weave;

pub use crossing::{CrossingPair, CrossingSet};
pub use diagnostics::KnotDiagnostics;
pub use geometry::Segment;
pub use render::{DrawList, DrawingSurface, Primitive};
pub use spline::{BezierNodes, CubicSegment};
pub use types::{DrawOrder, KnotConfig, KnotError, Point, Polygon, StrokeStyle, Viewport};
pub use weave::{FlipRule, WeaveLevel};

/// A knot ready to render: the polygon plus everything derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct Knot {
    /// The validated input polygon.
    pub polygon: Polygon,
    /// Crossing edge pairs.
    pub crossings: CrossingSet,
    /// Weave level per edge, indexed like the edges.
    pub levels: Vec<WeaveLevel>,
    /// Rule the levels were assigned with.
    pub flip_rule: FlipRule,
    /// Bezier nodes of the closed spline through the vertices.
    pub nodes: BezierNodes,
}

impl Knot {
    /// Run the geometric stages on a vertex sequence.
    ///
    /// Validates the vertices, finds crossings, assigns weave levels and
    /// converts the polygon to Bezier nodes. With `config.verbose` a
    /// summary is logged at `info` level; with `config.debug` the raw
    /// intermediate structures are logged at `debug` level.
    ///
    /// # Errors
    ///
    /// Returns [`KnotError::InvalidConfig`] for invalid stroke settings
    /// and the [`Polygon::new`] errors for unusable vertices.
    pub fn from_vertices(vertices: Vec<Point>, config: &KnotConfig) -> Result<Self, KnotError> {
        config.validate()?;
        let polygon = Polygon::new(vertices)?;

        if config.debug {
            let segments: Vec<Segment> = polygon.edges().collect();
            log::debug!("segments: {segments:?}");
        }

        let crossings = crossing::find_crossings(&polygon);
        let levels = weave::assign_levels(polygon.len(), &crossings, config.flip_rule);
        let nodes = spline::catmull_rom_to_bezier(&polygon);

        if config.verbose {
            log::info!(
                "{} segments, {} crossing pairs",
                polygon.len(),
                crossings.len()
            );
            let levels_text: Vec<u8> = levels.iter().map(|l| l.index()).collect();
            log::info!("seg-level: {levels_text:?}");
        }
        if config.debug {
            log::debug!("crossings: {:?}", crossings.pairs());
            log::debug!("bezier nodes: {:?}", nodes.points());
        }

        Ok(Self {
            polygon,
            crossings,
            levels,
            flip_rule: config.flip_rule,
            nodes,
        })
    }

    /// Number of drawable curve pieces (equals the vertex count).
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.levels.len()
    }

    /// Each cubic piece with its weave level, in edge order.
    pub fn drawable_segments(&self) -> impl Iterator<Item = (CubicSegment, WeaveLevel)> + '_ {
        self.nodes.segments().zip(self.levels.iter().copied())
    }

    /// Draw the knot onto `surface`. Returns the primitive count.
    pub fn render<S: DrawingSurface + ?Sized>(
        &self,
        surface: &mut S,
        viewport: Viewport,
        config: &KnotConfig,
    ) -> usize {
        render::render(surface, &self.nodes, &self.levels, viewport, config)
    }
}

/// Run the full pipeline and draw the result onto `surface`.
///
/// # Pipeline steps
///
/// 1. Validate config and vertices
/// 2. Crossing detection over non-adjacent edge pairs
/// 3. Weave level assignment
/// 4. Catmull-Rom to Bezier conversion
/// 5. Rendering (woven or single stroke, per `config.split_segments`)
///
/// Nothing is drawn if validation fails.
///
/// # Errors
///
/// Returns [`KnotError::TooFewVertices`] for fewer than three vertices,
/// [`KnotError::NonFiniteCoordinate`] and [`KnotError::DegenerateEdge`]
/// for unusable vertices, and [`KnotError::InvalidConfig`] for invalid
/// stroke settings.
///
/// # Examples
///
/// ```
/// use knotwork_pipeline::{DrawList, KnotConfig, Point, Viewport, process};
///
/// let vertices = vec![
///     Point::new(0.0, 0.0),
///     Point::new(10.0, 10.0),
///     Point::new(10.0, 0.0),
///     Point::new(0.0, 10.0),
/// ];
/// let mut drawing = DrawList::new();
/// let diagnostics = process(
///     vertices,
///     Viewport::from_size(10.0, 10.0),
///     &KnotConfig::default(),
///     &mut drawing,
/// )?;
/// assert_eq!(diagnostics.levels, vec![1, 1, 0, 0]);
/// assert_eq!(drawing.primitives().len(), 8);
/// # Ok::<(), knotwork_pipeline::KnotError>(())
/// ```
pub fn process<S: DrawingSurface + ?Sized>(
    vertices: Vec<Point>,
    viewport: Viewport,
    config: &KnotConfig,
    surface: &mut S,
) -> Result<KnotDiagnostics, KnotError> {
    let knot = Knot::from_vertices(vertices, config)?;
    let primitive_count = knot.render(surface, viewport, config);
    Ok(KnotDiagnostics::collect(
        &knot,
        config.split_segments,
        primitive_count,
    ))
}
