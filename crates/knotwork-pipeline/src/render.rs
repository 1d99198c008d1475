//! Rendering a woven knot onto a drawing surface.
//!
//! The renderer knows nothing about output formats. It drives a
//! [`DrawingSurface`], which the document writer implements (see the
//! `knotwork-export` crate for SVG). [`DrawList`] is a surface that just
//! records what it is asked to draw.
//!
//! In woven mode every spline piece is stroked twice with the same
//! geometry: a wide background stroke and a narrow foreground stroke on
//! top. Pieces are grouped by weave level and the groups are emitted one
//! after another, so the background stroke of a later level cuts a gap
//! into any earlier-level strand it passes over.

use serde::{Deserialize, Serialize};

use crate::spline::{BezierNodes, CubicSegment};
use crate::types::{DrawOrder, KnotConfig, Point, StrokeStyle, Viewport};
use crate::weave::WeaveLevel;

/// Output coordinates are rounded to this many decimal digits.
pub const COORDINATE_DECIMALS: i32 = 2;

/// Round a coordinate to [`COORDINATE_DECIMALS`] fractional digits.
///
/// Idempotent: rounding an already-rounded value changes nothing.
///
/// ```
/// use knotwork_pipeline::render::round2;
///
/// assert_eq!(round2(1.23456), 1.23);
/// assert_eq!(round2(round2(7.005)), round2(7.005));
/// ```
#[must_use]
pub fn round2(value: f64) -> f64 {
    let scale = 10_f64.powi(COORDINATE_DECIMALS);
    (value * scale).round() / scale
}

/// Round both coordinates of a point.
#[must_use]
pub fn round_point(p: Point) -> Point {
    Point::new(round2(p.x), round2(p.y))
}

/// A 2D vector drawing target.
///
/// Calls arrive in this order: one [`set_viewport`](Self::set_viewport),
/// then either a single [`add_closed_spline`](Self::add_closed_spline) or
/// a sequence of groups, each opened by
/// [`begin_group`](Self::begin_group), filled with
/// [`add_stroked_curve`](Self::add_stroked_curve) calls, and closed by
/// [`end_group`](Self::end_group). Groups never nest. Later calls paint
/// over earlier ones. All coordinates are already rounded.
pub trait DrawingSurface {
    /// Set the visible region of the canvas.
    fn set_viewport(&mut self, viewport: Viewport);

    /// Open a group for curves of one weave level.
    fn begin_group(&mut self, level: WeaveLevel);

    /// Close the group opened by the last [`begin_group`](Self::begin_group).
    fn end_group(&mut self);

    /// Stroke one cubic Bezier piece (start, control, control, end).
    fn add_stroked_curve(&mut self, curve: &[Point; 4], stroke: &StrokeStyle);

    /// Stroke one closed curve through a full Bezier node sequence
    /// `[anchor, control, control, anchor, ...]`.
    fn add_closed_spline(&mut self, nodes: &[Point], stroke: &StrokeStyle);
}

/// A recorded drawing command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Primitive {
    /// One stroked cubic piece inside a level group.
    Curve {
        /// Group the curve was drawn in.
        level: WeaveLevel,
        /// Start, two controls, end.
        points: [Point; 4],
        /// Stroke appearance.
        stroke: StrokeStyle,
    },
    /// The whole knot as one closed stroke.
    ClosedSpline {
        /// Full Bezier node sequence.
        nodes: Vec<Point>,
        /// Stroke appearance.
        stroke: StrokeStyle,
    },
}

/// A [`DrawingSurface`] that records primitives in draw order.
///
/// Hand its [`primitives`](Self::primitives) and
/// [`viewport`](Self::viewport) to any document writer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrawList {
    viewport: Option<Viewport>,
    current_level: Option<WeaveLevel>,
    primitives: Vec<Primitive>,
}

impl DrawList {
    /// Create an empty draw list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The viewport, once set.
    #[must_use]
    pub const fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    /// Recorded primitives in draw order.
    #[must_use]
    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    /// Consumes the list and returns the recorded primitives.
    #[must_use]
    pub fn into_primitives(self) -> Vec<Primitive> {
        self.primitives
    }
}

impl DrawingSurface for DrawList {
    fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = Some(viewport);
    }

    fn begin_group(&mut self, level: WeaveLevel) {
        self.current_level = Some(level);
    }

    fn end_group(&mut self) {
        self.current_level = None;
    }

    fn add_stroked_curve(&mut self, curve: &[Point; 4], stroke: &StrokeStyle) {
        self.primitives.push(Primitive::Curve {
            level: self.current_level.unwrap_or_default(),
            points: *curve,
            stroke: stroke.clone(),
        });
    }

    fn add_closed_spline(&mut self, nodes: &[Point], stroke: &StrokeStyle) {
        self.primitives.push(Primitive::ClosedSpline {
            nodes: nodes.to_vec(),
            stroke: stroke.clone(),
        });
    }
}

/// Levels in the order they are drawn.
#[must_use]
pub const fn level_order(order: DrawOrder) -> [WeaveLevel; 2] {
    match order {
        DrawOrder::LowerFirst => [WeaveLevel::Lower, WeaveLevel::Upper],
        DrawOrder::UpperFirst => [WeaveLevel::Upper, WeaveLevel::Lower],
    }
}

/// Render the spline onto `surface` in the mode chosen by `config`.
///
/// `levels[i]` is the weave level of piece `i`. Pieces without a level
/// are drawn on [`WeaveLevel::Lower`]. Returns the number of primitives
/// emitted.
pub fn render<S: DrawingSurface + ?Sized>(
    surface: &mut S,
    nodes: &BezierNodes,
    levels: &[WeaveLevel],
    viewport: Viewport,
    config: &KnotConfig,
) -> usize {
    surface.set_viewport(viewport);

    if !config.split_segments {
        let rounded: Vec<Point> = nodes.points().iter().copied().map(round_point).collect();
        surface.add_closed_spline(&rounded, &config.single_stroke);
        return 1;
    }

    let mut emitted = 0;
    for level in level_order(config.draw_order) {
        surface.begin_group(level);
        for (i, segment) in nodes.segments().enumerate() {
            let segment_level = levels.get(i).copied().unwrap_or_default();
            if segment_level != level {
                continue;
            }
            let curve = rounded_curve(&segment);
            surface.add_stroked_curve(&curve, &config.background_stroke);
            surface.add_stroked_curve(&curve, &config.foreground_stroke);
            emitted += 2;
        }
        surface.end_group();
    }
    emitted
}

fn rounded_curve(segment: &CubicSegment) -> [Point; 4] {
    segment.0.map(round_point)
}
