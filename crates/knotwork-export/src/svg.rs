//! SVG document writer.
//!
//! [`SvgSurface`] is a [`DrawingSurface`] that builds an SVG document with
//! the [`svg`] crate. Each weave level group becomes a `<g>` element with
//! a `level-N` class; each stroked curve becomes a `<path>` with an `M`
//! and a `C` command and an inline style.
//!
//! Path data is formatted from the `f64` coordinates the renderer hands
//! over, which are already rounded to two decimals. The `svg` crate's own
//! `Data` builder stores `f32` and would lose those decimals on large
//! canvases.
//!
//! Optional [`SvgMetadata`] embeds `<title>`, `<desc>` and XML comments
//! right after the opening `<svg>` tag.
//!
//! Nothing here does I/O: [`SvgSurface::finish`] returns a `String`.

use std::fmt::Write;

use svg::Document;
use svg::node::element::{Description, Group, Path, Title};
use svg::node::{Comment, Node, Text};

use knotwork_pipeline::{DrawingSurface, KnotConfig, Point, StrokeStyle, Viewport, WeaveLevel};

/// Metadata to embed in the SVG document.
///
/// All fields are optional. Text is XML-escaped by the `svg` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct SvgMetadata<'a> {
    /// Document title, emitted as `<title>`.
    ///
    /// Typically the input filename.
    pub title: Option<&'a str>,

    /// Document description, emitted as `<desc>`.
    pub description: Option<&'a str>,

    /// Lines emitted as `<!-- line -->` comments, in order.
    ///
    /// The CLI puts the diagnostic summary here in verbose mode.
    pub comments: &'a [String],
}

/// Drawn content, kept apart from the header until [`SvgSurface::finish`].
#[derive(Debug)]
enum BodyNode {
    Group(Group),
    Path(Path),
}

/// A [`DrawingSurface`] that writes an SVG document.
///
/// Header comments can still be added with
/// [`add_comment`](Self::add_comment) after drawing; they are placed
/// ahead of the drawn content when the document is finished.
#[derive(Debug)]
pub struct SvgSurface {
    document: Document,
    comments: Vec<String>,
    body: Vec<BodyNode>,
    group: Option<Group>,
}

impl SvgSurface {
    /// Start an empty document carrying `metadata`.
    #[must_use]
    pub fn new(metadata: &SvgMetadata<'_>) -> Self {
        let mut document = Document::new();

        if let Some(title) = metadata.title {
            document.append(Title::new(title));
        }
        if let Some(description) = metadata.description {
            document.append(Description::new().add(Text::new(description)));
        }

        Self {
            document,
            comments: metadata.comments.to_vec(),
            body: Vec::new(),
            group: None,
        }
    }

    /// Append a header comment line.
    pub fn add_comment(&mut self, line: impl Into<String>) {
        self.comments.push(line.into());
    }

    /// Close any open group and serialize the document.
    #[must_use]
    pub fn finish(mut self) -> String {
        self.end_group();

        let mut document = self.document;
        for line in self.comments {
            document.append(Comment::new(line));
        }
        for node in self.body {
            match node {
                BodyNode::Group(group) => document.append(group),
                BodyNode::Path(path) => document.append(path),
            }
        }

        // The svg crate omits the XML declaration, so we prepend it.
        format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{document}\n")
    }

    fn append_path(&mut self, path: Path) {
        match &mut self.group {
            Some(group) => group.append(path),
            None => self.body.push(BodyNode::Path(path)),
        }
    }
}

impl Default for SvgSurface {
    fn default() -> Self {
        Self::new(&SvgMetadata::default())
    }
}

impl DrawingSurface for SvgSurface {
    fn set_viewport(&mut self, viewport: Viewport) {
        self.document.assign(
            "viewBox",
            format!(
                "{} {} {} {}",
                viewport.min_x, viewport.min_y, viewport.width, viewport.height
            ),
        );
        self.document.assign("width", viewport.width.to_string());
        self.document.assign("height", viewport.height.to_string());
    }

    fn begin_group(&mut self, level: WeaveLevel) {
        self.end_group();
        self.group = Some(Group::new().set("class", format!("level-{}", level.index())));
    }

    fn end_group(&mut self) {
        if let Some(group) = self.group.take() {
            self.body.push(BodyNode::Group(group));
        }
    }

    fn add_stroked_curve(&mut self, curve: &[Point; 4], stroke: &StrokeStyle) {
        self.append_path(stroked_path(curve_path_data(curve), stroke));
    }

    fn add_closed_spline(&mut self, nodes: &[Point], stroke: &StrokeStyle) {
        if let Some(d) = closed_spline_path_data(nodes) {
            self.append_path(stroked_path(d, stroke));
        }
    }
}

/// Path data for one cubic piece: `M x,y C x,y x,y x,y`.
///
/// # Examples
///
/// ```
/// use knotwork_export::svg::curve_path_data;
/// use knotwork_pipeline::Point;
///
/// let d = curve_path_data(&[
///     Point::new(0.0, 0.0),
///     Point::new(1.0, -1.0),
///     Point::new(5.25, -1.0),
///     Point::new(6.0, 0.0),
/// ]);
/// assert_eq!(d, "M0,0 C1,-1 5.25,-1 6,0");
/// ```
#[must_use]
pub fn curve_path_data(curve: &[Point; 4]) -> String {
    let [start, c1, c2, end] = *curve;
    let mut d = String::new();
    let _ = write!(
        d,
        "M{},{} C{},{} {},{} {},{}",
        start.x, start.y, c1.x, c1.y, c2.x, c2.y, end.x, end.y
    );
    d
}

/// Path data for a closed spline through `[anchor, control, control,
/// anchor, ...]` nodes, ending in `z`. `None` for an empty node list.
#[must_use]
pub fn closed_spline_path_data(nodes: &[Point]) -> Option<String> {
    let (first, rest) = nodes.split_first()?;
    let mut d = format!("M{},{}", first.x, first.y);
    for piece in rest.chunks_exact(3) {
        let _ = write!(
            d,
            " C{},{} {},{} {},{}",
            piece[0].x, piece[0].y, piece[1].x, piece[1].y, piece[2].x, piece[2].y
        );
    }
    d.push_str(" z");
    Some(d)
}

/// Inline style for an unfilled stroke, e.g.
/// `fill:none;stroke:#000000;stroke-width:8px`.
#[must_use]
pub fn stroke_style(stroke: &StrokeStyle) -> String {
    format!(
        "fill:none;stroke:{};stroke-width:{}px",
        stroke.color, stroke.width
    )
}

fn stroked_path(d: String, stroke: &StrokeStyle) -> Path {
    Path::new().set("d", d).set("style", stroke_style(stroke))
}

/// Render a computed knot into an SVG document string.
///
/// # Examples
///
/// ```
/// use knotwork_export::{SvgMetadata, to_svg};
/// use knotwork_pipeline::{Knot, KnotConfig, Point, Viewport};
///
/// let config = KnotConfig::default();
/// let knot = Knot::from_vertices(
///     vec![
///         Point::new(0.0, 0.0),
///         Point::new(10.0, 10.0),
///         Point::new(10.0, 0.0),
///         Point::new(0.0, 10.0),
///     ],
///     &config,
/// )?;
/// let svg = to_svg(&knot, Viewport::from_size(10.0, 10.0), &config, &SvgMetadata::default());
/// assert!(svg.starts_with("<?xml"));
/// assert_eq!(svg.matches("<path").count(), 8);
/// # Ok::<(), knotwork_pipeline::KnotError>(())
/// ```
#[must_use]
pub fn to_svg(
    knot: &knotwork_pipeline::Knot,
    viewport: Viewport,
    config: &KnotConfig,
    metadata: &SvgMetadata<'_>,
) -> String {
    let mut surface = SvgSurface::new(metadata);
    knot.render(&mut surface, viewport, config);
    surface.finish()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn curve() -> [Point; 4] {
        [
            Point::new(0.0, 0.0),
            Point::new(1.0, -1.0),
            Point::new(5.0, -1.0),
            Point::new(6.0, 0.0),
        ]
    }

    #[test]
    fn empty_document_has_declaration() {
        let svg = SvgSurface::default().finish();
        assert!(svg.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<svg"));
        assert!(svg.trim_end().ends_with("</svg>") || svg.trim_end().ends_with("/>"));
    }

    #[test]
    fn viewport_sets_view_box() {
        let mut surface = SvgSurface::default();
        surface.set_viewport(Viewport::new(-5.0, 0.0, 100.0, 50.5));
        let svg = surface.finish();
        assert!(svg.contains(r#"viewBox="-5 0 100 50.5""#));
        assert!(svg.contains(r#"width="100""#));
        assert!(svg.contains(r#"height="50.5""#));
    }

    #[test]
    fn stroke_style_format() {
        assert_eq!(
            stroke_style(&StrokeStyle::new("#ffffff", 16.0)),
            "fill:none;stroke:#ffffff;stroke-width:16px"
        );
        assert_eq!(
            stroke_style(&StrokeStyle::new("red", 2.5)),
            "fill:none;stroke:red;stroke-width:2.5px"
        );
    }

    #[test]
    fn curves_go_into_level_groups_in_order() {
        let mut surface = SvgSurface::default();
        surface.begin_group(WeaveLevel::Lower);
        surface.add_stroked_curve(&curve(), &StrokeStyle::new("#ffffff", 16.0));
        surface.end_group();
        surface.begin_group(WeaveLevel::Upper);
        surface.add_stroked_curve(&curve(), &StrokeStyle::new("#000000", 8.0));
        surface.end_group();
        let svg = surface.finish();

        let lower = svg.find(r#"class="level-0""#).unwrap();
        let upper = svg.find(r#"class="level-1""#).unwrap();
        let white = svg.find("stroke:#ffffff").unwrap();
        let black = svg.find("stroke:#000000").unwrap();
        assert!(lower < white && white < upper && upper < black);
        assert_eq!(svg.matches("<g").count(), 2);
    }

    #[test]
    fn curve_path_data_is_move_then_cubic() {
        let mut surface = SvgSurface::default();
        surface.add_stroked_curve(&curve(), &StrokeStyle::new("#000000", 8.0));
        let svg = surface.finish();
        assert!(svg.contains(r#"d="M0,0 C1,-1 5,-1 6,0""#), "{svg}");
    }

    #[test]
    fn large_coordinates_keep_two_decimals() {
        let far = [
            Point::new(2_345_678.91, 16_777_217.5),
            Point::new(2_345_679.01, 16_777_217.25),
            Point::new(2_345_680.33, 16_777_218.75),
            Point::new(2_345_681.07, 16_777_219.5),
        ];
        let d = curve_path_data(&far);
        assert_eq!(
            d,
            concat!(
                "M2345678.91,16777217.5 C2345679.01,16777217.25 ",
                "2345680.33,16777218.75 2345681.07,16777219.5"
            )
        );

        let mut surface = SvgSurface::default();
        surface.add_stroked_curve(&far, &StrokeStyle::new("#000000", 8.0));
        assert!(surface.finish().contains(&d));
    }

    #[test]
    fn closed_spline_ends_with_close() {
        let nodes = [
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(2.0, 1.0),
            Point::new(3.0, 0.0),
            Point::new(2.0, -1.0),
            Point::new(1.0, -1.0),
            Point::new(0.0, 0.0),
        ];
        let mut surface = SvgSurface::default();
        surface.add_closed_spline(&nodes, &StrokeStyle::new("#000000", 4.0));
        let svg = surface.finish();
        assert_eq!(svg.matches("<path").count(), 1);
        assert!(
            svg.contains(r#"d="M0,0 C1,1 2,1 3,0 C2,-1 1,-1 0,0 z""#),
            "{svg}"
        );
    }

    #[test]
    fn empty_closed_spline_is_skipped() {
        let mut surface = SvgSurface::default();
        surface.add_closed_spline(&[], &StrokeStyle::new("#000000", 4.0));
        assert!(!surface.finish().contains("<path"));
    }

    #[test]
    fn open_group_is_closed_by_finish() {
        let mut surface = SvgSurface::default();
        surface.begin_group(WeaveLevel::Upper);
        surface.add_stroked_curve(&curve(), &StrokeStyle::new("#000000", 8.0));
        let svg = surface.finish();
        assert!(svg.contains(r#"class="level-1""#));
        assert!(svg.contains("</g>"));
    }

    #[test]
    fn comments_added_after_drawing_precede_content() {
        let mut surface = SvgSurface::default();
        surface.begin_group(WeaveLevel::Lower);
        surface.add_stroked_curve(&curve(), &StrokeStyle::new("#000000", 8.0));
        surface.end_group();
        surface.add_comment("2 segments exist.");
        let svg = surface.finish();

        let comment = svg.find("<!--").unwrap();
        let group = svg.find("<g").unwrap();
        assert!(comment < group, "{svg}");
        assert!(svg.contains("2 segments exist."));
    }

    #[test]
    fn metadata_is_embedded_and_escaped() {
        let comments = vec![
            "4 segments exist.".to_string(),
            "seg-level: 1,1,0,0".to_string(),
        ];
        let metadata = SvgMetadata {
            title: Some("bow tie"),
            description: Some("a <knot>"),
            comments: &comments,
        };
        let svg = SvgSurface::new(&metadata).finish();
        assert!(svg.contains("<title>bow tie</title>"), "{svg}");
        assert!(!svg.contains("<knot>"), "{svg}");
        assert_eq!(svg.matches("<!--").count(), 2);
        let first = svg.find("4 segments exist.").unwrap();
        let second = svg.find("seg-level: 1,1,0,0").unwrap();
        assert!(first < second);
    }
}
