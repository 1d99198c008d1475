//! knotwork-export: Pure SVG serializer for knot drawings (sans-IO)
//!
//! Provides [`SvgSurface`], a drawing surface that renders the knot into
//! an SVG document string.

pub mod svg;

pub use svg::{
    SvgMetadata, SvgSurface, closed_spline_path_data, curve_path_data, stroke_style, to_svg,
};
