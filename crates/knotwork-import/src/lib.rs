//! knotwork-import: extract a knot polygon from an SVG document.
//!
//! The input is SVG text; the output is the vertex list of the first
//! path together with the document's viewport. This crate does no I/O:
//! callers read the file and hand over its contents.

mod document;
mod error;
mod path_data;

pub use document::{SvgAttributes, SvgDocument, read_document, viewport_from_attributes};
pub use error::ImportError;
pub use path_data::parse_path_data;

use knotwork_pipeline::{Point, Viewport};

/// A polygon pulled out of an SVG document.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedPath {
    /// Vertices of the first subpath of the first `<path>`, absolute.
    pub vertices: Vec<Point>,
    /// Canvas region of the source document.
    pub viewport: Viewport,
}

/// Extract the first path's vertices and the viewport from SVG text.
///
/// The vertex list is not validated here; an empty or too-short list
/// is rejected later by the pipeline.
///
/// # Errors
///
/// Returns any [`ImportError`] from reading the document or parsing its
/// path data.
///
/// # Examples
///
/// ```
/// use knotwork_import::extract;
///
/// let svg = r#"<svg viewBox="0 0 10 10"><path d="M0 0 L10 10 L10 0 L0 10 Z"/></svg>"#;
/// let extracted = extract(svg)?;
/// assert_eq!(extracted.vertices.len(), 4);
/// assert!((extracted.viewport.width - 10.0).abs() < f64::EPSILON);
/// # Ok::<(), knotwork_import::ImportError>(())
/// ```
pub fn extract(svg_text: &str) -> Result<ExtractedPath, ImportError> {
    let document = read_document(svg_text)?;
    let vertices = parse_path_data(&document.path_data)?;
    log::debug!("extracted {} vertices", vertices.len());

    Ok(ExtractedPath {
        vertices,
        viewport: document.viewport,
    })
}
