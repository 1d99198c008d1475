//! Pull the viewport and the first path out of an SVG document.

use std::fmt::Display;

use knotwork_pipeline::Viewport;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::ImportError;

/// The parts of an SVG document the knot needs.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgDocument {
    /// Canvas region of the root `<svg>` element.
    pub viewport: Viewport,
    /// The `d` attribute of the first `<path>` element.
    pub path_data: String,
}

/// Scan `svg_text` for the first `<svg>` and the first `<path d="...">`.
///
/// Element names are matched without namespace prefix, so `svg:path`
/// counts as a path. Everything else in the document is skipped.
///
/// # Errors
///
/// Returns [`ImportError::Xml`] for malformed XML, [`ImportError::MissingSvg`]
/// and [`ImportError::MissingPath`] if either element is absent, and the
/// viewport errors from [`viewport_from_attributes`].
pub fn read_document(svg_text: &str) -> Result<SvgDocument, ImportError> {
    let mut reader = Reader::from_str(svg_text);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();

    let mut viewport: Option<Viewport> = None;
    let mut path_data: Option<String> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e) | Event::Empty(e)) => match e.local_name().as_ref() {
                b"svg" if viewport.is_none() => {
                    let attrs = SvgAttributes::read(&e)?;
                    viewport = Some(viewport_from_attributes(&attrs)?);
                }
                b"path" if path_data.is_none() => {
                    path_data = attribute(&e, b"d")?;
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(e)),
            _ => {}
        }
        buf.clear();

        if viewport.is_some() && path_data.is_some() {
            break;
        }
    }

    let viewport = viewport.ok_or(ImportError::MissingSvg)?;
    let path_data = path_data.ok_or(ImportError::MissingPath)?;
    log::debug!("svg viewport {viewport:?}, path data {} bytes", path_data.len());

    Ok(SvgDocument {
        viewport,
        path_data,
    })
}

/// Raw sizing attributes of an `<svg>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SvgAttributes {
    /// `viewBox`, if present.
    pub view_box: Option<String>,
    /// `width`, if present.
    pub width: Option<String>,
    /// `height`, if present.
    pub height: Option<String>,
}

impl SvgAttributes {
    fn read(element: &BytesStart<'_>) -> Result<Self, ImportError> {
        Ok(Self {
            view_box: attribute(element, b"viewBox")?,
            width: attribute(element, b"width")?,
            height: attribute(element, b"height")?,
        })
    }
}

/// Resolve the canvas region of an `<svg>` element.
///
/// `viewBox` wins when present. Otherwise `width` and `height` give a
/// viewport anchored at the origin; a `px` suffix is accepted, other
/// units are not.
///
/// # Errors
///
/// Returns [`ImportError::MissingViewport`] when neither form is present
/// and [`ImportError::InvalidViewport`] when the values do not parse or
/// the size is not positive.
pub fn viewport_from_attributes(attrs: &SvgAttributes) -> Result<Viewport, ImportError> {
    if let Some(view_box) = &attrs.view_box {
        let numbers: Vec<f64> = view_box
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|part| !part.is_empty())
            .map(str::parse)
            .collect::<Result<_, _>>()
            .map_err(|_| ImportError::InvalidViewport(view_box.clone()))?;
        let [min_x, min_y, width, height] = numbers[..] else {
            return Err(ImportError::InvalidViewport(view_box.clone()));
        };
        if !(min_x.is_finite() && min_y.is_finite()) || !is_positive_size(width, height) {
            return Err(ImportError::InvalidViewport(view_box.clone()));
        }
        return Ok(Viewport::new(min_x, min_y, width, height));
    }

    match (&attrs.width, &attrs.height) {
        (Some(width), Some(height)) => {
            let (w, h) = (parse_length(width)?, parse_length(height)?);
            if !is_positive_size(w, h) {
                return Err(ImportError::InvalidViewport(format!("{width} x {height}")));
            }
            Ok(Viewport::from_size(w, h))
        }
        _ => Err(ImportError::MissingViewport),
    }
}

fn is_positive_size(width: f64, height: f64) -> bool {
    width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0
}

fn parse_length(text: &str) -> Result<f64, ImportError> {
    let trimmed = text.trim();
    trimmed
        .strip_suffix("px")
        .unwrap_or(trimmed)
        .trim_end()
        .parse()
        .map_err(|_| ImportError::InvalidViewport(text.to_string()))
}

/// Unescaped value of the attribute with local name `key`.
fn attribute(element: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>, ImportError> {
    for attr in element.attributes() {
        let attr = attr.map_err(xml_error)?;
        if attr.key.local_name().as_ref() == key {
            let value = attr.unescape_value().map_err(xml_error)?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

fn xml_error(e: impl Display) -> ImportError {
    ImportError::Xml(e.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn attrs(view_box: Option<&str>, width: Option<&str>, height: Option<&str>) -> SvgAttributes {
        SvgAttributes {
            view_box: view_box.map(String::from),
            width: width.map(String::from),
            height: height.map(String::from),
        }
    }

    #[test]
    fn reads_view_box_and_first_path() {
        let svg = r#"<?xml version="1.0"?>
<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 200 100">
  <g>
    <path d="M 0,0 L 10,10 L 10,0 L 0,10 Z"/>
    <path d="M 5,5 L 6,6 L 7,5 Z"/>
  </g>
</svg>"#;
        let doc = read_document(svg).unwrap();
        assert_eq!(doc.viewport, Viewport::new(0.0, 0.0, 200.0, 100.0));
        assert_eq!(doc.path_data, "M 0,0 L 10,10 L 10,0 L 0,10 Z");
    }

    #[test]
    fn skips_paths_without_data() {
        let svg =
            r#"<svg width="10" height="10"><path id="empty"/><path d="M1 1 2 2 3 1z"/></svg>"#;
        assert_eq!(read_document(svg).unwrap().path_data, "M1 1 2 2 3 1z");
    }

    #[test]
    fn namespaced_elements_match() {
        let svg = concat!(
            r#"<svg:svg xmlns:svg="http://www.w3.org/2000/svg" width="5px" height="6px">"#,
            r#"<svg:path d="M0 0 1 0 1 1z"/></svg:svg>"#,
        );
        let doc = read_document(svg).unwrap();
        assert_eq!(doc.viewport, Viewport::from_size(5.0, 6.0));
        assert_eq!(doc.path_data, "M0 0 1 0 1 1z");
    }

    #[test]
    fn unescapes_attribute_values() {
        let svg = r#"<svg viewBox="0 0 1 1"><path d="M0&#32;0 L1 0 L1 1Z"/></svg>"#;
        assert_eq!(read_document(svg).unwrap().path_data, "M0 0 L1 0 L1 1Z");
    }

    #[test]
    fn missing_elements() {
        assert_eq!(
            read_document(r#"<html><path d="M0 0"/></html>"#),
            Err(ImportError::MissingSvg)
        );
        assert_eq!(
            read_document(r#"<svg viewBox="0 0 1 1"><rect/></svg>"#),
            Err(ImportError::MissingPath)
        );
        assert_eq!(
            read_document(r#"<svg><path d="M0 0 1 0 1 1z"/></svg>"#),
            Err(ImportError::MissingViewport)
        );
    }

    #[test]
    fn malformed_xml_is_reported() {
        let result = read_document(r#"<svg viewBox="0 0 1 1"><g></svg>"#);
        assert!(matches!(result, Err(ImportError::Xml(_))));
    }

    #[test]
    fn view_box_accepts_commas_and_offsets() {
        let viewport =
            viewport_from_attributes(&attrs(Some("-10,-20, 30 40"), None, None)).unwrap();
        assert_eq!(viewport, Viewport::new(-10.0, -20.0, 30.0, 40.0));
    }

    #[test]
    fn view_box_takes_precedence() {
        let viewport =
            viewport_from_attributes(&attrs(Some("0 0 8 9"), Some("100"), Some("100"))).unwrap();
        assert_eq!(viewport, Viewport::new(0.0, 0.0, 8.0, 9.0));
    }

    #[test]
    fn invalid_viewports() {
        for view_box in ["0 0 10", "0 0 10 x", "0 0 0 10", "0 0 10 -1", "0 0 10 10 10"] {
            assert_eq!(
                viewport_from_attributes(&attrs(Some(view_box), None, None)),
                Err(ImportError::InvalidViewport(view_box.to_string())),
                "{view_box}"
            );
        }
        assert!(matches!(
            viewport_from_attributes(&attrs(None, Some("50%"), Some("10"))),
            Err(ImportError::InvalidViewport(_))
        ));
        assert_eq!(
            viewport_from_attributes(&attrs(None, Some("10"), None)),
            Err(ImportError::MissingViewport)
        );
    }
}
