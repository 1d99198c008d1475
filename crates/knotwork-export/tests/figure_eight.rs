//! Integration test: run an SVG figure-eight through import, the knot pipeline and SVG export.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use knotwork_export::{SvgMetadata, SvgSurface};
use knotwork_pipeline::{DrawOrder, KnotConfig, process};

const FIGURE_EIGHT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100" viewBox="0 0 100 100">
  <path d="M 10,10 L 90,90 L 90,10 L 10,90 Z" style="fill:none;stroke:#000000"/>
</svg>
"#;

fn run(config: &KnotConfig) -> String {
    let extracted = knotwork_import::extract(FIGURE_EIGHT).expect("figure eight should import");
    let mut surface = SvgSurface::new(&SvgMetadata::default());
    process(extracted.vertices, extracted.viewport, config, &mut surface)
        .expect("pipeline should succeed");
    surface.finish()
}

#[test]
fn figure_eight_import_to_svg() {
    let svg = run(&KnotConfig::default());

    assert!(svg.starts_with("<?xml"));
    assert!(svg.contains(r#"viewBox="0 0 100 100""#));
    assert_eq!(svg.matches("<g").count(), 2);
    assert_eq!(svg.matches("<path").count(), 8);
    assert_eq!(svg.matches("stroke:#ffffff;stroke-width:16px").count(), 4);
    assert_eq!(svg.matches("stroke:#000000;stroke-width:8px").count(), 4);

    let lower = svg.find(r#"class="level-0""#).unwrap();
    let upper = svg.find(r#"class="level-1""#).unwrap();
    assert!(lower < upper, "level 0 must be drawn first");

    eprintln!("figure eight SVG: {} bytes", svg.len());
}

#[test]
fn upper_first_reverses_groups() {
    let svg = run(&KnotConfig {
        draw_order: DrawOrder::UpperFirst,
        ..KnotConfig::default()
    });
    let lower = svg.find(r#"class="level-0""#).unwrap();
    let upper = svg.find(r#"class="level-1""#).unwrap();
    assert!(upper < lower);
}

#[test]
fn single_stroke_mode_emits_one_closed_path() {
    let svg = run(&KnotConfig {
        split_segments: false,
        ..KnotConfig::default()
    });
    assert_eq!(svg.matches("<path").count(), 1);
    assert_eq!(svg.matches("<g").count(), 0);
    assert!(svg.contains("stroke:#000000;stroke-width:4px"));
}

#[test]
fn output_is_byte_identical_across_runs() {
    let config = KnotConfig::default();
    assert_eq!(run(&config), run(&config));
}
