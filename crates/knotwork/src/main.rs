//! knotwork: render a closed SVG path as a woven Celtic knot.
//!
//! Reads an SVG document, takes the first path as the knot polygon, runs
//! the weaving pipeline and writes the woven drawing as a new SVG
//! document.
//!
//! # Usage
//!
//! ```text
//! knotwork [OPTIONS] <INPUT>
//! knotwork drawing.svg -o knot.svg --verbose
//! knotwork drawing.svg --no-split > outline.svg
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use knotwork_export::{SvgMetadata, SvgSurface};
use knotwork_pipeline::{KnotConfig, KnotDiagnostics};

/// Render a closed SVG path as a woven Celtic knot.
///
/// The first `<path>` of the input becomes a closed polygon. Every edge
/// is drawn as a smooth curve that alternately passes over and under the
/// edges it crosses.
#[derive(Parser)]
#[command(name = "knotwork", version)]
struct Cli {
    /// Input SVG document.
    input: PathBuf,

    /// Write the SVG output to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Draw the knot as one closed stroke without weaving.
    #[arg(long)]
    no_split: bool,

    /// Which weave level is drawn first (and ends up underneath).
    #[arg(long, value_enum, default_value_t = Order::LowerFirst)]
    draw_order: Order,

    /// How crossings flip the weave level.
    #[arg(long, value_enum, default_value_t = Flip::PerEdge)]
    flip_rule: Flip,

    /// Log a summary and embed it as comments in the output.
    #[arg(long)]
    verbose: bool,

    /// Log raw intermediate structures (implies --verbose).
    #[arg(long)]
    debug: bool,

    /// Print diagnostics as JSON to stderr.
    #[arg(long)]
    json: bool,

    /// Full knot config as a JSON string.
    ///
    /// When provided, the drawing flags are ignored; `--verbose` and
    /// `--debug` still apply. The JSON must be a valid `KnotConfig`
    /// serialization; missing fields take their defaults.
    #[arg(long)]
    config_json: Option<String>,
}

/// Draw order selection.
#[derive(Clone, Copy, ValueEnum)]
enum Order {
    /// Level 0 first, level 1 on top.
    LowerFirst,
    /// Level 1 first, level 0 on top.
    UpperFirst,
}

/// Flip rule selection.
#[derive(Clone, Copy, ValueEnum)]
enum Flip {
    /// Flip once per edge that takes part in any crossing.
    PerEdge,
    /// Flip once per crossing an edge takes part in.
    PerCrossing,
}

/// Build a [`KnotConfig`] from CLI arguments.
///
/// If `--config-json` is provided, the JSON is parsed directly and the
/// drawing flags are ignored.
fn config_from_cli(cli: &Cli) -> Result<KnotConfig, String> {
    let base = if let Some(ref json) = cli.config_json {
        serde_json::from_str(json).map_err(|e| format!("Error parsing --config-json: {e}"))?
    } else {
        KnotConfig {
            split_segments: !cli.no_split,
            draw_order: match cli.draw_order {
                Order::LowerFirst => knotwork_pipeline::DrawOrder::LowerFirst,
                Order::UpperFirst => knotwork_pipeline::DrawOrder::UpperFirst,
            },
            flip_rule: match cli.flip_rule {
                Flip::PerEdge => knotwork_pipeline::FlipRule::PerEdge,
                Flip::PerCrossing => knotwork_pipeline::FlipRule::PerCrossing,
            },
            ..KnotConfig::default()
        }
    };

    Ok(KnotConfig {
        verbose: base.verbose || cli.verbose || cli.debug,
        debug: base.debug || cli.debug,
        ..base
    })
}

/// Log level for the flags; `RUST_LOG` still overrides it.
const fn log_level(config: &KnotConfig) -> log::LevelFilter {
    if config.debug {
        log::LevelFilter::Debug
    } else if config.verbose {
        log::LevelFilter::Info
    } else {
        log::LevelFilter::Warn
    }
}

/// Run import, pipeline and export; returns the document and diagnostics.
fn render_document(
    svg_text: &str,
    title: &str,
    config: &KnotConfig,
) -> Result<(String, KnotDiagnostics), String> {
    let extracted = knotwork_import::extract(svg_text).map_err(|e| format!("Import error: {e}"))?;
    log::info!(
        "extracted {} vertices, viewport {:?}",
        extracted.vertices.len(),
        extracted.viewport
    );

    let knot = knotwork_pipeline::Knot::from_vertices(extracted.vertices, config)
        .map_err(|e| format!("Pipeline error: {e}"))?;

    let metadata = SvgMetadata {
        title: Some(title),
        ..SvgMetadata::default()
    };
    let mut surface = SvgSurface::new(&metadata);
    let drawn = knot.render(&mut surface, extracted.viewport, config);
    let diagnostics = KnotDiagnostics::collect(&knot, config.split_segments, drawn);

    if config.verbose {
        for line in diagnostics.summary_lines() {
            surface.add_comment(line);
        }
    }

    Ok((surface.finish(), diagnostics))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match config_from_cli(&cli) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    env_logger::Builder::new()
        .filter_level(log_level(&config))
        .parse_default_env()
        .init();

    let svg_text = match std::fs::read_to_string(&cli.input) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error reading {}: {e}", cli.input.display());
            return ExitCode::FAILURE;
        }
    };

    let title = cli
        .input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("knot");

    let (svg, diagnostics) = match render_document(&svg_text, title, &config) {
        Ok(result) => result,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    if config.verbose {
        log::info!("\n{}", diagnostics.report());
    }

    if cli.json {
        match serde_json::to_string_pretty(&diagnostics) {
            Ok(json) => eprintln!("{json}"),
            Err(e) => {
                eprintln!("Error serializing diagnostics: {e}");
                return ExitCode::FAILURE;
            }
        }
    }

    let written = match cli.output {
        Some(ref path) => std::fs::write(path, &svg).map(|()| {
            log::info!("SVG written to {} ({} bytes)", path.display(), svg.len());
        }),
        None => std::io::stdout().lock().write_all(svg.as_bytes()),
    };
    if let Err(e) = written {
        eprintln!("Error writing SVG: {e}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
