//! `shaclform-generate` — Generates an HTML web form from a SHACL shapes file.
//!
//! **Outputs:**
//! - `form.html` — the form page
//! - `webform.js` — the client script, written next to the form page
//! - `map.ttl` — the RDF map used to convert submissions back into RDF
//!
//! **Usage:**
//! ```
//! shaclform-generate <shapes.ttl> [--form <path>] [--map <path>]
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

use shaclform_render::{FormRenderer, WEBFORM_JS};
use shaclform_shapes::{layout, rdfmap, ShapeReader};

/// Generate an HTML web form and its RDF map from a SHACL shapes file.
#[derive(Parser)]
#[command(
    name = "shaclform-generate",
    about = "Generate an HTML web form and RDF map from a SHACL shapes file"
)]
struct Args {
    /// SHACL shapes file (Turtle, or N-Triples with an `.nt` extension).
    shapes: PathBuf,

    /// Destination of the generated form page.
    #[arg(long, default_value = "form.html")]
    form: PathBuf,

    /// Destination of the generated RDF map.
    #[arg(long, default_value = "map.ttl")]
    map: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let mut reader = ShapeReader::from_path(&args.shapes)?;
    let Some(mut shape) = reader.read_shape()? else {
        bail!("no node shape found in {}", args.shapes.display());
    };
    for warning in reader.warnings() {
        tracing::warn!(%warning, "shape warning");
    }
    layout::finalize(&mut shape);

    let html = FormRenderer::new()?.render_shape(&shape)?;
    let map = rdfmap::map_turtle(&shape)?;

    std::fs::write(&args.form, html)
        .with_context(|| format!("cannot write {}", args.form.display()))?;
    let script = args.form.with_file_name("webform.js");
    std::fs::write(&script, WEBFORM_JS)
        .with_context(|| format!("cannot write {}", script.display()))?;
    std::fs::write(&args.map, map)
        .with_context(|| format!("cannot write {}", args.map.display()))?;

    println!("Form generated successfully.");
    println!("  Form: {}", args.form.display());
    println!("  Script: {}", script.display());
    println!("  Map: {}", args.map.display());

    Ok(())
}
