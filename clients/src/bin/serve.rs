//! `shaclform-serve` — Serves a web form generated from a SHACL shapes file.
//!
//! The form and its RDF map are generated in memory on startup;
//! submissions are converted to RDF and answered with the result Turtle.
//!
//! **Usage:**
//! ```
//! shaclform-serve <shapes.ttl> [--base-uri <iri>] [--listen <addr>]
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;

use shaclform_render::FormRenderer;
use shaclform_server::AppState;
use shaclform_shapes::{layout, rdfmap, ShapeReader};

/// Serve a web form generated from a SHACL shapes file.
#[derive(Parser)]
#[command(
    name = "shaclform-serve",
    about = "Serve a web form generated from a SHACL shapes file"
)]
struct Args {
    /// SHACL shapes file (Turtle, or N-Triples with an `.nt` extension).
    shapes: PathBuf,

    /// Base IRI minted entry nodes are placed under.
    #[arg(long, default_value = "http://example.org/ex#")]
    base_uri: String,

    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:8080")]
    listen: String,
}

#[tokio::main]
async fn main() -> Result<()> {
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
    let state = AppState::new(html, &map, args.base_uri.clone())?;

    shaclform_server::serve(&args.listen, Arc::new(state))
        .await
        .with_context(|| format!("server failed on {}", args.listen))
}
