mod cli;

use std::fs;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use fbd_creator::diagram::{LayoutError, compose_scene};
use fbd_creator::export::export_scene;
use fbd_creator::preview::run_preview;

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    let args = cli::Args::parse();
    init_tracing(&args.log_level);

    let (request, layout) = args.diagram()?;
    let rendered = compose_scene(&request, &layout);

    for condition in rendered.report.diagram_conditions() {
        match condition {
            LayoutError::ResultantUnavailable { missing } => warn!(
                ?missing,
                "Resultant vector cannot be calculated when any magnitudes are unknown."
            ),
            condition => warn!(%condition, "diagram condition"),
        }
    }

    if args.preview {
        return run_preview(rendered).map_err(|error| anyhow!("preview window failed: {error}"));
    }

    let bytes = export_scene(&rendered.scene, args.format, args.width)?;
    let output = args.output_path();
    fs::write(&output, &bytes)
        .with_context(|| format!("failed to write {}", output.display()))?;
    info!(
        path = %output.display(),
        bytes = bytes.len(),
        mime = args.format.mime_type(),
        "diagram written"
    );
    Ok(())
}
