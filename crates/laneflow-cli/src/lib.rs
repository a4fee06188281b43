//! CLI logic for the Laneflow document tool.
//!
//! The tool loads a stored document (tiered or legacy), upgrades it to the
//! tiered format when needed, validates it, runs every graph through the
//! transformer round trip (healing stale lane and band memberships), and
//! writes the normalized document back out.

pub mod error_adapter;

mod args;
mod config;
mod error;

pub use args::Args;
pub use error::CliError;

use std::fs;
use std::path::Path;

use log::{info, warn};

use laneflow::schema::legacy::AnyDocument;
use laneflow::schema::validate::validate;
use laneflow::transform::{org, process};

/// Run the Laneflow CLI application
///
/// Normalizes the input document: legacy documents are upgraded, lane and
/// band memberships are re-inferred from geometry, and the result is
/// validated before anything is written.
///
/// # Errors
///
/// Returns `CliError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Unparseable documents
/// - Validation failures (one violation per field path)
pub fn run(args: &Args) -> Result<(), CliError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Normalizing document"
    );

    let app_config = config::load_config(args.config.as_ref())?;
    let lane_config = app_config.lane_config();

    let source = fs::read_to_string(&args.input)?;
    let any = AnyDocument::from_json_str(&source)?;

    let fallback_id = Path::new(&args.input)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("project")
        .to_owned();
    let project_id = args.project_id.clone().unwrap_or(fallback_id);
    let name = args.name.clone().unwrap_or_else(|| project_id.clone());

    let mut doc = any.upgrade(&project_id, &name);

    let report = validate(&doc)?;
    for warning in report.warnings() {
        warn!("{warning}");
    }

    // Round-trip every process graph through the transformer so stale lane
    // assignments are healed before writing
    let graph_ids: Vec<String> = doc.process_graphs.keys().cloned().collect();
    for graph_id in graph_ids {
        let Some(graph) = doc.process_graphs.get(&graph_id) else {
            continue;
        };
        let meta = graph.meta.clone();
        let view = process::to_visual(graph, &doc.resources, lane_config);
        for warning in &view.warnings {
            warn!(graph_id = graph_id.as_str(); "{warning}");
        }
        let healed = process::from_visual(&view.visual, lane_config, meta);
        doc.process_graphs.insert(graph_id, healed);
    }

    if let Some(org_graph) = &doc.org_graph {
        let view = org::to_visual(org_graph);
        for warning in &view.warnings {
            warn!("{warning}");
        }
        doc.org_graph = Some(org::from_visual(&view.visual));
    }

    // Final gate: never write a document that would fail to load
    validate(&doc)?;

    let json = serde_json::to_string_pretty(&doc)?;
    fs::write(&args.output, json)?;

    info!(output_file = args.output; "Normalized document written");

    Ok(())
}
