use std::path::Path;

use anyhow::Result;
use tracing::{info, warn};

use crate::cli::PipelineOptions;
use crate::commands::analyze::write_records_csv;
use crate::engine::DensityEngine;
use crate::ingest;
use crate::models::ClusterLabel;
use crate::pipeline;

/// Write the members of one cluster label to a CSV file for follow-up
/// analysis. The label of interest is commonly 0, but depends on how
/// many groups the field produces.
pub fn extract_cluster(
    input: &str,
    output: &str,
    label: Option<u32>,
    options: &PipelineOptions,
) -> Result<()> {
    let config = options.to_pipeline_config();
    let records = ingest::read_star_records_from_path(Path::new(input))?;
    info!(records = records.len(), input, "loaded survey extract");

    let engine = DensityEngine::new(config.engine.clone());
    let outcome = pipeline::run(records, &config, &engine)?;

    let target = label.unwrap_or(config.extract_label);
    let members: Vec<_> = outcome
        .records
        .iter()
        .filter(|r| r.cluster_label == ClusterLabel::Cluster(target))
        .cloned()
        .collect();

    if members.is_empty() {
        warn!(label = target, "no members carry the requested label");
    }
    write_records_csv(output, &members)?;
    println!(
        "Wrote {} members of cluster {} to {}",
        members.len(),
        target,
        output
    );

    Ok(())
}
