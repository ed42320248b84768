use std::path::Path;

use anyhow::Result;
use tracing::info;

use crate::cli::PipelineOptions;
use crate::engine::DensityEngine;
use crate::ingest;
use crate::pipeline;
use crate::validation::GroupStatistics;

/// Print summary statistics for every candidate group the engine found,
/// with the acceptance verdict; rejected groups are the usual starting
/// point for retuning the density parameters or the feature scaling.
pub fn list_clusters(input: &str, format: &str, options: &PipelineOptions) -> Result<()> {
    let config = options.to_pipeline_config();
    let records = ingest::read_star_records_from_path(Path::new(input))?;
    info!(records = records.len(), input, "loaded survey extract");

    let engine = DensityEngine::new(config.engine.clone());
    let outcome = pipeline::run(records, &config, &engine)?;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&outcome.groups)?),
        "csv" => output_csv(&outcome.groups)?,
        _ => output_table(&outcome.groups),
    }
    Ok(())
}

fn output_table(groups: &[GroupStatistics]) {
    println!(
        "{:<10} {:<10} {:<12} {:<14} {:<14} {:<14} {:<10} {:<10}",
        "Cluster",
        "Members",
        "Dist (pc)",
        "Dist IQR (pc)",
        "PM RA (km/s)",
        "PM DEC (km/s)",
        "Faint",
        "Verdict"
    );
    println!("{:-<100}", "");

    for group in groups {
        println!(
            "{:<10} {:<10} {:<12.1} {:<14.1} {:<14.2} {:<14.2} {:<10.2} {:<10}",
            group.label,
            group.member_count,
            group.distance_center_pc,
            group.distance_iqr_pc,
            group.pm_ra_iqr_kms,
            group.pm_dec_iqr_kms,
            group.faint_fraction,
            if group.validated { "Accepted" } else { "Rejected" }
        );
    }

    println!("\nTotal: {} candidate groups", groups.len());
}

fn output_csv(groups: &[GroupStatistics]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(std::io::stdout());
    for group in groups {
        writer.serialize(group)?;
    }
    writer.flush()?;
    Ok(())
}
