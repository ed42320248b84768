use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::PipelineOptions;
use crate::engine::DensityEngine;
use crate::ingest;
use crate::models::StarRecord;
use crate::photometry::WhiteDwarfFlag;
use crate::pipeline::{self, PipelineOutcome};

/// Run the full screening pipeline and report validated clusters plus
/// white dwarf candidates.
pub fn analyze(
    input: &str,
    format: &str,
    output_records: Option<&str>,
    output_flags: Option<&str>,
    options: &PipelineOptions,
) -> Result<()> {
    let config = options.to_pipeline_config();
    let records = ingest::read_star_records_from_path(Path::new(input))?;
    info!(records = records.len(), input, "loaded survey extract");

    let engine = DensityEngine::new(config.engine.clone());
    let outcome = pipeline::run(records, &config, &engine)?;

    match format {
        "json" => output_json(&outcome)?,
        "csv" => output_csv(&outcome.flags)?,
        _ => output_table(&outcome),
    }

    if let Some(path) = output_records {
        write_records_csv(path, &outcome.records)?;
        println!("Wrote {} enriched records to {}", outcome.records.len(), path);
    }
    if let Some(path) = output_flags {
        write_flags_csv(path, &outcome.flags)?;
        println!("Wrote {} white dwarf flags to {}", outcome.flags.len(), path);
    }

    Ok(())
}

fn output_table(outcome: &PipelineOutcome) {
    println!(
        "{:<10} {:<10} {:<12} {:<14} {:<14} {:<14} {:<10}",
        "Cluster", "Members", "Dist (pc)", "Dist IQR (pc)", "PM RA (km/s)", "PM DEC (km/s)", "Faint"
    );
    println!("{:-<90}", "");

    for group in outcome.validated_groups() {
        println!(
            "{:<10} {:<10} {:<12.1} {:<14.1} {:<14.2} {:<14.2} {:<10.2}",
            group.label,
            group.member_count,
            group.distance_center_pc,
            group.distance_iqr_pc,
            group.pm_ra_iqr_kms,
            group.pm_dec_iqr_kms,
            group.faint_fraction
        );
    }

    let validated = outcome.validated_groups().count();
    println!(
        "\nTotal: {} validated of {} candidate groups",
        validated,
        outcome.groups.len()
    );

    if outcome.flags.is_empty() {
        println!("No white dwarf candidates in validated clusters");
    } else {
        println!();
        for flag in &outcome.flags {
            println!(
                "WD in Cluster {}: Membership Prob. = {:.3}, M = {:.3} and color = {:.3}",
                flag.cluster, flag.membership_probability, flag.absolute_magnitude, flag.color_index
            );
        }
    }
}

fn output_json(outcome: &PipelineOutcome) -> Result<()> {
    let report = serde_json::json!({
        "recenter": outcome.recenter,
        "groups": outcome.groups,
        "white_dwarfs": outcome.flags,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn output_csv(flags: &[WhiteDwarfFlag]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(std::io::stdout());
    for flag in flags {
        writer.serialize(flag)?;
    }
    writer.flush()?;
    Ok(())
}

pub(crate) fn write_records_csv(path: &str, records: &[StarRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create output file: {path}"))?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_flags_csv(path: &str, flags: &[WhiteDwarfFlag]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create output file: {path}"))?;
    for flag in flags {
        writer.serialize(flag)?;
    }
    writer.flush()?;
    Ok(())
}
