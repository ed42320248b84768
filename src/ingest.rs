//! CSV ingestion boundary.
//!
//! Thin wrapper over a survey extract in CSV form. Column names follow
//! the Gaia archive convention (`phot_g_mean_mag`, `bp_rp`), with plain
//! names accepted as well; extra columns such as per-axis error
//! estimates are ignored. Rows missing any required field are dropped
//! here, before the core ever sees them.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::warn;

use crate::models::StarRecord;

#[derive(Debug, Deserialize)]
struct RawRow {
    source_id: Option<i64>,
    ra: Option<f64>,
    dec: Option<f64>,
    pmra: Option<f64>,
    pmdec: Option<f64>,
    parallax: Option<f64>,
    #[serde(alias = "phot_g_mean_mag")]
    apparent_magnitude: Option<f64>,
    #[serde(alias = "bp_rp")]
    color_index: Option<f64>,
}

impl RawRow {
    /// None when any required field is missing; `source_id` is optional.
    fn into_record(self) -> Option<StarRecord> {
        Some(StarRecord::new(
            self.source_id,
            self.ra?,
            self.dec?,
            self.pmra?,
            self.pmdec?,
            self.parallax?,
            self.apparent_magnitude?,
            self.color_index?,
        ))
    }
}

/// Read records from CSV, dropping incomplete rows with a logged count.
pub fn read_star_records<R: Read>(reader: R) -> Result<Vec<StarRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    let mut dropped = 0usize;
    for (index, row) in csv_reader.deserialize::<RawRow>().enumerate() {
        let row = row.with_context(|| format!("Malformed CSV row {}", index + 1))?;
        match row.into_record() {
            Some(record) => records.push(record),
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        warn!(dropped, kept = records.len(), "dropped incomplete rows");
    }
    Ok(records)
}

/// Read records from a CSV file on disk.
pub fn read_star_records_from_path(path: &Path) -> Result<Vec<StarRecord>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open input file: {}", path.display()))?;
    read_star_records(file).with_context(|| format!("Failed to read {}", path.display()))
}
