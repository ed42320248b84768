//! Fixed-order screening pipeline.
//!
//! One finite record set is threaded through normalizer, scaler,
//! clustering engine, validator and photometric classifier; each stage
//! only adds derived fields and never revises what an earlier stage
//! wrote. The run either produces the full enriched record set plus the
//! reports, or fails before any output.

use tracing::{debug, info};

use crate::config::PipelineConfig;
use crate::coordinates::{self, RecenterSolution};
use crate::engine::ClusterEngine;
use crate::error::PipelineError;
use crate::models::StarRecord;
use crate::photometry::{self, WhiteDwarfFlag};
use crate::scaling;
use crate::validation::{self, GroupStatistics};

/// Everything one run produces.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    /// The full enriched record set, including noise records; every
    /// input record appears in exactly one label partition.
    pub records: Vec<StarRecord>,
    pub recenter: RecenterSolution,
    /// Summary statistics for every candidate group, rejected ones
    /// included for diagnostics.
    pub groups: Vec<GroupStatistics>,
    /// White dwarf candidates from validated groups only.
    pub flags: Vec<WhiteDwarfFlag>,
}

impl PipelineOutcome {
    pub fn validated_groups(&self) -> impl Iterator<Item = &GroupStatistics> {
        self.groups.iter().filter(|g| g.validated)
    }
}

/// Run the whole screening pipeline over one record set.
pub fn run(
    mut records: Vec<StarRecord>,
    config: &PipelineConfig,
    engine: &dyn ClusterEngine,
) -> Result<PipelineOutcome, PipelineError> {
    let recenter = coordinates::normalize_field(&mut records, &config.normalizer);
    debug!(
        center_deg = recenter.center_deg,
        wrapped = recenter.wrapped,
        "field recentered"
    );

    let features = scaling::scale_records(&mut records, &config.scaler)?;

    let assignments = engine.cluster(&features)?;
    if assignments.len() != records.len() {
        return Err(PipelineError::AssignmentMismatch {
            expected: records.len(),
            got: assignments.len(),
        });
    }
    for (record, assignment) in records.iter_mut().zip(assignments) {
        record.cluster_label = assignment.label;
        record.membership_probability = assignment.probability;
    }

    let groups = validation::summarize_groups(&records, &config.validator);
    let flags = photometry::flag_white_dwarfs(&records, &groups, &config.white_dwarf);

    info!(
        records = records.len(),
        candidates = groups.len(),
        validated = groups.iter().filter(|g| g.validated).count(),
        white_dwarfs = flags.len(),
        "screening complete"
    );

    Ok(PipelineOutcome {
        records,
        recenter,
        groups,
        flags,
    })
}
