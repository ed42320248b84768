//! Statistical screening of candidate groups.
//!
//! Density clustering will happily carve an apparent group out of the
//! smooth field-star background; such artifacts betray themselves with
//! kinematic and distance spreads far beyond what a gravitationally
//! bound, co-moving population allows. Each candidate is summarized with
//! robust dispersion statistics and accepted or rejected exactly once;
//! rejected groups keep their statistics for diagnostics but never enter
//! the cluster report.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::ValidatorConfig;
use crate::models::StarRecord;
use crate::stats;

/// Tangential velocity left-over factor: mas/yr times pc to km/s is
/// 4.74e-3, of which the degree-to-radian projection step already
/// contributes pi/180.
pub const PM_KMS_FACTOR: f64 = 0.271795;

/// Robust summary of one candidate group, with its acceptance verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupStatistics {
    pub label: u32,
    pub member_count: usize,
    /// Median member distance, pc.
    pub distance_center_pc: f64,
    /// Interquartile range of member distances, pc.
    pub distance_iqr_pc: f64,
    /// Proper-motion IQR per axis, converted to km/s at the group
    /// distance.
    pub pm_ra_iqr_kms: f64,
    pub pm_dec_iqr_kms: f64,
    /// Angular position IQR per axis, converted to pc at the group
    /// distance.
    pub ra_iqr_pc: f64,
    pub dec_iqr_pc: f64,
    /// Fraction of members fainter than the configured absolute
    /// magnitude threshold.
    pub faint_fraction: f64,
    /// Acceptance verdict, computed once and never revised.
    pub validated: bool,
}

impl GroupStatistics {
    /// The acceptance rule, a pure function of the summary statistics:
    /// kinematically tight on both axes, compact in distance, and not
    /// dominated by faint background contamination.
    pub fn passes(&self, config: &ValidatorConfig) -> bool {
        self.pm_ra_iqr_kms < config.pm_iqr_cap_kms
            && self.pm_dec_iqr_kms < config.pm_iqr_cap_kms
            && self.distance_iqr_pc < config.distance_iqr_cap_pc
            && self.faint_fraction < config.faint_fraction_cap
    }
}

/// Angular IQR (degrees or mas/yr on the angular axes) projected to a
/// linear scale at the group distance.
fn iqr_at_distance(values: &[f64], distance_center: f64) -> f64 {
    stats::iqr(values) * std::f64::consts::PI / 180.0 * distance_center
}

/// Summarize and screen every non-noise group in the labeled record set.
///
/// Groups come back ordered by label. An input with no non-noise labels
/// yields an empty vector, not an error.
pub fn summarize_groups(records: &[StarRecord], config: &ValidatorConfig) -> Vec<GroupStatistics> {
    let mut members: BTreeMap<u32, Vec<&StarRecord>> = BTreeMap::new();
    for record in records {
        if let Some(id) = record.cluster_label.id() {
            members.entry(id).or_default().push(record);
        }
    }

    members
        .into_iter()
        .map(|(label, group)| {
            let distances: Vec<f64> = group.iter().map(|r| r.distance).collect();
            let pmra: Vec<f64> = group.iter().map(|r| r.pmra).collect();
            let pmdec: Vec<f64> = group.iter().map(|r| r.pmdec).collect();
            let ra: Vec<f64> = group.iter().map(|r| r.ra_transformed).collect();
            let dec: Vec<f64> = group.iter().map(|r| r.dec).collect();

            let distance_center = stats::median(&distances);
            let faint = group
                .iter()
                .filter(|r| r.absolute_magnitude > config.faint_magnitude_threshold)
                .count();

            let mut statistics = GroupStatistics {
                label,
                member_count: group.len(),
                distance_center_pc: distance_center,
                distance_iqr_pc: stats::iqr(&distances),
                pm_ra_iqr_kms: iqr_at_distance(&pmra, distance_center) * PM_KMS_FACTOR,
                pm_dec_iqr_kms: iqr_at_distance(&pmdec, distance_center) * PM_KMS_FACTOR,
                ra_iqr_pc: iqr_at_distance(&ra, distance_center),
                dec_iqr_pc: iqr_at_distance(&dec, distance_center),
                faint_fraction: faint as f64 / group.len() as f64,
                validated: false,
            };
            statistics.validated = statistics.passes(config);
            statistics
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ClusterLabel;

    fn synthetic_stats() -> GroupStatistics {
        GroupStatistics {
            label: 0,
            member_count: 100,
            distance_center_pc: 400.0,
            distance_iqr_pc: 50.0,
            pm_ra_iqr_kms: 1.0,
            pm_dec_iqr_kms: 1.0,
            ra_iqr_pc: 2.0,
            dec_iqr_pc: 2.0,
            faint_fraction: 0.1,
            validated: false,
        }
    }

    #[test]
    fn test_tight_group_accepted() {
        let stats = synthetic_stats();
        assert!(stats.passes(&ValidatorConfig::default()));
    }

    #[test]
    fn test_kinematic_spread_rejects_regardless_of_rest() {
        let stats = GroupStatistics {
            pm_ra_iqr_kms: 8.0,
            ..synthetic_stats()
        };
        assert!(!stats.passes(&ValidatorConfig::default()));

        let stats = GroupStatistics {
            pm_dec_iqr_kms: 8.0,
            ..synthetic_stats()
        };
        assert!(!stats.passes(&ValidatorConfig::default()));
    }

    #[test]
    fn test_distance_spread_cap_and_preset() {
        let stats = GroupStatistics {
            distance_iqr_pc: 400.0,
            ..synthetic_stats()
        };
        assert!(!stats.passes(&ValidatorConfig::default()));
        // The white-dwarf-oriented preset relaxes the cap to 500 pc.
        assert!(stats.passes(&ValidatorConfig::white_dwarf_search()));
    }

    #[test]
    fn test_faint_contamination_rejects() {
        let stats = GroupStatistics {
            faint_fraction: 0.85,
            ..synthetic_stats()
        };
        assert!(!stats.passes(&ValidatorConfig::default()));
    }

    fn member(label: ClusterLabel, distance: f64, pmra: f64, absolute_magnitude: f64) -> StarRecord {
        let mut record = StarRecord::new(None, 120.0, -30.0, pmra, 5.0, 2.0, 12.0, 1.0);
        record.cluster_label = label;
        record.distance = distance;
        record.absolute_magnitude = absolute_magnitude;
        record
    }

    #[test]
    fn test_summarize_partitions_by_label_and_skips_noise() {
        let records = vec![
            member(ClusterLabel::Cluster(0), 100.0, 1.0, 4.0),
            member(ClusterLabel::Cluster(0), 110.0, 1.0, 4.0),
            member(ClusterLabel::Cluster(0), 120.0, 1.0, 12.0),
            member(ClusterLabel::Cluster(1), 500.0, 2.0, 5.0),
            member(ClusterLabel::Cluster(1), 520.0, 2.0, 5.0),
            member(ClusterLabel::Noise, 900.0, 30.0, 15.0),
        ];
        let groups = summarize_groups(&records, &ValidatorConfig::default());
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].label, 0);
        assert_eq!(groups[0].member_count, 3);
        assert_eq!(groups[0].distance_center_pc, 110.0);
        assert!((groups[0].faint_fraction - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(groups[1].label, 1);
        assert_eq!(groups[1].member_count, 2);
    }

    #[test]
    fn test_proper_motion_velocity_conversion() {
        // pmra IQR of 2 mas/yr at 100 pc: 2 * pi/180 * 100 * 0.271795 km/s.
        let records = vec![
            member(ClusterLabel::Cluster(0), 100.0, 0.0, 4.0),
            member(ClusterLabel::Cluster(0), 100.0, 1.0, 4.0),
            member(ClusterLabel::Cluster(0), 100.0, 2.0, 4.0),
            member(ClusterLabel::Cluster(0), 100.0, 3.0, 4.0),
        ];
        let groups = summarize_groups(&records, &ValidatorConfig::default());
        let expected = 1.5 * std::f64::consts::PI / 180.0 * 100.0 * PM_KMS_FACTOR;
        assert!((groups[0].pm_ra_iqr_kms - expected).abs() < 1e-9);
        // Constant pmdec has zero spread.
        assert_eq!(groups[0].pm_dec_iqr_kms, 0.0);
    }

    #[test]
    fn test_empty_and_noise_only_inputs() {
        let groups = summarize_groups(&[], &ValidatorConfig::default());
        assert!(groups.is_empty());

        let records = vec![member(ClusterLabel::Noise, 100.0, 1.0, 4.0)];
        let groups = summarize_groups(&records, &ValidatorConfig::default());
        assert!(groups.is_empty());
    }

    #[test]
    fn test_verdict_is_stored_on_the_summary() {
        let records = vec![
            member(ClusterLabel::Cluster(0), 100.0, 1.0, 4.0),
            member(ClusterLabel::Cluster(0), 102.0, 1.1, 4.0),
            member(ClusterLabel::Cluster(0), 104.0, 0.9, 4.0),
        ];
        let groups = summarize_groups(&records, &ValidatorConfig::default());
        assert!(groups[0].validated);
    }
}
