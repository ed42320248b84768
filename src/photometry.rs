//! Photometric extraction of white dwarf candidates from validated
//! clusters.
//!
//! On the color-magnitude diagram white dwarfs sit blueward of and well
//! below the main sequence; an empirical cooling-track line separates
//! the two loci. The cut assumes zero interstellar reddening and, by
//! default, evaluates absolute magnitudes at the adopted cluster
//! distance rather than per star; both simplifications are configurable
//! in [`WhiteDwarfCut`]. Flags are additive report records only and
//! never modify the underlying record set.

use serde::{Deserialize, Serialize};

use crate::config::WhiteDwarfCut;
use crate::models::StarRecord;
use crate::scaling;
use crate::validation::GroupStatistics;

/// One white dwarf candidate found in a validated cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhiteDwarfFlag {
    /// Label of the validated group the candidate belongs to.
    pub cluster: u32,
    /// Catalog source id, when the extract carries one.
    pub source_id: Option<i64>,
    /// Position of the record in the enriched record set.
    pub row: usize,
    pub membership_probability: f64,
    /// Absolute magnitude as evaluated by the cut (cluster distance by
    /// default).
    pub absolute_magnitude: f64,
    pub color_index: f64,
}

fn is_white_dwarf(color_index: f64, absolute_magnitude: f64, cut: &WhiteDwarfCut) -> bool {
    color_index < cut.color_max
        && absolute_magnitude > cut.magnitude_floor
        && absolute_magnitude > color_index * cut.line_slope + cut.line_intercept
}

/// Screen the members of every validated group against the cooling-track
/// cut.
pub fn flag_white_dwarfs(
    records: &[StarRecord],
    groups: &[GroupStatistics],
    cut: &WhiteDwarfCut,
) -> Vec<WhiteDwarfFlag> {
    let mut flags = Vec::new();

    for group in groups.iter().filter(|g| g.validated) {
        for (row, record) in records.iter().enumerate() {
            if record.cluster_label.id() != Some(group.label) {
                continue;
            }
            let magnitude = if cut.per_star_distance {
                record.absolute_magnitude
            } else {
                scaling::absolute_magnitude(record.apparent_magnitude, group.distance_center_pc)
            };
            if is_white_dwarf(record.color_index, magnitude, cut) {
                flags.push(WhiteDwarfFlag {
                    cluster: group.label,
                    source_id: record.source_id,
                    row,
                    membership_probability: record.membership_probability,
                    absolute_magnitude: magnitude,
                    color_index: record.color_index,
                });
            }
        }
    }

    flags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ValidatorConfig;
    use crate::models::ClusterLabel;

    fn group(label: u32, distance: f64, validated: bool) -> GroupStatistics {
        let mut stats = GroupStatistics {
            label,
            member_count: 60,
            distance_center_pc: distance,
            distance_iqr_pc: 20.0,
            pm_ra_iqr_kms: 0.5,
            pm_dec_iqr_kms: 0.5,
            ra_iqr_pc: 1.0,
            dec_iqr_pc: 1.0,
            faint_fraction: 0.1,
            validated: false,
        };
        stats.validated = validated && stats.passes(&ValidatorConfig::default());
        stats
    }

    fn member(label: u32, apparent_magnitude: f64, color_index: f64) -> StarRecord {
        let mut record =
            StarRecord::new(Some(77), 120.0, -30.0, 1.0, 1.0, 2.0, apparent_magnitude, color_index);
        record.cluster_label = ClusterLabel::Cluster(label);
        record.membership_probability = 0.9;
        record.distance = 100.0;
        record.absolute_magnitude =
            scaling::absolute_magnitude(apparent_magnitude, record.distance);
        record
    }

    #[test]
    fn test_cut_boundary() {
        // At 100 pc the distance modulus is 5.
        let groups = vec![group(0, 100.0, true)];

        // M = 11, color 0: below the main sequence, flagged.
        let records = vec![member(0, 16.0, 0.0)];
        let flags = flag_white_dwarfs(&records, &groups, &WhiteDwarfCut::default());
        assert_eq!(flags.len(), 1);
        assert_eq!(flags[0].cluster, 0);
        assert_eq!(flags[0].source_id, Some(77));
        assert!((flags[0].absolute_magnitude - 11.0).abs() < 1e-9);

        // Identical but M = 8: fails the magnitude floor.
        let records = vec![member(0, 13.0, 0.0)];
        let flags = flag_white_dwarfs(&records, &groups, &WhiteDwarfCut::default());
        assert!(flags.is_empty());
    }

    #[test]
    fn test_cooling_track_line() {
        let cut = WhiteDwarfCut::default();
        // color 0.24 puts the line at 0.24 * 5.556 + 10.111 ~ 11.44;
        // M = 11 sits above the line on the diagram, so it is not a
        // white dwarf even though it passes the other two criteria.
        assert!(!is_white_dwarf(0.24, 11.0, &cut));
        assert!(is_white_dwarf(0.24, 11.5, &cut));
        // Too red regardless of magnitude.
        assert!(!is_white_dwarf(0.5, 13.0, &cut));
    }

    #[test]
    fn test_rejected_groups_yield_no_flags() {
        let groups = vec![group(0, 100.0, false)];
        let records = vec![member(0, 16.0, 0.0)];
        let flags = flag_white_dwarfs(&records, &groups, &WhiteDwarfCut::default());
        assert!(flags.is_empty());
    }

    #[test]
    fn test_noise_and_other_labels_not_scanned() {
        let groups = vec![group(0, 100.0, true)];
        let mut stray = member(1, 16.0, 0.0);
        stray.cluster_label = ClusterLabel::Cluster(1);
        let mut noise = member(0, 16.0, 0.0);
        noise.cluster_label = ClusterLabel::Noise;
        let flags = flag_white_dwarfs(&[stray, noise], &groups, &WhiteDwarfCut::default());
        assert!(flags.is_empty());
    }

    #[test]
    fn test_per_star_distance_option() {
        let groups = vec![group(0, 400.0, true)];
        // Bulk distance 400 pc puts M at 16 - 8.0 ~ 8, under the floor;
        // the star's own 100 pc distance puts it at 11.
        let records = vec![member(0, 16.0, 0.0)];

        let flags = flag_white_dwarfs(&records, &groups, &WhiteDwarfCut::default());
        assert!(flags.is_empty());

        let cut = WhiteDwarfCut {
            per_star_distance: true,
            ..WhiteDwarfCut::default()
        };
        let flags = flag_white_dwarfs(&records, &groups, &cut);
        assert_eq!(flags.len(), 1);
        assert!((flags[0].absolute_magnitude - 11.0).abs() < 1e-9);
    }

    #[test]
    fn test_flags_do_not_mutate_records() {
        let groups = vec![group(0, 100.0, true)];
        let records = vec![member(0, 16.0, 0.0)];
        let before = records.clone();
        let _ = flag_white_dwarfs(&records, &groups, &WhiteDwarfCut::default());
        for (a, b) in records.iter().zip(before.iter()) {
            assert_eq!(a.cluster_label, b.cluster_label);
            assert_eq!(a.apparent_magnitude, b.apparent_magnitude);
        }
    }
}
