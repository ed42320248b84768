//! Right ascension normalization around the 0/360 wraparound.
//!
//! A survey field that straddles the RA seam shows up as two groups of
//! values near 0 and near 360; fed to a distance-based clusterer as-is,
//! the same field splits in two. The normalizer detects the straddle,
//! moves both branches onto one continuous interval, and recenters every
//! record on the field midpoint. Fields near the celestial poles are a
//! known limitation: recentering RA there is not physically meaningful,
//! and no clusters are screened in those regions.

use serde::{Deserialize, Serialize};

use crate::config::NormalizerConfig;
use crate::models::StarRecord;

/// Shared recentering result for one field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecenterSolution {
    /// Field center (degrees) subtracted from every RA.
    pub center_deg: f64,
    /// Whether the field was detected to straddle the seam.
    pub wrapped: bool,
}

/// Shift an already-recentered angle onto the continuous branch nearest
/// zero: values beyond the threshold are brought back by one full turn.
pub fn branch_correct(angle_deg: f64, threshold_deg: f64) -> f64 {
    if angle_deg > threshold_deg {
        angle_deg - 360.0
    } else if angle_deg < -threshold_deg {
        angle_deg + 360.0
    } else {
        angle_deg
    }
}

/// Resolve the RA wraparound for a whole field and fill in
/// `ra_normalized` on every record.
///
/// Total over any finite input: a degenerate single-point or zero-width
/// field yields a zero-width solution, and an empty set a trivial one.
pub fn normalize_field(records: &mut [StarRecord], config: &NormalizerConfig) -> RecenterSolution {
    if records.is_empty() {
        return RecenterSolution {
            center_deg: 0.0,
            wrapped: false,
        };
    }

    let mut ra_min = f64::INFINITY;
    let mut ra_max = f64::NEG_INFINITY;
    for record in records.iter() {
        ra_min = ra_min.min(record.ra);
        ra_max = ra_max.max(record.ra);
    }

    let mut wrapped = false;
    if ra_max - ra_min > config.wrap_threshold_deg {
        // The span can only get this large by straddling the seam. The
        // effective bounds are the low-branch maximum (~5 deg) and the
        // high-branch minimum (~355 deg); whichever branch sits farther
        // from the seam is shifted by a full turn so both bounds lie on
        // one continuous interval.
        let low_max = records
            .iter()
            .map(|r| r.ra)
            .filter(|ra| *ra < config.wrap_threshold_deg)
            .fold(f64::NEG_INFINITY, f64::max);
        let high_min = records
            .iter()
            .map(|r| r.ra)
            .filter(|ra| *ra > config.wrap_threshold_deg)
            .fold(f64::INFINITY, f64::min);

        if low_max.is_finite() && high_min.is_finite() {
            wrapped = true;
            if high_min < 360.0 - low_max {
                ra_min = high_min;
                ra_max = low_max + 360.0;
            } else {
                ra_min = high_min - 360.0;
                ra_max = low_max;
            }
        }
    }

    let center = (ra_min + ra_max) / 2.0;
    for record in records.iter_mut() {
        let recentered = record.ra - center;
        record.ra_normalized = if wrapped {
            branch_correct(recentered, config.branch_threshold_deg)
        } else {
            recentered
        };
    }

    RecenterSolution {
        center_deg: center,
        wrapped,
    }
}
