//! Anisotropic physical-unit scaling of the astrometric parameters.
//!
//! The five clustering axes are deliberately distance-dependent: with
//! increasing distance the apparent spread of true cluster members in
//! angle and proper motion grows with the measurement errors, so angular
//! offsets are converted to linear (parsec) separations and proper
//! motions are up-weighted until kinematic and spatial separations
//! produce comparable cluster widths. The divisor and weight are
//! dataset-tunable, not physical constants.

use crate::config::ScalerConfig;
use crate::error::PipelineError;
use crate::models::StarRecord;

/// One row of the feature matrix handed to the clustering engine:
/// scaled RA, scaled DEC, weighted pmRA, weighted pmDEC, scaled distance.
pub type FeatureRow = [f64; 5];

/// Distance in parsecs from a zeropoint-corrected parallax in mas.
///
/// Defined only for a positive corrected parallax; callers must filter
/// non-positive values beforehand or get a domain error from
/// [`scale_records`].
pub fn parallax_to_distance(parallax_mas: f64, zeropoint_mas: f64) -> Option<f64> {
    let corrected = parallax_mas + zeropoint_mas;
    if corrected > 0.0 {
        Some(1.0 / (corrected * 1e-3))
    } else {
        None
    }
}

/// Apparent magnitude normalized to the standard 10 pc distance.
pub fn absolute_magnitude(apparent: f64, distance_pc: f64) -> f64 {
    apparent - 5.0 * (distance_pc / 10.0).log10()
}

/// Enrich normalized records with distance, absolute magnitude and the
/// declination-compressed RA, and build the feature matrix used only for
/// clustering.
///
/// The returned rows are index-aligned with `records`. Fails with a
/// domain error on the first record whose corrected parallax is not
/// positive; no partial enrichment is kept in that case by the caller.
pub fn scale_records(
    records: &mut [StarRecord],
    config: &ScalerConfig,
) -> Result<Vec<FeatureRow>, PipelineError> {
    let mut features = Vec::with_capacity(records.len());

    for (row, record) in records.iter_mut().enumerate() {
        let distance = parallax_to_distance(record.parallax, config.parallax_zeropoint_mas)
            .ok_or(PipelineError::NonPositiveParallax {
                row,
                parallax: record.parallax,
                zeropoint: config.parallax_zeropoint_mas,
            })?;

        record.distance = distance;
        record.absolute_magnitude = absolute_magnitude(record.apparent_magnitude, distance);
        // Meridians converge toward the poles; cos(dec) turns the RA
        // offset into a true angular separation before it is projected
        // to parsecs.
        record.ra_transformed = record.ra_normalized * record.dec.to_radians().cos();

        features.push([
            record.ra_transformed.to_radians() * distance,
            record.dec.to_radians() * distance,
            record.pmra * config.proper_motion_weight,
            record.pmdec * config.proper_motion_weight,
            distance / config.distance_divisor,
        ]);
    }

    Ok(features)
}
