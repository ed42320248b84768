//! Pipeline configuration.
//!
//! Every threshold and weight the screening stages use is carried in
//! these immutable values and threaded through the pipeline explicitly;
//! nothing is read from process-wide state.

/// Settings for the RA wraparound normalizer.
#[derive(Debug, Clone)]
pub struct NormalizerConfig {
    /// Field span (degrees) beyond which the RA set is assumed to
    /// straddle the 0/360 seam. Also used as the split point between the
    /// low and high branches, so it must sit between them; 200 works for
    /// any survey field small enough to cluster.
    pub wrap_threshold_deg: f64,
    /// Per-record branch correction limit (degrees): recentered values
    /// beyond this are shifted by 360 onto the continuous branch. Two
    /// conventions exist in practice, 180 and 300; both behave the same
    /// for compact fields.
    pub branch_threshold_deg: f64,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            wrap_threshold_deg: 200.0,
            branch_threshold_deg: 180.0,
        }
    }
}

/// Settings for the physical-unit feature scaling.
#[derive(Debug, Clone)]
pub struct ScalerConfig {
    /// Additive correction (mas) for the known systematic parallax
    /// offset, applied before inverting to distance.
    pub parallax_zeropoint_mas: f64,
    /// Divisor applied to distance for the parallax feature axis, to
    /// keep it on a scale comparable to the angular axes.
    pub distance_divisor: f64,
    /// Multiplier applied to both proper motion axes so kinematic and
    /// spatial separations produce comparable cluster widths. Dataset
    /// dependent, not a physical constant.
    pub proper_motion_weight: f64,
}

impl Default for ScalerConfig {
    fn default() -> Self {
        Self {
            parallax_zeropoint_mas: 0.03,
            distance_divisor: 5.0,
            proper_motion_weight: 10.0,
        }
    }
}

/// Parameters handed to the density clustering engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Smallest group size the engine may report; anything smaller is
    /// folded into noise.
    pub min_group_size: usize,
    /// Minimum neighborhood density (sample count) for a source to be
    /// considered inside a group. 64 is a reasonable starting point for
    /// a 5-dimensional feature space; vary it by up to a factor of two
    /// when a clear proper-motion group is missed.
    pub min_samples: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_group_size: 50,
            min_samples: 64,
        }
    }
}

/// Acceptance thresholds separating genuine clusters from field
/// artifacts.
#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    /// Cap on the proper-motion IQR per axis, km/s. Field overdensities
    /// show kinematic spreads well above what a bound cluster allows.
    pub pm_iqr_cap_kms: f64,
    /// Cap on the member distance IQR, parsecs.
    pub distance_iqr_cap_pc: f64,
    /// Absolute magnitude above which a member counts as faint.
    pub faint_magnitude_threshold: f64,
    /// Cap on the fraction of faint members; groups dominated by faint
    /// background contamination fail this.
    pub faint_fraction_cap: f64,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            pm_iqr_cap_kms: 3.0,
            distance_iqr_cap_pc: 300.0,
            faint_magnitude_threshold: 10.0,
            faint_fraction_cap: 0.8,
        }
    }
}

impl ValidatorConfig {
    /// Variant used when screening for white dwarf members: the distance
    /// cap is relaxed to 500 pc so the faint end of a cluster is not
    /// trimmed away before the photometric cut sees it.
    pub fn white_dwarf_search() -> Self {
        Self {
            distance_iqr_cap_pc: 500.0,
            ..Self::default()
        }
    }
}

/// Photometric cut isolating the white dwarf locus on the
/// color-magnitude diagram.
///
/// The cut assumes zero interstellar reddening, and by default computes
/// absolute magnitudes from the adopted (median) cluster distance rather
/// than each star's own parallax. Both are simplifications inherited
/// from the screening procedure, kept tunable rather than corrected.
#[derive(Debug, Clone)]
pub struct WhiteDwarfCut {
    /// Flag only sources bluer than this color index.
    pub color_max: f64,
    /// Flag only sources fainter than this absolute magnitude.
    pub magnitude_floor: f64,
    /// Slope of the cooling-track line in color-magnitude space.
    pub line_slope: f64,
    /// Intercept of the cooling-track line.
    pub line_intercept: f64,
    /// Use each star's own parallax distance for the absolute magnitude
    /// instead of the cluster median distance.
    pub per_star_distance: bool,
}

impl Default for WhiteDwarfCut {
    fn default() -> Self {
        Self {
            color_max: 0.25,
            magnitude_floor: 9.0,
            line_slope: 5.556,
            line_intercept: 10.111,
            per_star_distance: false,
        }
    }
}

/// Full configuration for one pipeline run.
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    pub normalizer: NormalizerConfig,
    pub scaler: ScalerConfig,
    pub engine: EngineConfig,
    pub validator: ValidatorConfig,
    pub white_dwarf: WhiteDwarfCut,
    pub extract_label: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_values() {
        let config = PipelineConfig::default();
        assert_eq!(config.normalizer.wrap_threshold_deg, 200.0);
        assert_eq!(config.normalizer.branch_threshold_deg, 180.0);
        assert_eq!(config.scaler.parallax_zeropoint_mas, 0.03);
        assert_eq!(config.scaler.distance_divisor, 5.0);
        assert_eq!(config.scaler.proper_motion_weight, 10.0);
        assert_eq!(config.engine.min_group_size, 50);
        assert_eq!(config.engine.min_samples, 64);
        assert_eq!(config.validator.pm_iqr_cap_kms, 3.0);
        assert_eq!(config.validator.distance_iqr_cap_pc, 300.0);
        assert_eq!(config.white_dwarf.color_max, 0.25);
        assert_eq!(config.extract_label, 0);
    }

    #[test]
    fn test_white_dwarf_preset_relaxes_distance_cap() {
        let config = ValidatorConfig::white_dwarf_search();
        assert_eq!(config.distance_iqr_cap_pc, 500.0);
        // Kinematic and faintness criteria are unchanged.
        assert_eq!(config.pm_iqr_cap_kms, 3.0);
        assert_eq!(config.faint_fraction_cap, 0.8);
    }
}
