use clap::{Parser, Subcommand};

use crate::config::{
    EngineConfig, NormalizerConfig, PipelineConfig, ScalerConfig, ValidatorConfig, WhiteDwarfCut,
};

#[derive(Parser)]
#[command(name = "cluster-guard")]
#[command(
    about = "Screen astrometric survey extracts for open clusters and white dwarf members",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the screening pipeline and report validated clusters plus white dwarf candidates
    Analyze {
        /// Input CSV extract (Gaia archive column names accepted)
        input: String,

        /// Output format (json, csv, table)
        #[arg(short, long, default_value = "table")]
        format: String,

        /// Write the enriched record set to this CSV file
        #[arg(long)]
        output_records: Option<String>,

        /// Write the white dwarf report to this CSV file
        #[arg(long)]
        output_flags: Option<String>,

        #[command(flatten)]
        options: PipelineOptions,
    },

    /// Show summary statistics for every candidate group, rejected ones included
    ListClusters {
        /// Input CSV extract
        input: String,

        /// Output format (json, csv, table)
        #[arg(short, long, default_value = "table")]
        format: String,

        #[command(flatten)]
        options: PipelineOptions,
    },

    /// Write the members of one cluster label to a CSV file for follow-up analysis
    Extract {
        /// Input CSV extract
        input: String,

        /// Output CSV path
        output: String,

        /// Cluster label to extract (defaults to the configured label, usually 0)
        #[arg(short, long)]
        label: Option<u32>,

        #[command(flatten)]
        options: PipelineOptions,
    },
}

#[derive(Parser, Debug, Clone)]
pub struct PipelineOptions {
    /// Field span in degrees beyond which the RA set is assumed to straddle 0/360
    #[arg(long, default_value = "200.0")]
    pub wrap_threshold: f64,

    /// Branch correction limit in degrees for recentered RA (180 and 300 are the common conventions)
    #[arg(long, default_value = "180.0")]
    pub branch_threshold: f64,

    /// Parallax zeropoint correction in mas
    #[arg(long, default_value = "0.03")]
    pub parallax_zeropoint: f64,

    /// Distance divisor for the parallax feature axis
    #[arg(long, default_value = "5.0")]
    pub distance_divisor: f64,

    /// Weight applied to both proper motion axes
    #[arg(long, default_value = "10.0")]
    pub pm_weight: f64,

    /// Minimum group size reported by the clustering engine
    #[arg(long, default_value = "50")]
    pub min_group_size: usize,

    /// Minimum neighborhood sample count (density requirement)
    #[arg(long, default_value = "64")]
    pub min_samples: usize,

    /// Proper-motion IQR cap per axis, km/s
    #[arg(long, default_value = "3.0")]
    pub pm_iqr_cap: f64,

    /// Distance IQR cap in pc (default 300, or 500 with --wd-search)
    #[arg(long)]
    pub distance_iqr_cap: Option<f64>,

    /// Use the white-dwarf-oriented validation preset
    #[arg(long)]
    pub wd_search: bool,

    /// Absolute magnitude above which a member counts as faint
    #[arg(long, default_value = "10.0")]
    pub faint_threshold: f64,

    /// Cap on the faint member fraction
    #[arg(long, default_value = "0.8")]
    pub faint_fraction_cap: f64,

    /// White dwarf cut: maximum color index
    #[arg(long, default_value = "0.25")]
    pub wd_color_max: f64,

    /// White dwarf cut: minimum absolute magnitude
    #[arg(long, default_value = "9.0")]
    pub wd_magnitude_floor: f64,

    /// White dwarf cut: cooling track line slope
    #[arg(long, default_value = "5.556")]
    pub wd_line_slope: f64,

    /// White dwarf cut: cooling track line intercept
    #[arg(long, default_value = "10.111")]
    pub wd_line_intercept: f64,

    /// Evaluate the white dwarf cut at per-star distances instead of the cluster distance
    #[arg(long)]
    pub per_star_distance: bool,

    /// Cluster label used by the extract command when none is given
    #[arg(long, default_value = "0")]
    pub extract_label: u32,
}

impl PipelineOptions {
    pub fn to_pipeline_config(&self) -> PipelineConfig {
        let mut validator = if self.wd_search {
            ValidatorConfig::white_dwarf_search()
        } else {
            ValidatorConfig::default()
        };
        validator.pm_iqr_cap_kms = self.pm_iqr_cap;
        if let Some(cap) = self.distance_iqr_cap {
            validator.distance_iqr_cap_pc = cap;
        }
        validator.faint_magnitude_threshold = self.faint_threshold;
        validator.faint_fraction_cap = self.faint_fraction_cap;

        PipelineConfig {
            normalizer: NormalizerConfig {
                wrap_threshold_deg: self.wrap_threshold,
                branch_threshold_deg: self.branch_threshold,
            },
            scaler: ScalerConfig {
                parallax_zeropoint_mas: self.parallax_zeropoint,
                distance_divisor: self.distance_divisor,
                proper_motion_weight: self.pm_weight,
            },
            engine: EngineConfig {
                min_group_size: self.min_group_size,
                min_samples: self.min_samples,
            },
            validator,
            white_dwarf: WhiteDwarfCut {
                color_max: self.wd_color_max,
                magnitude_floor: self.wd_magnitude_floor,
                line_slope: self.wd_line_slope,
                line_intercept: self.wd_line_intercept,
                per_star_distance: self.per_star_distance,
            },
            extract_label: self.extract_label,
        }
    }
}
