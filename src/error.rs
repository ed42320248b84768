use thiserror::Error;

/// Errors raised by the screening pipeline.
///
/// The pipeline emits no partial results: any of these aborts the run
/// before output is produced.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The corrected parallax is zero or negative, so no distance can be
    /// derived. Callers are expected to pre-filter such sources.
    #[error(
        "record {row}: parallax {parallax} mas with zeropoint {zeropoint} mas \
         gives a non-positive corrected parallax; distance is undefined"
    )]
    NonPositiveParallax {
        row: usize,
        parallax: f64,
        zeropoint: f64,
    },

    /// A feature value was NaN or infinite; the feature matrix handed to
    /// the clustering engine must be finite everywhere.
    #[error("record {row}: non-finite value in feature matrix")]
    NonFiniteFeature { row: usize },

    /// The clustering engine returned a label set that does not line up
    /// with the input records.
    #[error("clustering returned {got} assignments for {expected} records")]
    AssignmentMismatch { expected: usize, got: usize },
}
