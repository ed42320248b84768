//! Density-based clustering of the scaled feature space.
//!
//! The screening pipeline only relies on the contract in
//! [`ClusterEngine`]: given the n x 5 feature matrix and two density
//! parameters, produce one label per row (noise reserved) and a
//! membership probability per row. [`DensityEngine`] is the bundled
//! implementation; any primitive honoring the contract can be swapped in
//! through the trait.

use std::collections::VecDeque;

use crate::config::EngineConfig;
use crate::error::PipelineError;
use crate::models::ClusterLabel;
use crate::scaling::FeatureRow;
use crate::stats;

/// Per-record clustering outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub label: ClusterLabel,
    /// Membership confidence in [0, 1]; exactly 0.0 for noise.
    pub probability: f64,
}

/// Contract consumed by the pipeline.
///
/// Implementations must return exactly one assignment per input row, in
/// row order, and must be deterministic for fixed inputs and parameters:
/// the pipeline never retries a clustering failure.
pub trait ClusterEngine {
    fn cluster(&self, features: &[FeatureRow]) -> Result<Vec<Assignment>, PipelineError>;
}

/// Bundled density clusterer.
///
/// A point's core distance is its distance to the `min_samples`-th
/// nearest neighbor; the neighborhood radius is the median core distance
/// over the field, so the density requirement adapts to the feature
/// scaling instead of needing a hand-picked radius. Groups are grown
/// from core points by neighborhood expansion, and any group smaller
/// than `min_group_size` is folded back into noise. One blocking pass,
/// quadratic in the record count.
pub struct DensityEngine {
    config: EngineConfig,
}

impl DensityEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    fn neighbors(features: &[FeatureRow], center: usize, radius: f64) -> Vec<usize> {
        (0..features.len())
            .filter(|&j| j != center && euclidean(&features[center], &features[j]) <= radius)
            .collect()
    }
}

fn euclidean(a: &FeatureRow, b: &FeatureRow) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// Distance from each point to its k-th nearest neighbor (self excluded);
/// infinite when the field has fewer than k other points.
fn core_distances(features: &[FeatureRow], k: usize) -> Vec<f64> {
    let n = features.len();
    (0..n)
        .map(|i| {
            let mut dists: Vec<f64> = (0..n)
                .filter(|&j| j != i)
                .map(|j| euclidean(&features[i], &features[j]))
                .collect();
            if dists.len() < k {
                return f64::INFINITY;
            }
            dists.select_nth_unstable_by(k - 1, |a, b| {
                a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal)
            });
            dists[k - 1]
        })
        .collect()
}

impl ClusterEngine for DensityEngine {
    fn cluster(&self, features: &[FeatureRow]) -> Result<Vec<Assignment>, PipelineError> {
        for (row, feature) in features.iter().enumerate() {
            if feature.iter().any(|v| !v.is_finite()) {
                return Err(PipelineError::NonFiniteFeature { row });
            }
        }

        let n = features.len();
        if n == 0 {
            return Ok(Vec::new());
        }

        let k = self.config.min_samples.max(1);
        let core = core_distances(features, k);

        let finite: Vec<f64> = core.iter().cloned().filter(|d| d.is_finite()).collect();
        if finite.is_empty() {
            // Too few points to form any neighborhood.
            return Ok(vec![
                Assignment {
                    label: ClusterLabel::Noise,
                    probability: 0.0,
                };
                n
            ]);
        }
        let radius = stats::median(&finite);

        // Neighborhood expansion from core points, in row order so the
        // labeling is deterministic.
        let mut labels: Vec<Option<u32>> = vec![None; n];
        let mut visited = vec![false; n];
        let mut next_label = 0u32;

        for i in 0..n {
            if visited[i] {
                continue;
            }
            visited[i] = true;
            if core[i] > radius {
                continue;
            }

            let label = next_label;
            next_label += 1;
            labels[i] = Some(label);

            let mut seeds: VecDeque<usize> = Self::neighbors(features, i, radius).into();
            while let Some(j) = seeds.pop_front() {
                if !visited[j] {
                    visited[j] = true;
                    if core[j] <= radius {
                        seeds.extend(Self::neighbors(features, j, radius));
                    }
                }
                if labels[j].is_none() {
                    labels[j] = Some(label);
                }
            }
        }

        // Fold undersized groups into noise, then renumber the survivors
        // compactly in order of first appearance.
        let mut sizes = vec![0usize; next_label as usize];
        for label in labels.iter().flatten() {
            sizes[*label as usize] += 1;
        }
        let mut renumber: Vec<Option<u32>> = vec![None; next_label as usize];
        let mut kept = 0u32;
        for i in 0..n {
            if let Some(label) = labels[i] {
                if sizes[label as usize] >= self.config.min_group_size
                    && renumber[label as usize].is_none()
                {
                    renumber[label as usize] = Some(kept);
                    kept += 1;
                }
            }
        }

        let assignments = (0..n)
            .map(|i| match labels[i].and_then(|l| renumber[l as usize]) {
                Some(id) => Assignment {
                    label: ClusterLabel::Cluster(id),
                    // Core points sit at full confidence; border points
                    // fall off with their core-distance excess.
                    probability: if core[i] <= radius {
                        1.0
                    } else {
                        (radius / core[i]).clamp(0.0, 1.0)
                    },
                },
                None => Assignment {
                    label: ClusterLabel::Noise,
                    probability: 0.0,
                },
            })
            .collect();

        Ok(assignments)
    }
}
