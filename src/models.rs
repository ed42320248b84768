use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Cluster assignment for one source.
///
/// Density clustering reserves one label for sources that belong to no
/// group; that label is carried here as an explicit variant rather than
/// as a magic integer. The integer convention (noise = -1, groups
/// numbered from 0) only appears at the serialization boundary, where
/// downstream tabular tooling expects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClusterLabel {
    /// Not assigned to any density-based group.
    Noise,
    /// Member of the group with this id.
    Cluster(u32),
}

impl ClusterLabel {
    pub fn is_noise(&self) -> bool {
        matches!(self, ClusterLabel::Noise)
    }

    pub fn id(&self) -> Option<u32> {
        match self {
            ClusterLabel::Noise => None,
            ClusterLabel::Cluster(id) => Some(*id),
        }
    }

    /// Integer form used in exported tables: -1 for noise.
    pub fn as_i64(&self) -> i64 {
        match self {
            ClusterLabel::Noise => -1,
            ClusterLabel::Cluster(id) => *id as i64,
        }
    }

    /// Inverse of [`ClusterLabel::as_i64`]; any negative value reads back
    /// as noise.
    pub fn from_i64(value: i64) -> Self {
        if value < 0 {
            ClusterLabel::Noise
        } else {
            ClusterLabel::Cluster(value as u32)
        }
    }
}

impl Serialize for ClusterLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.as_i64())
    }
}

impl<'de> Deserialize<'de> for ClusterLabel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = i64::deserialize(deserializer)?;
        Ok(ClusterLabel::from_i64(value))
    }
}

/// One astrometric source from the survey extract.
///
/// The first block of fields comes straight from the catalog; the rest
/// are derived in a fixed order by the pipeline stages (normalizer,
/// scaler, clustering engine) and are read-only afterwards. Derived
/// fields hold their defaults until the owning stage has run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StarRecord {
    /// Catalog source identifier, when the extract provides one.
    pub source_id: Option<i64>,
    /// Right ascension in degrees, [0, 360).
    pub ra: f64,
    /// Declination in degrees.
    pub dec: f64,
    /// Proper motion along RA, mas/yr.
    pub pmra: f64,
    /// Proper motion along DEC, mas/yr.
    pub pmdec: f64,
    /// Measured parallax, mas.
    pub parallax: f64,
    pub apparent_magnitude: f64,
    pub color_index: f64,

    /// RA recentered on the field center, on one continuous branch.
    pub ra_normalized: f64,
    /// `ra_normalized` compressed by cos(dec); the angular feature used
    /// for position dispersion measurements.
    pub ra_transformed: f64,
    /// Distance in parsecs, from the zeropoint-corrected parallax.
    pub distance: f64,
    pub absolute_magnitude: f64,
    pub cluster_label: ClusterLabel,
    /// Group membership confidence in [0, 1]; exactly 0.0 for noise.
    pub membership_probability: f64,
}

impl StarRecord {
    /// Build a record from the catalog fields; derived fields start at
    /// their defaults and are filled in by the pipeline.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        source_id: Option<i64>,
        ra: f64,
        dec: f64,
        pmra: f64,
        pmdec: f64,
        parallax: f64,
        apparent_magnitude: f64,
        color_index: f64,
    ) -> Self {
        Self {
            source_id,
            ra,
            dec,
            pmra,
            pmdec,
            parallax,
            apparent_magnitude,
            color_index,
            ra_normalized: 0.0,
            ra_transformed: 0.0,
            distance: 0.0,
            absolute_magnitude: 0.0,
            cluster_label: ClusterLabel::Noise,
            membership_probability: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cluster_label_integer_convention() {
        assert_eq!(ClusterLabel::Noise.as_i64(), -1);
        assert_eq!(ClusterLabel::Cluster(0).as_i64(), 0);
        assert_eq!(ClusterLabel::Cluster(7).as_i64(), 7);
        assert_eq!(ClusterLabel::from_i64(-1), ClusterLabel::Noise);
        assert_eq!(ClusterLabel::from_i64(-5), ClusterLabel::Noise);
        assert_eq!(ClusterLabel::from_i64(3), ClusterLabel::Cluster(3));
    }

    #[test]
    fn test_cluster_label_serde_roundtrip() {
        let json = serde_json::to_string(&ClusterLabel::Cluster(2)).unwrap();
        assert_eq!(json, "2");
        let json = serde_json::to_string(&ClusterLabel::Noise).unwrap();
        assert_eq!(json, "-1");
        let label: ClusterLabel = serde_json::from_str("-1").unwrap();
        assert_eq!(label, ClusterLabel::Noise);
        let label: ClusterLabel = serde_json::from_str("4").unwrap();
        assert_eq!(label, ClusterLabel::Cluster(4));
    }

    #[test]
    fn test_new_record_defaults() {
        let record = StarRecord::new(Some(42), 120.0, -35.0, 1.5, -2.0, 2.0, 14.0, 0.8);
        assert_eq!(record.source_id, Some(42));
        assert!(record.cluster_label.is_noise());
        assert_eq!(record.membership_probability, 0.0);
        assert_eq!(record.distance, 0.0);
    }

    #[test]
    fn test_record_serialization() {
        let mut record = StarRecord::new(None, 10.0, 5.0, 0.1, 0.2, 1.0, 12.0, 0.5);
        record.cluster_label = ClusterLabel::Cluster(1);
        record.membership_probability = 0.75;

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"cluster_label\":1"));
        assert!(json.contains("\"membership_probability\":0.75"));

        let back: StarRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.cluster_label, ClusterLabel::Cluster(1));
        assert_eq!(back.ra, record.ra);
    }
}
