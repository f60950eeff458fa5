//! Range-of-motion aggregation over per-joint angle histories.

use physio_core::{AngleSample, Joint, JointPair};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Range-of-motion summary, all values rounded to whole degrees
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeOfMotion {
    pub min: i32,
    pub max: i32,
    pub average: i32,
    pub range: i32,
}

impl RangeOfMotion {
    /// Summarize a sequence of angles in one pass.
    ///
    /// Non-finite values are skipped. An empty sequence (or one with no finite
    /// values) gives the all-zero summary.
    pub fn from_angles(angles: &[f64]) -> Self {
        Self::from_values(angles.iter().copied())
    }

    fn from_values<I: IntoIterator<Item = f64>>(angles: I) -> Self {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        let mut count = 0usize;

        for angle in angles.into_iter().filter(|a| a.is_finite()) {
            min = min.min(angle);
            max = max.max(angle);
            sum += angle;
            count += 1;
        }

        if count == 0 {
            return Self::default();
        }

        Self {
            min: min.round() as i32,
            max: max.round() as i32,
            average: (sum / count as f64).round() as i32,
            range: (max - min).round() as i32,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Append-only per-joint angle series for one session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AngleHistory {
    series: BTreeMap<Joint, Vec<f64>>,
}

impl AngleHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append every finite angle of the sample to its joint's series
    pub fn record(&mut self, sample: &AngleSample) {
        for (joint, degrees) in sample.iter().filter(|(_, d)| d.is_finite()) {
            self.series.entry(joint).or_default().push(degrees);
        }
    }

    pub fn series(&self, joint: Joint) -> &[f64] {
        self.series.get(&joint).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn range_of_motion(&self, joint: Joint) -> RangeOfMotion {
        RangeOfMotion::from_angles(self.series(joint))
    }

    /// Range of motion across both sides of a joint pair
    pub fn pair_range_of_motion(&self, pair: JointPair) -> RangeOfMotion {
        let [left, right] = pair.sides();
        RangeOfMotion::from_values(
            self.series(left)
                .iter()
                .chain(self.series(right))
                .copied(),
        )
    }

    /// Range of motion for every joint with at least one sample
    pub fn summary(&self) -> BTreeMap<Joint, RangeOfMotion> {
        self.series
            .iter()
            .map(|(joint, angles)| (*joint, RangeOfMotion::from_angles(angles)))
            .collect()
    }

    pub fn joints(&self) -> impl Iterator<Item = Joint> + '_ {
        self.series.keys().copied()
    }

    pub fn total_samples(&self) -> usize {
        self.series.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn clear(&mut self) {
        self.series.clear();
    }
}

/// Convenience wrapper over [`RangeOfMotion::from_angles`]
pub fn track_range_of_motion(angles: &[f64]) -> RangeOfMotion {
    RangeOfMotion::from_angles(angles)
}
