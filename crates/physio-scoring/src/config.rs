//! Scoring configuration.

use physio_core::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::exercise::{
    Exercise, ExerciseKind, HipFlexThresholds, KneeBendThresholds, LegRaiseThresholds,
};
use crate::session::GradeScale;

/// Environment prefix for overrides, e.g. `PHYSIO_KNEE_BEND__FLEXION_BELOW=95`
pub const ENV_PREFIX: &str = "PHYSIO";

/// Threshold tables for every exercise plus the session grade scale
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub knee_bend: KneeBendThresholds,
    pub leg_raise: LegRaiseThresholds,
    pub hip_flex: HipFlexThresholds,
    pub grades: GradeScale,
}

impl ScoringConfig {
    /// Load configuration from file, with environment overrides
    pub fn from_file(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(Self::environment())
            .build()?;

        let loaded: Self = settings.try_deserialize()?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Load from environment variables only
    pub fn from_env() -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(Self::environment())
            .build()?;

        let loaded: Self = settings.try_deserialize()?;
        loaded.validate()?;
        Ok(loaded)
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    /// Build the tagged exercise for `kind` from this configuration
    pub fn exercise(&self, kind: ExerciseKind) -> Exercise {
        match kind {
            ExerciseKind::KneeBend => Exercise::KneeBend(self.knee_bend),
            ExerciseKind::LegRaise => Exercise::LegRaise(self.leg_raise),
            ExerciseKind::HipFlex => Exercise::HipFlex(self.hip_flex),
        }
    }

    /// Reject angles outside 0..=180 and bands that overlap the wrong way round
    pub fn validate(&self) -> Result<()> {
        let k = &self.knee_bend;
        let l = &self.leg_raise;
        let h = &self.hip_flex;

        let angles = [
            ("knee_bend.flexion_below", k.flexion_below),
            ("knee_bend.extension_above", k.extension_above),
            ("knee_bend.shallow_min", k.shallow_min),
            ("knee_bend.shallow_max", k.shallow_max),
            ("knee_bend.straight_back_min", k.straight_back_min),
            ("leg_raise.straight_knee_min", l.straight_knee_min),
            ("leg_raise.up_below", l.up_below),
            ("leg_raise.down_above", l.down_above),
            ("leg_raise.low_raise_min", l.low_raise_min),
            ("leg_raise.low_raise_max", l.low_raise_max),
            ("hip_flex.hold_below", h.hold_below),
            ("hip_flex.flexed_below", h.flexed_below),
            ("hip_flex.extended_above", h.extended_above),
        ];
        for (name, degrees) in angles {
            if !(0.0..=180.0).contains(&degrees) {
                return Err(Error::Config(format!(
                    "{name} ({degrees}) must be within 0..=180 degrees"
                )));
            }
        }

        if !(k.flexion_below < k.extension_above) {
            return Err(Error::Config(format!(
                "knee_bend.flexion_below ({}) must be below extension_above ({})",
                k.flexion_below, k.extension_above
            )));
        }
        if !(k.shallow_min <= k.shallow_max) {
            return Err(Error::Config(
                "knee_bend.shallow_min must not exceed shallow_max".to_string(),
            ));
        }
        if k.flexion_below > k.shallow_min {
            return Err(Error::Config(format!(
                "knee_bend.flexion_below ({}) must not exceed shallow_min ({})",
                k.flexion_below, k.shallow_min
            )));
        }

        if !(l.up_below < l.down_above) {
            return Err(Error::Config(format!(
                "leg_raise.up_below ({}) must be below down_above ({})",
                l.up_below, l.down_above
            )));
        }
        if !(l.low_raise_min <= l.low_raise_max) {
            return Err(Error::Config(
                "leg_raise.low_raise_min must not exceed low_raise_max".to_string(),
            ));
        }

        if !(h.hold_below <= h.flexed_below && h.flexed_below < h.extended_above) {
            return Err(Error::Config(
                "hip_flex thresholds must satisfy hold_below <= flexed_below < extended_above"
                    .to_string(),
            ));
        }
        if h.hold_score > 100 || h.partial_score > 100 || h.transition_score > 100 {
            return Err(Error::Config("hip_flex scores must be within 0..=100".to_string()));
        }

        if !self.grades.is_ordered() {
            return Err(Error::Config(format!(
                "grade cut-offs must be strictly descending: {:?}",
                self.grades
            )));
        }

        Ok(())
    }
}
