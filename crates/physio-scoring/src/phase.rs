//! Repetition phases, one closed set per exercise.

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Knee bend cycle: standing, bent below the target angle, straightened again
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KneeBendPhase {
    #[default]
    Start,
    Flexion,
    Extension,
}

impl KneeBendPhase {
    pub fn label(&self) -> &'static str {
        match self {
            KneeBendPhase::Start => "start",
            KneeBendPhase::Flexion => "flexion",
            KneeBendPhase::Extension => "extension",
        }
    }
}

/// Straight-leg raise cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegRaisePhase {
    #[default]
    Start,
    Up,
    Down,
}

impl LegRaisePhase {
    pub fn label(&self) -> &'static str {
        match self {
            LegRaisePhase::Start => "start",
            LegRaisePhase::Up => "up",
            LegRaisePhase::Down => "down",
        }
    }
}

/// Hip flexion cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HipFlexPhase {
    #[default]
    Start,
    Flexed,
    Extended,
}

impl HipFlexPhase {
    pub fn label(&self) -> &'static str {
        match self {
            HipFlexPhase::Start => "start",
            HipFlexPhase::Flexed => "flexed",
            HipFlexPhase::Extended => "extended",
        }
    }
}

/// Phase of whichever exercise is being tracked.
///
/// Serializes as its bare label; the exercise is known from context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    KneeBend(KneeBendPhase),
    LegRaise(LegRaisePhase),
    HipFlex(HipFlexPhase),
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::KneeBend(p) => p.label(),
            Phase::LegRaise(p) => p.label(),
            Phase::HipFlex(p) => p.label(),
        }
    }

    /// True for the resting phase every exercise begins in
    pub fn is_start(&self) -> bool {
        matches!(
            self,
            Phase::KneeBend(KneeBendPhase::Start)
                | Phase::LegRaise(LegRaisePhase::Start)
                | Phase::HipFlex(HipFlexPhase::Start)
        )
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Phase {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl From<KneeBendPhase> for Phase {
    fn from(p: KneeBendPhase) -> Self {
        Phase::KneeBend(p)
    }
}

impl From<LegRaisePhase> for Phase {
    fn from(p: LegRaisePhase) -> Self {
        Phase::LegRaise(p)
    }
}

impl From<HipFlexPhase> for Phase {
    fn from(p: HipFlexPhase) -> Self {
        Phase::HipFlex(p)
    }
}
