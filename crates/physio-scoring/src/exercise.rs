//! Exercise phase classification and per-frame form scoring.
//!
//! Each supported exercise is a variant of [`Exercise`] carrying its own
//! threshold table. Classification is a pure function of the current angles
//! and the previous phase: a repetition is counted only when the limb returns
//! to its rest band after having reached the target band, so noise around a
//! single threshold cannot produce extra reps.
//!
//! | Exercise | Driving angle | Target phase | Rest phase |
//! |----------|---------------|--------------|------------|
//! | Knee bend | min knee | `flexion` (< 90°) | `extension` (> 160°) |
//! | Leg raise | min hip | `up` (< 120°) | `down` (> 160°) |
//! | Hip flexion | min hip | `flexed` (< 120°) | `extended` (> 160°) |

use physio_core::{AngleSample, Error, JointPair};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::phase::{HipFlexPhase, KneeBendPhase, LegRaisePhase, Phase};

pub const FEEDBACK_UNDETECTED: &str = "Unable to detect pose";
pub const FEEDBACK_UNRECOGNIZED: &str = "Exercise not recognized";

const MAX_SCORE: i32 = 100;

/// Supported exercise kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExerciseKind {
    KneeBend,
    LegRaise,
    HipFlex,
}

impl ExerciseKind {
    pub const ALL: [ExerciseKind; 3] = [
        ExerciseKind::KneeBend,
        ExerciseKind::LegRaise,
        ExerciseKind::HipFlex,
    ];

    /// Match a user-facing label, ignoring case and accepting either a space
    /// or a hyphen between words ("knee bends", "Leg-Raise", "hip flexion").
    pub fn from_label(label: &str) -> Option<Self> {
        let normalized = label.trim().to_lowercase().replace('-', " ");
        let words: Vec<&str> = normalized.split_whitespace().collect();

        match words.as_slice() {
            ["knee", "bend" | "bends"] => Some(ExerciseKind::KneeBend),
            ["leg", "raise" | "raises"] => Some(ExerciseKind::LegRaise),
            ["hip", "flex" | "flexion" | "flexions"] => Some(ExerciseKind::HipFlex),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExerciseKind::KneeBend => "knee bends",
            ExerciseKind::LegRaise => "leg raises",
            ExerciseKind::HipFlex => "hip flexion",
        }
    }

    /// Joint pair whose range of motion summarizes the exercise
    pub fn primary_joint(&self) -> JointPair {
        match self {
            ExerciseKind::KneeBend => JointPair::Knee,
            ExerciseKind::LegRaise | ExerciseKind::HipFlex => JointPair::Hip,
        }
    }

    pub fn initial_phase(&self) -> Phase {
        match self {
            ExerciseKind::KneeBend => KneeBendPhase::Start.into(),
            ExerciseKind::LegRaise => LegRaisePhase::Start.into(),
            ExerciseKind::HipFlex => HipFlexPhase::Start.into(),
        }
    }
}

impl fmt::Display for ExerciseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ExerciseKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| Error::UnknownExercise(s.to_string()))
    }
}

/// Knee bend thresholds (degrees) and penalties (points)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KneeBendThresholds {
    /// Knee angle below which the bend counts as deep flexion
    pub flexion_below: f64,
    /// Knee angle above which the leg counts as extended
    pub extension_above: f64,
    /// Lower edge of the "shallow bend" band
    pub shallow_min: f64,
    /// Upper edge of the "shallow bend" band
    pub shallow_max: f64,
    /// Hip angle below which the back is considered bent
    pub straight_back_min: f64,
    pub back_penalty: u8,
    pub shallow_penalty: u8,
}

impl Default for KneeBendThresholds {
    fn default() -> Self {
        Self {
            flexion_below: 90.0,
            extension_above: 160.0,
            shallow_min: 120.0,
            shallow_max: 160.0,
            straight_back_min: 150.0,
            back_penalty: 20,
            shallow_penalty: 10,
        }
    }
}

/// Straight-leg raise thresholds (degrees) and penalties (points)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegRaiseThresholds {
    /// Knee angle the working leg must stay above
    pub straight_knee_min: f64,
    /// Hip angle below which the leg counts as raised
    pub up_below: f64,
    /// Hip angle above which the leg counts as lowered
    pub down_above: f64,
    /// Lower edge of the "raise higher" band
    pub low_raise_min: f64,
    /// Upper edge of the "raise higher" band
    pub low_raise_max: f64,
    pub bent_knee_penalty: u8,
    pub low_raise_penalty: u8,
}

impl Default for LegRaiseThresholds {
    fn default() -> Self {
        Self {
            straight_knee_min: 150.0,
            up_below: 120.0,
            down_above: 160.0,
            low_raise_min: 140.0,
            low_raise_max: 160.0,
            bent_knee_penalty: 25,
            low_raise_penalty: 10,
        }
    }
}

/// Hip flexion thresholds (degrees) and band scores
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HipFlexThresholds {
    /// Hip angle below which the hold is ideal
    pub hold_below: f64,
    /// Hip angle below which the leg counts as flexed
    pub flexed_below: f64,
    /// Hip angle above which the leg counts as extended
    pub extended_above: f64,
    pub hold_score: u8,
    pub partial_score: u8,
    pub transition_score: u8,
}

impl Default for HipFlexThresholds {
    fn default() -> Self {
        Self {
            hold_below: 100.0,
            flexed_below: 120.0,
            extended_above: 160.0,
            hold_score: 100,
            partial_score: 80,
            transition_score: 60,
        }
    }
}

/// Result of classifying and scoring one frame
///
/// Serializes flat, with `phase` as the bare label (`"flexion"`, `"up"`, ...).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseState {
    pub phase: Phase,
    /// Form score, always within 0..=100
    pub score: u8,
    pub feedback: String,
    pub rep_completed: bool,
}

impl ExerciseState {
    /// No usable angles this frame; the phase is carried over.
    pub fn undetected(previous: Phase) -> Self {
        Self {
            phase: previous,
            score: 0,
            feedback: FEEDBACK_UNDETECTED.to_string(),
            rep_completed: false,
        }
    }

    pub fn unrecognized(previous: Phase) -> Self {
        Self {
            phase: previous,
            score: 0,
            feedback: FEEDBACK_UNRECOGNIZED.to_string(),
            rep_completed: false,
        }
    }
}

/// Score accumulator: a base score minus penalties, with feedback cues
struct FormCheck {
    score: i32,
    cues: Vec<&'static str>,
}

impl FormCheck {
    fn new(base: u8) -> Self {
        Self {
            score: i32::from(base),
            cues: Vec::new(),
        }
    }

    fn penalize(&mut self, points: u8, cue: &'static str) {
        self.score -= i32::from(points);
        self.cues.push(cue);
    }

    fn cue(&mut self, cue: &'static str) {
        self.cues.push(cue);
    }

    fn finish<P: Into<Phase>>(
        self,
        phase: P,
        rep_completed: bool,
        positive: &str,
    ) -> ExerciseState {
        let feedback = if self.cues.is_empty() {
            positive.to_string()
        } else {
            self.cues.join(". ")
        };

        ExerciseState {
            phase: phase.into(),
            score: self.score.clamp(0, MAX_SCORE) as u8,
            feedback,
            rep_completed,
        }
    }
}

impl KneeBendThresholds {
    fn evaluate(&self, angles: &AngleSample, previous: KneeBendPhase) -> Option<ExerciseState> {
        let knee = angles.pair_min(JointPair::Knee)?;
        let hip = angles.pair_min(JointPair::Hip)?;

        let mut check = FormCheck::new(100);
        if hip < self.straight_back_min {
            check.penalize(self.back_penalty, "Keep your back straight");
        }

        let mut phase = previous;
        let mut rep_completed = false;

        if knee < self.flexion_below {
            if matches!(previous, KneeBendPhase::Start | KneeBendPhase::Extension) {
                phase = KneeBendPhase::Flexion;
            }
        } else if knee > self.extension_above {
            phase = KneeBendPhase::Extension;
            rep_completed = previous == KneeBendPhase::Flexion;
        } else if (self.shallow_min..=self.shallow_max).contains(&knee)
            && previous != KneeBendPhase::Flexion
        {
            check.penalize(self.shallow_penalty, "Bend your knees deeper");
        }

        Some(check.finish(phase, rep_completed, "Good form!"))
    }
}

impl LegRaiseThresholds {
    fn evaluate(&self, angles: &AngleSample, previous: LegRaisePhase) -> Option<ExerciseState> {
        let knee = angles.pair_min(JointPair::Knee)?;
        let hip = angles.pair_min(JointPair::Hip)?;

        let mut check = FormCheck::new(100);
        if knee <= self.straight_knee_min {
            check.penalize(self.bent_knee_penalty, "Keep your leg straight");
        }

        let mut phase = previous;
        let mut rep_completed = false;

        if hip < self.up_below {
            if matches!(previous, LegRaisePhase::Start | LegRaisePhase::Down) {
                phase = LegRaisePhase::Up;
            }
        } else if hip > self.down_above {
            phase = LegRaisePhase::Down;
            rep_completed = previous == LegRaisePhase::Up;
        } else if (self.low_raise_min..=self.low_raise_max).contains(&hip) {
            check.penalize(self.low_raise_penalty, "Raise your leg higher");
        }

        Some(check.finish(phase, rep_completed, "Good form!"))
    }
}

impl HipFlexThresholds {
    fn evaluate(&self, angles: &AngleSample, previous: HipFlexPhase) -> Option<ExerciseState> {
        let hip = angles.pair_min(JointPair::Hip)?;

        let mut phase = previous;
        let mut rep_completed = false;

        let mut check = if hip < self.hold_below {
            phase = HipFlexPhase::Flexed;
            let mut check = FormCheck::new(self.hold_score);
            check.cue("Hold position");
            check
        } else if hip < self.flexed_below {
            phase = HipFlexPhase::Flexed;
            let mut check = FormCheck::new(self.partial_score);
            check.cue("Lift your knee a little higher");
            check
        } else if hip > self.extended_above {
            phase = HipFlexPhase::Extended;
            rep_completed = previous == HipFlexPhase::Flexed;
            FormCheck::new(100)
        } else {
            let mut check = FormCheck::new(self.transition_score);
            check.cue("Bring your knee towards your chest");
            check
        };

        if rep_completed {
            check.cue("Rep complete");
        }

        Some(check.finish(phase, rep_completed, "Good form!"))
    }
}

/// An exercise together with the thresholds used to judge it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Exercise {
    KneeBend(KneeBendThresholds),
    LegRaise(LegRaiseThresholds),
    HipFlex(HipFlexThresholds),
}

impl Exercise {
    pub fn kind(&self) -> ExerciseKind {
        match self {
            Exercise::KneeBend(_) => ExerciseKind::KneeBend,
            Exercise::LegRaise(_) => ExerciseKind::LegRaise,
            Exercise::HipFlex(_) => ExerciseKind::HipFlex,
        }
    }

    pub fn initial_phase(&self) -> Phase {
        self.kind().initial_phase()
    }

    /// Classify the phase and score form for one frame.
    ///
    /// `None` angles, or a sample missing every reading of a required joint,
    /// produce the "unable to detect pose" state with the phase unchanged. A
    /// `previous` phase belonging to a different exercise is read as `Start`.
    pub fn evaluate(&self, angles: Option<&AngleSample>, previous: Phase) -> ExerciseState {
        angles
            .and_then(|sample| self.try_evaluate(sample, previous))
            .unwrap_or_else(|| ExerciseState::undetected(previous))
    }

    /// Like [`Exercise::evaluate`], but `None` when a required joint has no
    /// usable reading.
    pub fn try_evaluate(&self, angles: &AngleSample, previous: Phase) -> Option<ExerciseState> {
        match (self, previous) {
            (Exercise::KneeBend(t), Phase::KneeBend(p)) => t.evaluate(angles, p),
            (Exercise::KneeBend(t), _) => t.evaluate(angles, KneeBendPhase::Start),
            (Exercise::LegRaise(t), Phase::LegRaise(p)) => t.evaluate(angles, p),
            (Exercise::LegRaise(t), _) => t.evaluate(angles, LegRaisePhase::Start),
            (Exercise::HipFlex(t), Phase::HipFlex(p)) => t.evaluate(angles, p),
            (Exercise::HipFlex(t), _) => t.evaluate(angles, HipFlexPhase::Start),
        }
    }
}

impl From<ExerciseKind> for Exercise {
    fn from(kind: ExerciseKind) -> Self {
        match kind {
            ExerciseKind::KneeBend => Exercise::KneeBend(KneeBendThresholds::default()),
            ExerciseKind::LegRaise => Exercise::LegRaise(LegRaiseThresholds::default()),
            ExerciseKind::HipFlex => Exercise::HipFlex(HipFlexThresholds::default()),
        }
    }
}

/// Label-driven entry point using the default thresholds.
///
/// Missing angles take precedence over an unknown label; an unknown label
/// yields score 0 with the phase unchanged.
pub fn calculate_form_quality(
    angles: Option<&AngleSample>,
    exercise: &str,
    previous: Phase,
) -> ExerciseState {
    if angles.is_none() {
        return ExerciseState::undetected(previous);
    }

    match ExerciseKind::from_label(exercise) {
        Some(kind) => Exercise::from(kind).evaluate(angles, previous),
        None => ExerciseState::unrecognized(previous),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use physio_core::Joint;

    fn legs(knee: f64, hip: f64) -> AngleSample {
        AngleSample::new()
            .with(Joint::LeftKnee, knee)
            .with(Joint::RightKnee, knee)
            .with(Joint::LeftHip, hip)
            .with(Joint::RightHip, hip)
    }

    fn knee_bend() -> Exercise {
        ExerciseKind::KneeBend.into()
    }

    fn leg_raise() -> Exercise {
        ExerciseKind::LegRaise.into()
    }

    fn hip_flex() -> Exercise {
        ExerciseKind::HipFlex.into()
    }

    #[test]
    fn test_label_matching() {
        assert_eq!(ExerciseKind::from_label("knee bends"), Some(ExerciseKind::KneeBend));
        assert_eq!(ExerciseKind::from_label("Knee-Bends"), Some(ExerciseKind::KneeBend));
        assert_eq!(ExerciseKind::from_label("  LEG RAISES "), Some(ExerciseKind::LegRaise));
        assert_eq!(ExerciseKind::from_label("leg-raise"), Some(ExerciseKind::LegRaise));
        assert_eq!(ExerciseKind::from_label("hip flexion"), Some(ExerciseKind::HipFlex));
        assert_eq!(ExerciseKind::from_label("Hip-Flex"), Some(ExerciseKind::HipFlex));
        assert_eq!(ExerciseKind::from_label("kneebends"), None);
        assert_eq!(ExerciseKind::from_label("push ups"), None);
        assert_eq!(ExerciseKind::from_label(""), None);
    }

    #[test]
    fn test_from_str_reports_unknown_label() {
        let err = "jumping jacks".parse::<ExerciseKind>().unwrap_err();
        assert!(matches!(err, Error::UnknownExercise(ref s) if s == "jumping jacks"));
        assert_eq!("leg raises".parse::<ExerciseKind>().unwrap(), ExerciseKind::LegRaise);
    }

    #[test]
    fn test_knee_bend_rep_cycle() {
        let ex = knee_bend();

        let down = ex.evaluate(Some(&legs(85.0, 170.0)), ex.initial_phase());
        assert_eq!(down.phase, Phase::KneeBend(KneeBendPhase::Flexion));
        assert!(!down.rep_completed);
        assert_eq!(down.score, 100);

        let up = ex.evaluate(Some(&legs(170.0, 170.0)), down.phase);
        assert_eq!(up.phase, Phase::KneeBend(KneeBendPhase::Extension));
        assert!(up.rep_completed);
        assert_eq!(up.score, 100);
        assert_eq!(up.feedback, "Good form!");
    }

    #[test]
    fn test_knee_bend_extension_without_flexion_is_not_a_rep() {
        let ex = knee_bend();
        let state = ex.evaluate(Some(&legs(170.0, 170.0)), ex.initial_phase());
        assert_eq!(state.phase, Phase::KneeBend(KneeBendPhase::Extension));
        assert!(!state.rep_completed);

        let again = ex.evaluate(Some(&legs(175.0, 170.0)), state.phase);
        assert!(!again.rep_completed);
    }

    #[test]
    fn test_knee_bend_staying_in_flexion() {
        let ex = knee_bend();
        let state = ex.evaluate(
            Some(&legs(80.0, 170.0)),
            Phase::KneeBend(KneeBendPhase::Flexion),
        );
        assert_eq!(state.phase, Phase::KneeBend(KneeBendPhase::Flexion));
        assert!(!state.rep_completed);
    }

    #[test]
    fn test_knee_bend_penalties() {
        let ex = knee_bend();

        let leaning = ex.evaluate(Some(&legs(85.0, 140.0)), ex.initial_phase());
        assert_eq!(leaning.score, 80);
        assert_eq!(leaning.feedback, "Keep your back straight");

        let shallow = ex.evaluate(Some(&legs(130.0, 170.0)), ex.initial_phase());
        assert_eq!(shallow.score, 90);
        assert_eq!(shallow.feedback, "Bend your knees deeper");
        assert!(shallow.phase.is_start());

        let both = ex.evaluate(Some(&legs(140.0, 140.0)), ex.initial_phase());
        assert_eq!(both.score, 70);
        assert_eq!(both.feedback, "Keep your back straight. Bend your knees deeper");
    }

    #[test]
    fn test_knee_bend_ascent_is_not_penalized_as_shallow() {
        let ex = knee_bend();
        let rising = ex.evaluate(
            Some(&legs(130.0, 170.0)),
            Phase::KneeBend(KneeBendPhase::Flexion),
        );
        assert_eq!(rising.score, 100);
        assert_eq!(rising.phase, Phase::KneeBend(KneeBendPhase::Flexion));
    }

    #[test]
    fn test_knee_bend_uses_smaller_side() {
        let ex = knee_bend();
        let sample = AngleSample::new()
            .with(Joint::LeftKnee, 170.0)
            .with(Joint::RightKnee, 85.0)
            .with(Joint::LeftHip, 170.0)
            .with(Joint::RightHip, 165.0);
        let state = ex.evaluate(Some(&sample), ex.initial_phase());
        assert_eq!(state.phase, Phase::KneeBend(KneeBendPhase::Flexion));
    }

    #[test]
    fn test_leg_raise_rep_cycle() {
        let ex = leg_raise();

        let up = ex.evaluate(Some(&legs(175.0, 110.0)), ex.initial_phase());
        assert_eq!(up.phase, Phase::LegRaise(LegRaisePhase::Up));
        assert!(!up.rep_completed);
        assert_eq!(up.score, 100);

        let down = ex.evaluate(Some(&legs(175.0, 170.0)), up.phase);
        assert_eq!(down.phase, Phase::LegRaise(LegRaisePhase::Down));
        assert!(down.rep_completed);

        let up_again = ex.evaluate(Some(&legs(175.0, 100.0)), down.phase);
        assert_eq!(up_again.phase, Phase::LegRaise(LegRaisePhase::Up));
        assert!(!up_again.rep_completed);
    }

    #[test]
    fn test_leg_raise_penalties() {
        let ex = leg_raise();

        let bent = ex.evaluate(Some(&legs(140.0, 110.0)), ex.initial_phase());
        assert_eq!(bent.score, 75);
        assert_eq!(bent.feedback, "Keep your leg straight");

        let low = ex.evaluate(Some(&legs(175.0, 150.0)), ex.initial_phase());
        assert_eq!(low.score, 90);
        assert_eq!(low.feedback, "Raise your leg higher");

        let both = ex.evaluate(Some(&legs(120.0, 145.0)), ex.initial_phase());
        assert_eq!(both.score, 65);
    }

    #[test]
    fn test_hip_flex_bands() {
        let ex = hip_flex();

        let hold = ex.evaluate(Some(&legs(90.0, 95.0)), ex.initial_phase());
        assert_eq!(hold.score, 100);
        assert_eq!(hold.phase, Phase::HipFlex(HipFlexPhase::Flexed));
        assert_eq!(hold.feedback, "Hold position");

        let partial = ex.evaluate(Some(&legs(90.0, 110.0)), ex.initial_phase());
        assert_eq!(partial.score, 80);
        assert_eq!(partial.phase, Phase::HipFlex(HipFlexPhase::Flexed));

        let transition = ex.evaluate(Some(&legs(90.0, 140.0)), ex.initial_phase());
        assert_eq!(transition.score, 60);
        assert!(transition.phase.is_start());
        assert!(!transition.rep_completed);
    }

    #[test]
    fn test_hip_flex_rep_only_on_return() {
        let ex = hip_flex();

        let flexed = ex.evaluate(Some(&legs(90.0, 95.0)), ex.initial_phase());
        assert!(!flexed.rep_completed);

        let extended = ex.evaluate(Some(&legs(90.0, 170.0)), flexed.phase);
        assert!(extended.rep_completed);
        assert_eq!(extended.phase, Phase::HipFlex(HipFlexPhase::Extended));

        let still_extended = ex.evaluate(Some(&legs(90.0, 172.0)), extended.phase);
        assert!(!still_extended.rep_completed);
    }

    #[test]
    fn test_hip_flex_needs_only_hips() {
        let ex = hip_flex();
        let sample = AngleSample::new().with(Joint::LeftHip, 95.0);
        let state = ex.evaluate(Some(&sample), ex.initial_phase());
        assert_eq!(state.score, 100);
    }

    #[test]
    fn test_missing_angles() {
        let ex = knee_bend();
        let previous = Phase::KneeBend(KneeBendPhase::Flexion);

        let none = ex.evaluate(None, previous);
        assert_eq!(none.score, 0);
        assert_eq!(none.feedback, FEEDBACK_UNDETECTED);
        assert!(!none.rep_completed);
        assert_eq!(none.phase, previous);

        let hips_only = AngleSample::new().with(Joint::LeftHip, 170.0);
        let partial = ex.evaluate(Some(&hips_only), previous);
        assert_eq!(partial.feedback, FEEDBACK_UNDETECTED);
        assert_eq!(partial.phase, previous);
    }

    #[test]
    fn test_foreign_phase_reads_as_start() {
        let ex = knee_bend();
        let state = ex.evaluate(
            Some(&legs(170.0, 170.0)),
            Phase::LegRaise(LegRaisePhase::Up),
        );
        assert_eq!(state.phase, Phase::KneeBend(KneeBendPhase::Extension));
        assert!(!state.rep_completed);
    }

    #[test]
    fn test_calculate_form_quality_by_label() {
        let start = ExerciseKind::KneeBend.initial_phase();

        let undetected = calculate_form_quality(None, "knee bends", start);
        assert_eq!(undetected.score, 0);
        assert_eq!(undetected.feedback, "Unable to detect pose");
        assert!(!undetected.rep_completed);

        let unknown = calculate_form_quality(Some(&legs(85.0, 170.0)), "burpees", start);
        assert_eq!(unknown.score, 0);
        assert_eq!(unknown.feedback, FEEDBACK_UNRECOGNIZED);
        assert_eq!(unknown.phase, start);

        let hip = calculate_form_quality(
            Some(&legs(90.0, 95.0)),
            "Hip-Flexion",
            ExerciseKind::HipFlex.initial_phase(),
        );
        assert_eq!(hip.phase, Phase::HipFlex(HipFlexPhase::Flexed));
    }

    #[test]
    fn test_score_always_in_range() {
        let exercises = [knee_bend(), leg_raise(), hip_flex()];
        let angles = [
            -20.0, 0.0, 45.0, 89.9, 90.0, 119.9, 120.0, 140.0, 150.0, 160.0, 160.1, 180.0, 210.0,
        ];

        for ex in exercises {
            for &knee in &angles {
                for &hip in &angles {
                    let mut phase = ex.initial_phase();
                    for _ in 0..2 {
                        let state = ex.evaluate(Some(&legs(knee, hip)), phase);
                        assert!(state.score <= 100);
                        phase = state.phase;
                    }
                }
            }
        }
    }

    #[test]
    fn test_custom_thresholds() {
        let ex = Exercise::KneeBend(KneeBendThresholds {
            flexion_below: 100.0,
            ..Default::default()
        });
        let state = ex.evaluate(Some(&legs(95.0, 170.0)), ex.initial_phase());
        assert_eq!(state.phase, Phase::KneeBend(KneeBendPhase::Flexion));
    }

    #[test]
    fn test_knee_bend_threshold_boundaries() {
        let ex = knee_bend();
        let start = ex.initial_phase();
        let flexion = Phase::KneeBend(KneeBendPhase::Flexion);

        let at_target = ex.evaluate(Some(&legs(90.0, 170.0)), start);
        assert!(at_target.phase.is_start());
        assert_eq!(at_target.score, 100);
        assert_eq!(at_target.feedback, "Good form!");

        let between = ex.evaluate(Some(&legs(119.9, 170.0)), start);
        assert_eq!(between.score, 100);

        let band_floor = ex.evaluate(Some(&legs(120.0, 170.0)), start);
        assert_eq!(band_floor.score, 90);
        assert_eq!(band_floor.feedback, "Bend your knees deeper");

        let band_ceiling = ex.evaluate(Some(&legs(160.0, 170.0)), start);
        assert_eq!(band_ceiling.score, 90);
        assert!(band_ceiling.phase.is_start());

        let not_yet_up = ex.evaluate(Some(&legs(160.0, 170.0)), flexion);
        assert_eq!(not_yet_up.phase, flexion);
        assert!(!not_yet_up.rep_completed);
        assert_eq!(not_yet_up.score, 100);

        let up = ex.evaluate(Some(&legs(160.5, 170.0)), flexion);
        assert_eq!(up.phase, Phase::KneeBend(KneeBendPhase::Extension));
        assert!(up.rep_completed);

        let upright = ex.evaluate(Some(&legs(170.0, 150.0)), start);
        assert_eq!(upright.score, 100);
        let leaning = ex.evaluate(Some(&legs(170.0, 149.9)), start);
        assert_eq!(leaning.score, 80);
    }

    #[test]
    fn test_leg_raise_threshold_boundaries() {
        let ex = leg_raise();
        let start = ex.initial_phase();
        let up = Phase::LegRaise(LegRaisePhase::Up);

        let knee_at_limit = ex.evaluate(Some(&legs(150.0, 170.0)), start);
        assert_eq!(knee_at_limit.score, 75);
        assert_eq!(knee_at_limit.feedback, "Keep your leg straight");
        let knee_past_limit = ex.evaluate(Some(&legs(150.5, 170.0)), start);
        assert_eq!(knee_past_limit.score, 100);

        let hip_at_down = ex.evaluate(Some(&legs(175.0, 160.0)), up);
        assert_eq!(hip_at_down.phase, up);
        assert!(!hip_at_down.rep_completed);
        assert_eq!(hip_at_down.score, 90);
        assert_eq!(hip_at_down.feedback, "Raise your leg higher");

        let down = ex.evaluate(Some(&legs(175.0, 160.5)), up);
        assert_eq!(down.phase, Phase::LegRaise(LegRaisePhase::Down));
        assert!(down.rep_completed);

        let hip_at_up = ex.evaluate(Some(&legs(175.0, 120.0)), start);
        assert!(hip_at_up.phase.is_start());
        assert_eq!(hip_at_up.score, 100);

        let band_floor = ex.evaluate(Some(&legs(175.0, 140.0)), start);
        assert_eq!(band_floor.score, 90);
        let below_band = ex.evaluate(Some(&legs(175.0, 139.9)), start);
        assert_eq!(below_band.score, 100);
    }

    #[test]
    fn test_hip_flex_threshold_boundaries() {
        let ex = hip_flex();
        let start = ex.initial_phase();
        let flexed = Phase::HipFlex(HipFlexPhase::Flexed);

        let hold = ex.evaluate(Some(&legs(90.0, 99.9)), start);
        assert_eq!(hold.score, 100);

        let at_hold_limit = ex.evaluate(Some(&legs(90.0, 100.0)), start);
        assert_eq!(at_hold_limit.score, 80);
        assert_eq!(at_hold_limit.phase, flexed);

        let at_flexed_limit = ex.evaluate(Some(&legs(90.0, 120.0)), start);
        assert_eq!(at_flexed_limit.score, 60);
        assert!(at_flexed_limit.phase.is_start());

        let at_extended_limit = ex.evaluate(Some(&legs(90.0, 160.0)), flexed);
        assert_eq!(at_extended_limit.score, 60);
        assert_eq!(at_extended_limit.phase, flexed);
        assert!(!at_extended_limit.rep_completed);

        let extended = ex.evaluate(Some(&legs(90.0, 160.5)), flexed);
        assert_eq!(extended.phase, Phase::HipFlex(HipFlexPhase::Extended));
        assert!(extended.rep_completed);
        assert_eq!(extended.score, 100);
        assert_eq!(extended.feedback, "Rep complete");
    }

    #[test]
    fn test_try_evaluate_reports_missing_joints() {
        let ex = knee_bend();
        let hips_only = AngleSample::new().with(Joint::LeftHip, 170.0);
        assert!(ex.try_evaluate(&hips_only, ex.initial_phase()).is_none());

        let scored = ex.try_evaluate(&legs(85.0, 170.0), ex.initial_phase()).unwrap();
        assert_eq!(scored.phase, Phase::KneeBend(KneeBendPhase::Flexion));
    }

    #[test]
    fn test_state_serializes_phase_label() {
        let ex = knee_bend();
        let state = ex.evaluate(Some(&legs(85.0, 170.0)), ex.initial_phase());
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(
            json,
            r#"{"phase":"flexion","score":100,"feedback":"Good form!","repCompleted":false}"#
        );

        let ex = leg_raise();
        let raise = ex.evaluate(Some(&legs(175.0, 110.0)), ex.initial_phase());
        let value = serde_json::to_value(&raise).unwrap();
        assert_eq!(value["phase"], "up");
    }
}
