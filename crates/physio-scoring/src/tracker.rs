//! Caller-owned session context tying the classifier to its aggregators.

use physio_core::{AngleSample, Joint, Result, SessionId, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::ScoringConfig;
use crate::exercise::{Exercise, ExerciseKind, ExerciseState};
use crate::phase::Phase;
use crate::rom::{AngleHistory, RangeOfMotion};
use crate::session::{GradeScale, SessionScore};

/// State carried between frames of one exercise session.
///
/// The classifier itself is pure; this struct holds the previous phase, the
/// angle history and the per-rep scores, and updates them after each call.
#[derive(Debug, Clone)]
pub struct ExerciseSession {
    id: SessionId,
    exercise: Exercise,
    grades: GradeScale,
    phase: Phase,
    history: AngleHistory,
    rep_scores: Vec<u8>,
    frames: u64,
    undetected_frames: u64,
    started_at: Timestamp,
}

impl ExerciseSession {
    pub fn new(exercise: Exercise) -> Self {
        Self {
            id: SessionId::new(),
            exercise,
            grades: GradeScale::default(),
            phase: exercise.initial_phase(),
            history: AngleHistory::new(),
            rep_scores: Vec::new(),
            frames: 0,
            undetected_frames: 0,
            started_at: Timestamp::now(),
        }
    }

    pub fn from_config(kind: ExerciseKind, config: &ScoringConfig) -> Self {
        Self::new(config.exercise(kind)).with_grade_scale(config.grades)
    }

    pub fn with_grade_scale(mut self, grades: GradeScale) -> Self {
        self.grades = grades;
        self
    }

    /// Score one frame and fold the result into the session.
    pub fn process_frame(&mut self, angles: Option<&AngleSample>) -> ExerciseState {
        let previous = self.phase;
        self.frames += 1;

        if let Some(sample) = angles {
            self.history.record(sample);
        }

        let scored = angles.and_then(|sample| self.exercise.try_evaluate(sample, previous));
        let state = match scored {
            Some(state) => state,
            None => {
                self.undetected_frames += 1;
                tracing::debug!(session = %self.id, frame = self.frames, "Pose not detected");
                ExerciseState::undetected(previous)
            }
        };

        if state.phase != previous {
            tracing::debug!(
                session = %self.id,
                from = %previous,
                to = %state.phase,
                "Phase transition"
            );
        }
        self.phase = state.phase;

        if state.rep_completed {
            self.rep_scores.push(state.score);
            tracing::info!(
                session = %self.id,
                exercise = %self.exercise.kind(),
                rep = self.rep_scores.len(),
                score = state.score,
                "Repetition completed"
            );
        }

        state
    }

    /// Forget all progress and return to the starting phase
    pub fn reset(&mut self) {
        self.phase = self.exercise.initial_phase();
        self.history.clear();
        self.rep_scores.clear();
        self.frames = 0;
        self.undetected_frames = 0;
        self.started_at = Timestamp::now();
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn exercise(&self) -> &Exercise {
        &self.exercise
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn rep_count(&self) -> usize {
        self.rep_scores.len()
    }

    pub fn rep_scores(&self) -> &[u8] {
        &self.rep_scores
    }

    pub fn history(&self) -> &AngleHistory {
        &self.history
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn undetected_frames(&self) -> u64 {
        self.undetected_frames
    }

    /// Snapshot of the session so far
    pub fn report(&self) -> SessionReport {
        let kind = self.exercise.kind();

        SessionReport {
            session_id: self.id,
            exercise: kind,
            started_at: self.started_at,
            ended_at: Timestamp::now(),
            frames: self.frames,
            undetected_frames: self.undetected_frames,
            range_of_motion: self.history.summary(),
            primary_range_of_motion: self.history.pair_range_of_motion(kind.primary_joint()),
            score: SessionScore::with_scale(&self.rep_scores, &self.grades),
            rep_scores: self.rep_scores.clone(),
        }
    }

    /// Close the session and produce its report
    pub fn finish(self) -> SessionReport {
        let report = self.report();
        tracing::info!(
            session = %report.session_id,
            exercise = %report.exercise,
            reps = report.score.total_reps,
            average = report.score.average_score,
            grade = %report.score.grade,
            "Session finished"
        );
        report
    }
}

/// Summary handed to report persistence and chart rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionReport {
    pub session_id: SessionId,
    pub exercise: ExerciseKind,
    pub started_at: Timestamp,
    pub ended_at: Timestamp,
    pub frames: u64,
    pub undetected_frames: u64,
    pub range_of_motion: BTreeMap<Joint, RangeOfMotion>,
    pub primary_range_of_motion: RangeOfMotion,
    pub score: SessionScore,
    pub rep_scores: Vec<u8>,
}

impl SessionReport {
    pub fn duration_secs(&self) -> f64 {
        self.ended_at.as_secs_f64() - self.started_at.as_secs_f64()
    }

    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }
}
