//! Session-level score aggregation and letter grades.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Letter grade for a session's average rep score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
    /// No reps were completed
    #[serde(rename = "N/A")]
    NotAvailable,
}

impl Grade {
    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
            Grade::NotAvailable => "N/A",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Minimum average score for each passing grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradeScale {
    pub a: u8,
    pub b: u8,
    pub c: u8,
    pub d: u8,
}

impl Default for GradeScale {
    fn default() -> Self {
        Self {
            a: 90,
            b: 80,
            c: 70,
            d: 60,
        }
    }
}

impl GradeScale {
    pub fn grade(&self, average: u8) -> Grade {
        if average >= self.a {
            Grade::A
        } else if average >= self.b {
            Grade::B
        } else if average >= self.c {
            Grade::C
        } else if average >= self.d {
            Grade::D
        } else {
            Grade::F
        }
    }

    /// Cut-offs must be strictly descending from A to D
    pub fn is_ordered(&self) -> bool {
        self.a <= 100 && self.a > self.b && self.b > self.c && self.c > self.d
    }
}

/// Aggregate of the per-rep scores collected during a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionScore {
    pub total_reps: usize,
    pub average_score: u8,
    pub grade: Grade,
}

impl Default for SessionScore {
    fn default() -> Self {
        Self {
            total_reps: 0,
            average_score: 0,
            grade: Grade::NotAvailable,
        }
    }
}

impl SessionScore {
    pub fn from_rep_scores(scores: &[u8]) -> Self {
        Self::with_scale(scores, &GradeScale::default())
    }

    /// Empty input gives zero reps, zero average and grade `N/A`.
    pub fn with_scale(scores: &[u8], scale: &GradeScale) -> Self {
        if scores.is_empty() {
            return Self::default();
        }

        let total: u64 = scores.iter().map(|&s| u64::from(s)).sum();
        let average = (total as f64 / scores.len() as f64).round() as u8;

        Self {
            total_reps: scores.len(),
            average_score: average,
            grade: scale.grade(average),
        }
    }
}

/// Convenience wrapper over [`SessionScore::from_rep_scores`]
pub fn calculate_session_score(scores: &[u8]) -> SessionScore {
    SessionScore::from_rep_scores(scores)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_session() {
        let score = calculate_session_score(&[]);
        assert_eq!(score.total_reps, 0);
        assert_eq!(score.average_score, 0);
        assert_eq!(score.grade, Grade::NotAvailable);
        assert_eq!(score.grade.to_string(), "N/A");
    }

    #[test]
    fn test_mixed_session() {
        let score = calculate_session_score(&[95, 85, 72, 100]);
        assert_eq!(score.total_reps, 4);
        assert_eq!(score.average_score, 88);
        assert_eq!(score.grade, Grade::B);
    }

    #[test]
    fn test_grade_boundaries() {
        let scale = GradeScale::default();
        assert_eq!(scale.grade(100), Grade::A);
        assert_eq!(scale.grade(90), Grade::A);
        assert_eq!(scale.grade(89), Grade::B);
        assert_eq!(scale.grade(80), Grade::B);
        assert_eq!(scale.grade(70), Grade::C);
        assert_eq!(scale.grade(60), Grade::D);
        assert_eq!(scale.grade(59), Grade::F);
        assert_eq!(scale.grade(0), Grade::F);
    }

    #[test]
    fn test_average_rounds_half_up() {
        // 89.5 -> 90
        let score = calculate_session_score(&[89, 90]);
        assert_eq!(score.average_score, 90);
        assert_eq!(score.grade, Grade::A);
    }

    #[test]
    fn test_custom_scale() {
        let strict = GradeScale {
            a: 95,
            b: 85,
            c: 75,
            d: 65,
        };
        assert!(strict.is_ordered());
        let score = SessionScore::with_scale(&[92, 92], &strict);
        assert_eq!(score.grade, Grade::B);

        let broken = GradeScale {
            a: 80,
            b: 90,
            ..Default::default()
        };
        assert!(!broken.is_ordered());
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(calculate_session_score(&[])).unwrap();
        assert_eq!(json["totalReps"], 0);
        assert_eq!(json["grade"], "N/A");
    }
}
