//! # Physio-Scoring
//!
//! Real-time form scoring and repetition counting for physiotherapy
//! exercises, plus the session-level aggregates built from it.
//!
//! ## Pipeline
//!
//! 1. **Phase classification + form scoring** ([`Exercise::evaluate`]):
//!    per frame, maps joint angles and the previous phase to a new
//!    [`ExerciseState`] (phase, 0-100 score, feedback, rep flag).
//! 2. **Session context** ([`ExerciseSession`]): owns the previous phase, the
//!    per-joint [`AngleHistory`] and the list of per-rep scores.
//! 3. **Range of motion** ([`RangeOfMotion`]): min/max/average/range over a
//!    joint's angle history.
//! 4. **Session score** ([`SessionScore`]): rep count, average rep score and
//!    letter [`Grade`].
//!
//! ## Supported exercises
//!
//! - **Knee bends**: flexion below 90°, rep on return above 160°
//! - **Leg raises**: hip below 120° is up, rep on return above 160°
//! - **Hip flexion**: scored continuously by hip band, rep on return above 160°

pub mod config;
pub mod exercise;
pub mod phase;
pub mod rom;
pub mod session;
pub mod tracker;

pub use crate::config::{ScoringConfig, ENV_PREFIX};
pub use exercise::*;
pub use phase::*;
pub use rom::*;
pub use session::*;
pub use tracker::*;
