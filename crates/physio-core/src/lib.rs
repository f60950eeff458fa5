//! # Physio-Core
//!
//! Core types and utilities for the physio-track exercise scoring system:
//! joint identifiers, per-frame angle samples, COCO pose keypoints and the
//! geometry that turns keypoints into joint angles.

pub mod error;
pub mod geometry;
pub mod types;

pub use error::{Error, Result};
pub use geometry::*;
pub use types::*;
