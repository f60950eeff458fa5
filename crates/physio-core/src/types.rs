//! Fundamental types for physiotherapy exercise tracking.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Identifier for one exercise session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Timestamp wrapper with nanosecond precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now().timestamp_nanos_opt().unwrap_or(0))
    }

    pub fn from_nanos(nanos: i64) -> Self {
        Self(nanos)
    }

    pub fn as_nanos(&self) -> i64 {
        self.0
    }

    pub fn as_secs_f64(&self) -> f64 {
        self.0 as f64 / 1_000_000_000.0
    }
}

/// 3D position in camera space (normalized image units or meters)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position3D {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// 17-joint skeletal keypoint definition (COCO format)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Keypoint {
    Nose = 0,
    LeftEye = 1,
    RightEye = 2,
    LeftEar = 3,
    RightEar = 4,
    LeftShoulder = 5,
    RightShoulder = 6,
    LeftElbow = 7,
    RightElbow = 8,
    LeftWrist = 9,
    RightWrist = 10,
    LeftHip = 11,
    RightHip = 12,
    LeftKnee = 13,
    RightKnee = 14,
    LeftAnkle = 15,
    RightAnkle = 16,
}

impl Keypoint {
    pub const COUNT: usize = 17;
}

/// Keypoint detection with confidence score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeypointDetection {
    pub keypoint: Keypoint,
    pub position: Position3D,
    pub confidence: f32,
}

impl KeypointDetection {
    pub fn new(keypoint: Keypoint, position: Position3D, confidence: f32) -> Self {
        Self {
            keypoint,
            position,
            confidence,
        }
    }
}

/// One frame of pose-estimator output, indexed by `Keypoint as usize`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkeletalPose {
    pub timestamp: Timestamp,
    pub keypoints: [Option<KeypointDetection>; Keypoint::COUNT],
}

impl SkeletalPose {
    pub fn new(timestamp: Timestamp) -> Self {
        Self {
            timestamp,
            keypoints: [None; Keypoint::COUNT],
        }
    }

    pub fn with(mut self, keypoint: Keypoint, position: Position3D, confidence: f32) -> Self {
        self.keypoints[keypoint as usize] =
            Some(KeypointDetection::new(keypoint, position, confidence));
        self
    }

    pub fn get(&self, keypoint: Keypoint) -> Option<&KeypointDetection> {
        self.keypoints[keypoint as usize].as_ref()
    }
}

/// Joints whose interior angle is tracked during exercises
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Joint {
    LeftKnee,
    RightKnee,
    LeftHip,
    RightHip,
    LeftElbow,
    RightElbow,
    LeftShoulder,
    RightShoulder,
}

impl Joint {
    pub const ALL: [Joint; 8] = [
        Joint::LeftKnee,
        Joint::RightKnee,
        Joint::LeftHip,
        Joint::RightHip,
        Joint::LeftElbow,
        Joint::RightElbow,
        Joint::LeftShoulder,
        Joint::RightShoulder,
    ];

    /// Wire name, matching the serde representation
    pub fn name(&self) -> &'static str {
        match self {
            Joint::LeftKnee => "leftKnee",
            Joint::RightKnee => "rightKnee",
            Joint::LeftHip => "leftHip",
            Joint::RightHip => "rightHip",
            Joint::LeftElbow => "leftElbow",
            Joint::RightElbow => "rightElbow",
            Joint::LeftShoulder => "leftShoulder",
            Joint::RightShoulder => "rightShoulder",
        }
    }

    /// Keypoints (proximal, vertex, distal) spanning the angle at this joint
    pub fn keypoints(&self) -> (Keypoint, Keypoint, Keypoint) {
        use Keypoint as K;
        match self {
            Joint::LeftKnee => (K::LeftHip, K::LeftKnee, K::LeftAnkle),
            Joint::RightKnee => (K::RightHip, K::RightKnee, K::RightAnkle),
            Joint::LeftHip => (K::LeftShoulder, K::LeftHip, K::LeftKnee),
            Joint::RightHip => (K::RightShoulder, K::RightHip, K::RightKnee),
            Joint::LeftElbow => (K::LeftShoulder, K::LeftElbow, K::LeftWrist),
            Joint::RightElbow => (K::RightShoulder, K::RightElbow, K::RightWrist),
            Joint::LeftShoulder => (K::LeftElbow, K::LeftShoulder, K::LeftHip),
            Joint::RightShoulder => (K::RightElbow, K::RightShoulder, K::RightHip),
        }
    }
}

impl fmt::Display for Joint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A left/right joint pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum JointPair {
    Knee,
    Hip,
    Elbow,
    Shoulder,
}

impl JointPair {
    pub fn sides(&self) -> [Joint; 2] {
        match self {
            JointPair::Knee => [Joint::LeftKnee, Joint::RightKnee],
            JointPair::Hip => [Joint::LeftHip, Joint::RightHip],
            JointPair::Elbow => [Joint::LeftElbow, Joint::RightElbow],
            JointPair::Shoulder => [Joint::LeftShoulder, Joint::RightShoulder],
        }
    }
}

/// Joint angles (degrees) measured in one frame
///
/// Nominal domain is 0-180 but noisy estimators can exceed it; values are
/// stored as given.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AngleSample(BTreeMap<Joint, f64>);

impl AngleSample {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, joint: Joint, degrees: f64) -> Self {
        self.0.insert(joint, degrees);
        self
    }

    pub fn insert(&mut self, joint: Joint, degrees: f64) {
        self.0.insert(joint, degrees);
    }

    pub fn get(&self, joint: Joint) -> Option<f64> {
        self.0.get(&joint).copied()
    }

    /// Smaller of the finite left/right readings, or whichever side is present
    pub fn pair_min(&self, pair: JointPair) -> Option<f64> {
        pair.sides()
            .iter()
            .filter_map(|j| self.get(*j))
            .filter(|v| v.is_finite())
            .reduce(f64::min)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Joint, f64)> + '_ {
        self.0.iter().map(|(j, v)| (*j, *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(Joint, f64)> for AngleSample {
    fn from_iter<I: IntoIterator<Item = (Joint, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
