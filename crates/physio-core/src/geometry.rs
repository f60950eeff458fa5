//! Joint-angle geometry over pose keypoints.

use nalgebra::Vector3;

use crate::types::{AngleSample, Joint, Position3D, SkeletalPose};

/// Segments shorter than this are treated as degenerate
const MIN_SEGMENT_LENGTH: f64 = 1e-9;

fn to_vector(p: &Position3D) -> Vector3<f64> {
    Vector3::new(p.x, p.y, p.z)
}

/// Interior angle at `vertex` between the segments to `a` and `c`, in degrees.
///
/// Returns `None` when either segment has zero length.
pub fn interior_angle(a: &Position3D, vertex: &Position3D, c: &Position3D) -> Option<f64> {
    let v = to_vector(vertex);
    let u = to_vector(a) - v;
    let w = to_vector(c) - v;

    if u.norm() < MIN_SEGMENT_LENGTH || w.norm() < MIN_SEGMENT_LENGTH {
        return None;
    }

    Some(u.angle(&w).to_degrees())
}

impl AngleSample {
    /// Derive joint angles from a skeletal pose.
    ///
    /// A joint is skipped when any of its three keypoints is missing or below
    /// `min_confidence`, or when the geometry is degenerate.
    pub fn from_pose(pose: &SkeletalPose, min_confidence: f32) -> Self {
        Joint::ALL
            .iter()
            .filter_map(|joint| {
                let (a, vertex, c) = joint.keypoints();
                let a = pose.get(a)?;
                let vertex = pose.get(vertex)?;
                let c = pose.get(c)?;

                if [a, vertex, c].iter().any(|kp| kp.confidence < min_confidence) {
                    return None;
                }

                interior_angle(&a.position, &vertex.position, &c.position)
                    .map(|deg| (*joint, deg))
            })
            .collect()
    }
}
