//! Pose matrices and pivot composition
//!
//! A part is animated about its own center: the accumulated pose transforms
//! are wrapped between a translation to the pivot and a translation back.

use crate::frame::PartPose;
use glam::{Mat4, Vec3};

/// Matrix of a single pose: translate, then rotate about Z, Y and X.
///
/// Rotation angles are in degrees. Applied to a point the X rotation acts
/// first and the translation last.
pub fn pose_matrix(pose: &PartPose) -> Mat4 {
    Mat4::from_translation(pose.translation)
        * Mat4::from_rotation_z(pose.rotation.z.to_radians())
        * Mat4::from_rotation_y(pose.rotation.y.to_radians())
        * Mat4::from_rotation_x(pose.rotation.x.to_radians())
}

/// Translation pair that moves a pivot to the origin and back
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PivotTransform {
    /// Translation by the pivot point
    pivot: Mat4,
    /// Translation by the negated pivot point
    anti_pivot: Mat4,
}

impl PivotTransform {
    pub fn new(center: Vec3) -> Self {
        Self {
            pivot: Mat4::from_translation(center),
            anti_pivot: Mat4::from_translation(-center),
        }
    }

    /// `pivot * local * anti_pivot`
    pub fn apply(&self, local: Mat4) -> Mat4 {
        self.pivot * local * self.anti_pivot
    }
}

impl Default for PivotTransform {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}
