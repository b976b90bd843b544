//! Tracked poses from the AR runtime

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Position and orientation in the session's reference space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub orientation: Quat,
}

impl Pose {
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// Pose with identity orientation (surface hits only need a position)
    pub fn at(position: Vec3) -> Self {
        Self::new(position, Quat::IDENTITY)
    }

    /// From a column-major 4x4 rigid transform, as delivered by WebXR
    pub fn from_matrix(m: &[f32; 16]) -> Self {
        let (_scale, orientation, position) =
            Mat4::from_cols_array(m).to_scale_rotation_translation();
        Self::new(position, orientation)
    }

    /// Pointing direction: the pose's -Z axis
    #[inline]
    pub fn forward(&self) -> Vec3 {
        (self.orientation * Vec3::NEG_Z).normalize_or_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_forward_is_neg_z() {
        let pose = Pose::at(Vec3::new(1.0, 2.0, 3.0));
        assert!((pose.forward() - Vec3::NEG_Z).length() < 1e-6);
    }

    #[test]
    fn test_rotated_forward() {
        // Quarter turn left around Y: -Z becomes -X
        let pose = Pose::new(Vec3::ZERO, Quat::from_rotation_y(std::f32::consts::FRAC_PI_2));
        assert!((pose.forward() - Vec3::NEG_X).length() < 1e-5);
    }

    #[test]
    fn test_from_matrix_matches_third_column() {
        let rot = Quat::from_rotation_x(0.4) * Quat::from_rotation_y(-0.7);
        let m = Mat4::from_rotation_translation(rot, Vec3::new(0.5, 1.5, -2.0));
        let cols = m.to_cols_array();

        let pose = Pose::from_matrix(&cols);
        assert!((pose.position - Vec3::new(0.5, 1.5, -2.0)).length() < 1e-5);

        // Forward is the negated third column
        let expected = -Vec3::new(cols[8], cols[9], cols[10]).normalize();
        assert!((pose.forward() - expected).length() < 1e-5);
    }
}
