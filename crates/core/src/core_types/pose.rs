//! Agent pose: where an agent stands and which way it faces.

use super::vec3::Vec3;
use nalgebra::UnitQuaternion;
use serde::{Deserialize, Serialize};

/// Position plus a derived orientation frame.
///
/// `forward` and `up` are unit vectors and `forward` lies in the tangent
/// plane at `position`. Both are rebuilt from the position every time the
/// agent moves; nothing here is integrated over time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub forward: Vec3,
    pub up: Vec3,
}

impl Pose {
    pub fn new(position: Vec3, forward: Vec3, up: Vec3) -> Self {
        Self {
            position,
            forward,
            up,
        }
    }

    /// Point one unit ahead of the agent, what a renderer would `look_at`.
    #[inline]
    pub fn look_target(&self) -> Vec3 {
        self.position + self.forward
    }

    /// Rotation taking local +Z to `forward` and local +Y to `up`.
    pub fn rotation(&self) -> UnitQuaternion<f32> {
        UnitQuaternion::face_towards(&self.forward, &self.up)
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::new(Vec3::zeros(), -Vec3::z(), Vec3::y())
    }
}
