//! Vector type alias for 3D positions and directions.

use nalgebra::Vector3;

/// 3D vector type for positions, headings, and surface normals.
///
/// This is a simple alias for `nalgebra::Vector3<f32>`, used throughout
/// the simulation for agent positions, tangent bases, and camera placement.
pub type Vec3 = Vector3<f32>;

/// World +X axis, the first fallback reference axis near the Y poles.
pub const WORLD_X: Vec3 = Vec3::new(1.0, 0.0, 0.0);

/// World +Y axis ("north"), the default reference axis.
pub const WORLD_Y: Vec3 = Vec3::new(0.0, 1.0, 0.0);

/// World +Z axis, the reference axis near the X poles.
pub const WORLD_Z: Vec3 = Vec3::new(0.0, 0.0, 1.0);

/// Component of `v` lying in the plane perpendicular to the unit vector `normal`.
#[inline]
pub fn project_onto_plane(v: &Vec3, normal: &Vec3) -> Vec3 {
    v - normal * v.dot(normal)
}
