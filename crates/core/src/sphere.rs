//! Sphere surface math
//!
//! Pure geometry used by every walker on the planet:
//! - Projecting a point back onto the sphere at a fixed altitude
//! - Building an orthonormal tangent basis (up, right, forward) at a surface point
//! - Keeping walkers in the upper hemisphere, clear of the exact north pole
//!
//! # Pole handling
//!
//! A tangent basis built from `cross(reference, up)` collapses when `up` is
//! parallel to the reference axis. The reference axis is therefore picked per
//! point: world Y normally, world X within 0.99 of the Y poles, world Z
//! within 0.99 of the X poles. Each cross product additionally has a fixed
//! fallback axis. Changing the threshold or the selection order shows up as
//! the basis flipping (camera and model snapping) near the poles.

use crate::core_types::{Planet, Vec3, WORLD_X, WORLD_Y, WORLD_Z};
use serde::{Deserialize, Serialize};

/// `|up · axis|` above which an axis is considered parallel to `up`.
pub const REFERENCE_AXIS_DOT_LIMIT: f32 = 0.99;

/// Squared length below which a cross product is treated as collapsed.
pub const DEGENERATE_CROSS_LENGTH_SQ: f32 = 0.001;

/// Default upper bound on the `y` of a walker's radial direction.
pub const DEFAULT_POLE_BUFFER: f32 = 0.98;

/// Default lower bound on the `y` of a walker's radial direction (the equator).
pub const DEFAULT_EQUATOR_BIAS: f32 = 0.0;

/// Project `position` onto the sphere of radius `planet.radius() + offset`.
///
/// Returns `None` only when `position` is the planet center, where no radial
/// direction exists.
pub fn clamp_to_surface(position: &Vec3, planet: &Planet, offset: f32) -> Option<Vec3> {
    planet
        .radial_direction(position)
        .map(|dir| surface_point(&dir, planet, offset))
}

/// Point at `offset` above the surface along the unit radial `direction`.
#[inline]
pub fn surface_point(direction: &Vec3, planet: &Planet, offset: f32) -> Vec3 {
    planet.center() + direction * (planet.radius() + offset)
}

/// Orthonormal frame on the tangent plane of a sphere point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TangentBasis {
    /// Radial direction (local vertical).
    pub up: Vec3,
    /// Local "strafe right".
    pub right: Vec3,
    /// Local "walk forward".
    pub forward: Vec3,
}

/// Reference axis that is guaranteed not to be nearly parallel to `up`.
pub fn reference_axis(up: &Vec3) -> Vec3 {
    if up.dot(&WORLD_Y).abs() > REFERENCE_AXIS_DOT_LIMIT {
        WORLD_X
    } else if up.dot(&WORLD_X).abs() > REFERENCE_AXIS_DOT_LIMIT {
        WORLD_Z
    } else {
        WORLD_Y
    }
}

/// Build the tangent basis at a point whose unit radial direction is `up`.
///
/// `right = cross(reference, up)` and `forward = cross(up, right)`, each
/// replaced by a fixed axis (world X, world Z) if it collapses.
pub fn build_tangent_basis(up: &Vec3) -> TangentBasis {
    let reference = reference_axis(up);

    let mut right = reference.cross(up);
    if right.norm_squared() < DEGENERATE_CROSS_LENGTH_SQ {
        right = WORLD_X;
    }
    let right = right.normalize();

    let mut forward = up.cross(&right);
    if forward.norm_squared() < DEGENERATE_CROSS_LENGTH_SQ {
        forward = WORLD_Z;
    }
    let forward = forward.normalize();

    TangentBasis {
        up: *up,
        right,
        forward,
    }
}

/// Result of [`apply_hemisphere_constraint`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HemisphereCheck {
    /// Corrected unit direction (unchanged when `clamped` is false).
    pub direction: Vec3,
    /// The direction was outside the allowed band and got pinned. Wandering
    /// walkers pick a new heading when this is set.
    pub clamped: bool,
}

/// Keep a radial direction inside the band `equator_bias <= y <= pole_buffer`.
///
/// Directions below the band are pinned onto its lower edge (the equator by
/// default), directions above it onto the pole buffer ring. The pinned result
/// is a unit vector whose `y` equals the bound exactly; its horizontal
/// heading is preserved, or world +Z is used when there is none (exact pole).
pub fn apply_hemisphere_constraint(
    direction: &Vec3,
    equator_bias: f32,
    pole_buffer: f32,
) -> HemisphereCheck {
    let Some(unit) = direction.try_normalize(f32::EPSILON) else {
        return HemisphereCheck {
            direction: *direction,
            clamped: false,
        };
    };

    let pinned_y = if unit.y < equator_bias {
        equator_bias
    } else if unit.y > pole_buffer {
        pole_buffer
    } else {
        return HemisphereCheck {
            direction: unit,
            clamped: false,
        };
    };

    HemisphereCheck {
        direction: with_latitude(&unit, pinned_y),
        clamped: true,
    }
}

/// Allowed latitude band for walkers, expressed on the `y` of the unit
/// radial direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HemisphereBand {
    /// Lowest allowed `y` (0 pins walkers to the equator).
    pub equator_bias: f32,
    /// Highest allowed `y`; keeps a dead zone around the exact pole.
    pub pole_buffer: f32,
}

impl HemisphereBand {
    /// Apply the band to a radial direction.
    #[inline]
    pub fn apply(&self, direction: &Vec3) -> HemisphereCheck {
        apply_hemisphere_constraint(direction, self.equator_bias, self.pole_buffer)
    }

    /// Whether the band is non-empty and lies within `[-1, 1]`.
    pub fn is_valid(&self) -> bool {
        self.equator_bias.is_finite()
            && self.pole_buffer.is_finite()
            && -1.0 <= self.equator_bias
            && self.equator_bias < self.pole_buffer
            && self.pole_buffer <= 1.0
    }
}

impl Default for HemisphereBand {
    fn default() -> Self {
        Self {
            equator_bias: DEFAULT_EQUATOR_BIAS,
            pole_buffer: DEFAULT_POLE_BUFFER,
        }
    }
}

/// Unit vector with the given `y` and the same horizontal heading as `unit`.
fn with_latitude(unit: &Vec3, y: f32) -> Vec3 {
    let heading = Vec3::new(unit.x, 0.0, unit.z)
        .try_normalize(f32::EPSILON)
        .unwrap_or(WORLD_Z);
    let ring = (1.0 - y * y).max(0.0).sqrt();
    Vec3::new(heading.x * ring, y, heading.z * ring)
}
