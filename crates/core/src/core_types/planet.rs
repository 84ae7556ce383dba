//! The sphere agents walk on.

use super::vec3::Vec3;
use serde::{Deserialize, Serialize};

/// A spherical planet: a center and a strictly positive radius.
///
/// Planets are immutable once built. Agents and the camera share one planet
/// read-only for the whole session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Planet {
    center: Vec3,
    radius: f32,
}

impl Planet {
    /// Create a validated planet.
    ///
    /// # Errors
    ///
    /// Returns [`PlanetError::InvalidRadius`] if `radius` is not finite and
    /// positive, and [`PlanetError::InvalidCenter`] if any component of
    /// `center` is not finite.
    pub fn new(center: Vec3, radius: f32) -> Result<Self, PlanetError> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(PlanetError::InvalidRadius(radius));
        }
        if !center.iter().all(|c| c.is_finite()) {
            return Err(PlanetError::InvalidCenter([center.x, center.y, center.z]));
        }
        Ok(Self { center, radius })
    }

    /// Planet centered on the world origin.
    ///
    /// # Errors
    ///
    /// Same as [`Planet::new`].
    pub fn at_origin(radius: f32) -> Result<Self, PlanetError> {
        Self::new(Vec3::zeros(), radius)
    }

    /// Center of the sphere in world space.
    #[inline]
    pub fn center(&self) -> Vec3 {
        self.center
    }

    /// Radius of the literal surface.
    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Unit vector from the center towards `position`, or `None` when the
    /// position coincides with the center.
    #[inline]
    pub fn radial_direction(&self, position: &Vec3) -> Option<Vec3> {
        (position - self.center).try_normalize(f32::EPSILON)
    }

    /// Signed height of `position` above the literal surface.
    pub fn altitude(&self, position: &Vec3) -> f32 {
        (position - self.center).norm() - self.radius
    }
}

/// Rejected planet parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlanetError {
    /// Radius was zero, negative, NaN or infinite.
    InvalidRadius(f32),
    /// Center had a non-finite component.
    InvalidCenter([f32; 3]),
}

impl std::fmt::Display for PlanetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlanetError::InvalidRadius(r) => {
                write!(f, "Planet radius must be finite and positive, got {r}")
            }
            PlanetError::InvalidCenter(c) => {
                write!(f, "Planet center must be finite, got {c:?}")
            }
        }
    }
}

impl std::error::Error for PlanetError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_bad_radius() {
        assert_eq!(
            Planet::at_origin(0.0),
            Err(PlanetError::InvalidRadius(0.0))
        );
        assert!(Planet::at_origin(-3.0).is_err());
        assert!(Planet::at_origin(f32::NAN).is_err());
        assert!(Planet::at_origin(f32::INFINITY).is_err());
    }

    #[test]
    fn test_rejects_non_finite_center() {
        let err = Planet::new(Vec3::new(0.0, f32::NAN, 0.0), 10.0).unwrap_err();
        assert!(matches!(err, PlanetError::InvalidCenter(_)));
    }

    #[test]
    fn test_radial_direction_and_altitude() {
        let planet = Planet::new(Vec3::new(1.0, 2.0, 3.0), 10.0).unwrap();
        assert!(planet.radial_direction(&planet.center()).is_none());

        let p = Vec3::new(1.0, 13.0, 3.0);
        let dir = planet.radial_direction(&p).unwrap();
        assert!((dir - Vec3::y()).norm() < 1e-6);
        assert!((planet.altitude(&p) - 1.0).abs() < 1e-5);
    }
}
