//! Walkers on the planet surface.

use crate::core_types::{project_onto_plane, Planet, Pose, Vec3};
use crate::sphere::{
    build_tangent_basis, clamp_to_surface, surface_point, HemisphereBand, TangentBasis,
    DEGENERATE_CROSS_LENGTH_SQ,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::trace;

/// Squared length under which a requested movement direction is ignored.
const MIN_DIRECTION_LENGTH_SQ: f32 = 1e-8;

/// Spawn point as a fraction of the radius, relative to the planet center.
/// Roughly 49° up from the equator on the +Z side.
const SPAWN_FRACTION: Vec3 = Vec3::new(0.0, 0.75, 0.66);

/// Direction a freshly spawned walker looks towards (before projection).
const SPAWN_LOOK: Vec3 = Vec3::new(0.0, 0.0, -1.0);

/// How an agent's `forward` is derived after a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    /// Face the tangent basis forward of the new position (player).
    #[default]
    SurfaceForward,
    /// Face the walking direction re-projected onto the new tangent plane (AI).
    Heading,
}

/// What happened during [`Agent::move_along_tangent`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveOutcome {
    /// The pose changed.
    pub moved: bool,
    /// The hemisphere band pinned the agent back inside.
    pub constrained: bool,
    /// Input direction re-projected onto the new tangent plane, `None` when
    /// the projection collapsed.
    pub heading: Option<Vec3>,
}

impl MoveOutcome {
    fn idle() -> Self {
        Self {
            moved: false,
            constrained: false,
            heading: None,
        }
    }

    /// Whether a wandering controller should pick a new direction.
    pub fn needs_retarget(&self) -> bool {
        self.moved && (self.constrained || self.heading.is_none())
    }
}

/// A walker pinned to `planet.radius() + surface_offset`.
///
/// The planet is shared with every other walker and the camera; the pose is
/// owned. Orientation is rebuilt from the position after every move.
#[derive(Debug, Clone)]
pub struct Agent {
    pose: Pose,
    planet: Arc<Planet>,
    surface_offset: f32,
    facing: Facing,
    band: HemisphereBand,
}

impl Agent {
    /// Create an agent standing at the spawn point.
    pub fn new(
        planet: Arc<Planet>,
        surface_offset: f32,
        facing: Facing,
        band: HemisphereBand,
    ) -> Self {
        let mut agent = Self {
            pose: Pose::default(),
            planet,
            surface_offset,
            facing,
            band,
        };
        agent.reset_to_spawn();
        agent
    }

    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    pub fn position(&self) -> Vec3 {
        self.pose.position
    }

    pub fn planet(&self) -> &Planet {
        &self.planet
    }

    pub fn surface_offset(&self) -> f32 {
        self.surface_offset
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    /// Local vertical at the current position.
    pub fn up(&self) -> Vec3 {
        self.planet
            .radial_direction(&self.pose.position)
            .unwrap_or(self.pose.up)
    }

    /// Tangent basis at the current position.
    pub fn tangent_basis(&self) -> TangentBasis {
        build_tangent_basis(&self.up())
    }

    /// Walk `speed * dt` along `direction`, then re-seat the agent on the sphere.
    ///
    /// `direction` need not be unit length or tangent. A near-zero or non-finite
    /// direction, or a non-positive step, leaves the pose untouched. Degenerate geometry never
    /// fails; it resolves through the fallback axes of the tangent basis.
    pub fn move_along_tangent(
        &mut self,
        direction: &Vec3,
        speed: f32,
        dt: f32,
    ) -> MoveOutcome {
        let distance = speed * dt;
        if !distance.is_finite() || distance <= 0.0 {
            return MoveOutcome::idle();
        }
        if !direction.iter().all(|c| c.is_finite())
            || direction.norm_squared() < MIN_DIRECTION_LENGTH_SQ
        {
            return MoveOutcome::idle();
        }
        let direction = direction.normalize();

        let raw = self.pose.position + direction * distance;
        let Some(mut position) = clamp_to_surface(&raw, &self.planet, self.surface_offset) else {
            return MoveOutcome::idle();
        };

        let Some(radial) = self.planet.radial_direction(&position) else {
            return MoveOutcome::idle();
        };
        let check = self.band.apply(&radial);
        if check.clamped {
            position = surface_point(&check.direction, &self.planet, self.surface_offset);
        }

        let up = self
            .planet
            .radial_direction(&position)
            .unwrap_or(check.direction);
        let basis = build_tangent_basis(&up);

        let projected = project_onto_plane(&direction, &up);
        let heading = if projected.norm_squared() < DEGENERATE_CROSS_LENGTH_SQ {
            None
        } else {
            Some(projected.normalize())
        };

        let forward = match self.facing {
            Facing::SurfaceForward => basis.forward,
            Facing::Heading => heading.unwrap_or(basis.forward),
        };
        self.pose = Pose::new(position, forward, up);

        trace!(
            x = position.x,
            y = position.y,
            z = position.z,
            constrained = check.clamped,
            "agent moved"
        );

        MoveOutcome {
            moved: true,
            constrained: check.clamped,
            heading,
        }
    }

    /// Put the agent back on the spawn point, looking towards -Z along the surface.
    ///
    /// The spawn point is not re-seated onto the walking sphere; the first move
    /// does that. Deterministic.
    pub fn reset_to_spawn(&mut self) {
        let position = spawn_position(&self.planet);
        let up = self
            .planet
            .radial_direction(&position)
            .unwrap_or_else(Vec3::y);
        let basis = build_tangent_basis(&up);
        let forward = project_onto_plane(&SPAWN_LOOK, &up)
            .try_normalize(f32::EPSILON)
            .unwrap_or(basis.forward);
        self.pose = Pose::new(position, forward, up);
    }

    /// Face along `direction` projected onto the tangent plane.
    ///
    /// Returns `false` and keeps the current facing when the projection collapses.
    pub fn face_towards(&mut self, direction: &Vec3) -> bool {
        let up = self.up();
        match project_onto_plane(direction, &up).try_normalize(f32::EPSILON) {
            Some(forward) => {
                self.pose = Pose::new(self.pose.position, forward, up);
                true
            }
            None => false,
        }
    }

    /// Distance from the planet center minus `radius + surface_offset`.
    pub fn surface_error(&self) -> f32 {
        self.planet.altitude(&self.pose.position) - self.surface_offset
    }
}

/// Where agents appear on `planet` after a reset.
pub fn spawn_position(planet: &Planet) -> Vec3 {
    planet.center() + SPAWN_FRACTION * planet.radius()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn planet() -> Arc<Planet> {
        Arc::new(Planet::at_origin(10.0).unwrap())
    }

    fn walker(facing: Facing) -> Agent {
        Agent::new(planet(), 1.0, facing, HemisphereBand::default())
    }

    #[test]
    fn test_spawn_pose() {
        let agent = walker(Facing::SurfaceForward);
        assert_relative_eq!(agent.position(), Vec3::new(0.0, 7.5, 6.6), epsilon = 1e-5);
        let pose = agent.pose();
        assert_relative_eq!(pose.forward.norm(), 1.0, epsilon = 1e-5);
        assert!(pose.forward.dot(&pose.up).abs() < 1e-5);
        // Looking towards -Z, tilted along the surface
        assert!(pose.forward.z < 0.0);
    }

    #[test]
    fn test_move_keeps_altitude() {
        let mut agent = walker(Facing::SurfaceForward);
        let dir = agent.tangent_basis().right;
        let outcome = agent.move_along_tangent(&dir, 3.5, 0.016);
        assert!(outcome.moved);
        assert!(!outcome.constrained);
        assert!(outcome.heading.is_some());
        assert!(agent.surface_error().abs() < 1e-4);
    }

    #[test]
    fn test_zero_direction_is_noop() {
        let mut agent = walker(Facing::SurfaceForward);
        let before = *agent.pose();
        let outcome = agent.move_along_tangent(&Vec3::zeros(), 3.5, 0.016);
        assert!(!outcome.moved);
        assert_eq!(*agent.pose(), before);

        let outcome = agent.move_along_tangent(&Vec3::x(), 3.5, 0.0);
        assert!(!outcome.moved);
        let outcome = agent.move_along_tangent(&Vec3::x(), 3.5, f32::NAN);
        assert!(!outcome.moved);
    }

    #[test]
    fn test_non_finite_direction_is_noop() {
        let mut agent = walker(Facing::Heading);
        let before = *agent.pose();
        for dir in [
            Vec3::new(f32::NAN, 0.0, 1.0),
            Vec3::new(0.0, f32::INFINITY, 0.0),
            Vec3::new(1.0, 0.0, f32::NEG_INFINITY),
        ] {
            let outcome = agent.move_along_tangent(&dir, 3.5, 0.016);
            assert!(!outcome.moved);
            assert_eq!(*agent.pose(), before);
        }
    }

    #[test]
    fn test_lower_hemisphere_is_pinned_to_equator() {
        let mut agent = walker(Facing::Heading);
        let outcome = agent.move_along_tangent(&-Vec3::y(), 2.0, 10.0);
        assert!(outcome.moved);
        assert!(outcome.constrained);
        assert!(outcome.needs_retarget());
        assert!(agent.position().y.abs() < 1e-5);
        assert!(agent.surface_error().abs() < 1e-4);
    }

    #[test]
    fn test_heading_facing_follows_walk_direction() {
        let mut agent = walker(Facing::Heading);
        let right = agent.tangent_basis().right;
        let outcome = agent.move_along_tangent(&right, 1.0, 0.1);
        let heading = outcome.heading.unwrap();
        assert_relative_eq!(agent.pose().forward, heading, epsilon = 1e-6);
        assert!(heading.dot(&right) > 0.99);
    }

    #[test]
    fn test_face_towards_rejects_radial_direction() {
        let mut agent = walker(Facing::Heading);
        let before = agent.pose().forward;
        let up = agent.up();
        assert!(!agent.face_towards(&up));
        assert_eq!(agent.pose().forward, before);
        assert!(agent.face_towards(&Vec3::x()));
        assert_relative_eq!(agent.pose().forward, Vec3::x(), epsilon = 1e-6);
    }
}
