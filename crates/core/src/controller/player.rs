//! Keyboard-style player control.

use crate::agent::{Agent, MoveOutcome};
use crate::core_types::Vec3;
use crate::sphere::TangentBasis;
use serde::{Deserialize, Serialize};
use tracing::info;

/// One tick worth of player intents.
///
/// Movement flags are level-triggered (held keys); `reset` is edge-triggered
/// by [`PlayerController`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[expect(clippy::struct_excessive_bools, reason = "One flag per key intent")]
pub struct MovementInput {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    pub reset: bool,
}

impl MovementInput {
    /// No keys held.
    pub const IDLE: Self = Self {
        forward: false,
        back: false,
        left: false,
        right: false,
        reset: false,
    };

    /// Only the forward key held.
    pub const FORWARD: Self = Self {
        forward: true,
        ..Self::IDLE
    };

    /// Only the reset key held.
    pub const RESET: Self = Self {
        reset: true,
        ..Self::IDLE
    };

    /// Sum of the held intents in `basis`: forward/back along `basis.forward`,
    /// left/right along `basis.right`. Not normalized; zero when idle or when
    /// opposite keys cancel out.
    pub fn direction(&self, basis: &TangentBasis) -> Vec3 {
        let mut dir = Vec3::zeros();
        if self.forward {
            dir += basis.forward;
        }
        if self.back {
            dir -= basis.forward;
        }
        if self.left {
            dir -= basis.right;
        }
        if self.right {
            dir += basis.right;
        }
        dir
    }

    pub fn is_moving(&self) -> bool {
        self.forward || self.back || self.left || self.right
    }
}

/// Turns [`MovementInput`] into agent movement.
#[derive(Debug, Clone)]
pub struct PlayerController {
    speed: f32,
    reset_held: bool,
}

impl PlayerController {
    pub fn new(speed: f32) -> Self {
        Self {
            speed,
            reset_held: false,
        }
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Apply one tick of input to `agent`.
    ///
    /// A reset press (rising edge) respawns the agent before movement is
    /// applied. Returns `None` when no movement call was made; the agent then
    /// keeps its current orientation.
    pub fn update(
        &mut self,
        agent: &mut Agent,
        input: &MovementInput,
        dt: f32,
    ) -> Option<MoveOutcome> {
        if input.reset && !self.reset_held {
            agent.reset_to_spawn();
            info!("Player reset to spawn");
        }
        self.reset_held = input.reset;

        let dir = input.direction(&agent.tangent_basis());
        if dir.norm_squared() <= f32::EPSILON {
            return None;
        }

        Some(agent.move_along_tangent(&dir.normalize(), self.speed, dt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{spawn_position, Facing};
    use crate::core_types::Planet;
    use crate::sphere::HemisphereBand;
    use std::sync::Arc;

    fn player() -> Agent {
        let planet = Arc::new(Planet::at_origin(10.0).unwrap());
        Agent::new(planet, 1.0, Facing::SurfaceForward, HemisphereBand::default())
    }

    #[test]
    fn test_idle_makes_no_move() {
        let mut agent = player();
        let mut controller = PlayerController::new(3.5);
        let before = *agent.pose();
        assert!(controller.update(&mut agent, &MovementInput::IDLE, 0.016).is_none());
        assert_eq!(*agent.pose(), before);
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let mut agent = player();
        let mut controller = PlayerController::new(3.5);
        let input = MovementInput {
            left: true,
            right: true,
            ..MovementInput::IDLE
        };
        assert!(controller.update(&mut agent, &input, 0.016).is_none());
    }

    #[test]
    fn test_forward_moves_agent_and_faces_surface_forward() {
        let mut agent = player();
        let mut controller = PlayerController::new(3.5);
        let start = agent.position();
        let outcome = controller
            .update(&mut agent, &MovementInput::FORWARD, 0.1)
            .unwrap();
        assert!(outcome.moved);
        assert!((agent.position() - start).norm() > 0.1);
        let basis = agent.tangent_basis();
        assert!((agent.pose().forward - basis.forward).norm() < 1e-5);
    }

    #[test]
    fn test_reset_is_edge_triggered() {
        let mut agent = player();
        let mut controller = PlayerController::new(3.5);
        for _ in 0..10 {
            controller.update(&mut agent, &MovementInput::FORWARD, 0.1);
        }
        let spawn = spawn_position(agent.planet());

        // Press reset while walking: respawn, then this tick's step applies
        let held = MovementInput {
            reset: true,
            ..MovementInput::IDLE
        };
        controller.update(&mut agent, &held, 0.1);
        assert!((agent.position() - spawn).norm() < 1e-5);

        // Walk away while still holding reset: no second respawn
        let walking_with_reset = MovementInput {
            forward: true,
            reset: true,
            ..MovementInput::IDLE
        };
        controller.update(&mut agent, &walking_with_reset, 0.1);
        assert!((agent.position() - spawn).norm() > 0.1);

        // Release and press again: respawn
        controller.update(&mut agent, &MovementInput::IDLE, 0.1);
        controller.update(&mut agent, &MovementInput::RESET, 0.1);
        assert!((agent.position() - spawn).norm() < 1e-5);
    }
}
