//! Planet walking session
//!
//! `PlanetSimulation` owns one planet, a keyboard-driven player, one wandering
//! AI walker, a footstep trail for each, and the follow camera. Each call to
//! [`PlanetSimulation::update`] runs one tick in a fixed order:
//!
//! 1. player controller
//! 2. wander controller
//! 3. both footstep trails (sampling the poses written in steps 1-2)
//! 4. camera (following the player's new pose)

mod snapshot;

pub use snapshot::FrameSnapshot;

use crate::agent::{Agent, Facing};
use crate::camera::{CameraPose, OrbitFollowCamera};
use crate::config::{ConfigError, SimulationConfig};
use crate::controller::{MovementInput, PlayerController, WanderController};
use crate::core_types::{Planet, Pose};
use crate::footsteps::FootstepTrail;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, trace, warn};

/// Which walker a query refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Walker {
    Player,
    Wanderer,
}

/// A player-controlled walker and its trail.
#[derive(Debug, Clone)]
struct PlayerSlot {
    agent: Agent,
    controller: PlayerController,
    trail: FootstepTrail,
}

/// An AI walker and its trail.
#[derive(Debug, Clone)]
struct WandererSlot {
    agent: Agent,
    controller: WanderController,
    trail: FootstepTrail,
}

/// One planet walking session.
#[derive(Debug, Clone)]
pub struct PlanetSimulation {
    config: SimulationConfig,
    planet: Arc<Planet>,
    player: PlayerSlot,
    wanderer: WandererSlot,
    camera: OrbitFollowCamera,
    tick: u64,
    elapsed: f64,
}

impl PlanetSimulation {
    /// Build a session from a validated config.
    ///
    /// Both walkers start at the spawn point; the wanderer has already picked
    /// its first heading. The camera waits at its initial position until the
    /// first tick.
    ///
    /// # Errors
    ///
    /// Returns any [`SimulationConfig::validate`] error.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let planet = Arc::new(config.planet.build()?);

        let player = PlayerSlot {
            agent: Agent::new(
                Arc::clone(&planet),
                config.surface_offset,
                Facing::SurfaceForward,
                config.hemisphere,
            ),
            controller: PlayerController::new(config.player_speed()),
            trail: FootstepTrail::new(config.player.max_footsteps, config.footstep_interval),
        };

        let mut wanderer = WandererSlot {
            agent: Agent::new(
                Arc::clone(&planet),
                config.surface_offset,
                Facing::Heading,
                config.hemisphere,
            ),
            controller: WanderController::new(
                config.wanderer_speed(),
                config.wanderer.retarget,
                config.wanderer.seed,
            ),
            trail: FootstepTrail::new(config.wanderer.max_footsteps, config.footstep_interval),
        };
        wanderer.controller.begin(&mut wanderer.agent);

        let camera = OrbitFollowCamera::new(config.camera, &planet);

        info!(
            radius = planet.radius(),
            quality = ?config.quality,
            seed = ?config.wanderer.seed,
            "Planet walk session created"
        );

        Ok(Self {
            config,
            planet,
            player,
            wanderer,
            camera,
            tick: 0,
            elapsed: 0.0,
        })
    }

    /// Advance the session by `dt` seconds.
    ///
    /// A non-finite or non-positive `dt` is logged and ignored.
    pub fn update(&mut self, input: &MovementInput, dt: f32) {
        if !dt.is_finite() || dt <= 0.0 {
            warn!(dt, "Ignoring tick with invalid dt");
            return;
        }

        self.player
            .controller
            .update(&mut self.player.agent, input, dt);
        self.wanderer
            .controller
            .update(&mut self.wanderer.agent, dt);

        self.player.trail.record_tick(self.player.agent.pose(), dt);
        self.wanderer
            .trail
            .record_tick(self.wanderer.agent.pose(), dt);

        self.camera.update(Some(self.player.agent.pose()), dt);

        self.tick += 1;
        self.elapsed += f64::from(dt);
        trace!(
            tick = self.tick,
            player = ?self.player.agent.position(),
            wanderer = ?self.wanderer.agent.position(),
            "Tick complete"
        );
    }

    /// Put both walkers back at spawn, clear both trails and restart the camera.
    ///
    /// The wanderer keeps its RNG stream and picks a fresh heading.
    pub fn reset(&mut self) {
        self.player.agent.reset_to_spawn();
        self.player.trail.clear();
        self.wanderer.agent.reset_to_spawn();
        self.wanderer.trail.clear();
        self.wanderer.controller.begin(&mut self.wanderer.agent);
        self.camera = OrbitFollowCamera::new(self.config.camera, &self.planet);
        self.tick = 0;
        self.elapsed = 0.0;
        info!("Planet walk session reset");
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn planet(&self) -> &Planet {
        &self.planet
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn agent(&self, walker: Walker) -> &Agent {
        match walker {
            Walker::Player => &self.player.agent,
            Walker::Wanderer => &self.wanderer.agent,
        }
    }

    pub fn pose(&self, walker: Walker) -> &Pose {
        self.agent(walker).pose()
    }

    pub fn trail(&self, walker: Walker) -> &FootstepTrail {
        match walker {
            Walker::Player => &self.player.trail,
            Walker::Wanderer => &self.wanderer.trail,
        }
    }

    pub fn wander_controller(&self) -> &WanderController {
        &self.wanderer.controller
    }

    pub fn camera(&self) -> &OrbitFollowCamera {
        &self.camera
    }

    pub fn camera_pose(&self) -> CameraPose {
        self.camera.pose()
    }

    /// Capture the current frame.
    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            tick: self.tick,
            elapsed: self.elapsed,
            player: *self.player.agent.pose(),
            wanderer: *self.wanderer.agent.pose(),
            player_footsteps: self.player.trail.views(&self.planet),
            wanderer_footsteps: self.wanderer.trail.views(&self.planet),
            camera: self.camera.pose(),
        }
    }
}
