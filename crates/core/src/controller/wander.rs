//! Random wandering for the AI walker.
//!
//! The controller is a single "moving" state with a countdown. It picks a new
//! heading whenever the countdown expires, the hemisphere band pins the walker,
//! or the heading cannot be carried onto the new tangent plane.

use crate::agent::{Agent, MoveOutcome};
use crate::core_types::{project_onto_plane, Vec3, WORLD_X, WORLD_Y};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Squared length under which a candidate heading is considered degenerate.
const DEGENERATE_HEADING_LENGTH_SQ: f32 = 1e-4;

/// Seconds between timed retargets, sampled uniformly from `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetargetInterval {
    pub min: f32,
    pub max: f32,
}

impl RetargetInterval {
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min > 0.0 && self.min <= self.max
    }
}

impl Default for RetargetInterval {
    fn default() -> Self {
        Self { min: 1.5, max: 3.5 }
    }
}

/// Why the wanderer picked a new heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetargetReason {
    /// First heading after spawn.
    Initial,
    /// Countdown expired.
    Timer,
    /// The hemisphere band pinned the walker.
    Constrained,
    /// The heading collapsed when re-projected onto the tangent plane.
    Collapsed,
}

/// AI controller walking in random tangent directions.
#[derive(Debug, Clone)]
pub struct WanderController {
    speed: f32,
    interval: RetargetInterval,
    direction: Vec3,
    timer: f32,
    retargets: u64,
    rng: StdRng,
}

impl WanderController {
    /// Create a controller. With `seed` set, every run of the same session is
    /// identical; without it the generator is seeded from the OS.
    pub fn new(speed: f32, interval: RetargetInterval, seed: Option<u64>) -> Self {
        let rng = seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
        Self {
            speed,
            interval,
            direction: Vec3::zeros(),
            timer: 0.0,
            retargets: 0,
            rng,
        }
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Current unit heading (zero before the first retarget).
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Seconds until the next timed retarget.
    pub fn time_to_retarget(&self) -> f32 {
        self.timer
    }

    /// Number of headings picked so far.
    pub fn retarget_count(&self) -> u64 {
        self.retargets
    }

    /// Pick the first heading for a freshly spawned agent.
    pub fn begin(&mut self, agent: &mut Agent) {
        self.retarget(agent, RetargetReason::Initial);
    }

    /// Pick a random heading on the agent's tangent plane and restart the countdown.
    ///
    /// The candidate is a random vector with components in `[-0.5, 0.5)` minus its
    /// radial part. If that is degenerate, `cross(up, world Y)` is used, then world X.
    /// The stored heading is always unit length.
    pub fn choose_new_direction(&mut self, agent: &Agent) -> Vec3 {
        let up = agent.up();

        let candidate = Vec3::new(
            self.rng.random_range(-0.5..0.5),
            self.rng.random_range(-0.5..0.5),
            self.rng.random_range(-0.5..0.5),
        );
        let mut tangent = project_onto_plane(&candidate, &up);
        if tangent.norm_squared() < DEGENERATE_HEADING_LENGTH_SQ {
            tangent = up.cross(&WORLD_Y);
        }
        if tangent.norm_squared() < DEGENERATE_HEADING_LENGTH_SQ {
            tangent = WORLD_X;
        }

        self.direction = tangent.normalize();
        self.timer = self.sample_interval();
        self.retargets += 1;
        self.direction
    }

    /// Advance one tick: count down, retarget if due, then walk.
    pub fn update(&mut self, agent: &mut Agent, dt: f32) -> MoveOutcome {
        self.timer -= dt;
        if self.timer <= 0.0 {
            self.retarget(agent, RetargetReason::Timer);
        }

        let outcome = agent.move_along_tangent(&self.direction, self.speed, dt);
        if outcome.moved {
            if outcome.constrained {
                self.retarget(agent, RetargetReason::Constrained);
            } else if let Some(heading) = outcome.heading {
                self.direction = heading;
            } else {
                self.retarget(agent, RetargetReason::Collapsed);
            }
        }
        outcome
    }

    fn retarget(&mut self, agent: &mut Agent, reason: RetargetReason) {
        let direction = self.choose_new_direction(agent);
        agent.face_towards(&direction);
        debug!(
            ?reason,
            timer = self.timer,
            count = self.retargets,
            "Wanderer picked a new heading"
        );
    }

    fn sample_interval(&mut self) -> f32 {
        if self.interval.min >= self.interval.max {
            return self.interval.min;
        }
        self.rng.random_range(self.interval.min..=self.interval.max)
    }
}
