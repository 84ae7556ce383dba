//! Orbit follow camera
//!
//! Third-person camera that trails a walker around the planet. The desired
//! camera point sits out along the walker's radial direction, shifted by a
//! fixed world-space height:
//!
//! ```text
//! desired = target + normalize(target - center) * offset.z + (0, offset.y, 0)
//! ```
//!
//! Two chained exponential filters (an internal target point, then the camera
//! itself) smooth the motion; the look-at point is filtered towards the
//! walker separately.
//!
//! # Smoothing and frame rate
//!
//! By default the filter factor is applied once per tick, so the feel depends
//! on the tick rate. [`SmoothingMode::FrameRateIndependent`] converts the
//! factor into a decay over time instead, matching the per-tick feel exactly
//! at `reference_hz`.

use crate::core_types::{Planet, Pose, Vec3, WORLD_Y, WORLD_Z};
use crate::sphere::REFERENCE_AXIS_DOT_LIMIT;
use nalgebra::{Isometry3, Point3, UnitQuaternion};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How the smoothness factor is turned into a per-tick interpolation weight.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SmoothingMode {
    /// Use `smoothness` directly every tick.
    #[default]
    PerTick,
    /// Use `1 - (1 - smoothness)^(dt * reference_hz)`.
    FrameRateIndependent { reference_hz: f32 },
}

impl SmoothingMode {
    /// Interpolation weight for one tick of length `dt`, in `[0, 1]`.
    pub fn factor(&self, smoothness: f32, dt: f32) -> f32 {
        let smoothness = smoothness.clamp(0.0, 1.0);
        match *self {
            SmoothingMode::PerTick => smoothness,
            SmoothingMode::FrameRateIndependent { reference_hz } => {
                let ticks = (dt * reference_hz).max(0.0);
                (1.0 - (1.0 - smoothness).powf(ticks)).clamp(0.0, 1.0)
            }
        }
    }
}

/// Camera tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// `z`: distance out along the walker's radial direction; `y`: world-space
    /// height shift. `x` is accepted but not used by the follow rule.
    pub offset: Vec3,
    /// Interpolation factor in `(0, 1]`.
    pub smoothness: f32,
    /// Where the camera sits before it has a target.
    pub initial_position: Vec3,
    pub smoothing: SmoothingMode,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            offset: Vec3::new(0.0, -3.0, 12.0),
            smoothness: 0.1,
            initial_position: Vec3::new(0.0, 4.0, 17.0),
            smoothing: SmoothingMode::PerTick,
        }
    }
}

impl CameraConfig {
    pub fn is_valid(&self) -> bool {
        let reference_ok = match self.smoothing {
            SmoothingMode::PerTick => true,
            SmoothingMode::FrameRateIndependent { reference_hz } => {
                reference_hz.is_finite() && reference_hz > 0.0
            }
        };
        self.offset.iter().all(|c| c.is_finite())
            && self.initial_position.iter().all(|c| c.is_finite())
            && self.smoothness > 0.0
            && self.smoothness <= 1.0
            && reference_ok
    }
}

/// Resolved camera placement handed to renderers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    pub position: Vec3,
    pub look_at: Vec3,
}

impl CameraPose {
    /// Unit view direction, `None` when position and look-at coincide.
    pub fn direction(&self) -> Option<Vec3> {
        (self.look_at - self.position).try_normalize(f32::EPSILON)
    }

    /// World up used to roll the camera: world Y unless looking straight along it.
    fn roll_up(direction: &Vec3) -> Vec3 {
        if direction.dot(&WORLD_Y).abs() > REFERENCE_AXIS_DOT_LIMIT {
            WORLD_Z
        } else {
            WORLD_Y
        }
    }

    /// Camera rotation for a renderer whose cameras look down local -Z.
    pub fn rotation(&self) -> Option<UnitQuaternion<f32>> {
        let direction = self.direction()?;
        Some(UnitQuaternion::face_towards(
            &-direction,
            &Self::roll_up(&direction),
        ))
    }

    /// Right-handed view transform (world to camera).
    pub fn view(&self) -> Option<Isometry3<f32>> {
        let direction = self.direction()?;
        Some(Isometry3::look_at_rh(
            &Point3::from(self.position),
            &Point3::from(self.look_at),
            &Self::roll_up(&direction),
        ))
    }
}

/// Smoothed third-person camera.
#[derive(Debug, Clone)]
pub struct OrbitFollowCamera {
    config: CameraConfig,
    center: Vec3,
    target_position: Vec3,
    smoothed_position: Vec3,
    smoothed_look_at: Vec3,
    initialized: bool,
}

impl OrbitFollowCamera {
    /// Camera parked at `config.initial_position`, looking at the planet center.
    pub fn new(config: CameraConfig, planet: &Planet) -> Self {
        Self {
            config,
            center: planet.center(),
            target_position: config.initial_position,
            smoothed_position: config.initial_position,
            smoothed_look_at: planet.center(),
            initialized: false,
        }
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    /// Whether the camera has snapped onto a target.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn pose(&self) -> CameraPose {
        CameraPose {
            position: self.smoothed_position,
            look_at: self.smoothed_look_at,
        }
    }

    /// Where the camera wants to be for a walker at `target`.
    pub fn desired_position(&self, target: &Vec3) -> Vec3 {
        let radial = (target - self.center)
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vec3::zeros);
        target + radial * self.config.offset.z + Vec3::new(0.0, self.config.offset.y, 0.0)
    }

    /// Jump straight to the desired point for `target`, skipping the fly-in.
    ///
    /// The look-at point is left alone and keeps easing towards the walker.
    pub fn initialize(&mut self, target: &Pose) {
        let desired = self.desired_position(&target.position);
        self.target_position = desired;
        self.smoothed_position = desired;
        self.initialized = true;
        debug!(x = desired.x, y = desired.y, z = desired.z, "Camera snapped to target");
    }

    /// Advance the filters one tick.
    ///
    /// With no target the camera holds still and will snap again when a
    /// target next appears.
    pub fn update(&mut self, target: Option<&Pose>, dt: f32) {
        let Some(target) = target else {
            self.initialized = false;
            return;
        };
        if !self.initialized {
            self.initialize(target);
        }

        let k = self.config.smoothing.factor(self.config.smoothness, dt);
        let desired = self.desired_position(&target.position);
        self.target_position = self.target_position.lerp(&desired, k);
        self.smoothed_position = self.smoothed_position.lerp(&self.target_position, k);
        self.smoothed_look_at = self.smoothed_look_at.lerp(&target.position, k);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn target() -> Pose {
        Pose::new(Vec3::new(0.0, 11.0, 0.0), Vec3::z(), Vec3::y())
    }

    #[test]
    fn test_first_target_snaps() {
        let planet = Planet::at_origin(10.0).unwrap();
        let mut camera = OrbitFollowCamera::new(CameraConfig::default(), &planet);
        assert_eq!(camera.pose().position, Vec3::new(0.0, 4.0, 17.0));

        camera.update(Some(&target()), 1.0 / 60.0);
        // 11 up + 12 out along +Y - 3 height
        assert_relative_eq!(camera.pose().position, Vec3::new(0.0, 20.0, 0.0), epsilon = 1e-5);
        assert!(camera.is_initialized());
    }

    #[test]
    fn test_losing_target_resnaps() {
        let planet = Planet::at_origin(10.0).unwrap();
        let mut camera = OrbitFollowCamera::new(CameraConfig::default(), &planet);
        camera.update(Some(&target()), 0.016);
        camera.update(None, 0.016);
        assert!(!camera.is_initialized());

        let moved = Pose::new(Vec3::new(11.0, 0.0, 0.0), Vec3::z(), Vec3::x());
        camera.update(Some(&moved), 0.016);
        assert_relative_eq!(camera.pose().position, Vec3::new(23.0, -3.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_frame_rate_independent_matches_reference_rate() {
        let mode = SmoothingMode::FrameRateIndependent { reference_hz: 60.0 };
        assert_relative_eq!(mode.factor(0.1, 1.0 / 60.0), 0.1, epsilon = 1e-5);

        // Two half ticks compose to one reference tick
        let half = mode.factor(0.1, 1.0 / 120.0);
        assert_relative_eq!(1.0 - (1.0 - half) * (1.0 - half), 0.1, epsilon = 1e-5);
        assert_eq!(SmoothingMode::PerTick.factor(0.1, 5.0), 0.1);
    }

    #[test]
    fn test_camera_rotation_faces_look_at() {
        let pose = CameraPose {
            position: Vec3::new(0.0, 0.0, 10.0),
            look_at: Vec3::zeros(),
        };
        let rot = pose.rotation().unwrap();
        assert_relative_eq!(rot * -Vec3::z(), -Vec3::z(), epsilon = 1e-6);

        let straight_down = CameraPose {
            position: Vec3::new(0.0, 20.0, 0.0),
            look_at: Vec3::zeros(),
        };
        assert!(straight_down.view().is_some());

        let degenerate = CameraPose {
            position: Vec3::zeros(),
            look_at: Vec3::zeros(),
        };
        assert!(degenerate.rotation().is_none());
    }

    #[test]
    fn test_config_validation() {
        assert!(CameraConfig::default().is_valid());
        let zero = CameraConfig {
            smoothness: 0.0,
            ..CameraConfig::default()
        };
        assert!(!zero.is_valid());
        let bad_rate = CameraConfig {
            smoothing: SmoothingMode::FrameRateIndependent { reference_hz: 0.0 },
            ..CameraConfig::default()
        };
        assert!(!bad_rate.is_valid());
    }
}
