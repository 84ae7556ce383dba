//! Planet Walk Core Library
//!
//! Locomotion on a small spherical planet: walkers stay glued to the surface
//! at a fixed height, orient themselves from a stable tangent basis (including
//! at the poles), stay inside a latitude band, leave fading footstep trails,
//! and are followed by a smoothed orbit camera.
//!
//! ## Layout
//!
//! - [`sphere`]: surface clamping, tangent basis, hemisphere constraint
//! - [`agent`]: a walker's pose and the tangent-plane move
//! - [`controller`]: keyboard-driven player and random wanderer
//! - [`footsteps`]: bounded FIFO footstep trail
//! - [`camera`]: orbit follow camera
//! - [`config`] and [`simulation`]: a complete session driven tick by tick
//!
//! ```
//! use planet_walk_core::{MovementInput, PlanetSimulation, SimulationConfig};
//!
//! let mut sim = PlanetSimulation::new(SimulationConfig::default().with_seed(1)).unwrap();
//! for _ in 0..60 {
//!     sim.update(&MovementInput::FORWARD, 1.0 / 60.0);
//! }
//! let frame = sim.snapshot();
//! assert_eq!(frame.tick, 60);
//! ```

// Core types and utilities
pub mod core_types;

// Surface geometry
pub mod sphere;

// Walkers and their drivers
pub mod agent;
pub mod controller;

// Presentation helpers
pub mod camera;
pub mod footsteps;

// Session
pub mod config;
pub mod simulation;

// Math backend, so bindings can name its types
pub use nalgebra;

// Re-export core types
pub use core_types::{Planet, PlanetError, Pose, Vec3};

// Re-export locomotion types
pub use agent::{Agent, Facing, MoveOutcome};
pub use controller::{MovementInput, PlayerController, RetargetInterval, WanderController};
pub use sphere::{HemisphereBand, TangentBasis};

// Re-export presentation types
pub use camera::{CameraConfig, CameraPose, OrbitFollowCamera, SmoothingMode};
pub use footsteps::{FootstepRecord, FootstepTrail, FootstepView};

// Re-export session types
pub use config::{ConfigError, Quality, SimulationConfig};
pub use simulation::{FrameSnapshot, PlanetSimulation, Walker};
