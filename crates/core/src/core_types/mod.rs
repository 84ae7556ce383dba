//! Core types and utilities

pub mod planet;
pub mod pose;
pub mod vec3;

pub use planet::{Planet, PlanetError};
pub use pose::Pose;
pub use vec3::{project_onto_plane, Vec3, WORLD_X, WORLD_Y, WORLD_Z};
