//! C ABI for the planet walk simulation.
//!
//! A host creates a session with `planet_walk_new`, drives it with
//! `planet_walk_update` once per frame, reads poses, the camera and footstep
//! trails back through the query functions, and frees it with
//! `planet_walk_destroy`. Failing calls return a `PlanetWalkErrorCode` and leave
//! a message for `planet_walk_get_last_error` on the calling thread.

mod error;
mod helpers;
mod instance;
mod queries;
mod simulation;

pub use error::{planet_walk_get_last_error, planet_walk_get_last_error_code, PlanetWalkErrorCode};
pub use instance::{planet_walk_destroy, planet_walk_new, PlanetWalkInstance};
pub use queries::{
    planet_walk_get_camera, planet_walk_get_footsteps, planet_walk_get_player_pose,
    planet_walk_get_wanderer_pose, PlanetWalkCamera, PlanetWalkFootstep, PlanetWalkPose,
    PlanetWalkQuat, PlanetWalkVec3, PLANET_WALK_PLAYER, PLANET_WALK_WANDERER,
};
pub use simulation::{planet_walk_reset, planet_walk_update, PlanetWalkInput};
