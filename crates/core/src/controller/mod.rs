//! Controllers that drive agents each tick
//!
//! - [`PlayerController`]: discrete key intents from the host
//! - [`WanderController`]: random tangent wandering for the AI walker
//!
//! Controllers are the only writers of an agent's pose. They run before the
//! footstep trails and the camera sample that pose in the same tick.

pub mod player;
pub mod wander;

pub use player::{MovementInput, PlayerController};
pub use wander::{RetargetInterval, RetargetReason, WanderController};
