//! Per-tick read model of a session for hosts and renderers.

use crate::camera::CameraPose;
use crate::core_types::Pose;
use crate::footsteps::FootstepView;
use serde::{Deserialize, Serialize};

/// Everything a renderer needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    /// Ticks applied so far (rejected `dt` values are not counted)
    pub tick: u64,
    /// Simulated seconds so far
    pub elapsed: f64,
    pub player: Pose,
    pub wanderer: Pose,
    /// Oldest first
    pub player_footsteps: Vec<FootstepView>,
    /// Oldest first
    pub wanderer_footsteps: Vec<FootstepView>,
    pub camera: CameraPose,
}

impl FrameSnapshot {
    /// Serialize as a single JSON line.
    ///
    /// # Errors
    ///
    /// Returns the underlying `serde_json` error if serialization fails.
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
