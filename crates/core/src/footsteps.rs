//! Footstep trails
//!
//! A bounded, oldest-first history of where a walker has been. Purely
//! cosmetic: renderers draw each record as a decal on the planet surface,
//! fading the older ones out.
//!
//! Records are placed on a fixed cadence while the walker exists, whether or
//! not it moved. A fresh trail places its first record on its first tick.

use crate::core_types::{Planet, Pose, Vec3};
use nalgebra::UnitQuaternion;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Lowest opacity handed to renderers, so the oldest decal stays visible.
const MIN_OPACITY: f32 = 0.1;

/// Default seconds between footsteps.
pub const DEFAULT_FOOTSTEP_INTERVAL: f32 = 0.5;

/// One placed footstep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FootstepRecord {
    /// Walker position when the step was placed.
    pub position: Vec3,
    /// Walker orientation when the step was placed.
    pub rotation: UnitQuaternion<f32>,
    /// Seconds since placement.
    pub age: f32,
}

impl FootstepRecord {
    pub fn from_pose(pose: &Pose) -> Self {
        Self {
            position: pose.position,
            rotation: pose.rotation(),
            age: 0.0,
        }
    }

    /// Decal placement on the literal planet surface (no walking offset) and
    /// the outward normal there. `None` if the step sits on the planet center.
    pub fn decal(&self, planet: &Planet) -> Option<(Vec3, Vec3)> {
        let normal = planet.radial_direction(&self.position)?;
        Some((planet.center() + normal * planet.radius(), normal))
    }
}

/// Render-facing view of a record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FootstepView {
    pub position: Vec3,
    pub rotation: UnitQuaternion<f32>,
    pub age: f32,
    /// `max(0.1, (index + 1) / max_footsteps)`, oldest first.
    pub opacity: f32,
    /// Decal position on the planet surface.
    pub decal_position: Vec3,
    /// Outward surface normal at the decal.
    pub decal_normal: Vec3,
}

/// Bounded FIFO of footsteps sampled from one walker.
#[derive(Debug, Clone)]
pub struct FootstepTrail {
    records: VecDeque<FootstepRecord>,
    max_footsteps: usize,
    interval: f32,
    since_last: Option<f32>,
}

impl FootstepTrail {
    /// `max_footsteps` is raised to 1 if zero.
    pub fn new(max_footsteps: usize, interval: f32) -> Self {
        let max_footsteps = max_footsteps.max(1);
        Self {
            records: VecDeque::with_capacity(max_footsteps + 1),
            max_footsteps,
            interval,
            since_last: None,
        }
    }

    pub fn max_footsteps(&self) -> usize {
        self.max_footsteps
    }

    pub fn interval(&self) -> f32 {
        self.interval
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records, oldest first.
    pub fn records(&self) -> impl ExactSizeIterator<Item = &FootstepRecord> {
        self.records.iter()
    }

    /// Sample the walker for this tick.
    ///
    /// Ages every record by `dt`, then places a new record once more than
    /// `interval` seconds have passed since the previous one. Returns whether a
    /// record was placed.
    pub fn record_tick(&mut self, pose: &Pose, dt: f32) -> bool {
        for record in &mut self.records {
            record.age += dt;
        }

        let due = match self.since_last {
            None => true,
            Some(elapsed) => {
                let elapsed = elapsed + dt;
                self.since_last = Some(elapsed);
                elapsed > self.interval
            }
        };
        if !due {
            return false;
        }

        self.push(FootstepRecord::from_pose(pose));
        self.since_last = Some(0.0);
        true
    }

    /// Append a record, evicting the oldest ones beyond capacity.
    pub fn push(&mut self, record: FootstepRecord) {
        self.records.push_back(record);
        while self.records.len() > self.max_footsteps {
            self.records.pop_front();
        }
    }

    /// Drop every record and restart the placement cadence.
    pub fn clear(&mut self) {
        self.records.clear();
        self.since_last = None;
    }

    /// Opacity hint for the record at `index` (oldest = 0).
    pub fn opacity(&self, index: usize) -> f32 {
        ((index + 1) as f32 / self.max_footsteps as f32).max(MIN_OPACITY)
    }

    /// Render views of every record, oldest first.
    pub fn views(&self, planet: &Planet) -> Vec<FootstepView> {
        self.records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let (decal_position, decal_normal) = record
                    .decal(planet)
                    .unwrap_or((record.position, record.rotation * Vec3::y()));
                FootstepView {
                    position: record.position,
                    rotation: record.rotation,
                    age: record.age,
                    opacity: self.opacity(index),
                    decal_position,
                    decal_normal,
                }
            })
            .collect()
    }
}

impl Default for FootstepTrail {
    fn default() -> Self {
        Self::new(10, DEFAULT_FOOTSTEP_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn record(x: f32) -> FootstepRecord {
        FootstepRecord {
            position: Vec3::new(x, 11.0, 0.0),
            rotation: UnitQuaternion::identity(),
            age: 0.0,
        }
    }

    fn pose_at(x: f32) -> Pose {
        Pose::new(Vec3::new(x, 11.0, 0.0), Vec3::z(), Vec3::y())
    }

    #[test]
    fn test_fifo_eviction() {
        let mut trail = FootstepTrail::new(3, DEFAULT_FOOTSTEP_INTERVAL);
        for i in 1..=5 {
            trail.push(record(i as f32));
        }
        let xs: Vec<f32> = trail.records().map(|r| r.position.x).collect();
        assert_eq!(xs, vec![3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_first_tick_places_then_cadence() {
        let mut trail = FootstepTrail::new(10, 0.5);
        assert!(trail.record_tick(&pose_at(0.0), 0.016));
        assert_eq!(trail.len(), 1);

        // 0.5 s exactly is not "more than" the interval
        for _ in 0..4 {
            assert!(!trail.record_tick(&pose_at(0.0), 0.125));
        }
        assert!(trail.record_tick(&pose_at(1.0), 0.125));
        assert_eq!(trail.len(), 2);
    }

    #[test]
    fn test_ages_accumulate() {
        let mut trail = FootstepTrail::new(4, 0.5);
        trail.record_tick(&pose_at(0.0), 0.25);
        trail.record_tick(&pose_at(0.0), 0.25);
        trail.record_tick(&pose_at(0.0), 0.25);
        let ages: Vec<f32> = trail.records().map(|r| r.age).collect();
        assert_relative_eq!(ages[0], 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_capacity_holds_under_ticking() {
        let mut trail = FootstepTrail::new(6, 0.5);
        for i in 0..1000 {
            trail.record_tick(&pose_at(i as f32 * 0.01), 0.1);
            assert!(trail.len() <= 6);
        }
        assert_eq!(trail.len(), 6);
    }

    #[test]
    fn test_opacity_ramp() {
        let trail = FootstepTrail::new(10, 0.5);
        assert_relative_eq!(trail.opacity(0), 0.1);
        assert_relative_eq!(trail.opacity(4), 0.5);
        assert_relative_eq!(trail.opacity(9), 1.0);

        let short = FootstepTrail::new(20, 0.5);
        assert_relative_eq!(short.opacity(0), 0.1);
        assert_relative_eq!(short.opacity(1), 0.1);
        assert_relative_eq!(short.opacity(3), 0.2);
    }

    #[test]
    fn test_views_sit_on_surface() {
        let planet = Planet::at_origin(10.0).unwrap();
        let mut trail = FootstepTrail::new(3, 0.5);
        trail.push(record(0.0));
        let views = trail.views(&planet);
        assert_eq!(views.len(), 1);
        assert_relative_eq!(views[0].decal_position, Vec3::new(0.0, 10.0, 0.0), epsilon = 1e-5);
        assert_relative_eq!(views[0].decal_normal, Vec3::y(), epsilon = 1e-6);
        assert_relative_eq!(views[0].opacity, 1.0 / 3.0, epsilon = 1e-6);
    }

    #[test]
    fn test_zero_capacity_is_raised() {
        let mut trail = FootstepTrail::new(0, 0.5);
        trail.push(record(1.0));
        trail.push(record(2.0));
        assert_eq!(trail.len(), 1);
        trail.clear();
        assert!(trail.is_empty());
    }
}
