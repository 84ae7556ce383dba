use planet_walk_core::nalgebra::UnitQuaternion;
use planet_walk_core::{CameraPose, FootstepView, Pose, Vec3, Walker};
use std::ptr;

use crate::error::{FfiError, PlanetWalkErrorCode};
use crate::helpers::{handle_ffi_result_error, instance_from_ptr, track_error, with_walk_sim};
use crate::instance::PlanetWalkInstance;

/// Plain three-component vector.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlanetWalkVec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl From<Vec3> for PlanetWalkVec3 {
    fn from(v: Vec3) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

/// Rotation quaternion, scalar last.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanetWalkQuat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Default for PlanetWalkQuat {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            w: 1.0,
        }
    }
}

impl From<UnitQuaternion<f32>> for PlanetWalkQuat {
    fn from(q: UnitQuaternion<f32>) -> Self {
        Self {
            x: q.i,
            y: q.j,
            z: q.k,
            w: q.w,
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
/// Walker pose. Keep this layout stable for C/C++/C# consumers.
pub struct PlanetWalkPose {
    pub position: PlanetWalkVec3,
    /// Unit facing, tangent to the surface.
    pub forward: PlanetWalkVec3,
    /// Unit local vertical.
    pub up: PlanetWalkVec3,
    /// Rotation taking +Z to `forward` and +Y to `up`.
    pub rotation: PlanetWalkQuat,
}

impl From<&Pose> for PlanetWalkPose {
    fn from(pose: &Pose) -> Self {
        Self {
            position: pose.position.into(),
            forward: pose.forward.into(),
            up: pose.up.into(),
            rotation: pose.rotation().into(),
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
/// Follow camera placement.
pub struct PlanetWalkCamera {
    pub position: PlanetWalkVec3,
    pub look_at: PlanetWalkVec3,
    /// Camera orientation (looking down -Z); identity while `position == look_at`.
    pub rotation: PlanetWalkQuat,
}

impl From<CameraPose> for PlanetWalkCamera {
    fn from(pose: CameraPose) -> Self {
        Self {
            position: pose.position.into(),
            look_at: pose.look_at.into(),
            rotation: pose.rotation().map(PlanetWalkQuat::from).unwrap_or_default(),
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
/// One footprint, ready to draw.
pub struct PlanetWalkFootstep {
    /// Walker position when the step was placed.
    pub position: PlanetWalkVec3,
    pub rotation: PlanetWalkQuat,
    /// Seconds since placement.
    pub age: f32,
    /// Suggested alpha, oldest faintest.
    pub opacity: f32,
    /// Point on the planet surface under the step.
    pub decal_position: PlanetWalkVec3,
    pub decal_normal: PlanetWalkVec3,
}

impl From<&FootstepView> for PlanetWalkFootstep {
    fn from(view: &FootstepView) -> Self {
        Self {
            position: view.position.into(),
            rotation: view.rotation.into(),
            age: view.age,
            opacity: view.opacity,
            decal_position: view.decal_position.into(),
            decal_normal: view.decal_normal.into(),
        }
    }
}

/// Walker selector for `planet_walk_get_footsteps`.
pub const PLANET_WALK_PLAYER: u32 = 0;
/// Walker selector for `planet_walk_get_footsteps`.
pub const PLANET_WALK_WANDERER: u32 = 1;

fn walker_from_u32(which: u32) -> Result<Walker, FfiError> {
    match which {
        PLANET_WALK_PLAYER => Ok(Walker::Player),
        PLANET_WALK_WANDERER => Ok(Walker::Wanderer),
        other => Err(FfiError::invalid_parameter(format!(
            "which must be {PLANET_WALK_PLAYER} (player) or {PLANET_WALK_WANDERER} (wanderer), got {other}"
        ))),
    }
}

/// Shared body of the two pose getters.
unsafe fn write_pose(
    ptr: *const PlanetWalkInstance,
    walker: Walker,
    out_pose: *mut PlanetWalkPose,
) -> PlanetWalkErrorCode {
    if out_pose.is_null() {
        return track_error(&FfiError::null_pointer("out_pose"));
    }

    handle_ffi_result_error(|| {
        let instance = unsafe { instance_from_ptr(ptr) }?;
        let pose = with_walk_sim(instance, |sim| PlanetWalkPose::from(sim.pose(walker)))?;
        unsafe {
            *out_pose = pose;
        }
        Ok(())
    })
}

#[no_mangle]
/// Fill `out_pose` with the player's current pose.
///
/// Thread-safe: acquires the read lock.
///
/// Returns `Ok`, `NullPointer` if `ptr` or `out_pose` is null, or `LockPoisoned`.
///
/// # Safety
/// - `ptr` must be null or a live pointer returned by `planet_walk_new`.
/// - `out_pose` must be null or valid for writes.
pub unsafe extern "C" fn planet_walk_get_player_pose(
    ptr: *const PlanetWalkInstance,
    out_pose: *mut PlanetWalkPose,
) -> PlanetWalkErrorCode {
    unsafe { write_pose(ptr, Walker::Player, out_pose) }
}

#[no_mangle]
/// Fill `out_pose` with the wanderer's current pose.
///
/// Same contract as `planet_walk_get_player_pose`.
///
/// # Safety
/// - `ptr` must be null or a live pointer returned by `planet_walk_new`.
/// - `out_pose` must be null or valid for writes.
pub unsafe extern "C" fn planet_walk_get_wanderer_pose(
    ptr: *const PlanetWalkInstance,
    out_pose: *mut PlanetWalkPose,
) -> PlanetWalkErrorCode {
    unsafe { write_pose(ptr, Walker::Wanderer, out_pose) }
}

#[no_mangle]
/// Fill `out_camera` with the follow camera's current placement.
///
/// Returns `Ok`, `NullPointer` if `ptr` or `out_camera` is null, or `LockPoisoned`.
///
/// # Safety
/// - `ptr` must be null or a live pointer returned by `planet_walk_new`.
/// - `out_camera` must be null or valid for writes.
pub unsafe extern "C" fn planet_walk_get_camera(
    ptr: *const PlanetWalkInstance,
    out_camera: *mut PlanetWalkCamera,
) -> PlanetWalkErrorCode {
    if out_camera.is_null() {
        return track_error(&FfiError::null_pointer("out_camera"));
    }

    handle_ffi_result_error(|| {
        let instance = unsafe { instance_from_ptr(ptr) }?;
        let camera = with_walk_sim(instance, |sim| PlanetWalkCamera::from(sim.camera_pose()))?;
        unsafe {
            *out_camera = camera;
        }
        Ok(())
    })
}

#[no_mangle]
/// Return a borrowed pointer to a snapshot of one walker's footsteps, oldest first.
///
/// - `which` is `PLANET_WALK_PLAYER` or `PLANET_WALK_WANDERER`.
/// - Writes the record count to `out_len` and the array to `out_array`. **DO NOT FREE THIS POINTER**.
/// - The array stays valid until the next call for the same walker or `planet_walk_destroy`.
/// - On error `out_array` is set to null and `out_len` to 0.
///
/// Example:
/// ```cpp
/// size_t len = 0;
/// const PlanetWalkFootstep* steps = nullptr;
/// if (planet_walk_get_footsteps(walk, PLANET_WALK_PLAYER, &len, &steps) == PlanetWalkErrorCode::Ok) {
///     for (size_t i = 0; i < len; ++i) {
///         DrawDecal(steps[i].decal_position, steps[i].decal_normal, steps[i].opacity);
///     }
/// }
/// ```
///
/// Returns `Ok`, `NullPointer`, `InvalidParameter` for an unknown `which`, or `LockPoisoned`.
///
/// # Safety
/// - `ptr` must be null or a live pointer returned by `planet_walk_new`.
/// - `out_len` and `out_array` must be null or valid for writes.
pub unsafe extern "C" fn planet_walk_get_footsteps(
    ptr: *const PlanetWalkInstance,
    which: u32,
    out_len: *mut usize,
    out_array: *mut *const PlanetWalkFootstep,
) -> PlanetWalkErrorCode {
    if out_len.is_null() {
        return track_error(&FfiError::null_pointer("out_len"));
    }

    if out_array.is_null() {
        unsafe {
            *out_len = 0;
        }
        return track_error(&FfiError::null_pointer("out_array"));
    }

    let result = handle_ffi_result_error(|| {
        let walker = walker_from_u32(which)?;
        let instance = unsafe { instance_from_ptr(ptr) }?;
        let buffer = match walker {
            Walker::Player => &instance.player_footsteps,
            Walker::Wanderer => &instance.wanderer_footsteps,
        };
        let mut snapshot = buffer
            .lock()
            .map_err(|_| FfiError::lock_poisoned("Mutex"))?;
        snapshot.clear(); // keeps capacity

        with_walk_sim(instance, |sim| {
            snapshot.extend(
                sim.trail(walker)
                    .views(sim.planet())
                    .iter()
                    .map(PlanetWalkFootstep::from),
            );
        })?;

        unsafe {
            *out_len = snapshot.len();
            *out_array = snapshot.as_ptr();
        }

        Ok(())
    });

    // Set to null on error (per documentation contract)
    if result != PlanetWalkErrorCode::Ok {
        unsafe {
            *out_array = ptr::null();
            *out_len = 0;
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::{planet_walk_destroy, planet_walk_new};
    use crate::simulation::{planet_walk_update, PlanetWalkInput};
    use std::ffi::CString;

    fn seeded_instance() -> *mut PlanetWalkInstance {
        let json = CString::new(r#"{ "wanderer": { "seed": 17 } }"#).unwrap();
        let mut instance = ptr::null_mut();
        let code = unsafe { planet_walk_new(json.as_ptr(), &mut instance) };
        assert_eq!(code, PlanetWalkErrorCode::Ok);
        instance
    }

    #[test]
    fn test_update_and_query_round_trip() {
        let instance = seeded_instance();
        let input = PlanetWalkInput {
            forward: true,
            ..PlanetWalkInput::default()
        };

        let mut start = PlanetWalkPose::default();
        assert_eq!(
            unsafe { planet_walk_get_player_pose(instance, &mut start) },
            PlanetWalkErrorCode::Ok
        );
        for _ in 0..90 {
            unsafe { planet_walk_update(instance, 1.0 / 60.0, input) };
        }

        let mut pose = PlanetWalkPose::default();
        assert_eq!(
            unsafe { planet_walk_get_player_pose(instance, &mut pose) },
            PlanetWalkErrorCode::Ok
        );
        assert_ne!(pose.position, start.position);
        let p = pose.position;
        let r = (p.x * p.x + p.y * p.y + p.z * p.z).sqrt();
        assert!((r - 11.0).abs() < 1e-3);

        let mut wanderer = PlanetWalkPose::default();
        assert_eq!(
            unsafe { planet_walk_get_wanderer_pose(instance, &mut wanderer) },
            PlanetWalkErrorCode::Ok
        );

        let mut camera = PlanetWalkCamera::default();
        assert_eq!(
            unsafe { planet_walk_get_camera(instance, &mut camera) },
            PlanetWalkErrorCode::Ok
        );
        assert_ne!(camera.position, camera.look_at);

        let mut len = 0;
        let mut steps: *const PlanetWalkFootstep = ptr::null();
        let code = unsafe {
            planet_walk_get_footsteps(instance, PLANET_WALK_PLAYER, &mut len, &mut steps)
        };
        assert_eq!(code, PlanetWalkErrorCode::Ok);
        assert_eq!(len, 3);
        let steps = unsafe { std::slice::from_raw_parts(steps, len) };
        assert!(steps[0].age > steps[2].age);

        unsafe { planet_walk_destroy(instance) };
    }

    #[test]
    fn test_footsteps_rejects_unknown_walker() {
        let instance = seeded_instance();
        let mut len = 7;
        let mut steps: *const PlanetWalkFootstep = ptr::null();
        let code = unsafe { planet_walk_get_footsteps(instance, 9, &mut len, &mut steps) };
        assert_eq!(code, PlanetWalkErrorCode::InvalidParameter);
        assert_eq!(len, 0);
        assert!(steps.is_null());
        unsafe { planet_walk_destroy(instance) };
    }

    #[test]
    fn test_queries_reject_null_instance() {
        let mut pose = PlanetWalkPose::default();
        let code = unsafe { planet_walk_get_player_pose(ptr::null(), &mut pose) };
        assert_eq!(code, PlanetWalkErrorCode::NullPointer);
        assert_eq!(
            crate::error::planet_walk_get_last_error_code(),
            PlanetWalkErrorCode::NullPointer
        );
        assert!(!crate::error::planet_walk_get_last_error().is_null());

        // Null instance on update is a silent no-op
        unsafe { planet_walk_update(ptr::null(), 0.016, PlanetWalkInput::default()) };
    }
}
