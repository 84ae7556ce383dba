use planet_walk_core::MovementInput;

use crate::error::PlanetWalkErrorCode;
use crate::helpers::{handle_ffi_result_error, instance_from_ptr, with_walk_sim_mut};
use crate::instance::PlanetWalkInstance;

/// Keys held during one tick.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[expect(clippy::struct_excessive_bools, reason = "Mirrors one flag per key")]
pub struct PlanetWalkInput {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    /// Respawn the player. Acts once per press; holding it does nothing more.
    pub reset: bool,
}

impl From<PlanetWalkInput> for MovementInput {
    fn from(input: PlanetWalkInput) -> Self {
        Self {
            forward: input.forward,
            back: input.back,
            left: input.left,
            right: input.right,
            reset: input.reset,
        }
    }
}

/// Advance the session by `dt` seconds with the given input.
///
/// Thread-safe: the whole tick runs under the write lock.
///
/// - If `ptr` is null or `dt` is non-finite or non-positive this function is a no-op.
///
/// # Safety
/// `ptr` must be null or a live pointer returned by `planet_walk_new`.
#[no_mangle]
pub unsafe extern "C" fn planet_walk_update(
    ptr: *const PlanetWalkInstance,
    dt: f32,
    input: PlanetWalkInput,
) {
    if !dt.is_finite() || dt <= 0.0 {
        return;
    }

    // Silently ignore errors for void-returning function
    let _ = handle_ffi_result_error(|| {
        let instance = unsafe { instance_from_ptr(ptr) }?;

        with_walk_sim_mut(instance, |sim| {
            sim.update(&MovementInput::from(input), dt);
        })?;

        Ok(())
    });
}

/// Put both walkers back at spawn, clear both trails and restart the camera.
///
/// Returns `Ok`, `NullPointer` if `ptr` is null, or `LockPoisoned`.
///
/// # Safety
/// `ptr` must be null or a live pointer returned by `planet_walk_new`.
#[no_mangle]
pub unsafe extern "C" fn planet_walk_reset(ptr: *const PlanetWalkInstance) -> PlanetWalkErrorCode {
    handle_ffi_result_error(|| {
        let instance = unsafe { instance_from_ptr(ptr) }?;
        with_walk_sim_mut(instance, planet_walk_core::PlanetSimulation::reset)?;
        Ok(())
    })
}
