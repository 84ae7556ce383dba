use planet_walk_core::{PlanetSimulation, SimulationConfig};
use std::ffi::CStr;
use std::os::raw::c_char;
use std::ptr;
use std::sync::{Mutex, RwLock};

use crate::error::{clear_error, FfiError, PlanetWalkErrorCode};
use crate::helpers::{track_error, track_result};
use crate::queries::PlanetWalkFootstep;

/// A planet walk session owned by the host.
///
/// # Thread Safety
/// The session sits behind an `RwLock`: queries take the read lock and may run
/// concurrently from any thread, while `planet_walk_update` takes the write lock so a
/// tick (player, wanderer, trails, camera) is never observed half-applied.
///
/// # Usage
/// ```cpp
/// PlanetWalkInstance* walk = nullptr;
///
/// void BeginPlay() {
///     // null config -> built-in defaults
///     if (planet_walk_new(nullptr, &walk) != PlanetWalkErrorCode::Ok) {
///         return;
///     }
/// }
///
/// void Tick(float DeltaTime, PlanetWalkInput input) {
///     planet_walk_update(walk, DeltaTime, input);
///     PlanetWalkPose pose;
///     planet_walk_get_player_pose(walk, &pose);
/// }
///
/// void EndPlay() {
///     planet_walk_destroy(walk);
///     walk = nullptr;
/// }
/// ```
pub struct PlanetWalkInstance {
    pub(crate) sim: RwLock<PlanetSimulation>,
    /// Reused buffer behind `planet_walk_get_footsteps` for the player.
    pub(crate) player_footsteps: Mutex<Vec<PlanetWalkFootstep>>,
    /// Reused buffer behind `planet_walk_get_footsteps` for the wanderer.
    pub(crate) wanderer_footsteps: Mutex<Vec<PlanetWalkFootstep>>,
}

impl PlanetWalkInstance {
    /// Builds a session from optional JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the JSON is not UTF-8 and `InvalidConfig` if the
    /// core rejects it.
    pub(crate) fn new(config_json: Option<&CStr>) -> Result<Box<Self>, FfiError> {
        let config = match config_json {
            None => SimulationConfig::default(),
            Some(json) => {
                let json = json.to_str().map_err(|e| {
                    FfiError::invalid_parameter(format!(
                        "config_json is not valid UTF-8: {e}"
                    ))
                })?;
                SimulationConfig::from_json_str(json)
                    .map_err(|e| FfiError::invalid_config(&e))?
            }
        };

        let player_capacity = config.player.max_footsteps;
        let wanderer_capacity = config.wanderer.max_footsteps;
        let sim =
            PlanetSimulation::new(config).map_err(|e| FfiError::invalid_config(&e))?;

        Ok(Box::new(Self {
            sim: RwLock::new(sim),
            player_footsteps: Mutex::new(Vec::with_capacity(player_capacity)),
            wanderer_footsteps: Mutex::new(Vec::with_capacity(wanderer_capacity)),
        }))
    }
}

/// Create a planet walk session.
///
/// - `config_json` - null-terminated JSON `SimulationConfig`, or null for defaults.
///   Omitted fields take their default values.
/// - `out_instance` - receives the new instance on success, null on failure.
///
/// Returns
/// - `PlanetWalkErrorCode::Ok` on success
/// - `PlanetWalkErrorCode::NullPointer` if `out_instance` is null
/// - `PlanetWalkErrorCode::InvalidParameter` if `config_json` is not UTF-8
/// - `PlanetWalkErrorCode::InvalidConfig` if the configuration is rejected
///
/// # Safety
/// - `config_json` must be null or point to a valid null-terminated string.
/// - `out_instance` must be null or valid for a pointer-sized write.
#[no_mangle]
pub unsafe extern "C" fn planet_walk_new(
    config_json: *const c_char,
    out_instance: *mut *mut PlanetWalkInstance,
) -> PlanetWalkErrorCode {
    if out_instance.is_null() {
        return track_error(&FfiError::null_pointer("out_instance"));
    }

    let config_json = if config_json.is_null() {
        None
    } else {
        // SAFETY: non-null and null-terminated per the caller contract.
        Some(unsafe { CStr::from_ptr(config_json) })
    };

    match track_result(PlanetWalkInstance::new(config_json)) {
        Ok(instance) => {
            clear_error();
            unsafe {
                *out_instance = Box::into_raw(instance);
            }
            PlanetWalkErrorCode::Ok
        }
        Err(code) => {
            unsafe {
                // Set to null on error (per documentation contract)
                *out_instance = ptr::null_mut();
            }
            code
        }
    }
}

/// Destroy a session created by `planet_walk_new`. Null is ignored.
///
/// # Safety
/// `ptr` must be null or a pointer returned by `planet_walk_new` that has not been
/// destroyed yet. Borrowed footstep arrays become dangling.
#[no_mangle]
pub unsafe extern "C" fn planet_walk_destroy(ptr: *mut PlanetWalkInstance) {
    if ptr.is_null() {
        return;
    }

    // SAFETY: The pointer was created by `Box::into_raw` in `planet_walk_new` and
    // is not used again by the caller after this call.
    unsafe {
        drop(Box::from_raw(ptr));
    }
}
