use crate::error::{record_error, FfiError, PlanetWalkErrorCode};
use crate::instance::PlanetWalkInstance;
use planet_walk_core::PlanetSimulation;
use tracing::debug;

/// Record `error` as this thread's last error and return its code.
pub(crate) fn track_error(error: &FfiError) -> PlanetWalkErrorCode {
    debug!(code = ?error.code(), msg = error.msg(), "FFI call failed");
    record_error(error);
    error.code()
}

/// Record the error of a failed result, passing the value through on success.
pub(crate) fn track_result<T>(result: Result<T, FfiError>) -> Result<T, PlanetWalkErrorCode> {
    result.map_err(|error| track_error(&error))
}

/// Run the body of an FFI call, collapsing its result to a status code.
pub(crate) fn handle_ffi_result_error<F>(f: F) -> PlanetWalkErrorCode
where
    F: FnOnce() -> Result<(), FfiError>,
{
    match f() {
        Ok(()) => PlanetWalkErrorCode::Ok,
        Err(error) => track_error(&error),
    }
}

/// Borrow the instance behind `ptr`.
///
/// # Safety
/// `ptr` must be null or a live pointer returned by `planet_walk_new`.
pub(crate) unsafe fn instance_from_ptr<'a>(
    ptr: *const PlanetWalkInstance,
) -> Result<&'a PlanetWalkInstance, FfiError> {
    // SAFETY: non-null pointers come from `Box::into_raw` in `planet_walk_new`
    // and stay valid until `planet_walk_destroy`, per the caller contract.
    unsafe { ptr.as_ref() }.ok_or_else(|| FfiError::null_pointer("ptr"))
}

/// Run `f` under the session's read lock.
pub(crate) fn with_walk_sim<F, T>(instance: &PlanetWalkInstance, f: F) -> Result<T, FfiError>
where
    F: FnOnce(&PlanetSimulation) -> T,
{
    let sim = instance
        .sim
        .read()
        .map_err(|_| FfiError::lock_poisoned("RwLock"))?;
    Ok(f(&sim))
}

/// Run `f` under the session's write lock.
pub(crate) fn with_walk_sim_mut<F, T>(instance: &PlanetWalkInstance, f: F) -> Result<T, FfiError>
where
    F: FnOnce(&mut PlanetSimulation) -> T,
{
    let mut sim = instance
        .sim
        .write()
        .map_err(|_| FfiError::lock_poisoned("RwLock"))?;
    Ok(f(&mut sim))
}
