//! Error codes and the per-thread "last error" slot read back by hosts.

use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;

/// Status returned by every fallible `planet_walk_*` call. Zero is success.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanetWalkErrorCode {
    Ok = 0,
    /// A required pointer argument was null.
    NullPointer = 1,
    /// A panic on another thread poisoned the session lock.
    LockPoisoned = 2,
    /// The configuration JSON was malformed or held out-of-range values.
    InvalidConfig = 3,
    /// Any other argument was out of range.
    InvalidParameter = 4,
}

/// A failed call: the code handed back to the host plus a message for
/// `planet_walk_get_last_error`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FfiError {
    code: PlanetWalkErrorCode,
    msg: String,
}

impl FfiError {
    pub fn null_pointer(param_name: &str) -> Self {
        Self {
            code: PlanetWalkErrorCode::NullPointer,
            msg: format!("Parameter '{param_name}' cannot be null"),
        }
    }

    pub fn lock_poisoned(lock_name: &str) -> Self {
        Self {
            code: PlanetWalkErrorCode::LockPoisoned,
            msg: format!("{lock_name} guarding the session was poisoned by a panic"),
        }
    }

    /// Wraps a `ConfigError` (or anything else the core rejected a config with).
    pub fn invalid_config(error: &impl std::fmt::Display) -> Self {
        Self {
            code: PlanetWalkErrorCode::InvalidConfig,
            msg: error.to_string(),
        }
    }

    pub fn invalid_parameter(message: String) -> Self {
        Self {
            code: PlanetWalkErrorCode::InvalidParameter,
            msg: message,
        }
    }

    pub fn code(&self) -> PlanetWalkErrorCode {
        self.code
    }

    pub fn msg(&self) -> &str {
        &self.msg
    }
}

/// Most recent failure on one thread. The message is kept as a `CString` so
/// the pointer handed to the host stays valid until the slot is overwritten.
struct LastError {
    message: Option<CString>,
    code: PlanetWalkErrorCode,
}

thread_local! {
    static LAST_ERROR: RefCell<LastError> = const {
        RefCell::new(LastError {
            message: None,
            code: PlanetWalkErrorCode::Ok,
        })
    };
}

/// Store `error` as this thread's last error.
pub(crate) fn record_error(error: &FfiError) {
    LAST_ERROR.with_borrow_mut(|last| {
        // Messages are built here and never contain NUL; None only hides the text.
        last.message = CString::new(error.msg()).ok();
        last.code = error.code();
    });
}

/// Reset this thread's last error to `Ok`.
pub(crate) fn clear_error() {
    LAST_ERROR.with_borrow_mut(|last| {
        last.message = None;
        last.code = PlanetWalkErrorCode::Ok;
    });
}

/// Message of the last failed call on this thread, or null if there is none.
///
/// The string is owned by the library: do not free it. It stays valid until
/// the next failing (or successfully constructing) call on the same thread.
///
/// ```c
/// PlanetWalkInstance* walk = NULL;
/// if (planet_walk_new(config_json, &walk) != Ok) {
///     const char* msg = planet_walk_get_last_error();
///     fprintf(stderr, "planet walk: %s\n", msg ? msg : "unknown error");
/// }
/// ```
#[no_mangle]
pub extern "C" fn planet_walk_get_last_error() -> *const c_char {
    LAST_ERROR.with_borrow(|last| last.message.as_ref().map_or(ptr::null(), |m| m.as_ptr()))
}

/// Code of the last failed call on this thread (`Ok` if none).
#[no_mangle]
pub extern "C" fn planet_walk_get_last_error_code() -> PlanetWalkErrorCode {
    LAST_ERROR.with_borrow(|last| last.code)
}
