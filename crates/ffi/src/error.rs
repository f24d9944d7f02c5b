use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;

use wildfire_sim_core::{ReplayError, TerrainError};

/// Common interface for errors crossing the FFI boundary.
///
/// - `code()` - the error code returned to the host
/// - `msg()` - the diagnostic message stored for `wildfire_get_last_error`
pub(crate) trait WildfireError {
    fn code(&self) -> WildfireErrorCode;

    fn msg(&self) -> &str;
}

/// Default implementation of `WildfireError` with one constructor per failure kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DefaultWildfireError {
    code: WildfireErrorCode,
    msg: String,
}

impl DefaultWildfireError {
    /// Create error for null pointer passed where non-null required.
    ///
    /// # Arguments
    /// * `param_name` - The name of the parameter that was null (e.g., `"out_instance"`)
    pub fn null_pointer(param_name: &str) -> Self {
        Self {
            code: WildfireErrorCode::NullPointer,
            msg: format!("Parameter '{param_name}' cannot be null"),
        }
    }

    /// Create error for poisoned lock.
    pub fn lock_poisoned(lock_name: &str) -> Self {
        Self {
            code: WildfireErrorCode::LockPoisoned,
            msg: format!("Lock '{lock_name}' was poisoned by a panic in another thread"),
        }
    }

    /// Create error for an invalid terrain map with a custom message.
    ///
    /// # Arguments
    /// * `param_name` - The offending map or dimension (e.g., `"vegetation"`, `"width"`)
    /// * `message` - A description of the validation error
    pub fn invalid_terrain_parameter_msg(param_name: &str, message: &str) -> Self {
        Self {
            code: WildfireErrorCode::InvalidTerrainParameters,
            msg: format!("Terrain parameter {param_name}: {message}"),
        }
    }

    /// Create error for invalid parameter.
    pub fn invalid_parameter(message: String) -> Self {
        Self {
            code: WildfireErrorCode::InvalidParameter,
            msg: message,
        }
    }

    /// Create error for an intent sent to a follower instance.
    ///
    /// # Arguments
    /// * `operation` - The rejected FFI function name
    pub fn not_authority(operation: &str) -> Self {
        Self {
            code: WildfireErrorCode::NotAuthority,
            msg: format!("'{operation}' requires an authority instance; followers only replay"),
        }
    }
}

impl From<TerrainError> for DefaultWildfireError {
    fn from(error: TerrainError) -> Self {
        Self {
            code: WildfireErrorCode::InvalidTerrainParameters,
            msg: error.to_string(),
        }
    }
}

impl From<ReplayError> for DefaultWildfireError {
    fn from(error: ReplayError) -> Self {
        Self {
            code: WildfireErrorCode::ReplayFailed,
            msg: format!("Replay failed: {error}"),
        }
    }
}

impl WildfireError for DefaultWildfireError {
    fn code(&self) -> WildfireErrorCode {
        self.code
    }

    fn msg(&self) -> &str {
        &self.msg
    }
}

/// FFI error codes returned by wildfire simulation functions.
/// Follows standard C convention: 0 = success, non-zero = error.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WildfireErrorCode {
    /// Operation completed successfully.
    Ok = 0,

    /// Invalid pointer: null pointer passed where non-null required.
    NullPointer = 1,

    /// Lock poisoned: internal synchronization primitive was poisoned by a panic.
    LockPoisoned = 2,

    /// Terrain maps are inconsistent (zero dimension, missing map, bad class id,
    /// non-finite value).
    InvalidTerrainParameters = 3,

    /// Invalid parameter passed to function.
    InvalidParameter = 4,

    /// Intent sent to a follower instance.
    NotAuthority = 5,

    /// Malformed action log entry. The follower must be rebuilt from scratch.
    ReplayFailed = 6,
}

impl From<DefaultWildfireError> for WildfireErrorCode {
    fn from(error: DefaultWildfireError) -> Self {
        error.code
    }
}

thread_local! {
    /// Most recent FFI error (C string, error code) for this thread.
    /// The CString is kept here so the pointer handed out stays valid.
    static LAST_ERROR: RefCell<(Option<CString>, WildfireErrorCode)> = const { RefCell::new((None, WildfireErrorCode::Ok)) };
}

/// Internal helper to read `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error<F, R>(f: F) -> R
where
    F: FnOnce(&(Option<CString>, WildfireErrorCode)) -> R,
{
    LAST_ERROR.with_borrow(f)
}

/// Internal helper to mutate `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut (Option<CString>, WildfireErrorCode)) -> R,
{
    LAST_ERROR.with_borrow_mut(f)
}

/// Retrieve the most recent FFI error message as a null-terminated C string.
///
/// Returns:
/// - A borrowed pointer to the error message if an error occurred.
/// - `null` if the last call on this thread succeeded.
///
/// # Lifetime
/// The returned pointer is valid until the next FFI call on this thread.
///
/// **DO NOT FREE THIS POINTER** - it is managed internally.
///
/// Example:
/// ```cpp
/// WildfireInstance* sim = nullptr;
/// WildfireErrorCode err = wildfire_new(terrain, settings, 0, &sim);
/// if (err != WildfireErrorCode::Ok) {
///     printf("Wildfire creation failed: %s\n", wildfire_get_last_error());
/// }
/// ```
#[no_mangle]
pub extern "C" fn wildfire_get_last_error() -> *const c_char {
    with_last_error(|(cstring, _code)| cstring.as_ref().map_or(ptr::null(), |cs| cs.as_ptr()))
}

/// Retrieve the most recent FFI error code (`Ok` after a successful call).
#[no_mangle]
pub extern "C" fn wildfire_get_last_error_code() -> WildfireErrorCode {
    with_last_error(|(_cstring, code)| *code)
}
