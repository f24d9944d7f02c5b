use crate::error::{with_last_error_mut, DefaultWildfireError, WildfireError, WildfireErrorCode};
use crate::instance::WildfireInstance;
use std::ffi::CString;
use wildfire_sim_core::{Role, WildfireSimulation};

/// Set the thread-local error message and code.
/// Accepts any type implementing `WildfireError` trait.
pub(crate) fn set_last_error(error: &impl WildfireError) {
    with_last_error_mut(|(cstring, code)| {
        *cstring = CString::new(error.msg()).ok();
        *code = error.code();
    });
}

/// Track an error by setting it in thread-local storage and returning its code.
#[inline]
pub(crate) fn track_error(error: &impl WildfireError) -> WildfireErrorCode {
    set_last_error(error);
    error.code()
}

/// Clear the thread-local error message and code.
pub(crate) fn clear_last_error() {
    with_last_error_mut(|(cstring, code)| {
        *cstring = None;
        *code = WildfireErrorCode::Ok;
    });
}

/// Record the error of a failed result and pass the success value through.
pub(crate) fn track_result<T>(result: Result<T, DefaultWildfireError>) -> Result<T, WildfireErrorCode> {
    match result {
        Ok(value) => {
            clear_last_error();
            Ok(value)
        }
        Err(error) => Err(track_error(&error)),
    }
}

/// Run an FFI body and collapse its result into an error code.
pub(crate) fn handle_ffi_result_error<F>(body: F) -> WildfireErrorCode
where
    F: FnOnce() -> Result<(), DefaultWildfireError>,
{
    match track_result(body()) {
        Ok(()) => WildfireErrorCode::Ok,
        Err(code) => code,
    }
}

/// Borrow the instance behind a host pointer.
///
/// The pointer must be null or come from `wildfire_new` and not be destroyed yet.
pub(crate) fn instance_from_ptr<'a>(
    ptr: *const WildfireInstance,
) -> Result<&'a WildfireInstance, DefaultWildfireError> {
    // SAFETY: non-null pointers are only ever produced by `Box::into_raw` in
    // `wildfire_new`; the host keeps them alive until `wildfire_destroy`.
    unsafe { ptr.as_ref() }.ok_or_else(|| DefaultWildfireError::null_pointer("ptr"))
}

/// Run `func` under the read lock.
pub(crate) fn with_sim<F, T>(instance: &WildfireInstance, func: F) -> Result<T, DefaultWildfireError>
where
    F: FnOnce(&WildfireSimulation) -> T,
{
    let sim = instance
        .sim
        .read()
        .map_err(|_| DefaultWildfireError::lock_poisoned("RwLock"))?;
    Ok(func(&sim))
}

/// Run `func` under the write lock.
pub(crate) fn with_sim_mut<F, T>(
    instance: &WildfireInstance,
    func: F,
) -> Result<T, DefaultWildfireError>
where
    F: FnOnce(&mut WildfireSimulation) -> T,
{
    let mut sim = instance
        .sim
        .write()
        .map_err(|_| DefaultWildfireError::lock_poisoned("RwLock"))?;
    Ok(func(&mut sim))
}

/// Run an intent under the write lock, refusing follower instances.
pub(crate) fn with_authority_mut<F, T>(
    instance: &WildfireInstance,
    operation: &str,
    func: F,
) -> Result<T, DefaultWildfireError>
where
    F: FnOnce(&mut WildfireSimulation) -> T,
{
    let mut sim = instance
        .sim
        .write()
        .map_err(|_| DefaultWildfireError::lock_poisoned("RwLock"))?;
    if sim.role() != Role::Authority {
        return Err(DefaultWildfireError::not_authority(operation));
    }
    Ok(func(&mut sim))
}

/// Write `value` through an optional out-pointer.
///
/// # Safety
/// `out` must be null or valid for a write of `T`.
#[inline]
pub(crate) unsafe fn write_optional<T>(out: *mut T, value: T) {
    if !out.is_null() {
        unsafe {
            *out = value;
        }
    }
}
