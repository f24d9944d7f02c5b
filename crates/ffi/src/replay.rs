//! Action log access for replication between hosts.
//!
//! The authority host reads entries as flat `f32` frames
//! (`[opcode, params...]`) and ships them to follower hosts, which feed them
//! to `wildfire_replay_entry` in the same order.

use std::slice;

use wildfire_sim_core::ActionRecord;

use crate::error::{DefaultWildfireError, WildfireErrorCode};
use crate::helpers::{handle_ffi_result_error, instance_from_ptr, track_error, with_sim, with_sim_mut};
use crate::instance::WildfireInstance;

/// Longest frame any action encodes to (spray: opcode plus six parameters).
pub const WILDFIRE_MAX_FRAME_LEN: usize = 7;

#[no_mangle]
/// Number of entries in the action log.
///
/// # Safety
///
/// - `ptr` must be null or a live pointer from `wildfire_new`.
/// - `out_len` must be valid for writes.
pub unsafe extern "C" fn wildfire_action_log_len(
    ptr: *const WildfireInstance,
    out_len: *mut usize,
) -> WildfireErrorCode {
    if out_len.is_null() {
        return track_error(&DefaultWildfireError::null_pointer("out_len"));
    }

    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let len = with_sim(instance, |sim| sim.log().len())?;
        unsafe {
            *out_len = len;
        }
        Ok(())
    })
}

#[no_mangle]
/// Encode log entry `index` into `out_frame`.
///
/// `out_frame` must hold at least `WILDFIRE_MAX_FRAME_LEN` values; `out_len`
/// receives how many were written.
///
/// Returns `WildfireErrorCode::InvalidParameter` when `index` is past the end
/// of the log or `capacity` is too small.
///
/// # Safety
///
/// - `ptr` must be null or a live pointer from `wildfire_new`.
/// - `out_frame` must be valid for `capacity` writes; `out_len` must be valid for writes.
pub unsafe extern "C" fn wildfire_action_log_entry(
    ptr: *const WildfireInstance,
    index: usize,
    out_frame: *mut f32,
    capacity: usize,
    out_len: *mut usize,
) -> WildfireErrorCode {
    if out_frame.is_null() {
        return track_error(&DefaultWildfireError::null_pointer("out_frame"));
    }
    if out_len.is_null() {
        return track_error(&DefaultWildfireError::null_pointer("out_len"));
    }

    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let frame = with_sim(instance, |sim| sim.log().get(index).map(ActionRecord::to_wire))?
            .ok_or_else(|| {
                DefaultWildfireError::invalid_parameter(format!(
                    "Action log has no entry {index}"
                ))
            })?;
        if frame.len() > capacity {
            return Err(DefaultWildfireError::invalid_parameter(format!(
                "Frame needs {} values, buffer holds {capacity}",
                frame.len()
            )));
        }

        unsafe {
            slice::from_raw_parts_mut(out_frame, frame.len()).copy_from_slice(&frame);
            *out_len = frame.len();
        }
        Ok(())
    })
}

#[no_mangle]
/// Decode one frame and apply it through the live intent handlers.
///
/// Followers use this to mirror the authority. A `ReplayFailed` result means
/// the frame was malformed and nothing was applied; the replica should be
/// rebuilt because later frames would no longer line up.
///
/// # Safety
///
/// - `ptr` must be null or a live pointer from `wildfire_new`.
/// - `frame` must be valid for `len` reads.
pub unsafe extern "C" fn wildfire_replay_entry(
    ptr: *const WildfireInstance,
    frame: *const f32,
    len: usize,
) -> WildfireErrorCode {
    if frame.is_null() {
        return track_error(&DefaultWildfireError::null_pointer("frame"));
    }

    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let frame = unsafe { slice::from_raw_parts(frame, len) };
        with_sim_mut(instance, |sim| sim.replay_wire(&[frame]))??;
        Ok(())
    })
}
