use std::slice;

use wildfire_sim_core::Cell;

use crate::error::{DefaultWildfireError, WildfireErrorCode};
use crate::helpers::{handle_ffi_result_error, instance_from_ptr, track_error, with_sim, write_optional};
use crate::instance::WildfireInstance;

/// FFI-friendly snapshot of one grid cell.
/// Keep this layout stable for C/C++/C# consumers.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CellSnapshot {
    /// Combustion state: 0 burnable, 1 not burnable, 2 ignited, 3 on fire,
    /// 4 extinguishing, 5 fully extinguished.
    pub state: u8,
    /// Terrain class id.
    pub terrain: u8,
    /// Trees left (0-3).
    pub trees: u8,
    pub building: bool,
    /// Ticks until the cell dries (0 = dry).
    pub wetness: u16,
    /// Ticks spent in the current combustion state.
    pub ticks_in_state: u16,
    pub elevation: f32,
    pub moisture: f32,
}

impl From<&Cell> for CellSnapshot {
    fn from(cell: &Cell) -> Self {
        Self {
            state: cell.state().as_u8(),
            terrain: cell.terrain().id(),
            trees: cell.trees(),
            building: cell.has_building(),
            wetness: cell.wetness(),
            ticks_in_state: cell.ticks_in_state(),
            elevation: cell.elevation(),
            moisture: cell.moisture(),
        }
    }
}

/// Episode bookkeeping for the host's reward and HUD.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterSnapshot {
    pub trees_destroyed: u64,
    pub buildings_destroyed: u64,
    pub civilians_lost: u64,
    /// `trees + 10 * buildings + 100 * civilians`.
    pub damage_score: u64,
    pub tick: u64,
    pub still_burning: bool,
    /// Hash of the replicated state, equal on authority and followers.
    pub fingerprint: u64,
}

#[no_mangle]
/// Fill `out_cell` with the cell at (x, y).
///
/// - `out_found` (optional) receives whether (x, y) is inside the grid. If it
///   is not, `out_cell` is left untouched.
///
/// Returns
/// - `WildfireErrorCode::Ok` (0) on success
/// - `WildfireErrorCode::NullPointer` if `ptr` or `out_cell` is null
/// - `WildfireErrorCode::LockPoisoned` if the internal lock is poisoned
///
/// # Safety
///
/// - `ptr` must be null or a live pointer from `wildfire_new`.
/// - `out_cell` must be valid for writes; `out_found` must be null or valid for writes.
pub unsafe extern "C" fn wildfire_get_cell(
    ptr: *const WildfireInstance,
    x: i32,
    y: i32,
    out_cell: *mut CellSnapshot,
    out_found: *mut bool,
) -> WildfireErrorCode {
    if out_cell.is_null() {
        return track_error(&DefaultWildfireError::null_pointer("out_cell"));
    }

    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let snapshot = with_sim(instance, |sim| sim.grid().cell(x, y).map(CellSnapshot::from))?;
        unsafe {
            if let Some(snapshot) = snapshot {
                *out_cell = snapshot;
            }
            write_optional(out_found, snapshot.is_some());
        }
        Ok(())
    })
}

#[no_mangle]
/// Read the accumulated observation code at (x, y).
///
/// Codes: 0 unobserved, 1-4 wet with 0-3 trees, 5-8 dry with 0-3 trees,
/// 9 ignited, 10 on fire, 11 extinguishing, 12 fully extinguished, 13 water,
/// 14 building, 15 civilian. Outside the grid reads 0.
///
/// # Safety
///
/// - `ptr` must be null or a live pointer from `wildfire_new`.
/// - `out_code` must be valid for writes.
pub unsafe extern "C" fn wildfire_get_observation_code(
    ptr: *const WildfireInstance,
    x: i32,
    y: i32,
    out_code: *mut u8,
) -> WildfireErrorCode {
    if out_code.is_null() {
        return track_error(&DefaultWildfireError::null_pointer("out_code"));
    }

    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let code = with_sim(instance, |sim| sim.observation().composite_at(x, y))?;
        unsafe {
            *out_code = code;
        }
        Ok(())
    })
}

#[no_mangle]
/// Copy the composite observation map (row-major, `width * height` codes).
///
/// Copies at most `capacity` codes into `out_buffer`. `out_len` receives the full
/// map size, so a host can size its buffer with a first call passing a null
/// buffer and zero capacity.
///
/// # Safety
///
/// - `ptr` must be null or a live pointer from `wildfire_new`.
/// - `out_buffer` must be null (only with `capacity == 0`) or valid for
///   `capacity` writes.
/// - `out_len` must be valid for writes.
pub unsafe extern "C" fn wildfire_copy_composite(
    ptr: *const WildfireInstance,
    out_buffer: *mut u8,
    capacity: usize,
    out_len: *mut usize,
) -> WildfireErrorCode {
    if out_len.is_null() {
        return track_error(&DefaultWildfireError::null_pointer("out_len"));
    }
    if out_buffer.is_null() && capacity > 0 {
        return track_error(&DefaultWildfireError::null_pointer("out_buffer"));
    }

    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        with_sim(instance, |sim| {
            let composite = sim.observation().composite();
            let count = composite.len().min(capacity);
            unsafe {
                if count > 0 {
                    slice::from_raw_parts_mut(out_buffer, count).copy_from_slice(&composite[..count]);
                }
                *out_len = composite.len();
            }
        })
    })
}

#[no_mangle]
/// Fill an agent sensor window around (x, y).
///
/// Writes `(2 * radius + 1)^2` composite codes row by row (0 outside the map),
/// then pads with -1 up to `capacity`. Pass a capacity of 3721 (61 x 61) to
/// match the default sensor tensor.
///
/// # Safety
///
/// - `ptr` must be null or a live pointer from `wildfire_new`.
/// - `out_buffer` must be valid for `capacity` writes.
pub unsafe extern "C" fn wildfire_copy_sensor_window(
    ptr: *const WildfireInstance,
    x: i32,
    y: i32,
    radius: u32,
    out_buffer: *mut i32,
    capacity: usize,
) -> WildfireErrorCode {
    if out_buffer.is_null() {
        return track_error(&DefaultWildfireError::null_pointer("out_buffer"));
    }
    let cells = (radius as usize)
        .checked_mul(2)
        .and_then(|d| d.checked_add(1))
        .and_then(|side| side.checked_mul(side));
    if cells.is_none_or(|cells| capacity < cells) {
        return track_error(&DefaultWildfireError::invalid_parameter(format!(
            "Sensor capacity {capacity} is smaller than a window of radius {radius}"
        )));
    }

    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let window = with_sim(instance, |sim| {
            sim.observation().sensor_window(x, y, radius, capacity)
        })?;
        unsafe {
            slice::from_raw_parts_mut(out_buffer, capacity).copy_from_slice(&window);
        }
        Ok(())
    })
}

#[no_mangle]
/// Fill `out_counters` with the destruction counters and tick.
///
/// # Safety
///
/// - `ptr` must be null or a live pointer from `wildfire_new`.
/// - `out_counters` must be valid for writes.
pub unsafe extern "C" fn wildfire_get_counters(
    ptr: *const WildfireInstance,
    out_counters: *mut CounterSnapshot,
) -> WildfireErrorCode {
    if out_counters.is_null() {
        return track_error(&DefaultWildfireError::null_pointer("out_counters"));
    }

    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let snapshot = with_sim(instance, |sim| {
            let counters = sim.counters();
            CounterSnapshot {
                trees_destroyed: counters.trees,
                buildings_destroyed: counters.buildings,
                civilians_lost: counters.civilians,
                damage_score: counters.damage_score(),
                tick: sim.tick(),
                still_burning: sim.is_burning(),
                fingerprint: sim.fingerprint(),
            }
        })?;
        unsafe {
            *out_counters = snapshot;
        }
        Ok(())
    })
}
