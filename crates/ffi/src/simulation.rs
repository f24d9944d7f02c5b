//! Intents and viewer updates.
//!
//! Intents (`advance_tick`, `ignite`, `cut_resource`, ...) are only accepted by
//! authority instances; each one is appended to the action log for followers.
//! Refusals such as igniting water are not errors: the call succeeds and the
//! optional out-parameter reports what happened.

use wildfire_sim_core::{SprayPattern, Vec2, ViewerKind};

use crate::error::{DefaultWildfireError, WildfireErrorCode};
use crate::helpers::{
    handle_ffi_result_error, instance_from_ptr, with_authority_mut, with_sim_mut, write_optional,
};
use crate::instance::WildfireInstance;

/// C-compatible summary of one tick.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickSummary {
    /// Tick number after the step.
    pub tick: u64,
    /// Any cell still ignited or on fire.
    pub still_burning: bool,
    pub trees_destroyed: u64,
    pub buildings_destroyed: u64,
    pub civilians_lost: u64,
    /// Cells that dried out this tick.
    pub dried_cells: usize,
}

/// Advance the simulation by one tick.
///
/// Returns
/// - `WildfireErrorCode::Ok` (0) on success, with `out_summary` filled when non-null
/// - `WildfireErrorCode::NullPointer` if `ptr` is null
/// - `WildfireErrorCode::NotAuthority` on a follower instance
///
/// # Safety
/// - `ptr` must be null or a live pointer from `wildfire_new`.
/// - `out_summary` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn wildfire_advance_tick(
    ptr: *const WildfireInstance,
    out_summary: *mut TickSummary,
) -> WildfireErrorCode {
    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let report = with_authority_mut(instance, "wildfire_advance_tick", |sim| sim.advance_tick())?;
        let summary = TickSummary {
            tick: report.tick,
            still_burning: report.still_burning,
            trees_destroyed: report.destroyed.trees,
            buildings_destroyed: report.destroyed.buildings,
            civilians_lost: report.destroyed.civilians,
            dried_cells: report.dried_cells,
        };
        unsafe { write_optional(out_summary, summary) };
        Ok(())
    })
}

/// Ignite the cell at (x, y).
///
/// `out_ignited` (optional) receives whether the cell caught fire; border,
/// non-burnable and burnt cells refuse.
///
/// # Safety
/// - `ptr` must be null or a live pointer from `wildfire_new`.
/// - `out_ignited` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn wildfire_ignite(
    ptr: *const WildfireInstance,
    x: i32,
    y: i32,
    out_ignited: *mut bool,
) -> WildfireErrorCode {
    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let ignited = with_authority_mut(instance, "wildfire_ignite", |sim| sim.ignite(x, y))?;
        unsafe { write_optional(out_ignited, ignited) };
        Ok(())
    })
}

/// Spawn a cosmetic fire marker at normalized map coordinates in `[0, 1)`.
///
/// # Safety
/// - `ptr` must be null or a live pointer from `wildfire_new`.
/// - `out_placed` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn wildfire_false_ignite(
    ptr: *const WildfireInstance,
    nx: f32,
    ny: f32,
    out_placed: *mut bool,
) -> WildfireErrorCode {
    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let placed =
            with_authority_mut(instance, "wildfire_false_ignite", |sim| sim.false_ignite(nx, ny))?;
        unsafe { write_optional(out_placed, placed) };
        Ok(())
    })
}

/// Cut one tree at (x, y), or all of them when `full` is true.
///
/// `out_removed` (optional) receives the number of trees removed.
///
/// # Safety
/// - `ptr` must be null or a live pointer from `wildfire_new`.
/// - `out_removed` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn wildfire_cut_resource(
    ptr: *const WildfireInstance,
    x: i32,
    y: i32,
    full: bool,
    out_removed: *mut u8,
) -> WildfireErrorCode {
    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let removed =
            with_authority_mut(instance, "wildfire_cut_resource", |sim| sim.cut_resource(x, y, full))?;
        unsafe { write_optional(out_removed, removed) };
        Ok(())
    })
}

/// Spray water from (x, y) in a cone around (`aim_x`, `aim_y`).
///
/// A zero aim vector sprays in every direction. Hose: radius 3, cone 60.
/// Aerial drop: radius 4.5, cone 360.
///
/// `out_extinguished` and `out_wetted` (both optional) receive cell counts.
///
/// # Safety
/// - `ptr` must be null or a live pointer from `wildfire_new`.
/// - The out-pointers must be null or valid for writes.
#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn wildfire_spray_water(
    ptr: *const WildfireInstance,
    x: i32,
    y: i32,
    radius: f32,
    cone_angle: f32,
    aim_x: f32,
    aim_y: f32,
    out_extinguished: *mut u32,
    out_wetted: *mut u32,
) -> WildfireErrorCode {
    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let outcome = with_authority_mut(instance, "wildfire_spray_water", |sim| {
            sim.spray_water(x, y, SprayPattern { radius, cone_angle }, Vec2::new(aim_x, aim_y))
        })?;
        unsafe {
            write_optional(out_extinguished, outcome.extinguished.len() as u32);
            write_optional(out_wetted, outcome.wetted.len() as u32);
        }
        Ok(())
    })
}

/// Place `count` civilians on cell (x, y).
///
/// # Safety
/// - `ptr` must be null or a live pointer from `wildfire_new`.
/// - `out_spawned` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn wildfire_spawn_civilians(
    ptr: *const WildfireInstance,
    x: i32,
    y: i32,
    count: u32,
    out_spawned: *mut u32,
) -> WildfireErrorCode {
    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let spawned = with_authority_mut(instance, "wildfire_spawn_civilians", |sim| {
            sim.spawn_civilians(x, y, count)
        })?;
        unsafe { write_optional(out_spawned, spawned) };
        Ok(())
    })
}

/// Place or move a viewer.
///
/// Viewers are local to each instance and never logged, so followers accept
/// them too.
///
/// - `kind`: 0 firefighter, 1 bulldozer, 2 drone, 3 helicopter.
///
/// Returns `WildfireErrorCode::InvalidParameter` for an unknown kind or a cell
/// outside the grid.
#[no_mangle]
pub extern "C" fn wildfire_move_viewer(
    ptr: *const WildfireInstance,
    viewer_id: u32,
    kind: u8,
    x: i32,
    y: i32,
) -> WildfireErrorCode {
    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let kind = ViewerKind::from_u8(kind).ok_or_else(|| {
            DefaultWildfireError::invalid_parameter(format!("Unknown viewer kind {kind}"))
        })?;
        let moved = with_sim_mut(instance, |sim| sim.move_viewer(viewer_id, kind, x, y))?;
        if !moved {
            return Err(DefaultWildfireError::invalid_parameter(format!(
                "Viewer position ({x}, {y}) is outside the grid"
            )));
        }
        Ok(())
    })
}

/// Remove a viewer. Cells it revealed stay in the composite map.
///
/// `out_removed` (optional) receives whether the viewer existed.
///
/// # Safety
/// - `ptr` must be null or a live pointer from `wildfire_new`.
/// - `out_removed` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn wildfire_remove_viewer(
    ptr: *const WildfireInstance,
    viewer_id: u32,
    out_removed: *mut bool,
) -> WildfireErrorCode {
    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let removed = with_sim_mut(instance, |sim| sim.remove_viewer(viewer_id))?;
        unsafe { write_optional(out_removed, removed) };
        Ok(())
    })
}
