use std::ptr;
use std::sync::RwLock;

use wildfire_sim_core::{Role, WildfireSimulation};

use crate::error::{DefaultWildfireError, WildfireErrorCode};
use crate::helpers::{track_error, track_result};
use crate::terrain::{SimulationSettings, TerrainInput};

/// One simulation episode owned by the host.
///
/// # Thread Safety
/// The session sits behind an `RwLock`: queries (cells, composite map, counters,
/// log entries) take the read lock and may run concurrently from render or
/// worker threads, while intents and ticks take the write lock.
///
/// # Usage
/// ```cpp
/// WildfireInstance* sim = nullptr;
/// SimulationSettings settings = wildfire_default_settings();
/// if (wildfire_new(terrain, settings, 0, &sim) != WildfireErrorCode::Ok) {
///     return;
/// }
/// wildfire_ignite(sim, 40, 40, nullptr);
/// wildfire_advance_tick(sim, nullptr);
/// wildfire_destroy(sim);
/// ```
pub struct WildfireInstance {
    pub(crate) sim: RwLock<WildfireSimulation>,
}

impl WildfireInstance {
    /// Creates a new instance from host terrain maps.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` for an unknown role or bad settings and
    /// `InvalidTerrainParameters`/`NullPointer` for bad terrain maps.
    ///
    /// # Safety
    ///
    /// The map pointers in `terrain` must be valid for `width * height` reads.
    pub(crate) unsafe fn new(
        terrain: &TerrainInput,
        settings: &SimulationSettings,
        role: u8,
    ) -> Result<Box<Self>, DefaultWildfireError> {
        let role = Role::from_u8(role).ok_or_else(|| {
            DefaultWildfireError::invalid_parameter(format!(
                "Role must be 0 (authority) or 1 (follower), got {role}"
            ))
        })?;
        let config = settings.to_config()?;
        let maps = unsafe { terrain.to_maps()? };
        let sim = WildfireSimulation::new(&maps, config, role)?;

        Ok(Box::new(Self {
            sim: RwLock::new(sim),
        }))
    }
}

/// Create a new simulation instance and return it via out-parameter.
///
/// Parameters
/// - `terrain`: host terrain maps. The data is copied; the host may free its
///   buffers after this call.
/// - `settings`: episode settings, usually from `wildfire_default_settings`.
/// - `role`: 0 = authority (accepts intents, emits the action log),
///   1 = follower (only replays the authority's log).
/// - `out_instance`: receives the instance on success and null on failure.
///
/// Returns
/// - `WildfireErrorCode::Ok` (0) on success
/// - `WildfireErrorCode::NullPointer` if `out_instance` or a required map is null
/// - `WildfireErrorCode::InvalidTerrainParameters` for inconsistent maps
/// - `WildfireErrorCode::InvalidParameter` for a bad role or settings
///
/// # Safety
///
/// - `out_instance` must be a valid, non-null pointer to writable memory.
/// - The caller owns the instance and MUST call `wildfire_destroy` exactly once.
#[no_mangle]
pub unsafe extern "C" fn wildfire_new(
    terrain: TerrainInput,
    settings: SimulationSettings,
    role: u8,
    out_instance: *mut *mut WildfireInstance,
) -> WildfireErrorCode {
    if out_instance.is_null() {
        return track_error(&DefaultWildfireError::null_pointer("out_instance"));
    }

    match track_result(unsafe { WildfireInstance::new(&terrain, &settings, role) }) {
        Ok(instance) => {
            unsafe {
                *out_instance = Box::into_raw(instance);
            }
            WildfireErrorCode::Ok
        }
        Err(code) => {
            unsafe {
                *out_instance = ptr::null_mut();
            }
            code
        }
    }
}

/// Destroys an instance previously created by `wildfire_new`.
///
/// Null is a no-op.
///
/// # Safety
/// - The pointer MUST have been created by `wildfire_new` and not destroyed yet.
/// - The caller must not use the pointer afterwards.
#[no_mangle]
pub unsafe extern "C" fn wildfire_destroy(ptr: *mut WildfireInstance) {
    if ptr.is_null() {
        return;
    }

    // SAFETY: non-null pointers come from `Box::into_raw` in `wildfire_new`.
    unsafe {
        drop(Box::from_raw(ptr));
    }
}
