//! C ABI for the wildfire simulation core
//!
//! A game engine host creates one `WildfireInstance` per episode with
//! `wildfire_new`, drives it with intents (`wildfire_ignite`,
//! `wildfire_advance_tick`, ...), and reads cells, the observation map and
//! counters back. Every function returns a `WildfireErrorCode`; the message of
//! the last failure on the calling thread is available from
//! `wildfire_get_last_error`.
//!
//! Multiplayer hosts run one authority instance and any number of followers;
//! the authority's action log frames are replayed on each follower with
//! `wildfire_replay_entry`.

mod error;
mod helpers;
mod instance;
mod queries;
mod replay;
mod simulation;
mod terrain;

pub use error::{wildfire_get_last_error, wildfire_get_last_error_code, WildfireErrorCode};
pub use instance::{wildfire_destroy, wildfire_new, WildfireInstance};
pub use queries::{
    wildfire_copy_composite, wildfire_copy_sensor_window, wildfire_get_cell, wildfire_get_counters,
    wildfire_get_observation_code, CellSnapshot, CounterSnapshot,
};
pub use replay::{
    wildfire_action_log_entry, wildfire_action_log_len, wildfire_replay_entry,
    WILDFIRE_MAX_FRAME_LEN,
};
pub use simulation::{
    wildfire_advance_tick, wildfire_cut_resource, wildfire_false_ignite, wildfire_ignite,
    wildfire_move_viewer, wildfire_remove_viewer, wildfire_spawn_civilians, wildfire_spray_water,
    TickSummary,
};
pub use terrain::{wildfire_default_settings, SimulationSettings, TerrainInput};
