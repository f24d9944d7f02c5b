//! Deterministic replay of the action log
//!
//! Followers rebuild the authority's state by applying its records, in order,
//! through the live intent handlers. A record that cannot be decoded is fatal
//! for the follower: skipping it would desynchronize the replica for good.

use crate::grid::{TerrainError, TerrainMaps};
use crate::simulation::action_log::{ActionOpcode, ActionRecord};
use crate::simulation::{Role, SimulationConfig, WildfireSimulation};
use std::fmt;
use tracing::{info, warn};

/// Error produced when a replay stream cannot be applied
#[derive(Debug, Clone, PartialEq)]
pub enum ReplayError {
    /// Frame carries no opcode
    EmptyRecord,
    /// Leading value is not a known opcode
    UnknownOpcode(f32),
    /// Frame has the wrong number of parameters for its opcode
    WrongArity {
        opcode: ActionOpcode,
        expected: usize,
        actual: usize,
    },
    /// A parameter is NaN or infinite
    NonFiniteParameter { opcode: ActionOpcode, index: usize },
    /// Replica state differs from the authority after replay
    Diverged { expected: u64, actual: u64 },
}

impl fmt::Display for ReplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplayError::EmptyRecord => write!(f, "empty action record"),
            ReplayError::UnknownOpcode(code) => write!(f, "unknown action opcode {code}"),
            ReplayError::WrongArity {
                opcode,
                expected,
                actual,
            } => write!(
                f,
                "{opcode:?} record expects {expected} parameters, got {actual}"
            ),
            ReplayError::NonFiniteParameter { opcode, index } => {
                write!(f, "{opcode:?} record has a non-finite parameter at {index}")
            }
            ReplayError::Diverged { expected, actual } => write!(
                f,
                "replica diverged: fingerprint {actual:#018x}, expected {expected:#018x}"
            ),
        }
    }
}

impl std::error::Error for ReplayError {}

impl WildfireSimulation {
    /// Apply every record in order, returning how many were applied
    pub fn replay_all(&mut self, entries: &[ActionRecord]) -> usize {
        for entry in entries {
            self.apply(entry);
        }
        if !entries.is_empty() {
            info!(
                "Replayed {} actions, now at tick {} (burning={})",
                entries.len(),
                self.tick(),
                self.is_burning()
            );
        }
        entries.len()
    }

    /// Decode and apply wire frames.
    ///
    /// Every frame is decoded before any is applied, so a malformed stream
    /// leaves the replica untouched.
    ///
    /// # Errors
    ///
    /// Returns the first [`ReplayError`] found while decoding.
    pub fn replay_wire<F: AsRef<[f32]>>(&mut self, frames: &[F]) -> Result<usize, ReplayError> {
        let records = frames
            .iter()
            .enumerate()
            .map(|(i, frame)| {
                ActionRecord::from_wire(frame.as_ref()).inspect_err(|e| {
                    warn!("Rejecting replay stream at frame {}: {}", i, e);
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.replay_all(&records))
    }

    /// Check this replica against the authority's fingerprint
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::Diverged`] when the fingerprints differ.
    pub fn verify_fingerprint(&self, expected: u64) -> Result<(), ReplayError> {
        let actual = self.fingerprint();
        if actual == expected {
            Ok(())
        } else {
            warn!("Replica diverged at tick {}", self.tick());
            Err(ReplayError::Diverged { expected, actual })
        }
    }
}

/// Build a follower from the episode's terrain and the authority's full log
///
/// # Errors
///
/// Returns [`TerrainError`] when the maps are inconsistent.
pub fn catch_up(
    maps: &TerrainMaps,
    config: SimulationConfig,
    entries: &[ActionRecord],
) -> Result<WildfireSimulation, TerrainError> {
    let mut follower = WildfireSimulation::new(maps, config, Role::Follower)?;
    follower.replay_all(entries);
    Ok(follower)
}
