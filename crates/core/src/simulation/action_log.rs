//! Action Log for deterministic replication
//!
//! The authoritative instance records every intent it applies. Followers replay
//! the same records in the same order and end up with identical grids.
//!
//! # Design Principles
//!
//! - **Replicate intents, not state**: only coarse actions travel over the wire
//! - **Append-only**: records are never reordered, merged or dropped
//! - **Late joiners replay history**: the full log rebuilds state from setup
//!
//! # Wire format
//!
//! Each record is a flat `f32` frame `[opcode, params...]`:
//!
//! | opcode | record          | params                               |
//! |--------|-----------------|--------------------------------------|
//! | 0      | Ignite          | x, y                                 |
//! | 1      | FalseIgnite     | normalized x, normalized y           |
//! | 2      | AdvanceTick     | -                                    |
//! | 3      | CutResource     | x, y, full (0/1)                     |
//! | 4      | SprayWater      | x, y, radius, cone, aim x, aim y     |
//! | 5      | SpawnCivilians  | x, y, count                          |

use crate::simulation::replay::ReplayError;
use serde::{Deserialize, Serialize};

/// Action opcodes for the wire format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionOpcode {
    Ignite,
    FalseIgnite,
    AdvanceTick,
    CutResource,
    SprayWater,
    SpawnCivilians,
}

impl ActionOpcode {
    /// Convert from u8 for FFI compatibility
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(ActionOpcode::Ignite),
            1 => Some(ActionOpcode::FalseIgnite),
            2 => Some(ActionOpcode::AdvanceTick),
            3 => Some(ActionOpcode::CutResource),
            4 => Some(ActionOpcode::SprayWater),
            5 => Some(ActionOpcode::SpawnCivilians),
            _ => None,
        }
    }

    /// Convert to u8 for FFI compatibility
    pub fn as_u8(&self) -> u8 {
        match self {
            ActionOpcode::Ignite => 0,
            ActionOpcode::FalseIgnite => 1,
            ActionOpcode::AdvanceTick => 2,
            ActionOpcode::CutResource => 3,
            ActionOpcode::SprayWater => 4,
            ActionOpcode::SpawnCivilians => 5,
        }
    }

    /// Convert from the leading float of a wire frame (must be integral)
    pub fn from_wire(value: f32) -> Option<Self> {
        if value.fract() != 0.0 || !(0.0..=f32::from(u8::MAX)).contains(&value) {
            return None;
        }
        Self::from_u8(value as u8)
    }

    /// Number of parameters following the opcode
    pub fn arity(&self) -> usize {
        match self {
            ActionOpcode::AdvanceTick => 0,
            ActionOpcode::Ignite | ActionOpcode::FalseIgnite => 2,
            ActionOpcode::CutResource | ActionOpcode::SpawnCivilians => 3,
            ActionOpcode::SprayWater => 6,
        }
    }
}

/// One replicated intent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ActionRecord {
    /// Ignite the cell at (x, y)
    Ignite { x: i32, y: i32 },
    /// Cosmetic fire marker at normalized map coordinates
    FalseIgnite { x: f32, y: f32 },
    /// Run one automaton tick
    AdvanceTick,
    /// Remove one tree, or all of them when `full`
    CutResource { x: i32, y: i32, full: bool },
    /// Spray water from (x, y) toward the aim vector
    SprayWater {
        x: i32,
        y: i32,
        radius: f32,
        cone_angle: f32,
        aim_x: f32,
        aim_y: f32,
    },
    /// Place civilians on a cell
    SpawnCivilians { x: i32, y: i32, count: u32 },
}

impl ActionRecord {
    pub fn opcode(&self) -> ActionOpcode {
        match self {
            ActionRecord::Ignite { .. } => ActionOpcode::Ignite,
            ActionRecord::FalseIgnite { .. } => ActionOpcode::FalseIgnite,
            ActionRecord::AdvanceTick => ActionOpcode::AdvanceTick,
            ActionRecord::CutResource { .. } => ActionOpcode::CutResource,
            ActionRecord::SprayWater { .. } => ActionOpcode::SprayWater,
            ActionRecord::SpawnCivilians { .. } => ActionOpcode::SpawnCivilians,
        }
    }

    /// Encode as a wire frame
    pub fn to_wire(&self) -> Vec<f32> {
        let mut frame = Vec::with_capacity(1 + self.opcode().arity());
        frame.push(f32::from(self.opcode().as_u8()));
        match *self {
            ActionRecord::Ignite { x, y } => frame.extend([x as f32, y as f32]),
            ActionRecord::FalseIgnite { x, y } => frame.extend([x, y]),
            ActionRecord::AdvanceTick => {}
            ActionRecord::CutResource { x, y, full } => {
                frame.extend([x as f32, y as f32, if full { 1.0 } else { 0.0 }]);
            }
            ActionRecord::SprayWater {
                x,
                y,
                radius,
                cone_angle,
                aim_x,
                aim_y,
            } => frame.extend([x as f32, y as f32, radius, cone_angle, aim_x, aim_y]),
            ActionRecord::SpawnCivilians { x, y, count } => {
                frame.extend([x as f32, y as f32, count as f32]);
            }
        }
        frame
    }

    /// Decode a wire frame.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError`] for an empty frame, an unknown opcode, the wrong
    /// number of parameters or a non-finite parameter.
    pub fn from_wire(frame: &[f32]) -> Result<Self, ReplayError> {
        let (&code, params) = frame.split_first().ok_or(ReplayError::EmptyRecord)?;

        let opcode = ActionOpcode::from_wire(code).ok_or(ReplayError::UnknownOpcode(code))?;

        if params.len() != opcode.arity() {
            return Err(ReplayError::WrongArity {
                opcode,
                expected: opcode.arity(),
                actual: params.len(),
            });
        }
        if let Some(index) = params.iter().position(|p| !p.is_finite()) {
            return Err(ReplayError::NonFiniteParameter { opcode, index });
        }

        let record = match opcode {
            ActionOpcode::Ignite => ActionRecord::Ignite {
                x: params[0] as i32,
                y: params[1] as i32,
            },
            ActionOpcode::FalseIgnite => ActionRecord::FalseIgnite {
                x: params[0],
                y: params[1],
            },
            ActionOpcode::AdvanceTick => ActionRecord::AdvanceTick,
            ActionOpcode::CutResource => ActionRecord::CutResource {
                x: params[0] as i32,
                y: params[1] as i32,
                full: params[2] != 0.0,
            },
            ActionOpcode::SprayWater => ActionRecord::SprayWater {
                x: params[0] as i32,
                y: params[1] as i32,
                radius: params[2],
                cone_angle: params[3],
                aim_x: params[4],
                aim_y: params[5],
            },
            ActionOpcode::SpawnCivilians => ActionRecord::SpawnCivilians {
                x: params[0] as i32,
                y: params[1] as i32,
                count: params[2] as u32,
            },
        };
        Ok(record)
    }
}

/// Append-only record of applied intents
#[derive(Debug, Default, Clone)]
pub struct ActionLog {
    entries: Vec<ActionRecord>,
}

impl ActionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record
    pub fn record(&mut self, entry: ActionRecord) {
        self.entries.push(entry);
    }

    /// Full history (for late joiners)
    pub fn entries(&self) -> &[ActionRecord] {
        &self.entries
    }

    /// Records appended after the first `cursor` entries (for incremental streaming)
    pub fn entries_since(&self, cursor: usize) -> &[ActionRecord] {
        &self.entries[cursor.min(self.entries.len())..]
    }

    /// Wire frames for every record after `cursor`
    pub fn wire_frames_since(&self, cursor: usize) -> Vec<Vec<f32>> {
        self.entries_since(cursor)
            .iter()
            .map(ActionRecord::to_wire)
            .collect()
    }

    pub fn get(&self, index: usize) -> Option<&ActionRecord> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of AdvanceTick records
    pub fn tick_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e, ActionRecord::AdvanceTick))
            .count()
    }

    /// Clear all records (episode teardown)
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
