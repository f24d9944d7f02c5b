use serde::{Deserialize, Serialize};

/// Combustion state of a single grid cell.
///
/// States progress strictly forward under the automaton:
/// `Burnable -> Ignited -> OnFire -> Extinguishing -> FullyExtinguished`.
/// `NotBurnable` is a sink for cells that carry no fuel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombustionState {
    /// Fuel present, not burning
    Burnable,
    /// No fuel (rock, water, cleared ground)
    NotBurnable,
    /// Precursor state; resources still intact
    Ignited,
    /// Actively burning; spreads to neighbors this tick
    OnFire,
    /// Dying down
    Extinguishing,
    /// Burnt out or put out by water
    FullyExtinguished,
}

impl CombustionState {
    /// Ignited or on fire. Used for fire-extinction detection.
    #[inline]
    pub fn is_actively_burning(self) -> bool {
        matches!(self, CombustionState::Ignited | CombustionState::OnFire)
    }

    /// Any state a water drop turns into `FullyExtinguished`.
    #[inline]
    pub fn is_burning(self) -> bool {
        matches!(
            self,
            CombustionState::Ignited | CombustionState::OnFire | CombustionState::Extinguishing
        )
    }

    /// Safe ground for civilians and cosmetic fire markers.
    #[inline]
    pub fn is_quiescent(self) -> bool {
        matches!(self, CombustionState::Burnable | CombustionState::NotBurnable)
    }

    /// Convert from u8 for FFI compatibility
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(CombustionState::Burnable),
            1 => Some(CombustionState::NotBurnable),
            2 => Some(CombustionState::Ignited),
            3 => Some(CombustionState::OnFire),
            4 => Some(CombustionState::Extinguishing),
            5 => Some(CombustionState::FullyExtinguished),
            _ => None,
        }
    }

    /// Convert to u8 for FFI compatibility
    pub fn as_u8(self) -> u8 {
        match self {
            CombustionState::Burnable => 0,
            CombustionState::NotBurnable => 1,
            CombustionState::Ignited => 2,
            CombustionState::OnFire => 3,
            CombustionState::Extinguishing => 4,
            CombustionState::FullyExtinguished => 5,
        }
    }
}
