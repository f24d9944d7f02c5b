//! Vegetation removal (fire breaks)

use crate::core_types::CombustionState;
use crate::grid::Cell;

/// Remove one tree, or every tree when `full`, from a cell.
///
/// A burnable cell left without trees becomes not-burnable. Returns the number
/// of trees actually removed (0 when the cell had none).
pub fn cut_trees(cell: &mut Cell, full: bool) -> u8 {
    let amount = if full { cell.trees } else { 1 };
    let removed = cell.remove_trees(amount);

    if removed > 0 && cell.trees == 0 && cell.state == CombustionState::Burnable {
        cell.enter(CombustionState::NotBurnable);
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::{TerrainClass, Vec2};

    fn cell(class: TerrainClass) -> Cell {
        Cell::new(class, 0.0, 0.0, Vec2::zeros(), false)
    }

    #[test]
    fn test_partial_cuts_make_fire_break() {
        let mut medium = cell(TerrainClass::MediumForest);
        assert_eq!(cut_trees(&mut medium, false), 1);
        assert_eq!(medium.state(), CombustionState::Burnable);
        assert_eq!(cut_trees(&mut medium, false), 1);
        assert_eq!(medium.state(), CombustionState::NotBurnable);
        assert_eq!(cut_trees(&mut medium, false), 0);
        assert_eq!(medium.trees(), 0);
    }

    #[test]
    fn test_full_cut() {
        let mut dense = cell(TerrainClass::DenseForest);
        assert_eq!(cut_trees(&mut dense, true), 3);
        assert_eq!(dense.state(), CombustionState::NotBurnable);
        assert_eq!(cut_trees(&mut dense, true), 0);
    }

    #[test]
    fn test_cutting_last_tree_of_ignited_cell_keeps_fire_state() {
        let mut light = cell(TerrainClass::LightForest);
        light.enter(CombustionState::Ignited);
        assert_eq!(cut_trees(&mut light, false), 1);
        assert_eq!(light.state(), CombustionState::Ignited);
    }
}
