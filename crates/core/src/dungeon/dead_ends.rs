//! Dead-end detection and the rooms grown on uncovered branch tips.

use crate::types::{FloorSet, GridCell};

use super::config::RoomWalkPlan;
use super::rng::DungeonRng;
use super::rooms::RoomRegistry;
use super::walk::run_random_walk;

pub fn floor_neighbor_count(floor: &FloorSet, cell: GridCell) -> usize {
    cell.cardinal_neighbors().iter().filter(|next| floor.contains(next)).count()
}

/// Cells with exactly one cardinal neighbour on the floor, in floor enumeration order.
pub fn find_dead_ends(floor: &FloorSet) -> Vec<GridCell> {
    floor.iter().copied().filter(|&cell| floor_neighbor_count(floor, cell) == 1).collect()
}

/// Grows a room on every dead end of `combined` that no registered room covers yet and
/// returns the cells those rooms added.
pub fn augment_dead_ends(
    rng: &mut DungeonRng,
    combined: &FloorSet,
    room_walk: &RoomWalkPlan,
    registry: &mut RoomRegistry,
) -> FloorSet {
    let dead_ends = find_dead_ends(combined);
    let mut added = FloorSet::new();
    let mut grown = 0_usize;
    for dead_end in dead_ends {
        if registry.covers(dead_end) {
            continue;
        }
        let tiles = run_random_walk(rng, room_walk, dead_end);
        added.extend(tiles.iter().copied());
        registry.insert(dead_end, tiles);
        grown += 1;
    }
    tracing::debug!(grown, added = added.len(), "dead-end rooms grown");
    added
}
